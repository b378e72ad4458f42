use anyhow::{anyhow, bail, Result};
use serde_json::{Map, Value};
use shapefile::dbase::FieldValue;

use crate::route::OrderingResult;
use super::{Attributes, PointLayer};

/// Longest field name a dBase table can store.
pub const MAX_DBF_FIELD_NAME: usize = 10;

/// Whether [`PointLayer::write_ranks`] had to add the rank column.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldStatus {
    Created,
    Existing,
}

impl PointLayer {
    /// Returns `true` if the layer already carries a column named `field`.
    /// dBase names match case-insensitively.
    pub fn has_field(&self, field: &str) -> bool {
        self.resolve_field(field).is_some()
    }

    /// Stored name of the column `field` refers to, if it exists.
    pub(crate) fn resolve_field(&self, field: &str) -> Option<String> {
        match &self.attributes {
            Attributes::GeoJson { features, .. } => features.iter()
                .any(|feature| feature.get("properties")
                    .and_then(Value::as_object)
                    .is_some_and(|props| props.contains_key(field)))
                .then(|| field.to_string()),
            Attributes::Dbase { records, added_fields, .. } => {
                let names = records.first().cloned().into_iter()
                    .flat_map(|record| record.into_iter().map(|(name, _)| name));
                added_fields.iter().cloned().chain(names)
                    .find(|name| name.eq_ignore_ascii_case(field))
            }
        }
    }

    /// Fail if `field` cannot hold the ranks: an empty name, or a new
    /// shapefile column longer than the dBase limit.
    pub fn check_field(&self, field: &str) -> Result<()> {
        if field.is_empty() { bail!("field name must not be empty") }
        if matches!(self.attributes, Attributes::Dbase { .. })
            && field.len() > MAX_DBF_FIELD_NAME
            && !self.has_field(field)
        {
            bail!("field name {field:?} is longer than {MAX_DBF_FIELD_NAME} characters, which shapefiles cannot store");
        }
        Ok(())
    }

    /// Store each feature's rank in the integer column `field`, creating the
    /// column when it does not exist yet.
    ///
    /// Every feature must have a rank in `ordering`; nothing is modified
    /// otherwise.
    pub fn write_ranks(&mut self, field: &str, ordering: &OrderingResult) -> Result<FieldStatus> {
        self.check_field(field)?;

        let ranks = self.features.iter()
            .map(|feature| ordering.rank(feature.id)
                .ok_or_else(|| anyhow!("feature {} has no rank", feature.id)))
            .collect::<Result<Vec<_>>>()?;

        let (status, name) = match self.resolve_field(field) {
            Some(name) => (FieldStatus::Existing, name),
            None => (FieldStatus::Created, field.to_string()),
        };

        match &mut self.attributes {
            Attributes::GeoJson { features, .. } => {
                for (feature, rank) in features.iter_mut().zip(ranks) {
                    let props = feature.entry("properties").or_insert(Value::Null);
                    if !props.is_object() { *props = Value::Object(Map::new()) }
                    if let Value::Object(props) = props {
                        props.insert(name.clone(), Value::from(rank));
                    }
                }
            }
            Attributes::Dbase { records, added_fields, .. } => {
                // Validate the existing column type before touching any record.
                let values = records.iter()
                    .zip(ranks)
                    .map(|(record, rank)| dbase_rank_value(record.get(&name), rank)
                        .ok_or_else(|| anyhow!("field {name:?} is not numeric")))
                    .collect::<Result<Vec<_>>>()?;
                if status == FieldStatus::Created { added_fields.push(name.clone()) }
                for (record, value) in records.iter_mut().zip(values) {
                    record.insert(name.clone(), value);
                }
            }
        }

        Ok(status)
    }
}

/// Rank encoded in the same dBase type as the column's current value.
/// A missing value means a freshly added numeric column.
fn dbase_rank_value(existing: Option<&FieldValue>, rank: usize) -> Option<FieldValue> {
    Some(match existing {
        None | Some(FieldValue::Numeric(_)) => FieldValue::Numeric(Some(rank as f64)),
        Some(FieldValue::Integer(_)) => FieldValue::Integer(i32::try_from(rank).ok()?),
        Some(FieldValue::Float(_)) => FieldValue::Float(Some(rank as f32)),
        Some(FieldValue::Double(_)) => FieldValue::Double(rank as f64),
        Some(FieldValue::Character(_)) => FieldValue::Character(Some(rank.to_string())),
        Some(_) => return None,
    })
}

/// Integer reading of a dBase value, if it holds a whole number.
pub(crate) fn dbase_as_i64(value: &FieldValue) -> Option<i64> {
    let number = match value {
        FieldValue::Numeric(Some(n)) | FieldValue::Double(n) => *n,
        FieldValue::Float(Some(n)) => *n as f64,
        FieldValue::Integer(n) => return Some(*n as i64),
        FieldValue::Character(Some(s)) => return s.trim().parse().ok(),
        _ => return None,
    };
    (number.fract() == 0.0).then_some(number as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layer::tests::geojson_layer;
    use crate::types::PointId;

    fn ordered(layer: &PointLayer, start: u64) -> OrderingResult {
        crate::route::NearestNeighborRouter::new(&layer.point_set().unwrap())
            .order_from(PointId(start))
            .unwrap()
    }

    #[test]
    fn creates_then_reuses_field() {
        let mut layer = geojson_layer(&[(1, 0.0, 0.0), (2, 10.0, 0.0), (3, 10.0, 10.0)]);
        let ordering = ordered(&layer, 3);

        assert!(!layer.has_field("pt_order"));
        assert_eq!(layer.write_ranks("pt_order", &ordering).unwrap(), FieldStatus::Created);
        assert!(layer.has_field("pt_order"));
        assert_eq!(layer.write_ranks("pt_order", &ordering).unwrap(), FieldStatus::Existing);

        assert_eq!(layer.int_value(0, "pt_order"), Some(2));
        assert_eq!(layer.int_value(1, "pt_order"), Some(1));
        assert_eq!(layer.int_value(2, "pt_order"), Some(0));
    }

    #[test]
    fn existing_properties_are_kept() {
        let mut layer = geojson_layer(&[(1, 0.0, 0.0), (2, 1.0, 0.0)]);
        let ordering = ordered(&layer, 1);
        layer.write_ranks("name", &ordering).unwrap();
        assert_eq!(layer.int_value(1, "name"), Some(1));
        assert!(layer.has_field("name"));
    }

    #[test]
    fn empty_field_name_is_rejected() {
        let mut layer = geojson_layer(&[(1, 0.0, 0.0), (2, 1.0, 0.0)]);
        let ordering = ordered(&layer, 1);
        assert!(layer.check_field("").is_err());
        assert!(layer.write_ranks("", &ordering).is_err());
    }

    #[test]
    fn geojson_allows_long_field_names() {
        let layer = geojson_layer(&[(1, 0.0, 0.0), (2, 1.0, 0.0)]);
        assert!(layer.check_field("point_order_rank").is_ok());
    }

    #[test]
    fn missing_rank_is_an_error() {
        let mut layer = geojson_layer(&[(1, 0.0, 0.0), (2, 1.0, 0.0)]);
        let other = geojson_layer(&[(1, 0.0, 0.0), (5, 1.0, 0.0)]);
        let ordering = ordered(&other, 1);

        let err = layer.write_ranks("pt_order", &ordering).unwrap_err();
        assert!(err.to_string().contains("feature 2"), "{err}");
        assert!(!layer.has_field("pt_order"));
    }

    #[test]
    fn dbase_values_follow_column_type() {
        assert_eq!(dbase_rank_value(None, 3), Some(FieldValue::Numeric(Some(3.0))));
        assert_eq!(dbase_rank_value(Some(&FieldValue::Integer(0)), 3), Some(FieldValue::Integer(3)));
        assert_eq!(
            dbase_rank_value(Some(&FieldValue::Character(None)), 12),
            Some(FieldValue::Character(Some("12".into()))),
        );
        assert_eq!(dbase_rank_value(Some(&FieldValue::Logical(Some(true))), 1), None);
    }

    #[test]
    fn dbase_integer_reading() {
        assert_eq!(dbase_as_i64(&FieldValue::Numeric(Some(7.0))), Some(7));
        assert_eq!(dbase_as_i64(&FieldValue::Numeric(Some(7.5))), None);
        assert_eq!(dbase_as_i64(&FieldValue::Character(Some(" 12 ".into()))), Some(12));
        assert_eq!(dbase_as_i64(&FieldValue::Numeric(None)), None);
    }
}
