//! In-memory point layer: geometries, ids and attribute rows.

mod field;

use std::fmt;

pub use field::{FieldStatus, MAX_DBF_FIELD_NAME};
pub(crate) use field::dbase_as_i64;

use geo::Coord;
use serde_json::{Map, Value};
use shapefile::dbase::{Record, TableInfo};

use crate::error::Result;
use crate::io::LayerFormat;
use crate::types::{PointId, PointRecord, PointSet};

/// One point of a layer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointFeature {
    pub id: PointId,
    pub location: Coord<f64>,
}

/// Attribute rows in the shape of the source format, kept so the layer can be
/// written back out with every original attribute intact.
pub(crate) enum Attributes {
    /// Whole GeoJSON feature objects plus the collection's other members.
    GeoJson {
        collection: Map<String, Value>,
        features: Vec<Map<String, Value>>,
    },
    /// dBase schema and one record per shape, plus the `.prj`/`.cpg`
    /// sidecars as `(extension, contents)`.
    Dbase {
        table: TableInfo,
        records: Vec<Record>,
        added_fields: Vec<String>,
        sidecars: Vec<(&'static str, Vec<u8>)>,
    },
}

/// A layer of point features read from a file.
///
/// Feature `i` owns attribute row `i`.
pub struct PointLayer {
    pub(crate) features: Vec<PointFeature>,
    pub(crate) attributes: Attributes,
}

impl fmt::Debug for PointLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PointLayer")
            .field("format", &self.format())
            .field("features", &self.features.len())
            .finish()
    }
}

impl PointLayer {
    /// Number of features.
    pub fn len(&self) -> usize { self.features.len() }

    pub fn is_empty(&self) -> bool { self.features.is_empty() }

    pub fn features(&self) -> &[PointFeature] { &self.features }

    /// Format the layer was read from, and the only one it can be written as.
    pub fn format(&self) -> LayerFormat {
        match self.attributes {
            Attributes::GeoJson { .. } => LayerFormat::GeoJson,
            Attributes::Dbase { .. } => LayerFormat::Shapefile,
        }
    }

    /// Snapshot the features for ordering. Fails on duplicate ids, non-finite
    /// coordinates or overlapping points.
    pub fn point_set(&self) -> Result<PointSet> {
        PointSet::new(self.features.iter().map(|f| PointRecord { id: f.id, location: f.location }))
    }

    /// Integer value of `field` on feature `index`, if set.
    pub fn int_value(&self, index: usize, field: &str) -> Option<i64> {
        match &self.attributes {
            Attributes::GeoJson { features, .. } => features.get(index)?
                .get("properties")?
                .get(field)?
                .as_i64(),
            Attributes::Dbase { records, .. } => {
                let record = records.get(index)?;
                dbase_as_i64(record.get(&self.resolve_field(field)?)?)
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use serde_json::json;

    /// GeoJSON-backed layer over `(id, x, y)` triples.
    pub(crate) fn geojson_layer(points: &[(u64, f64, f64)]) -> PointLayer {
        let features = points.iter()
            .map(|&(id, x, y)| PointFeature { id: PointId(id), location: Coord { x, y } })
            .collect();
        let rows = points.iter()
            .map(|&(id, x, y)| json!({
                "type": "Feature",
                "id": id,
                "geometry": { "type": "Point", "coordinates": [x, y] },
                "properties": { "name": format!("p{id}") },
            }))
            .map(|value| match value { Value::Object(map) => map, _ => unreachable!() })
            .collect();

        PointLayer {
            features,
            attributes: Attributes::GeoJson { collection: Map::new(), features: rows },
        }
    }

    #[test]
    fn point_set_keeps_ids_and_locations() {
        let layer = geojson_layer(&[(5, 1.0, 2.0), (3, 4.0, 5.0)]);
        let set = layer.point_set().unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.location(PointId(5)), Some(Coord { x: 1.0, y: 2.0 }));
    }

    #[test]
    fn point_set_rejects_overlaps() {
        let layer = geojson_layer(&[(1, 1.0, 1.0), (2, 1.0, 1.0)]);
        assert!(layer.point_set().is_err());
    }
}
