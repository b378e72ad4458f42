use std::path::Path;

use anyhow::{anyhow, bail, ensure, Context, Result};
use geo::Coord;
use serde_json::{Map, Value};

use crate::layer::{Attributes, PointFeature, PointLayer};
use crate::types::PointId;

/// Parse a GeoJSON `FeatureCollection` of `Point` features.
///
/// Feature ids come from the `id_field` property when given, else from the
/// feature's own integer `id`, else from its 0-based position.
pub(crate) fn read_from_geojson_bytes(bytes: &[u8], id_field: Option<&str>) -> Result<PointLayer> {
    let value: Value = serde_json::from_slice(bytes).context("Failed to parse GeoJSON bytes")?;
    let Value::Object(mut collection) = value else { bail!("GeoJSON root must be an object") };
    ensure!(
        collection.get("type").and_then(Value::as_str) == Some("FeatureCollection"),
        "GeoJSON root must be a FeatureCollection"
    );

    let rows = match collection.remove("features") {
        Some(Value::Array(rows)) => rows,
        _ => bail!("FeatureCollection has no features array"),
    };

    let mut features = Vec::with_capacity(rows.len());
    let mut objects = Vec::with_capacity(rows.len());
    for (index, row) in rows.into_iter().enumerate() {
        let Value::Object(object) = row else { bail!("feature {index} is not an object") };
        let location = parse_point(object.get("geometry"))
            .with_context(|| format!("feature {index}"))?;
        let id = feature_id(&object, index, id_field)
            .with_context(|| format!("feature {index}"))?;
        features.push(PointFeature { id, location });
        objects.push(object);
    }

    Ok(PointLayer { features, attributes: Attributes::GeoJson { collection, features: objects } })
}

pub(crate) fn read_geojson(path: &Path, id_field: Option<&str>) -> Result<PointLayer> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to open GeoJSON: {}", path.display()))?;
    read_from_geojson_bytes(&bytes, id_field)
}

/// Serialise `layer` back into a FeatureCollection, attributes included.
pub(crate) fn write_to_geojson_bytes(layer: &PointLayer) -> Result<Vec<u8>> {
    let Attributes::GeoJson { collection, features } = &layer.attributes else {
        bail!("layer was not read from GeoJSON")
    };

    let mut collection = collection.clone();
    collection.insert("type".into(), Value::from("FeatureCollection"));
    collection.insert(
        "features".into(),
        Value::Array(features.iter().cloned().map(Value::Object).collect()),
    );

    serde_json::to_vec_pretty(&Value::Object(collection)).context("Failed to serialize GeoJSON to bytes")
}

/// Location of a `Point` geometry; anything else is rejected.
fn parse_point(geometry: Option<&Value>) -> Result<Coord<f64>> {
    let geometry = geometry
        .and_then(Value::as_object)
        .ok_or_else(|| anyhow!("missing geometry"))?;
    match geometry.get("type").and_then(Value::as_str) {
        Some("Point") => {}
        Some(other) => bail!("expected Point geometry, found {other}"),
        None => bail!("geometry has no type"),
    }

    let coords = geometry.get("coordinates")
        .and_then(Value::as_array)
        .filter(|coords| coords.len() >= 2)
        .ok_or_else(|| anyhow!("Invalid Point: expected [x, y] coordinates"))?;
    let x = coords[0].as_f64()
        .ok_or_else(|| anyhow!("Invalid coordinate: x must be a number"))?;
    let y = coords[1].as_f64()
        .ok_or_else(|| anyhow!("Invalid coordinate: y must be a number"))?;

    Ok(Coord { x, y })
}

fn feature_id(feature: &Map<String, Value>, index: usize, id_field: Option<&str>) -> Result<PointId> {
    match id_field {
        Some(field) => {
            let value = feature.get("properties")
                .and_then(|props| props.get(field))
                .ok_or_else(|| anyhow!("missing id property {field:?}"))?;
            value.as_u64()
                .map(PointId)
                .ok_or_else(|| anyhow!("id property {field:?} must be a non-negative integer, found {value}"))
        }
        None => Ok(PointId(feature.get("id").and_then(Value::as_u64).unwrap_or(index as u64))),
    }
}
