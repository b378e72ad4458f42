use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use geo::Coord;
use shapefile::dbase::{FieldName, Record, TableWriterBuilder};
use shapefile::{Point, Reader, Shape, Writer};

use crate::layer::{Attributes, PointFeature, PointLayer};
use crate::types::PointId;
use super::fs::PendingWrite;

/// Sidecar files carried through unchanged: projection and dBase code page.
const SIDECARS: [&str; 2] = ["prj", "cpg"];

/// Reads all point shapes + attribute records from a given `.shp` file path.
///
/// `PointM` and `PointZ` are accepted and flattened to 2-D. Ids come from the
/// numeric `id_field` when given, else from the 0-based record index.
pub(crate) fn read_shapefile(path: &Path, id_field: Option<&str>) -> Result<PointLayer> {
    let mut reader = Reader::from_path(path)
        .with_context(|| format!("Failed to open shapefile: {}", path.display()))?;

    let mut features = Vec::with_capacity(reader.shape_count()?);
    let mut records = Vec::with_capacity(features.capacity());
    for (index, result) in reader.iter_shapes_and_records().enumerate() {
        let (shape, record) = result.context("Error reading shape+record")?;
        let location = match shape {
            Shape::Point(p) => Coord { x: p.x, y: p.y },
            Shape::PointM(p) => Coord { x: p.x, y: p.y },
            Shape::PointZ(p) => Coord { x: p.x, y: p.y },
            other => bail!("record {index}: expected a point, found {:?}", other.shapetype()),
        };
        let id = match id_field {
            Some(field) => record_id(&record, field).with_context(|| format!("record {index}"))?,
            None => PointId(index as u64),
        };
        features.push(PointFeature { id, location });
        records.push(record);
    }

    let table = reader.into_table_info();
    let sidecars = read_sidecars(path)?;
    Ok(PointLayer {
        features,
        attributes: Attributes::Dbase { table, records, added_fields: Vec::new(), sidecars },
    })
}

/// Write `layer` as 2-D points into the staged `.shp`/`.shx`/`.dbf` files.
pub(crate) fn write_shapefile(layer: PointLayer, pending: &PendingWrite) -> Result<()> {
    let Attributes::Dbase { table, records, added_fields, sidecars } = layer.attributes else {
        bail!("layer was not read from a shapefile")
    };

    let mut builder = TableWriterBuilder::from_table_info(table);
    for field in &added_fields {
        let name = FieldName::try_from(field.as_str())
            .map_err(|e| anyhow!("invalid field name {field:?}: {e:?}"))?;
        builder = builder.add_numeric_field(name, 10, 0);
    }

    let path = pending.staged("shp");
    let mut writer = Writer::from_path(&path, builder)
        .with_context(|| format!("Failed to create shapefile: {}", path.display()))?;
    for (feature, record) in layer.features.iter().zip(&records) {
        let point = Point::new(feature.location.x, feature.location.y);
        writer.write_shape_and_record(&point, record)
            .with_context(|| format!("Error writing point {}", feature.id))?;
    }

    for (ext, contents) in &sidecars {
        let path = pending.staged(ext);
        std::fs::write(&path, contents)
            .with_context(|| format!("write {}", path.display()))?;
    }
    Ok(())
}

fn read_sidecars(path: &Path) -> Result<Vec<(&'static str, Vec<u8>)>> {
    let mut sidecars = Vec::new();
    for ext in SIDECARS {
        let sidecar = path.with_extension(ext);
        if !sidecar.is_file() { continue }
        let contents = std::fs::read(&sidecar)
            .with_context(|| format!("read {}", sidecar.display()))?;
        sidecars.push((ext, contents));
    }
    Ok(sidecars)
}

fn record_id(record: &Record, field: &str) -> Result<PointId> {
    let value = record.get(field).ok_or_else(|| anyhow!("missing id field {field:?}"))?;
    crate::layer::dbase_as_i64(value)
        .and_then(|id| u64::try_from(id).ok())
        .map(PointId)
        .ok_or_else(|| anyhow!("id field {field:?} must be a non-negative integer, found {value:?}"))
}
