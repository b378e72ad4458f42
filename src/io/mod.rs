//! Reading and writing point layers.

mod fs;
mod geojson;
mod shp;

pub use fs::{assert_not_stdout, check_target, open_for_write, PendingWrite};

use std::path::Path;

use anyhow::{bail, Context, Result};

use crate::layer::PointLayer;

/// On-disk layer formats, chosen by file extension.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayerFormat {
    GeoJson,
    Shapefile,
}

impl LayerFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path.extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("geojson" | "json") => Ok(Self::GeoJson),
            Some("shp") => Ok(Self::Shapefile),
            _ => bail!("Unsupported layer format: {} (expected .geojson, .json or .shp)", path.display()),
        }
    }
}

/// Read a point layer from `path`.
///
/// `id_field` names the attribute holding feature ids; without it the
/// format's own feature id (or the 0-based position) is used.
pub fn read_layer(path: &Path, id_field: Option<&str>) -> Result<PointLayer> {
    match LayerFormat::from_path(path)? {
        LayerFormat::GeoJson => geojson::read_geojson(path, id_field),
        LayerFormat::Shapefile => shp::read_shapefile(path, id_field),
    }
}

/// Write `layer` to `path` in the format it was read from.
///
/// The output is staged in a temp directory and renamed into place once
/// complete. Refuses to replace an existing file unless `force`.
pub fn write_layer(layer: PointLayer, path: &Path, force: bool) -> Result<()> {
    let format = LayerFormat::from_path(path)?;
    let pending = fs::open_for_write(path, force)?;

    match format {
        LayerFormat::GeoJson => {
            let bytes = geojson::write_to_geojson_bytes(&layer)?;
            let staged = pending.staged_target();
            std::fs::write(&staged, bytes)
                .with_context(|| format!("write {}", staged.display()))?;
        }
        LayerFormat::Shapefile => shp::write_shapefile(layer, &pending)?,
    }

    pending.finalize()
}

/// Parse an in-memory GeoJSON FeatureCollection.
pub fn read_geojson_bytes(bytes: &[u8], id_field: Option<&str>) -> Result<PointLayer> {
    geojson::read_from_geojson_bytes(bytes, id_field)
}
