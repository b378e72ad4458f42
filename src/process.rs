//! End-to-end "order a point layer" run: read, rank, write back.

use std::path::PathBuf;

use anyhow::{ensure, Context, Result};
use tracing::{info, warn};

use crate::io::{self, assert_not_stdout, LayerFormat};
use crate::layer::{FieldStatus, MAX_DBF_FIELD_NAME};
use crate::route::{order_points, Feedback, OrderingResult, Outcome};
use crate::types::PointId;

/// Default name of the rank column.
pub const DEFAULT_FIELD_NAME: &str = "pt_order";

/// Default starting feature id.
pub const DEFAULT_START_ID: u64 = 1;

/// Parameters for [`order_layer`].
#[derive(Clone, Debug)]
pub struct OrderParams {
    /// Input point layer (`.geojson`, `.json` or `.shp`).
    pub input: PathBuf,
    /// Output layer, same format as the input.
    pub output: PathBuf,
    /// Column receiving each point's rank.
    pub field_name: String,
    /// Id of the point ranked 0.
    pub start_id: u64,
    /// Attribute holding feature ids, if not the format's own ids.
    pub id_field: Option<String>,
    /// Replace an existing output.
    pub force: bool,
}

impl OrderParams {
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            field_name: DEFAULT_FIELD_NAME.to_string(),
            start_id: DEFAULT_START_ID,
            id_field: None,
            force: false,
        }
    }
}

/// What a finished run produced.
#[derive(Clone, Debug)]
pub struct OrderSummary {
    pub output: PathBuf,
    pub feature_count: usize,
    pub field_status: FieldStatus,
    pub ordering: OrderingResult,
}

/// Rank every point of `params.input` and write the layer, with the rank
/// column filled in, to `params.output`.
///
/// Invalid input, and an output that could not be written (existing file
/// without `force`, other format than the input, unstorable field name),
/// fail before any ordering work. A cancelled run returns
/// `Outcome::Cancelled` and leaves the filesystem untouched.
pub fn order_layer(params: &OrderParams, feedback: &mut dyn Feedback) -> Result<Outcome<OrderSummary>> {
    assert_not_stdout(&params.output)?;
    if params.field_name.len() > MAX_DBF_FIELD_NAME {
        warn!(field = %params.field_name, "field name > {MAX_DBF_FIELD_NAME} characters");
    }

    let mut layer = io::read_layer(&params.input, params.id_field.as_deref())
        .with_context(|| format!("reading {}", params.input.display()))?;
    info!(features = layer.len(), "Number of features");

    let output_format = LayerFormat::from_path(&params.output)?;
    ensure!(
        output_format == layer.format(),
        "output {} must have the same format as the input ({:?})",
        params.output.display(),
        layer.format(),
    );
    io::check_target(&params.output, params.force)?;
    layer.check_field(&params.field_name)?;

    let points = layer.point_set()?;
    let ordering = match order_points(&points, PointId(params.start_id), feedback)? {
        Outcome::Complete(ordering) => ordering,
        Outcome::Cancelled => return Ok(Outcome::Cancelled),
    };

    let field_status = layer.write_ranks(&params.field_name, &ordering)?;
    match field_status {
        FieldStatus::Created => info!(field = %params.field_name, "Field created"),
        FieldStatus::Existing => info!(field = %params.field_name, "Field already exists"),
    }

    let feature_count = layer.len();
    io::write_layer(layer, &params.output, params.force)
        .with_context(|| format!("Failed to export layer to {}", params.output.display()))?;
    info!(output = %params.output.display(), tour_length = ordering.tour_length(), "wrote ordered points");

    Ok(Outcome::Complete(OrderSummary {
        output: params.output.clone(),
        feature_count,
        field_status,
        ordering,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_tool_defaults() {
        let params = OrderParams::new("in.geojson", "out.geojson");
        assert_eq!(params.field_name, "pt_order");
        assert_eq!(params.start_id, 1);
        assert!(!params.force);
        assert!(params.id_field.is_none());
    }
}
