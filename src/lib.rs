#![doc = "Greedy nearest-neighbor ordering of point layers"]
mod error;
mod layer;
mod route;
mod types;

pub mod io;
pub mod process;

#[doc(inline)]
pub use error::OrderError;

#[doc(inline)]
pub use types::{PointId, PointRecord, PointSet};

#[doc(inline)]
pub use route::{
    build_chain, distance, order_points, CancelToken, Feedback, LogProgress,
    NearestNeighborRouter, NoFeedback, OrderingResult, Outcome,
};

#[doc(inline)]
pub use layer::{FieldStatus, PointFeature, PointLayer, MAX_DBF_FIELD_NAME};

#[doc(inline)]
pub use process::{order_layer, OrderParams, OrderSummary};
