//! Interactive drawing tools for chart annotations.
//!
//! Annotations are anchored in domain coordinates (timestamp and price) and
//! re-projected through the [`Projection`](crate::coords::Projection) cached on
//! each one whenever the viewport changes.

mod erase;
pub mod geometry;
mod state;
mod store;
mod types;

pub use erase::{EraseAffordance, EraseTool, ERASE_AFFORDANCE_SIZE};
pub use state::{DrawingTool, ToolMachine};
pub use store::{AnnotationStore, StoreError};
pub use types::{AnchorPoint, Annotation, Drawing, DrawingId, Shape, ToolPhase};
