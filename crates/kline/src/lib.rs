//! Kline - interactive candlestick chart core.
//!
//! The crate turns a loaded [`OhlcvSeries`](kline_core::OhlcvSeries) and UI
//! events into numeric drawing input: visible bar windows, pane value ranges,
//! pixel positions, annotation shapes and crosshair readouts. It never draws.

pub mod coords;
pub mod drawing;
pub mod events;
pub mod layout;
pub mod session;
pub mod viewport;

pub use coords::{PixelPos, PixelRect, Projection, ScreenPos, Segment};
pub use drawing::{Annotation, AnnotationStore, DrawingId, DrawingTool, Shape, ToolMachine};
pub use events::ChartEvent;
pub use layout::ChartLayout;
pub use session::{ChartSession, Crosshair};
pub use viewport::Viewport;
