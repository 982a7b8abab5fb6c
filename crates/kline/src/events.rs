//! Event type definitions.
//!
//! [`ChartEvent`] is everything the UI layer can tell a chart session: pointer
//! input in local pixels, scroll and zoom commands, and selection changes.

use kline_core::Timeframe;

use crate::coords::{PixelPos, PixelRect};
use crate::drawing::{DrawingId, DrawingTool};

/// Input delivered to [`ChartSession::handle`](crate::session::ChartSession::handle).
#[derive(Debug, Clone, PartialEq)]
pub enum ChartEvent {
    /// The chart region was laid out anew.
    Resize(PixelRect),
    /// Switch to another instrument, e.g. `"2330.tw"`.
    InstrumentChanged(String),
    TimeframeChanged(Timeframe),
    ToolSelected(DrawingTool),
    PointerDown(PixelPos),
    PointerDrag(PixelPos),
    PointerUp(PixelPos),
    PointerMove(PixelPos),
    /// The pointer left the chart.
    PointerExit,
    /// Scroll by whole bars; positive moves toward newer bars.
    Scroll(isize),
    ZoomIn,
    ZoomOut,
    ZoomReset,
    EraseOne(DrawingId),
    EraseAll,
}

impl ChartEvent {
    /// Whether the event changes which bars are visible or how wide they are.
    #[must_use]
    pub fn moves_viewport(&self) -> bool {
        matches!(
            self,
            ChartEvent::Resize(_)
                | ChartEvent::InstrumentChanged(_)
                | ChartEvent::TimeframeChanged(_)
                | ChartEvent::Scroll(_)
                | ChartEvent::ZoomIn
                | ChartEvent::ZoomOut
                | ChartEvent::ZoomReset
        )
    }

    /// Pointer position carried by the event, if any.
    #[must_use]
    pub fn position(&self) -> Option<PixelPos> {
        match self {
            ChartEvent::PointerDown(pos)
            | ChartEvent::PointerDrag(pos)
            | ChartEvent::PointerUp(pos)
            | ChartEvent::PointerMove(pos) => Some(*pos),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_moves_viewport() {
        assert!(ChartEvent::ZoomIn.moves_viewport());
        assert!(ChartEvent::Scroll(-3).moves_viewport());
        assert!(!ChartEvent::PointerMove(PixelPos::new(1, 2)).moves_viewport());
        assert!(!ChartEvent::EraseAll.moves_viewport());
    }

    #[test]
    fn test_position() {
        assert_eq!(
            ChartEvent::PointerDrag(PixelPos::new(4, 5)).position(),
            Some(PixelPos::new(4, 5))
        );
        assert_eq!(ChartEvent::PointerExit.position(), None);
        assert_eq!(ChartEvent::ZoomOut.position(), None);
    }
}
