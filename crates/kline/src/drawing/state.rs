//! Drawing tool selection and the per-gesture state machine.

use kline_core::{OhlcvSeries, SeriesKey};

use crate::coords::{PixelPos, Projection};

use super::erase::EraseTool;
use super::store::AnnotationStore;
use super::types::{Annotation, Drawing, ToolPhase};

/// Available drawing tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DrawingTool {
    #[default]
    None,
    VerticalLine,
    HorizontalLine,
    Trendline,
    ParallelLines,
    FreeLine,
    TimeFibonacci,
    Erase,
}

impl DrawingTool {
    /// Get the display name for this tool.
    pub fn name(&self) -> &'static str {
        match self {
            DrawingTool::None => "None",
            DrawingTool::VerticalLine => "V-Line",
            DrawingTool::HorizontalLine => "H-Line",
            DrawingTool::Trendline => "Trend",
            DrawingTool::ParallelLines => "Parallel",
            DrawingTool::FreeLine => "Line",
            DrawingTool::TimeFibonacci => "Fib Time",
            DrawingTool::Erase => "Erase",
        }
    }

    /// Check if this tool creates drawings.
    pub fn is_drawing_tool(&self) -> bool {
        !matches!(self, DrawingTool::None | DrawingTool::Erase)
    }

    /// Vertical tools are drawn through every pane.
    pub fn spans_all_panes(&self) -> bool {
        matches!(self, DrawingTool::VerticalLine | DrawingTool::TimeFibonacci)
    }

    /// Get all available tools.
    pub fn all() -> &'static [DrawingTool] {
        &[
            DrawingTool::None,
            DrawingTool::VerticalLine,
            DrawingTool::HorizontalLine,
            DrawingTool::Trendline,
            DrawingTool::ParallelLines,
            DrawingTool::FreeLine,
            DrawingTool::TimeFibonacci,
            DrawingTool::Erase,
        ]
    }
}

/// The active tool and its gesture in progress.
#[derive(Debug, Clone, Default)]
pub enum ToolMachine {
    #[default]
    None,
    /// A drawing tool holding the annotation being placed.
    Drawing(Annotation),
    Erase(EraseTool),
}

impl ToolMachine {
    /// Fresh machine for `tool`. The erase tool snapshots the annotations of `key`.
    pub fn new(tool: DrawingTool, store: &AnnotationStore, key: &SeriesKey) -> Self {
        match tool {
            DrawingTool::None => ToolMachine::None,
            DrawingTool::Erase => ToolMachine::Erase(EraseTool::new(store.ids(key))),
            tool => Drawing::for_tool(tool)
                .map(|drawing| ToolMachine::Drawing(Annotation::new(drawing)))
                .unwrap_or_default(),
        }
    }

    pub fn tool(&self) -> DrawingTool {
        match self {
            ToolMachine::None => DrawingTool::None,
            ToolMachine::Drawing(annotation) => annotation.tool(),
            ToolMachine::Erase(_) => DrawingTool::Erase,
        }
    }

    /// Annotation being placed, if any.
    pub fn annotation(&self) -> Option<&Annotation> {
        match self {
            ToolMachine::Drawing(annotation) => Some(annotation),
            _ => None,
        }
    }

    pub fn phase(&self) -> ToolPhase {
        self.annotation().map_or(ToolPhase::Idle, |a| a.phase)
    }

    pub fn begin(&mut self, pos: PixelPos, projection: Projection, chart_index: usize, series: &OhlcvSeries) {
        if let ToolMachine::Drawing(annotation) = self {
            annotation.begin(pos, projection, chart_index, series);
        }
    }

    pub fn process(&mut self, pos: PixelPos, series: &OhlcvSeries) {
        if let ToolMachine::Drawing(annotation) = self {
            annotation.process(pos, series);
        }
    }

    pub fn end(&mut self, pos: PixelPos, series: &OhlcvSeries) {
        if let ToolMachine::Drawing(annotation) = self {
            annotation.end(pos, series);
        }
    }

    pub fn zoom_changed(&mut self, projection: Projection) {
        if let ToolMachine::Drawing(annotation) = self {
            annotation.zoom_changed(projection);
        }
    }

    /// The erase tool never finishes.
    pub fn is_finished(&self) -> bool {
        self.annotation().is_some_and(Annotation::is_finished)
    }

    /// Hand over a finished annotation, leaving a fresh idle one of the same kind.
    pub fn take_finished(&mut self) -> Option<Annotation> {
        match self {
            ToolMachine::Drawing(annotation) if annotation.is_finished() => {
                let fresh = Drawing::for_tool(annotation.tool()).map(Annotation::new)?;
                Some(std::mem::replace(annotation, fresh))
            }
            _ => None,
        }
    }
}
