//! Drawing types for interactive chart annotations.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use kline_core::OhlcvSeries;

use crate::coords::{PixelPos, PixelRect, Projection, ScreenPos, Segment};

use super::geometry::{extend_line, parallel_lines, time_fibonacci_sequence};
use super::state::DrawingTool;

/// Global counter for generating unique drawing IDs.
static NEXT_DRAWING_ID: AtomicU64 = AtomicU64::new(1);

/// Unique identifier for a drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DrawingId(u64);

impl DrawingId {
    /// Generate a new unique drawing ID.
    pub fn new() -> Self {
        Self(NEXT_DRAWING_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl Default for DrawingId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for DrawingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// An anchor point for a drawing, positioned in domain coordinates.
///
/// Anchors never store pixels, so they stay put across scroll and zoom.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AnchorPoint {
    /// Unix seconds of the bar the anchor sits on.
    pub timestamp: f64,
    pub price: f64,
}

impl AnchorPoint {
    pub const fn new(timestamp: f64, price: f64) -> Self {
        Self { timestamp, price }
    }

    /// Anchor under a pixel position.
    pub fn at(pos: PixelPos, projection: &Projection, series: &OhlcvSeries) -> Self {
        Self {
            timestamp: projection.timestamp_at(pos.x, series),
            price: projection.price_at(pos.y),
        }
    }

    /// Anchor position snapped to the pixel grid.
    pub fn to_pixel(&self, projection: &Projection, series: &OhlcvSeries) -> PixelPos {
        PixelPos {
            x: projection.pixel_x_at(self.timestamp, 0, series) as i32,
            y: projection.pixel_y_at(self.price),
        }
    }
}

/// Shape and anchors of an annotation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Drawing {
    /// Vertical line through a bar, across every pane.
    VerticalLine { anchor: AnchorPoint },
    /// Horizontal line at a price.
    HorizontalLine { anchor: AnchorPoint },
    /// Line through two anchors, extended to the pane border.
    Trendline { start: AnchorPoint, end: AnchorPoint },
    /// Segment between two anchors.
    FreeLine { start: AnchorPoint, end: AnchorPoint },
    /// Base line through two anchors plus parallels spaced by the offset anchor.
    ParallelLines {
        start: AnchorPoint,
        end: AnchorPoint,
        offset: Option<AnchorPoint>,
    },
    /// Vertical markers at Fibonacci bar distances ahead of the anchor.
    TimeFibonacci { anchor: AnchorPoint },
}

impl Drawing {
    /// Unplaced drawing for a tool, or `None` for tools that do not draw.
    pub fn for_tool(tool: DrawingTool) -> Option<Self> {
        let anchor = AnchorPoint::default();
        let drawing = match tool {
            DrawingTool::VerticalLine => Drawing::VerticalLine { anchor },
            DrawingTool::HorizontalLine => Drawing::HorizontalLine { anchor },
            DrawingTool::Trendline => Drawing::Trendline { start: anchor, end: anchor },
            DrawingTool::FreeLine => Drawing::FreeLine { start: anchor, end: anchor },
            DrawingTool::ParallelLines => Drawing::ParallelLines {
                start: anchor,
                end: anchor,
                offset: None,
            },
            DrawingTool::TimeFibonacci => Drawing::TimeFibonacci { anchor },
            DrawingTool::None | DrawingTool::Erase => return None,
        };
        Some(drawing)
    }

    pub fn tool(&self) -> DrawingTool {
        match self {
            Drawing::VerticalLine { .. } => DrawingTool::VerticalLine,
            Drawing::HorizontalLine { .. } => DrawingTool::HorizontalLine,
            Drawing::Trendline { .. } => DrawingTool::Trendline,
            Drawing::FreeLine { .. } => DrawingTool::FreeLine,
            Drawing::ParallelLines { .. } => DrawingTool::ParallelLines,
            Drawing::TimeFibonacci { .. } => DrawingTool::TimeFibonacci,
        }
    }

    /// Placed anchors, in placement order.
    pub fn anchors(&self) -> Vec<AnchorPoint> {
        match *self {
            Drawing::VerticalLine { anchor }
            | Drawing::HorizontalLine { anchor }
            | Drawing::TimeFibonacci { anchor } => vec![anchor],
            Drawing::Trendline { start, end } | Drawing::FreeLine { start, end } => vec![start, end],
            Drawing::ParallelLines { start, end, offset } => {
                let mut anchors = vec![start, end];
                anchors.extend(offset);
                anchors
            }
        }
    }

    /// Place every anchor at `anchor`, as the first click of a gesture does.
    pub(crate) fn place_all(&mut self, anchor: AnchorPoint) {
        match self {
            Drawing::VerticalLine { anchor: a }
            | Drawing::HorizontalLine { anchor: a }
            | Drawing::TimeFibonacci { anchor: a } => *a = anchor,
            Drawing::Trendline { start, end } | Drawing::FreeLine { start, end } => {
                *start = anchor;
                *end = anchor;
            }
            Drawing::ParallelLines { start, end, offset } => {
                *start = anchor;
                *end = anchor;
                *offset = None;
            }
        }
    }

    /// Move the anchor being dragged in the base phase.
    ///
    /// Vertical tools only follow the time, horizontal lines only the price.
    pub(crate) fn drag_to(&mut self, anchor: AnchorPoint) {
        match self {
            Drawing::VerticalLine { anchor: a } | Drawing::TimeFibonacci { anchor: a } => {
                a.timestamp = anchor.timestamp;
            }
            Drawing::HorizontalLine { anchor: a } => a.price = anchor.price,
            Drawing::Trendline { end, .. } | Drawing::FreeLine { end, .. } | Drawing::ParallelLines { end, .. } => {
                *end = anchor;
            }
        }
    }

    pub(crate) fn set_offset(&mut self, anchor: AnchorPoint) {
        if let Drawing::ParallelLines { offset, .. } = self {
            *offset = Some(anchor);
        }
    }
}

/// Gesture progress of an annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToolPhase {
    #[default]
    Idle,
    Begun,
    Processing,
    /// Parallel lines: base line placed, waiting for the offset gesture.
    BaseConfirmed,
    /// Parallel lines: dragging the offset anchor.
    Offsetting,
    Finished,
}

/// Renderable output of an annotation.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Line(Segment),
    /// Vertical marker labelled with its Fibonacci bar distance.
    FibonacciMarker { line: Segment, label: usize },
}

/// A user drawing together with the viewport it was last projected with.
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    pub id: DrawingId,
    pub drawing: Drawing,
    pub phase: ToolPhase,
    pub chart_index: usize,
    pub projection: Projection,
}

impl Annotation {
    pub fn new(drawing: Drawing) -> Self {
        Self {
            id: DrawingId::new(),
            drawing,
            phase: ToolPhase::Idle,
            chart_index: 0,
            projection: Projection::default(),
        }
    }

    pub fn tool(&self) -> DrawingTool {
        self.drawing.tool()
    }

    pub fn is_finished(&self) -> bool {
        self.phase == ToolPhase::Finished
    }

    /// Re-cache viewport parameters after scroll, zoom or resize.
    pub fn zoom_changed(&mut self, projection: Projection) {
        self.projection = projection;
    }

    /// Start a gesture at `pos`.
    ///
    /// Ignored unless `pos` lies inside the projection area. For parallel lines
    /// with a confirmed base, starts the offset gesture instead, using the
    /// cached projection.
    pub fn begin(&mut self, pos: PixelPos, projection: Projection, chart_index: usize, series: &OhlcvSeries) {
        match self.phase {
            ToolPhase::Idle => {
                if !projection.area.contains(pos) || projection.visible.is_empty() {
                    return;
                }
                self.projection = projection;
                self.chart_index = chart_index;
                self.drawing.place_all(AnchorPoint::at(pos, &projection, series));
                self.phase = ToolPhase::Begun;
            }
            ToolPhase::BaseConfirmed => {
                let anchor = self.clamped_anchor(pos, series);
                self.drawing.set_offset(anchor);
                self.phase = ToolPhase::Offsetting;
            }
            _ => {}
        }
    }

    /// Drag the in-progress anchor to `pos`, clamped into the area.
    pub fn process(&mut self, pos: PixelPos, series: &OhlcvSeries) {
        match self.phase {
            ToolPhase::Begun | ToolPhase::Processing => {
                let anchor = self.clamped_anchor(pos, series);
                self.drawing.drag_to(anchor);
                self.phase = ToolPhase::Processing;
            }
            ToolPhase::Offsetting => {
                let anchor = self.clamped_anchor(pos, series);
                self.drawing.set_offset(anchor);
            }
            _ => {}
        }
    }

    /// Release at `pos`, finishing the current phase.
    pub fn end(&mut self, pos: PixelPos, series: &OhlcvSeries) {
        match self.phase {
            ToolPhase::Begun | ToolPhase::Processing => {
                let anchor = self.clamped_anchor(pos, series);
                self.drawing.drag_to(anchor);
                self.phase = match self.drawing {
                    Drawing::ParallelLines { .. } => ToolPhase::BaseConfirmed,
                    _ => ToolPhase::Finished,
                };
            }
            ToolPhase::Offsetting => {
                let anchor = self.clamped_anchor(pos, series);
                self.drawing.set_offset(anchor);
                self.phase = ToolPhase::Finished;
            }
            _ => {}
        }
    }

    fn clamped_anchor(&self, pos: PixelPos, series: &OhlcvSeries) -> AnchorPoint {
        AnchorPoint::at(self.projection.area.clamp_point(pos), &self.projection, series)
    }

    /// Line primitives for the renderer, clipped to nothing when degenerate.
    pub fn shapes(&self, series: &OhlcvSeries) -> Vec<Shape> {
        if self.phase == ToolPhase::Idle || self.projection.is_degenerate() {
            return Vec::new();
        }
        let projection = &self.projection;
        let area = projection.area;
        let pixel = |anchor: &AnchorPoint| anchor.to_pixel(projection, series);

        match &self.drawing {
            Drawing::VerticalLine { anchor } => vec![Shape::Line(vertical_segment(pixel(anchor).x, area))],
            Drawing::HorizontalLine { anchor } => {
                let y = f64::from(pixel(anchor).y);
                vec![Shape::Line(Segment::new(
                    ScreenPos::new(f64::from(area.x), y),
                    ScreenPos::new(f64::from(area.right()), y),
                ))]
            }
            Drawing::Trendline { start, end } => vec![Shape::Line(extend_line(pixel(start), pixel(end), area))],
            Drawing::FreeLine { start, end } => vec![Shape::Line(Segment::new(
                pixel(start).into(),
                pixel(end).into(),
            ))],
            Drawing::ParallelLines { start, end, offset } => {
                let (p1, p2) = (pixel(start), pixel(end));
                let mut shapes = vec![Shape::Line(extend_line(p1, p2, area))];
                if let Some(offset) = offset {
                    shapes.extend(parallel_lines(p1, p2, pixel(offset), area).into_iter().map(Shape::Line));
                }
                shapes
            }
            Drawing::TimeFibonacci { anchor } => {
                let index = series.lower_bound(anchor.timestamp) as isize;
                let distance = projection.visible.end as isize - index - 1;
                time_fibonacci_sequence(distance)
                    .into_iter()
                    .map(|n| {
                        let x = projection.pixel_x_at(anchor.timestamp, n as isize, series) as i32;
                        Shape::FibonacciMarker {
                            line: vertical_segment(x, area),
                            label: n,
                        }
                    })
                    .collect()
            }
        }
    }

    /// Center of the erase affordance, or `None` if no part of the annotation
    /// is on screen.
    ///
    /// Candidates are tried in order and the first one inside the closed area
    /// wins: the anchors themselves, then where the drawn lines cross the border.
    pub fn erase_anchor(&self, series: &OhlcvSeries) -> Option<ScreenPos> {
        if self.projection.is_degenerate() {
            return None;
        }
        let projection = &self.projection;
        let area = projection.area;
        let pixel = |anchor: &AnchorPoint| anchor.to_pixel(projection, series);
        let inside = |pos: ScreenPos| area.contains_inclusive(pos).then_some(pos);

        match &self.drawing {
            Drawing::VerticalLine { anchor } | Drawing::TimeFibonacci { anchor } => {
                inside(ScreenPos::new(f64::from(pixel(anchor).x), f64::from(area.y)))
            }
            Drawing::HorizontalLine { anchor } => inside(ScreenPos::new(f64::from(area.x), f64::from(pixel(anchor).y))),
            Drawing::FreeLine { start, end } => {
                let (p1, p2) = (pixel(start), pixel(end));
                first_anchor_inside(area, &[p1, p2])
                    .or_else(|| border_hit(area, &Segment::new(p1.into(), p2.into())))
            }
            Drawing::Trendline { start, end } => {
                let (p1, p2) = (pixel(start), pixel(end));
                first_anchor_inside(area, &[p1, p2]).or_else(|| border_hit(area, &extend_line(p1, p2, area)))
            }
            Drawing::ParallelLines { start, end, offset } => {
                let (p1, p2) = (pixel(start), pixel(end));
                let p3 = offset.as_ref().map(pixel);
                let anchors: Vec<PixelPos> = [Some(p1), Some(p2), p3].into_iter().flatten().collect();
                first_anchor_inside(area, &anchors)
                    .or_else(|| border_hit(area, &extend_line(p1, p2, area)))
                    .or_else(|| {
                        p3.into_iter()
                            .flat_map(|p3| parallel_lines(p1, p2, p3, area))
                            .find_map(|line| border_hit(area, &line))
                    })
            }
        }
    }
}

fn vertical_segment(x: i32, area: PixelRect) -> Segment {
    let x = f64::from(x);
    Segment::new(
        ScreenPos::new(x, f64::from(area.y)),
        ScreenPos::new(x, f64::from(area.bottom())),
    )
}

fn first_anchor_inside(area: PixelRect, anchors: &[PixelPos]) -> Option<ScreenPos> {
    anchors
        .iter()
        .map(|&p| ScreenPos::from(p))
        .find(|&p| area.contains_inclusive(p))
}

/// First point where `line` crosses the area border.
fn border_hit(area: PixelRect, line: &Segment) -> Option<ScreenPos> {
    area.border_segments()
        .iter()
        .find_map(|border| crate::coords::segment_intersection(line, border))
}
