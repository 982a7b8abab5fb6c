//! Line geometry for annotation tools.

use crate::coords::{PixelPos, PixelRect, ScreenPos, Segment};

pub use crate::coords::segment_intersection;

/// Upper bound on lines generated per direction by [`parallel_lines`].
pub const MAX_PARALLEL_LINES: usize = 512;

/// Extend the line through `a` and `b` to the left and right edges of `area`.
///
/// Vertical lines span the full height and horizontal lines the full width.
/// Sloped endpoints are rounded to whole pixels.
pub fn extend_line(a: PixelPos, b: PixelPos, area: PixelRect) -> Segment {
    let (left, right) = (f64::from(area.x), f64::from(area.right()));
    if a.x == b.x {
        let x = f64::from(a.x);
        return Segment::new(ScreenPos::new(x, f64::from(area.y)), ScreenPos::new(x, f64::from(area.bottom())));
    }
    if a.y == b.y {
        let y = f64::from(a.y);
        return Segment::new(ScreenPos::new(left, y), ScreenPos::new(right, y));
    }

    let (m, intercept) = slope_intercept(a, b);
    Segment::new(
        ScreenPos::new(left, (m * left + intercept).round()),
        ScreenPos::new(right, (m * right + intercept).round()),
    )
}

/// Lines parallel to `a`-`b`, spaced by the distance from the base line to
/// `offset`, in both directions until they leave `area`.
///
/// The base line itself is not included. Zero spacing yields no lines.
pub fn parallel_lines(a: PixelPos, b: PixelPos, offset: PixelPos, area: PixelRect) -> Vec<Segment> {
    let (top, bottom) = (f64::from(area.y), f64::from(area.bottom()));
    let (left, right) = (f64::from(area.x), f64::from(area.right()));

    let (base, step) = if a.x == b.x {
        let x = f64::from(a.x);
        let distance = f64::from((offset.x - a.x).abs());
        (Segment::new(ScreenPos::new(x, top), ScreenPos::new(x, bottom)), (distance, 0.0))
    } else if a.y == b.y {
        let y = f64::from(a.y);
        let distance = f64::from((offset.y - a.y).abs());
        (Segment::new(ScreenPos::new(left, y), ScreenPos::new(right, y)), (0.0, distance))
    } else {
        // y = mx + b, shifted by the intercept difference
        let (m, intercept) = slope_intercept(a, b);
        let offset_intercept = f64::from(offset.y) - m * f64::from(offset.x);
        let distance = (offset_intercept - intercept).abs();
        (
            Segment::new(
                ScreenPos::new(left, m * left + intercept),
                ScreenPos::new(right, m * right + intercept),
            ),
            (0.0, distance),
        )
    };

    let mut lines = Vec::new();
    if step == (0.0, 0.0) || area.is_empty() {
        return lines;
    }

    for direction in [1.0, -1.0] {
        let mut produced = 0;
        loop {
            let k = (produced + 1) as f64 * direction;
            let line = round_segment(base.translated(step.0 * k, step.1 * k));
            if !area.intersects_segment(&line) {
                break;
            }
            if produced == MAX_PARALLEL_LINES {
                log::warn!("Parallel line family truncated at {} lines", MAX_PARALLEL_LINES);
                break;
            }
            lines.push(line);
            produced += 1;
        }
    }

    lines
}

/// Fibonacci numbers `0, 1, 1, 2, 3, 5, ...` not exceeding `distance`.
///
/// Negative distances yield an empty sequence.
pub fn time_fibonacci_sequence(distance: isize) -> Vec<usize> {
    let mut sequence = Vec::new();
    if distance < 0 {
        return sequence;
    }
    let limit = distance as usize;

    let (mut previous, mut current) = (0usize, 1usize);
    sequence.push(previous);
    while current <= limit {
        sequence.push(current);
        let next = previous.saturating_add(current);
        previous = current;
        current = next;
    }
    sequence
}

fn slope_intercept(a: PixelPos, b: PixelPos) -> (f64, f64) {
    let m = f64::from(b.y - a.y) / f64::from(b.x - a.x);
    (m, f64::from(a.y) - m * f64::from(a.x))
}

fn round_segment(segment: Segment) -> Segment {
    Segment::new(
        ScreenPos::new(segment.start.x.round(), segment.start.y.round()),
        ScreenPos::new(segment.end.x.round(), segment.end.y.round()),
    )
}
