//! Snapping and alignment guides for interactive layer placement.
//!
//! Resolution is per-axis with a strict priority: sibling edges/centers
//! first, then the canvas centerlines, then the grid. The grid step always
//! resolves, so every drag lands somewhere deterministic. Guides are a
//! separate read-only query used for overlay feedback.

use crate::layers::Layer;
use kurbo::{Point, Rect, Size};

/// Distance threshold for element and centerline snapping (canvas pixels).
pub const SNAP_THRESHOLD: f64 = 10.0;

/// Grid cell size for fallback snapping.
pub const GRID_SIZE: f64 = 8.0;

/// Inputs shared by every snap query during a drag.
#[derive(Debug, Clone, Copy)]
pub struct SnapContext {
    pub canvas_size: Size,
    pub threshold: f64,
    pub grid_size: f64,
}

impl SnapContext {
    /// Context with the default threshold and grid size.
    pub fn new(canvas_size: Size) -> Self {
        Self {
            canvas_size,
            threshold: SNAP_THRESHOLD,
            grid_size: GRID_SIZE,
        }
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_grid_size(mut self, grid_size: f64) -> Self {
        self.grid_size = grid_size;
        self
    }
}

/// Result of a snap operation.
///
/// The snapped flags mark axes resolved against a sibling or centerline;
/// an axis that fell through to the grid leaves its flag clear.
#[derive(Debug, Clone, Copy)]
pub struct SnapResult {
    /// The adjusted position, clamped to the canvas.
    pub position: Point,
    /// Whether X aligned to a sibling or the vertical centerline.
    pub snapped_x: bool,
    /// Whether Y aligned to a sibling or the horizontal centerline.
    pub snapped_y: bool,
}

impl SnapResult {
    /// Check if either axis aligned to something.
    pub fn is_snapped(&self) -> bool {
        self.snapped_x || self.snapped_y
    }
}

/// Guide orientation. A vertical guide is a line of constant X.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Vertical,
    Horizontal,
}

/// What a guide aligns with, for overlay styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GuideKind {
    Edge,
    Center,
}

/// A single alignment guide line for the UI overlay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlignmentGuide {
    pub axis: Axis,
    /// X for vertical guides, Y for horizontal ones.
    pub position: f64,
    pub kind: GuideKind,
}

/// One axis of a bounding box: low edge plus extent.
#[derive(Debug, Clone, Copy)]
struct Span {
    min: f64,
    extent: f64,
}

impl Span {
    fn max(&self) -> f64 {
        self.min + self.extent
    }

    fn center(&self) -> f64 {
        self.min + self.extent / 2.0
    }

    fn x_of(rect: Rect) -> Self {
        Self {
            min: rect.x0,
            extent: rect.width(),
        }
    }

    fn y_of(rect: Rect) -> Self {
        Self {
            min: rect.y0,
            extent: rect.height(),
        }
    }
}

/// Test one axis of the moving box against one sibling span. Checks run in
/// a fixed order (min-min, max-max, min-max, max-min, center-center) and
/// the first hit within the threshold wins, returning the adjusted min
/// coordinate.
fn snap_axis_to_span(moving: Span, sibling: Span, threshold: f64) -> Option<f64> {
    if (moving.min - sibling.min).abs() <= threshold {
        return Some(sibling.min);
    }
    if (moving.max() - sibling.max()).abs() <= threshold {
        return Some(sibling.max() - moving.extent);
    }
    if (moving.min - sibling.max()).abs() <= threshold {
        return Some(sibling.max());
    }
    if (moving.max() - sibling.min).abs() <= threshold {
        return Some(sibling.min - moving.extent);
    }
    if (moving.center() - sibling.center()).abs() <= threshold {
        return Some(sibling.center() - moving.extent / 2.0);
    }
    None
}

/// Siblings that participate in snapping: everything except the moving
/// layer itself, the background, and hidden layers.
fn snap_targets<'a>(moving: &'a Layer, siblings: &'a [Layer]) -> impl Iterator<Item = &'a Layer> {
    let moving_id = moving.id();
    siblings
        .iter()
        .filter(move |s| s.id() != moving_id && !s.is_background() && s.visible())
}

/// Round to the nearest grid line.
fn snap_to_grid(value: f64, grid_size: f64) -> f64 {
    (value / grid_size).round() * grid_size
}

/// Adjust a candidate position for the layer being dragged.
///
/// `siblings` is the full layer sequence; the moving layer and the
/// background are skipped internally. Each axis resolves independently:
/// sibling alignment first (first matching sibling wins, scanning stops
/// once both axes are resolved), then the canvas centerline, then the
/// grid. The final position is clamped to the canvas.
pub fn snap_position(
    moving: &Layer,
    candidate: Point,
    siblings: &[Layer],
    ctx: &SnapContext,
) -> SnapResult {
    let size = moving.bounds().size();
    let moving_x = |x: f64| Span {
        min: x,
        extent: size.width,
    };
    let moving_y = |y: f64| Span {
        min: y,
        extent: size.height,
    };

    let mut x: Option<f64> = None;
    let mut y: Option<f64> = None;

    for sibling in snap_targets(moving, siblings) {
        let bounds = sibling.bounds();
        if x.is_none() {
            x = snap_axis_to_span(moving_x(candidate.x), Span::x_of(bounds), ctx.threshold);
        }
        if y.is_none() {
            y = snap_axis_to_span(moving_y(candidate.y), Span::y_of(bounds), ctx.threshold);
        }
        if x.is_some() && y.is_some() {
            break;
        }
    }

    // Canvas centerlines for axes the siblings did not claim.
    if x.is_none() {
        let canvas_center = ctx.canvas_size.width / 2.0;
        if (moving_x(candidate.x).center() - canvas_center).abs() <= ctx.threshold {
            x = Some(canvas_center - size.width / 2.0);
        }
    }
    if y.is_none() {
        let canvas_center = ctx.canvas_size.height / 2.0;
        if (moving_y(candidate.y).center() - canvas_center).abs() <= ctx.threshold {
            y = Some(canvas_center - size.height / 2.0);
        }
    }

    let snapped_x = x.is_some();
    let snapped_y = y.is_some();

    // Grid fallback guarantees both axes resolve.
    let x = x.unwrap_or_else(|| snap_to_grid(candidate.x, ctx.grid_size));
    let y = y.unwrap_or_else(|| snap_to_grid(candidate.y, ctx.grid_size));

    SnapResult {
        position: Point::new(
            x.clamp(0.0, ctx.canvas_size.width),
            y.clamp(0.0, ctx.canvas_size.height),
        ),
        snapped_x,
        snapped_y,
    }
}

fn push_guide(guides: &mut Vec<AlignmentGuide>, guide: AlignmentGuide) {
    // De-duplicated by (axis, position); the first kind to claim a line wins.
    if !guides
        .iter()
        .any(|g| g.axis == guide.axis && g.position == guide.position)
    {
        guides.push(guide);
    }
}

/// Alignment guides near the current position, for the UI overlay.
///
/// A read-only query, independent of whether `snap_position` actually
/// applied a snap: every sibling edge or center (and canvas centerline)
/// within threshold of the moving box produces one guide line,
/// de-duplicated by `(axis, position)`. The background contributes nothing.
pub fn alignment_guides(
    moving: &Layer,
    candidate: Point,
    siblings: &[Layer],
    ctx: &SnapContext,
) -> Vec<AlignmentGuide> {
    let size = moving.bounds().size();
    let x = Span {
        min: candidate.x,
        extent: size.width,
    };
    let y = Span {
        min: candidate.y,
        extent: size.height,
    };

    let mut guides = Vec::new();

    for sibling in snap_targets(moving, siblings) {
        let bounds = sibling.bounds();
        let sx = Span::x_of(bounds);
        let sy = Span::y_of(bounds);

        for edge in [sx.min, sx.max()] {
            let near = (x.min - edge).abs() <= ctx.threshold
                || (x.max() - edge).abs() <= ctx.threshold
                || (x.center() - edge).abs() <= ctx.threshold;
            if near {
                push_guide(
                    &mut guides,
                    AlignmentGuide {
                        axis: Axis::Vertical,
                        position: edge,
                        kind: GuideKind::Edge,
                    },
                );
            }
        }
        if (x.center() - sx.center()).abs() <= ctx.threshold {
            push_guide(
                &mut guides,
                AlignmentGuide {
                    axis: Axis::Vertical,
                    position: sx.center(),
                    kind: GuideKind::Center,
                },
            );
        }

        for edge in [sy.min, sy.max()] {
            let near = (y.min - edge).abs() <= ctx.threshold
                || (y.max() - edge).abs() <= ctx.threshold
                || (y.center() - edge).abs() <= ctx.threshold;
            if near {
                push_guide(
                    &mut guides,
                    AlignmentGuide {
                        axis: Axis::Horizontal,
                        position: edge,
                        kind: GuideKind::Edge,
                    },
                );
            }
        }
        if (y.center() - sy.center()).abs() <= ctx.threshold {
            push_guide(
                &mut guides,
                AlignmentGuide {
                    axis: Axis::Horizontal,
                    position: sy.center(),
                    kind: GuideKind::Center,
                },
            );
        }
    }

    // Canvas centerlines.
    let canvas_cx = ctx.canvas_size.width / 2.0;
    if (x.center() - canvas_cx).abs() <= ctx.threshold {
        push_guide(
            &mut guides,
            AlignmentGuide {
                axis: Axis::Vertical,
                position: canvas_cx,
                kind: GuideKind::Center,
            },
        );
    }
    let canvas_cy = ctx.canvas_size.height / 2.0;
    if (y.center() - canvas_cy).abs() <= ctx.threshold {
        push_guide(
            &mut guides,
            AlignmentGuide {
                axis: Axis::Horizontal,
                position: canvas_cy,
                kind: GuideKind::Center,
            },
        );
    }

    guides
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layers::{Background, BackgroundFill, Image, SerializableColor, Text};

    fn image_at(x: f64, y: f64, w: f64, h: f64) -> Layer {
        Layer::Image(Image::from_uri(Point::new(x, y), "test.png").with_size(w, h))
    }

    fn fixture() -> (Vec<Layer>, SnapContext) {
        let layers = vec![
            Layer::Background(Background::default()),
            Layer::Text(
                Text::new(Point::new(100.0, 100.0), "anchor".to_string()).with_size(200.0, 50.0),
            ),
        ];
        let ctx = SnapContext::new(Size::new(1050.0, 600.0));
        (layers, ctx)
    }

    #[test]
    fn test_drag_snaps_one_axis_and_grids_the_other() {
        // Text at (100,100) sized 200x50; a 100x100 image dragged to
        // (102,178): X snaps left-to-left onto 100, Y is out of range of
        // every edge and center pairing and falls through to the grid.
        let (layers, ctx) = fixture();
        let moving = image_at(0.0, 0.0, 100.0, 100.0);

        let result = snap_position(&moving, Point::new(102.0, 178.0), &layers, &ctx);

        assert!(result.snapped_x);
        assert!((result.position.x - 100.0).abs() < f64::EPSILON);
        assert!(!result.snapped_y);
        // Y resolved by the grid: an exact multiple of the cell size.
        assert_eq!(result.position.y % ctx.grid_size, 0.0);
        assert!((result.position.y - 176.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_cross_edge_alignment() {
        // A top edge dragged near a sibling's bottom edge attaches to it.
        let (layers, ctx) = fixture();
        let moving = image_at(0.0, 0.0, 100.0, 100.0);

        let result = snap_position(&moving, Point::new(400.0, 148.0), &layers, &ctx);
        assert!(result.snapped_y);
        assert!((result.position.y - 150.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_axes_resolve_independently() {
        let (layers, ctx) = fixture();
        let moving = image_at(0.0, 0.0, 100.0, 100.0);

        // Both axes within range of the anchor's top-left corner.
        let result = snap_position(&moving, Point::new(95.0, 104.0), &layers, &ctx);
        assert!(result.snapped_x && result.snapped_y);
        assert_eq!(result.position, Point::new(100.0, 100.0));
    }

    #[test]
    fn test_edge_test_order_right_to_right() {
        let (layers, ctx) = fixture();
        let moving = image_at(0.0, 0.0, 100.0, 100.0);

        // Right edge at 295 is within 10px of the anchor's right edge (300)
        // while the left edges are 195 apart.
        let result = snap_position(&moving, Point::new(195.0, 400.0), &layers, &ctx);
        assert!(result.snapped_x);
        assert!((result.position.x - 200.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_sibling_beats_centerline() {
        // Candidate within threshold of both a sibling's left edge (148)
        // and the canvas centerline (center 205 vs 200): the sibling edge
        // wins, so X lands on 148, not the centerline's 150.
        let ctx = SnapContext::new(Size::new(400.0, 400.0));
        let layers = vec![
            Layer::Background(Background::default()),
            image_at(148.0, 10.0, 80.0, 80.0),
        ];
        let moving = image_at(0.0, 0.0, 100.0, 100.0);

        let result = snap_position(&moving, Point::new(155.0, 300.0), &layers, &ctx);
        assert!(result.snapped_x);
        assert!((result.position.x - 148.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_centerline_when_no_sibling_matches() {
        let ctx = SnapContext::new(Size::new(400.0, 400.0));
        let layers = vec![Layer::Background(Background::default())];
        let moving = image_at(0.0, 0.0, 100.0, 100.0);

        // Center at 153 is within 10px of the 200 centerline? No: 47 away.
        let off = snap_position(&moving, Point::new(103.0, 50.0), &layers, &ctx);
        assert!(!off.snapped_x);

        // Center at 145+50=195, within threshold of 200.
        let near = snap_position(&moving, Point::new(145.0, 50.0), &layers, &ctx);
        assert!(near.snapped_x);
        assert!((near.position.x - 150.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_grid_fallback_multiples() {
        let ctx = SnapContext::new(Size::new(1050.0, 600.0));
        let layers = vec![Layer::Background(Background::default())];
        let moving = image_at(0.0, 0.0, 30.0, 30.0);

        let result = snap_position(&moving, Point::new(443.0, 301.0), &layers, &ctx);
        assert!(!result.is_snapped());
        assert_eq!(result.position.x % ctx.grid_size, 0.0);
        assert_eq!(result.position.y % ctx.grid_size, 0.0);
        assert_eq!(result.position, Point::new(440.0, 304.0));
    }

    #[test]
    fn test_position_clamped_to_canvas() {
        let ctx = SnapContext::new(Size::new(200.0, 200.0));
        let layers = vec![Layer::Background(Background::default())];
        let moving = image_at(0.0, 0.0, 50.0, 50.0);

        let result = snap_position(&moving, Point::new(-40.0, 900.0), &layers, &ctx);
        assert!(result.position.x >= 0.0);
        assert!(result.position.y <= 200.0);
    }

    #[test]
    fn test_background_is_never_a_snap_target() {
        // Only the background present: nothing within element or centerline
        // range of the origin corner, so the grid resolves.
        let ctx = SnapContext::new(Size::new(1050.0, 600.0));
        let layers = vec![Layer::Background(Background::new(BackgroundFill::Solid(
            SerializableColor::white(),
        )))];
        let moving = image_at(0.0, 0.0, 20.0, 20.0);

        // The background's own position is (0,0); a candidate at (3,3)
        // must not be treated as an edge match against it.
        let result = snap_position(&moving, Point::new(3.0, 3.0), &layers, &ctx);
        assert!(!result.is_snapped());

        assert!(alignment_guides(&moving, Point::new(3.0, 3.0), &layers, &ctx).is_empty());
    }

    #[test]
    fn test_hidden_siblings_are_skipped() {
        let (mut layers, ctx) = fixture();
        layers[1].set_visible(false);
        let moving = image_at(0.0, 0.0, 100.0, 100.0);

        let result = snap_position(&moving, Point::new(102.0, 148.0), &layers, &ctx);
        assert!(!result.snapped_x);
    }

    #[test]
    fn test_moving_layer_does_not_snap_to_itself() {
        let ctx = SnapContext::new(Size::new(1050.0, 600.0));
        let moving = image_at(100.0, 100.0, 50.0, 50.0);
        let layers = vec![Layer::Background(Background::default()), moving.clone()];

        // Dragged 3px off its stored position: a self-match would pin it
        // back to 100 even though no other sibling exists.
        let result = snap_position(&moving, Point::new(103.0, 103.0), &layers, &ctx);
        assert!(!result.is_snapped());
    }

    #[test]
    fn test_guides_near_anchor_edges() {
        let (layers, ctx) = fixture();
        let moving = image_at(0.0, 0.0, 100.0, 100.0);

        let guides = alignment_guides(&moving, Point::new(102.0, 104.0), &layers, &ctx);

        assert!(guides.contains(&AlignmentGuide {
            axis: Axis::Vertical,
            position: 100.0,
            kind: GuideKind::Edge,
        }));
        assert!(guides.contains(&AlignmentGuide {
            axis: Axis::Horizontal,
            position: 100.0,
            kind: GuideKind::Edge,
        }));
    }

    #[test]
    fn test_guides_deduplicated() {
        // Two anchors sharing a left edge must yield one guide line.
        let ctx = SnapContext::new(Size::new(1050.0, 600.0));
        let layers = vec![
            Layer::Background(Background::default()),
            image_at(100.0, 0.0, 50.0, 50.0),
            image_at(100.0, 300.0, 50.0, 50.0),
        ];
        let moving = image_at(0.0, 0.0, 40.0, 40.0);

        let guides = alignment_guides(&moving, Point::new(104.0, 500.0), &layers, &ctx);
        let at_100: Vec<_> = guides
            .iter()
            .filter(|g| g.axis == Axis::Vertical && g.position == 100.0)
            .collect();
        assert_eq!(at_100.len(), 1);
    }

    #[test]
    fn test_canvas_centerline_guide() {
        let ctx = SnapContext::new(Size::new(400.0, 400.0));
        let layers = vec![Layer::Background(Background::default())];
        let moving = image_at(0.0, 0.0, 100.0, 100.0);

        let guides = alignment_guides(&moving, Point::new(147.0, 50.0), &layers, &ctx);
        assert!(guides.contains(&AlignmentGuide {
            axis: Axis::Vertical,
            position: 200.0,
            kind: GuideKind::Center,
        }));
    }
}
