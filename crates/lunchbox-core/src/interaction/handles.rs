//! Resize handles on a group's border.

use kurbo::{Point, Rect};

use crate::geometry::{distance_to_rect, square_around};
use crate::reposition::HorizontalEdge;

/// One of the eight resize grips around a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandlePosition {
    TopLeft,
    Top,
    TopRight,
    Left,
    Right,
    BottomLeft,
    Bottom,
    BottomRight,
}

impl HandlePosition {
    pub const ALL: [HandlePosition; 8] = [
        HandlePosition::TopLeft,
        HandlePosition::Top,
        HandlePosition::TopRight,
        HandlePosition::Left,
        HandlePosition::Right,
        HandlePosition::BottomLeft,
        HandlePosition::Bottom,
        HandlePosition::BottomRight,
    ];

    /// Where the handle sits on `frame`.
    pub fn center(self, frame: Rect) -> Point {
        let mid = frame.center();
        match self {
            HandlePosition::TopLeft => Point::new(frame.x0, frame.y0),
            HandlePosition::Top => Point::new(mid.x, frame.y0),
            HandlePosition::TopRight => Point::new(frame.x1, frame.y0),
            HandlePosition::Left => Point::new(frame.x0, mid.y),
            HandlePosition::Right => Point::new(frame.x1, mid.y),
            HandlePosition::BottomLeft => Point::new(frame.x0, frame.y1),
            HandlePosition::Bottom => Point::new(mid.x, frame.y1),
            HandlePosition::BottomRight => Point::new(frame.x1, frame.y1),
        }
    }

    /// The handle's square, centred on the border.
    pub fn rect(self, frame: Rect, size: f64) -> Rect {
        square_around(self.center(frame), size)
    }

    /// The horizontal edge this handle drags. Top and bottom grips move neither.
    pub fn horizontal_edge(self) -> Option<HorizontalEdge> {
        match self {
            HandlePosition::TopLeft | HandlePosition::Left | HandlePosition::BottomLeft => {
                Some(HorizontalEdge::Left)
            }
            HandlePosition::TopRight | HandlePosition::Right | HandlePosition::BottomRight => {
                Some(HorizontalEdge::Right)
            }
            HandlePosition::Top | HandlePosition::Bottom => None,
        }
    }
}

/// The resizing handle nearest to `point`, if within `threshold` of its square.
///
/// Group heights follow their content, so the top and bottom grips are drawn
/// but never picked.
pub fn handle_at(frame: Rect, point: Point, size: f64, threshold: f64) -> Option<HandlePosition> {
    HandlePosition::ALL
        .iter()
        .filter(|handle| handle.horizontal_edge().is_some())
        .map(|&handle| (handle, distance_to_rect(handle.rect(frame, size), point)))
        .filter(|(_, distance)| *distance <= threshold)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(handle, _)| handle)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: Rect = Rect::new(0.0, 0.0, 274.0, 100.0);

    #[test]
    fn test_handle_centers() {
        assert_eq!(HandlePosition::Right.center(FRAME), Point::new(274.0, 50.0));
        assert_eq!(HandlePosition::Bottom.center(FRAME), Point::new(137.0, 100.0));
        assert_eq!(
            HandlePosition::TopLeft.rect(FRAME, 10.0),
            Rect::new(-5.0, -5.0, 5.0, 5.0)
        );
    }

    #[test]
    fn test_handle_at_picks_nearest() {
        assert_eq!(
            handle_at(FRAME, Point::new(280.0, 48.0), 10.0, 22.0),
            Some(HandlePosition::Right)
        );
        assert_eq!(
            handle_at(FRAME, Point::new(-3.0, 98.0), 10.0, 22.0),
            Some(HandlePosition::BottomLeft)
        );
        assert_eq!(handle_at(FRAME, Point::new(137.0, 50.0), 10.0, 22.0), None);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        // right handle square ends at x = 279
        assert_eq!(
            handle_at(FRAME, Point::new(301.0, 50.0), 10.0, 22.0),
            Some(HandlePosition::Right)
        );
        assert_eq!(handle_at(FRAME, Point::new(301.5, 50.0), 10.0, 22.0), None);
    }

    #[test]
    fn test_top_and_bottom_grips_are_not_picked() {
        assert_eq!(handle_at(FRAME, Point::new(137.0, 0.0), 10.0, 22.0), None);
        assert_eq!(handle_at(FRAME, Point::new(137.0, 103.0), 10.0, 22.0), None);
        // near a corner the corner still wins
        assert_eq!(
            handle_at(FRAME, Point::new(10.0, 0.0), 10.0, 22.0),
            Some(HandlePosition::TopLeft)
        );
    }

    #[test]
    fn test_horizontal_edges() {
        assert_eq!(HandlePosition::TopLeft.horizontal_edge(), Some(HorizontalEdge::Left));
        assert_eq!(HandlePosition::BottomRight.horizontal_edge(), Some(HorizontalEdge::Right));
        assert_eq!(HandlePosition::Top.horizontal_edge(), None);
    }
}
