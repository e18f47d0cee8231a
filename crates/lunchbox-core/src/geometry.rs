//! Rectangle helpers shared by the sizing and repositioning engines.

use kurbo::{Point, Rect, Size};

/// Round a length to the nearest half unit.
pub fn half_point_aligned(value: f64) -> f64 {
    (value * 2.0).round() / 2.0
}

/// Round every edge of a rectangle to the nearest half unit.
pub fn half_point_aligned_rect(rect: Rect) -> Rect {
    Rect::from_origin_size(
        Point::new(half_point_aligned(rect.x0), half_point_aligned(rect.y0)),
        Size::new(
            half_point_aligned(rect.width()),
            half_point_aligned(rect.height()),
        ),
    )
}

/// True when the two rectangles share interior area. Touching edges do not count.
pub fn intersects(a: Rect, b: Rect) -> bool {
    a.x0 < b.x1 && a.x1 > b.x0 && a.y0 < b.y1 && a.y1 > b.y0
}

/// True when the horizontal extents overlap, edges included.
pub fn overlaps_horizontally(a: Rect, b: Rect) -> bool {
    a.x0 <= b.x1 && a.x1 >= b.x0
}

/// The overlapping region of two rectangles, or `None` when they only touch or are apart.
pub fn intersection(a: Rect, b: Rect) -> Option<Rect> {
    if !intersects(a, b) {
        return None;
    }
    Some(Rect::new(
        a.x0.max(b.x0),
        a.y0.max(b.y0),
        a.x1.min(b.x1),
        a.y1.min(b.y1),
    ))
}

/// Bounding rectangle of all the given rectangles.
pub fn union_all<I: IntoIterator<Item = Rect>>(rects: I) -> Option<Rect> {
    rects.into_iter().reduce(|acc, r| acc.union(r))
}

/// Move a rectangle so its top edge sits at `y`.
pub fn with_min_y(rect: Rect, y: f64) -> Rect {
    rect.with_origin(Point::new(rect.x0, y))
}

/// Shrink `rect` away from `region`, cutting the region's width off whichever
/// horizontal side of `rect` is closer to it.
///
/// An empty region leaves the rectangle untouched.
pub fn subtract_from_nearest_horizontal_side(rect: Rect, region: Rect) -> Rect {
    if region.width() <= 0.0 || region.height() <= 0.0 {
        return rect;
    }
    let amount = region.width().min(rect.width());
    if (region.x1 - rect.x0).abs() < (rect.x1 - region.x0).abs() {
        Rect::new(rect.x0 + amount, rect.y0, rect.x1, rect.y1)
    } else {
        Rect::new(rect.x0, rect.y0, rect.x1 - amount, rect.y1)
    }
}

/// Distance from a point to the closest point of a rectangle (zero inside).
pub fn distance_to_rect(rect: Rect, point: Point) -> f64 {
    let dx = (rect.x0 - point.x).max(0.0).max(point.x - rect.x1);
    let dy = (rect.y0 - point.y).max(0.0).max(point.y - rect.y1);
    (dx * dx + dy * dy).sqrt()
}

/// Square of the given edge length centred on a point.
pub fn square_around(center: Point, side: f64) -> Rect {
    Rect::from_center_size(center, Size::new(side, side))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_half_point_aligned() {
        assert_eq!(half_point_aligned(10.2), 10.0);
        assert_eq!(half_point_aligned(10.3), 10.5);
        assert_eq!(half_point_aligned(10.8), 11.0);
    }

    #[test]
    fn test_touching_rects_do_not_intersect() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(10.0, 0.0, 20.0, 10.0);
        assert!(!intersects(a, b));
        assert!(overlaps_horizontally(a, b));
        assert!(intersection(a, b).is_none());
    }

    #[test]
    fn test_intersection() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 20.0, 20.0);
        assert_eq!(intersection(a, b), Some(Rect::new(5.0, 5.0, 10.0, 10.0)));
    }

    #[test]
    fn test_union_all() {
        let rects = [Rect::new(0.0, 0.0, 10.0, 10.0), Rect::new(20.0, 5.0, 30.0, 40.0)];
        assert_eq!(union_all(rects), Some(Rect::new(0.0, 0.0, 30.0, 40.0)));
        assert_eq!(union_all(Vec::<Rect>::new()), None);
    }

    #[test]
    fn test_subtract_from_right_side() {
        let rect = Rect::new(0.0, 0.0, 300.0, 100.0);
        let region = Rect::new(280.0, 0.0, 300.0, 50.0);
        assert_eq!(
            subtract_from_nearest_horizontal_side(rect, region),
            Rect::new(0.0, 0.0, 280.0, 100.0)
        );
    }

    #[test]
    fn test_subtract_from_left_side() {
        let rect = Rect::new(100.0, 0.0, 400.0, 100.0);
        let region = Rect::new(100.0, 20.0, 130.0, 50.0);
        assert_eq!(
            subtract_from_nearest_horizontal_side(rect, region),
            Rect::new(130.0, 0.0, 400.0, 100.0)
        );
    }

    #[test]
    fn test_subtract_empty_region() {
        let rect = Rect::new(0.0, 0.0, 300.0, 100.0);
        assert_eq!(subtract_from_nearest_horizontal_side(rect, Rect::ZERO), rect);
    }

    #[test]
    fn test_distance_to_rect() {
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert_eq!(distance_to_rect(rect, Point::new(5.0, 5.0)), 0.0);
        assert_eq!(distance_to_rect(rect, Point::new(13.0, 14.0)), 5.0);
    }
}
