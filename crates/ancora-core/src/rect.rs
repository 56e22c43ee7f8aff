/// A rectangle representing a window's or monitor's position and size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

/// A point in virtual-screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl Rect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge (exclusive).
    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    /// Bottom edge (exclusive).
    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    /// Horizontal center of the rectangle.
    pub fn center_x(&self) -> i32 {
        self.x + self.width / 2
    }

    /// Vertical center of the rectangle.
    pub fn center_y(&self) -> i32 {
        self.y + self.height / 2
    }

    /// Top-left corner.
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Returns whether the rectangle has no area.
    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Returns whether the point lies within the rectangle.
    pub fn contains_point(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Returns whether `other` lies entirely within this rectangle.
    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Returns the rectangle grown by `margin` pixels on every side.
    pub fn expanded(&self, margin: i32) -> Rect {
        Rect::new(
            self.x - margin,
            self.y - margin,
            self.width + 2 * margin,
            self.height + 2 * margin,
        )
    }

    /// Area of the overlap with `other`, in pixels. Zero when disjoint.
    pub fn intersection_area(&self, other: &Rect) -> i64 {
        let w = (self.right().min(other.right()) - self.x.max(other.x)).max(0);
        let h = (self.bottom().min(other.bottom()) - self.y.max(other.y)).max(0);
        w as i64 * h as i64
    }

    /// Returns the number of overlapping pixels along the vertical axis.
    ///
    /// A positive value means the rectangles share vertical space,
    /// which is what makes two side-by-side monitors adjacent.
    pub fn vertical_overlap(&self, other: &Rect) -> i32 {
        let top = self.y.max(other.y);
        let bottom = self.bottom().min(other.bottom());
        (bottom - top).max(0)
    }

    /// Returns the number of overlapping pixels along the horizontal axis.
    pub fn horizontal_overlap(&self, other: &Rect) -> i32 {
        let left = self.x.max(other.x);
        let right = self.right().min(other.right());
        (right - left).max(0)
    }

    /// Squared Euclidean distance between the centers of two rectangles.
    pub fn center_distance_sq(&self, other: &Rect) -> i64 {
        let dx = (self.center_x() - other.center_x()) as i64;
        let dy = (self.center_y() - other.center_y()) as i64;
        dx * dx + dy * dy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edges_and_centers() {
        let r = Rect::new(10, 20, 100, 50);
        assert_eq!(r.right(), 110);
        assert_eq!(r.bottom(), 70);
        assert_eq!(r.center_x(), 60);
        assert_eq!(r.center_y(), 45);
        assert_eq!(r.position(), Point::new(10, 20));
    }

    #[test]
    fn contains_rect_is_inclusive_of_edges() {
        let outer = Rect::new(0, 0, 100, 100);
        assert!(outer.contains_rect(&Rect::new(0, 0, 100, 100)));
        assert!(outer.contains_rect(&Rect::new(10, 10, 80, 80)));
        assert!(!outer.contains_rect(&Rect::new(10, 10, 95, 80)));
        assert!(!outer.contains_rect(&Rect::new(-1, 0, 50, 50)));
    }

    #[test]
    fn expanded_grows_every_side() {
        let r = Rect::new(100, 100, 10, 10).expanded(10);
        assert_eq!(r, Rect::new(90, 90, 30, 30));
    }

    #[test]
    fn intersection_area_of_disjoint_rects_is_zero() {
        let a = Rect::new(0, 0, 100, 100);
        let b = Rect::new(200, 0, 100, 100);
        assert_eq!(a.intersection_area(&b), 0);
    }

    #[test]
    fn intersection_area_of_overlap() {
        let a = Rect::new(0, 0, 100, 100);
        let b = Rect::new(50, 50, 100, 100);
        assert_eq!(a.intersection_area(&b), 50 * 50);
    }

    #[test]
    fn empty_rect() {
        assert!(Rect::default().is_empty());
        assert!(Rect::new(5, 5, 0, 10).is_empty());
        assert!(!Rect::new(5, 5, 1, 1).is_empty());
    }
}
