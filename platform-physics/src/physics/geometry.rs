// Copyright 2025 John Brosnihan
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//! 2D geometry primitives
//!
//! World space is y-up. Rectangles are axis-aligned and anchored at their
//! minimum (bottom-left) corner. Overlap tests are strict: shapes that only
//! share an edge do not overlap.

/// 2D vector with double-precision components
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector2 {
    /// X component
    pub x: f64,
    /// Y component
    pub y: f64,
}

impl Vector2 {
    /// Create a new vector
    pub fn new(x: f64, y: f64) -> Self {
        Vector2 { x, y }
    }

    /// The zero vector
    pub fn zero() -> Self {
        Vector2::new(0.0, 0.0)
    }

    /// Vector with both components set to `value`
    pub fn splat(value: f64) -> Self {
        Vector2::new(value, value)
    }

    /// Check if both components are finite
    pub fn is_valid(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Euclidean length
    pub fn length(&self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }
}

impl std::ops::Add for Vector2 {
    type Output = Vector2;

    fn add(self, rhs: Vector2) -> Vector2 {
        Vector2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl std::ops::Sub for Vector2 {
    type Output = Vector2;

    fn sub(self, rhs: Vector2) -> Vector2 {
        Vector2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl std::ops::Mul<f64> for Vector2 {
    type Output = Vector2;

    fn mul(self, rhs: f64) -> Vector2 {
        Vector2::new(self.x * rhs, self.y * rhs)
    }
}

/// Axis-aligned rectangle anchored at its bottom-left corner
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// Minimum x
    pub x: f64,
    /// Minimum y
    pub y: f64,
    /// Extent along x, assumed non-negative
    pub width: f64,
    /// Extent along y, assumed non-negative
    pub height: f64,
}

impl Rect {
    /// Create a rectangle from its bottom-left corner and size
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Rect {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a rectangle of the given size centered on `center`
    pub fn centered(center: Vector2, width: f64, height: f64) -> Self {
        Rect::new(
            center.x - width / 2.0,
            center.y - height / 2.0,
            width,
            height,
        )
    }

    /// Maximum x
    pub fn max_x(&self) -> f64 {
        self.x + self.width
    }

    /// Maximum y
    pub fn max_y(&self) -> f64 {
        self.y + self.height
    }

    /// Center point
    pub fn center(&self) -> Vector2 {
        Vector2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Move the rectangle so its center is at `center`
    pub fn set_center(&mut self, center: Vector2) {
        self.x = center.x - self.width / 2.0;
        self.y = center.y - self.height / 2.0;
    }

    /// Translate by `(dx, dy)`
    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.x += dx;
        self.y += dy;
    }

    /// Do the interiors of the rectangles intersect?
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.max_x()
            && self.max_x() > other.x
            && self.y < other.max_y()
            && self.max_y() > other.y
    }

    /// Intersection rectangle, if the rectangles overlap
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        if !self.overlaps(other) {
            return None;
        }
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        Some(Rect::new(
            x,
            y,
            self.max_x().min(other.max_x()) - x,
            self.max_y().min(other.max_y()) - y,
        ))
    }

    /// Does the rectangle strictly contain the point?
    pub fn contains(&self, point: Vector2) -> bool {
        point.x > self.x && point.x < self.max_x() && point.y > self.y && point.y < self.max_y()
    }

    /// Check if all fields are finite and the size is non-negative
    pub fn is_valid(&self) -> bool {
        self.x.is_finite()
            && self.y.is_finite()
            && self.width.is_finite()
            && self.height.is_finite()
            && self.width >= 0.0
            && self.height >= 0.0
    }
}

/// Circle given by center and radius
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Circle {
    /// Center point
    pub center: Vector2,
    /// Radius, assumed non-negative
    pub radius: f64,
}

impl Circle {
    /// Create a new circle
    pub fn new(center: Vector2, radius: f64) -> Self {
        Circle { center, radius }
    }

    /// Do the circles' interiors intersect?
    pub fn overlaps(&self, other: &Circle) -> bool {
        let d = self.center - other.center;
        let r = self.radius + other.radius;
        d.x * d.x + d.y * d.y < r * r
    }

    /// Does the circle intersect the rectangle's interior?
    pub fn overlaps_rect(&self, rect: &Rect) -> bool {
        let closest_x = self.center.x.clamp(rect.x, rect.max_x());
        let closest_y = self.center.y.clamp(rect.y, rect.max_y());
        let dx = self.center.x - closest_x;
        let dy = self.center.y - closest_y;
        dx * dx + dy * dy < self.radius * self.radius
    }

    /// Smallest rectangle containing the circle
    pub fn bounds(&self) -> Rect {
        Rect::centered(self.center, self.radius * 2.0, self.radius * 2.0)
    }
}

/// Collision shape of a fixture
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    /// Axis-aligned rectangle
    Rect(Rect),
    /// Circle
    Circle(Circle),
}

impl Shape {
    /// Center point
    pub fn center(&self) -> Vector2 {
        match self {
            Shape::Rect(rect) => rect.center(),
            Shape::Circle(circle) => circle.center,
        }
    }

    /// Move the shape so its center is at `center`
    pub fn set_center(&mut self, center: Vector2) {
        match self {
            Shape::Rect(rect) => rect.set_center(center),
            Shape::Circle(circle) => circle.center = center,
        }
    }

    /// Axis-aligned bounding box
    pub fn bounds(&self) -> Rect {
        match self {
            Shape::Rect(rect) => *rect,
            Shape::Circle(circle) => circle.bounds(),
        }
    }

    /// Do the shapes' interiors intersect?
    pub fn overlaps(&self, other: &Shape) -> bool {
        match (self, other) {
            (Shape::Rect(a), Shape::Rect(b)) => a.overlaps(b),
            (Shape::Circle(a), Shape::Circle(b)) => a.overlaps(b),
            (Shape::Circle(c), Shape::Rect(r)) | (Shape::Rect(r), Shape::Circle(c)) => {
                c.overlaps_rect(r)
            }
        }
    }
}

impl From<Rect> for Shape {
    fn from(rect: Rect) -> Self {
        Shape::Rect(rect)
    }
}

impl From<Circle> for Shape {
    fn from(circle: Circle) -> Self {
        Shape::Circle(circle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vector_ops() {
        let a = Vector2::new(1.0, 2.0);
        let b = Vector2::new(3.0, 4.0);
        assert_eq!(a + b, Vector2::new(4.0, 6.0));
        assert_eq!(b - a, Vector2::new(2.0, 2.0));
        assert_eq!(a * 2.0, Vector2::new(2.0, 4.0));
        assert_eq!(Vector2::new(3.0, 4.0).length(), 5.0);
    }

    #[test]
    fn test_rect_center_round_trip() {
        let mut rect = Rect::new(0.0, 0.0, 4.0, 2.0);
        assert_eq!(rect.center(), Vector2::new(2.0, 1.0));

        rect.set_center(Vector2::new(10.0, 10.0));
        assert_eq!(rect, Rect::new(8.0, 9.0, 4.0, 2.0));
    }

    #[test]
    fn test_rect_touching_edges_do_not_overlap() {
        let a = Rect::new(0.0, 0.0, 1.0, 1.0);
        let b = Rect::new(1.0, 0.0, 1.0, 1.0);
        assert!(!a.overlaps(&b));
        assert!(a.intersection(&b).is_none());
    }

    #[test]
    fn test_rect_intersection() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 8.0, 10.0, 10.0);
        let overlap = a.intersection(&b).unwrap();
        assert_eq!(overlap, Rect::new(5.0, 8.0, 5.0, 2.0));
    }

    #[test]
    fn test_rect_validation() {
        assert!(Rect::new(0.0, 0.0, 1.0, 1.0).is_valid());
        assert!(!Rect::new(f64::NAN, 0.0, 1.0, 1.0).is_valid());
        assert!(!Rect::new(0.0, 0.0, -1.0, 1.0).is_valid());
    }

    #[test]
    fn test_circle_overlaps() {
        let a = Circle::new(Vector2::new(0.0, 0.0), 1.0);
        let b = Circle::new(Vector2::new(1.5, 0.0), 1.0);
        let c = Circle::new(Vector2::new(2.0, 0.0), 1.0);
        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c));
    }

    #[test]
    fn test_circle_rect_overlap() {
        let circle = Circle::new(Vector2::new(0.0, 0.0), 1.0);
        assert!(circle.overlaps_rect(&Rect::new(0.5, -0.5, 2.0, 1.0)));
        // Corner is sqrt(2) * 0.9 away
        assert!(!circle.overlaps_rect(&Rect::new(0.9, 0.9, 1.0, 1.0)));
    }

    #[test]
    fn test_shape_dispatch_is_symmetric() {
        let rect: Shape = Rect::new(0.5, -0.5, 2.0, 1.0).into();
        let circle: Shape = Circle::new(Vector2::zero(), 1.0).into();
        assert!(rect.overlaps(&circle));
        assert!(circle.overlaps(&rect));
        assert_eq!(circle.bounds(), Rect::new(-1.0, -1.0, 2.0, 2.0));
    }
}
