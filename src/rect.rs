use cgmath::*;
use num_traits::cast::NumCast;
use serde::*;

/// An axis-aligned rectangle, used for viewports.
#[derive(Copy, Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct Rect<T> {
    pub start: Point2<T>,
    pub end: Point2<T>,
}

impl<T> Rect<T> {
    pub fn new(start: Point2<T>, end: Point2<T>) -> Self {
        Self { start, end }
    }
}

impl<T: BaseNum> Rect<T> {
    /// A rectangle at the origin with the given size.
    pub fn from_size(size: Vector2<T>) -> Self {
        Rect::new(Point2::origin(), Point2::from_vec(size))
    }

    /// Returns the size of the `Rect`
    pub fn size(&self) -> Vector2<T> {
        self.end - self.start
    }

    /// Width divided by height, or `None` if the rectangle has no height.
    pub fn aspect(&self) -> Option<f32> {
        let size = self.size();
        let width: f32 = NumCast::from(size.x)?;
        let height: f32 = NumCast::from(size.y)?;
        if height > 0.0 && width > 0.0 {
            Some(width / height)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aspect() {
        let viewport = Rect::from_size(vec2(1280, 720));
        assert_eq!(viewport.size(), vec2(1280, 720));
        assert_eq!(viewport.aspect(), Some(1280.0 / 720.0));

        let offset = Rect::new(Point2::new(10u32, 10), Point2::new(30, 20));
        assert_eq!(offset.aspect(), Some(2.0));
    }

    #[test]
    fn test_empty_rect_has_no_aspect() {
        assert_eq!(Rect::from_size(vec2(300, 0)).aspect(), None);
        assert_eq!(Rect::from_size(vec2(0, 150)).aspect(), None);
    }
}
