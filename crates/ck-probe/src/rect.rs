//! Pixel rectangles. Y grows downward.

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PixelRect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl PixelRect {
    pub fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn from_origin_size(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self::new(left, top, left + width, top + height)
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    pub fn center_y(&self) -> f64 {
        (self.top + self.bottom) / 2.0
    }

    /// Positive-area intersection; shared edges do not count.
    pub fn overlaps(&self, other: &PixelRect) -> bool {
        self.left < other.right
            && other.left < self.right
            && self.top < other.bottom
            && other.top < self.bottom
    }

    pub fn translated_y(&self, dy: f64) -> Self {
        Self {
            top: self.top + dy,
            bottom: self.bottom + dy,
            ..*self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlap_is_strict() {
        let a = PixelRect::new(0.0, 0.0, 10.0, 10.0);
        assert!(a.overlaps(&PixelRect::new(5.0, 5.0, 15.0, 15.0)));
        assert!(!a.overlaps(&PixelRect::new(10.0, 0.0, 20.0, 10.0)));
        assert!(!a.overlaps(&PixelRect::new(0.0, 10.0, 10.0, 20.0)));
        assert!(!a.overlaps(&PixelRect::new(0.0, 11.0, 10.0, 20.0)));
    }

    #[test]
    fn translate() {
        let r = PixelRect::from_origin_size(1.0, 2.0, 3.0, 4.0).translated_y(10.0);
        assert_eq!(r, PixelRect::new(1.0, 12.0, 4.0, 16.0));
        assert_eq!(r.height(), 4.0);
        assert_eq!(r.width(), 3.0);
    }
}
