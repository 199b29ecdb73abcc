use serde::{Deserialize, Serialize};

pub const POINTS_PER_INCH: f32 = 72.0;

/// Converts inches to PDF points.
pub fn inches(value: f32) -> f32 {
    value * POINTS_PER_INCH
}

/// A rectangle in page space with a top-left origin.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Shrinks the rectangle by `amount` on every side.
    pub fn inset(&self, amount: f32) -> Rect {
        Rect {
            x: self.x + amount,
            y: self.y + amount,
            width: (self.width - 2.0 * amount).max(0.0),
            height: (self.height - 2.0 * amount).max(0.0),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn zero() -> Self {
        Self {
            width: 0.0,
            height: 0.0,
        }
    }

    /// Scales `self` down to fit inside `bounds`, preserving aspect ratio.
    /// Never scales up.
    pub fn fit_within(self, bounds: Size) -> Size {
        if self.width <= 0.0 || self.height <= 0.0 {
            return Size::zero();
        }
        let scale = (bounds.width / self.width)
            .min(bounds.height / self.height)
            .min(1.0)
            .max(0.0);
        Size::new(self.width * scale, self.height * scale)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Portrait,
    Landscape,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum PageSize {
    A4,
    #[default]
    Letter,
    Legal,
    Custom { width: f32, height: f32 },
}

impl PageSize {
    /// Portrait dimensions in points.
    pub fn dimensions_pt(&self) -> Size {
        match *self {
            PageSize::A4 => Size::new(595.28, 841.89),
            PageSize::Letter => Size::new(612.0, 792.0),
            PageSize::Legal => Size::new(612.0, 1008.0),
            PageSize::Custom { width, height } => Size::new(width, height),
        }
    }

    /// Dimensions in points for the given orientation.
    pub fn oriented(&self, orientation: Orientation) -> Size {
        let Size { width, height } = self.dimensions_pt();
        let (short, long) = (width.min(height), width.max(height));
        match orientation {
            Orientation::Portrait => Size::new(short, long),
            Orientation::Landscape => Size::new(long, short),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_within_scales_down_preserving_aspect() {
        let fitted = Size::new(200.0, 100.0).fit_within(Size::new(100.0, 100.0));
        assert_eq!(fitted, Size::new(100.0, 50.0));
    }

    #[test]
    fn test_fit_within_never_upscales() {
        let fitted = Size::new(40.0, 30.0).fit_within(Size::new(100.0, 100.0));
        assert_eq!(fitted, Size::new(40.0, 30.0));
    }

    #[test]
    fn test_letter_orientations() {
        assert_eq!(PageSize::Letter.oriented(Orientation::Portrait), Size::new(612.0, 792.0));
        assert_eq!(PageSize::Letter.oriented(Orientation::Landscape), Size::new(792.0, 612.0));
    }

    #[test]
    fn test_rect_inset() {
        let r = Rect::new(10.0, 20.0, 100.0, 50.0).inset(4.0);
        assert_eq!(r, Rect::new(14.0, 24.0, 92.0, 42.0));
        assert_eq!(r.right(), 106.0);
        assert_eq!(r.bottom(), 66.0);
    }
}
