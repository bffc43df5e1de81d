//! Per-curve presentation state.

use serde::{Deserialize, Serialize};

pub const MIN_WIDTH: f64 = 1.0;
pub const MAX_WIDTH: f64 = 17.0;
pub const DEFAULT_WIDTH: f64 = 5.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// `[a, r, g, b]`, the order used by saved projects.
    pub fn to_argb(self) -> [u8; 4] {
        [self.a, self.r, self.g, self.b]
    }

    pub fn from_argb([a, r, g, b]: [u8; 4]) -> Self {
        Self { r, g, b, a }
    }

    /// Parse `#RRGGBB` or `#AARRGGBB`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim().trim_start_matches('#');
        let byte = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
        match hex.len() {
            6 => Some(Self::rgb(byte(0)?, byte(2)?, byte(4)?)),
            8 => Some(Self {
                a: byte(0)?,
                r: byte(2)?,
                g: byte(4)?,
                b: byte(6)?,
            }),
            _ => None,
        }
    }

    pub fn to_hex(self) -> String {
        if self.a == 255 {
            format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            format!("#{:02X}{:02X}{:02X}{:02X}", self.a, self.r, self.g, self.b)
        }
    }

    pub fn same_rgb(self, other: Rgba) -> bool {
        self.r == other.r && self.g == other.g && self.b == other.b
    }

    /// This colour with alpha taken from an opacity in `[0, 1]`.
    pub fn with_opacity(self, opacity: f64) -> Self {
        Self {
            a: (opacity.clamp(0.0, 1.0) * 255.0) as u8,
            ..self
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LineStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
    DenselyDashed,
}

impl LineStyle {
    pub const ALL: [LineStyle; 4] = [
        LineStyle::Solid,
        LineStyle::Dashed,
        LineStyle::Dotted,
        LineStyle::DenselyDashed,
    ];

    /// Glyph label stored in project files.
    pub fn label(self) -> &'static str {
        match self {
            LineStyle::Solid => " ——  ",
            LineStyle::Dashed => " — —",
            LineStyle::Dotted => " . . . . .",
            LineStyle::DenselyDashed => " - - - -",
        }
    }

    /// Unknown labels fall back to solid.
    pub fn from_label(label: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|s| s.label() == label)
            .unwrap_or_default()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CurveStyle {
    pub color: Rgba,
    pub width: f64,
    pub opacity: f64,
    pub line_style: LineStyle,
    pub marker_size: f64,
}

impl Default for CurveStyle {
    fn default() -> Self {
        Self {
            color: Rgba::rgb(0, 0, 255),
            width: DEFAULT_WIDTH,
            opacity: 1.0,
            line_style: LineStyle::Solid,
            marker_size: 0.0,
        }
    }
}

impl CurveStyle {
    /// Clamp every field into its displayable range.
    pub fn normalized(self) -> Self {
        Self {
            width: clamp_width(self.width),
            opacity: snap_opacity(self.opacity),
            marker_size: if self.marker_size.is_finite() {
                self.marker_size.max(0.0)
            } else {
                0.0
            },
            ..self
        }
    }

    /// Colour with the style's opacity applied.
    pub fn effective_color(&self) -> Rgba {
        self.color.with_opacity(self.opacity)
    }
}

/// Rounded to a whole pixel within `[1, 17]`.
pub fn clamp_width(width: f64) -> f64 {
    if width.is_nan() {
        return DEFAULT_WIDTH;
    }
    width.clamp(MIN_WIDTH, MAX_WIDTH).round()
}

/// Snapped to 0.1 steps within `[0, 1]`.
pub fn snap_opacity(opacity: f64) -> f64 {
    if opacity.is_nan() {
        return 1.0;
    }
    ((opacity * 10.0).round() / 10.0).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn width_is_clamped_and_rounded() {
        assert_eq!(clamp_width(0.2), 1.0);
        assert_eq!(clamp_width(4.6), 5.0);
        assert_eq!(clamp_width(40.0), 17.0);
        assert_eq!(clamp_width(f64::NAN), DEFAULT_WIDTH);
    }

    #[test]
    fn opacity_snaps() {
        assert_eq!(snap_opacity(0.44), 0.4);
        assert_eq!(snap_opacity(0.46), 0.5);
        assert_eq!(snap_opacity(-3.0), 0.0);
        assert_eq!(snap_opacity(1.7), 1.0);
    }

    #[test]
    fn hex_round_trip() {
        let c = Rgba::from_hex("#D32F2F").unwrap();
        assert_eq!(c, Rgba::rgb(0xD3, 0x2F, 0x2F));
        assert_eq!(c.to_hex(), "#D32F2F");
        let half = Rgba::from_hex("80FFFFFF").unwrap();
        assert_eq!(half.a, 0x80);
        assert_eq!(half.to_hex(), "#80FFFFFF");
        assert!(Rgba::from_hex("#12345").is_none());
        assert!(Rgba::from_hex("#GG0000").is_none());
    }

    #[test]
    fn argb_order() {
        let c = Rgba {
            r: 1,
            g: 2,
            b: 3,
            a: 4,
        };
        assert_eq!(c.to_argb(), [4, 1, 2, 3]);
        assert_eq!(Rgba::from_argb([4, 1, 2, 3]), c);
    }

    #[test]
    fn line_style_labels() {
        for style in LineStyle::ALL {
            assert_eq!(LineStyle::from_label(style.label()), style);
        }
        assert_eq!(LineStyle::from_label("zigzag"), LineStyle::Solid);
    }

    #[test]
    fn normalized_style() {
        let s = CurveStyle {
            width: 30.0,
            opacity: 0.33,
            marker_size: -2.0,
            ..CurveStyle::default()
        }
        .normalized();
        assert_eq!(s.width, 17.0);
        assert_eq!(s.opacity, 0.3);
        assert_eq!(s.marker_size, 0.0);
        assert_eq!(s.effective_color().a, 76);
    }
}
