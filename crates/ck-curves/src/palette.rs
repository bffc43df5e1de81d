//! Automatic curve colours.

use crate::style::Rgba;

pub const PALETTE: [Rgba; 36] = [
    Rgba::rgb(0xD3, 0x2F, 0x2F),
    Rgba::rgb(0xFF, 0x52, 0x52),
    Rgba::rgb(0xFF, 0x8A, 0x80),
    Rgba::rgb(0x19, 0x76, 0xD2),
    Rgba::rgb(0x44, 0x8A, 0xFF),
    Rgba::rgb(0x82, 0xB1, 0xFF),
    Rgba::rgb(0x00, 0xC8, 0x53),
    Rgba::rgb(0x69, 0xF0, 0xAE),
    Rgba::rgb(0xB9, 0xF6, 0xCA),
    Rgba::rgb(0x9C, 0x27, 0xB0),
    Rgba::rgb(0xCE, 0x93, 0xD8),
    Rgba::rgb(0xE1, 0xBE, 0xE7),
    Rgba::rgb(0xFB, 0xC0, 0x2D),
    Rgba::rgb(0xFF, 0xEB, 0x3B),
    Rgba::rgb(0xFF, 0xF5, 0x9D),
    Rgba::rgb(0x00, 0x97, 0xA7),
    Rgba::rgb(0x4D, 0xD0, 0xE1),
    Rgba::rgb(0xB2, 0xEB, 0xF2),
    Rgba::rgb(0xF5, 0x7C, 0x00),
    Rgba::rgb(0xFF, 0xB7, 0x4D),
    Rgba::rgb(0xFF, 0xE0, 0xB2),
    Rgba::rgb(0xC2, 0x18, 0x5B),
    Rgba::rgb(0xF4, 0x8F, 0xB1),
    Rgba::rgb(0xF8, 0xBB, 0xD0),
    Rgba::rgb(0x5D, 0x40, 0x37),
    Rgba::rgb(0xA1, 0x88, 0x7F),
    Rgba::rgb(0xD7, 0xCC, 0xC8),
    Rgba::rgb(0x30, 0x3F, 0x9F),
    Rgba::rgb(0x79, 0x86, 0xCB),
    Rgba::rgb(0xC5, 0xCA, 0xE9),
    Rgba::rgb(0x21, 0x21, 0x21),
    Rgba::rgb(0x61, 0x61, 0x61),
    Rgba::rgb(0x9E, 0x9E, 0x9E),
    Rgba::rgb(0xBD, 0xBD, 0xBD),
    Rgba::rgb(0xEE, 0xEE, 0xEE),
    Rgba::rgb(0xFA, 0xFA, 0xFA),
];

/// Picks the first palette colour no curve uses yet; once all are taken,
/// cycles through the palette.
#[derive(Debug, Default, Clone)]
pub struct ColorCursor {
    cycle: usize,
}

impl ColorCursor {
    pub fn next(&mut self, used: &[Rgba]) -> Rgba {
        if let Some(free) = PALETTE
            .iter()
            .find(|p| !used.iter().any(|u| u.same_rgb(**p)))
        {
            return *free;
        }
        let color = PALETTE[self.cycle % PALETTE.len()];
        self.cycle += 1;
        color
    }
}
