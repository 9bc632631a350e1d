use crate::error::{Error, Result};
use plotters::style::RGBColor;

/// Red, teal and green, assigned to the first three learners.
pub const DEFAULT_PALETTE: [&str; 3] = ["#A00000", "#00A0A0", "#00A000"];

/// Ordered learner colors. Learner `k` always gets entry `k`; there is no
/// wrap-around.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    colors: Vec<RGBColor>,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            colors: vec![
                RGBColor(0xA0, 0x00, 0x00),
                RGBColor(0x00, 0xA0, 0xA0),
                RGBColor(0x00, 0xA0, 0x00),
            ],
        }
    }
}

impl Palette {
    pub fn new(colors: Vec<RGBColor>) -> Result<Self> {
        if colors.is_empty() {
            return Err(Error::ConfigurationError("palette has no colors".to_string()));
        }
        Ok(Self { colors })
    }

    pub fn from_hex<S: AsRef<str>>(codes: &[S]) -> Result<Self> {
        let colors = codes
            .iter()
            .map(|c| parse_hex_color(c.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Self::new(colors)
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<RGBColor> {
        self.colors.get(index).copied()
    }

    /// Check that `learners` learners can all be colored.
    pub fn ensure_capacity(&self, learners: usize) -> Result<()> {
        if learners > self.colors.len() {
            return Err(Error::PaletteExhausted {
                learners,
                colors: self.colors.len(),
            });
        }
        Ok(())
    }
}

/// Parse `#RRGGBB` (leading `#` optional).
pub fn parse_hex_color(code: &str) -> Result<RGBColor> {
    let hex = code.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return Err(Error::InvalidColor(code.to_string()));
    }
    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&hex[range], 16).map_err(|_| Error::InvalidColor(code.to_string()))
    };
    Ok(RGBColor(channel(0..2)?, channel(2..4)?, channel(4..6)?))
}
