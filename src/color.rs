/*!
 # RGB colors for preset groups

 One byte per channel, zero value is black.
*/

use std::fmt;
use std::str::FromStr;

use tracing::trace;

use crate::{Error, Result};

/// A red/green/blue color, one byte per channel
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    /// Red component (0-255)
    pub r: u8,
    /// Green component (0-255)
    pub g: u8,
    /// Blue component (0-255)
    pub b: u8,
}

/// Zero value, used for unset presets
pub const BLACK: Rgb = Rgb::new(0, 0, 0);
/// Full white
pub const WHITE: Rgb = Rgb::new(255, 255, 255);
/// Pure red
pub const RED: Rgb = Rgb::new(255, 0, 0);
/// Pure green
pub const GREEN: Rgb = Rgb::new(0, 255, 0);
/// Pure blue
pub const BLUE: Rgb = Rgb::new(0, 0, 255);

impl Rgb {
    /// Creates a color from its channels
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// True for the zero value
    pub const fn is_black(self) -> bool {
        self.r == 0 && self.g == 0 && self.b == 0
    }
}

impl From<(u8, u8, u8)> for Rgb {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Self::new(r, g, b)
    }
}

impl From<Rgb> for (u8, u8, u8) {
    fn from(color: Rgb) -> Self {
        (color.r, color.g, color.b)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Rgb {
    type Err = Error;

    /// Parses either `R,G,B` (decimal) or `#rrggbb` (hex)
    fn from_str(input: &str) -> Result<Self> {
        let text = input.trim();
        let invalid = || Error::InvalidColor(input.to_string());

        let color = if let Some(hex) = text.strip_prefix('#') {
            if hex.len() != 6 || !hex.is_ascii() {
                return Err(invalid());
            }
            let channel =
                |at: usize| u8::from_str_radix(&hex[at..at + 2], 16).map_err(|_| invalid());
            Rgb::new(channel(0)?, channel(2)?, channel(4)?)
        } else {
            let parts = text
                .split(',')
                .map(|part| part.trim().parse::<u8>().map_err(|_| invalid()))
                .collect::<Result<Vec<u8>>>()?;
            match parts.as_slice() {
                [r, g, b] => Rgb::new(*r, *g, *b),
                _ => return Err(invalid()),
            }
        };

        trace!("Parsed color '{}' as {}", input, color);
        Ok(color)
    }
}
