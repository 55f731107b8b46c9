use image::Rgba;

use crate::error::PixelError;
use crate::log_info;
use crate::logger::Logger;

pub const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Swatches shown on startup, two per row in the toolbox column.
pub const DEFAULT_SWATCHES: [Rgba<u8>; 8] = [
    Rgba([0x00, 0x00, 0x00, 0xFF]),
    Rgba([0xFF, 0xFF, 0xFF, 0xFF]),
    Rgba([0xFF, 0x00, 0x00, 0xFF]),
    Rgba([0x00, 0xFF, 0x00, 0xFF]),
    Rgba([0x00, 0x00, 0xFF, 0xFF]),
    Rgba([0xFF, 0xFF, 0x00, 0xFF]),
    Rgba([0xFF, 0x00, 0xFF, 0xFF]),
    Rgba([0x00, 0xFF, 0xFF, 0xFF]),
];

// ============================================================================
// Hex conversion (UI boundary only — the core works in Rgba<u8>)
// ============================================================================

/// Parse `#RRGGBB` (leading `#` optional) into an opaque colour.
pub fn parse_hex(hex: &str) -> Result<Rgba<u8>, PixelError> {
    let digits = hex.trim();
    let digits = digits.strip_prefix('#').unwrap_or(digits);
    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(PixelError::InvalidHex(hex.to_string()));
    }
    let val = u32::from_str_radix(digits, 16).map_err(|_| PixelError::InvalidHex(hex.to_string()))?;
    let r = ((val >> 16) & 0xFF) as u8;
    let g = ((val >> 8) & 0xFF) as u8;
    let b = (val & 0xFF) as u8;
    Ok(Rgba([r, g, b, 255]))
}

/// `#RRGGBB`, upper case.  Alpha is not represented.
pub fn to_hex(color: Rgba<u8>) -> String {
    let [r, g, b, _] = color.0;
    format!("#{:02X}{:02X}{:02X}", r, g, b)
}

// ============================================================================
// Palette — swatches plus the current drawing colour
// ============================================================================

pub struct Palette {
    current: Rgba<u8>,
    swatches: Vec<Rgba<u8>>,
    logger: Logger,
}

impl Palette {
    pub fn new(logger: Logger) -> Self {
        Self {
            current: BLACK,
            swatches: DEFAULT_SWATCHES.to_vec(),
            logger,
        }
    }

    pub fn current(&self) -> Rgba<u8> {
        self.current
    }

    pub fn swatches(&self) -> &[Rgba<u8>] {
        &self.swatches
    }

    pub fn set_color(&mut self, color: Rgba<u8>) {
        self.current = color;
        log_info!(self.logger, "Changed color to {}", to_hex(color));
    }

    /// Make swatch `index` the current colour.
    pub fn select_swatch(&mut self, index: usize) -> Result<Rgba<u8>, PixelError> {
        let color = *self.swatches.get(index).ok_or(PixelError::SwatchIndex {
            index,
            len: self.swatches.len(),
        })?;
        self.set_color(color);
        Ok(color)
    }

    /// Replace swatch `index` (the colour picker's result).  The current colour
    /// is left alone.
    pub fn set_swatch(&mut self, index: usize, color: Rgba<u8>) -> Result<(), PixelError> {
        let len = self.swatches.len();
        let slot = self
            .swatches
            .get_mut(index)
            .ok_or(PixelError::SwatchIndex { index, len })?;
        *slot = color;
        log_info!(self.logger, "Changed color at index {} to {}", index, to_hex(color));
        Ok(())
    }
}
