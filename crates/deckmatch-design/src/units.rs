//! Document length units and slide dimensions.
//!
//! OOXML measures lengths in English Metric Units. Width and height are
//! stored in EMU; inches and the aspect ratio are always derived so the
//! two representations cannot drift apart.

use serde::{Deserialize, Serialize};

/// EMU per inch
pub const EMU_PER_INCH: i64 = 914_400;

/// EMU per point
pub const EMU_PER_POINT: i64 = 12_700;

/// Default slide width in EMU (10" for 4:3)
pub const DEFAULT_SLIDE_WIDTH_EMU: i64 = 9_144_000;

/// Default slide height in EMU (7.5")
pub const DEFAULT_SLIDE_HEIGHT_EMU: i64 = 6_858_000;

/// Convert inches to EMU
pub fn inches_to_emu(inches: f64) -> i64 {
    (inches * EMU_PER_INCH as f64).round() as i64
}

/// Convert EMU to inches
pub fn emu_to_inches(emu: i64) -> f64 {
    emu as f64 / EMU_PER_INCH as f64
}

/// Slide canvas dimensions in EMU
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlideDimensions {
    pub width_emu: i64,
    pub height_emu: i64,
}

impl SlideDimensions {
    /// Create dimensions from EMU values
    pub fn from_emu(width_emu: i64, height_emu: i64) -> Self {
        Self {
            width_emu,
            height_emu,
        }
    }

    /// Create dimensions from inches
    pub fn from_inches(width: f64, height: f64) -> Self {
        Self {
            width_emu: inches_to_emu(width),
            height_emu: inches_to_emu(height),
        }
    }

    /// Width in inches
    pub fn width_inches(&self) -> f64 {
        emu_to_inches(self.width_emu)
    }

    /// Height in inches
    pub fn height_inches(&self) -> f64 {
        emu_to_inches(self.height_emu)
    }

    /// Width/height ratio, derived on demand
    pub fn aspect_ratio(&self) -> f64 {
        self.width_emu as f64 / self.height_emu as f64
    }

    /// Format label: "Widescreen (16:9)" within a 0.1 tolerance of 16/9,
    /// "Custom" otherwise.
    pub fn format_label(&self) -> &'static str {
        if (self.aspect_ratio() - 16.0 / 9.0).abs() < 0.1 {
            "Widescreen (16:9)"
        } else {
            "Custom"
        }
    }
}
