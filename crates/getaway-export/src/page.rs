/// Canonical page width in points (A4 portrait).
pub const CANONICAL_WIDTH: f32 = 595.28;

/// Canonical page height in points (A4 portrait).
pub const CANONICAL_HEIGHT: f32 = 841.89;

const POINTS_PER_INCH: f64 = 72.0;
const CSS_PX_PER_INCH: f64 = 96.0;

/// Page geometry handed to the HTML → PDF renderer.
#[derive(Debug, Clone)]
pub struct PageSetup {
    /// Page width in points.
    pub width_pt: f32,

    /// Page height in points.
    pub height_pt: f32,

    /// Margins in CSS pixels.
    pub margin_top_px: f64,
    pub margin_right_px: f64,
    pub margin_bottom_px: f64,
    pub margin_left_px: f64,

    /// Print CSS backgrounds and images.
    pub print_background: bool,

    /// Let `@page` rules in the template override the paper size.
    pub prefer_css_page_size: bool,
}

impl Default for PageSetup {
    fn default() -> Self {
        Self {
            width_pt: CANONICAL_WIDTH,
            height_pt: CANONICAL_HEIGHT,
            margin_top_px: 20.0,
            margin_right_px: 15.0,
            margin_bottom_px: 40.0,
            margin_left_px: 15.0,
            print_background: true,
            prefer_css_page_size: true,
        }
    }
}

impl PageSetup {
    pub fn width_inches(&self) -> f64 {
        f64::from(self.width_pt) / POINTS_PER_INCH
    }

    pub fn height_inches(&self) -> f64 {
        f64::from(self.height_pt) / POINTS_PER_INCH
    }

    /// Margins as `(top, right, bottom, left)` in inches.
    pub fn margins_inches(&self) -> (f64, f64, f64, f64) {
        (
            self.margin_top_px / CSS_PX_PER_INCH,
            self.margin_right_px / CSS_PX_PER_INCH,
            self.margin_bottom_px / CSS_PX_PER_INCH,
            self.margin_left_px / CSS_PX_PER_INCH,
        )
    }
}
