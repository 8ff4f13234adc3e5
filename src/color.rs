use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::data::model::ComplianceStatus;

// ---------------------------------------------------------------------------
// Fixed series colours
// ---------------------------------------------------------------------------

pub const GUIDELINE_COLOR: Color32 = Color32::from_rgb(0, 123, 255);
pub const NATIONAL_COLOR: Color32 = Color32::from_rgb(40, 167, 69);
pub const MEASURED_COLOR: Color32 = Color32::from_rgb(220, 53, 69);

/// Text colour for a report line.
pub fn status_color(status: ComplianceStatus) -> Color32 {
    match status {
        ComplianceStatus::CompliantBoth => NATIONAL_COLOR,
        ComplianceStatus::CompliantNationalOnly => Color32::from_rgb(230, 160, 0),
        ComplianceStatus::ExceedsBoth => MEASURED_COLOR,
    }
}

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.65, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Slice colours: label → Color32
// ---------------------------------------------------------------------------

/// Assigns each chart label (pie slice) a distinct colour, in label order.
#[derive(Debug, Clone)]
pub struct ColorMap {
    entries: Vec<(String, Color32)>,
}

impl ColorMap {
    pub fn new(labels: &[String]) -> Self {
        let palette = generate_palette(labels.len());
        let entries = labels.iter().cloned().zip(palette).collect();
        ColorMap { entries }
    }

    /// Colour of the `index`-th label, grey when out of range.
    pub fn color_at(&self, index: usize) -> Color32 {
        self.entries
            .get(index)
            .map(|(_, c)| *c)
            .unwrap_or(Color32::GRAY)
    }
}
