//! Fixed 5-entry legend derivation and its screen-space panel.

use gtk4::cairo::{Context, FontSlant, FontWeight};
use gtk4::prelude::WidgetExt;
use gtk4::DrawingArea;
use rgb::RGB8;

use crate::colormap::BUCKETS;
use crate::error::Error;
use crate::geometry::FocusRange;
use crate::palette::Palette;
use crate::window::Layer;

/// Fixed bucket labels, low to high.
pub const LABELS: [&str; BUCKETS] = ["Lowest", "Low", "Mid-Point", "High", "Highest"];

#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub label: &'static str,
    pub color: RGB8,
}

/// The five (label, color) pairs for `scheme`, low to high.
///
/// Colors come from the same `Palette::quantize` call the scale uses, so
/// the legend always matches the map.
pub fn build_entries(scheme: &str) -> Result<Vec<LegendEntry>, Error> {
    let palette = Palette::lookup(scheme)?;
    Ok(palette
        .quantize(BUCKETS)
        .into_iter()
        .zip(LABELS)
        .map(|(color, label)| LegendEntry { label, color })
        .collect())
}

/// Legend panel drawn in the lower-right corner of the canvas.
///
/// Redrawn wholesale every frame; `update` replaces the title and entries
/// together so a refresh can never leave the two out of sync.
pub struct LegendLayer {
    title: String,
    entries: Vec<LegendEntry>,
}

impl LegendLayer {
    pub fn new() -> Self {
        Self {
            title: String::new(),
            entries: Vec::new(),
        }
    }

    pub fn update(&mut self, title: &str, entries: Vec<LegendEntry>) {
        self.title = title.to_string();
        self.entries = entries;
    }
}

impl Default for LegendLayer {
    fn default() -> Self {
        Self::new()
    }
}

const PANEL_PAD: f64 = 10.0;
const SWATCH: f64 = 14.0;
const ROW: f64 = 20.0;
const PANEL_WIDTH: f64 = 150.0;

impl Layer for LegendLayer {
    fn draw(&self, drawing_area: &DrawingArea, cr: &Context, _focus_range: &FocusRange) {
        if self.entries.is_empty() {
            return;
        }

        let height = PANEL_PAD * 2.0 + ROW + self.entries.len() as f64 * ROW;
        let x = drawing_area.width() as f64 - PANEL_WIDTH - PANEL_PAD;
        let y = drawing_area.height() as f64 - height - PANEL_PAD;

        cr.set_source_rgba(1.0, 1.0, 1.0, 0.9);
        cr.rectangle(x, y, PANEL_WIDTH, height);
        cr.fill().expect("Failed to draw legend panel");
        cr.set_source_rgb(0.2, 0.2, 0.2);
        cr.set_line_width(1.0);
        cr.rectangle(x, y, PANEL_WIDTH, height);
        cr.stroke().expect("Failed to draw legend border");

        cr.select_font_face("Sans", FontSlant::Normal, FontWeight::Bold);
        cr.set_font_size(13.0);
        cr.move_to(x + PANEL_PAD, y + PANEL_PAD + 11.0);
        cr.show_text(&self.title).expect("Failed to draw legend title");

        cr.select_font_face("Sans", FontSlant::Normal, FontWeight::Normal);
        cr.set_font_size(12.0);
        for (i, entry) in self.entries.iter().enumerate() {
            let row_y = y + PANEL_PAD + ROW + i as f64 * ROW;
            cr.set_source_rgb(
                entry.color.r as f64 / 255.0,
                entry.color.g as f64 / 255.0,
                entry.color.b as f64 / 255.0,
            );
            cr.rectangle(x + PANEL_PAD, row_y + (ROW - SWATCH) / 2.0, SWATCH, SWATCH);
            cr.fill().expect("Failed to draw legend swatch");

            cr.set_source_rgb(0.1, 0.1, 0.1);
            cr.move_to(x + PANEL_PAD + SWATCH + 8.0, row_y + ROW - 5.0);
            cr.show_text(entry.label).expect("Failed to draw legend label");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colormap::QuantizedColorMap;

    #[test]
    fn five_entries_in_fixed_label_order() {
        let entries = build_entries("greens").unwrap();
        assert_eq!(entries.len(), 5);
        let labels: Vec<_> = entries.iter().map(|e| e.label).collect();
        assert_eq!(labels, ["Lowest", "Low", "Mid-Point", "High", "Highest"]);
    }

    #[test]
    fn entries_match_the_scale_colors() {
        let palette = Palette::lookup("ylorrd").unwrap();
        let scale = QuantizedColorMap::new(0.0, 100.0, palette);
        let entries = build_entries("ylorrd").unwrap();
        let legend_colors: Vec<_> = entries.iter().map(|e| e.color).collect();
        assert_eq!(legend_colors, scale.colors());
    }

    #[test]
    fn unknown_scheme_is_rejected() {
        assert!(matches!(
            build_entries("notAPalette").unwrap_err(),
            Error::UnknownScheme(_)
        ));
    }
}
