//! The polygon layer filled from the active quantized scale.

use std::cell::RefCell;
use std::rc::Rc;

use geo::{Contains, Point};
use gtk4::cairo::{Context, FillRule, FontSlant, FontWeight};
use gtk4::prelude::WidgetExt;
use gtk4::DrawingArea;
use rgb::RGB8;

use crate::colormap::QuantizedColorMap;
use crate::data::{Dataset, Feature};
use crate::geometry::{FocusRange, Rect};
use crate::window::Layer;

/// Fill for regions whose selected property carries no data.
pub const NO_DATA_FILL: RGB8 = RGB8 {
    r: 189,
    g: 189,
    b: 189,
};

pub struct ChoroplethLayer {
    dataset: Option<Rc<Dataset>>,
    field: String,
    scale: Option<QuantizedColorMap>,
    cursor: Rc<RefCell<Option<(f64, f64)>>>,
}

impl ChoroplethLayer {
    pub fn new(cursor: Rc<RefCell<Option<(f64, f64)>>>) -> Self {
        Self {
            dataset: None,
            field: String::new(),
            scale: None,
            cursor,
        }
    }

    /// Swap in a freshly built render state. Called only on a successful
    /// refresh, so a failed cycle leaves the previous render visible.
    pub fn update(&mut self, dataset: Rc<Dataset>, field: &str, scale: QuantizedColorMap) {
        self.dataset = Some(dataset);
        self.field = field.to_string();
        self.scale = Some(scale);
    }

    fn feature_at(&self, x: f64, y: f64) -> Option<&Feature> {
        let dataset = self.dataset.as_deref()?;
        let point = Point::new(x, y);
        dataset
            .features
            .iter()
            .find(|feature| feature.geometry.contains(&point))
    }
}

fn trace_polygon(
    cr: &Context,
    rect: &Rect,
    area_width: f64,
    area_height: f64,
    polygon: &geo::Polygon<f64>,
) {
    for ring in std::iter::once(polygon.exterior()).chain(polygon.interiors()) {
        for (i, coord) in ring.coords().enumerate() {
            let sx = rect.to_screen_x(coord.x, area_width);
            let sy = rect.to_screen_y(coord.y, area_height);
            if i == 0 {
                cr.move_to(sx, sy);
            } else {
                cr.line_to(sx, sy);
            }
        }
        cr.close_path();
    }
}

fn tooltip_lines(feature: &Feature, field: &str) -> Vec<String> {
    let name = feature.name().unwrap_or("(unnamed)").to_string();
    let value = match feature.numeric(field) {
        Some(v) => group_digits(v),
        None => "n/a".to_string(),
    };
    vec![name, format!("{field}: {value}")]
}

/// Thousands-separated rendering of a property value.
fn group_digits(v: f64) -> String {
    let s = if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{v:.0}")
    } else {
        format!("{v}")
    };
    let (sign, rest) = match s.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", s.as_str()),
    };
    let (int_part, frac_part) = match rest.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (rest, None),
    };
    let mut grouped = String::new();
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    match frac_part {
        Some(f) => format!("{sign}{grouped}.{f}"),
        None => format!("{sign}{grouped}"),
    }
}

const TOOLTIP_PAD: f64 = 6.0;
const TOOLTIP_LINE: f64 = 16.0;

fn draw_tooltip(cr: &Context, x: f64, y: f64, lines: &[String]) {
    cr.select_font_face("Sans", FontSlant::Normal, FontWeight::Normal);
    cr.set_font_size(12.0);

    let mut width: f64 = 0.0;
    for line in lines {
        if let Ok(extents) = cr.text_extents(line) {
            width = width.max(extents.width());
        }
    }
    let width = width + TOOLTIP_PAD * 2.0;
    let height = TOOLTIP_PAD * 2.0 + TOOLTIP_LINE * lines.len() as f64;
    let bx = x + 12.0;
    let by = y - height - 4.0;

    cr.set_source_rgba(1.0, 1.0, 1.0, 0.92);
    cr.rectangle(bx, by, width, height);
    cr.fill().expect("Failed to draw tooltip panel");
    cr.set_source_rgb(0.25, 0.25, 0.25);
    cr.set_line_width(1.0);
    cr.rectangle(bx, by, width, height);
    cr.stroke().expect("Failed to draw tooltip border");

    cr.set_source_rgb(0.1, 0.1, 0.1);
    for (i, line) in lines.iter().enumerate() {
        cr.move_to(bx + TOOLTIP_PAD, by + TOOLTIP_PAD + TOOLTIP_LINE * (i + 1) as f64 - 4.0);
        cr.show_text(line).expect("Failed to draw tooltip text");
    }
}

impl Layer for ChoroplethLayer {
    fn draw(&self, drawing_area: &DrawingArea, cr: &Context, focus_range: &FocusRange) {
        let (Some(dataset), Some(scale)) = (&self.dataset, &self.scale) else {
            return;
        };

        let area_width = drawing_area.width() as f64;
        let area_height = drawing_area.height() as f64;
        let rect = focus_range.to_rect(area_width, area_height);

        cr.set_fill_rule(FillRule::EvenOdd);
        for feature in &dataset.features {
            let fill = feature
                .numeric(&self.field)
                .map(|v| scale.color_for(v))
                .unwrap_or(NO_DATA_FILL);

            cr.new_path();
            for polygon in &feature.geometry {
                trace_polygon(cr, &rect, area_width, area_height, polygon);
            }
            cr.set_source_rgba(
                fill.r as f64 / 255.0,
                fill.g as f64 / 255.0,
                fill.b as f64 / 255.0,
                0.8,
            );
            cr.fill_preserve().expect("Failed to fill region");
            cr.set_source_rgb(0.0, 0.0, 0.0);
            cr.set_line_width(0.3);
            cr.stroke().expect("Failed to outline region");
        }

        if let Some((sx, sy)) = *self.cursor.borrow() {
            let world_x = rect.world_x(sx, area_width);
            let world_y = rect.world_y(sy, area_height);
            if let Some(feature) = self.feature_at(world_x, world_y) {
                draw_tooltip(cr, sx, sy, &tooltip_lines(feature, &self.field));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_digits_in_threes() {
        assert_eq!(group_digits(0.0), "0");
        assert_eq!(group_digits(950.0), "950");
        assert_eq!(group_digits(64521.0), "64,521");
        assert_eq!(group_digits(1234567.0), "1,234,567");
        assert_eq!(group_digits(-1234.0), "-1,234");
        assert_eq!(group_digits(1234.5), "1,234.5");
    }

    #[test]
    fn tooltip_shows_na_for_missing_values() {
        let feature = Feature {
            geometry: geo::MultiPolygon(Vec::new()),
            properties: serde_json::from_str(r#"{"NAME": "Kent", "medincome": "NA"}"#).unwrap(),
        };
        let lines = tooltip_lines(&feature, "medincome");
        assert_eq!(lines, ["Kent", "medincome: n/a"]);
    }
}
