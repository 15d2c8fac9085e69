//! Catalog of named, ordered color palettes.
//!
//! The shipped families are the ColorBrewer sequential and diverging
//! schemes plus the Matplotlib perceptual maps. A [`Palette`] is a list of
//! color stops; [`Palette::sample`] interpolates between them and
//! [`Palette::quantize`] picks evenly spaced representative colors, which
//! is what the choropleth scale and the legend both consume.

use std::collections::HashMap;

use lazy_static::lazy_static;
use rgb::RGB8;

use crate::error::Error;

/// Whether a palette ramps one way or diverges around a midpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaletteKind {
    Sequential,
    Diverging,
}

/// A named, ordered color ramp from the catalog.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub name: &'static str,
    pub kind: PaletteKind,
    stops: &'static [RGB8],
}

const fn s(r: u8, g: u8, b: u8) -> RGB8 {
    RGB8 { r, g, b }
}

static BLUES: &[RGB8] = &[
    s(0xf7, 0xfb, 0xff),
    s(0xde, 0xeb, 0xf7),
    s(0xc6, 0xdb, 0xef),
    s(0x9e, 0xca, 0xe1),
    s(0x6b, 0xae, 0xd6),
    s(0x42, 0x92, 0xc6),
    s(0x21, 0x71, 0xb5),
    s(0x08, 0x51, 0x9c),
    s(0x08, 0x30, 0x6b),
];

static GREENS: &[RGB8] = &[
    s(0xf7, 0xfc, 0xf5),
    s(0xe5, 0xf5, 0xe0),
    s(0xc7, 0xe9, 0xc0),
    s(0xa1, 0xd9, 0x9b),
    s(0x74, 0xc4, 0x76),
    s(0x41, 0xab, 0x5d),
    s(0x23, 0x8b, 0x45),
    s(0x00, 0x6d, 0x2c),
    s(0x00, 0x44, 0x1b),
];

static GREYS: &[RGB8] = &[
    s(0xff, 0xff, 0xff),
    s(0xf0, 0xf0, 0xf0),
    s(0xd9, 0xd9, 0xd9),
    s(0xbd, 0xbd, 0xbd),
    s(0x96, 0x96, 0x96),
    s(0x73, 0x73, 0x73),
    s(0x52, 0x52, 0x52),
    s(0x25, 0x25, 0x25),
    s(0x00, 0x00, 0x00),
];

static ORANGES: &[RGB8] = &[
    s(0xff, 0xf5, 0xeb),
    s(0xfe, 0xe6, 0xce),
    s(0xfd, 0xd0, 0xa2),
    s(0xfd, 0xae, 0x6b),
    s(0xfd, 0x8d, 0x3c),
    s(0xf1, 0x69, 0x13),
    s(0xd9, 0x48, 0x01),
    s(0xa6, 0x36, 0x03),
    s(0x7f, 0x27, 0x04),
];

static PURPLES: &[RGB8] = &[
    s(0xfc, 0xfb, 0xfd),
    s(0xef, 0xed, 0xf5),
    s(0xda, 0xda, 0xeb),
    s(0xbc, 0xbd, 0xdc),
    s(0x9e, 0x9a, 0xc8),
    s(0x80, 0x7d, 0xba),
    s(0x6a, 0x51, 0xa3),
    s(0x54, 0x27, 0x8f),
    s(0x3f, 0x00, 0x7d),
];

static REDS: &[RGB8] = &[
    s(0xff, 0xf5, 0xf0),
    s(0xfe, 0xe0, 0xd2),
    s(0xfc, 0xbb, 0xa1),
    s(0xfc, 0x92, 0x72),
    s(0xfb, 0x6a, 0x4a),
    s(0xef, 0x3b, 0x2c),
    s(0xcb, 0x18, 0x1d),
    s(0xa5, 0x0f, 0x15),
    s(0x67, 0x00, 0x0d),
];

static GNBU: &[RGB8] = &[
    s(0xf7, 0xfc, 0xf0),
    s(0xe0, 0xf3, 0xdb),
    s(0xcc, 0xeb, 0xc5),
    s(0xa8, 0xdd, 0xb5),
    s(0x7b, 0xcc, 0xc4),
    s(0x4e, 0xb3, 0xd3),
    s(0x2b, 0x8c, 0xbe),
    s(0x08, 0x68, 0xac),
    s(0x08, 0x40, 0x81),
];

static BUPU: &[RGB8] = &[
    s(0xf7, 0xfc, 0xfd),
    s(0xe0, 0xec, 0xf4),
    s(0xbf, 0xd3, 0xe6),
    s(0x9e, 0xbc, 0xda),
    s(0x8c, 0x96, 0xc6),
    s(0x8c, 0x6b, 0xb1),
    s(0x88, 0x41, 0x9d),
    s(0x81, 0x0f, 0x7c),
    s(0x4d, 0x00, 0x4b),
];

static PUBU: &[RGB8] = &[
    s(0xff, 0xf7, 0xfb),
    s(0xec, 0xe7, 0xf2),
    s(0xd0, 0xd1, 0xe6),
    s(0xa6, 0xbd, 0xdb),
    s(0x74, 0xa9, 0xcf),
    s(0x36, 0x90, 0xc0),
    s(0x05, 0x70, 0xb0),
    s(0x04, 0x5a, 0x8d),
    s(0x02, 0x38, 0x58),
];

static ORRD: &[RGB8] = &[
    s(0xff, 0xf7, 0xec),
    s(0xfe, 0xe8, 0xc8),
    s(0xfd, 0xd4, 0x9e),
    s(0xfd, 0xbb, 0x84),
    s(0xfc, 0x8d, 0x59),
    s(0xef, 0x65, 0x48),
    s(0xd7, 0x30, 0x1f),
    s(0xb3, 0x00, 0x00),
    s(0x7f, 0x00, 0x00),
];

static YLGNBU: &[RGB8] = &[
    s(0xff, 0xff, 0xd9),
    s(0xed, 0xf8, 0xb1),
    s(0xc7, 0xe9, 0xb4),
    s(0x7f, 0xcd, 0xbb),
    s(0x41, 0xb6, 0xc4),
    s(0x1d, 0x91, 0xc0),
    s(0x22, 0x5e, 0xa8),
    s(0x25, 0x34, 0x94),
    s(0x08, 0x1d, 0x58),
];

static YLORRD: &[RGB8] = &[
    s(0xff, 0xff, 0xcc),
    s(0xff, 0xed, 0xa0),
    s(0xfe, 0xd9, 0x76),
    s(0xfe, 0xb2, 0x4c),
    s(0xfd, 0x8d, 0x3c),
    s(0xfc, 0x4e, 0x2a),
    s(0xe3, 0x1a, 0x1c),
    s(0xbd, 0x00, 0x26),
    s(0x80, 0x00, 0x26),
];

static VIRIDIS: &[RGB8] = &[
    s(0x44, 0x01, 0x54),
    s(0x48, 0x28, 0x78),
    s(0x3e, 0x49, 0x89),
    s(0x31, 0x68, 0x8e),
    s(0x26, 0x82, 0x8e),
    s(0x1f, 0x9e, 0x89),
    s(0x35, 0xb7, 0x79),
    s(0x6e, 0xce, 0x58),
    s(0xb5, 0xde, 0x2b),
    s(0xfd, 0xe7, 0x25),
];

static MAGMA: &[RGB8] = &[
    s(0x00, 0x00, 0x04),
    s(0x1c, 0x10, 0x44),
    s(0x4f, 0x12, 0x7b),
    s(0x81, 0x25, 0x81),
    s(0xb5, 0x36, 0x7a),
    s(0xe5, 0x50, 0x64),
    s(0xfb, 0x87, 0x61),
    s(0xfe, 0xc2, 0x87),
    s(0xfc, 0xfd, 0xbf),
];

static INFERNO: &[RGB8] = &[
    s(0x00, 0x00, 0x04),
    s(0x1b, 0x0c, 0x42),
    s(0x4b, 0x0c, 0x6b),
    s(0x78, 0x1c, 0x6d),
    s(0xa5, 0x2c, 0x60),
    s(0xcf, 0x44, 0x46),
    s(0xed, 0x69, 0x25),
    s(0xfb, 0x9a, 0x06),
    s(0xf7, 0xd0, 0x3c),
    s(0xfc, 0xff, 0xa4),
];

static PLASMA: &[RGB8] = &[
    s(0x0d, 0x08, 0x87),
    s(0x47, 0x03, 0x9f),
    s(0x73, 0x01, 0xa8),
    s(0x9c, 0x17, 0x9e),
    s(0xbd, 0x37, 0x86),
    s(0xd8, 0x57, 0x6b),
    s(0xed, 0x79, 0x53),
    s(0xfa, 0x9e, 0x3b),
    s(0xfd, 0xc9, 0x26),
    s(0xf0, 0xf9, 0x21),
];

static RDBU: &[RGB8] = &[
    s(0xb2, 0x18, 0x2b),
    s(0xd6, 0x60, 0x4d),
    s(0xf4, 0xa5, 0x82),
    s(0xfd, 0xdb, 0xc7),
    s(0xf7, 0xf7, 0xf7),
    s(0xd1, 0xe5, 0xf0),
    s(0x92, 0xc5, 0xde),
    s(0x43, 0x93, 0xc3),
    s(0x21, 0x66, 0xac),
];

static RDYLBU: &[RGB8] = &[
    s(0xd7, 0x30, 0x27),
    s(0xf4, 0x6d, 0x43),
    s(0xfd, 0xae, 0x61),
    s(0xfe, 0xe0, 0x90),
    s(0xff, 0xff, 0xbf),
    s(0xe0, 0xf3, 0xf8),
    s(0xab, 0xd9, 0xe9),
    s(0x74, 0xad, 0xd1),
    s(0x45, 0x75, 0xb4),
];

static SPECTRAL: &[RGB8] = &[
    s(0xd5, 0x3e, 0x4f),
    s(0xf4, 0x6d, 0x43),
    s(0xfd, 0xae, 0x61),
    s(0xfe, 0xe0, 0x8b),
    s(0xff, 0xff, 0xbf),
    s(0xe6, 0xf5, 0x98),
    s(0xab, 0xdd, 0xa4),
    s(0x66, 0xc2, 0xa5),
    s(0x32, 0x88, 0xbd),
];

static BRBG: &[RGB8] = &[
    s(0x8c, 0x51, 0x0a),
    s(0xbf, 0x81, 0x2d),
    s(0xdf, 0xc2, 0x7d),
    s(0xf6, 0xe8, 0xc3),
    s(0xf5, 0xf5, 0xf5),
    s(0xc7, 0xea, 0xe5),
    s(0x80, 0xcd, 0xc1),
    s(0x35, 0x97, 0x8f),
    s(0x01, 0x66, 0x5e),
];

static PIYG: &[RGB8] = &[
    s(0xc5, 0x1b, 0x7d),
    s(0xde, 0x77, 0xae),
    s(0xf1, 0xb6, 0xda),
    s(0xfd, 0xe0, 0xef),
    s(0xf7, 0xf7, 0xf7),
    s(0xe6, 0xf5, 0xd0),
    s(0xb8, 0xe1, 0x86),
    s(0x7f, 0xbc, 0x41),
    s(0x4d, 0x92, 0x21),
];

static CATALOG: &[Palette] = &[
    Palette { name: "blues", kind: PaletteKind::Sequential, stops: BLUES },
    Palette { name: "greens", kind: PaletteKind::Sequential, stops: GREENS },
    Palette { name: "greys", kind: PaletteKind::Sequential, stops: GREYS },
    Palette { name: "oranges", kind: PaletteKind::Sequential, stops: ORANGES },
    Palette { name: "purples", kind: PaletteKind::Sequential, stops: PURPLES },
    Palette { name: "reds", kind: PaletteKind::Sequential, stops: REDS },
    Palette { name: "gnbu", kind: PaletteKind::Sequential, stops: GNBU },
    Palette { name: "bupu", kind: PaletteKind::Sequential, stops: BUPU },
    Palette { name: "pubu", kind: PaletteKind::Sequential, stops: PUBU },
    Palette { name: "orrd", kind: PaletteKind::Sequential, stops: ORRD },
    Palette { name: "ylgnbu", kind: PaletteKind::Sequential, stops: YLGNBU },
    Palette { name: "ylorrd", kind: PaletteKind::Sequential, stops: YLORRD },
    Palette { name: "viridis", kind: PaletteKind::Sequential, stops: VIRIDIS },
    Palette { name: "magma", kind: PaletteKind::Sequential, stops: MAGMA },
    Palette { name: "inferno", kind: PaletteKind::Sequential, stops: INFERNO },
    Palette { name: "plasma", kind: PaletteKind::Sequential, stops: PLASMA },
    Palette { name: "rdbu", kind: PaletteKind::Diverging, stops: RDBU },
    Palette { name: "rdylbu", kind: PaletteKind::Diverging, stops: RDYLBU },
    Palette { name: "spectral", kind: PaletteKind::Diverging, stops: SPECTRAL },
    Palette { name: "brbg", kind: PaletteKind::Diverging, stops: BRBG },
    Palette { name: "piyg", kind: PaletteKind::Diverging, stops: PIYG },
];

lazy_static! {
    static ref BY_NAME: HashMap<&'static str, &'static Palette> =
        CATALOG.iter().map(|p| (p.name, p)).collect();
}

fn lerp(a: u8, b: u8, t: f64) -> u8 {
    (a as f64 + (b as f64 - a as f64) * t).round() as u8
}

impl Palette {
    /// Resolve a scheme name against the catalog.
    pub fn lookup(name: &str) -> Result<&'static Palette, Error> {
        BY_NAME
            .get(name)
            .copied()
            .ok_or_else(|| Error::UnknownScheme(name.to_string()))
    }

    /// Every scheme name in the catalog, in catalog order.
    pub fn names() -> Vec<&'static str> {
        CATALOG.iter().map(|p| p.name).collect()
    }

    /// Number of stops in the palette.
    pub fn len(&self) -> usize {
        self.stops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    /// Color at `t` in [0, 1], piecewise-linear between stops.
    pub fn sample(&self, t: f64) -> RGB8 {
        let last = self.stops.len() - 1;
        if last == 0 {
            return self.stops[0];
        }
        let pos = t.clamp(0.0, 1.0) * last as f64;
        let i = (pos.floor() as usize).min(last - 1);
        let frac = pos - i as f64;
        let (a, b) = (self.stops[i], self.stops[i + 1]);
        RGB8 {
            r: lerp(a.r, b.r, frac),
            g: lerp(a.g, b.g, frac),
            b: lerp(a.b, b.b, frac),
        }
    }

    /// `n` evenly spaced representative colors, endpoints included.
    pub fn quantize(&self, n: usize) -> Vec<RGB8> {
        match n {
            0 => Vec::new(),
            1 => vec![self.sample(0.5)],
            _ => (0..n)
                .map(|i| self.sample(i as f64 / (n - 1) as f64))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_known_scheme() {
        let palette = Palette::lookup("blues").unwrap();
        assert_eq!(palette.name, "blues");
        assert_eq!(palette.kind, PaletteKind::Sequential);
    }

    #[test]
    fn lookup_unknown_scheme() {
        let err = Palette::lookup("notAPalette").unwrap_err();
        assert!(matches!(err, Error::UnknownScheme(name) if name == "notAPalette"));
    }

    #[test]
    fn catalog_entries_are_usable() {
        let mut seen = std::collections::HashSet::new();
        for palette in CATALOG {
            assert!(palette.len() >= 5, "{} has too few stops", palette.name);
            assert!(seen.insert(palette.name), "duplicate name {}", palette.name);
        }
    }

    #[test]
    fn quantize_endpoints_and_count() {
        for palette in CATALOG {
            let colors = palette.quantize(5);
            assert_eq!(colors.len(), 5);
            assert_eq!(colors[0], palette.stops[0]);
            assert_eq!(colors[4], palette.stops[palette.len() - 1]);
        }
    }

    #[test]
    fn quantize_colors_are_distinct() {
        for palette in CATALOG {
            let colors = palette.quantize(5);
            for i in 0..colors.len() {
                for j in i + 1..colors.len() {
                    assert_ne!(colors[i], colors[j], "{} bucket collision", palette.name);
                }
            }
        }
    }

    #[test]
    fn sample_interpolates_midpoint() {
        let palette = Palette {
            name: "test",
            kind: PaletteKind::Sequential,
            stops: &[s(0, 0, 0), s(200, 100, 50)],
        };
        assert_eq!(palette.sample(0.5), s(100, 50, 25));
        assert_eq!(palette.sample(-1.0), s(0, 0, 0));
        assert_eq!(palette.sample(2.0), s(200, 100, 50));
    }
}
