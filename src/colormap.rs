use rgb::RGB8;

use crate::data::Dataset;
use crate::error::Error;
use crate::palette::Palette;

/// Number of discrete buckets every scale and legend uses.
pub const BUCKETS: usize = 5;

/// Equal-width quantized mapping from a numeric domain to discrete colors.
///
/// Built fresh on every refresh from a dataset, a field and a palette;
/// values below the domain minimum or above the maximum clamp to the end
/// buckets. The same `Palette::quantize` call feeds the legend, which keeps
/// both sides of the display consistent.
#[derive(Debug, Clone, PartialEq)]
pub struct QuantizedColorMap {
    min: f64,
    max: f64,
    colors: Vec<RGB8>,
}

impl QuantizedColorMap {
    pub fn new(min: f64, max: f64, palette: &Palette) -> Self {
        QuantizedColorMap {
            min,
            max,
            colors: palette.quantize(BUCKETS),
        }
    }

    /// Derive the domain from the non-sentinel values of `field` across the
    /// dataset, then quantize `palette` over it.
    pub fn from_dataset(dataset: &Dataset, field: &str, palette: &Palette) -> Result<Self, Error> {
        let (min, max) = dataset.numeric_domain(field)?;
        Ok(Self::new(min, max, palette))
    }

    pub fn domain(&self) -> (f64, f64) {
        (self.min, self.max)
    }

    pub fn colors(&self) -> &[RGB8] {
        &self.colors
    }

    /// Bucket index for `v`, in `0..BUCKETS`.
    pub fn bucket_index(&self, v: f64) -> usize {
        let width = self.max - self.min;
        if width <= 0.0 {
            // zero-width domain: every value sits at the last threshold
            return self.colors.len() - 1;
        }
        let t = (v - self.min) / width * self.colors.len() as f64;
        (t.floor().max(0.0) as usize).min(self.colors.len() - 1)
    }

    pub fn color_for(&self, v: f64) -> RGB8 {
        self.colors[self.bucket_index(v)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scale(min: f64, max: f64) -> QuantizedColorMap {
        QuantizedColorMap::new(min, max, Palette::lookup("blues").unwrap())
    }

    #[test]
    fn equal_fifths_over_the_domain() {
        // domain [5, 45], bucket width 8
        let scale = scale(5.0, 45.0);
        assert_eq!(scale.bucket_index(5.0), 0);
        assert_eq!(scale.bucket_index(12.9), 0);
        assert_eq!(scale.bucket_index(13.0), 1);
        assert_eq!(scale.bucket_index(25.0), 2);
        assert_eq!(scale.bucket_index(44.9), 4);
        assert_eq!(scale.bucket_index(45.0), 4);
    }

    #[test]
    fn out_of_domain_values_clamp() {
        let scale = scale(0.0, 100.0);
        assert_eq!(scale.bucket_index(-50.0), 0);
        assert_eq!(scale.bucket_index(1e9), 4);
    }

    #[test]
    fn monotone_over_a_sweep() {
        let scale = scale(-10.0, 10.0);
        let mut previous = 0;
        for i in 0..=200 {
            let v = -10.0 + i as f64 * 0.1;
            let bucket = scale.bucket_index(v);
            assert!(bucket >= previous, "bucket regressed at {v}");
            previous = bucket;
        }
    }

    #[test]
    fn spans_exactly_five_distinct_colors() {
        let scale = scale(0.0, 1.0);
        let mut seen = Vec::new();
        for i in 0..=100 {
            let color = scale.color_for(i as f64 / 100.0);
            if !seen.contains(&color) {
                seen.push(color);
            }
        }
        assert_eq!(seen.len(), BUCKETS);
        assert_eq!(seen, scale.colors());
    }

    #[test]
    fn identical_inputs_build_identical_scales() {
        let a = scale(3.0, 17.0);
        let b = scale(3.0, 17.0);
        assert_eq!(a, b);
        for i in 0..=40 {
            let v = i as f64 * 0.5;
            assert_eq!(a.color_for(v), b.color_for(v));
        }
    }

    #[test]
    fn degenerate_domain_uses_one_bucket() {
        let scale = scale(7.0, 7.0);
        assert_eq!(scale.bucket_index(7.0), BUCKETS - 1);
        assert_eq!(scale.bucket_index(0.0), BUCKETS - 1);
    }
}
