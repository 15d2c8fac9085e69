//! Interactive choropleth rendering for GeoJSON feature collections.
//!
//! The core is a quantized color scale ([`colormap::QuantizedColorMap`])
//! over a named palette ([`palette::Palette`]) and a legend derived from
//! the same quantization ([`legend::build_entries`]); around it sit the
//! map canvas, the choropleth layer and the application shell.

pub mod app;
pub mod choropleth;
pub mod colormap;
pub mod data;
pub mod error;
pub mod geometry;
pub mod legend;
pub mod palette;
pub mod view;
pub mod window;

pub use colormap::{QuantizedColorMap, BUCKETS};
pub use data::{Dataset, Feature};
pub use error::Error;
pub use legend::{build_entries, LegendEntry};
pub use palette::Palette;
