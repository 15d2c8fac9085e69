use choroview::colormap::{QuantizedColorMap, BUCKETS};
use choroview::data::Dataset;
use choroview::error::Error;
use choroview::legend;
use choroview::palette::Palette;

fn square(x: f64, y: f64, v: &str) -> String {
    format!(
        r#"{{"type": "Feature",
            "geometry": {{"type": "Polygon",
                "coordinates": [[[{x}, {y}], [{x1}, {y}], [{x1}, {y1}], [{x}, {y1}], [{x}, {y}]]]}},
            "properties": {{"NAME": "cell", "v": {v}}}}}"#,
        x = x,
        y = y,
        x1 = x + 1.0,
        y1 = y + 1.0,
        v = v
    )
}

fn collection(values: &[&str]) -> Dataset {
    let features: Vec<String> = values
        .iter()
        .enumerate()
        .map(|(i, v)| square(i as f64 * 2.0, 0.0, v))
        .collect();
    let src = format!(
        r#"{{"type": "FeatureCollection", "features": [{}]}}"#,
        features.join(",")
    );
    Dataset::from_geojson_str(&src).unwrap()
}

#[test]
fn bucket_boundaries_at_equal_fifths() {
    let dataset = collection(&["5", "15", "25", "35", "45"]);
    let palette = Palette::lookup("blues").unwrap();
    let scale = QuantizedColorMap::from_dataset(&dataset, "v", palette).unwrap();

    assert_eq!(scale.domain(), (5.0, 45.0));
    let colors = scale.colors();
    assert_eq!(scale.color_for(5.0), colors[0]);
    assert_eq!(scale.color_for(25.0), colors[2]);
    assert_eq!(scale.color_for(45.0), colors[4]);
}

#[test]
fn legend_matches_scale_for_any_dataset() {
    for scheme in ["blues", "viridis", "rdylbu"] {
        let palette = Palette::lookup(scheme).unwrap();
        let small = collection(&["1", "2"]);
        let large = collection(&["-1000", "0", "1000000"]);

        let scale_small = QuantizedColorMap::from_dataset(&small, "v", palette).unwrap();
        let scale_large = QuantizedColorMap::from_dataset(&large, "v", palette).unwrap();
        let entries = legend::build_entries(scheme).unwrap();

        assert_eq!(entries.len(), BUCKETS);
        let legend_colors: Vec<_> = entries.iter().map(|e| e.color).collect();
        assert_eq!(legend_colors, scale_small.colors());
        assert_eq!(legend_colors, scale_large.colors());
    }
}

#[test]
fn sentinel_values_do_not_widen_the_domain() {
    let dataset = collection(&["10", r#""NA""#, "20"]);
    let palette = Palette::lookup("greens").unwrap();
    let scale = QuantizedColorMap::from_dataset(&dataset, "v", palette).unwrap();
    assert_eq!(scale.domain(), (10.0, 20.0));
}

#[test]
fn refresh_errors_are_typed() {
    let dataset = collection(&[r#""NA""#, r#""NA""#]);
    let palette = Palette::lookup("greens").unwrap();
    assert!(matches!(
        QuantizedColorMap::from_dataset(&dataset, "v", palette),
        Err(Error::EmptyDomain(_))
    ));
    assert!(matches!(
        Palette::lookup("notAPalette"),
        Err(Error::UnknownScheme(_))
    ));
    assert!(matches!(
        QuantizedColorMap::from_dataset(&dataset, "w", palette),
        Err(Error::MissingField(_))
    ));
}
