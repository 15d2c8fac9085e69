use std::{cell::RefCell, path::Path, rc::Rc};

use gtk4::glib::ExitCode;
use gtk4::prelude::*;

use choroview::{
    choropleth::ChoroplethLayer,
    colormap::QuantizedColorMap,
    data::Dataset,
    legend::{self, LegendLayer},
    palette::Palette,
    window::MapCanvas,
};

const FIELD: &str = "medincome";
const SCHEME: &str = "ylgnbu";

fn main() -> ExitCode {
    let app = gtk4::Application::builder()
        .application_id("dev.choroview.demo")
        .build();

    app.connect_activate(|app| {
        let dataset = Rc::new(
            Dataset::load(Path::new("data/de-data.geojson")).expect("Error reading dataset"),
        );
        let palette = Palette::lookup(SCHEME).expect("Error resolving scheme");
        let scale = QuantizedColorMap::from_dataset(&dataset, FIELD, palette)
            .expect("Error building color scale");

        let canvas = MapCanvas::new();

        let choropleth = Rc::new(RefCell::new(ChoroplethLayer::new(Rc::clone(
            canvas.cursor(),
        ))));
        choropleth
            .borrow_mut()
            .update(Rc::clone(&dataset), FIELD, scale);

        let legend_layer = Rc::new(RefCell::new(LegendLayer::new()));
        legend_layer.borrow_mut().update(
            FIELD,
            legend::build_entries(SCHEME).expect("Error building legend"),
        );

        canvas.add_layer(choropleth, 0);
        canvas.add_layer(legend_layer, 10);

        if let Some(bounds) = dataset.bounds() {
            canvas.view().borrow_mut().fit_bounds(
                bounds.min().x,
                bounds.min().y,
                bounds.max().x,
                bounds.max().y,
            );
        }

        let window = gtk4::ApplicationWindow::builder()
            .application(app)
            .default_width(800)
            .default_height(500)
            .title("Delaware median income")
            .build();
        window.set_child(Some(canvas.widget()));
        window.present();
    });

    app.run_with_args::<&str>(&[])
}
