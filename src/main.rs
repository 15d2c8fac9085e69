use std::path::PathBuf;

use clap::Parser;
use gtk4::glib::ExitCode;

use choroview::app::{App, AppOptions};
use choroview::palette::Palette;

/// Interactive choropleth viewer for GeoJSON feature collections.
#[derive(Parser, Debug)]
#[command(name = "choroview", version, about)]
struct Args {
    /// Path to the GeoJSON feature collection to render
    #[arg(default_value = "data/de-data.geojson")]
    data: PathBuf,

    /// Property used for the initial coloring
    #[arg(long, default_value = "medincome")]
    field: String,

    /// Color scheme used for the initial coloring
    #[arg(long, default_value = "blues")]
    scheme: String,

    /// Print the palette catalog and exit
    #[arg(long)]
    list_schemes: bool,
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    if args.list_schemes {
        for name in Palette::names() {
            println!("{name}");
        }
        return ExitCode::SUCCESS;
    }

    App::new(AppOptions {
        data_path: args.data,
        field: args.field,
        scheme: args.scheme,
    })
    .run()
}
