//! Application assembly: selection state, the refresh cycle and the GTK
//! control wiring around the map canvas.

use std::cell::{Cell, RefCell};
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use gtk4::glib::{markup_escape_text, timeout_add_local, ControlFlow, ExitCode};
use gtk4::prelude::*;
use gtk4::{
    Application, ApplicationWindow, DropDown, Label, Orientation, StringList, StringObject,
};
use log::{debug, error, info};

use crate::choropleth::ChoroplethLayer;
use crate::colormap::QuantizedColorMap;
use crate::data::Dataset;
use crate::error::Error;
use crate::legend::{self, LegendEntry, LegendLayer};
use crate::palette::Palette;
use crate::window::{Layer, MapCanvas};

/// Startup configuration for the viewer.
#[derive(Debug, Clone)]
pub struct AppOptions {
    pub data_path: PathBuf,
    pub field: String,
    pub scheme: String,
}

/// Selection state threaded through every refresh, never captured in
/// module-level globals.
struct AppState {
    field: String,
    scheme: String,
    /// Monotonically increasing refresh sequence; stale cycles are dropped.
    seq: u64,
    dataset: Option<Rc<Dataset>>,
    fetch_in_flight: bool,
    fitted: bool,
}

struct AppWidgets {
    canvas: MapCanvas,
    choropleth: Rc<RefCell<ChoroplethLayer>>,
    legend: Rc<RefCell<LegendLayer>>,
    field_drop: DropDown,
    status: Label,
}

type LoaderMessage = (u64, Result<Dataset, Error>);

struct AppCtx {
    data_path: PathBuf,
    state: RefCell<AppState>,
    widgets: AppWidgets,
    loader_tx: mpsc::Sender<LoaderMessage>,
    /// Set while the field dropdown is being repopulated, so the resulting
    /// notify signals do not count as user changes.
    updating_controls: Cell<bool>,
}

pub struct App {
    options: AppOptions,
}

impl App {
    pub fn new(options: AppOptions) -> Self {
        Self { options }
    }

    pub fn run(self) -> ExitCode {
        let app = Application::builder()
            .application_id("dev.choroview.app")
            .build();

        let options = self.options;
        app.connect_activate(move |app| build_window(app, &options));

        // clap already consumed argv
        app.run_with_args::<&str>(&[])
    }
}

fn build_window(app: &Application, options: &AppOptions) {
    let window = ApplicationWindow::builder()
        .application(app)
        .default_width(900)
        .default_height(600)
        .title("choroview")
        .build();

    let canvas = MapCanvas::new();
    let choropleth = Rc::new(RefCell::new(ChoroplethLayer::new(Rc::clone(
        canvas.cursor(),
    ))));
    let legend = Rc::new(RefCell::new(LegendLayer::new()));
    canvas.add_layer(Rc::clone(&choropleth) as Rc<RefCell<dyn Layer>>, 0);
    canvas.add_layer(Rc::clone(&legend) as Rc<RefCell<dyn Layer>>, 10);

    let controls = gtk4::Box::new(Orientation::Horizontal, 8);
    controls.set_margin_start(8);
    controls.set_margin_end(8);
    controls.set_margin_top(6);
    controls.set_margin_bottom(6);

    let field_drop = DropDown::from_strings(&[options.field.as_str()]);
    let scheme_names = Palette::names();
    let scheme_drop = DropDown::from_strings(&scheme_names);
    if let Some(i) = scheme_names.iter().position(|name| *name == options.scheme) {
        scheme_drop.set_selected(i as u32);
    }
    let status = Label::new(None);
    status.set_hexpand(true);
    status.set_xalign(1.0);

    controls.append(&Label::new(Some("Field:")));
    controls.append(&field_drop);
    controls.append(&Label::new(Some("Scheme:")));
    controls.append(&scheme_drop);
    controls.append(&status);

    let vbox = gtk4::Box::new(Orientation::Vertical, 0);
    vbox.append(&controls);
    canvas.widget().set_vexpand(true);
    vbox.append(canvas.widget());
    window.set_child(Some(&vbox));

    let (loader_tx, loader_rx) = mpsc::channel::<LoaderMessage>();

    let ctx = Rc::new(AppCtx {
        data_path: options.data_path.clone(),
        state: RefCell::new(AppState {
            field: options.field.clone(),
            scheme: options.scheme.clone(),
            seq: 0,
            dataset: None,
            fetch_in_flight: false,
            fitted: false,
        }),
        widgets: AppWidgets {
            canvas,
            choropleth,
            legend,
            field_drop: field_drop.clone(),
            status,
        },
        loader_tx,
        updating_controls: Cell::new(false),
    });

    field_drop.connect_selected_notify({
        let ctx = Rc::clone(&ctx);
        move |dropdown| {
            if ctx.updating_controls.get() {
                return;
            }
            if let Some(field) = selected_string(dropdown) {
                on_field_changed(&ctx, &field);
            }
        }
    });

    scheme_drop.connect_selected_notify({
        let ctx = Rc::clone(&ctx);
        move |dropdown| {
            if let Some(scheme) = selected_string(dropdown) {
                on_scheme_changed(&ctx, &scheme);
            }
        }
    });

    timeout_add_local(Duration::from_millis(50), {
        let ctx = Rc::clone(&ctx);
        move || {
            poll_loader(&ctx, &loader_rx);
            ControlFlow::Continue
        }
    });

    refresh(&ctx);
    window.present();
}

fn selected_string(dropdown: &DropDown) -> Option<String> {
    dropdown
        .selected_item()
        .and_downcast::<StringObject>()
        .map(|item| item.string().to_string())
}

fn on_field_changed(ctx: &Rc<AppCtx>, field: &str) {
    if ctx.state.borrow().field == field {
        return;
    }
    ctx.state.borrow_mut().field = field.to_string();
    refresh(ctx);
}

fn on_scheme_changed(ctx: &Rc<AppCtx>, scheme: &str) {
    if ctx.state.borrow().scheme == scheme {
        return;
    }
    ctx.state.borrow_mut().scheme = scheme.to_string();
    refresh(ctx);
}

/// The single refresh entry point. Every invocation gets a fresh sequence
/// number; the dataset is fetched once, on the first cycle.
fn refresh(ctx: &Rc<AppCtx>) {
    let dataset = {
        let mut state = ctx.state.borrow_mut();
        state.seq += 1;
        debug!(
            "refresh #{}: field={:?} scheme={:?}",
            state.seq, state.field, state.scheme
        );
        match &state.dataset {
            Some(dataset) => Some((state.seq, Rc::clone(dataset))),
            None => {
                if !state.fetch_in_flight {
                    state.fetch_in_flight = true;
                    let seq = state.seq;
                    let tx = ctx.loader_tx.clone();
                    let path = ctx.data_path.clone();
                    thread::spawn(move || {
                        let _ = tx.send((seq, Dataset::load(&path)));
                    });
                }
                None
            }
        }
    };
    if let Some((seq, dataset)) = dataset {
        apply(ctx, seq, &dataset);
    }
}

/// Drain the loader channel from the main loop.
fn poll_loader(ctx: &Rc<AppCtx>, rx: &mpsc::Receiver<LoaderMessage>) {
    let Ok((seq, result)) = rx.try_recv() else {
        return;
    };
    match result {
        Ok(dataset) => {
            let dataset = Rc::new(dataset);
            info!(
                "loaded {} features from {:?}",
                dataset.len(),
                ctx.data_path
            );
            let current = {
                let mut state = ctx.state.borrow_mut();
                state.fetch_in_flight = false;
                state.dataset = Some(Rc::clone(&dataset));
                state.seq
            };
            if seq != current {
                // a newer selection superseded the request that spawned the
                // fetch; keep the data, render under the latest selection
                debug!("fetch from refresh #{seq} superseded by #{current}");
            }
            populate_fields(ctx, &dataset);
            fit_view(ctx, &dataset);
            apply(ctx, current, &dataset);
        }
        Err(err) => {
            ctx.state.borrow_mut().fetch_in_flight = false;
            error!("dataset fetch failed: {err}");
            show_error(ctx, &err);
        }
    }
}

/// Replace the field dropdown's entries with the dataset's numeric fields.
fn populate_fields(ctx: &Rc<AppCtx>, dataset: &Dataset) {
    let fields = dataset.numeric_fields();
    if fields.is_empty() {
        return;
    }
    let current = ctx.state.borrow().field.clone();
    let refs: Vec<&str> = fields.iter().map(String::as_str).collect();

    ctx.updating_controls.set(true);
    let dropdown = &ctx.widgets.field_drop;
    dropdown.set_model(Some(&StringList::new(&refs)));
    if let Some(i) = fields.iter().position(|field| *field == current) {
        dropdown.set_selected(i as u32);
    }
    ctx.updating_controls.set(false);
}

/// Fit the view to the dataset bounds, once.
fn fit_view(ctx: &Rc<AppCtx>, dataset: &Dataset) {
    let mut state = ctx.state.borrow_mut();
    if state.fitted {
        return;
    }
    if let Some(bounds) = dataset.bounds() {
        state.fitted = true;
        ctx.widgets.canvas.view().borrow_mut().fit_bounds(
            bounds.min().x,
            bounds.min().y,
            bounds.max().x,
            bounds.max().y,
        );
    }
}

/// Build the scale and legend for the current selection and swap both in
/// together. Errors leave the previous render on screen.
fn apply(ctx: &Rc<AppCtx>, seq: u64, dataset: &Rc<Dataset>) {
    let (field, scheme, current) = {
        let state = ctx.state.borrow();
        (state.field.clone(), state.scheme.clone(), state.seq)
    };
    if seq != current {
        debug!("discarding stale refresh #{seq} (current is #{current})");
        return;
    }

    match build_render(dataset, &field, &scheme) {
        Ok((scale, entries)) => {
            ctx.widgets
                .choropleth
                .borrow_mut()
                .update(Rc::clone(dataset), &field, scale);
            ctx.widgets.legend.borrow_mut().update(&field, entries);
            ctx.widgets.status.set_text("");
            debug!("refresh #{seq} applied");
        }
        Err(err) => {
            error!("refresh #{seq} failed: {err}");
            show_error(ctx, &err);
        }
    }
}

fn build_render(
    dataset: &Dataset,
    field: &str,
    scheme: &str,
) -> Result<(QuantizedColorMap, Vec<LegendEntry>), Error> {
    let palette = Palette::lookup(scheme)?;
    let scale = QuantizedColorMap::from_dataset(dataset, field, palette)?;
    let entries = legend::build_entries(scheme)?;
    Ok((scale, entries))
}

fn show_error(ctx: &Rc<AppCtx>, err: &Error) {
    ctx.widgets.status.set_markup(&format!(
        "<span foreground=\"#b00020\">{}</span>",
        markup_escape_text(&err.to_string())
    ));
}
