use std::{cell::RefCell, rc::Rc, time::Duration};

use gtk4::{
    cairo::Context,
    glib::{timeout_add_local, ControlFlow, Propagation},
    prelude::*,
    DrawingArea, EventControllerMotion, EventControllerScroll, EventControllerScrollFlags,
    GestureDrag,
};

use crate::{geometry::FocusRange, view::ViewState};

/// Something drawable on the map canvas, back to front by z-index.
pub trait Layer {
    fn draw(&self, drawing_area: &DrawingArea, cr: &Context, focus_range: &FocusRange);
}

/// A drawing area with a layer stack, drag/scroll/motion controllers and a
/// redraw tick.
///
/// This is the embeddable part of the viewer: the application wraps it with
/// controls, but it works standalone as a window child (see the example).
pub struct MapCanvas {
    drawing_area: DrawingArea,
    view: Rc<RefCell<ViewState>>,
    layers: Rc<RefCell<Vec<(Rc<RefCell<dyn Layer>>, usize)>>>,
    cursor: Rc<RefCell<Option<(f64, f64)>>>,
}

impl MapCanvas {
    pub fn new() -> Self {
        let drawing_area = DrawingArea::new();
        let view = Rc::new(RefCell::new(ViewState::new(-2, 2, 10.0)));
        let layers: Rc<RefCell<Vec<(Rc<RefCell<dyn Layer>>, usize)>>> =
            Rc::new(RefCell::new(Vec::new()));
        let cursor: Rc<RefCell<Option<(f64, f64)>>> = Rc::new(RefCell::new(None));

        drawing_area.set_draw_func({
            let view = Rc::clone(&view);
            let layers = Rc::clone(&layers);
            move |drawing_area, cr, _, _| {
                cr.set_source_rgb(50.0 / 255.0, 110.0 / 255.0, 150.0 / 255.0);
                cr.paint().expect("Failed to paint background");

                let mut view = view.borrow_mut();
                view.update();
                view.draw_grid(drawing_area, cr);

                let focus_range = view.focus_range();
                for (layer, _) in layers.borrow().iter() {
                    let layer = layer.borrow();
                    layer.draw(drawing_area, cr, focus_range);
                }
            }
        });

        let gesture_drag = GestureDrag::new();
        let last_position = Rc::new(RefCell::new(None));
        gesture_drag.connect_drag_update({
            let view = Rc::clone(&view);
            let last_position = Rc::clone(&last_position);
            move |_, x, y| {
                let mut last_position = last_position.borrow_mut();
                let (dx, dy) = match *last_position {
                    Some((last_x, last_y)) => (x - last_x, y - last_y),
                    None => (0.0, 0.0),
                };
                *last_position = Some((x, y));
                let mut view = view.borrow_mut();
                view.move_focus(dx, dy);
            }
        });

        gesture_drag.connect_drag_end({
            let last_position = Rc::clone(&last_position);
            move |_, _, _| {
                *last_position.borrow_mut() = None;
            }
        });

        let event_controller_scroll = EventControllerScroll::new(EventControllerScrollFlags::all());
        event_controller_scroll.connect_scroll({
            let view = Rc::clone(&view);
            move |_, _, dy| {
                let mut view = view.borrow_mut();
                view.zoom(dy);
                Propagation::Stop
            }
        });

        let event_controller_motion = EventControllerMotion::new();
        event_controller_motion.connect_motion({
            let cursor = Rc::clone(&cursor);
            move |_, x, y| {
                *cursor.borrow_mut() = Some((x, y));
            }
        });
        event_controller_motion.connect_leave({
            let cursor = Rc::clone(&cursor);
            move |_| {
                *cursor.borrow_mut() = None;
            }
        });

        drawing_area.add_controller(gesture_drag);
        drawing_area.add_controller(event_controller_scroll);
        drawing_area.add_controller(event_controller_motion);

        let tick = {
            let drawing_area = drawing_area.clone();
            move || {
                drawing_area.queue_draw();
                ControlFlow::Continue
            }
        };
        timeout_add_local(Duration::from_millis(1000 / 40), tick);

        Self {
            drawing_area,
            view,
            layers,
            cursor,
        }
    }

    pub fn add_layer(&self, layer: Rc<RefCell<dyn Layer>>, z_index: usize) {
        let mut layers = self.layers.borrow_mut();
        layers.push((layer, z_index));
        layers.sort_by_key(|(_, z_index)| *z_index);
    }

    pub fn widget(&self) -> &DrawingArea {
        &self.drawing_area
    }

    pub fn view(&self) -> &Rc<RefCell<ViewState>> {
        &self.view
    }

    /// Last pointer position over the canvas, screen coordinates.
    pub fn cursor(&self) -> &Rc<RefCell<Option<(f64, f64)>>> {
        &self.cursor
    }
}

impl Default for MapCanvas {
    fn default() -> Self {
        Self::new()
    }
}
