use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{window, HtmlCanvasElement, KeyboardEvent, MouseEvent};

use crate::app::{App, Command};

/// Attach mouse and keyboard handlers to the canvas. The canvas gets a
/// tabindex so it can hold keyboard focus.
pub fn attach(canvas: &HtmlCanvasElement, app: &Rc<RefCell<App>>) -> Result<(), JsValue> {
    canvas.set_attribute("tabindex", "0")?;
    canvas.focus().ok();

    let mousedown = {
        let app = app.clone();
        let canvas = canvas.clone();
        Closure::wrap(Box::new(move |e: MouseEvent| {
            canvas.focus().ok();
            let (x, y) = normalized(&e);
            app.borrow_mut().pointer_down(x, y);
        }) as Box<dyn FnMut(MouseEvent)>)
    };
    canvas.add_event_listener_with_callback("mousedown", mousedown.as_ref().unchecked_ref())?;
    mousedown.forget();

    let mousemove = {
        let app = app.clone();
        Closure::wrap(Box::new(move |e: MouseEvent| {
            let (x, y) = normalized(&e);
            app.borrow_mut().pointer_move(x, y);
        }) as Box<dyn FnMut(MouseEvent)>)
    };
    canvas.add_event_listener_with_callback("mousemove", mousemove.as_ref().unchecked_ref())?;
    mousemove.forget();

    let mouseup = {
        let app = app.clone();
        Closure::wrap(Box::new(move |_: MouseEvent| {
            app.borrow_mut().pointer_up();
        }) as Box<dyn FnMut(MouseEvent)>)
    };
    canvas.add_event_listener_with_callback("mouseup", mouseup.as_ref().unchecked_ref())?;
    mouseup.forget();

    let keydown = {
        let app = app.clone();
        Closure::wrap(Box::new(move |e: KeyboardEvent| {
            let command = match e.key().as_str() {
                " " => Some(Command::ToggleFreeze),
                "ArrowRight" => Some(Command::StepForward),
                "ArrowLeft" => Some(Command::StepBack),
                "ArrowDown" => Some(Command::InjectWave),
                "c" | "C" => Some(Command::Clear),
                "t" | "T" => Some(Command::TestPattern),
                _ => None,
            };
            if let Some(command) = command {
                e.prevent_default(); // keep space/arrows from scrolling the page
                app.borrow_mut().command(command);
            }
        }) as Box<dyn FnMut(KeyboardEvent)>)
    };
    canvas.add_event_listener_with_callback("keydown", keydown.as_ref().unchecked_ref())?;
    keydown.forget();

    Ok(())
}

/// Normalize client coordinates into [0,1] with y pointing up, matching the
/// shader's uv space. Both axes use their own viewport dimension.
fn normalized(e: &MouseEvent) -> (f32, f32) {
    let window = window().unwrap();
    let w = window.inner_width().unwrap().as_f64().unwrap();
    let h = window.inner_height().unwrap().as_f64().unwrap();
    (
        (e.client_x() as f64 / w) as f32,
        (1.0 - e.client_y() as f64 / h) as f32,
    )
}
