use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{window, HtmlElement};

use crate::app::{App, FrameHook, FrameTiming};
use crate::fps::FpsMeter;

/// Create the FPS readout element and register the hook that refreshes it
/// once per second.
pub fn attach(app: &Rc<RefCell<App>>) -> Result<(), JsValue> {
    let document = window()
        .ok_or("no window")?
        .document()
        .ok_or("no document")?;
    let body = document.body().ok_or("no body")?;

    let readout: HtmlElement = document.create_element("div")?.dyn_into()?;
    readout.set_class_name("fps");
    readout.set_text_content(Some("-- fps"));
    body.append_child(&readout)?;

    app.borrow_mut().register_hook(Box::new(FpsReadout {
        meter: FpsMeter::new(),
        element: readout,
    }));
    Ok(())
}

struct FpsReadout {
    meter: FpsMeter,
    element: HtmlElement,
}

impl FrameHook for FpsReadout {
    fn frame(&mut self, timing: &FrameTiming) {
        // Rate comes from wall time; frozen animation still renders frames.
        if let Some(fps) = self.meter.frame(timing.wall_millis) {
            self.element.set_text_content(Some(&format!("{fps} fps")));
        }
    }
}
