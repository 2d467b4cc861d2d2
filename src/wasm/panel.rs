use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{
    window, Document, HtmlButtonElement, HtmlElement, HtmlInputElement, HtmlOptionElement,
    HtmlSelectElement,
};

use crate::app::{App, Command};
use crate::settings::RenderMode;
use crate::wave::WaveShape;

/// Build the settings panel: speed slider, mode and wave-shape selects, and
/// the randomize / freeze triggers.
pub fn build(app: &Rc<RefCell<App>>) -> Result<(), JsValue> {
    let document = window()
        .ok_or("no window")?
        .document()
        .ok_or("no document")?;
    let body = document.body().ok_or("no body")?;

    let panel: HtmlElement = document.create_element("div")?.dyn_into()?;
    panel.set_class_name("panel");

    build_speed(&document, &panel, app)?;
    build_mode(&document, &panel, app)?;
    build_shape(&document, &panel, app)?;
    build_randomize(&document, &panel, app)?;
    build_freeze(&document, &panel, app)?;

    body.append_child(&panel)?;
    Ok(())
}

fn labelled_row(document: &Document, panel: &HtmlElement, label: &str) -> Result<HtmlElement, JsValue> {
    let row: HtmlElement = document.create_element("label")?.dyn_into()?;
    let caption = document.create_element("span")?;
    caption.set_text_content(Some(label));
    row.append_child(&caption)?;
    panel.append_child(&row)?;
    Ok(row)
}

fn build_speed(document: &Document, panel: &HtmlElement, app: &Rc<RefCell<App>>) -> Result<(), JsValue> {
    let row = labelled_row(document, panel, "speed")?;
    let slider: HtmlInputElement = document.create_element("input")?.dyn_into()?;
    slider.set_type("range");
    slider.set_min("-5");
    slider.set_max("5");
    slider.set_step("0.1");
    slider.set_value("1");

    let oninput = {
        let app = app.clone();
        let slider = slider.clone();
        Closure::wrap(Box::new(move || {
            if let Ok(speed) = slider.value().parse::<f32>() {
                app.borrow_mut().settings.speed = speed;
            }
        }) as Box<dyn FnMut()>)
    };
    slider.add_event_listener_with_callback("input", oninput.as_ref().unchecked_ref())?;
    oninput.forget();

    row.append_child(&slider)?;
    Ok(())
}

fn select_with_options(
    document: &Document,
    options: &[(&str, &str)],
) -> Result<HtmlSelectElement, JsValue> {
    let select: HtmlSelectElement = document.create_element("select")?.dyn_into()?;
    for (value, text) in options {
        let option: HtmlOptionElement = document.create_element("option")?.dyn_into()?;
        option.set_value(value);
        option.set_text(text);
        select.append_child(&option)?;
    }
    Ok(select)
}

fn build_mode(document: &Document, panel: &HtmlElement, app: &Rc<RefCell<App>>) -> Result<(), JsValue> {
    let row = labelled_row(document, panel, "mode")?;
    let select = select_with_options(document, &[("normal", "Normal"), ("3d", "3D")])?;

    let onchange = {
        let app = app.clone();
        let select = select.clone();
        Closure::wrap(Box::new(move || {
            let mode = match select.value().as_str() {
                "3d" => RenderMode::ThreeD,
                _ => RenderMode::Normal,
            };
            app.borrow_mut().settings.mode = mode;
        }) as Box<dyn FnMut()>)
    };
    select.add_event_listener_with_callback("change", onchange.as_ref().unchecked_ref())?;
    onchange.forget();

    row.append_child(&select)?;
    Ok(())
}

fn build_shape(document: &Document, panel: &HtmlElement, app: &Rc<RefCell<App>>) -> Result<(), JsValue> {
    let row = labelled_row(document, panel, "wave")?;
    let select = select_with_options(
        document,
        &[("sine", "Sine"), ("square", "Square"), ("peak", "Peak")],
    )?;

    let onchange = {
        let app = app.clone();
        let select = select.clone();
        Closure::wrap(Box::new(move || {
            let shape = match select.value().as_str() {
                "square" => WaveShape::DecayingSquare,
                "peak" => WaveShape::Peak,
                _ => WaveShape::DecayingSine,
            };
            app.borrow_mut().settings.shape = shape;
        }) as Box<dyn FnMut()>)
    };
    select.add_event_listener_with_callback("change", onchange.as_ref().unchecked_ref())?;
    onchange.forget();

    row.append_child(&select)?;
    Ok(())
}

fn build_randomize(document: &Document, panel: &HtmlElement, app: &Rc<RefCell<App>>) -> Result<(), JsValue> {
    let button: HtmlButtonElement = document.create_element("button")?.dyn_into()?;
    button.set_text_content(Some("randomize"));

    let onclick = {
        let app = app.clone();
        Closure::wrap(Box::new(move || {
            app.borrow_mut().command(Command::Randomize);
        }) as Box<dyn FnMut()>)
    };
    button.add_event_listener_with_callback("click", onclick.as_ref().unchecked_ref())?;
    onclick.forget();

    panel.append_child(&button)?;
    Ok(())
}

fn build_freeze(document: &Document, panel: &HtmlElement, app: &Rc<RefCell<App>>) -> Result<(), JsValue> {
    let button: HtmlButtonElement = document.create_element("button")?.dyn_into()?;
    button.set_text_content(Some("freeze"));

    let onclick = {
        let app = app.clone();
        let button = button.clone();
        Closure::wrap(Box::new(move || {
            let mut app = app.borrow_mut();
            app.command(Command::ToggleFreeze);
            let label = if app.clock.is_frozen() { "unfreeze" } else { "freeze" };
            button.set_text_content(Some(label));
        }) as Box<dyn FnMut()>)
    };
    button.add_event_listener_with_callback("click", onclick.as_ref().unchecked_ref())?;
    onclick.forget();

    panel.append_child(&button)?;
    Ok(())
}
