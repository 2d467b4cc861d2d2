use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{
    window, HtmlCanvasElement, WebGl2RenderingContext as GL, WebGlProgram, WebGlShader,
    WebGlTexture, WebGlUniformLocation,
};

use crate::app::{App, FrameTiming};
use crate::settings::Settings;
use crate::wave::{WaveBuffer, WAVE_COUNT};

use super::{input, overlay, panel};

const VERT_SRC: &str = include_str!("shaders/waves.vert");
const FRAG_SRC: &str = include_str!("shaders/waves.frag");

// Two triangles covering the whole clip space.
const QUAD_VERTICES: [f32; 12] = [
    -1.0, -1.0, 1.0, -1.0, -1.0, 1.0, //
    1.0, -1.0, 1.0, 1.0, -1.0, 1.0,
];

/// Wire up the app state, event handlers, and control surfaces, then run
/// the animation loop.
pub fn start(canvas: HtmlCanvasElement) -> Result<(), JsValue> {
    fit_canvas_to_window(&canvas);
    let mut renderer = Renderer::new(&canvas)?;
    let app = Rc::new(RefCell::new(App::new()));

    input::attach(&canvas, &app)?;
    panel::build(&app)?;
    overlay::attach(&app)?;

    // Resize canvas to fit window
    let resize_closure = {
        let canvas = canvas.clone();
        Closure::wrap(Box::new(move || {
            fit_canvas_to_window(&canvas);
        }) as Box<dyn FnMut()>)
    };
    window()
        .unwrap()
        .add_event_listener_with_callback("resize", resize_closure.as_ref().unchecked_ref())?;
    resize_closure.forget();

    // Animation loop
    // `f` holds the animation-frame closure so that we can keep calling
    // `request_animation_frame` recursively. Storing it inside an `Option`
    // allows us to create the `Closure` first and then obtain a reference to
    // it from within itself.
    let f: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));
    let g = f.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move |millis: f64| {
        let timing = {
            let mut app = app.borrow_mut();
            app.frame(millis)
        };
        {
            let app = app.borrow();
            renderer.draw(&timing, &app.settings, &app.waves);
        }

        // schedule next
        window()
            .unwrap()
            .request_animation_frame(f.borrow().as_ref().unwrap().as_ref().unchecked_ref())
            .unwrap();
    }) as Box<dyn FnMut(f64)>));

    window()
        .unwrap()
        .request_animation_frame(g.borrow().as_ref().unwrap().as_ref().unchecked_ref())?;

    Ok(())
}

fn fit_canvas_to_window(canvas: &HtmlCanvasElement) {
    let w = window().unwrap().inner_width().unwrap().as_f64().unwrap();
    let h = window().unwrap().inner_height().unwrap().as_f64().unwrap();
    canvas.set_width(w as u32);
    canvas.set_height(h as u32);
}

/// Owns the GL context, the linked wave program, and the data texture the
/// flattened wave buffer is uploaded through each frame.
pub struct Renderer {
    gl: GL,
    canvas: HtmlCanvasElement,
    u_time: Option<WebGlUniformLocation>,
    u_resolution: Option<WebGlUniformLocation>,
    u_wave_type: Option<WebGlUniformLocation>,
    u_mode: Option<WebGlUniformLocation>,
    u_wave_sampler: Option<WebGlUniformLocation>,
    wave_texture: WebGlTexture,
    scratch: Vec<f32>,
}

impl Renderer {
    pub fn new(canvas: &HtmlCanvasElement) -> Result<Self, JsValue> {
        let gl: GL = canvas
            .get_context("webgl2")?
            .ok_or("WebGL2 not supported")?
            .dyn_into()?;

        let program = link_program(&gl, VERT_SRC, &preprocess(FRAG_SRC))?;
        gl.use_program(Some(&program));

        setup_quad(&gl, &program)?;

        let u_time = gl.get_uniform_location(&program, "time");
        let u_resolution = gl.get_uniform_location(&program, "resolution");
        let u_wave_type = gl.get_uniform_location(&program, "waveType");
        let u_mode = gl.get_uniform_location(&program, "mode");
        let u_wave_sampler = gl.get_uniform_location(&program, "waveSampler");

        let wave_texture = create_wave_texture(&gl)?;

        Ok(Self {
            gl,
            canvas: canvas.clone(),
            u_time,
            u_resolution,
            u_wave_type,
            u_mode,
            u_wave_sampler,
            wave_texture,
            scratch: Vec::new(),
        })
    }

    /// Clear, upload the frame's uniforms and wave texture, and draw the
    /// full-screen quad.
    pub fn draw(&mut self, timing: &FrameTiming, settings: &Settings, waves: &WaveBuffer) {
        let gl = &self.gl;
        let (w, h) = (self.canvas.width() as i32, self.canvas.height() as i32);
        gl.viewport(0, 0, w, h);

        gl.clear_color(0.0, 0.0, 0.0, 1.0);
        gl.clear(GL::COLOR_BUFFER_BIT);

        gl.uniform1f(self.u_time.as_ref(), timing.seconds);
        gl.uniform1f(self.u_wave_type.as_ref(), settings.shape.as_uniform());
        gl.uniform1i(self.u_mode.as_ref(), settings.mode.as_uniform());
        gl.uniform2f(self.u_resolution.as_ref(), w as f32, h as f32);

        waves.write_floats(&mut self.scratch);
        gl.active_texture(GL::TEXTURE0);
        gl.bind_texture(GL::TEXTURE_2D, Some(&self.wave_texture));
        // One RGBA32F texel per wave slot: (x, y, startTime, hue).
        unsafe {
            // `view` must not outlive this call: allocating on the wasm heap
            // while it is alive would invalidate the backing memory.
            let view = js_sys::Float32Array::view(&self.scratch);
            if let Err(e) = gl
                .tex_image_2d_with_i32_and_i32_and_i32_and_format_and_type_and_opt_array_buffer_view(
                    GL::TEXTURE_2D,
                    0,
                    GL::RGBA32F as i32,
                    WAVE_COUNT as i32,
                    1,
                    0,
                    GL::RGBA,
                    GL::FLOAT,
                    Some(&view),
                )
            {
                log::error!("wave texture upload failed: {e:?}");
                return;
            }
        }
        gl.uniform1i(self.u_wave_sampler.as_ref(), 0);

        gl.draw_arrays(GL::TRIANGLES, 0, (QUAD_VERTICES.len() / 2) as i32);
    }
}

/// Substitute build-time constants into the shader source, the same role the
/// original templating step played.
fn preprocess(source: &str) -> String {
    source.replace("__WAVE_COUNT__", &WAVE_COUNT.to_string())
}

fn setup_quad(gl: &GL, program: &WebGlProgram) -> Result<(), JsValue> {
    let buffer = gl.create_buffer().ok_or("failed to create vertex buffer")?;
    gl.bind_buffer(GL::ARRAY_BUFFER, Some(&buffer));
    unsafe {
        let view = js_sys::Float32Array::view(&QUAD_VERTICES);
        gl.buffer_data_with_array_buffer_view(GL::ARRAY_BUFFER, &view, GL::STATIC_DRAW);
    }
    let position = gl.get_attrib_location(program, "vertPosition");
    if position < 0 {
        return Err("vertPosition attribute missing".into());
    }
    gl.enable_vertex_attrib_array(position as u32);
    gl.vertex_attrib_pointer_with_i32(position as u32, 2, GL::FLOAT, false, 0, 0);
    Ok(())
}

fn create_wave_texture(gl: &GL) -> Result<WebGlTexture, JsValue> {
    let texture = gl.create_texture().ok_or("failed to create wave texture")?;
    gl.bind_texture(GL::TEXTURE_2D, Some(&texture));
    gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_MAG_FILTER, GL::NEAREST as i32);
    gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_MIN_FILTER, GL::NEAREST as i32);
    gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_WRAP_S, GL::CLAMP_TO_EDGE as i32);
    gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_WRAP_T, GL::CLAMP_TO_EDGE as i32);
    Ok(texture)
}

fn link_program(gl: &GL, vert_src: &str, frag_src: &str) -> Result<WebGlProgram, JsValue> {
    let vert = compile_shader(gl, GL::VERTEX_SHADER, vert_src)?;
    let frag = compile_shader(gl, GL::FRAGMENT_SHADER, frag_src)?;

    let program = gl.create_program().ok_or("failed to create program")?;
    gl.attach_shader(&program, &vert);
    gl.attach_shader(&program, &frag);
    gl.link_program(&program);

    if !gl
        .get_program_parameter(&program, GL::LINK_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        let info = gl
            .get_program_info_log(&program)
            .unwrap_or_else(|| "unknown link error".into());
        log::error!("shader program link failed: {info}");
        return Err(info.into());
    }
    Ok(program)
}

fn compile_shader(gl: &GL, kind: u32, source: &str) -> Result<WebGlShader, JsValue> {
    let shader = gl.create_shader(kind).ok_or("failed to create shader")?;
    gl.shader_source(&shader, source);
    gl.compile_shader(&shader);

    if !gl
        .get_shader_parameter(&shader, GL::COMPILE_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        let info = gl
            .get_shader_info_log(&shader)
            .unwrap_or_else(|| "unknown compile error".into());
        log::error!("shader compile failed: {info}");
        return Err(info.into());
    }
    Ok(shader)
}
