/// Versor Web - WebGL2 host for the versor render loop
///
/// JavaScript owns the frame clock: call `frame()` from `requestAnimationFrame`
/// and forward the three axis inputs through `set_axis_input`.
use log::{info, warn};
use nalgebra::Matrix4;
use versor_core::{
    obj, AxisSegment, Camera, Mesh, Presentation, Readouts, RenderLoop, RenderTarget, Result,
    VersorError, VisualizerConfig,
};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    HtmlCanvasElement, WebGl2RenderingContext as Gl, WebGlBuffer, WebGlProgram, WebGlShader,
    WebGlUniformLocation,
};

const MESH_VS: &str = r#"#version 300 es
in vec3 vp;
in vec2 vt;
in vec3 vn;
uniform mat4 M, V, P;
out vec2 st;
out vec3 n_eye;
void main () {
    st = vt;
    n_eye = (V * M * vec4 (vn, 0.0)).xyz;
    gl_Position = P * V * M * vec4 (vp, 1.0);
}
"#;

const MESH_FS: &str = r#"#version 300 es
precision mediump float;
in vec2 st;
in vec3 n_eye;
out vec4 frag_colour;
void main () {
    float lit = max (dot (normalize (n_eye), vec3 (0.0, 0.0, 1.0)), 0.0);
    vec3 base = mix (vec3 (0.9, 0.8, 0.6), vec3 (st, 0.6), 0.15);
    frag_colour = vec4 (vec3 (0.1) + base * lit, 1.0);
}
"#;

const AXIS_VS: &str = r#"#version 300 es
in vec3 vp;
in vec3 vc;
uniform mat4 V, P;
out vec3 colour;
void main () {
    colour = vc;
    gl_Position = P * V * vec4 (vp, 1.0);
}
"#;

const AXIS_FS: &str = r#"#version 300 es
precision mediump float;
in vec3 colour;
out vec4 frag_colour;
void main () {
    frag_colour = vec4 (colour, 1.0);
}
"#;

fn backend(what: &str) -> VersorError {
    VersorError::Backend(what.to_string())
}

fn to_js(e: VersorError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// f32 slice as the little-endian bytes WebGL expects
fn f32_bytes(data: &[f32]) -> Vec<u8> {
    data.iter().flat_map(|v| v.to_le_bytes()).collect()
}

fn compile_shader(gl: &Gl, kind: u32, source: &str) -> Result<WebGlShader> {
    let shader = gl.create_shader(kind).ok_or_else(|| backend("unable to create shader"))?;
    gl.shader_source(&shader, source);
    gl.compile_shader(&shader);

    if gl
        .get_shader_parameter(&shader, Gl::COMPILE_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        Ok(shader)
    } else {
        let log = gl.get_shader_info_log(&shader).unwrap_or_default();
        gl.delete_shader(Some(&shader));
        Err(VersorError::Backend(format!("shader compile failed: {}", log)))
    }
}

/// Link a program, binding attribute names to locations in order.
fn link_program(gl: &Gl, vs: &str, fs: &str, attributes: &[&str]) -> Result<WebGlProgram> {
    let vs = compile_shader(gl, Gl::VERTEX_SHADER, vs)?;
    let fs = compile_shader(gl, Gl::FRAGMENT_SHADER, fs)?;
    let program = gl.create_program().ok_or_else(|| backend("unable to create program"))?;
    gl.attach_shader(&program, &vs);
    gl.attach_shader(&program, &fs);
    for (location, name) in attributes.iter().enumerate() {
        gl.bind_attrib_location(&program, location as u32, name);
    }
    gl.link_program(&program);

    if gl
        .get_program_parameter(&program, Gl::LINK_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        Ok(program)
    } else {
        let log = gl.get_program_info_log(&program).unwrap_or_default();
        gl.delete_program(Some(&program));
        Err(VersorError::Backend(format!("program link failed: {}", log)))
    }
}

fn upload_buffer(gl: &Gl, buffer: &WebGlBuffer, data: &[f32]) {
    gl.bind_buffer(Gl::ARRAY_BUFFER, Some(buffer));
    gl.buffer_data_with_u8_array(Gl::ARRAY_BUFFER, &f32_bytes(data), Gl::STATIC_DRAW);
}

fn create_buffer(gl: &Gl, data: &[f32]) -> Result<WebGlBuffer> {
    let buffer = gl.create_buffer().ok_or_else(|| backend("unable to create buffer"))?;
    upload_buffer(gl, &buffer, data);
    Ok(buffer)
}

fn bind_attribute(gl: &Gl, buffer: &WebGlBuffer, location: u32, size: i32) {
    gl.bind_buffer(Gl::ARRAY_BUFFER, Some(buffer));
    gl.vertex_attrib_pointer_with_i32(location, size, Gl::FLOAT, false, 0, 0);
    gl.enable_vertex_attrib_array(location);
}

struct MeshProgram {
    program: WebGlProgram,
    m_loc: Option<WebGlUniformLocation>,
    v_loc: Option<WebGlUniformLocation>,
    p_loc: Option<WebGlUniformLocation>,
    positions: WebGlBuffer,
    texcoords: WebGlBuffer,
    normals: WebGlBuffer,
    vertex_count: i32,
}

struct AxisProgram {
    program: WebGlProgram,
    v_loc: Option<WebGlUniformLocation>,
    p_loc: Option<WebGlUniformLocation>,
    positions: WebGlBuffer,
    colors: WebGlBuffer,
}

/// WebGL2 render target that also keeps the latest readouts for JavaScript.
pub struct WebGlHost {
    gl: Gl,
    mesh: MeshProgram,
    axis: AxisProgram,
    readouts: Readouts,
}

impl WebGlHost {
    pub fn new(canvas: &HtmlCanvasElement, mesh: &Mesh, config: &VisualizerConfig) -> Result<Self> {
        let gl = canvas
            .get_context("webgl2")
            .map_err(|_| backend("get_context failed"))?
            .ok_or_else(|| backend("WebGL2 is not available"))?
            .dyn_into::<Gl>()
            .map_err(|_| backend("context is not WebGL2"))?;

        let program = link_program(&gl, MESH_VS, MESH_FS, &["vp", "vt", "vn"])?;
        let mesh_program = MeshProgram {
            m_loc: gl.get_uniform_location(&program, "M"),
            v_loc: gl.get_uniform_location(&program, "V"),
            p_loc: gl.get_uniform_location(&program, "P"),
            program,
            positions: create_buffer(&gl, &mesh.flat_positions())?,
            texcoords: create_buffer(&gl, &mesh.flat_texcoords())?,
            normals: create_buffer(&gl, &mesh.flat_normals())?,
            vertex_count: mesh.vertex_count() as i32,
        };

        let program = link_program(&gl, AXIS_VS, AXIS_FS, &["vp", "vc"])?;
        let segment = AxisSegment::along(&nalgebra::Vector3::y());
        let axis_program = AxisProgram {
            v_loc: gl.get_uniform_location(&program, "V"),
            p_loc: gl.get_uniform_location(&program, "P"),
            program,
            positions: create_buffer(&gl, &segment.positions())?,
            colors: create_buffer(&gl, &segment.flat_colors())?,
        };

        let (width, height) = (canvas.width(), canvas.height());
        let camera = Camera::for_viewport(width, height, 1.0, config);
        let view = camera.view_matrix();
        let projection = camera.projection_matrix();
        for (program, v_loc, p_loc) in [
            (&mesh_program.program, &mesh_program.v_loc, &mesh_program.p_loc),
            (&axis_program.program, &axis_program.v_loc, &axis_program.p_loc),
        ] {
            gl.use_program(Some(program));
            gl.uniform_matrix4fv_with_f32_array(v_loc.as_ref(), false, view.as_slice());
            gl.uniform_matrix4fv_with_f32_array(p_loc.as_ref(), false, projection.as_slice());
        }

        gl.cull_face(Gl::BACK);
        gl.front_face(Gl::CCW);
        gl.enable(Gl::CULL_FACE);
        gl.enable(Gl::DEPTH_TEST);
        gl.disable(Gl::BLEND);
        gl.clear_color(0.1, 0.1, 0.3, 1.0);
        gl.viewport(0, 0, width as i32, height as i32);

        info!("WebGL2 host ready, {}x{}, {} vertices", width, height, mesh.vertex_count());
        Ok(Self {
            gl,
            mesh: mesh_program,
            axis: axis_program,
            readouts: Readouts::default(),
        })
    }
}

impl RenderTarget for WebGlHost {
    fn clear(&mut self) -> Result<()> {
        self.gl.clear(Gl::COLOR_BUFFER_BIT | Gl::DEPTH_BUFFER_BIT);
        Ok(())
    }

    fn draw_mesh(&mut self, model: &Matrix4<f32>) -> Result<()> {
        let gl = &self.gl;
        let mesh = &self.mesh;
        gl.use_program(Some(&mesh.program));
        gl.uniform_matrix4fv_with_f32_array(mesh.m_loc.as_ref(), false, model.as_slice());
        bind_attribute(gl, &mesh.positions, 0, 3);
        bind_attribute(gl, &mesh.texcoords, 1, 2);
        bind_attribute(gl, &mesh.normals, 2, 3);
        gl.draw_arrays(Gl::TRIANGLES, 0, mesh.vertex_count);
        for location in 0..3 {
            gl.disable_vertex_attrib_array(location);
        }
        Ok(())
    }

    fn draw_axis(&mut self) -> Result<()> {
        let gl = &self.gl;
        let axis = &self.axis;
        gl.use_program(Some(&axis.program));
        bind_attribute(gl, &axis.positions, 0, 3);
        bind_attribute(gl, &axis.colors, 1, 3);
        gl.draw_arrays(Gl::LINES, 0, 2);
        gl.disable_vertex_attrib_array(0);
        gl.disable_vertex_attrib_array(1);
        Ok(())
    }

    fn upload_axis_segment(&mut self, segment: &AxisSegment) -> Result<()> {
        upload_buffer(&self.gl, &self.axis.positions, &segment.positions());
        Ok(())
    }
}

impl Presentation for WebGlHost {
    fn show_angle(&mut self, text: &str) {
        self.readouts.angle = text.to_string();
    }

    fn show_axis(&mut self, text: &str) {
        self.readouts.axis = text.to_string();
    }

    fn show_versor(&mut self, text: &str) {
        self.readouts.versor = text.to_string();
    }

    fn show_matrix(&mut self, text: &str) {
        self.readouts.matrix = text.to_string();
    }
}

/// Browser entry point: a render loop bound to one canvas.
#[wasm_bindgen]
pub struct WebVisualizer {
    host: WebGlHost,
    render_loop: RenderLoop,
    running: bool,
}

#[wasm_bindgen]
impl WebVisualizer {
    /// Attach to the canvas with id `canvas_id`; `obj_source` is OBJ text, a cube when absent.
    #[wasm_bindgen(constructor)]
    pub fn new(canvas_id: &str, obj_source: Option<String>) -> std::result::Result<WebVisualizer, JsValue> {
        let canvas = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(canvas_id))
            .ok_or_else(|| JsValue::from_str(&format!("no element with id {}", canvas_id)))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| JsValue::from_str(&format!("{} is not a canvas", canvas_id)))?;

        let mesh = match obj_source {
            Some(text) => obj::parse_obj(&text).map_err(to_js)?,
            None => Mesh::cube(2.0),
        };

        let config = VisualizerConfig::default();
        let mut host = WebGlHost::new(&canvas, &mesh, &config).map_err(to_js)?;
        let mut render_loop = RenderLoop::new(&config).map_err(to_js)?;
        render_loop.initialize(&mut host).map_err(to_js)?;

        Ok(WebVisualizer {
            host,
            render_loop,
            running: true,
        })
    }

    /// Apply the three axis input fields; returns false and changes nothing
    /// when any of them has no leading integer.
    pub fn set_axis_input(&mut self, x: &str, y: &str, z: &str) -> bool {
        match self.render_loop.axis_mut().set_from_text(x, y, z) {
            Ok(()) => true,
            Err(e) => {
                warn!("axis input ignored: {}", e);
                false
            }
        }
    }

    /// Draw one frame and advance; does nothing after `stop()`.
    pub fn frame(&mut self) -> std::result::Result<(), JsValue> {
        if !self.running {
            return Ok(());
        }
        self.render_loop.step(&mut self.host).map_err(to_js)
    }

    pub fn stop(&mut self) {
        self.running = false;
        info!("stopped after {} frames", self.render_loop.frame_count());
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn angle_degrees(&self) -> f32 {
        self.render_loop.orientation().angle_degrees()
    }

    #[wasm_bindgen(getter)]
    pub fn angle_text(&self) -> String {
        self.host.readouts.angle.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn axis_text(&self) -> String {
        self.host.readouts.axis.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn versor_text(&self) -> String {
        self.host.readouts.versor.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn matrix_text(&self) -> String {
        self.host.readouts.matrix.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_f32_bytes_little_endian() {
        assert_eq!(f32_bytes(&[1.0]), vec![0x00, 0x00, 0x80, 0x3f]);
        assert_eq!(f32_bytes(&[0.0, -2.0]).len(), 8);
    }

    #[test]
    fn test_shaders_bind_expected_attributes() {
        for name in ["in vec3 vp;", "in vec2 vt;", "in vec3 vn;"] {
            assert!(MESH_VS.contains(name));
        }
        assert!(AXIS_VS.contains("in vec3 vc;"));
        assert!(MESH_VS.starts_with("#version 300 es"));
    }
}
