use std::ffi::c_void;
use std::ptr;

use anyhow::{Context as _, Result, anyhow, bail};
use glow::HasContext;
use khronos_egl as egl;

use trigon_engine::coords::SurfaceSize;
use trigon_engine::render::{GlError, Renderer, Vertex};

const VERTEX_SHADER: &str = "#version 300 es
in vec2 i_position;
in vec4 i_color;
in vec2 i_offset;
out vec4 v_color;
void main() {
    v_color = i_color;
    gl_Position = vec4(i_offset + i_position, 0.0, 1.0);
}
";

const FRAGMENT_SHADER: &str = "#version 300 es
precision mediump float;
in vec4 v_color;
out vec4 o_color;
void main() {
    o_color = v_color;
}
";

const ATTRIB_POSITION: u32 = 0;
const ATTRIB_COLOR: u32 = 1;
const ATTRIB_OFFSET: u32 = 2;

/// GL objects owned by the current context.
struct GlObjects {
    program: glow::Program,
    vao: glow::VertexArray,
    vbo: glow::Buffer,
}

/// `Renderer` over OpenGL ES 3.0 through `glow`.
pub struct GlesRenderer {
    egl: egl::Instance<egl::Static>,

    /// Entry points, resolved on first load. They stay valid across contexts.
    gl: Option<glow::Context>,
    objects: Option<GlObjects>,
}

impl GlesRenderer {
    pub fn new() -> Self {
        Self {
            egl: egl::Instance::new(egl::Static),
            gl: None,
            objects: None,
        }
    }
}

impl Default for GlesRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for GlesRenderer {
    fn load(&mut self, clear_color: [f32; 4]) -> Result<()> {
        let egl = &self.egl;
        let gl = self.gl.get_or_insert_with(|| {
            log::debug!("resolving GLES entry points");
            // SAFETY: called with the EGL context current; every pointer comes
            // from eglGetProcAddress.
            unsafe {
                glow::Context::from_loader_function(|name| {
                    egl.get_proc_address(name)
                        .map_or(ptr::null(), |f| f as *const c_void)
                })
            }
        });

        // SAFETY: the render context is current on this thread.
        let objects = unsafe {
            let [r, g, b, a] = clear_color;
            gl.clear_color(r, g, b, a);
            gl.disable(glow::DEPTH_TEST);
            gl.clear(glow::COLOR_BUFFER_BIT);

            let program = link_program(gl).context("building triangle program")?;
            let (vao, vbo) = match create_vertex_buffer(gl) {
                Ok(objs) => objs,
                Err(e) => {
                    gl.delete_program(program);
                    return Err(e.context("creating vertex buffer"));
                }
            };
            GlObjects { program, vao, vbo }
        };

        log::debug!("GL objects created");
        self.objects = Some(objects);
        Ok(())
    }

    fn is_loaded(&self) -> bool {
        self.objects.is_some()
    }

    fn invalidate(&mut self) {
        if self.objects.take().is_some() {
            log::debug!("forgetting GL objects of the previous context");
        }
    }

    fn set_viewport(&mut self, size: SurfaceSize) {
        if let Some(gl) = &self.gl {
            // SAFETY: the render context is current on this thread.
            unsafe { gl.viewport(0, 0, size.width, size.height) };
        }
    }

    fn draw(&mut self, vertices: &[Vertex]) {
        let (Some(gl), Some(objects)) = (&self.gl, &self.objects) else {
            return;
        };

        // SAFETY: the render context is current and owns `objects`.
        unsafe {
            gl.clear(glow::COLOR_BUFFER_BIT);
            gl.use_program(Some(objects.program));
            gl.bind_vertex_array(Some(objects.vao));
            gl.bind_buffer(glow::ARRAY_BUFFER, Some(objects.vbo));
            gl.buffer_data_u8_slice(
                glow::ARRAY_BUFFER,
                bytemuck::cast_slice(vertices),
                glow::DYNAMIC_DRAW,
            );
            gl.draw_arrays(glow::TRIANGLES, 0, vertices.len() as i32);
        }
    }

    fn next_error(&mut self) -> Option<GlError> {
        let gl = self.gl.as_ref()?;
        // SAFETY: glGetError has no preconditions beyond a current context.
        match unsafe { gl.get_error() } {
            glow::NO_ERROR => None,
            code => Some(GlError(code)),
        }
    }
}

unsafe fn compile_shader(gl: &glow::Context, kind: u32, source: &str) -> Result<glow::Shader> {
    unsafe {
        let shader = gl.create_shader(kind).map_err(|e| anyhow!("glCreateShader: {e}"))?;
        gl.shader_source(shader, source);
        gl.compile_shader(shader);

        if !gl.get_shader_compile_status(shader) {
            let info = gl.get_shader_info_log(shader);
            gl.delete_shader(shader);
            bail!("shader compilation failed: {info}");
        }
        Ok(shader)
    }
}

unsafe fn link_program(gl: &glow::Context) -> Result<glow::Program> {
    unsafe {
        let vs = compile_shader(gl, glow::VERTEX_SHADER, VERTEX_SHADER).context("vertex shader")?;
        let fs = match compile_shader(gl, glow::FRAGMENT_SHADER, FRAGMENT_SHADER) {
            Ok(fs) => fs,
            Err(e) => {
                gl.delete_shader(vs);
                return Err(e.context("fragment shader"));
            }
        };

        let program = gl.create_program().map_err(|e| anyhow!("glCreateProgram: {e}"))?;
        gl.attach_shader(program, vs);
        gl.attach_shader(program, fs);
        gl.bind_attrib_location(program, ATTRIB_POSITION, "i_position");
        gl.bind_attrib_location(program, ATTRIB_COLOR, "i_color");
        gl.bind_attrib_location(program, ATTRIB_OFFSET, "i_offset");
        gl.link_program(program);

        gl.detach_shader(program, vs);
        gl.detach_shader(program, fs);
        gl.delete_shader(vs);
        gl.delete_shader(fs);

        if !gl.get_program_link_status(program) {
            let info = gl.get_program_info_log(program);
            gl.delete_program(program);
            bail!("program link failed: {info}");
        }

        gl.use_program(Some(program));
        Ok(program)
    }
}

unsafe fn create_vertex_buffer(gl: &glow::Context) -> Result<(glow::VertexArray, glow::Buffer)> {
    unsafe {
        let vao = gl.create_vertex_array().map_err(|e| anyhow!("glGenVertexArrays: {e}"))?;
        let vbo = match gl.create_buffer() {
            Ok(vbo) => vbo,
            Err(e) => {
                gl.delete_vertex_array(vao);
                bail!("glGenBuffers: {e}");
            }
        };

        gl.bind_vertex_array(Some(vao));
        gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));

        gl.enable_vertex_attrib_array(ATTRIB_POSITION);
        gl.enable_vertex_attrib_array(ATTRIB_COLOR);
        gl.enable_vertex_attrib_array(ATTRIB_OFFSET);

        gl.vertex_attrib_pointer_f32(
            ATTRIB_POSITION,
            2,
            glow::FLOAT,
            false,
            Vertex::STRIDE,
            Vertex::POSITION_OFFSET,
        );
        gl.vertex_attrib_pointer_f32(
            ATTRIB_COLOR,
            4,
            glow::FLOAT,
            false,
            Vertex::STRIDE,
            Vertex::COLOR_OFFSET,
        );
        gl.vertex_attrib_pointer_f32(
            ATTRIB_OFFSET,
            2,
            glow::FLOAT,
            false,
            Vertex::STRIDE,
            Vertex::OFFSET_OFFSET,
        );

        gl.buffer_data_size(glow::ARRAY_BUFFER, 3 * Vertex::STRIDE, glow::DYNAMIC_DRAW);
        Ok((vao, vbo))
    }
}
