use glow::HasContext;
use prism_common::{GraphicsContext, StageKind};

/// `GraphicsContext` backed by a `glow` context.
pub struct GlowContext<'a> {
    gl: &'a glow::Context,
}

impl<'a> GlowContext<'a> {
    /// # Safety
    /// `gl` must be current on this thread for as long as the wrapper lives.
    pub unsafe fn new(gl: &'a glow::Context) -> Self {
        GlowContext { gl }
    }
}

fn shader_type(kind: StageKind) -> u32 {
    match kind {
        StageKind::Vertex => glow::VERTEX_SHADER,
        StageKind::Fragment => glow::FRAGMENT_SHADER,
    }
}

// glow fetches info logs in one call, so the length is derived from the
// fetched text using the GL convention of counting the terminator.
fn reported_length(log: &str) -> i32 {
    if log.is_empty() {
        0
    } else {
        log.len() as i32 + 1
    }
}

fn clamp_log(mut log: String, length: i32) -> String {
    let max = length.max(1) as usize - 1;
    if log.len() > max {
        let mut end = max;
        while !log.is_char_boundary(end) {
            end -= 1;
        }
        log.truncate(end);
    }
    log
}

impl GraphicsContext for GlowContext<'_> {
    type Shader = glow::Shader;
    type Program = glow::Program;

    fn create_shader(&self, kind: StageKind) -> Result<glow::Shader, String> {
        unsafe { self.gl.create_shader(shader_type(kind)) }
    }

    fn shader_source(&self, shader: glow::Shader, source: &str) {
        unsafe { self.gl.shader_source(shader, source) }
    }

    fn compile_shader(&self, shader: glow::Shader) {
        unsafe { self.gl.compile_shader(shader) }
    }

    fn shader_compile_status(&self, shader: glow::Shader) -> bool {
        unsafe { self.gl.get_shader_compile_status(shader) }
    }

    fn shader_info_log_length(&self, shader: glow::Shader) -> i32 {
        reported_length(&unsafe { self.gl.get_shader_info_log(shader) })
    }

    fn shader_info_log(&self, shader: glow::Shader, length: i32) -> String {
        clamp_log(unsafe { self.gl.get_shader_info_log(shader) }, length)
    }

    fn delete_shader(&self, shader: glow::Shader) {
        unsafe { self.gl.delete_shader(shader) }
    }

    fn create_program(&self) -> Result<glow::Program, String> {
        unsafe { self.gl.create_program() }
    }

    fn attach_shader(&self, program: glow::Program, shader: glow::Shader) {
        unsafe { self.gl.attach_shader(program, shader) }
    }

    fn detach_shader(&self, program: glow::Program, shader: glow::Shader) {
        unsafe { self.gl.detach_shader(program, shader) }
    }

    fn link_program(&self, program: glow::Program) {
        unsafe { self.gl.link_program(program) }
    }

    fn program_link_status(&self, program: glow::Program) -> bool {
        unsafe { self.gl.get_program_link_status(program) }
    }

    fn program_info_log_length(&self, program: glow::Program) -> i32 {
        reported_length(&unsafe { self.gl.get_program_info_log(program) })
    }

    fn program_info_log(&self, program: glow::Program, length: i32) -> String {
        clamp_log(unsafe { self.gl.get_program_info_log(program) }, length)
    }

    fn delete_program(&self, program: glow::Program) {
        unsafe { self.gl.delete_program(program) }
    }
}

#[test]
fn test_log_length_convention() {
    assert_eq!(reported_length(""), 0);
    assert_eq!(reported_length("error"), 6);
    assert_eq!(clamp_log("error: x".to_owned(), 6), "error");
    assert_eq!(clamp_log("error".to_owned(), 0), "");
}
