use std::fmt::Debug;

use crate::StageKind;

/// The subset of a GL-style API needed to build shader programs.
///
/// Implementations wrap a context that is current on the calling thread.
/// Info-log lengths follow the GL convention: the reported length counts the
/// trailing NUL, and zero means there is no log.
pub trait GraphicsContext {
    type Shader: Copy + Debug;
    type Program: Copy + Debug;

    fn create_shader(&self, kind: StageKind) -> Result<Self::Shader, String>;
    fn shader_source(&self, shader: Self::Shader, source: &str);
    fn compile_shader(&self, shader: Self::Shader);
    fn shader_compile_status(&self, shader: Self::Shader) -> bool;
    fn shader_info_log_length(&self, shader: Self::Shader) -> i32;
    fn shader_info_log(&self, shader: Self::Shader, length: i32) -> String;
    fn delete_shader(&self, shader: Self::Shader);

    fn create_program(&self) -> Result<Self::Program, String>;
    fn attach_shader(&self, program: Self::Program, shader: Self::Shader);
    fn detach_shader(&self, program: Self::Program, shader: Self::Shader);
    fn link_program(&self, program: Self::Program);
    fn program_link_status(&self, program: Self::Program) -> bool;
    fn program_info_log_length(&self, program: Self::Program) -> i32;
    fn program_info_log(&self, program: Self::Program, length: i32) -> String;
    fn delete_program(&self, program: Self::Program);
}
