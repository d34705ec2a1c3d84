//! Shader program construction shared by the prism demos.
//!
//! Everything here talks to the GPU through [`GraphicsContext`], so the
//! crate has no dependency on a particular GL binding.

mod builder;
pub use builder::{BuildState, ProgramBuild, ShaderProgram, ShaderProgramBuilder};
pub mod config;
pub use config::DemoConfig;
mod context;
pub use context::GraphicsContext;
mod diagnostics;
pub use diagnostics::DiagnosticLog;
mod error;
pub use error::{Result, ShaderError};
pub mod logging;
mod source;
pub use source::ShaderSource;
mod stage;
pub use stage::{ShaderStage, StageKind};

#[cfg(test)]
mod fake;
