use std::{io, path::PathBuf};
use thiserror::Error;

use crate::{BuildState, StageKind};

#[derive(Debug, Error)]
pub enum ShaderError {
    #[error("could not open shader file {}", .path.display())]
    FileNotFound {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("unsupported shader stage extension {0:?} (expected \"vert\" or \"frag\")")]
    UnsupportedStageKind(String),

    #[error("{kind} shader {} failed to compile\n\n{log}", .path.display())]
    Compile {
        path: PathBuf,
        kind: StageKind,
        log: String,
    },

    #[error("linker failure\n\n{log}")]
    Link { log: String },

    #[error("program has no {0} stage")]
    MissingStage(StageKind),

    #[error("program build already finished ({0:?}), start a new build to retry")]
    AlreadyLinked(BuildState),

    #[error("graphics context error: {0}")]
    Context(String),
}

pub type Result<T, E = ShaderError> = std::result::Result<T, E>;
