use enum_assoc::Assoc;
use std::{
    fmt,
    path::{Path, PathBuf},
};

use crate::ShaderError;

#[derive(Debug, PartialEq, Eq, Hash, Copy, Clone, Assoc)]
#[func(pub const fn extension(&self) -> &'static str)]
#[func(pub const fn name(&self) -> &'static str)]
pub enum StageKind {
    #[assoc(extension = "vert")]
    #[assoc(name = "vertex")]
    Vertex,
    #[assoc(extension = "frag")]
    #[assoc(name = "fragment")]
    Fragment,
}

impl StageKind {
    pub const ALL: [StageKind; 2] = [StageKind::Vertex, StageKind::Fragment];

    pub fn from_extension(extension: &str) -> Result<StageKind, ShaderError> {
        StageKind::ALL
            .into_iter()
            .find(|kind| kind.extension() == extension)
            .ok_or_else(|| ShaderError::UnsupportedStageKind(extension.to_owned()))
    }

    /// Infers the stage from the file extension. A missing extension is
    /// reported as an empty one.
    pub fn from_path(path: &Path) -> Result<StageKind, ShaderError> {
        let extension = path
            .extension()
            .map(|ext| ext.to_string_lossy())
            .unwrap_or_default();
        StageKind::from_extension(&extension)
    }
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A compiled shader object that has not been linked yet.
///
/// Stages are consumed by linking; the underlying object is always detached
/// and deleted by then, whatever the link outcome.
#[derive(Debug)]
pub struct ShaderStage<S> {
    pub(crate) handle: S,
    pub(crate) kind: StageKind,
    pub(crate) path: PathBuf,
}

impl<S: Copy> ShaderStage<S> {
    pub fn handle(&self) -> S {
        self.handle
    }

    pub fn kind(&self) -> StageKind {
        self.kind
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[test]
fn test_stage_kind_from_path() {
    assert_eq!(
        StageKind::from_path(Path::new("shaders/constant_gradient.vert")).unwrap(),
        StageKind::Vertex
    );
    assert_eq!(
        StageKind::from_path(Path::new("constant_gradient.frag")).unwrap(),
        StageKind::Fragment
    );

    for (path, expected) in [
        ("shader.glsl", "glsl"),
        ("shader.geom", "geom"),
        ("shader.VERT", "VERT"),
        ("shader", ""),
    ] {
        match StageKind::from_path(Path::new(path)) {
            Err(ShaderError::UnsupportedStageKind(ext)) => assert_eq!(ext, expected),
            other => panic!("{path}: expected UnsupportedStageKind, got {other:?}"),
        }
    }
}

#[test]
fn test_stage_kind_display() {
    assert_eq!(StageKind::Vertex.to_string(), "vertex");
    assert_eq!(StageKind::Fragment.to_string(), "fragment");
    assert_eq!(StageKind::Fragment.extension(), "frag");
}
