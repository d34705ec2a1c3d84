use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{ShaderError, StageKind};

/// Shader text read from disk, kept only until it has been compiled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderSource {
    path: PathBuf,
    text: String,
}

impl ShaderSource {
    pub fn new(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        ShaderSource {
            path: path.into(),
            text: text.into(),
        }
    }

    /// Reads the whole file. Any open or read failure, including invalid
    /// UTF-8, is reported as `FileNotFound` for that path.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ShaderError> {
        let path = path.into();
        match fs::read_to_string(&path) {
            Ok(text) => Ok(ShaderSource { path, text }),
            Err(source) => Err(ShaderError::FileNotFound { path, source }),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn kind(&self) -> Result<StageKind, ShaderError> {
        StageKind::from_path(&self.path)
    }
}

#[cfg(test)]
pub(crate) fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("prism-{}-{}", name, std::process::id()));
    fs::create_dir_all(dir.join("shaders")).unwrap();
    dir
}

#[test]
fn test_load_missing_file() {
    let path = scratch_dir("missing").join("shaders/nope.vert");
    match ShaderSource::load(&path) {
        Err(ShaderError::FileNotFound { path: reported, .. }) => assert_eq!(reported, path),
        other => panic!("expected FileNotFound, got {other:?}"),
    }
}

#[test]
fn test_load_is_repeatable() {
    let path = scratch_dir("repeat").join("shaders/pass.frag");
    fs::write(&path, "#version 330 core\nout vec4 color;\nvoid main() { color = vec4(1.0); }\n")
        .unwrap();

    let first = ShaderSource::load(&path).unwrap();
    let second = ShaderSource::load(&path).unwrap();
    assert_eq!(first, second);
    assert!(first.text().ends_with("}\n"));
    assert_eq!(first.kind().unwrap(), StageKind::Fragment);
}
