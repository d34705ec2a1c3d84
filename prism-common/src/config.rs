use std::path::{Path, PathBuf};

/// Settings for a demo run. The resource root is passed around explicitly
/// rather than read from a global.
#[derive(Debug, Clone, PartialEq)]
pub struct DemoConfig {
    /// Base directory holding `shaders/`.
    pub resource_root: PathBuf,
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub clear_color: [f32; 3],
    pub vsync: bool,
    /// Wait for ENTER after printing a fatal error, so the log stays visible
    /// when the demo was started outside a terminal.
    pub pause_on_error: bool,
}

impl Default for DemoConfig {
    fn default() -> Self {
        DemoConfig {
            resource_root: PathBuf::from("res"),
            title: "Triangle".to_owned(),
            width: 800,
            height: 600,
            clear_color: [0.8, 1.0, 0.9],
            vsync: true,
            pause_on_error: false,
        }
    }
}

impl DemoConfig {
    pub fn with_resource_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.resource_root = root.into();
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_clear_color(mut self, clear_color: [f32; 3]) -> Self {
        self.clear_color = clear_color;
        self
    }

    pub fn with_vsync(mut self, vsync: bool) -> Self {
        self.vsync = vsync;
        self
    }

    pub fn with_pause_on_error(mut self, pause_on_error: bool) -> Self {
        self.pause_on_error = pause_on_error;
        self
    }

    pub fn shader_dir(&self) -> PathBuf {
        self.resource_root.join("shaders")
    }

    pub fn resource_root(&self) -> &Path {
        &self.resource_root
    }
}

#[test]
fn test_config_setters() {
    let config = DemoConfig::default()
        .with_resource_root("/opt/demo")
        .with_title("Texture demo")
        .with_size(1024, 768)
        .with_pause_on_error(true);

    assert_eq!(config.shader_dir(), Path::new("/opt/demo/shaders"));
    assert_eq!(config.title, "Texture demo");
    assert_eq!((config.width, config.height), (1024, 768));
    assert!(config.pause_on_error);
    assert!(config.vsync);
}
