use itertools::Itertools;
use log::{debug, warn};
use std::{
    mem,
    path::{Path, PathBuf},
};

use crate::{
    DemoConfig, DiagnosticLog, GraphicsContext, Result, ShaderError, ShaderSource, ShaderStage,
    StageKind,
};

/// A linked program. Its stages have already been detached and deleted.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ShaderProgram<P> {
    handle: P,
}

impl<P: Copy> ShaderProgram<P> {
    pub fn handle(&self) -> P {
        self.handle
    }

    pub fn delete<C: GraphicsContext<Program = P>>(self, ctx: &C) {
        ctx.delete_program(self.handle);
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BuildState {
    Unlinked,
    Linking,
    Linked,
    Failed,
}

/// One attempt at linking a program. `Linked` and `Failed` are final; a new
/// build has to be started to try again.
///
/// Stages that were added but never linked are deleted on drop.
pub struct ProgramBuild<'a, C: GraphicsContext> {
    ctx: &'a C,
    stages: Vec<ShaderStage<C::Shader>>,
    state: BuildState,
}

impl<'a, C: GraphicsContext> ProgramBuild<'a, C> {
    pub fn new(ctx: &'a C) -> Self {
        ProgramBuild {
            ctx,
            stages: Vec::new(),
            state: BuildState::Unlinked,
        }
    }

    pub fn state(&self) -> BuildState {
        self.state
    }

    pub fn add_stage(&mut self, stage: ShaderStage<C::Shader>) -> Result<()> {
        if self.state != BuildState::Unlinked {
            self.ctx.delete_shader(stage.handle);
            return Err(ShaderError::AlreadyLinked(self.state));
        }
        self.stages.push(stage);
        Ok(())
    }

    pub fn link(&mut self) -> Result<ShaderProgram<C::Program>> {
        if self.state != BuildState::Unlinked {
            return Err(ShaderError::AlreadyLinked(self.state));
        }

        self.state = BuildState::Linking;
        let stages = mem::take(&mut self.stages);
        let result = link_stages(self.ctx, &stages);
        self.state = match result {
            Ok(_) => BuildState::Linked,
            Err(_) => BuildState::Failed,
        };
        result
    }
}

impl<C: GraphicsContext> Drop for ProgramBuild<'_, C> {
    fn drop(&mut self) {
        for stage in self.stages.drain(..) {
            self.ctx.delete_shader(stage.handle);
        }
    }
}

fn link_stages<C: GraphicsContext>(
    ctx: &C,
    stages: &[ShaderStage<C::Shader>],
) -> Result<ShaderProgram<C::Program>> {
    let release = |program: Option<C::Program>| {
        for stage in stages {
            if let Some(program) = program {
                ctx.detach_shader(program, stage.handle);
            }
            ctx.delete_shader(stage.handle);
        }
    };

    if let Some(kind) = StageKind::ALL
        .into_iter()
        .find(|&kind| !stages.iter().any(|stage| stage.kind == kind))
    {
        release(None);
        return Err(ShaderError::MissingStage(kind));
    }

    let program = match ctx.create_program() {
        Ok(program) => program,
        Err(err) => {
            release(None);
            return Err(ShaderError::Context(err));
        }
    };

    for stage in stages {
        ctx.attach_shader(program, stage.handle);
    }
    ctx.link_program(program);

    let linked = ctx.program_link_status(program);
    let log = DiagnosticLog::for_program(ctx, program);
    release(Some(program));

    let names = stages.iter().map(|stage| stage.path.display()).join(", ");
    if !linked {
        ctx.delete_program(program);
        return Err(ShaderError::Link {
            log: log.into_text(),
        });
    }

    if !log.is_empty() {
        warn!("program [{}] linked with messages:\n{}", names, log.text);
    }
    debug!("linked program {:?} from [{}]", program, names);
    Ok(ShaderProgram { handle: program })
}

/// Loads, compiles and links shaders found under `<resource root>/shaders`.
pub struct ShaderProgramBuilder<'a, C: GraphicsContext> {
    ctx: &'a C,
    shader_dir: PathBuf,
}

impl<'a, C: GraphicsContext> ShaderProgramBuilder<'a, C> {
    pub fn new(ctx: &'a C, config: &DemoConfig) -> Self {
        ShaderProgramBuilder {
            ctx,
            shader_dir: config.shader_dir(),
        }
    }

    pub fn shader_dir(&self) -> &Path {
        &self.shader_dir
    }

    /// Relative paths are resolved against the shader directory.
    pub fn load_source(&self, path: impl AsRef<Path>) -> Result<ShaderSource> {
        ShaderSource::load(self.shader_dir.join(path))
    }

    /// Compiles `source` as a `kind` stage. A stage that fails to compile is
    /// deleted before its log is returned.
    pub fn compile(&self, source: &ShaderSource, kind: StageKind) -> Result<ShaderStage<C::Shader>> {
        let ctx = self.ctx;
        let shader = ctx.create_shader(kind).map_err(ShaderError::Context)?;
        ctx.shader_source(shader, source.text());
        ctx.compile_shader(shader);

        let compiled = ctx.shader_compile_status(shader);
        let log = DiagnosticLog::for_shader(ctx, shader);
        if !compiled {
            ctx.delete_shader(shader);
            return Err(ShaderError::Compile {
                path: source.path().to_owned(),
                kind,
                log: log.into_text(),
            });
        }

        if !log.is_empty() {
            warn!(
                "{} shader {} compiled with messages:\n{}",
                kind,
                source.path().display(),
                log.text
            );
        }
        debug!("compiled {} shader {}", kind, source.path().display());

        Ok(ShaderStage {
            handle: shader,
            kind,
            path: source.path().to_owned(),
        })
    }

    pub fn compile_source(&self, source: &ShaderSource) -> Result<ShaderStage<C::Shader>> {
        self.compile(source, source.kind()?)
    }

    pub fn begin(&self) -> ProgramBuild<'a, C> {
        ProgramBuild::new(self.ctx)
    }

    pub fn link(
        &self,
        stages: impl IntoIterator<Item = ShaderStage<C::Shader>>,
    ) -> Result<ShaderProgram<C::Program>> {
        let mut build = self.begin();
        for stage in stages {
            build.add_stage(stage)?;
        }
        build.link()
    }

    /// Builds a program from shader files, inferring each stage from its
    /// extension. Stages compiled before a failure are released.
    pub fn build<P: AsRef<Path>>(&self, paths: &[P]) -> Result<ShaderProgram<C::Program>> {
        let mut build = self.begin();
        for path in paths {
            let kind = StageKind::from_path(path.as_ref())?;
            let source = self.load_source(path)?;
            build.add_stage(self.compile(&source, kind)?)?;
        }
        build.link()
    }
}

#[cfg(test)]
use crate::fake::{FakeContext, COMPILE_ERROR_TOKEN, LINK_ERROR_TOKEN};

#[cfg(test)]
const PASS_VERT: &str = "#version 330 core
layout (location = 0) in vec3 position;
void main() { gl_Position = vec4(position, 1.0); }
";

#[cfg(test)]
const PASS_FRAG: &str = "#version 330 core
out vec4 color;
void main() { color = vec4(1.0); }
";

#[cfg(test)]
fn demo_config(name: &str, files: &[(&str, &str)]) -> DemoConfig {
    let root = crate::source::scratch_dir(name);
    for (file, text) in files {
        std::fs::write(root.join("shaders").join(file), text).unwrap();
    }
    DemoConfig::default().with_resource_root(root)
}

#[test]
fn test_build_valid_program() {
    let config = demo_config("valid", &[("pass.vert", PASS_VERT), ("pass.frag", PASS_FRAG)]);
    let ctx = FakeContext::new();
    let builder = ShaderProgramBuilder::new(&ctx, &config);

    let program = builder.build(&["pass.vert", "pass.frag"]).unwrap();
    assert_eq!(ctx.live_shaders(), 0);
    assert_eq!(ctx.live_programs(), 1);
    assert_eq!(ctx.attached_shaders(program.handle()), 0);
    assert_eq!(ctx.program_info_log_length(program.handle()), 0);

    pretty_assertions::assert_eq!(
        ctx.calls(),
        [
            "create_shader 1 vertex",
            "shader_source 1",
            "compile_shader 1",
            "shader_info_log_length 1",
            "create_shader 2 fragment",
            "shader_source 2",
            "compile_shader 2",
            "shader_info_log_length 2",
            "create_program 3",
            "attach_shader 3 1",
            "attach_shader 3 2",
            "link_program 3",
            "program_info_log_length 3",
            "detach_shader 3 1",
            "delete_shader 1",
            "detach_shader 3 2",
            "delete_shader 2",
            "program_info_log_length 3",
        ]
    );

    program.delete(&ctx);
    assert_eq!(ctx.live_programs(), 0);
}

#[test]
fn test_link_failure_reports_log() {
    let broken = format!("#version 330 core\nin vec3 {LINK_ERROR_TOKEN};\nout vec4 color;\nvoid main() {{ color = vec4({LINK_ERROR_TOKEN}, 1.0); }}\n");
    let config = demo_config("link", &[("pass.vert", PASS_VERT), ("broken.frag", broken.as_str())]);
    let ctx = FakeContext::new();
    let builder = ShaderProgramBuilder::new(&ctx, &config);

    let log = match builder.build(&["pass.vert", "broken.frag"]) {
        Err(ShaderError::Link { log }) => log,
        other => panic!("expected a link error, got {other:?}"),
    };
    assert!(log.contains(LINK_ERROR_TOKEN), "{log}");

    // The fetch was sized from the length query, terminator included.
    let calls = ctx.calls();
    let length_query = calls
        .iter()
        .position(|call| call.starts_with("program_info_log_length"))
        .unwrap();
    assert_eq!(
        calls[length_query + 1],
        format!("program_info_log 3 {}", log.len() + 1)
    );

    assert_eq!(ctx.live_shaders(), 0);
    assert_eq!(ctx.live_programs(), 0);
}

#[test]
fn test_compile_failure_releases_stages() {
    let broken = format!("#version 330 core\n{COMPILE_ERROR_TOKEN} missing semicolon\nvoid main() {{}}\n");
    let config = demo_config("compile", &[("pass.frag", PASS_FRAG), ("broken.vert", broken.as_str())]);
    let ctx = FakeContext::new();
    let builder = ShaderProgramBuilder::new(&ctx, &config);

    match builder.build(&["pass.frag", "broken.vert"]) {
        Err(ShaderError::Compile { path, kind, log }) => {
            assert_eq!(path, config.shader_dir().join("broken.vert"));
            assert_eq!(kind, StageKind::Vertex);
            assert_eq!(log, "0:2(1): error: #error missing semicolon");
        }
        other => panic!("expected a compile error, got {other:?}"),
    }
    assert_eq!(ctx.live_shaders(), 0);
    assert_eq!(ctx.live_programs(), 0);
}

#[test]
fn test_missing_stage() {
    let config = demo_config("missing-stage", &[("pass.vert", PASS_VERT)]);
    let ctx = FakeContext::new();
    let builder = ShaderProgramBuilder::new(&ctx, &config);

    match builder.build(&["pass.vert"]) {
        Err(ShaderError::MissingStage(kind)) => assert_eq!(kind, StageKind::Fragment),
        other => panic!("expected MissingStage, got {other:?}"),
    }
    assert_eq!(ctx.live_shaders(), 0);
    assert_eq!(ctx.live_programs(), 0);
}

#[test]
fn test_missing_file_and_bad_extension() {
    let config = demo_config("missing-file", &[("pass.vert", PASS_VERT), ("pass.glsl", PASS_FRAG)]);
    let ctx = FakeContext::new();
    let builder = ShaderProgramBuilder::new(&ctx, &config);

    match builder.build(&["pass.vert", "absent.frag"]) {
        Err(ShaderError::FileNotFound { path, .. }) => {
            assert_eq!(path, config.shader_dir().join("absent.frag"))
        }
        other => panic!("expected FileNotFound, got {other:?}"),
    }

    match builder.build(&["pass.vert", "pass.glsl"]) {
        Err(ShaderError::UnsupportedStageKind(ext)) => assert_eq!(ext, "glsl"),
        other => panic!("expected UnsupportedStageKind, got {other:?}"),
    }
    assert_eq!(ctx.live_shaders(), 0);
}

#[test]
fn test_no_relink() {
    let ctx = FakeContext::new();
    let builder = ShaderProgramBuilder::new(&ctx, &DemoConfig::default());
    let vert = ShaderSource::new("pass.vert", PASS_VERT);
    let frag = ShaderSource::new("pass.frag", PASS_FRAG);

    let mut build = builder.begin();
    assert_eq!(build.state(), BuildState::Unlinked);
    build.add_stage(builder.compile_source(&vert).unwrap()).unwrap();
    build.add_stage(builder.compile_source(&frag).unwrap()).unwrap();
    build.link().unwrap();
    assert_eq!(build.state(), BuildState::Linked);
    assert!(matches!(
        build.link(),
        Err(ShaderError::AlreadyLinked(BuildState::Linked))
    ));
    assert!(matches!(
        build.add_stage(builder.compile_source(&frag).unwrap()),
        Err(ShaderError::AlreadyLinked(BuildState::Linked))
    ));

    let mut failed = builder.begin();
    failed.add_stage(builder.compile_source(&vert).unwrap()).unwrap();
    assert!(failed.link().is_err());
    assert_eq!(failed.state(), BuildState::Failed);
    assert!(matches!(
        failed.link(),
        Err(ShaderError::AlreadyLinked(BuildState::Failed))
    ));

    assert_eq!(ctx.live_shaders(), 0);
}

#[test]
fn test_abandoned_build_releases_stages() {
    let ctx = FakeContext::new();
    let builder = ShaderProgramBuilder::new(&ctx, &DemoConfig::default());

    let mut build = builder.begin();
    build
        .add_stage(builder.compile_source(&ShaderSource::new("a.vert", PASS_VERT)).unwrap())
        .unwrap();
    assert_eq!(ctx.live_shaders(), 1);
    drop(build);
    assert_eq!(ctx.live_shaders(), 0);
}

#[test]
fn test_context_creation_failure() {
    let ctx = FakeContext::new();
    let builder = ShaderProgramBuilder::new(&ctx, &DemoConfig::default());
    let stage = builder
        .compile_source(&ShaderSource::new("a.vert", PASS_VERT))
        .unwrap();

    ctx.fail_creation();
    assert!(matches!(
        builder.compile_source(&ShaderSource::new("a.frag", PASS_FRAG)),
        Err(ShaderError::Context(_))
    ));
    assert!(matches!(builder.link([stage]), Err(ShaderError::MissingStage(StageKind::Fragment))));
    assert_eq!(ctx.live_shaders(), 0);
}
