//! In-memory `GraphicsContext` that records every object it hands out, so
//! builder behaviour can be checked without a GPU.

use std::{cell::RefCell, collections::HashMap};

use crate::{GraphicsContext, StageKind};

/// Shader text containing this token fails to compile.
pub const COMPILE_ERROR_TOKEN: &str = "#error";
/// Shader text containing this token compiles but makes the link fail.
pub const LINK_ERROR_TOKEN: &str = "undeclared_varying";

#[derive(Debug, Default)]
struct FakeShader {
    kind: Option<StageKind>,
    source: String,
    compiled: bool,
    log: String,
}

#[derive(Debug, Default)]
struct FakeProgram {
    attached: Vec<u32>,
    linked: bool,
    log: String,
}

#[derive(Debug, Default)]
struct FakeState {
    next_id: u32,
    shaders: HashMap<u32, FakeShader>,
    programs: HashMap<u32, FakeProgram>,
    calls: Vec<String>,
    fail_create: bool,
}

#[derive(Debug, Default)]
pub struct FakeContext {
    state: RefCell<FakeState>,
}

fn with_terminator(log: &str) -> i32 {
    if log.is_empty() {
        0
    } else {
        log.len() as i32 + 1
    }
}

impl FakeContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent object creation fail.
    pub fn fail_creation(&self) {
        self.state.borrow_mut().fail_create = true;
    }

    pub fn live_shaders(&self) -> usize {
        self.state.borrow().shaders.len()
    }

    pub fn live_programs(&self) -> usize {
        self.state.borrow().programs.len()
    }

    pub fn attached_shaders(&self, program: u32) -> usize {
        self.state
            .borrow()
            .programs
            .get(&program)
            .map_or(0, |program| program.attached.len())
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.borrow().calls.clone()
    }

    fn record(&self, call: String) {
        self.state.borrow_mut().calls.push(call);
    }

    fn next_id(&self) -> Result<u32, String> {
        let mut state = self.state.borrow_mut();
        if state.fail_create {
            return Err("out of memory".to_owned());
        }
        state.next_id += 1;
        Ok(state.next_id)
    }
}

impl GraphicsContext for FakeContext {
    type Shader = u32;
    type Program = u32;

    fn create_shader(&self, kind: StageKind) -> Result<u32, String> {
        let id = self.next_id()?;
        self.record(format!("create_shader {id} {kind}"));
        self.state.borrow_mut().shaders.insert(
            id,
            FakeShader {
                kind: Some(kind),
                ..Default::default()
            },
        );
        Ok(id)
    }

    fn shader_source(&self, shader: u32, source: &str) {
        self.record(format!("shader_source {shader}"));
        if let Some(shader) = self.state.borrow_mut().shaders.get_mut(&shader) {
            shader.source = source.to_owned();
        }
    }

    fn compile_shader(&self, shader: u32) {
        self.record(format!("compile_shader {shader}"));
        let mut state = self.state.borrow_mut();
        let Some(shader) = state.shaders.get_mut(&shader) else {
            return;
        };
        match shader
            .source
            .lines()
            .enumerate()
            .find(|(_, line)| line.contains(COMPILE_ERROR_TOKEN))
        {
            Some((line, text)) => {
                shader.compiled = false;
                shader.log = format!("0:{}(1): error: {}", line + 1, text.trim());
            }
            None => {
                shader.compiled = true;
                shader.log.clear();
            }
        }
    }

    fn shader_compile_status(&self, shader: u32) -> bool {
        self.state
            .borrow()
            .shaders
            .get(&shader)
            .is_some_and(|shader| shader.compiled)
    }

    fn shader_info_log_length(&self, shader: u32) -> i32 {
        self.record(format!("shader_info_log_length {shader}"));
        self.state
            .borrow()
            .shaders
            .get(&shader)
            .map_or(0, |shader| with_terminator(&shader.log))
    }

    fn shader_info_log(&self, shader: u32, length: i32) -> String {
        self.record(format!("shader_info_log {shader} {length}"));
        let state = self.state.borrow();
        let log = state.shaders.get(&shader).map_or("", |shader| shader.log.as_str());
        log.chars().take((length.max(1) - 1) as usize).collect()
    }

    fn delete_shader(&self, shader: u32) {
        self.record(format!("delete_shader {shader}"));
        let mut state = self.state.borrow_mut();
        let attached = state
            .programs
            .values()
            .any(|program| program.attached.contains(&shader));
        // GL defers deletion of attached shaders; count them as still live.
        if !attached {
            state.shaders.remove(&shader);
        }
    }

    fn create_program(&self) -> Result<u32, String> {
        let id = self.next_id()?;
        self.record(format!("create_program {id}"));
        self.state
            .borrow_mut()
            .programs
            .insert(id, FakeProgram::default());
        Ok(id)
    }

    fn attach_shader(&self, program: u32, shader: u32) {
        self.record(format!("attach_shader {program} {shader}"));
        if let Some(program) = self.state.borrow_mut().programs.get_mut(&program) {
            program.attached.push(shader);
        }
    }

    fn detach_shader(&self, program: u32, shader: u32) {
        self.record(format!("detach_shader {program} {shader}"));
        if let Some(program) = self.state.borrow_mut().programs.get_mut(&program) {
            program.attached.retain(|&attached| attached != shader);
        }
    }

    fn link_program(&self, program: u32) {
        self.record(format!("link_program {program}"));
        let mut state = self.state.borrow_mut();
        let FakeState {
            shaders, programs, ..
        } = &mut *state;
        let Some(program) = programs.get_mut(&program) else {
            return;
        };

        let stages = program
            .attached
            .iter()
            .filter_map(|id| shaders.get(id))
            .collect::<Vec<_>>();
        let has = |kind: StageKind| stages.iter().any(|shader| shader.kind == Some(kind));

        program.log = if stages.iter().any(|shader| !shader.compiled) {
            "error: linking with uncompiled shader".to_owned()
        } else if !has(StageKind::Vertex) || !has(StageKind::Fragment) {
            "error: program lacks a vertex or fragment stage".to_owned()
        } else if stages
            .iter()
            .any(|shader| shader.source.contains(LINK_ERROR_TOKEN))
        {
            format!(
                "error: fragment shader input `{LINK_ERROR_TOKEN}` has no matching vertex shader output"
            )
        } else {
            String::new()
        };
        program.linked = program.log.is_empty();
    }

    fn program_link_status(&self, program: u32) -> bool {
        self.state
            .borrow()
            .programs
            .get(&program)
            .is_some_and(|program| program.linked)
    }

    fn program_info_log_length(&self, program: u32) -> i32 {
        self.record(format!("program_info_log_length {program}"));
        self.state
            .borrow()
            .programs
            .get(&program)
            .map_or(0, |program| with_terminator(&program.log))
    }

    fn program_info_log(&self, program: u32, length: i32) -> String {
        self.record(format!("program_info_log {program} {length}"));
        let state = self.state.borrow();
        let log = state.programs.get(&program).map_or("", |program| program.log.as_str());
        log.chars().take((length.max(1) - 1) as usize).collect()
    }

    fn delete_program(&self, program: u32) {
        self.record(format!("delete_program {program}"));
        self.state.borrow_mut().programs.remove(&program);
    }
}
