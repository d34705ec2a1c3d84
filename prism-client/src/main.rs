use anyhow::{anyhow, Context as _, Result};
use glow::HasContext;
use log::{error, info};
use prism_common::{
    logging::{init_logging, LoggingConfig},
    DemoConfig, ShaderProgramBuilder,
};
use renderers::TriangleRenderer;
use sdl2::{event::Event, keyboard::Keycode};
use shader::GlowContext;
use std::io::{self, BufRead};

pub mod renderers;
pub mod shader;

const RESOURCE_ROOT: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/res");

fn run(config: &DemoConfig) -> Result<()> {
    unsafe {
        let sdl = sdl2::init().map_err(|e| anyhow!(e)).context("initializing SDL")?;
        let video = sdl.video().map_err(|e| anyhow!(e))?;
        let gl_attr = video.gl_attr();
        gl_attr.set_context_profile(sdl2::video::GLProfile::Core);
        gl_attr.set_context_version(3, 3);
        let window = video
            .window(&config.title, config.width, config.height)
            .opengl()
            .build()
            .with_context(|| format!("creating window {:?}", config.title))?;
        let window_gl_context = window.gl_create_context().map_err(|e| anyhow!(e))?;
        window
            .gl_make_current(&window_gl_context)
            .map_err(|e| anyhow!(e))?;
        window
            .subsystem()
            .gl_set_swap_interval(config.vsync as i32)
            .map_err(|e| anyhow!(e))?;

        let gl = glow::Context::from_loader_function(|s| video.gl_get_proc_address(s) as *const _);
        let mut event_pump = sdl.event_pump().map_err(|e| anyhow!(e))?;

        gl.viewport(0, 0, config.width as _, config.height as _);
        let [r, g, b] = config.clear_color;
        gl.clear_color(r, g, b, 1.0);

        let ctx = GlowContext::new(&gl);
        let program = ShaderProgramBuilder::new(&ctx, config)
            .build(&["constant_gradient.vert", "constant_gradient.frag"])
            .context("building the constant gradient program")?;

        let render_triangle = match TriangleRenderer::new(&gl) {
            Ok(renderer) => renderer,
            Err(err) => {
                program.delete(&ctx);
                return Err(anyhow!(err).context("uploading triangle vertices"));
            }
        };

        info!("running {:?} ({}x{})", config.title, config.width, config.height);
        'running: loop {
            for event in event_pump.poll_iter() {
                match event {
                    Event::Quit { .. }
                    | Event::KeyDown {
                        keycode: Some(Keycode::Escape),
                        ..
                    } => break 'running,
                    _ => {}
                }
            }

            gl.clear(glow::COLOR_BUFFER_BIT);
            gl.use_program(Some(program.handle()));
            render_triangle.draw(&gl);

            window.gl_swap_window();
        }

        gl.use_program(None);
        program.delete(&ctx);
        render_triangle.delete(&gl);
        info!("shut down cleanly");
    }

    Ok(())
}

fn main() {
    init_logging(LoggingConfig::default());

    let config = DemoConfig::default()
        .with_resource_root(RESOURCE_ROOT)
        .with_pause_on_error(true);

    // The window and GL context are dropped inside `run` before this reports.
    if let Err(err) = run(&config) {
        if log::log_enabled!(log::Level::Error) {
            error!("{:#}", err);
        } else {
            eprintln!("[AppError] {:#}", err);
        }

        if config.pause_on_error {
            println!("Press ENTER to exit.");
            let _ = io::stdin().lock().read_line(&mut String::new());
        }
        std::process::exit(1);
    }
}
