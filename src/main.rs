#[macro_use] extern crate failure;
#[macro_use] extern crate log;
extern crate env_logger;
extern crate gl;
extern crate sdl2;

pub mod render_gl;
pub mod resources;
mod config;
mod context;
mod debug;
mod demo;

use config::WindowConfig;
use context::GlWindow;
use resources::Resources;
use std::path::Path;

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        if let Some(stage) = debug::failing_stage(&e) {
            error!("shader program construction failed at {} stage", stage);
        }
        println!("{}", debug::failure_to_string(e));
        std::process::exit(1);
    }
}

fn run() -> Result<(), failure::Error> {
    let demo = demo::Demo::from_args(std::env::args().skip(1))?;

    let res = locate_assets()?;
    let config = WindowConfig::default().with_title(format!("LearnOpenGL - {}", demo));
    let window = GlWindow::new(&config)?;

    demo::run(&window, &config, &demo, &res)?;

    Ok(())
}

// build.rs copies assets next to the executable; fall back to the source tree
// when the target dir could not be located at build time.
fn locate_assets() -> Result<Resources, resources::Error> {
    let res = Resources::from_relative_exe_path(Path::new("assets"))?;
    if res.exists() {
        return Ok(res);
    }

    let fallback = Resources::from_path(Path::new(env!("CARGO_MANIFEST_DIR")).join("assets"));
    warn!(
        "{} does not exist, loading assets from {}",
        res.root_path().display(),
        fallback.root_path().display()
    );
    Ok(fallback)
}
