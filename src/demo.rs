use config::WindowConfig;
use context::{self, GlWindow};
use gl;
use render_gl::{self, ColorBuffer, ElementBuffer, Program, Shader, Stage, VertexArray, VertexBuffer, Viewport};
use resources::Resources;
use sdl2::event::{Event, WindowEvent};
use sdl2::keyboard::Keycode;
use std;
use std::fmt;
use std::str::FromStr;
use std::time::Instant;

const VERTEX_SOURCE: &str = "#version 330 core
layout (location = 0) in vec3 aPos;
void main()
{
    gl_Position = vec4(aPos.x, aPos.y, aPos.z, 1.0);
}
";

const ORANGE_SOURCE: &str = "#version 330 core
out vec4 FragColor;
void main()
{
    FragColor = vec4(1.0f, 0.5f, 0.2f, 1.0f);
}
";

const YELLOW_SOURCE: &str = "#version 330 core
out vec4 FragColor;
void main()
{
    FragColor = vec4(1.0f, 1.0f, 0.0f, 1.0f);
}
";

#[derive(Debug, Fail)]
pub enum Error {
    #[fail(display = "Unknown demo {}, expected one of: quad, two-shaders, shader-files", name)]
    UnknownDemo { name: String },
    #[fail(display = "Demo {} does not take argument {}", demo, arg)]
    UnexpectedArgument { demo: String, arg: String },
    #[fail(display = "Failed to build shader program")]
    Shader(#[cause] render_gl::Error),
    #[fail(display = "Failed to set up window")]
    Context(#[cause] context::Error),
}

impl From<render_gl::Error> for Error {
    fn from(other: render_gl::Error) -> Self {
        Error::Shader(other)
    }
}

impl From<context::Error> for Error {
    fn from(other: context::Error) -> Self {
        Error::Context(other)
    }
}

/// Where the `shader-files` demo reads its two stages from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageFiles {
    /// `<name>.vert` and `<name>.frag`.
    Base(String),
    /// Explicit vertex and fragment resource names.
    Pair(String, String),
}

impl Default for StageFiles {
    fn default() -> StageFiles {
        StageFiles::Base("shaders/colored".into())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Demo {
    /// Indexed quad, one program from inline sources.
    Quad,
    /// Two triangles, two programs sharing one vertex stage.
    TwoShaders,
    /// Per-vertex colors and uniforms, program loaded from asset files.
    ShaderFiles(StageFiles),
}

impl Default for Demo {
    fn default() -> Demo {
        Demo::Quad
    }
}

impl FromStr for Demo {
    type Err = Error;

    fn from_str(s: &str) -> Result<Demo, Error> {
        match s {
            "quad" => Ok(Demo::Quad),
            "two-shaders" => Ok(Demo::TwoShaders),
            "shader-files" => Ok(Demo::ShaderFiles(StageFiles::default())),
            _ => Err(Error::UnknownDemo { name: s.into() }),
        }
    }
}

impl fmt::Display for Demo {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match *self {
            Demo::Quad => "quad",
            Demo::TwoShaders => "two-shaders",
            Demo::ShaderFiles(_) => "shader-files",
        })
    }
}

impl Demo {
    /// Parses `<demo> [args...]`. Only `shader-files` takes arguments: either a
    /// resource base name or a vertex and a fragment resource name.
    pub fn from_args<I: IntoIterator<Item = String>>(args: I) -> Result<Demo, Error> {
        let mut args = args.into_iter();
        let demo = match args.next() {
            Some(name) => name.parse::<Demo>()?,
            None => return Ok(Demo::default()),
        };
        let rest = args.collect::<Vec<String>>();

        match (demo, rest.len()) {
            (demo, 0) => Ok(demo),
            (Demo::ShaderFiles(_), 1) => Ok(Demo::ShaderFiles(StageFiles::Base(rest[0].clone()))),
            (Demo::ShaderFiles(_), 2) => Ok(Demo::ShaderFiles(StageFiles::Pair(rest[0].clone(), rest[1].clone()))),
            (demo, _) => Err(Error::UnexpectedArgument {
                demo: demo.to_string(),
                arg: rest[rest.len() - 1].clone(),
            }),
        }
    }

    fn build(&self, gl: &gl::Gl, res: &Resources) -> Result<Box<dyn Scene>, Error> {
        Ok(match *self {
            Demo::Quad => Box::new(Quad::new(gl)?),
            Demo::TwoShaders => Box::new(TwoShaders::new(gl)?),
            Demo::ShaderFiles(ref files) => Box::new(ShaderFiles::new(gl, res, files)?),
        })
    }
}

trait Scene {
    fn render(&self, gl: &gl::Gl, seconds: f32);
}

struct Quad {
    program: Program,
    _vbo: VertexBuffer,
    ebo: ElementBuffer,
    vao: VertexArray,
}

impl Quad {
    fn new(gl: &gl::Gl) -> Result<Quad, render_gl::Error> {
        let program = Program::from_sources(gl, "quad", VERTEX_SOURCE, ORANGE_SOURCE)?;

        let vertices: Vec<f32> = vec![
            0.5, 0.5, 0.0,   // top right
            0.5, -0.5, 0.0,  // bottom right
            -0.5, -0.5, 0.0, // bottom left
            -0.5, 0.5, 0.0,  // top left
        ];
        let indices: Vec<u32> = vec![
            0, 1, 3,
            1, 2, 3,
        ];

        let vbo = VertexBuffer::new_vertex_buffer(gl, &vertices);
        let vao = VertexArray::new(gl);

        vao.bind();
        vbo.bind();
        let ebo = ElementBuffer::new_element_buffer(gl, &indices);
        vao.attrib_pointer_f32(0, 3, 3, 0);
        vao.unbind();
        vbo.unbind();

        Ok(Quad { program, _vbo: vbo, ebo, vao })
    }
}

impl Scene for Quad {
    fn render(&self, gl: &gl::Gl, _seconds: f32) {
        self.program.set_used();
        self.vao.bind();
        unsafe {
            gl.DrawElements(
                gl::TRIANGLES,
                self.ebo.count() as gl::types::GLsizei,
                gl::UNSIGNED_INT,
                std::ptr::null(),
            );
        }
        self.vao.unbind();
    }
}

struct Triangle {
    vbo: VertexBuffer,
    vao: VertexArray,
}

impl Triangle {
    fn new(gl: &gl::Gl, vertices: &[f32]) -> Triangle {
        let vbo = VertexBuffer::new_vertex_buffer(gl, vertices);
        let vao = VertexArray::new(gl);

        vao.bind();
        vbo.bind();
        vao.attrib_pointer_f32(0, 3, 3, 0);
        vbo.unbind();
        vao.unbind();

        Triangle { vbo, vao }
    }

    fn draw(&self, gl: &gl::Gl) {
        self.vao.bind();
        unsafe {
            gl.DrawArrays(gl::TRIANGLES, 0, (self.vbo.len() / 3) as gl::types::GLsizei);
        }
    }
}

struct TwoShaders {
    orange: Program,
    yellow: Program,
    left: Triangle,
    right: Triangle,
}

impl TwoShaders {
    fn new(gl: &gl::Gl) -> Result<TwoShaders, render_gl::Error> {
        let vertex = Shader::from_str_source(gl, "two-shaders", VERTEX_SOURCE, Stage::Vertex)?;
        let orange_fragment = Shader::from_str_source(gl, "orange", ORANGE_SOURCE, Stage::Fragment)?;
        let yellow_fragment = Shader::from_str_source(gl, "yellow", YELLOW_SOURCE, Stage::Fragment)?;

        let orange = Program::link(gl, "orange", &[&vertex, &orange_fragment])?;
        let yellow = Program::link(gl, "yellow", &[&vertex, &yellow_fragment])?;

        let left = Triangle::new(gl, &[
            -0.5, 0.5, 0.0,  // top
            0.0, -0.5, 0.0,  // bottom right
            -1.0, -0.5, 0.0, // bottom left
        ]);
        let right = Triangle::new(gl, &[
            0.5, 0.5, 0.0,  // top
            1.0, -0.5, 0.0, // bottom right
            0.0, -0.5, 0.0, // bottom left
        ]);

        Ok(TwoShaders { orange, yellow, left, right })
    }
}

impl Scene for TwoShaders {
    fn render(&self, gl: &gl::Gl, _seconds: f32) {
        self.orange.set_used();
        self.left.draw(gl);

        self.yellow.set_used();
        self.right.draw(gl);

        self.right.vao.unbind();
    }
}

struct ShaderFiles {
    program: Program,
    vbo: VertexBuffer,
    vao: VertexArray,
}

impl ShaderFiles {
    fn new(gl: &gl::Gl, res: &Resources, files: &StageFiles) -> Result<ShaderFiles, render_gl::Error> {
        let program = match *files {
            StageFiles::Base(ref name) => Program::from_res(gl, res, name)?,
            StageFiles::Pair(ref vert, ref frag) => Program::from_res_pair(gl, res, vert, frag)?,
        };
        debug!("{} is program {}", program.name(), program.id());
        for uniform in &["x_offset", "upside_down", "color_mode"] {
            if program.uniform_location(uniform).is_none() {
                warn!("{} does not use uniform {}", program.name(), uniform);
            }
        }

        let vertices: Vec<f32> = vec![
            // positions      // colors
            0.5, -0.5, 0.0,   1.0, 0.0, 0.0, // bottom right
            -0.5, -0.5, 0.0,  0.0, 1.0, 0.0, // bottom left
            0.0, 0.5, 0.0,    0.0, 0.0, 1.0, // top
        ];

        let vbo = VertexBuffer::new_vertex_buffer(gl, &vertices);
        let vao = VertexArray::new(gl);

        vao.bind();
        vbo.bind();
        vao.attrib_pointer_f32(0, 3, 6, 0);
        vao.attrib_pointer_f32(1, 3, 6, 3);
        vbo.unbind();
        vao.unbind();

        Ok(ShaderFiles { program, vbo, vao })
    }
}

impl Scene for ShaderFiles {
    fn render(&self, gl: &gl::Gl, seconds: f32) {
        self.program.set_used();
        self.program.set_float("x_offset", seconds.sin() * 0.5);
        self.program.set_bool("upside_down", (seconds as i32 / 4) % 2 == 1);
        self.program.set_int("color_mode", (seconds as i32 / 2) % 2);

        self.vao.bind();
        unsafe {
            gl.DrawArrays(gl::TRIANGLES, 0, (self.vbo.len() / 6) as gl::types::GLsizei);
        }
        self.vao.unbind();
    }
}

const DARK_BACKGROUND: (f32, f32, f32, f32) = (0.0, 0.0, 0.0, 1.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Control {
    Quit,
    /// The drawable size may have changed, query it again.
    RefreshViewport,
    ToggleBackground,
    Continue,
}

fn control_for(event: &Event) -> Control {
    match *event {
        Event::Quit { .. }
        | Event::KeyDown { keycode: Some(Keycode::Escape), .. } => Control::Quit,
        Event::KeyDown { keycode: Some(Keycode::B), repeat: false, .. } => Control::ToggleBackground,
        Event::Window { win_event: WindowEvent::SizeChanged(..), .. } => Control::RefreshViewport,
        _ => Control::Continue,
    }
}

/// Builds `demo` and renders it until the window is closed or Escape is pressed.
/// B switches between the configured and a black background.
pub fn run(window: &GlWindow, config: &WindowConfig, demo: &Demo, res: &Resources) -> Result<(), Error> {
    let gl = window.gl();
    let scene = demo.build(gl, res)?;
    info!("running demo {}", demo);

    let (w, h) = window.drawable_size();
    let mut viewport = Viewport::for_window(w as i32, h as i32);
    viewport.set_used(gl);

    let mut color_buffer = ColorBuffer::from_color(config.clear_color);
    color_buffer.set_used(gl);

    let mut event_pump = window.event_pump()?;
    let start = Instant::now();

    'main: loop {
        for event in event_pump.poll_iter() {
            match control_for(&event) {
                Control::Quit => break 'main,
                Control::RefreshViewport => {
                    let (w, h) = window.drawable_size();
                    viewport.update_size(w as i32, h as i32);
                    viewport.set_used(gl);
                }
                Control::ToggleBackground => {
                    let next = if color_buffer.color == config.clear_color {
                        DARK_BACKGROUND
                    } else {
                        config.clear_color
                    };
                    color_buffer.update_color(next);
                    color_buffer.set_used(gl);
                }
                Control::Continue => {}
            }
        }

        color_buffer.clear(gl);
        scene.render(gl, start.elapsed().as_secs_f32());

        window.swap();
    }

    Ok(())
}
