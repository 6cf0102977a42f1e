use config::WindowConfig;
use gl;
use sdl2;

#[derive(Debug, Fail)]
pub enum Error {
    #[fail(display = "Failed to initialize SDL: {}", message)]
    Sdl { message: String },
    #[fail(display = "Failed to create window: {}", message)]
    WindowBuild { message: String },
    #[fail(display = "Failed to create GL context: {}", message)]
    GlContext { message: String },
}

/// An SDL window with a current core-profile GL context.
///
/// Field order matters: the GL context must go before the window and the
/// window before the SDL handles.
pub struct GlWindow {
    gl: gl::Gl,
    _gl_context: sdl2::video::GLContext,
    window: sdl2::video::Window,
    _video: sdl2::VideoSubsystem,
    sdl: sdl2::Sdl,
}

impl GlWindow {
    pub fn new(config: &WindowConfig) -> Result<GlWindow, Error> {
        GlWindow::create(config, false)
    }

    /// Same as `new`, but the window is never shown.
    #[cfg(test)]
    pub fn hidden(config: &WindowConfig) -> Result<GlWindow, Error> {
        GlWindow::create(config, true)
    }

    fn create(config: &WindowConfig, hidden: bool) -> Result<GlWindow, Error> {
        let sdl = sdl2::init().map_err(|message| Error::Sdl { message })?;
        let video = sdl.video().map_err(|message| Error::Sdl { message })?;

        {
            let gl_attr = video.gl_attr();
            gl_attr.set_context_profile(sdl2::video::GLProfile::Core);
            gl_attr.set_context_version(config.gl_version.0, config.gl_version.1);
        }

        let mut builder = video.window(&config.title, config.width, config.height);
        builder.opengl().resizable();
        if hidden {
            builder.hidden();
        }
        let window = builder.build().map_err(|e| Error::WindowBuild {
            message: e.to_string(),
        })?;

        let gl_context = window
            .gl_create_context()
            .map_err(|message| Error::GlContext { message })?;
        let gl = gl::Gl::load_with(|s| {
            video.gl_get_proc_address(s) as *const ::std::os::raw::c_void
        });

        info!(
            "created {}x{} window \"{}\" with GL {}.{} core context",
            config.width, config.height, config.title, config.gl_version.0, config.gl_version.1
        );

        Ok(GlWindow {
            gl,
            _gl_context: gl_context,
            window,
            _video: video,
            sdl,
        })
    }

    pub fn gl(&self) -> &gl::Gl {
        &self.gl
    }

    pub fn event_pump(&self) -> Result<sdl2::EventPump, Error> {
        self.sdl
            .event_pump()
            .map_err(|message| Error::Sdl { message })
    }

    pub fn drawable_size(&self) -> (u32, u32) {
        self.window.drawable_size()
    }

    pub fn swap(&self) {
        self.window.gl_swap_window();
    }
}
