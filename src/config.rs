/// Window and context parameters handed to `context::GlWindow::new`.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// Requested core profile version, major and minor.
    pub gl_version: (u8, u8),
    pub clear_color: (f32, f32, f32, f32),
}

impl Default for WindowConfig {
    fn default() -> Self {
        WindowConfig {
            title: "LearnOpenGL".into(),
            width: 800,
            height: 600,
            gl_version: (3, 3),
            clear_color: (0.2, 0.3, 0.3, 1.0),
        }
    }
}

impl WindowConfig {
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_title<S: Into<String>>(mut self, title: S) -> Self {
        self.title = title.into();
        self
    }
}
