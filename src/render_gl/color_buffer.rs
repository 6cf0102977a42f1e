use gl;

pub struct ColorBuffer {
    pub color: (f32, f32, f32, f32),
}

impl ColorBuffer {
    pub fn from_color(color: (f32, f32, f32, f32)) -> ColorBuffer {
        ColorBuffer { color }
    }

    /// Takes effect on the next `set_used`.
    pub fn update_color(&mut self, color: (f32, f32, f32, f32)) {
        self.color = color;
    }

    pub fn set_used(&self, gl: &gl::Gl) {
        let (r, g, b, a) = self.color;
        unsafe {
            gl.ClearColor(r, g, b, a);
        }
    }

    pub fn clear(&self, gl: &gl::Gl) {
        unsafe {
            gl.Clear(gl::COLOR_BUFFER_BIT);
        }
    }
}
