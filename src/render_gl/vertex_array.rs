use gl;
use std;

pub struct VertexArray {
    gl: gl::Gl,
    vao: gl::types::GLuint,
}

impl VertexArray {
    pub fn new(gl: &gl::Gl) -> VertexArray {
        let mut vao: gl::types::GLuint = 0;
        unsafe {
            gl.GenVertexArrays(1, &mut vao);
        }

        VertexArray {
            gl: gl.clone(),
            vao,
        }
    }

    pub fn bind(&self) {
        unsafe {
            self.gl.BindVertexArray(self.vao);
        }
    }

    pub fn unbind(&self) {
        unsafe {
            self.gl.BindVertexArray(0);
        }
    }

    /// Describes a float attribute of the currently bound `ARRAY_BUFFER`.
    /// `stride` and `offset` are counted in floats.
    pub fn attrib_pointer_f32(&self, location: gl::types::GLuint, components: usize, stride: usize, offset: usize) {
        let float_size = std::mem::size_of::<f32>();
        unsafe {
            self.gl.EnableVertexAttribArray(location);
            self.gl.VertexAttribPointer(
                location,
                components as gl::types::GLint,
                gl::FLOAT,
                gl::FALSE,
                (stride * float_size) as gl::types::GLint,
                (offset * float_size) as *const gl::types::GLvoid,
            );
        }
    }
}

impl Drop for VertexArray {
    fn drop(&mut self) {
        unsafe {
            self.gl.DeleteVertexArrays(1, &self.vao);
        }
    }
}
