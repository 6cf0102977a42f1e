use gl;
use std;

/// Static `ELEMENT_ARRAY_BUFFER` of `u32` indices.
///
/// The binding is recorded in the currently bound vertex array, so bind the
/// vertex array first and keep this buffer bound while it is.
pub struct ElementBuffer {
    gl: gl::Gl,
    glid: gl::types::GLuint,
    count: usize,
}

impl ElementBuffer {
    pub fn new_element_buffer(gl: &gl::Gl, indices: &[u32]) -> ElementBuffer {
        let mut ebo = ElementBuffer {
            gl: gl.clone(),
            glid: 0,
            count: indices.len(),
        };

        unsafe {
            gl.GenBuffers(1, &mut ebo.glid);
            gl.BindBuffer(gl::ELEMENT_ARRAY_BUFFER, ebo.glid);
            gl.BufferData(
                gl::ELEMENT_ARRAY_BUFFER,
                (indices.len() * std::mem::size_of::<u32>()) as gl::types::GLsizeiptr,
                indices.as_ptr() as *const gl::types::GLvoid,
                gl::STATIC_DRAW,
            );
        }

        ebo
    }

    pub fn count(&self) -> usize {
        self.count
    }
}

impl Drop for ElementBuffer {
    fn drop(&mut self) {
        unsafe {
            self.gl.DeleteBuffers(1, &self.glid);
        }
    }
}
