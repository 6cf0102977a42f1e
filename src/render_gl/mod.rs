mod shader;
mod vertex_buffer;
mod element_buffer;
mod vertex_array;
mod viewport;
mod color_buffer;

pub use self::shader::{Error, Program, Shader, Stage};
pub use self::vertex_buffer::VertexBuffer;
pub use self::element_buffer::ElementBuffer;
pub use self::vertex_array::VertexArray;
pub use self::viewport::Viewport;
pub use self::color_buffer::ColorBuffer;
