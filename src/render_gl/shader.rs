use gl;
use std;
use std::borrow::Borrow;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::ffi::{CStr, CString};
use std::fmt;
use resources::{self, Resources};

/// A compilation unit of a program, or the program itself when linking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Vertex,
    Fragment,
    Program,
}

impl Stage {
    pub fn gl_kind(&self) -> Option<gl::types::GLenum> {
        match *self {
            Stage::Vertex => Some(gl::VERTEX_SHADER),
            Stage::Fragment => Some(gl::FRAGMENT_SHADER),
            Stage::Program => None,
        }
    }

    pub fn from_resource_name(name: &str) -> Option<Stage> {
        const POSSIBLE_EXT: [(&str, Stage); 2] = [
            (".vert", Stage::Vertex),
            (".frag", Stage::Fragment),
        ];

        POSSIBLE_EXT.iter()
            .find(|&&(file_extension, _)| name.ends_with(file_extension))
            .map(|&(_, stage)| stage)
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match *self {
            Stage::Vertex => "VERTEX",
            Stage::Fragment => "FRAGMENT",
            Stage::Program => "PROGRAM",
        })
    }
}

#[derive(Debug, Fail)]
pub enum Error {
    #[fail(display = "Failed to load resource {}", name)]
    ResourceLoad { name: String, #[cause] inner: resources::Error },
    #[fail(display = "Can not determine shader type for resource {}", name)]
    CanNotDetermineShaderTypeForResource { name: String },
    #[fail(display = "{} is not a shader stage ({})", stage, name)]
    NotAShaderStage { name: String, stage: Stage },
    #[fail(display = "{} source of {} contains a nul byte", stage, name)]
    SourceContainsNil { name: String, stage: Stage },
    #[fail(display = "ERROR::SHADER_COMPILATION_ERROR of type: {} ({})\n{}", stage, name, message)]
    CompileError { name: String, stage: Stage, message: String },
    #[fail(display = "ERROR::PROGRAM_LINKING_ERROR of type: {} ({})\n{}", stage, name, message)]
    LinkError { name: String, stage: Stage, message: String },
}

impl Error {
    /// The stage a compile or link failure is attributed to.
    pub fn stage(&self) -> Option<Stage> {
        match *self {
            Error::SourceContainsNil { stage, .. }
            | Error::CompileError { stage, .. }
            | Error::LinkError { stage, .. } => Some(stage),
            _ => None,
        }
    }
}

/// A value that can be written to a scalar uniform.
pub trait UniformValue: Copy + fmt::Debug {
    /// Whether a uniform declared with GL type `typ` can take this value.
    fn accepts(typ: gl::types::GLenum) -> bool;

    unsafe fn write(self, gl: &gl::Gl, location: gl::types::GLint);
}

fn is_sampler(typ: gl::types::GLenum) -> bool {
    match typ {
        gl::SAMPLER_1D | gl::SAMPLER_2D | gl::SAMPLER_3D | gl::SAMPLER_CUBE
        | gl::SAMPLER_2D_ARRAY | gl::SAMPLER_2D_SHADOW | gl::SAMPLER_2D_RECT
        | gl::SAMPLER_BUFFER | gl::INT_SAMPLER_2D | gl::UNSIGNED_INT_SAMPLER_2D => true,
        _ => false,
    }
}

impl UniformValue for bool {
    fn accepts(typ: gl::types::GLenum) -> bool {
        typ == gl::BOOL || typ == gl::INT
    }

    unsafe fn write(self, gl: &gl::Gl, location: gl::types::GLint) {
        gl.Uniform1i(location, self as gl::types::GLint);
    }
}

impl UniformValue for i32 {
    fn accepts(typ: gl::types::GLenum) -> bool {
        typ == gl::INT || typ == gl::BOOL || is_sampler(typ)
    }

    unsafe fn write(self, gl: &gl::Gl, location: gl::types::GLint) {
        gl.Uniform1i(location, self);
    }
}

impl UniformValue for f32 {
    fn accepts(typ: gl::types::GLenum) -> bool {
        typ == gl::FLOAT || typ == gl::BOOL
    }

    unsafe fn write(self, gl: &gl::Gl, location: gl::types::GLint) {
        gl.Uniform1f(location, self);
    }
}

#[derive(Debug, Clone, Copy)]
struct Uniform {
    id: gl::types::GLint,
    typ: gl::types::GLenum,
}

/// A linked GL program. Owns the program object until `release` or drop.
pub struct Program {
    gl: gl::Gl,
    id: gl::types::GLuint,
    name: String,

    uniforms: HashMap<String, Uniform>,
    warned: RefCell<HashSet<String>>,
}

impl Program {
    /// Loads `<name>.vert` and `<name>.frag`.
    pub fn from_res(gl: &gl::Gl, res: &Resources, name: &str) -> Result<Program, Error> {
        const POSSIBLE_EXT: [&str; 2] = [
            ".vert",
            ".frag",
        ];

        let resource_names = POSSIBLE_EXT.iter()
            .map(|file_extension| format!("{}{}", name, file_extension))
            .collect::<Vec<String>>();

        let shaders = resource_names.iter()
            .map(|resource_name| {
                Shader::from_res(gl, res, resource_name)
            })
            .collect::<Result<Vec<Shader>, Error>>()?;

        Program::link(gl, name, &shaders[..])
    }

    /// Loads a vertex and a fragment stage from two separately named resources.
    pub fn from_res_pair(
        gl: &gl::Gl,
        res: &Resources,
        vert_name: &str,
        frag_name: &str,
    ) -> Result<Program, Error> {
        let vert = load_stage_source(res, vert_name)?;
        let frag = load_stage_source(res, frag_name)?;

        let shaders = [
            Shader::from_vert_source(gl, &vert)
                .map_err(|message| Error::CompileError { name: vert_name.into(), stage: Stage::Vertex, message })?,
            Shader::from_frag_source(gl, &frag)
                .map_err(|message| Error::CompileError { name: frag_name.into(), stage: Stage::Fragment, message })?,
        ];

        Program::link(gl, &format!("{}+{}", vert_name, frag_name), &shaders)
    }

    /// Compiles and links inline vertex and fragment sources. `name` only
    /// labels diagnostics and log lines.
    pub fn from_sources(
        gl: &gl::Gl,
        name: &str,
        vert_source: &str,
        frag_source: &str,
    ) -> Result<Program, Error> {
        let shaders = [
            Shader::from_str_source(gl, name, vert_source, Stage::Vertex)?,
            Shader::from_str_source(gl, name, frag_source, Stage::Fragment)?,
        ];

        Program::link(gl, name, &shaders)
    }

    /// Links already compiled stages, reporting failure as `Error::LinkError`.
    pub fn link<S: Borrow<Shader>>(gl: &gl::Gl, name: &str, shaders: &[S]) -> Result<Program, Error> {
        Program::from_shaders(gl, shaders)
            .map(|program| program.with_name(name))
            .map_err(|message| Error::LinkError { name: name.into(), stage: Stage::Program, message })
    }

    pub fn from_shaders<S: Borrow<Shader>>(gl: &gl::Gl, shaders: &[S]) -> Result<Program, String> {
        let program_id = unsafe { gl.CreateProgram() };

        for shader in shaders.iter().map(Borrow::<Shader>::borrow) {
            debug!("attaching {} shader {} to program {}", shader.stage(), shader.id(), program_id);
            unsafe { gl.AttachShader(program_id, shader.id()); }
        }

        unsafe { gl.LinkProgram(program_id); }

        let mut success: gl::types::GLint = 1;
        unsafe {
            gl.GetProgramiv(program_id, gl::LINK_STATUS, &mut success);
        }

        // stages stay owned by their `Shader`s, linked or not
        for shader in shaders.iter().map(Borrow::<Shader>::borrow) {
            unsafe { gl.DetachShader(program_id, shader.id()); }
        }

        if success == 0 {
            let mut len: gl::types::GLint = 0;
            unsafe {
                gl.GetProgramiv(program_id, gl::INFO_LOG_LENGTH, &mut len);
            }

            let error = create_whitespace_cstring_with_len(len as usize);

            unsafe {
                gl.GetProgramInfoLog(
                    program_id,
                    len,
                    std::ptr::null_mut(),
                    error.as_ptr() as *mut gl::types::GLchar
                );
                gl.DeleteProgram(program_id);
            }

            return Err(trim_log(error));
        }

        let uniforms = Program::get_uniforms(gl, program_id);
        debug!("linked program {} with {} active uniforms", program_id, uniforms.len());

        Ok(Program {
            gl: gl.clone(),
            id: program_id,
            name: format!("program {}", program_id),
            uniforms,
            warned: RefCell::new(HashSet::new()),
        })
    }

    fn with_name(mut self, name: &str) -> Program {
        info!("program {} is \"{}\"", self.id, name);
        self.name = name.into();
        self
    }

    pub fn id(&self) -> gl::types::GLuint {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_released(&self) -> bool {
        self.id == 0
    }

    pub fn set_used(&self) {
        debug_assert!(!self.is_released(), "{} used after release", self.name);
        unsafe {
            self.gl.UseProgram(self.id);
        }
    }

    fn get_uniforms(gl: &gl::Gl, id: gl::types::GLuint) -> HashMap<String, Uniform> {
        let mut uniforms = HashMap::new();

        let mut total: gl::types::GLint = 0;
        let mut max_name_len: gl::types::GLint = 0;
        unsafe {
            gl.GetProgramiv(id, gl::ACTIVE_UNIFORMS, &mut total);
            gl.GetProgramiv(id, gl::ACTIVE_UNIFORM_MAX_LENGTH, &mut max_name_len);
        }

        for u in 0..total {
            let mut name_len: gl::types::GLsizei = 0;
            let mut size: gl::types::GLint = 0;
            let mut typ: gl::types::GLenum = gl::ZERO;
            let mut buffer: Vec<u8> = vec![0; max_name_len.max(1) as usize];

            unsafe {
                gl.GetActiveUniform(
                    id,
                    u as gl::types::GLuint,
                    buffer.len() as gl::types::GLsizei,
                    &mut name_len,
                    &mut size,
                    &mut typ,
                    buffer.as_mut_ptr() as *mut gl::types::GLchar
                );
            }
            buffer.truncate(name_len.max(0) as usize);

            let name = match CString::new(buffer) {
                Ok(name) => name,
                Err(_) => continue,
            };
            let loc = unsafe { gl.GetUniformLocation(id, name.as_ptr()) };
            if loc < 0 {
                // uniform block members have no location
                continue;
            }

            let name = name.to_string_lossy().into_owned();
            let uniform = Uniform { id: loc, typ };
            debug!("program {} uniform {} at location {} (type 0x{:x})", id, name, loc, typ);

            if name.ends_with("[0]") {
                uniforms.insert(name[..name.len() - 3].to_owned(), uniform);
            }
            uniforms.insert(name, uniform);
        }
        uniforms
    }

    /// Location of an active uniform, `None` when the linked program has no such uniform.
    pub fn uniform_location(&self, name: &str) -> Option<gl::types::GLint> {
        self.uniforms.get(name).map(|uniform| uniform.id)
    }

    /// Writes `value` to the named uniform. Unknown names and values of the
    /// wrong type are ignored; each offending name is logged once.
    pub fn set_uniform<V: UniformValue>(&self, name: &str, value: V) {
        debug_assert!(!self.is_released(), "{} used after release", self.name);

        let uniform = match self.uniforms.get(name) {
            Some(uniform) => *uniform,
            None => {
                self.warn_once(name, || format!("{} has no active uniform {}", self.name, name));
                return;
            }
        };

        if !V::accepts(uniform.typ) {
            self.warn_once(name, || format!(
                "{}: uniform {} (type 0x{:x}) can not take {:?}",
                self.name, name, uniform.typ, value
            ));
            return;
        }

        unsafe {
            value.write(&self.gl, uniform.id);
        }
    }

    pub fn set_bool(&self, name: &str, value: bool) {
        self.set_uniform(name, value)
    }

    pub fn set_int(&self, name: &str, value: i32) {
        self.set_uniform(name, value)
    }

    pub fn set_float(&self, name: &str, value: f32) {
        self.set_uniform(name, value)
    }

    fn warn_once<F: FnOnce() -> String>(&self, name: &str, message: F) {
        if self.warned.borrow_mut().insert(name.to_owned()) {
            warn!("{}", message());
        }
    }

    /// Deletes the program object. Further calls do nothing.
    pub fn release(&mut self) {
        if self.is_released() {
            return;
        }

        unsafe {
            self.gl.DeleteProgram(self.id);
        }
        debug!("released {}", self.name);
        self.id = 0;
    }
}

impl Drop for Program {
    fn drop(&mut self) {
        self.release();
    }
}

fn load_stage_source(res: &Resources, name: &str) -> Result<CString, Error> {
    res.load_cstring(name)
        .map_err(|e| Error::ResourceLoad { name: name.into(), inner: e })
}

pub struct Shader {
    gl: gl::Gl,
    id: gl::types::GLuint,
    stage: Stage,
}

impl Shader {
    pub fn from_res(gl: &gl::Gl, res: &Resources, name: &str) -> Result<Shader, Error> {
        let stage = Stage::from_resource_name(name)
            .ok_or_else(|| Error::CanNotDetermineShaderTypeForResource { name: name.into() })?;

        let source = load_stage_source(res, name)?;

        Shader::from_source(gl, name, &source, stage)
    }

    /// Compiles `source` as `stage`. `Stage::Program` is rejected before any
    /// GL object is created.
    pub fn from_source(
        gl: &gl::Gl,
        name: &str,
        source: &CStr,
        stage: Stage
    ) -> Result<Shader, Error> {
        let kind = stage.gl_kind()
            .ok_or_else(|| Error::NotAShaderStage { name: name.into(), stage })?;

        Shader::compile(gl, source, kind, stage)
            .map_err(|message| Error::CompileError { name: name.into(), stage, message })
    }

    pub fn from_str_source(gl: &gl::Gl, name: &str, source: &str, stage: Stage) -> Result<Shader, Error> {
        let source = CString::new(source)
            .map_err(|_| Error::SourceContainsNil { name: name.into(), stage })?;

        Shader::from_source(gl, name, &source, stage)
    }

    pub fn from_vert_source(gl: &gl::Gl, source: &CStr) -> Result<Shader, String> {
        Shader::compile(gl, source, gl::VERTEX_SHADER, Stage::Vertex)
    }

    pub fn from_frag_source(gl: &gl::Gl, source: &CStr) -> Result<Shader, String> {
        Shader::compile(gl, source, gl::FRAGMENT_SHADER, Stage::Fragment)
    }

    fn compile(
        gl: &gl::Gl,
        source: &CStr,
        kind: gl::types::GLenum,
        stage: Stage
    ) -> Result<Shader, String> {
        let id = shader_from_source(gl, source, kind)?;
        debug!("compiled {} shader {}", stage, id);
        Ok(Shader { gl: gl.clone(), id, stage })
    }

    pub fn id(&self) -> gl::types::GLuint {
        self.id
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }
}

impl Drop for Shader {
    fn drop(&mut self) {
        unsafe {
            self.gl.DeleteShader(self.id);
        }
    }
}

fn shader_from_source(
    gl: &gl::Gl,
    source: &CStr,
    kind: gl::types::GLenum
) -> Result<gl::types::GLuint, String> {
    let id = unsafe { gl.CreateShader(kind) };
    unsafe {
        gl.ShaderSource(id, 1, &source.as_ptr(), std::ptr::null());
        gl.CompileShader(id);
    }

    let mut success: gl::types::GLint = 1;
    unsafe {
        gl.GetShaderiv(id, gl::COMPILE_STATUS, &mut success);
    }

    if success == 0 {
        let mut len: gl::types::GLint = 0;
        unsafe {
            gl.GetShaderiv(id, gl::INFO_LOG_LENGTH, &mut len);
        }

        let error = create_whitespace_cstring_with_len(len as usize);

        unsafe {
            gl.GetShaderInfoLog(
                id,
                len,
                std::ptr::null_mut(),
                error.as_ptr() as *mut gl::types::GLchar
            );
            gl.DeleteShader(id);
        }

        return Err(trim_log(error));
    }

    Ok(id)
}

fn create_whitespace_cstring_with_len(len: usize) -> CString {
    // allocate buffer of correct size
    let mut buffer: Vec<u8> = Vec::with_capacity(len + 1);
    // fill it with len spaces
    buffer.extend([b' '].iter().cycle().take(len));
    // convert buffer to CString
    unsafe { CString::from_vec_unchecked(buffer) }
}

// The driver writes a terminating nul into the buffer, cut the log there.
fn trim_log(log: CString) -> String {
    let bytes = log.into_bytes();
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    String::from_utf8_lossy(&bytes[..end]).trim_end().to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use context::headless::with_gl;
    use std::path::Path;

    const VERT: &str = "#version 330 core\nvoid main() { gl_Position = vec4(0, 0, 0, 1); }\n";
    const FRAG: &str = "#version 330 core\nout vec4 fragColor;\nvoid main() { fragColor = vec4(1, 0, 0, 1); }\n";

    const UNIFORM_FRAG: &str = "#version 330 core
out vec4 fragColor;
uniform float brightness;
uniform bool inverted;
uniform int mode;
void main() {
    float b = inverted ? 1.0 - brightness : brightness;
    fragColor = vec4(b, float(mode), 0, 1);
}
";

    fn assets() -> Resources {
        Resources::from_path(Path::new(env!("CARGO_MANIFEST_DIR")).join("assets"))
    }

    #[test]
    fn stage_names_match_diagnostics() {
        assert_eq!(Stage::Vertex.to_string(), "VERTEX");
        assert_eq!(Stage::Fragment.to_string(), "FRAGMENT");
        assert_eq!(Stage::Program.to_string(), "PROGRAM");
        assert_eq!(Stage::Vertex.gl_kind(), Some(gl::VERTEX_SHADER));
        assert_eq!(Stage::Program.gl_kind(), None);
    }

    #[test]
    fn stage_from_resource_extension() {
        assert_eq!(Stage::from_resource_name("shaders/a.vert"), Some(Stage::Vertex));
        assert_eq!(Stage::from_resource_name("shaders/a.frag"), Some(Stage::Fragment));
        assert_eq!(Stage::from_resource_name("shaders/a.glsl"), None);
    }

    #[test]
    fn compile_error_names_stage() {
        let e = Error::CompileError {
            name: "quad".into(),
            stage: Stage::Fragment,
            message: "0:3(1): error: syntax error".into(),
        };
        assert_eq!(e.stage(), Some(Stage::Fragment));
        assert_eq!(
            e.to_string(),
            "ERROR::SHADER_COMPILATION_ERROR of type: FRAGMENT (quad)\n0:3(1): error: syntax error"
        );
    }

    #[test]
    fn link_error_names_program() {
        let e = Error::LinkError {
            name: "quad".into(),
            stage: Stage::Program,
            message: "missing main".into(),
        };
        assert!(e.to_string().starts_with("ERROR::PROGRAM_LINKING_ERROR of type: PROGRAM"));
    }

    #[test]
    fn uniform_value_type_compatibility() {
        assert!(f32::accepts(gl::FLOAT));
        assert!(!f32::accepts(gl::INT));
        assert!(i32::accepts(gl::INT));
        assert!(i32::accepts(gl::SAMPLER_2D));
        assert!(!i32::accepts(gl::FLOAT_VEC3));
        assert!(bool::accepts(gl::BOOL));
        assert!(!bool::accepts(gl::FLOAT));
    }

    #[test]
    fn trim_log_stops_at_nul() {
        let raw = unsafe { CString::from_vec_unchecked(b"error: bad\n\0   ".to_vec()) };
        assert_eq!(trim_log(raw), "error: bad");
    }

    #[test]
    fn unknown_extension_is_rejected_before_loading() {
        with_gl(|gl| {
            match Shader::from_res(gl, &assets(), "shaders/colored.glsl") {
                Err(Error::CanNotDetermineShaderTypeForResource { .. }) => {}
                Err(e) => panic!("unexpected error {}", e),
                Ok(_) => panic!("expected an error"),
            }
        });
    }

    #[test]
    fn valid_sources_link_and_draw() {
        with_gl(|gl| {
            let program = Program::from_sources(gl, "red", VERT, FRAG).unwrap();
            assert!(!program.is_released());

            let mut vao: gl::types::GLuint = 0;
            unsafe {
                gl.GenVertexArrays(1, &mut vao);
                gl.BindVertexArray(vao);
            }
            program.set_used();
            unsafe {
                gl.DrawArrays(gl::POINTS, 0, 1);
                assert_eq!(gl.GetError(), gl::NO_ERROR);
                gl.BindVertexArray(0);
                gl.DeleteVertexArrays(1, &vao);
            }
        });
    }

    #[test]
    fn vertex_syntax_error_is_compile_error() {
        with_gl(|gl| {
            let broken = "#version 330 core\nvoid main() { gl_Position = vec4(0, 0, 0, 1) }\n";
            match Program::from_sources(gl, "broken", broken, FRAG) {
                Err(Error::CompileError { stage: Stage::Vertex, ref message, .. }) => {
                    assert!(!message.is_empty())
                }
                Err(e) => panic!("unexpected error {}", e),
                Ok(_) => panic!("expected a compile error"),
            }
        });
    }

    #[test]
    fn fragment_syntax_error_is_compile_error() {
        with_gl(|gl| {
            let broken = "#version 330 core\nout vec4 fragColor;\nvoid main() { fragColor = ; }\n";
            match Program::from_sources(gl, "broken", VERT, broken) {
                Err(Error::CompileError { stage: Stage::Fragment, .. }) => {}
                Err(e) => panic!("unexpected error {}", e),
                Ok(_) => panic!("expected a compile error"),
            }
        });
    }

    #[test]
    fn missing_entry_point_is_link_error() {
        with_gl(|gl| {
            let no_main = "#version 330 core\nout vec4 fragColor;\nvoid shade() { fragColor = vec4(1); }\n";
            match Program::from_sources(gl, "no-main", VERT, no_main) {
                Err(Error::LinkError { stage: Stage::Program, .. }) => {}
                Err(e) => panic!("unexpected error {}", e),
                Ok(_) => panic!("expected a link error"),
            }
        });
    }

    #[test]
    fn nul_in_inline_source_is_reported() {
        with_gl(|gl| {
            match Program::from_sources(gl, "nul", VERT, "void main() {\0}") {
                Err(e) => assert_eq!(e.stage(), Some(Stage::Fragment)),
                Ok(_) => panic!("expected an error"),
            }
        });
    }

    #[test]
    fn uniforms_are_cached_and_written() {
        with_gl(|gl| {
            let program = Program::from_sources(gl, "uniforms", VERT, UNIFORM_FRAG).unwrap();
            assert!(program.uniform_location("brightness").is_some());
            assert!(program.uniform_location("inverted").is_some());
            assert!(program.uniform_location("mode").is_some());

            program.set_used();
            program.set_float("brightness", 0.5);
            program.set_bool("inverted", true);
            program.set_int("mode", 2);

            let mut value: gl::types::GLfloat = 0.0;
            unsafe {
                gl.GetUniformfv(program.id(), program.uniform_location("brightness").unwrap(), &mut value);
                assert_eq!(gl.GetError(), gl::NO_ERROR);
            }
            assert_eq!(value, 0.5);
        });
    }

    #[test]
    fn absent_or_mistyped_uniform_is_a_no_op() {
        with_gl(|gl| {
            let program = Program::from_sources(gl, "uniforms", VERT, UNIFORM_FRAG).unwrap();
            program.set_used();

            assert_eq!(program.uniform_location("does_not_exist"), None);
            program.set_float("does_not_exist", 1.0);
            program.set_float("does_not_exist", 2.0);
            program.set_float("mode", 1.0);
            unsafe {
                assert_eq!(gl.GetError(), gl::NO_ERROR);
            }
        });
    }

    #[test]
    fn release_deletes_program_once() {
        with_gl(|gl| {
            let mut program = Program::from_sources(gl, "red", VERT, FRAG).unwrap();
            let id = program.id();
            unsafe {
                gl.UseProgram(0);
                assert_eq!(gl.IsProgram(id), gl::TRUE);
            }

            program.release();
            assert!(program.is_released());
            unsafe {
                assert_eq!(gl.IsProgram(id), gl::FALSE);
            }

            program.release();
            assert!(program.is_released());
            unsafe {
                assert_eq!(gl.GetError(), gl::NO_ERROR);
            }
        });
    }

    #[test]
    fn stage_objects_are_deleted_after_successful_link() {
        with_gl(|gl| {
            let vert = Shader::from_str_source(gl, "red", VERT, Stage::Vertex).unwrap();
            let frag = Shader::from_str_source(gl, "red", FRAG, Stage::Fragment).unwrap();
            let stage_ids = [vert.id(), frag.id()];

            let program = Program::link(gl, "red", &[vert, frag]).unwrap();
            for &id in &stage_ids {
                assert_eq!(unsafe { gl.IsShader(id) }, gl::FALSE, "shader {} leaked", id);
            }
            assert_eq!(unsafe { gl.IsProgram(program.id()) }, gl::TRUE);
        });
    }

    #[test]
    fn stage_objects_are_deleted_after_failed_link() {
        with_gl(|gl| {
            let no_main = "#version 330 core\nout vec4 fragColor;\nvoid shade() { fragColor = vec4(1); }\n";
            let vert = Shader::from_str_source(gl, "no-main", VERT, Stage::Vertex).unwrap();
            let frag = Shader::from_str_source(gl, "no-main", no_main, Stage::Fragment).unwrap();
            let stage_ids = [vert.id(), frag.id()];

            assert!(Program::link(gl, "no-main", &[vert, frag]).is_err());
            for &id in &stage_ids {
                assert_eq!(unsafe { gl.IsShader(id) }, gl::FALSE, "shader {} leaked", id);
            }
        });
    }

    #[test]
    fn unmatched_fragment_input_is_link_error() {
        with_gl(|gl| {
            let needs_color = "#version 330 core
in vec3 vColor;
out vec4 fragColor;
void main() { fragColor = vec4(vColor, 1.0); }
";
            match Program::from_sources(gl, "unmatched", VERT, needs_color) {
                Err(Error::LinkError { stage: Stage::Program, .. }) => {}
                Err(e) => panic!("unexpected error {}", e),
                Ok(_) => panic!("expected a link error"),
            }
        });
    }

    #[test]
    fn stage_shorthands_compile_their_stage() {
        with_gl(|gl| {
            let vert = Shader::from_vert_source(gl, &CString::new(VERT).unwrap()).unwrap();
            let frag = Shader::from_frag_source(gl, &CString::new(FRAG).unwrap()).unwrap();
            assert_eq!(vert.stage(), Stage::Vertex);
            assert_eq!(frag.stage(), Stage::Fragment);

            let mut kind: gl::types::GLint = 0;
            unsafe { gl.GetShaderiv(vert.id(), gl::SHADER_TYPE, &mut kind); }
            assert_eq!(kind as gl::types::GLenum, gl::VERTEX_SHADER);
            unsafe { gl.GetShaderiv(frag.id(), gl::SHADER_TYPE, &mut kind); }
            assert_eq!(kind as gl::types::GLenum, gl::FRAGMENT_SHADER);
        });
    }

    #[test]
    fn program_is_not_a_compilable_stage() {
        with_gl(|gl| {
            let source = CString::new(VERT).unwrap();
            match Shader::from_source(gl, "misuse", &source, Stage::Program) {
                Err(Error::NotAShaderStage { stage: Stage::Program, .. }) => {}
                Err(e) => panic!("unexpected error {}", e),
                Ok(_) => panic!("expected an error"),
            }
        });
    }

    #[test]
    fn not_a_shader_stage_is_not_a_compile_diagnostic() {
        let e = Error::NotAShaderStage { name: "misuse".into(), stage: Stage::Program };
        assert_eq!(e.to_string(), "PROGRAM is not a shader stage (misuse)");
        assert_eq!(e.stage(), None);
    }

    #[test]
    fn program_from_asset_files() {
        with_gl(|gl| {
            let res = assets();
            let program = Program::from_res(gl, &res, "shaders/colored").unwrap();
            assert!(program.uniform_location("x_offset").is_some());
            assert!(program.uniform_location("upside_down").is_some());
            assert!(program.uniform_location("color_mode").is_some());

            let pair = Program::from_res_pair(gl, &res, "shaders/colored.vert", "shaders/colored.frag");
            assert!(pair.is_ok());
        });
    }

    #[test]
    fn missing_file_is_resource_error() {
        with_gl(|gl| {
            match Program::from_res_pair(gl, &assets(), "shaders/nope.vert", "shaders/colored.frag") {
                Err(Error::ResourceLoad { ref name, .. }) => assert_eq!(name, "shaders/nope.vert"),
                Err(e) => panic!("unexpected error {}", e),
                Ok(_) => panic!("expected a resource error"),
            }
        });
    }
}
