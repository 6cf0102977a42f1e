use failure;
use render_gl::{self, Stage};

/// Formats the whole cause chain of `e`, innermost cause first.
pub fn failure_to_string(e: failure::Error) -> String {
    use std::fmt::Write;

    let mut result = String::new();

    for (i, cause) in e.iter_chain().collect::<Vec<_>>().into_iter().rev().enumerate() {
        if i > 0 {
            let _ = writeln!(&mut result, "   Which caused the following issue:");
        }
        let _ = write!(&mut result, "{}", cause);
        if let Some(backtrace) = cause.backtrace() {
            let backtrace_str = format!("{}", backtrace);
            if backtrace_str.len() > 0 {
                let _ = writeln!(&mut result, " This happened at {}", backtrace);
            } else {
                let _ = writeln!(&mut result);
            }
        } else {
            let _ = writeln!(&mut result);
        }
    }

    result
}

/// The shader stage responsible for `e`, if a shader error is anywhere in its chain.
pub fn failing_stage(e: &failure::Error) -> Option<Stage> {
    e.iter_chain()
        .filter_map(|cause| cause.downcast_ref::<render_gl::Error>())
        .filter_map(|shader_error| shader_error.stage())
        .next()
}
