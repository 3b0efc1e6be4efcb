//! Solid color drawing through desktop OpenGL

use std::fmt;

use crate::config::Color;
use crate::egl;

#[allow(clippy::all, missing_docs, missing_debug_implementations, non_snake_case, dead_code)]
pub mod ffi {
    include!(concat!(env!("OUT_DIR"), "/gl_bindings.rs"));
}

/// Errors of the GL layer
#[derive(Debug, thiserror::Error)]
pub enum GlError {
    /// A required entry point could not be resolved through `eglGetProcAddress`
    #[error("Missing GL entry point `{0}`")]
    MissingFunction(&'static str),
}

/// Clears the current draw surface to a single color.
pub struct ClearRenderer {
    gl: ffi::Gl,
    color: Color,
}

impl fmt::Debug for ClearRenderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClearRenderer").field("color", &self.color).finish()
    }
}

impl ClearRenderer {
    /// Loads the GL entry points.
    ///
    /// # Safety
    ///
    /// libEGL has to be loaded, which is the case once an [`EGLDisplay`](egl::EGLDisplay) exists.
    pub unsafe fn new(color: Color) -> Result<Self, GlError> {
        let gl = ffi::Gl::load_with(|s| egl::get_proc_address(s) as *const _);
        if !gl.ClearColor.is_loaded() {
            return Err(GlError::MissingFunction("glClearColor"));
        }
        if !gl.Clear.is_loaded() {
            return Err(GlError::MissingFunction("glClear"));
        }
        Ok(ClearRenderer { gl, color })
    }

    /// Fills the color buffer of the current surface.
    ///
    /// # Safety
    ///
    /// A context created on the same EGL display has to be current on this thread.
    pub unsafe fn clear(&self) {
        let [r, g, b, a] = self.color.to_rgba_f32();
        self.gl.ClearColor(r, g, b, a);
        self.gl.Clear(ffi::COLOR_BUFFER_BIT);
    }
}
