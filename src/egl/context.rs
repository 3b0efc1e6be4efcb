//! EGL context related structs

use std::sync::Arc;

use tracing::{info, trace};

use super::display::{EGLDisplay, EGLDisplayHandle};
use super::{ffi, wrap_egl_call, EGLError, EGLSurface, Error, MakeCurrentError};

/// Desktop OpenGL context for rendering
#[derive(Debug)]
pub struct EGLContext {
    context: ffi::egl::types::EGLContext,
    display: Arc<EGLDisplayHandle>,
}

impl EGLContext {
    /// Create a new [`EGLContext`] for the given config.
    ///
    /// No attributes are requested, the implementation picks the context version.
    pub fn new(display: &EGLDisplay, config_id: ffi::egl::types::EGLConfig) -> Result<EGLContext, Error> {
        let _guard = display.span().enter();

        let context_attributes = [ffi::egl::NONE as ffi::EGLint];

        trace!("Creating EGL context...");
        let context = wrap_egl_call(|| unsafe {
            ffi::egl::CreateContext(
                **display.display,
                config_id,
                ffi::egl::NO_CONTEXT,
                context_attributes.as_ptr(),
            )
        })
        .map_err(Error::CreationFailed)?;

        if context == ffi::egl::NO_CONTEXT {
            return Err(Error::CreationFailed(EGLError::from_failed_call()));
        }

        info!("EGL context created");

        Ok(EGLContext {
            context,
            display: display.display.clone(),
        })
    }

    /// Makes the OpenGL context the current context in the current thread with a surface to
    /// read/write to.
    ///
    /// # Safety
    ///
    /// This function is marked unsafe, because the context cannot be made current
    /// on multiple threads without being unbound again (see `unbind`)
    pub unsafe fn make_current_with_surface(&self, surface: &EGLSurface) -> Result<(), MakeCurrentError> {
        let surface_ptr = surface.surface();
        let made_current = wrap_egl_call(|| {
            ffi::egl::MakeCurrent(**self.display, surface_ptr, surface_ptr, self.context)
        })?;
        if made_current == ffi::egl::FALSE {
            return Err(MakeCurrentError(EGLError::from_failed_call()));
        }
        Ok(())
    }

    /// Returns true if the OpenGL context is the current one in the thread.
    pub fn is_current(&self) -> bool {
        unsafe { ffi::egl::GetCurrentContext() == self.context as *const _ }
    }

    /// Unbinds this context from the current thread, if it was bound.
    ///
    /// This does nothing if this context is not the current context.
    pub fn unbind(&self) -> Result<(), MakeCurrentError> {
        if self.is_current() {
            wrap_egl_call(|| unsafe {
                ffi::egl::MakeCurrent(
                    **self.display,
                    ffi::egl::NO_SURFACE,
                    ffi::egl::NO_SURFACE,
                    ffi::egl::NO_CONTEXT,
                )
            })?;
        }
        Ok(())
    }
}

impl Drop for EGLContext {
    fn drop(&mut self) {
        unsafe {
            // We need to ensure the context is unbound, otherwise it egl stalls the destroy call
            // ignore failures at this point
            let _ = self.unbind();
            ffi::egl::DestroyContext(**self.display, self.context);
        }
    }
}
