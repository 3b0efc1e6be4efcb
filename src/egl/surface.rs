//! EGL surface related structs

use std::sync::Arc;

use tracing::trace;

use super::display::{EGLDisplay, EGLDisplayHandle};
use super::native::EGLNativeSurface;
use super::{ffi, EGLError, Error, SwapBuffersError};

/// EGL surface of a given EGL context for rendering
pub struct EGLSurface {
    display: Arc<EGLDisplayHandle>,
    native: Box<dyn EGLNativeSurface + 'static>,
    surface: ffi::egl::types::EGLSurface,
}

impl std::fmt::Debug for EGLSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EGLSurface")
            .field("display", &self.display)
            .field("surface", &self.surface)
            .finish_non_exhaustive()
    }
}

impl EGLSurface {
    /// Create a new `EGLSurface`.
    ///
    /// The native surface is owned by the returned value and destroyed after the
    /// EGL surface on drop.
    pub fn new<N>(
        display: &EGLDisplay,
        config: ffi::egl::types::EGLConfig,
        native: N,
    ) -> Result<EGLSurface, Error>
    where
        N: EGLNativeSurface + 'static,
    {
        let _guard = display.span().enter();
        trace!("Creating EGL window surface");

        let surface = native
            .create(&display.display, config)
            .map_err(Error::SurfaceCreationFailed)?;

        if surface == ffi::egl::NO_SURFACE {
            return Err(Error::SurfaceCreationFailed(EGLError::from_failed_call()));
        }

        Ok(EGLSurface {
            display: display.display.clone(),
            native: Box::new(native),
            surface,
        })
    }

    /// Swaps buffers at the end of a frame.
    ///
    /// This commits the underlying `wl_surface`.
    pub fn swap_buffers(&self) -> Result<(), SwapBuffersError> {
        self.native.swap_buffers(&self.display, self.surface)
    }

    /// Tries to resize the underlying native surface.
    ///
    /// The two first arguments (width, height) are the new size of the surface,
    /// the two others (dx, dy) represent the displacement of the top-left corner of the surface.
    ///
    /// Returns true if the resize was successful.
    pub fn resize(&self, width: i32, height: i32, dx: i32, dy: i32) -> bool {
        self.native.resize(width, height, dx, dy)
    }

    /// Returns the underlying raw [`EGLSurface`](ffi::egl::types::EGLSurface)
    pub fn surface(&self) -> ffi::egl::types::EGLSurface {
        self.surface
    }
}

impl Drop for EGLSurface {
    fn drop(&mut self) {
        unsafe {
            ffi::egl::DestroySurface(**self.display, self.surface);
        }
    }
}
