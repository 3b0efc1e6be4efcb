//! Native window types an [`EGLSurface`](super::EGLSurface) can be created for

use std::sync::Arc;

use wayland_egl as wegl;

use super::display::EGLDisplayHandle;
use super::{ffi, wrap_egl_call, EGLError, SwapBuffersError};

/// Native window an [`EGLSurface`](super::EGLSurface) renders into, implemented for
/// [`WlEglSurface`](wegl::WlEglSurface)
///
/// # Safety
///
/// The returned [`EGLNativeWindowType`](ffi::EGLNativeWindowType) must be valid for EGL
/// and there is no way to test that.
pub unsafe trait EGLNativeSurface {
    /// Create an EGLSurface from the internal native type.
    fn create(
        &self,
        display: &Arc<EGLDisplayHandle>,
        config_id: ffi::egl::types::EGLConfig,
    ) -> Result<ffi::egl::types::EGLSurface, EGLError>;

    /// If the surface supports resizing you may implement and use this function.
    ///
    /// The two first arguments (width, height) are the new size of the surface,
    /// the two others (dx, dy) represent the displacement of the top-left corner of the surface.
    /// It allows you to control the direction of the resizing if necessary.
    ///
    /// Implementations may ignore the dx and dy arguments.
    ///
    /// Returns true if the resize was successful.
    fn resize(&self, _width: i32, _height: i32, _dx: i32, _dy: i32) -> bool {
        false
    }

    /// Presents the back buffer, called by
    /// [EGLSurface::swap_buffers](super::EGLSurface::swap_buffers)
    fn swap_buffers(
        &self,
        display: &Arc<EGLDisplayHandle>,
        surface: ffi::egl::types::EGLSurface,
    ) -> Result<(), SwapBuffersError> {
        let swapped = wrap_egl_call(|| unsafe { ffi::egl::SwapBuffers(***display, surface) })
            .map_err(SwapBuffersError::EGLSwapBuffers)?;
        if swapped == ffi::egl::FALSE {
            return Err(SwapBuffersError::EGLSwapBuffers(EGLError::from_failed_call()));
        }
        Ok(())
    }
}

unsafe impl EGLNativeSurface for wegl::WlEglSurface {
    fn create(
        &self,
        display: &Arc<EGLDisplayHandle>,
        config_id: ffi::egl::types::EGLConfig,
    ) -> Result<ffi::egl::types::EGLSurface, EGLError> {
        let attributes = [ffi::egl::NONE as ffi::EGLint];
        wrap_egl_call(|| unsafe {
            ffi::egl::CreateWindowSurface(
                ***display,
                config_id,
                self.ptr() as ffi::EGLNativeWindowType,
                attributes.as_ptr(),
            )
        })
    }

    fn resize(&self, width: i32, height: i32, dx: i32, dy: i32) -> bool {
        wegl::WlEglSurface::resize(self, width, height, dx, dy);
        true
    }
}
