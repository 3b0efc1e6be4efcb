//! Thin EGL layer for the rendering surface of the window
//!
//! Large parts of this module follow the shape of
//! [glutin src/api/egl](https://github.com/tomaka/glutin/tree/044e651edf67a2029eecc650dd42546af1501414/src/api/egl/)
//! and therefore fall under
//! [glutin's Apache 2.0 license](https://github.com/tomaka/glutin/tree/044e651edf67a2029eecc650dd42546af1501414/LICENSE)
//!
//! Only what the client needs is exposed: an [`EGLDisplay`] created from the client's
//! `wl_display`, a desktop OpenGL [`EGLContext`] and an [`EGLSurface`] backed by a
//! [`WlEglSurface`](wayland_egl::WlEglSurface).

use std::ffi::{c_void, CString};

pub mod context;
pub mod display;
mod error;
#[allow(non_camel_case_types, dead_code, unused_mut, non_upper_case_globals)]
pub mod ffi;
pub mod native;
pub mod surface;

pub use self::context::EGLContext;
pub use self::display::EGLDisplay;
pub use self::error::*;
pub use self::surface::EGLSurface;

/// Returns the address of an OpenGL function.
///
/// Result is independent of displays and does not guarantee an extension is actually supported at runtime.
///
/// # Safety
///
/// libEGL has to be loaded, see [`ffi::make_sure_egl_is_loaded`].
pub unsafe fn get_proc_address(symbol: &str) -> *const c_void {
    let Ok(addr) = CString::new(symbol.as_bytes()) else {
        return std::ptr::null();
    };
    ffi::egl::GetProcAddress(addr.as_ptr()) as *const _
}

/// Error that can happen when swapping buffers.
#[derive(Debug, thiserror::Error)]
pub enum SwapBuffersError {
    /// EGL error during `eglSwapBuffers`
    #[error("{0:}")]
    EGLSwapBuffers(#[source] EGLError),
}

/// Error that can happen when making a context (and surface) current on the active thread.
#[derive(thiserror::Error, Debug)]
#[error("`eglMakeCurrent` failed: {0}")]
pub struct MakeCurrentError(#[from] EGLError);
