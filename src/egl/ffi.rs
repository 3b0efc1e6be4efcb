#![allow(missing_docs)]

use super::{wrap_egl_call, Error};
use std::os::raw::{c_long, c_void};

pub type khronos_utime_nanoseconds_t = khronos_uint64_t;
pub type khronos_uint64_t = u64;
pub type khronos_ssize_t = c_long;
pub type EGLint = i32;
pub type EGLNativeDisplayType = NativeDisplayType;
pub type EGLNativePixmapType = NativePixmapType;
pub type EGLNativeWindowType = NativeWindowType;
pub type NativeDisplayType = *const c_void;
pub type NativePixmapType = *const c_void;
pub type NativeWindowType = *const c_void;

/// Loads libEGL symbols, if not loaded already, and returns the client extensions.
///
/// This normally happens automatically during [`EGLDisplay`](super::EGLDisplay) initialization.
pub fn make_sure_egl_is_loaded() -> Result<Vec<String>, Error> {
    use std::{
        ffi::{CStr, CString},
        ptr,
    };

    let lib = egl::LIB.as_ref().map_err(|err| Error::LibraryLoad(err.to_string()))?;

    let load_from_lib = |sym: &str| -> *const c_void {
        let Ok(name) = CString::new(sym) else {
            return ptr::null();
        };
        match unsafe { lib.get::<*mut c_void>(name.as_bytes_with_nul()) } {
            Ok(x) => *x as *const _,
            Err(_) => ptr::null(),
        }
    };

    egl::LOAD.call_once(|| unsafe {
        egl::GetProcAddress::load_with(load_from_lib);
        egl::load_with(|sym| match load_from_lib(sym) {
            // extension entry points are only reachable through eglGetProcAddress
            x if x.is_null() && egl::GetProcAddress::is_loaded() => super::get_proc_address(sym),
            x => x,
        });
    });

    // Querying NO_DISPLAY is only valid with EGL 1.5 or EGL_EXT_client_extensions,
    // older implementations answer with an error which we treat as "no extensions".
    let extensions = unsafe {
        match wrap_egl_call(|| egl::QueryString(egl::NO_DISPLAY, egl::EXTENSIONS as i32)) {
            Ok(p) if !p.is_null() => {
                let p = CStr::from_ptr(p);
                let list = String::from_utf8(p.to_bytes().to_vec()).unwrap_or_else(|_| String::new());
                list.split(' ').map(|e| e.to_string()).collect::<Vec<_>>()
            }
            _ => Vec::new(),
        }
    };

    Ok(extensions)
}

/// Module containing raw egl function bindings
#[allow(clippy::all, missing_debug_implementations)]
pub mod egl {
    use super::*;
    use libloading::Library;
    use std::sync::Once;

    lazy_static::lazy_static! {
        pub static ref LIB: Result<Library, libloading::Error> = unsafe { Library::new("libEGL.so.1") };
    }

    pub static LOAD: Once = Once::new();

    include!(concat!(env!("OUT_DIR"), "/egl_bindings.rs"));
}
