//! EGL display related structs

use std::ffi::{c_void, CStr};
use std::mem::MaybeUninit;
use std::ops::Deref;
use std::sync::Arc;

use tracing::{debug, info, info_span, trace};

use super::{ffi, wrap_egl_call, EGLError, Error};

/// Wrapper around [`ffi::EGLDisplay`](ffi::egl::types::EGLDisplay) to ensure display is only destroyed
/// once all resources bound to it have been dropped.
#[derive(Debug)]
pub struct EGLDisplayHandle {
    handle: ffi::egl::types::EGLDisplay,
}

impl Deref for EGLDisplayHandle {
    type Target = ffi::egl::types::EGLDisplay;

    fn deref(&self) -> &Self::Target {
        &self.handle
    }
}

impl Drop for EGLDisplayHandle {
    fn drop(&mut self) {
        unsafe {
            // ignore errors on drop
            ffi::egl::Terminate(self.handle);
        }
    }
}

/// Attributes used to pick the framebuffer configuration of the window.
///
/// Any window-capable config with at least 8 bits per color channel that
/// can render desktop OpenGL is accepted.
const CONFIG_ATTRIBUTES: [ffi::EGLint; 11] = [
    ffi::egl::SURFACE_TYPE as ffi::EGLint,
    ffi::egl::WINDOW_BIT as ffi::EGLint,
    ffi::egl::RED_SIZE as ffi::EGLint,
    8,
    ffi::egl::GREEN_SIZE as ffi::EGLint,
    8,
    ffi::egl::BLUE_SIZE as ffi::EGLint,
    8,
    ffi::egl::RENDERABLE_TYPE as ffi::EGLint,
    ffi::egl::OPENGL_BIT as ffi::EGLint,
    ffi::egl::NONE as ffi::EGLint,
];

/// [`EGLDisplay`] represents an initialised EGL environment
#[derive(Debug, Clone)]
pub struct EGLDisplay {
    pub(crate) display: Arc<EGLDisplayHandle>,
    egl_version: (i32, i32),
    extensions: Vec<String>,
    span: tracing::Span,
}

impl EGLDisplay {
    /// Create a new [`EGLDisplay`] for a client side `wl_display`.
    ///
    /// The display is initialized and the desktop OpenGL API is bound for the calling thread.
    ///
    /// # Safety
    ///
    /// `wl_display` has to point to a live `wl_display` that outlives the returned display
    /// and every context or surface created from it.
    pub unsafe fn new(wl_display: *mut c_void) -> Result<EGLDisplay, Error> {
        let span = info_span!("egl");
        let guard = span.enter();

        let dp_extensions = ffi::make_sure_egl_is_loaded()?;
        debug!("EGL No-Display Extensions: {:?}", dp_extensions);

        let display = get_wayland_display(wl_display, &dp_extensions).map_err(Error::DisplayNotSupported)?;

        let egl_version = {
            let mut major: MaybeUninit<ffi::egl::types::EGLint> = MaybeUninit::uninit();
            let mut minor: MaybeUninit<ffi::egl::types::EGLint> = MaybeUninit::uninit();

            let initialized = wrap_egl_call(|| {
                ffi::egl::Initialize(display, major.as_mut_ptr(), minor.as_mut_ptr())
            })
            .map_err(Error::InitFailed)?;
            if initialized == ffi::egl::FALSE {
                return Err(Error::InitFailed(EGLError::from_failed_call()));
            }

            let major = major.assume_init();
            let minor = minor.assume_init();

            info!("EGL Initialized");
            info!("EGL Version: {:?}", (major, minor));

            (major, minor)
        };
        let display = Arc::new(EGLDisplayHandle { handle: display });

        // the list of extensions supported by the client once initialized is different from the
        // list of extensions obtained earlier
        let extensions = {
            let p = wrap_egl_call(|| ffi::egl::QueryString(**display, ffi::egl::EXTENSIONS as i32))
                .map_err(Error::InitFailed)?;
            if p.is_null() {
                Vec::new()
            } else {
                let p = CStr::from_ptr(p);
                let list = String::from_utf8(p.to_bytes().to_vec()).unwrap_or_else(|_| String::new());
                list.split(' ').map(|e| e.to_string()).collect::<Vec<_>>()
            }
        };
        debug!("EGL Extensions: {:?}", extensions);

        let bound = wrap_egl_call(|| ffi::egl::BindAPI(ffi::egl::OPENGL_API)).map_err(Error::BindApiFailed)?;
        if bound == ffi::egl::FALSE {
            return Err(Error::BindApiFailed(EGLError::from_failed_call()));
        }

        drop(guard);
        Ok(EGLDisplay {
            display,
            egl_version,
            extensions,
            span,
        })
    }

    /// Finds a compatible [`EGLConfig`](ffi::egl::types::EGLConfig) for a window surface
    pub fn choose_config(&self) -> Result<ffi::egl::types::EGLConfig, Error> {
        let _guard = self.span.enter();
        trace!("Choosing config with attributes {:x?}", CONFIG_ATTRIBUTES);

        let mut config: MaybeUninit<ffi::egl::types::EGLConfig> = MaybeUninit::uninit();
        let mut num_configs = 0;
        let chosen = wrap_egl_call(|| unsafe {
            ffi::egl::ChooseConfig(
                **self.display,
                CONFIG_ATTRIBUTES.as_ptr(),
                config.as_mut_ptr(),
                1,
                &mut num_configs,
            )
        })
        .map_err(Error::ConfigFailed)?;

        if chosen == ffi::egl::FALSE {
            return Err(Error::ConfigFailed(EGLError::from_failed_call()));
        }
        if num_configs == 0 {
            return Err(Error::NoAvailablePixelFormat);
        }

        Ok(unsafe { config.assume_init() })
    }

    /// Returns the runtime egl version of this display
    pub fn get_egl_version(&self) -> (i32, i32) {
        self.egl_version
    }

    /// Returns the supported extensions of this display
    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    pub(crate) fn span(&self) -> &tracing::Span {
        &self.span
    }
}

/// Resolves the `EGLDisplay` of a wayland client connection.
///
/// The platform extensions are preferred, `eglGetDisplay` is the last resort for
/// implementations without `EGL_EXT_platform_base`.
unsafe fn get_wayland_display(
    wl_display: *mut c_void,
    dp_extensions: &[String],
) -> Result<ffi::egl::types::EGLDisplay, EGLError> {
    let has = |ext: &str| dp_extensions.iter().any(|s| s == ext);

    let display = if has("EGL_KHR_platform_wayland") && ffi::egl::GetPlatformDisplay::is_loaded() {
        debug!("Using EGL_KHR_platform_wayland");
        let attributes: [ffi::egl::types::EGLAttrib; 1] = [ffi::egl::NONE as ffi::egl::types::EGLAttrib];
        wrap_egl_call(|| {
            ffi::egl::GetPlatformDisplay(ffi::egl::PLATFORM_WAYLAND_KHR, wl_display, attributes.as_ptr())
        })?
    } else if has("EGL_EXT_platform_wayland") && ffi::egl::GetPlatformDisplayEXT::is_loaded() {
        debug!("Using EGL_EXT_platform_wayland");
        let attributes: [ffi::EGLint; 1] = [ffi::egl::NONE as ffi::EGLint];
        wrap_egl_call(|| {
            ffi::egl::GetPlatformDisplayEXT(ffi::egl::PLATFORM_WAYLAND_EXT, wl_display, attributes.as_ptr())
        })?
    } else {
        debug!("No wayland platform extension, falling back to eglGetDisplay");
        wrap_egl_call(|| ffi::egl::GetDisplay(wl_display as ffi::EGLNativeDisplayType))?
    };

    if display == ffi::egl::NO_DISPLAY {
        return Err(EGLError::BadDisplay);
    }

    Ok(display)
}
