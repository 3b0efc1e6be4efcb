use super::ffi;

#[derive(thiserror::Error, Debug)]
/// EGL errors
pub enum Error {
    /// `libEGL.so.1` could not be opened
    #[error("Failed to load libEGL: {0}")]
    LibraryLoad(String),
    /// Unable to obtain a valid EGL Display
    #[error("Unable to obtain a valid EGL Display. Err: {0:}")]
    DisplayNotSupported(#[source] EGLError),
    /// `eglInitialize` returned an error
    #[error("Failed to initialize EGL. Err: {0:}")]
    InitFailed(#[source] EGLError),
    /// `eglBindAPI` refused the desktop OpenGL API
    #[error("Cannot bind the OpenGL API. Err: {0:}")]
    BindApiFailed(#[source] EGLError),
    /// Failed to configure the EGL context
    #[error("Failed to configure the EGL context")]
    ConfigFailed(#[source] EGLError),
    /// No available pixel format matched the criteria
    #[error("No matching EGL configurations")]
    NoAvailablePixelFormat,
    /// Context creation failed as one or more requirements could not be met
    #[error("Context creation failed. Err: {0:}")]
    CreationFailed(#[source] EGLError),
    /// The native wayland egl window could not be created
    #[error("Failed to create the native wayland egl window: {0}")]
    NativeWindow(#[from] wayland_egl::Error),
    /// Window surface creation failed
    #[error("Failed to create an EGL window surface. Err: {0:}")]
    SurfaceCreationFailed(#[source] EGLError),
}

/// Raw EGL error
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EGLError {
    /// EGL is not initialized, or could not be initialized, for the specified EGL display connection.
    #[error(
        "EGL is not initialized, or could not be initialized, for the specified EGL display connection."
    )]
    NotInitialized,
    /// EGL cannot access a requested resource (for example a context is bound in another thread).
    #[error("EGL cannot access a requested resource (for example a context is bound in another thread).")]
    BadAccess,
    /// EGL failed to allocate resources for the requested operation.
    #[error("EGL failed to allocate resources for the requested operation.")]
    BadAlloc,
    /// An unrecognized attribute or attribute value was passed in the attribute list.
    #[error("An unrecognized attribute or attribute value was passed in the attribute list.")]
    BadAttribute,
    /// An EGLContext argument does not name a valid EGL rendering context.
    #[error("An EGLContext argument does not name a valid EGL rendering context.")]
    BadContext,
    /// An EGLConfig argument does not name a valid EGL frame buffer configuration.
    #[error("An EGLConfig argument does not name a valid EGL frame buffer configuration.")]
    BadConfig,
    /// The current surface of the calling thread is a window, pixel buffer or pixmap that is no longer valid.
    #[error("The current surface of the calling thread is a window, pixel buffer or pixmap that is no longer valid.")]
    BadCurrentSurface,
    /// An EGLDisplay argument does not name a valid EGL display connection.
    #[error("An EGLDisplay argument does not name a valid EGL display connection.")]
    BadDisplay,
    /// An EGLSurface argument does not name a valid surface (window, pixel buffer or pixmap) configured for GL rendering.
    #[error("An EGLSurface argument does not name a valid surface (window, pixel buffer or pixmap) configured for GL rendering.")]
    BadSurface,
    /// Arguments are inconsistent (for example, a valid context requires buffers not supplied by a valid surface).
    #[error("Arguments are inconsistent (for example, a valid context requires buffers not supplied by a valid surface).")]
    BadMatch,
    /// One or more argument values are invalid.
    #[error("One or more argument values are invalid.")]
    BadParameter,
    /// A NativePixmapType argument does not refer to a valid native pixmap.
    #[error("A NativePixmapType argument does not refer to a valid native pixmap.")]
    BadNativePixmap,
    /// A NativeWindowType argument does not refer to a valid native window.
    #[error("A NativeWindowType argument does not refer to a valid native window.")]
    BadNativeWindow,
    /// A power management event has occurred. The application must destroy all contexts and reinitialise OpenGL state and objects to continue rendering.
    #[error("A power management event has occurred. The application must destroy all contexts and reinitialise OpenGL state and objects to continue rendering.")]
    ContextLost,
    /// The call failed without EGL reporting an error
    #[error("The call failed without EGL reporting an error")]
    Silent,
    /// An unknown error
    #[error("An unknown error ({0:x})")]
    Unknown(u32),
}

impl From<u32> for EGLError {
    fn from(value: u32) -> Self {
        match value {
            ffi::egl::NOT_INITIALIZED => EGLError::NotInitialized,
            ffi::egl::BAD_ACCESS => EGLError::BadAccess,
            ffi::egl::BAD_ALLOC => EGLError::BadAlloc,
            ffi::egl::BAD_ATTRIBUTE => EGLError::BadAttribute,
            ffi::egl::BAD_CONTEXT => EGLError::BadContext,
            ffi::egl::BAD_CONFIG => EGLError::BadConfig,
            ffi::egl::BAD_CURRENT_SURFACE => EGLError::BadCurrentSurface,
            ffi::egl::BAD_DISPLAY => EGLError::BadDisplay,
            ffi::egl::BAD_SURFACE => EGLError::BadSurface,
            ffi::egl::BAD_MATCH => EGLError::BadMatch,
            ffi::egl::BAD_PARAMETER => EGLError::BadParameter,
            ffi::egl::BAD_NATIVE_PIXMAP => EGLError::BadNativePixmap,
            ffi::egl::BAD_NATIVE_WINDOW => EGLError::BadNativeWindow,
            ffi::egl::CONTEXT_LOST => EGLError::ContextLost,
            x => EGLError::Unknown(x),
        }
    }
}

impl EGLError {
    fn from_last_call() -> Result<(), EGLError> {
        match unsafe { ffi::egl::GetError() as u32 } {
            ffi::egl::SUCCESS => Ok(()),
            x => Err(EGLError::from(x)),
        }
    }

    /// Error for a call returning `EGL_FALSE`, falls back to [`EGLError::Silent`]
    /// when `eglGetError` has nothing to report.
    pub(crate) fn from_failed_call() -> EGLError {
        EGLError::from_last_call().err().unwrap_or(EGLError::Silent)
    }
}

pub(crate) fn wrap_egl_call<R, F: FnOnce() -> R>(call: F) -> Result<R, EGLError> {
    let res = call();
    EGLError::from_last_call().map(|()| res)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_known_error_codes() {
        assert_eq!(EGLError::from(0x3001), EGLError::NotInitialized);
        assert_eq!(EGLError::from(0x3005), EGLError::BadConfig);
        assert_eq!(EGLError::from(0x300D), EGLError::BadSurface);
        assert_eq!(EGLError::from(0x300E), EGLError::ContextLost);
    }

    #[test]
    fn keeps_unknown_codes() {
        let err = EGLError::from(0x1234);
        assert_eq!(err, EGLError::Unknown(0x1234));
        assert_eq!(err.to_string(), "An unknown error (1234)");
    }
}
