use smithay_client_toolkit::reexports::{
    calloop,
    client::{
        globals::{BindError, GlobalError},
        ConnectError, DispatchError,
    },
};
use smithay_client_toolkit::seat::SeatError;

use crate::{cursor::CursorError, egl, gl::GlError};

/// Errors ending a reproduction run
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// `WAYLAND_DISPLAY` did not lead to a compositor
    #[error("no wayland connection: {0}")]
    Connect(#[from] ConnectError),
    /// The initial registry roundtrip failed
    #[error("failed to list wayland globals: {0}")]
    Globals(#[from] GlobalError),
    /// A global the client cannot work without is not advertised
    #[error("required global `{0}` is not available: {1}")]
    Bind(&'static str, #[source] BindError),
    /// Obtaining a pointer from a seat failed
    #[error("failed to get pointer: {0}")]
    Seat(#[from] SeatError),
    /// EGL setup failed
    #[error(transparent)]
    Egl(#[from] egl::Error),
    /// The context could not be bound to the window surface
    #[error(transparent)]
    MakeCurrent(#[from] egl::MakeCurrentError),
    /// Presenting a frame failed
    #[error(transparent)]
    SwapBuffers(#[from] egl::SwapBuffersError),
    /// GL entry points are missing
    #[error(transparent)]
    Gl(#[from] GlError),
    /// The cursor image could not be created
    #[error(transparent)]
    Cursor(#[from] CursorError),
    /// The client side decorations could not be created
    #[error("failed to create the decorations frame: {0}")]
    Decorations(#[source] Box<dyn std::error::Error>),
    /// Reading or dispatching wayland events failed, includes protocol errors
    #[error("wayland dispatch failed: {0}")]
    Dispatch(#[from] DispatchError),
    /// The event loop failed
    #[error("event loop failed: {0}")]
    EventLoop(#[from] calloop::Error),
}
