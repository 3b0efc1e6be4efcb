#![warn(missing_docs, missing_debug_implementations, rust_2018_idioms)]
// Allow acronyms like EGL
#![allow(clippy::upper_case_acronyms)]

//! # bugrepro: a wayland client for reproducing compositor bugs
//!
//! The client connects to the compositor named by `WAYLAND_DISPLAY`, negotiates a decorated
//! toplevel, renders into it through EGL and then redraws a solid color as fast as the
//! dispatch loop allows, logging pointer enter/leave on the way.
//!
//! ## Ordering
//!
//! Three asynchronous conversations meet in this client:
//!
//! - the core wayland protocol (registry, seat, shm),
//! - the toplevel/decoration negotiation, which decides the window size and when the first
//!   frame may be shown. Without server side decorations the client draws its own frame,
//!   see [`decorations`],
//! - the EGL swap cycle, which commits the window surface on every `eglSwapBuffers`.
//!
//! Nothing is drawn before the first configure, and every configure resizes the EGL window
//! before the matching buffer is presented. See [`state::Client`] for the handlers and
//! [`run`] for the sequence.
//!
//! ### Logging
//!
//! All output goes through [`tracing`], [`init_logging`] installs a compact subscriber
//! honoring `RUST_LOG`.

pub mod config;
pub mod cursor;
pub mod decorations;
pub mod egl;
mod error;
pub mod frame;
pub mod gl;
mod run;
pub mod state;

pub use self::config::Config;
pub use self::error::Error;
pub use self::run::run;

/// Installs the global `tracing` subscriber, filtered by `RUST_LOG` when set
pub fn init_logging() {
    if let Ok(env_filter) = tracing_subscriber::EnvFilter::try_from_default_env() {
        tracing_subscriber::fmt()
            .compact()
            .with_env_filter(env_filter)
            .init();
    } else {
        tracing_subscriber::fmt().compact().init();
    }
}
