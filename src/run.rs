//! The reproduction sequence: setup, negotiation, dispatch loop, teardown

use std::{sync::Arc, time::Duration};

use smithay_client_toolkit::{
    compositor::CompositorState,
    output::OutputState,
    reexports::{
        calloop::EventLoop,
        calloop_wayland_source::WaylandSource,
        client::{globals::registry_queue_init, Connection, Proxy},
    },
    registry::RegistryState,
    seat::SeatState,
    shell::{xdg::XdgShell, WaylandSurface},
    shm::Shm,
    subcompositor::SubcompositorState,
};
use tracing::{debug, error, info, info_span};
use wayland_egl::WlEglSurface;

use crate::{
    config::Config,
    cursor::CursorSurface,
    egl::{self, EGLContext, EGLDisplay, EGLSurface},
    gl::ClearRenderer,
    state::{Client, ClientParts, Phase},
    Error,
};

/// Runs one reproduction until the window is closed, the frame budget is spent or
/// something fails.
pub fn run(config: &Config) -> Result<(), Error> {
    let conn = Connection::connect_to_env()?;
    let (globals, mut event_queue) = registry_queue_init::<Client>(&conn)?;
    let qh = event_queue.handle();
    let mut event_loop: EventLoop<'static, Client> = EventLoop::try_new()?;

    let compositor = CompositorState::bind(&globals, &qh).map_err(|err| Error::Bind("wl_compositor", err))?;
    let xdg_shell = XdgShell::bind(&globals, &qh).map_err(|err| Error::Bind("xdg_wm_base", err))?;
    let shm = Shm::bind(&globals, &qh).map_err(|err| Error::Bind("wl_shm", err))?;
    let subcompositor = SubcompositorState::bind(compositor.wl_compositor().clone(), &globals, &qh)
        .map_err(|err| Error::Bind("wl_subcompositor", err))?;

    let default_size = config.default_size();

    // rendering context first, the window surface gets its EGL window before any role
    let (display, context, egl_surface, surface, renderer) = {
        let _span = info_span!("setup").entered();

        // SAFETY: the connection outlives the client holding every EGL object
        let display = unsafe { EGLDisplay::new(conn.backend().display_ptr() as *mut _)? };
        // hoisted: tracing's field macros import `field::display`, shadowing the local
        let version = display.get_egl_version();
        let extensions = display.extensions().len();
        debug!(version = ?version, extensions = extensions, "EGL display ready");
        let egl_config = display.choose_config()?;
        let context = EGLContext::new(&display, egl_config)?;

        let surface = compositor.create_surface(&qh);
        let (width, height) = default_size.to_i32();
        let native = WlEglSurface::new(surface.id(), width, height).map_err(egl::Error::from)?;
        let egl_surface = EGLSurface::new(&display, egl_config, native)?;

        unsafe { context.make_current_with_surface(&egl_surface)? };
        let renderer = unsafe { ClearRenderer::new(config.color)? };

        (display, context, egl_surface, surface, renderer)
    };

    let cursor = CursorSurface::new(
        &compositor,
        &shm,
        (config.cursor_hotspot_x, config.cursor_hotspot_y),
        &qh,
    )?;

    let window = xdg_shell.create_window(surface, config.decorations.into(), &qh);
    window.set_app_id(config.app_id.clone());
    window.set_title(config.title.clone());
    // initial commit without a buffer, the compositor answers with the first configure
    window.commit();

    let mut client = Client::new(
        ClientParts {
            registry_state: RegistryState::new(&globals),
            seat_state: SeatState::new(&globals, &qh),
            output_state: OutputState::new(&globals, &qh),
            shm,
            subcompositor: Arc::new(subcompositor),
            decorations: config.decorations,
            cursor,
            egl_surface,
            window,
            renderer,
            context,
            display,
        },
        default_size,
        config.frames,
    );

    event_queue.roundtrip(&mut client)?;
    event_queue.roundtrip(&mut client)?;
    client.take_error()?;

    WaylandSource::new(conn.clone(), event_queue)
        .insert(event_loop.handle())
        .map_err(|err| err.error)?;

    let timeout = Duration::from_millis(config.dispatch_timeout_ms);
    if client.phase() == Phase::AwaitConfigure {
        info!("waiting for the initial configure");
    }

    loop {
        match client.phase() {
            Phase::AwaitConfigure => {
                dispatch(&conn, &mut event_loop, timeout, &mut client)?;
                client.take_error()?;
            }
            Phase::Draw => {
                dispatch(&conn, &mut event_loop, timeout, &mut client)?;
                client.take_error()?;
                if client.phase() == Phase::Draw {
                    client.draw()?;
                }
            }
            Phase::Exit => break,
        }
    }

    info!(
        frames = client.frames_drawn(),
        open = client.frame_state().is_open(),
        "done"
    );
    Ok(())
}

fn dispatch(
    conn: &Connection,
    event_loop: &mut EventLoop<'static, Client>,
    timeout: Duration,
    client: &mut Client,
) -> Result<(), Error> {
    event_loop.dispatch(timeout, client).map_err(|err| {
        if let Some(protocol_error) = conn.protocol_error() {
            error!(
                code = protocol_error.code,
                object = %protocol_error.object_interface,
                id = protocol_error.object_id,
                "protocol error: {}",
                protocol_error.message
            );
        }
        Error::from(err)
    })
}
