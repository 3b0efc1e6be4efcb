//! Client state and the protocol handlers driving it

use std::{sync::Arc, time::Duration};

use smithay_client_toolkit::{
    compositor::CompositorHandler,
    delegate_compositor, delegate_output, delegate_pointer, delegate_registry, delegate_seat,
    delegate_shm, delegate_subcompositor, delegate_xdg_shell, delegate_xdg_window,
    output::{OutputHandler, OutputState},
    reexports::{
        client::{
            protocol::{
                wl_output::{self, WlOutput},
                wl_pointer::WlPointer,
                wl_seat::WlSeat,
                wl_surface::WlSurface,
            },
            Connection, Proxy, QueueHandle,
        },
        csd_frame::{DecorationsFrame, FrameAction},
    },
    registry::{ProvidesRegistryState, RegistryState},
    registry_handlers,
    seat::{
        pointer::{PointerEvent, PointerEventKind, PointerHandler},
        Capability, SeatHandler, SeatState,
    },
    shell::{
        xdg::{
            fallback_frame::FallbackFrame,
            window::{Window, WindowConfigure, WindowHandler},
            XdgSurface,
        },
        WaylandSurface,
    },
    shm::{Shm, ShmHandler},
    subcompositor::SubcompositorState,
};
use tracing::{debug, error, info, trace, warn};

use crate::{
    config::DecorationRequest,
    cursor::CursorSurface,
    decorations,
    egl::{EGLContext, EGLDisplay, EGLSurface},
    frame::{saturating_i32, FrameState, Placement, Size},
    gl::ClearRenderer,
    Error,
};

/// Where the dispatch loop stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Nothing may be drawn until the first configure was handled
    AwaitConfigure,
    /// Dispatch, then draw a frame
    Draw,
    /// Window closed or frame budget spent
    Exit,
}

impl Phase {
    /// Derives the phase from the negotiated state and the frame count
    pub fn of(frame: &FrameState, frames_drawn: u64, frame_limit: Option<u64>) -> Phase {
        if !frame.is_open() {
            Phase::Exit
        } else if !frame.is_configured() {
            Phase::AwaitConfigure
        } else if frame_limit.is_some_and(|limit| frames_drawn >= limit) {
            Phase::Exit
        } else {
            Phase::Draw
        }
    }
}

/// Everything the client owns, handed to every protocol callback
///
/// Fields drop in declaration order, which gives the teardown order: cursor surface,
/// decoration subsurfaces, EGL surface and its native window, the toplevel with its
/// `wl_surface`, the context and finally the EGL display.
pub struct Client {
    registry_state: RegistryState,
    seat_state: SeatState,
    output_state: OutputState,
    shm: Shm,
    subcompositor: Arc<SubcompositorState>,

    decorations: DecorationRequest,
    pointer: Option<(WlSeat, WlPointer)>,
    frame: FrameState,
    frames_drawn: u64,
    frame_limit: Option<u64>,
    error: Option<Error>,

    cursor: CursorSurface,
    window_frame: Option<FallbackFrame<Client>>,
    egl_surface: EGLSurface,
    window: Window,
    renderer: ClearRenderer,
    context: EGLContext,
    display: EGLDisplay,
}

/// Protocol and rendering objects created before the first dispatch
#[allow(missing_debug_implementations)]
pub struct ClientParts {
    /// registry of the connection
    pub registry_state: RegistryState,
    /// seat tracking
    pub seat_state: SeatState,
    /// output tracking
    pub output_state: OutputState,
    /// bound `wl_shm`
    pub shm: Shm,
    /// bound `wl_subcompositor`, parent of the decoration subsurfaces
    pub subcompositor: Arc<SubcompositorState>,
    /// decoration mode requested for the window
    pub decorations: DecorationRequest,
    /// the cursor image
    pub cursor: CursorSurface,
    /// rendering surface on top of the window's `wl_surface`
    pub egl_surface: EGLSurface,
    /// the decorated toplevel
    pub window: Window,
    /// solid color drawing
    pub renderer: ClearRenderer,
    /// context current on `egl_surface`
    pub context: EGLContext,
    /// EGL display of the connection
    pub display: EGLDisplay,
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("decorations", &self.decorations)
            .field("pointer", &self.pointer)
            .field("frame", &self.frame)
            .field("frames_drawn", &self.frames_drawn)
            .field("frame_limit", &self.frame_limit)
            .field("error", &self.error)
            .field("cursor", &self.cursor)
            .field("client_side_frame", &self.window_frame.is_some())
            .field("egl_surface", &self.egl_surface)
            .field("renderer", &self.renderer)
            .field("context", &self.context)
            .field("display", &self.display)
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Assembles the client, `default_size` is the size the EGL window was created with
    pub fn new(parts: ClientParts, default_size: Size, frame_limit: Option<u64>) -> Self {
        let ClientParts {
            registry_state,
            seat_state,
            output_state,
            shm,
            subcompositor,
            decorations,
            cursor,
            egl_surface,
            window,
            renderer,
            context,
            display,
        } = parts;

        Client {
            registry_state,
            seat_state,
            output_state,
            shm,
            subcompositor,
            decorations,
            pointer: None,
            frame: FrameState::new(default_size),
            frames_drawn: 0,
            frame_limit,
            error: None,
            cursor,
            window_frame: None,
            egl_surface,
            window,
            renderer,
            context,
            display,
        }
    }

    /// Current phase of the dispatch loop
    pub fn phase(&self) -> Phase {
        Phase::of(&self.frame, self.frames_drawn, self.frame_limit)
    }

    /// Negotiated window state
    pub fn frame_state(&self) -> &FrameState {
        &self.frame
    }

    /// Number of frames presented by [`Client::draw`]
    pub fn frames_drawn(&self) -> u64 {
        self.frames_drawn
    }

    /// Returns the first error raised inside a protocol callback, if any
    pub fn take_error(&mut self) -> Result<(), Error> {
        match self.error.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Clears the window to the configured color and presents it
    pub fn draw(&mut self) -> Result<(), Error> {
        self.present()?;
        self.frames_drawn += 1;
        trace!(frame = self.frames_drawn, "frame presented");
        Ok(())
    }

    /// Clears the back buffer and swaps it, which commits the window surface together
    /// with the decoration subsurfaces drawn before.
    fn present(&mut self) -> Result<(), Error> {
        unsafe {
            self.context.make_current_with_surface(&self.egl_surface)?;
            self.renderer.clear();
        }
        if let Some(window_frame) = self.window_frame.as_mut() {
            if window_frame.is_dirty() && !window_frame.is_hidden() {
                window_frame.draw();
            }
        }
        self.egl_surface.swap_buffers()?;
        Ok(())
    }

    /// Applies a click on the decorations to the toplevel
    fn frame_action(&mut self, serial: u32, action: FrameAction) {
        let Some((seat, _)) = self.pointer.as_ref() else {
            return;
        };
        match action {
            FrameAction::Close => {
                info!("close clicked");
                self.frame.close();
            }
            FrameAction::Minimize => self.window.set_minimized(),
            FrameAction::Maximize => self.window.set_maximized(),
            FrameAction::UnMaximize => self.window.unset_maximized(),
            FrameAction::ShowMenu(x, y) => self.window.show_window_menu(seat, serial, (x, y)),
            FrameAction::Resize(edge) => {
                if let Some(edge) = decorations::xdg_resize_edge(edge) {
                    self.window.resize(seat, serial, edge);
                }
            }
            FrameAction::Move => self.window.move_(seat, serial),
            _ => {}
        }
    }

    fn fail(&mut self, err: Error) {
        error!("{}", err);
        if self.error.is_none() {
            self.error = Some(err);
        }
    }
}

impl Drop for Client {
    fn drop(&mut self) {
        if let Err(err) = self.context.unbind() {
            warn!("Failed to unbind the EGL context: {}", err);
        }
    }
}

impl CompositorHandler for Client {
    fn frame(&mut self, _: &Connection, _: &QueueHandle<Self>, _: &WlSurface, _: u32) {}
    fn surface_enter(&mut self, _: &Connection, _: &QueueHandle<Self>, _: &WlSurface, _: &WlOutput) {}
    fn surface_leave(&mut self, _: &Connection, _: &QueueHandle<Self>, _: &WlSurface, _: &WlOutput) {}
    fn scale_factor_changed(&mut self, _: &Connection, _: &QueueHandle<Self>, _: &WlSurface, _: i32) {}
    fn transform_changed(
        &mut self,
        _: &Connection,
        _: &QueueHandle<Self>,
        _: &WlSurface,
        _: wl_output::Transform,
    ) {
    }
}

impl WindowHandler for Client {
    fn request_close(&mut self, _: &Connection, _: &QueueHandle<Self>, _: &Window) {
        info!("close requested");
        self.frame.close();
    }

    fn configure(
        &mut self,
        _conn: &Connection,
        qh: &QueueHandle<Self>,
        window: &Window,
        configure: WindowConfigure,
        serial: u32,
    ) {
        let placement = Placement::from_state(configure.state);
        let first = !self.frame.is_configured();

        // the compositor suggests the outer size, the frame takes its borders from it
        let suggested = if decorations::draws_frame(self.decorations, configure.decoration_mode) {
            let window_frame = match self.window_frame.take() {
                Some(window_frame) => window_frame,
                None => match FallbackFrame::new(window, &self.shm, self.subcompositor.clone(), qh.clone()) {
                    Ok(window_frame) => {
                        debug!("drawing client side decorations");
                        window_frame
                    }
                    Err(err) => {
                        self.fail(Error::Decorations(err));
                        return;
                    }
                },
            };
            let window_frame = self.window_frame.insert(window_frame);
            window_frame.set_hidden(false);
            // state and capabilities first, resizing depends on them
            window_frame.update_state(configure.state);
            window_frame.update_wm_capabilities(configure.capabilities);
            Size::from_suggestion(configure.new_size)
                .map(|outer| Size::from_content_suggestion(window_frame.subtract_borders(outer.w, outer.h)))
        } else {
            if let Some(window_frame) = self.window_frame.as_mut() {
                window_frame.set_hidden(true);
            }
            Size::from_suggestion(configure.new_size)
        };
        let size = self.frame.configure(suggested, placement);

        if first {
            info!(serial, ?size, decorations = ?configure.decoration_mode, "Window initial configure");
        } else {
            debug!(serial, ?size, ?placement, decorations = ?configure.decoration_mode, "Window configure");
        }

        let (width, height) = size.to_i32();
        match self.window_frame.as_mut().filter(|window_frame| !window_frame.is_hidden()) {
            Some(window_frame) => {
                window_frame.resize(size.w, size.h);
                let (x, y) = window_frame.location();
                let (outer_width, outer_height) = window_frame.add_borders(size.w.get(), size.h.get());
                window.xdg_surface().set_window_geometry(
                    x,
                    y,
                    saturating_i32(outer_width),
                    saturating_i32(outer_height),
                );
            }
            None => window.xdg_surface().set_window_geometry(0, 0, width, height),
        }
        self.egl_surface.resize(width, height, 0, 0);

        if let Err(err) = self.present() {
            self.fail(err);
        }
    }
}

impl SeatHandler for Client {
    fn seat_state(&mut self) -> &mut SeatState {
        &mut self.seat_state
    }

    fn new_seat(&mut self, _: &Connection, _: &QueueHandle<Self>, _: WlSeat) {}

    fn new_capability(
        &mut self,
        _conn: &Connection,
        qh: &QueueHandle<Self>,
        seat: WlSeat,
        capability: Capability,
    ) {
        if capability != Capability::Pointer || self.pointer.is_some() {
            return;
        }

        match self.seat_state.get_pointer(qh, &seat) {
            Ok(pointer) => {
                info!("acquired pointer capability");
                self.pointer = Some((seat, pointer));
            }
            Err(err) => self.fail(err.into()),
        }
    }

    fn remove_capability(
        &mut self,
        _conn: &Connection,
        _: &QueueHandle<Self>,
        seat: WlSeat,
        capability: Capability,
    ) {
        if capability != Capability::Pointer {
            return;
        }

        if matches!(&self.pointer, Some((pointer_seat, _)) if *pointer_seat == seat) {
            info!("lost pointer capability");
            if let Some((_, pointer)) = self.pointer.take() {
                pointer.release();
            }
        }
    }

    fn remove_seat(&mut self, _: &Connection, _: &QueueHandle<Self>, _: WlSeat) {}
}

impl PointerHandler for Client {
    fn pointer_frame(
        &mut self,
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
        pointer: &WlPointer,
        events: &[PointerEvent],
    ) {
        for event in events {
            if &event.surface == self.window.wl_surface() {
                match event.kind {
                    PointerEventKind::Enter { serial } => {
                        info!("pointer_enter");
                        self.cursor.set_on(pointer, serial);
                    }
                    PointerEventKind::Leave { .. } => {
                        info!("pointer_leave");
                    }
                    PointerEventKind::Motion { .. } => {
                        trace!("pointer motion: {:?}", event.position);
                    }
                    _ => {}
                }
                continue;
            }

            // anything else is one of the decoration subsurfaces
            let Some(window_frame) = self.window_frame.as_mut() else {
                continue;
            };
            let (x, y) = event.position;
            match event.kind {
                PointerEventKind::Enter { serial } => {
                    trace!("pointer entered decorations");
                    self.cursor.set_on(pointer, serial);
                    window_frame.click_point_moved(Duration::ZERO, &event.surface.id(), x, y);
                }
                PointerEventKind::Leave { .. } => {
                    window_frame.click_point_left();
                }
                PointerEventKind::Motion { time } => {
                    window_frame.click_point_moved(
                        Duration::from_millis(time.into()),
                        &event.surface.id(),
                        x,
                        y,
                    );
                }
                PointerEventKind::Press { button, serial, time }
                | PointerEventKind::Release { button, serial, time } => {
                    let Some(click) = decorations::frame_click(button) else {
                        continue;
                    };
                    let pressed = matches!(event.kind, PointerEventKind::Press { .. });
                    if let Some(action) =
                        window_frame.on_click(Duration::from_millis(time.into()), click, pressed)
                    {
                        self.frame_action(serial, action);
                    }
                }
                _ => {}
            }
        }
    }
}

impl OutputHandler for Client {
    fn output_state(&mut self) -> &mut OutputState {
        &mut self.output_state
    }
    fn new_output(&mut self, _: &Connection, _: &QueueHandle<Self>, _: WlOutput) {}
    fn update_output(&mut self, _: &Connection, _: &QueueHandle<Self>, _: WlOutput) {}
    fn output_destroyed(&mut self, _: &Connection, _: &QueueHandle<Self>, _: WlOutput) {}
}

impl ShmHandler for Client {
    fn shm_state(&mut self) -> &mut Shm {
        &mut self.shm
    }
}

impl ProvidesRegistryState for Client {
    fn registry(&mut self) -> &mut RegistryState {
        &mut self.registry_state
    }
    registry_handlers![OutputState, SeatState];
}

delegate_compositor!(Client);
delegate_subcompositor!(Client);
delegate_output!(Client);
delegate_shm!(Client);

delegate_seat!(Client);
delegate_pointer!(Client);

delegate_xdg_shell!(Client);
delegate_xdg_window!(Client);

delegate_registry!(Client);

#[cfg(test)]
mod tests {
    use std::num::NonZeroU32;

    use super::*;

    fn state() -> FrameState {
        FrameState::new(Size::new(NonZeroU32::new(600).unwrap(), NonZeroU32::new(400).unwrap()))
    }

    #[test]
    fn waits_for_configure() {
        assert_eq!(Phase::of(&state(), 0, None), Phase::AwaitConfigure);
        // a frame budget does not allow drawing before configure
        assert_eq!(Phase::of(&state(), 0, Some(5)), Phase::AwaitConfigure);
    }

    #[test]
    fn draws_once_configured() {
        let mut frame = state();
        frame.configure(None, Placement::Floating);
        assert_eq!(Phase::of(&frame, 0, None), Phase::Draw);
        assert_eq!(Phase::of(&frame, 1000, None), Phase::Draw);
    }

    #[test]
    fn exits_on_close() {
        let mut frame = state();
        frame.close();
        assert_eq!(Phase::of(&frame, 0, None), Phase::Exit);

        let mut frame = state();
        frame.configure(None, Placement::Floating);
        frame.close();
        assert_eq!(Phase::of(&frame, 3, None), Phase::Exit);
    }

    #[test]
    fn exits_after_frame_budget() {
        let mut frame = state();
        frame.configure(None, Placement::Floating);
        assert_eq!(Phase::of(&frame, 4, Some(5)), Phase::Draw);
        assert_eq!(Phase::of(&frame, 5, Some(5)), Phase::Exit);
        assert_eq!(Phase::of(&frame, 0, Some(0)), Phase::Exit);
    }
}
