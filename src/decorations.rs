//! Client side decorations
//!
//! When the compositor leaves the decorations to the client (or cannot negotiate them at all,
//! without `zxdg_decoration_manager_v1`), the window gets the toolkit's
//! [`FallbackFrame`](smithay_client_toolkit::shell::xdg::fallback_frame::FallbackFrame): a
//! header bar and borders drawn on subsurfaces around the content surface. The helpers here
//! decide when that frame is shown and translate pointer input on it into toplevel requests.

use smithay_client_toolkit::{
    reexports::{
        csd_frame::{FrameClick, ResizeEdge},
        protocols::xdg::shell::client::xdg_toplevel::ResizeEdge as XdgResizeEdge,
    },
    shell::xdg::window::DecorationMode,
};

use crate::config::DecorationRequest;

const BTN_LEFT: u32 = 0x110;
const BTN_RIGHT: u32 = 0x111;

/// Whether the client draws its own frame for a configure in `mode`.
///
/// [`DecorationRequest::None`] opts out of decorations entirely.
pub fn draws_frame(request: DecorationRequest, mode: DecorationMode) -> bool {
    request != DecorationRequest::None && mode == DecorationMode::Client
}

/// The frame click a pointer button stands for, other buttons are ignored
pub fn frame_click(button: u32) -> Option<FrameClick> {
    match button {
        BTN_LEFT => Some(FrameClick::Normal),
        BTN_RIGHT => Some(FrameClick::Alternate),
        _ => None,
    }
}

/// Edge argument of `xdg_toplevel.resize` for a border grab
pub fn xdg_resize_edge(edge: ResizeEdge) -> Option<XdgResizeEdge> {
    let edge = match edge {
        ResizeEdge::None => XdgResizeEdge::None,
        ResizeEdge::Top => XdgResizeEdge::Top,
        ResizeEdge::Bottom => XdgResizeEdge::Bottom,
        ResizeEdge::Left => XdgResizeEdge::Left,
        ResizeEdge::TopLeft => XdgResizeEdge::TopLeft,
        ResizeEdge::BottomLeft => XdgResizeEdge::BottomLeft,
        ResizeEdge::Right => XdgResizeEdge::Right,
        ResizeEdge::TopRight => XdgResizeEdge::TopRight,
        ResizeEdge::BottomRight => XdgResizeEdge::BottomRight,
        _ => return None,
    };
    Some(edge)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_follows_negotiated_mode() {
        for request in [
            DecorationRequest::Server,
            DecorationRequest::Client,
            DecorationRequest::ServerDefault,
            DecorationRequest::ClientDefault,
        ] {
            assert!(draws_frame(request, DecorationMode::Client), "{request:?}");
            assert!(!draws_frame(request, DecorationMode::Server), "{request:?}");
        }
    }

    #[test]
    fn no_frame_without_decorations() {
        assert!(!draws_frame(DecorationRequest::None, DecorationMode::Client));
        assert!(!draws_frame(DecorationRequest::None, DecorationMode::Server));
    }

    #[test]
    fn maps_buttons() {
        assert_eq!(frame_click(0x110), Some(FrameClick::Normal));
        assert_eq!(frame_click(0x111), Some(FrameClick::Alternate));
        // middle button
        assert_eq!(frame_click(0x112), None);
    }

    #[test]
    fn maps_resize_edges() {
        assert_eq!(xdg_resize_edge(ResizeEdge::TopLeft), Some(XdgResizeEdge::TopLeft));
        assert_eq!(xdg_resize_edge(ResizeEdge::Bottom), Some(XdgResizeEdge::Bottom));
        assert_eq!(xdg_resize_edge(ResizeEdge::None), Some(XdgResizeEdge::None));
    }
}
