//! Bookkeeping of the decoration negotiation
//!
//! The compositor proposes a size (or none) with every configure, the client answers by
//! resizing its back buffer to the size it settles on. [`FrameState`] holds the outcome of
//! that exchange, independently of the protocol objects carrying it.

use std::num::NonZeroU32;

use smithay_client_toolkit::reexports::csd_frame::WindowState;

const ONE: NonZeroU32 = match NonZeroU32::new(1) {
    Some(one) => one,
    None => unreachable!(),
};

/// Content size of the window in surface-local coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    /// width
    pub w: NonZeroU32,
    /// height
    pub h: NonZeroU32,
}

impl Size {
    /// Creates a new size
    pub fn new(w: NonZeroU32, h: NonZeroU32) -> Self {
        Size { w, h }
    }

    /// Size from a configure suggestion, present only when both dimensions are given
    pub fn from_suggestion(suggested: (Option<NonZeroU32>, Option<NonZeroU32>)) -> Option<Self> {
        match suggested {
            (Some(w), Some(h)) => Some(Size { w, h }),
            _ => None,
        }
    }

    /// Content size left once the decorations took their share of a suggestion.
    ///
    /// A dimension eaten entirely by the borders is clamped to one pixel.
    pub fn from_content_suggestion(content: (Option<NonZeroU32>, Option<NonZeroU32>)) -> Self {
        Size {
            w: content.0.unwrap_or(ONE),
            h: content.1.unwrap_or(ONE),
        }
    }

    /// Width and height as the `i32` the native window APIs take.
    ///
    /// Values beyond `i32::MAX` saturate.
    pub fn to_i32(self) -> (i32, i32) {
        (saturating_i32(self.w.get()), saturating_i32(self.h.get()))
    }
}

/// `u32` to `i32`, saturating at `i32::MAX`
pub fn saturating_i32(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

/// Window placement reported by a configure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Freely sized by the user
    Floating,
    /// Maximized, fullscreen or tiled on any edge: sized by the compositor
    Constrained,
}

impl Placement {
    /// Placement of a toplevel in `state`.
    ///
    /// A single tiled edge is enough to leave the floating placement, half screen snaps
    /// only tile three of them.
    pub fn from_state(state: WindowState) -> Placement {
        if state.intersects(WindowState::TILED | WindowState::MAXIMIZED | WindowState::FULLSCREEN) {
            Placement::Constrained
        } else {
            Placement::Floating
        }
    }
}

/// State of the negotiated toplevel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameState {
    content: Size,
    floating: Size,
    open: bool,
    configured: bool,
}

impl FrameState {
    /// State before the first configure: both sizes are the default size
    pub fn new(default: Size) -> Self {
        FrameState {
            content: default,
            floating: default,
            open: true,
            configured: false,
        }
    }

    /// Applies a configure and returns the content size to commit.
    ///
    /// Without a suggestion the last floating size is reused. Sizes chosen while
    /// floating become the new floating size, so leaving a maximized or tiled
    /// state restores them.
    pub fn configure(&mut self, suggested: Option<Size>, placement: Placement) -> Size {
        let size = suggested.unwrap_or(self.floating);
        self.content = size;
        if placement == Placement::Floating {
            self.floating = size;
        }
        self.configured = true;
        size
    }

    /// The compositor asked to close the window
    pub fn close(&mut self) {
        self.open = false;
    }

    /// Last committed content size
    pub fn content_size(&self) -> Size {
        self.content
    }

    /// Size restored when a configure carries no suggestion
    pub fn floating_size(&self) -> Size {
        self.floating
    }

    /// Whether the window is still open
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Whether at least one configure was handled
    pub fn is_configured(&self) -> bool {
        self.configured
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn size(w: u32, h: u32) -> Size {
        Size::new(NonZeroU32::new(w).unwrap(), NonZeroU32::new(h).unwrap())
    }

    #[test]
    fn starts_unconfigured_and_open() {
        let state = FrameState::new(size(600, 400));
        assert!(state.is_open());
        assert!(!state.is_configured());
        assert_eq!(state.content_size(), size(600, 400));
        assert_eq!(state.floating_size(), size(600, 400));
    }

    #[test]
    fn missing_suggestion_uses_floating_size() {
        let mut state = FrameState::new(size(600, 400));
        assert_eq!(state.configure(None, Placement::Floating), size(600, 400));
        assert!(state.is_configured());
    }

    #[test]
    fn partial_suggestion_is_no_suggestion() {
        assert_eq!(Size::from_suggestion((NonZeroU32::new(10), None)), None);
        assert_eq!(Size::from_suggestion((None, NonZeroU32::new(10))), None);
        assert_eq!(
            Size::from_suggestion((NonZeroU32::new(10), NonZeroU32::new(20))),
            Some(size(10, 20))
        );
    }

    #[test]
    fn floating_resize_is_remembered() {
        let mut state = FrameState::new(size(600, 400));
        state.configure(Some(size(800, 500)), Placement::Floating);
        assert_eq!(state.floating_size(), size(800, 500));
        assert_eq!(state.configure(None, Placement::Floating), size(800, 500));
    }

    #[test]
    fn constrained_size_is_not_remembered() {
        let mut state = FrameState::new(size(600, 400));
        assert_eq!(
            state.configure(Some(size(1920, 1080)), Placement::Constrained),
            size(1920, 1080)
        );
        assert_eq!(state.content_size(), size(1920, 1080));
        assert_eq!(state.floating_size(), size(600, 400));

        // unmaximize without a suggestion restores the floating size
        assert_eq!(state.configure(None, Placement::Floating), size(600, 400));
    }

    #[test]
    fn close_keeps_configured() {
        let mut state = FrameState::new(size(600, 400));
        state.configure(None, Placement::Floating);
        state.close();
        assert!(!state.is_open());
        assert!(state.is_configured());
    }

    #[test]
    fn any_tiled_edge_constrains() {
        for edge in [
            WindowState::TILED_LEFT,
            WindowState::TILED_RIGHT,
            WindowState::TILED_TOP,
            WindowState::TILED_BOTTOM,
        ] {
            assert_eq!(Placement::from_state(edge), Placement::Constrained, "{edge:?}");
        }
        let left_half = WindowState::TILED_LEFT | WindowState::TILED_TOP | WindowState::TILED_BOTTOM;
        assert_eq!(Placement::from_state(left_half), Placement::Constrained);
        assert_eq!(Placement::from_state(WindowState::TILED), Placement::Constrained);
    }

    #[test]
    fn maximized_and_fullscreen_constrain() {
        assert_eq!(Placement::from_state(WindowState::MAXIMIZED), Placement::Constrained);
        assert_eq!(Placement::from_state(WindowState::FULLSCREEN), Placement::Constrained);
        assert_eq!(
            Placement::from_state(WindowState::MAXIMIZED | WindowState::ACTIVATED),
            Placement::Constrained
        );
    }

    #[test]
    fn plain_states_float() {
        assert_eq!(Placement::from_state(WindowState::empty()), Placement::Floating);
        assert_eq!(
            Placement::from_state(WindowState::ACTIVATED | WindowState::RESIZING),
            Placement::Floating
        );
    }

    #[test]
    fn untiling_restores_floating_size() {
        let mut state = FrameState::new(size(800, 600));
        let snapped = WindowState::TILED_LEFT | WindowState::TILED_TOP | WindowState::TILED_BOTTOM;
        state.configure(Some(size(960, 1080)), Placement::from_state(snapped));
        assert_eq!(state.floating_size(), size(800, 600));
        assert_eq!(
            state.configure(None, Placement::from_state(WindowState::ACTIVATED)),
            size(800, 600)
        );
    }

    #[test]
    fn content_suggestion_clamps_to_one_pixel() {
        assert_eq!(Size::from_content_suggestion((NonZeroU32::new(592), None)), size(592, 1));
        assert_eq!(Size::from_content_suggestion((None, None)), size(1, 1));
    }

    #[test]
    fn saturates_large_sizes() {
        assert_eq!(size(u32::MAX, 1).to_i32(), (i32::MAX, 1));
    }
}
