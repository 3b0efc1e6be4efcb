//! Command line configuration

use std::num::NonZeroU32;

use clap::{Parser, ValueEnum};
use smithay_client_toolkit::shell::xdg::window::WindowDecorations;

use crate::frame::Size;

/// Opaque RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    /// red channel
    pub r: u8,
    /// green channel
    pub g: u8,
    /// blue channel
    pub b: u8,
}

impl Color {
    /// Normalized channels with full alpha, as expected by `glClearColor`
    pub fn to_rgba_f32(self) -> [f32; 4] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
            1.0,
        ]
    }
}

/// Parses `RRGGBB`, optionally prefixed with `#` or `0x`.
pub fn parse_color(s: &str) -> Result<Color, String> {
    let hex = s
        .strip_prefix('#')
        .or_else(|| s.strip_prefix("0x"))
        .unwrap_or(s);
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(format!("expected a color as RRGGBB, got `{s}`"));
    }
    let value = u32::from_str_radix(hex, 16).map_err(|err| err.to_string())?;
    let [_, r, g, b] = value.to_be_bytes();
    Ok(Color { r, g, b })
}

/// Decoration mode requested while negotiating the toplevel
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DecorationRequest {
    /// Ask the compositor to draw the decorations
    Server,
    /// Ask to draw the decorations ourselves
    Client,
    /// Let the compositor pick, preferring server side
    ServerDefault,
    /// Let the compositor pick, preferring client side
    ClientDefault,
    /// Never negotiate decorations
    None,
}

impl From<DecorationRequest> for WindowDecorations {
    fn from(request: DecorationRequest) -> Self {
        match request {
            DecorationRequest::Server => WindowDecorations::RequestServer,
            DecorationRequest::Client => WindowDecorations::RequestClient,
            DecorationRequest::ServerDefault => WindowDecorations::ServerDefault,
            DecorationRequest::ClientDefault => WindowDecorations::ClientDefault,
            DecorationRequest::None => WindowDecorations::None,
        }
    }
}

/// Settings of a reproduction run
#[derive(Debug, Clone, Parser)]
#[command(name = "bugrepro", about = "Reproduce decoration/EGL ordering bugs of wayland compositors")]
pub struct Config {
    /// Initial content width, also the floating width until the compositor says otherwise
    #[arg(long, default_value = "600")]
    pub width: NonZeroU32,

    /// Initial content height, also the floating height until the compositor says otherwise
    #[arg(long, default_value = "400")]
    pub height: NonZeroU32,

    /// Application id of the toplevel
    #[arg(long, default_value = "bugrepro")]
    pub app_id: String,

    /// Title of the toplevel
    #[arg(long, default_value = "bugrepro")]
    pub title: String,

    /// Clear color as RRGGBB
    #[arg(long, default_value = "202020", value_parser = parse_color)]
    pub color: Color,

    /// Horizontal hotspot of the cursor image
    #[arg(long, default_value_t = 4)]
    pub cursor_hotspot_x: i32,

    /// Vertical hotspot of the cursor image
    #[arg(long, default_value_t = 4)]
    pub cursor_hotspot_y: i32,

    /// Decoration mode to request
    #[arg(long, value_enum, default_value_t = DecorationRequest::Server)]
    pub decorations: DecorationRequest,

    /// Timeout of a single dispatch in milliseconds, 0 polls without blocking
    #[arg(long, default_value_t = 0)]
    pub dispatch_timeout_ms: u64,

    /// Exit after drawing this many frames
    #[arg(long)]
    pub frames: Option<u64>,
}

impl Config {
    /// Initial (and initial floating) content size
    pub fn default_size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

impl Default for Config {
    fn default() -> Self {
        Config::parse_from(["bugrepro"])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_colors() {
        assert_eq!(parse_color("202020"), Ok(Color { r: 0x20, g: 0x20, b: 0x20 }));
        assert_eq!(parse_color("#ff8000"), Ok(Color { r: 0xff, g: 0x80, b: 0 }));
        assert_eq!(parse_color("0x0000FF"), Ok(Color { r: 0, g: 0, b: 0xff }));
        assert!(parse_color("fff").is_err());
        assert!(parse_color("zz0000").is_err());
        assert!(parse_color("+12345").is_err());
    }

    #[test]
    fn normalizes_channels() {
        let [r, g, b, a] = Color { r: 0x20, g: 0xff, b: 0 }.to_rgba_f32();
        assert!((r - 32.0 / 255.0).abs() < f32::EPSILON);
        assert_eq!(g, 1.0);
        assert_eq!(b, 0.0);
        assert_eq!(a, 1.0);
    }

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.width.get(), 600);
        assert_eq!(config.height.get(), 400);
        assert_eq!(config.app_id, "bugrepro");
        assert_eq!(config.title, "bugrepro");
        assert_eq!(config.color, Color { r: 0x20, g: 0x20, b: 0x20 });
        assert_eq!((config.cursor_hotspot_x, config.cursor_hotspot_y), (4, 4));
        assert_eq!(config.decorations, DecorationRequest::Server);
        assert_eq!(config.dispatch_timeout_ms, 0);
        assert_eq!(config.frames, None);
    }

    #[test]
    fn parses_arguments() {
        let config = Config::try_parse_from([
            "bugrepro",
            "--width",
            "800",
            "--color",
            "#102030",
            "--decorations",
            "client-default",
            "--frames",
            "10",
        ])
        .unwrap();
        assert_eq!(
            config.default_size(),
            Size::new(NonZeroU32::new(800).unwrap(), NonZeroU32::new(400).unwrap())
        );
        assert_eq!(config.color, Color { r: 0x10, g: 0x20, b: 0x30 });
        assert_eq!(config.decorations, DecorationRequest::ClientDefault);
        assert_eq!(config.frames, Some(10));
    }

    #[test]
    fn rejects_zero_size() {
        assert!(Config::try_parse_from(["bugrepro", "--height", "0"]).is_err());
    }
}
