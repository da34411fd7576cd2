//! Color themes for docqa.
//!
//! Two built-ins: `dark` (ANSI 16 colors, works everywhere) and
//! `catppuccin-mocha` (RGB, needs a truecolor terminal).

use ratatui::style::Color;

/// Every color the UI draws with.
#[derive(Debug, Clone)]
pub struct Theme {
    // Panel borders
    pub border_active: Color,
    pub border_inactive: Color,

    // Chat bubbles
    pub chat_user: Color,
    pub chat_ai: Color,
    pub chat_error: Color,
    /// "Thinking..." placeholder.
    pub chat_placeholder: Color,
    /// "Based on N relevant sections" annotation.
    pub chat_annotation: Color,

    // Summary markdown
    pub md_heading: Color,
    pub md_code: Color,
    pub md_quote: Color,
    pub md_bullet: Color,
    pub metadata_label: Color,

    // Overlays
    pub modal_border: Color,
    pub selection: Color,
    /// Backend-unavailable banner.
    pub banner_bg: Color,
    pub banner_fg: Color,

    // Status bar
    pub status_bar_bg: Color,
    pub status_bar_fg: Color,
    pub status_mode_normal: Color,
    pub status_mode_insert: Color,
    pub notice_error: Color,
    pub spinner: Color,

    pub background: Color,
}

impl Theme {
    /// ANSI 16-color theme. The default when no truecolor support is known.
    pub fn dark() -> Self {
        Self {
            border_active: Color::Cyan,
            border_inactive: Color::DarkGray,

            chat_user: Color::Cyan,
            chat_ai: Color::Reset,
            chat_error: Color::Red,
            chat_placeholder: Color::DarkGray,
            chat_annotation: Color::DarkGray,

            md_heading: Color::Yellow,
            md_code: Color::Green,
            md_quote: Color::DarkGray,
            md_bullet: Color::Cyan,
            metadata_label: Color::Blue,

            modal_border: Color::Red,
            selection: Color::Cyan,
            banner_bg: Color::Red,
            banner_fg: Color::White,

            status_bar_bg: Color::DarkGray,
            status_bar_fg: Color::White,
            status_mode_normal: Color::Cyan,
            status_mode_insert: Color::Green,
            notice_error: Color::LightRed,
            spinner: Color::Yellow,

            background: Color::Reset,
        }
    }

    /// Catppuccin Mocha in RGB.
    ///
    /// Palette source: <https://github.com/catppuccin/catppuccin> Mocha variant.
    pub fn catppuccin_mocha() -> Self {
        let green = Color::Rgb(166, 227, 161);    // #a6e3a1
        let red = Color::Rgb(243, 139, 168);      // #f38ba8
        let yellow = Color::Rgb(249, 226, 175);   // #f9e2af
        let blue = Color::Rgb(137, 180, 250);     // #89b4fa
        let teal = Color::Rgb(148, 226, 213);     // #94e2d5
        let lavender = Color::Rgb(180, 190, 254); // #b4befe
        let overlay1 = Color::Rgb(127, 132, 156); // #7f849c
        let surface1 = Color::Rgb(69, 71, 90);    // #45475a
        let base = Color::Rgb(30, 30, 46);        // #1e1e2e
        let text = Color::Rgb(205, 214, 244);     // #cdd6f4
        let peach = Color::Rgb(250, 179, 135);    // #fab387
        let mauve = Color::Rgb(203, 166, 247);    // #cba6f7

        Self {
            border_active: lavender,
            border_inactive: overlay1,

            chat_user: blue,
            chat_ai: text,
            chat_error: red,
            chat_placeholder: overlay1,
            chat_annotation: overlay1,

            md_heading: mauve,
            md_code: green,
            md_quote: overlay1,
            md_bullet: teal,
            metadata_label: peach,

            modal_border: red,
            selection: lavender,
            banner_bg: red,
            banner_fg: base,

            status_bar_bg: surface1,
            status_bar_fg: text,
            status_mode_normal: lavender,
            status_mode_insert: green,
            notice_error: red,
            spinner: yellow,

            background: base,
        }
    }

    /// Resolves a config name. Unknown names fall back to `dark` so a typo
    /// never prevents startup.
    pub fn from_name(name: &str) -> Self {
        match name {
            "catppuccin-mocha" | "catppuccin_mocha" => Self::catppuccin_mocha(),
            "dark" => Self::dark(),
            other => {
                tracing::warn!(theme = other, "unknown theme, falling back to 'dark'");
                Self::dark()
            }
        }
    }
}
