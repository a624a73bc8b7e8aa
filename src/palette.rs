// Copyright (c) 2026 rezky_nightky

use crossterm::style::Color;

use crate::config::NamedColor;
use crate::runtime::ColorMode;

/// Foreground colors resolved once at startup and handed to every render
/// call. `None` means "terminal default", used in monochrome mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Palette {
    pub rain: Option<Color>,
    pub lightning: Option<Color>,
}

impl Default for Palette {
    fn default() -> Self {
        build_palette(NamedColor::Cyan, NamedColor::Yellow, ColorMode::Color16)
    }
}

pub fn to_color(name: NamedColor) -> Color {
    match name {
        NamedColor::Black => Color::Black,
        NamedColor::Red => Color::DarkRed,
        NamedColor::Green => Color::DarkGreen,
        NamedColor::Yellow => Color::DarkYellow,
        NamedColor::Blue => Color::DarkBlue,
        NamedColor::Magenta => Color::DarkMagenta,
        NamedColor::Cyan => Color::DarkCyan,
        NamedColor::White => Color::Grey,
    }
}

pub fn build_palette(rain: NamedColor, lightning: NamedColor, mode: ColorMode) -> Palette {
    match mode {
        ColorMode::Mono => Palette {
            rain: None,
            lightning: None,
        },
        ColorMode::Color16 => Palette {
            rain: Some(to_color(rain)),
            lightning: Some(to_color(lightning)),
        },
    }
}
