use fecviz_core::ColorState;
use ratatui::style::Color;

pub struct Theme {
    pub bg: Color,
    pub fg: Color,
    pub highlight: Color,
    pub muted: Color,
    pub primary: Color,
    pub secondary: Color,
    pub error: Color,
    pub success: Color,
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            bg: Color::Black,
            fg: Color::White,
            highlight: Color::Yellow,
            muted: Color::DarkGray,
            primary: Color::Cyan,
            secondary: Color::Magenta,
            error: Color::Red,
            success: Color::LightGreen,
        }
    }
    pub fn light() -> Self {
        Self {
            bg: Color::White,
            fg: Color::Black,
            highlight: Color::Blue,
            muted: Color::Gray,
            primary: Color::Blue,
            secondary: Color::Magenta,
            error: Color::Red,
            success: Color::Green,
        }
    }
    pub fn nord() -> Self {
        Self {
            bg: Color::Rgb(46, 52, 64),
            fg: Color::Rgb(216, 222, 233),
            highlight: Color::Rgb(136, 192, 208),
            muted: Color::Rgb(76, 86, 106),
            primary: Color::Rgb(129, 161, 193),
            secondary: Color::Rgb(180, 142, 173),
            error: Color::Rgb(191, 97, 106),
            success: Color::Rgb(163, 190, 140),
        }
    }
    pub fn catppuccin() -> Self {
        Self {
            bg: Color::Rgb(30, 30, 46),
            fg: Color::Rgb(205, 214, 244),
            highlight: Color::Rgb(137, 180, 250),
            muted: Color::Rgb(108, 112, 134),
            primary: Color::Rgb(137, 220, 235),
            secondary: Color::Rgb(203, 166, 247),
            error: Color::Rgb(243, 139, 168),
            success: Color::Rgb(166, 227, 161),
        }
    }
    pub fn colorblind() -> Self {
        Self {
            bg: Color::Black,
            fg: Color::White,
            highlight: Color::Yellow,
            muted: Color::DarkGray,
            primary: Color::Rgb(0x00, 0x80, 0xFF),
            secondary: Color::Yellow,
            error: Color::Rgb(0xFF, 0x8C, 0x00), // orange instead of red
            success: Color::Rgb(0x00, 0x80, 0xFF), // blue instead of green
        }
    }
    pub fn from_name(name: &str) -> Self {
        match name {
            "light" => Self::light(),
            "nord" => Self::nord(),
            "catppuccin" => Self::catppuccin(),
            "colorblind" => Self::colorblind(),
            _ => Self::dark(),
        }
    }
    /// Badge color for the view's color state in the top bar.
    pub fn badge(&self, state: ColorState) -> Color {
        match state {
            ColorState::Default => self.muted,
            ColorState::Primary => self.primary,
            ColorState::Secondary => self.secondary,
        }
    }
}

/// `#rrggbb` to a terminal color; anything else falls back to `fallback`.
pub fn parse_hex(s: &str, fallback: Color) -> Color {
    let Some(hex) = s.strip_prefix('#').filter(|h| h.len() == 6 && h.is_ascii()) else {
        return match s {
            "white" => Color::White,
            "grey" | "gray" => Color::Gray,
            _ => fallback,
        };
    };
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    match (channel(0), channel(2), channel(4)) {
        (Some(r), Some(g), Some(b)) => Color::Rgb(r, g, b),
        _ => fallback,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test] fn hex_bar_fill() { assert_eq!(parse_hex("#ff9933", Color::Reset), Color::Rgb(0xff, 0x99, 0x33)); }
    #[test] fn named_colors() { assert_eq!(parse_hex("grey", Color::Reset), Color::Gray); }
    #[test] fn bad_hex_falls_back() { assert_eq!(parse_hex("#zz9933", Color::Reset), Color::Reset); }
    #[test] fn unknown_theme_is_dark() { assert_eq!(Theme::from_name("nope").bg, Color::Black); }
}
