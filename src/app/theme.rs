use ratatui::prelude::Color;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    pub(crate) text_fg: Color,
    pub(crate) status_fg: Color,
    pub(crate) status_bg: Color,
    pub(crate) help_fg: Color,
    pub(crate) selection_fg: Color,
    pub(crate) selection_bg: Color,
    pub(crate) indicator_fg: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::nemo()
    }
}

impl Theme {
    pub(crate) fn nemo() -> Self {
        Self {
            text_fg: Color::Cyan,
            status_fg: Color::Black,
            status_bg: Color::Magenta,
            help_fg: Color::Magenta,
            selection_fg: Color::Black,
            selection_bg: Color::White,
            indicator_fg: Color::Magenta,
        }
    }

    pub(crate) fn light() -> Self {
        Self {
            text_fg: Color::Black,
            status_fg: Color::Black,
            status_bg: Color::White,
            help_fg: Color::Blue,
            selection_fg: Color::Black,
            selection_bg: Color::Cyan,
            indicator_fg: Color::DarkGray,
        }
    }

    pub(crate) fn dark() -> Self {
        Self {
            text_fg: Color::Gray,
            status_fg: Color::White,
            status_bg: Color::Rgb(32, 32, 32),
            help_fg: Color::Rgb(102, 153, 204),
            selection_fg: Color::Black,
            selection_bg: Color::Rgb(102, 153, 204),
            indicator_fg: Color::Rgb(255, 165, 0),
        }
    }

    pub(crate) fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "nemo" | "default" => Some(Self::nemo()),
            "light" => Some(Self::light()),
            "dark" => Some(Self::dark()),
            _ => None,
        }
    }
}
