use crate::highlight::TokenKind;
use ratatui::style::{Color, Modifier, Style};

// VS Code "Dark+" palette.
const EDITOR_BG: Color = Color::Rgb(30, 30, 30);
const RAISED_BG: Color = Color::Rgb(45, 45, 45);
const ACCENT_BG: Color = Color::Rgb(37, 37, 38);
const MUTED_BG: Color = Color::Rgb(58, 61, 65);
const ADDED_BG: Color = Color::Rgb(18, 48, 30);
const REMOVED_BG: Color = Color::Rgb(58, 22, 22);
const FOREGROUND: Color = Color::Rgb(212, 212, 212);
const DIM_FG: Color = Color::Rgb(133, 133, 133);
const KEYWORD: Color = Color::Rgb(197, 134, 192);
const STRING: Color = Color::Rgb(206, 145, 120);
const FUNCTION: Color = Color::Rgb(220, 220, 170);
const COMMENT: Color = Color::Rgb(106, 153, 85);
const NUMBER: Color = Color::Rgb(181, 206, 168);
const MEMBER: Color = Color::Rgb(156, 220, 254);
const ADDED_FG: Color = Color::Rgb(74, 222, 128);
const REMOVED_FG: Color = Color::Rgb(248, 113, 113);
const FOCUS: Color = Color::Rgb(0, 122, 204);

/// Styles for every surface. With colors off only modifiers survive, so the
/// layout stays readable on monochrome terminals and in plain dumps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    colors: bool,
}

impl Theme {
    pub fn new(colors: bool) -> Self {
        Self { colors }
    }

    pub fn colors_enabled(&self) -> bool {
        self.colors
    }

    fn paint(&self, fg: Option<Color>, bg: Option<Color>) -> Style {
        if !self.colors {
            return Style::default();
        }
        let mut style = Style::default();
        if let Some(fg) = fg {
            style = style.fg(fg);
        }
        if let Some(bg) = bg {
            style = style.bg(bg);
        }
        style
    }

    pub fn base(&self) -> Style {
        self.paint(Some(FOREGROUND), Some(EDITOR_BG))
    }

    pub fn raised(&self) -> Style {
        self.paint(Some(FOREGROUND), Some(RAISED_BG))
    }

    pub fn chrome(&self) -> Style {
        self.paint(Some(DIM_FG), Some(ACCENT_BG))
    }

    pub fn dim(&self) -> Style {
        self.paint(Some(DIM_FG), None).add_modifier(Modifier::DIM)
    }

    pub fn title(&self) -> Style {
        self.paint(Some(FOREGROUND), None)
            .add_modifier(Modifier::BOLD)
    }

    pub fn command(&self) -> Style {
        self.paint(Some(KEYWORD), None)
    }

    pub fn token(&self, kind: Option<TokenKind>) -> Style {
        let fg = match kind {
            None => return Style::default(),
            Some(TokenKind::Keyword) => KEYWORD,
            Some(TokenKind::String) => STRING,
            Some(TokenKind::Function) => FUNCTION,
            Some(TokenKind::Comment) => COMMENT,
            Some(TokenKind::Number) => NUMBER,
            Some(TokenKind::Member) => MEMBER,
        };
        let style = self.paint(Some(fg), None);
        if matches!(kind, Some(TokenKind::Comment)) {
            style.add_modifier(Modifier::ITALIC)
        } else {
            style
        }
    }

    pub fn gutter(&self) -> Style {
        self.paint(Some(COMMENT), None)
    }

    pub fn emphasized_row(&self) -> Style {
        self.paint(None, Some(MUTED_BG))
    }

    pub fn added(&self) -> Style {
        self.paint(Some(ADDED_FG), Some(ADDED_BG))
    }

    pub fn removed(&self) -> Style {
        self.paint(Some(REMOVED_FG), Some(REMOVED_BG))
    }

    pub fn added_badge(&self) -> Style {
        self.paint(Some(ADDED_FG), None)
    }

    pub fn removed_badge(&self) -> Style {
        self.paint(Some(REMOVED_FG), None)
    }

    pub fn focused(&self) -> Style {
        if self.colors {
            Style::default().fg(FOCUS).add_modifier(Modifier::BOLD)
        } else {
            Style::default().add_modifier(Modifier::REVERSED)
        }
    }

    pub fn window_dots(&self) -> [Style; 3] {
        [
            self.paint(Some(Color::Rgb(239, 68, 68)), None),
            self.paint(Some(Color::Rgb(234, 179, 8)), None),
            self.paint(Some(Color::Rgb(34, 197, 94)), None),
        ]
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::new(true)
    }
}
