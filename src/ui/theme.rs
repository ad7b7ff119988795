use ratatui::style::Color;
use serde::{Deserialize, Serialize};

/// Theme color palette defining all colors used in the application.
///
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,
    // Primary colors
    pub primary: ColorSpec,
    pub secondary: ColorSpec,
    pub accent: ColorSpec,

    // Text colors
    pub text: ColorSpec,
    pub text_secondary: ColorSpec,
    pub text_muted: ColorSpec,

    // Background colors
    pub background: ColorSpec,
    pub surface: ColorSpec,

    // Status colors
    pub success: ColorSpec,
    pub warning: ColorSpec,
    pub error: ColorSpec,
    pub info: ColorSpec,

    // UI element colors
    pub border_active: ColorSpec,
    pub border_normal: ColorSpec,
    pub highlight_bg: ColorSpec,
    pub highlight_fg: ColorSpec,

    // Footer mode colors
    pub footer_search: ColorSpec,
    pub footer_debug: ColorSpec,
    pub footer_normal: ColorSpec,
}

/// Color specification that can be serialized/deserialized.
///
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ColorSpec {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl ColorSpec {
    pub fn to_color(&self) -> Color {
        Color::Rgb(self.r, self.g, self.b)
    }
}

impl Theme {
    /// Get the default theme (Tokyo Night).
    ///
    pub fn default() -> Self {
        Self::tokyo_night()
    }

    /// Tokyo Night theme.
    ///
    pub fn tokyo_night() -> Self {
        Theme {
            name: "tokyo-night".to_string(),
            primary: ColorSpec {
                r: 125,
                g: 207,
                b: 255,
            }, // Blue
            secondary: ColorSpec {
                r: 187,
                g: 154,
                b: 247,
            }, // Purple
            accent: ColorSpec {
                r: 255,
                g: 159,
                b: 196,
            }, // Magenta
            text: ColorSpec {
                r: 169,
                g: 177,
                b: 214,
            }, // Foreground
            text_secondary: ColorSpec {
                r: 192,
                g: 202,
                b: 245,
            }, // Foreground (brighter)
            text_muted: ColorSpec {
                r: 117,
                g: 121,
                b: 148,
            }, // Comment
            background: ColorSpec {
                r: 26,
                g: 27,
                b: 38,
            }, // Background
            surface: ColorSpec {
                r: 36,
                g: 40,
                b: 59,
            }, // Selection
            success: ColorSpec {
                r: 158,
                g: 206,
                b: 106,
            }, // Green
            warning: ColorSpec {
                r: 255,
                g: 202,
                b: 40,
            }, // Yellow
            error: ColorSpec {
                r: 247,
                g: 118,
                b: 142,
            }, // Red
            info: ColorSpec {
                r: 125,
                g: 207,
                b: 255,
            }, // Blue
            border_active: ColorSpec {
                r: 125,
                g: 207,
                b: 255,
            }, // Blue
            border_normal: ColorSpec {
                r: 117,
                g: 121,
                b: 148,
            }, // Comment
            highlight_bg: ColorSpec {
                r: 125,
                g: 207,
                b: 255,
            }, // Blue
            highlight_fg: ColorSpec {
                r: 26,
                g: 27,
                b: 38,
            }, // Background
            footer_search: ColorSpec {
                r: 125,
                g: 207,
                b: 255,
            }, // Blue
            footer_debug: ColorSpec {
                r: 158,
                g: 206,
                b: 106,
            }, // Green
            footer_normal: ColorSpec {
                r: 117,
                g: 121,
                b: 148,
            }, // Comment
        }
    }

    /// Tokyo Night Storm theme.
    ///
    pub fn tokyo_night_storm() -> Self {
        Theme {
            name: "tokyo-night-storm".to_string(),
            background: ColorSpec {
                r: 36,
                g: 40,
                b: 59,
            }, // Background
            surface: ColorSpec {
                r: 48,
                g: 52,
                b: 70,
            }, // Selection
            highlight_fg: ColorSpec {
                r: 36,
                g: 40,
                b: 59,
            }, // Background
            ..Self::tokyo_night()
        }
    }

    /// Rose Pine theme.
    ///
    pub fn rose_pine() -> Self {
        Theme {
            name: "rose-pine".to_string(),
            primary: ColorSpec {
                r: 196,
                g: 167,
                b: 231,
            }, // Iris
            secondary: ColorSpec {
                r: 49,
                g: 116,
                b: 143,
            }, // Pine
            accent: ColorSpec {
                r: 235,
                g: 111,
                b: 146,
            }, // Love
            text: ColorSpec {
                r: 224,
                g: 222,
                b: 244,
            }, // Text
            text_secondary: ColorSpec {
                r: 144,
                g: 140,
                b: 170,
            }, // Subtext
            text_muted: ColorSpec {
                r: 110,
                g: 106,
                b: 134,
            }, // Muted
            background: ColorSpec {
                r: 25,
                g: 23,
                b: 36,
            }, // Base
            surface: ColorSpec {
                r: 31,
                g: 29,
                b: 43,
            }, // Surface
            success: ColorSpec {
                r: 156,
                g: 207,
                b: 216,
            }, // Foam
            warning: ColorSpec {
                r: 246,
                g: 193,
                b: 119,
            }, // Gold
            error: ColorSpec {
                r: 235,
                g: 111,
                b: 146,
            }, // Love
            info: ColorSpec {
                r: 49,
                g: 116,
                b: 143,
            }, // Pine
            border_active: ColorSpec {
                r: 196,
                g: 167,
                b: 231,
            }, // Iris
            border_normal: ColorSpec {
                r: 144,
                g: 140,
                b: 170,
            }, // Subtext
            highlight_bg: ColorSpec {
                r: 156,
                g: 207,
                b: 216,
            }, // Foam
            highlight_fg: ColorSpec {
                r: 25,
                g: 23,
                b: 36,
            }, // Base
            footer_search: ColorSpec {
                r: 156,
                g: 207,
                b: 216,
            }, // Foam
            footer_debug: ColorSpec {
                r: 49,
                g: 116,
                b: 143,
            }, // Pine
            footer_normal: ColorSpec {
                r: 144,
                g: 140,
                b: 170,
            }, // Subtext
        }
    }

    /// Dracula theme.
    ///
    pub fn dracula() -> Self {
        Theme {
            name: "dracula".to_string(),
            primary: ColorSpec {
                r: 189,
                g: 147,
                b: 249,
            }, // Purple
            secondary: ColorSpec {
                r: 139,
                g: 233,
                b: 253,
            }, // Cyan
            accent: ColorSpec {
                r: 255,
                g: 121,
                b: 198,
            }, // Pink
            text: ColorSpec {
                r: 248,
                g: 248,
                b: 242,
            }, // Foreground
            text_secondary: ColorSpec {
                r: 189,
                g: 147,
                b: 249,
            }, // Purple
            text_muted: ColorSpec {
                r: 98,
                g: 114,
                b: 164,
            }, // Comment
            background: ColorSpec {
                r: 40,
                g: 42,
                b: 54,
            }, // Background
            surface: ColorSpec {
                r: 68,
                g: 71,
                b: 90,
            }, // Selection
            success: ColorSpec {
                r: 80,
                g: 250,
                b: 123,
            }, // Green
            warning: ColorSpec {
                r: 255,
                g: 184,
                b: 108,
            }, // Orange
            error: ColorSpec {
                r: 255,
                g: 85,
                b: 85,
            }, // Red
            info: ColorSpec {
                r: 139,
                g: 233,
                b: 253,
            }, // Cyan
            border_active: ColorSpec {
                r: 189,
                g: 147,
                b: 249,
            }, // Purple
            border_normal: ColorSpec {
                r: 98,
                g: 114,
                b: 164,
            }, // Comment
            highlight_bg: ColorSpec {
                r: 139,
                g: 233,
                b: 253,
            }, // Cyan
            highlight_fg: ColorSpec {
                r: 40,
                g: 42,
                b: 54,
            }, // Background
            footer_search: ColorSpec {
                r: 139,
                g: 233,
                b: 253,
            }, // Cyan
            footer_debug: ColorSpec {
                r: 80,
                g: 250,
                b: 123,
            }, // Green
            footer_normal: ColorSpec {
                r: 98,
                g: 114,
                b: 164,
            }, // Comment
        }
    }

    /// Get a theme by name.
    ///
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "tokyo-night" => Some(Self::tokyo_night()),
            "tokyo-night-storm" => Some(Self::tokyo_night_storm()),
            "rose-pine" => Some(Self::rose_pine()),
            "dracula" => Some(Self::dracula()),
            _ => None,
        }
    }

    /// Get list of all available theme names.
    ///
    pub fn available_themes() -> Vec<String> {
        vec![
            "tokyo-night".to_string(),
            "tokyo-night-storm".to_string(),
            "rose-pine".to_string(),
            "dracula".to_string(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_listed_theme_resolves() {
        for name in Theme::available_themes() {
            let theme = Theme::from_name(&name).unwrap();
            assert_eq!(theme.name, name);
        }
    }

    #[test]
    fn unknown_theme_name_is_none() {
        assert!(Theme::from_name("solarized").is_none());
    }
}
