use std::collections::HashMap;

use ratatui::style::Color;

use crate::model::theme::Appearance;
use crate::model::UiConfig;

/// Colors for one appearance
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    pub background: Color,
    /// Input box and list card
    pub surface: Color,
    pub text: Color,
    pub text_bright: Color,
    pub dim: Color,
    /// Active filter, checkbox, cursor marker
    pub accent: Color,
    /// Drop target marker
    pub accent_alt: Color,
    pub danger: Color,
    pub border: Color,
    pub selection_bg: Color,
}

impl Palette {
    pub fn dark() -> Self {
        Palette {
            background: Color::Rgb(0x16, 0x17, 0x22),
            surface: Color::Rgb(0x25, 0x27, 0x3C),
            text: Color::Rgb(0xC8, 0xCB, 0xE7),
            text_bright: Color::Rgb(0xE4, 0xE5, 0xF1),
            dim: Color::Rgb(0x5B, 0x5E, 0x7E),
            accent: Color::Rgb(0x3A, 0x7B, 0xFD),
            accent_alt: Color::Rgb(0xC0, 0x58, 0xF3),
            danger: Color::Rgb(0xE0, 0x5F, 0x5F),
            border: Color::Rgb(0x39, 0x3A, 0x4B),
            selection_bg: Color::Rgb(0x30, 0x33, 0x52),
        }
    }

    pub fn light() -> Self {
        Palette {
            background: Color::Rgb(0xFA, 0xFA, 0xFA),
            surface: Color::Rgb(0xFF, 0xFF, 0xFF),
            text: Color::Rgb(0x49, 0x4C, 0x6B),
            text_bright: Color::Rgb(0x25, 0x27, 0x3C),
            dim: Color::Rgb(0x94, 0x95, 0xA5),
            accent: Color::Rgb(0x3A, 0x7B, 0xFD),
            accent_alt: Color::Rgb(0xC0, 0x58, 0xF3),
            danger: Color::Rgb(0xC0, 0x39, 0x2B),
            border: Color::Rgb(0xE3, 0xE4, 0xF1),
            selection_bg: Color::Rgb(0xE4, 0xE5, 0xF1),
        }
    }

    /// Apply `slot = "#RRGGBB"` overrides; unknown slots and bad colors are
    /// skipped.
    fn with_overrides(mut self, overrides: &HashMap<String, String>) -> Self {
        for (key, value) in overrides {
            if let Some(color) = parse_hex_color(value) {
                match key.as_str() {
                    "background" => self.background = color,
                    "surface" => self.surface = color,
                    "text" => self.text = color,
                    "text_bright" => self.text_bright = color,
                    "dim" => self.dim = color,
                    "accent" => self.accent = color,
                    "accent_alt" => self.accent_alt = color,
                    "danger" => self.danger = color,
                    "border" => self.border = color,
                    "selection_bg" => self.selection_bg = color,
                    _ => {}
                }
            }
        }
        self
    }
}

/// The light and dark palettes, switched by effective appearance
#[derive(Debug, Clone)]
pub struct Palettes {
    pub light: Palette,
    pub dark: Palette,
}

impl Default for Palettes {
    fn default() -> Self {
        Palettes {
            light: Palette::light(),
            dark: Palette::dark(),
        }
    }
}

impl Palettes {
    /// Build both palettes from UI config, falling back to defaults
    pub fn from_config(ui: &UiConfig) -> Self {
        Palettes {
            light: Palette::light().with_overrides(&ui.colors.light),
            dark: Palette::dark().with_overrides(&ui.colors.dark),
        }
    }

    pub fn for_appearance(&self, appearance: Appearance) -> &Palette {
        match appearance {
            Appearance::Light => &self.light,
            Appearance::Dark => &self.dark,
        }
    }
}

/// Parse a hex color string like "#FF4444" into an RGB Color
fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(
            parse_hex_color("#FF4444"),
            Some(Color::Rgb(0xFF, 0x44, 0x44))
        );
        assert_eq!(parse_hex_color("FF4444"), None); // missing #
        assert_eq!(parse_hex_color("#FF44"), None); // too short
        assert_eq!(parse_hex_color("#ZZZZZZ"), None); // invalid hex
    }

    #[test]
    fn overrides_apply_per_appearance() {
        let mut ui = UiConfig::default();
        ui.colors.dark.insert("background".into(), "#000000".into());
        ui.colors.light.insert("accent".into(), "#112233".into());
        ui.colors.light.insert("nonsense".into(), "#112233".into());

        let palettes = Palettes::from_config(&ui);
        assert_eq!(palettes.dark.background, Color::Rgb(0, 0, 0));
        assert_eq!(palettes.light.accent, Color::Rgb(0x11, 0x22, 0x33));
        // untouched slots keep defaults
        assert_eq!(palettes.light.background, Palette::light().background);
        assert_eq!(palettes.dark.accent, Palette::dark().accent);
    }

    #[test]
    fn for_appearance_picks_palette() {
        let palettes = Palettes::default();
        assert_eq!(palettes.for_appearance(Appearance::Dark), &Palette::dark());
        assert_eq!(palettes.for_appearance(Appearance::Light), &Palette::light());
    }
}
