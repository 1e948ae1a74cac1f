use crate::model::theme::Appearance;

/// The platform's current light/dark preference, read on demand
pub trait SystemAppearance {
    fn current(&self) -> Appearance;
}

/// Reads the `COLORFGBG` convention (`"fg;bg"`, set by rxvt, Konsole,
/// iTerm2 and others) and falls back to a configured appearance.
#[derive(Debug, Clone, Copy)]
pub struct TerminalAppearance {
    fallback: Appearance,
}

impl TerminalAppearance {
    pub fn new(fallback: Appearance) -> Self {
        TerminalAppearance { fallback }
    }
}

impl SystemAppearance for TerminalAppearance {
    fn current(&self) -> Appearance {
        std::env::var("COLORFGBG")
            .ok()
            .and_then(|value| parse_colorfgbg(&value))
            .unwrap_or(self.fallback)
    }
}

/// A fixed appearance, for tests and for forcing one mode
#[derive(Debug, Clone, Copy)]
pub struct FixedAppearance(pub Appearance);

impl SystemAppearance for FixedAppearance {
    fn current(&self) -> Appearance {
        self.0
    }
}

/// Interpret the background field of a `COLORFGBG` value. The background is
/// the last `;`-separated field; ANSI 7 and 15 (white) read as light, every
/// other ANSI color as dark.
fn parse_colorfgbg(value: &str) -> Option<Appearance> {
    let bg: u8 = value.rsplit(';').next()?.trim().parse().ok()?;
    match bg {
        7 | 15 => Some(Appearance::Light),
        0..=6 | 8..=14 => Some(Appearance::Dark),
        _ => None,
    }
}
