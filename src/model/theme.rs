use std::fmt;

use serde::{Deserialize, Serialize};

/// Persisted color theme choice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreference {
    /// Follow the system appearance
    #[default]
    Auto,
    Light,
    Dark,
}

/// A concrete light or dark appearance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Appearance {
    Light,
    Dark,
}

/// When the dark styles apply. One condition per theme preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DarkStyles {
    /// Dark styles apply when the system reports a dark appearance
    FollowSystem,
    Never,
    Always,
}

impl ThemePreference {
    /// The literal stored under the `color-theme` key
    pub fn as_str(self) -> &'static str {
        match self {
            ThemePreference::Auto => "auto",
            ThemePreference::Light => "light",
            ThemePreference::Dark => "dark",
        }
    }

    pub fn parse_preference(s: &str) -> Option<ThemePreference> {
        match s.trim() {
            "auto" => Some(ThemePreference::Auto),
            "light" => Some(ThemePreference::Light),
            "dark" => Some(ThemePreference::Dark),
            _ => None,
        }
    }

    pub fn dark_styles(self) -> DarkStyles {
        match self {
            ThemePreference::Auto => DarkStyles::FollowSystem,
            ThemePreference::Light => DarkStyles::Never,
            ThemePreference::Dark => DarkStyles::Always,
        }
    }
}

impl fmt::Display for ThemePreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Appearance {
    pub fn opposite(self) -> Appearance {
        match self {
            Appearance::Light => Appearance::Dark,
            Appearance::Dark => Appearance::Light,
        }
    }

    /// The explicit preference that pins this appearance
    pub fn as_preference(self) -> ThemePreference {
        match self {
            Appearance::Light => ThemePreference::Light,
            Appearance::Dark => ThemePreference::Dark,
        }
    }
}

impl DarkStyles {
    /// Resolve the condition against the current system appearance
    pub fn resolve(self, system: Appearance) -> Appearance {
        match self {
            DarkStyles::FollowSystem => system,
            DarkStyles::Never => Appearance::Light,
            DarkStyles::Always => Appearance::Dark,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preference_literals_round_trip() {
        for pref in [
            ThemePreference::Auto,
            ThemePreference::Light,
            ThemePreference::Dark,
        ] {
            assert_eq!(ThemePreference::parse_preference(pref.as_str()), Some(pref));
        }
        assert_eq!(ThemePreference::parse_preference("sepia"), None);
        assert_eq!(ThemePreference::parse_preference(""), None);
    }

    #[test]
    fn each_preference_has_its_own_condition() {
        assert_eq!(ThemePreference::Auto.dark_styles(), DarkStyles::FollowSystem);
        assert_eq!(ThemePreference::Light.dark_styles(), DarkStyles::Never);
        assert_eq!(ThemePreference::Dark.dark_styles(), DarkStyles::Always);
    }

    #[test]
    fn resolve_follows_system_only_for_auto() {
        assert_eq!(
            DarkStyles::FollowSystem.resolve(Appearance::Light),
            Appearance::Light
        );
        assert_eq!(
            DarkStyles::FollowSystem.resolve(Appearance::Dark),
            Appearance::Dark
        );
        assert_eq!(DarkStyles::Never.resolve(Appearance::Dark), Appearance::Light);
        assert_eq!(DarkStyles::Always.resolve(Appearance::Light), Appearance::Dark);
    }
}
