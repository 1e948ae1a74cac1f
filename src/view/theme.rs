use log::{info, warn};

use crate::io::appearance::SystemAppearance;
use crate::io::storage::{KeyValueStore, StorageError, THEME_KEY};
use crate::model::theme::{Appearance, ThemePreference};

use super::target::RenderTarget;

/// Owns the persisted theme preference. Read once at construction, written
/// on every change.
pub struct ThemeController<S, A> {
    storage: S,
    system: A,
    current: ThemePreference,
}

impl<S: KeyValueStore, A: SystemAppearance> ThemeController<S, A> {
    /// Read the stored preference; missing or unrecognised means `auto`.
    pub fn load(storage: S, system: A) -> Self {
        let current = match storage.get(THEME_KEY) {
            Ok(Some(raw)) => ThemePreference::parse_preference(&raw).unwrap_or_else(|| {
                warn!(
                    "event=theme_load module=theme status=recovered value={:?}",
                    raw
                );
                ThemePreference::Auto
            }),
            Ok(None) => ThemePreference::Auto,
            Err(e) => {
                warn!("event=theme_load module=theme status=error error={}", e);
                ThemePreference::Auto
            }
        };
        ThemeController {
            storage,
            system,
            current,
        }
    }

    pub fn get_theme(&self) -> ThemePreference {
        self.current
    }

    /// Store a preference. The in-memory value changes even if the write
    /// fails.
    pub fn set_theme(&mut self, preference: ThemePreference) -> Result<(), StorageError> {
        self.current = preference;
        self.storage.set(THEME_KEY, preference.as_str())?;
        info!("event=theme_set module=theme value={}", preference);
        Ok(())
    }

    /// Hand the preference's display condition to `target`
    pub fn apply_theme<T: RenderTarget>(&self, target: &mut T) {
        target.set_dark_styles(self.current.dark_styles());
    }

    /// `light` and `dark` swap. `auto` becomes the explicit opposite of
    /// what the system shows now, and never comes back.
    pub fn cycle_theme(&mut self) -> Result<ThemePreference, StorageError> {
        let next = match self.current {
            ThemePreference::Auto => self.system.current().opposite().as_preference(),
            ThemePreference::Light => ThemePreference::Dark,
            ThemePreference::Dark => ThemePreference::Light,
        };
        self.set_theme(next)?;
        Ok(next)
    }

    pub fn system_appearance(&self) -> Appearance {
        self.system.current()
    }

    /// The appearance actually shown
    pub fn effective_appearance(&self) -> Appearance {
        self.current.dark_styles().resolve(self.system.current())
    }
}
