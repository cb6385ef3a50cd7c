use std::fmt::{ Display, Formatter };
use std::str::FromStr;
use serde::{ Deserialize, Serialize };

use crate::constants::DEFAULT_THEME;

/// The user's chosen appearance mode. `System` follows the OS setting.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreference {
    Light,
    Dark,
    System,
}

impl ThemePreference {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
            Self::System => "system",
        }
    }

    /// Target of a toggle: `Dark` goes to `Light`, everything else to `Dark`.
    /// `System` is never produced.
    pub fn toggled(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            _ => Self::Dark,
        }
    }

    pub fn resolve(self, system_dark: bool) -> ResolvedTheme {
        match self {
            Self::Light => ResolvedTheme::Light,
            Self::Dark => ResolvedTheme::Dark,
            Self::System if system_dark => ResolvedTheme::Dark,
            Self::System => ResolvedTheme::Light,
        }
    }
}

impl Default for ThemePreference {
    fn default() -> Self {
        DEFAULT_THEME
    }
}

impl Display for ThemePreference {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemePreference {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            "system" => Ok(Self::System),
            other => Err(format!("unknown theme preference: {}", other)),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResolvedTheme {
    Light,
    Dark,
}

impl ResolvedTheme {
    pub fn is_dark(&self) -> bool {
        matches!(self, Self::Dark)
    }
}

/// Shared theme state. One instance lives in a signal provided at the app root.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct ThemeState {
    pub preference: ThemePreference,
    pub system_dark: bool,
}

impl ThemeState {
    pub fn new(preference: ThemePreference, system_dark: bool) -> Self {
        Self { preference, system_dark }
    }

    pub fn resolved(&self) -> ResolvedTheme {
        self.preference.resolve(self.system_dark)
    }

    pub fn is_dark(&self) -> bool {
        self.resolved().is_dark()
    }

    /// Flips between light and dark and returns the new preference.
    pub fn toggle(&mut self) -> ThemePreference {
        self.preference = self.preference.toggled();
        self.preference
    }

    /// Records a new OS colour scheme. Returns whether the resolved theme changed.
    pub fn set_system_dark(&mut self, dark: bool) -> bool {
        let before = self.resolved();
        self.system_dark = dark;
        self.resolved() != before
    }
}

/// Tracks whether a component instance has completed its first client render.
///
/// Starts `false` and flips to `true` once; there is no way back. Anything that
/// depends on client-only state (stored preference, OS colour scheme) should
/// stay hidden until the flag is set, otherwise the hydrated output would
/// differ from what the server sent.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MountFlag(bool);

impl MountFlag {
    pub fn new() -> Self {
        Self(false)
    }

    pub fn is_mounted(&self) -> bool {
        self.0
    }

    /// Returns `true` only for the call that performed the transition.
    pub fn mark(&mut self) -> bool {
        let first = !self.0;
        self.0 = true;
        first
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preference_string_forms() {
        for pref in [ThemePreference::Light, ThemePreference::Dark, ThemePreference::System] {
            assert_eq!(pref.to_string().parse::<ThemePreference>(), Ok(pref));
        }
        assert!("sepia".parse::<ThemePreference>().is_err());
        assert_eq!(serde_json::to_string(&ThemePreference::Dark).unwrap(), "\"dark\"");
    }

    #[test]
    fn test_default_preference_is_system() {
        assert_eq!(ThemeState::default().preference, ThemePreference::System);
    }

    #[test]
    fn test_toggle_flips_and_never_returns_to_system() {
        let mut state = ThemeState::new(ThemePreference::Dark, false);
        assert_eq!(state.toggle(), ThemePreference::Light);
        assert_eq!(state.toggle(), ThemePreference::Dark);

        let mut state = ThemeState::new(ThemePreference::System, true);
        assert_eq!(state.toggle(), ThemePreference::Dark);
        assert_eq!(state.toggle(), ThemePreference::Light);
    }

    #[test]
    fn test_toggle_twice_restores_light_and_dark() {
        for pref in [ThemePreference::Light, ThemePreference::Dark] {
            let mut state = ThemeState::new(pref, false);
            state.toggle();
            state.toggle();
            assert_eq!(state.preference, pref);
        }
    }

    #[test]
    fn test_os_change_only_moves_system_preference() {
        let mut state = ThemeState::new(ThemePreference::System, false);
        assert!(state.set_system_dark(true));
        assert!(state.is_dark());
        assert!(!state.set_system_dark(true));

        let mut state = ThemeState::new(ThemePreference::Light, false);
        assert!(!state.set_system_dark(true));
        assert!(!state.is_dark());
        assert!(state.system_dark);
    }

    #[test]
    fn test_system_resolves_through_os_setting() {
        assert!(ThemeState::new(ThemePreference::System, true).is_dark());
        assert!(!ThemeState::new(ThemePreference::System, false).is_dark());
        assert!(!ThemeState::new(ThemePreference::Light, true).is_dark());
    }

    #[test]
    fn test_mount_flag_transitions_once() {
        let mut flag = MountFlag::new();
        assert!(!flag.is_mounted());
        assert!(flag.mark());
        assert!(flag.is_mounted());
        assert!(!flag.mark());
        assert!(flag.is_mounted());
    }
}
