use std::cell::Cell;
use std::rc::Rc;

use crossterm::style::Color;
use rust_embed::Embed;
use serde::{Deserialize, Serialize};

use crate::store::schema::THEME_KEY;
use crate::store::{self, Storage};

#[derive(Embed)]
#[folder = "assets/palettes/"]
struct PaletteAssets;

/// What the user asked for. `System` follows the host colour scheme.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreference {
    Light,
    Dark,
    #[default]
    System,
}

impl ThemePreference {
    pub fn as_str(self) -> &'static str {
        match self {
            ThemePreference::Light => "light",
            ThemePreference::Dark => "dark",
            ThemePreference::System => "system",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResolvedTheme {
    Light,
    Dark,
}

impl ResolvedTheme {
    pub fn as_str(self) -> &'static str {
        match self {
            ResolvedTheme::Light => "light",
            ResolvedTheme::Dark => "dark",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeState {
    pub theme: ThemePreference,
}

/// Host colour-scheme query.
pub trait ColorSchemeProvider {
    fn prefers_dark(&self) -> bool;
}

/// Reads `DOCKTUTOR_COLOR_SCHEME` (`light`/`dark`), then the `COLORFGBG`
/// convention set by many terminals. Re-read on every call.
#[derive(Clone, Copy, Debug, Default)]
pub struct EnvColorScheme;

impl ColorSchemeProvider for EnvColorScheme {
    fn prefers_dark(&self) -> bool {
        let explicit = std::env::var("DOCKTUTOR_COLOR_SCHEME").ok();
        let colorfgbg = std::env::var("COLORFGBG").ok();
        scheme_prefers_dark(explicit.as_deref(), colorfgbg.as_deref())
    }
}

fn scheme_prefers_dark(explicit: Option<&str>, colorfgbg: Option<&str>) -> bool {
    match explicit.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
        Some("dark") => return true,
        Some("light") => return false,
        _ => {}
    }
    // "fg;bg" or "fg;default;bg"; the background is the last field.
    colorfgbg
        .and_then(|v| v.rsplit(';').next())
        .and_then(|bg| bg.trim().parse::<u8>().ok())
        .is_some_and(|bg| bg <= 6 || bg == 8)
}

/// Provider with a settable answer, for tests and non-interactive use.
#[derive(Debug, Default)]
pub struct StaticColorScheme {
    dark: Cell<bool>,
}

impl StaticColorScheme {
    pub fn new(dark: bool) -> Self {
        Self {
            dark: Cell::new(dark),
        }
    }

    pub fn set(&self, dark: bool) {
        self.dark.set(dark);
    }
}

impl ColorSchemeProvider for StaticColorScheme {
    fn prefers_dark(&self) -> bool {
        self.dark.get()
    }
}

pub struct ThemeStore {
    state: ThemeState,
    storage: Rc<dyn Storage>,
    scheme: Rc<dyn ColorSchemeProvider>,
    dark_applied: bool,
}

impl ThemeStore {
    /// Rehydrates the stored preference and applies it straight away.
    pub fn new(storage: Rc<dyn Storage>, scheme: Rc<dyn ColorSchemeProvider>) -> Self {
        let state = store::load_state::<ThemeState>(storage.as_ref(), THEME_KEY).unwrap_or_default();
        let mut theme = Self {
            state,
            storage,
            scheme,
            dark_applied: false,
        };
        theme.apply();
        tracing::debug!(
            preference = theme.state.theme.as_str(),
            resolved = theme.resolved_theme().as_str(),
            "theme rehydrated"
        );
        theme
    }

    pub fn preference(&self) -> ThemePreference {
        self.state.theme
    }

    pub fn state(&self) -> &ThemeState {
        &self.state
    }

    pub fn set_theme(&mut self, theme: ThemePreference) {
        self.state.theme = theme;
        self.apply();
        if let Err(err) = store::save_state(self.storage.as_ref(), THEME_KEY, &self.state) {
            tracing::warn!(?err, "failed to persist theme");
        }
    }

    /// Stored choice, or the host scheme as of this call for `System`.
    pub fn resolved_theme(&self) -> ResolvedTheme {
        match self.state.theme {
            ThemePreference::Light => ResolvedTheme::Light,
            ThemePreference::Dark => ResolvedTheme::Dark,
            ThemePreference::System => {
                if self.scheme.prefers_dark() {
                    ResolvedTheme::Dark
                } else {
                    ResolvedTheme::Light
                }
            }
        }
    }

    /// Host scheme changed. Only matters while following the system.
    pub fn on_system_preference_changed(&mut self) {
        if self.state.theme == ThemePreference::System {
            self.apply();
        }
    }

    /// Re-read the stored preference, e.g. after an import replaced it.
    pub fn reload(&mut self) {
        self.state = store::load_state::<ThemeState>(self.storage.as_ref(), THEME_KEY)
            .unwrap_or_default();
        self.apply();
    }

    pub fn is_dark_applied(&self) -> bool {
        self.dark_applied
    }

    pub fn palette(&self) -> Palette {
        if self.dark_applied {
            Palette::load("dark")
        } else {
            Palette::load("light")
        }
        .unwrap_or_default()
    }

    fn apply(&mut self) {
        self.dark_applied = self.resolved_theme() == ResolvedTheme::Dark;
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Palette {
    pub name: String,
    pub colors: PaletteColors,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PaletteColors {
    pub heading: String,
    pub accent: String,
    pub success: String,
    pub warning: String,
    pub error: String,
    pub muted: String,
    pub bar_filled: String,
    pub bar_empty: String,
}

impl Palette {
    pub fn load(name: &str) -> Option<Self> {
        let file = PaletteAssets::get(&format!("{name}.toml"))?;
        let content = std::str::from_utf8(file.data.as_ref()).ok()?;
        match toml::from_str::<Palette>(content) {
            Ok(palette) => Some(palette),
            Err(err) => {
                tracing::warn!(name, %err, "bundled palette failed to parse");
                None
            }
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            colors: PaletteColors::default(),
        }
    }
}

impl Default for PaletteColors {
    fn default() -> Self {
        Self {
            heading: "#1e66f5".to_string(),
            accent: "#179299".to_string(),
            success: "#40a02b".to_string(),
            warning: "#df8e1d".to_string(),
            error: "#d20f39".to_string(),
            muted: "#8c8fa1".to_string(),
            bar_filled: "#1e66f5".to_string(),
            bar_empty: "#bcc0cc".to_string(),
        }
    }
}

impl PaletteColors {
    pub fn parse_color(hex: &str) -> Color {
        let hex = hex.trim_start_matches('#');
        if hex.len() == 6 {
            if let (Ok(r), Ok(g), Ok(b)) = (
                u8::from_str_radix(&hex[0..2], 16),
                u8::from_str_radix(&hex[2..4], 16),
                u8::from_str_radix(&hex[4..6], 16),
            ) {
                return Color::Rgb { r, g, b };
            }
        }
        Color::Reset
    }

    pub fn heading(&self) -> Color { Self::parse_color(&self.heading) }
    pub fn accent(&self) -> Color { Self::parse_color(&self.accent) }
    pub fn success(&self) -> Color { Self::parse_color(&self.success) }
    pub fn warning(&self) -> Color { Self::parse_color(&self.warning) }
    pub fn error(&self) -> Color { Self::parse_color(&self.error) }
    pub fn muted(&self) -> Color { Self::parse_color(&self.muted) }
    pub fn bar_filled(&self) -> Color { Self::parse_color(&self.bar_filled) }
    pub fn bar_empty(&self) -> Color { Self::parse_color(&self.bar_empty) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStorage;

    fn theme_store(storage: &Rc<MemoryStorage>, scheme: &Rc<StaticColorScheme>) -> ThemeStore {
        ThemeStore::new(storage.clone(), scheme.clone())
    }

    #[test]
    fn test_default_is_system() {
        let storage = Rc::new(MemoryStorage::new());
        let scheme = Rc::new(StaticColorScheme::new(false));
        let theme = theme_store(&storage, &scheme);
        assert_eq!(theme.preference(), ThemePreference::System);
        assert_eq!(theme.resolved_theme(), ResolvedTheme::Light);
        assert!(!theme.is_dark_applied());
    }

    #[test]
    fn test_system_resolves_on_every_call() {
        let storage = Rc::new(MemoryStorage::new());
        let scheme = Rc::new(StaticColorScheme::new(false));
        let theme = theme_store(&storage, &scheme);
        scheme.set(true);
        assert_eq!(theme.resolved_theme(), ResolvedTheme::Dark);
        // Applied state only moves on a change notification.
        assert!(!theme.is_dark_applied());
    }

    #[test]
    fn test_explicit_choice_ignores_host() {
        let storage = Rc::new(MemoryStorage::new());
        let scheme = Rc::new(StaticColorScheme::new(true));
        let mut theme = theme_store(&storage, &scheme);
        theme.set_theme(ThemePreference::Light);
        assert_eq!(theme.resolved_theme(), ResolvedTheme::Light);
        assert!(!theme.is_dark_applied());

        theme.on_system_preference_changed();
        assert!(!theme.is_dark_applied());
    }

    #[test]
    fn test_preference_change_applies_only_in_system() {
        let storage = Rc::new(MemoryStorage::new());
        let scheme = Rc::new(StaticColorScheme::new(false));
        let mut theme = theme_store(&storage, &scheme);

        scheme.set(true);
        theme.on_system_preference_changed();
        assert!(theme.is_dark_applied());

        theme.set_theme(ThemePreference::Light);
        scheme.set(true);
        theme.on_system_preference_changed();
        assert!(!theme.is_dark_applied());
    }

    #[test]
    fn test_set_theme_persists_and_rehydrates() {
        let storage = Rc::new(MemoryStorage::new());
        let scheme = Rc::new(StaticColorScheme::new(false));
        let mut theme = theme_store(&storage, &scheme);
        theme.set_theme(ThemePreference::Dark);
        theme.set_theme(ThemePreference::Dark);

        let raw = storage.get(THEME_KEY).unwrap().unwrap();
        assert_eq!(raw, r#"{"state":{"theme":"dark"},"version":0}"#);

        let again = theme_store(&storage, &scheme);
        assert_eq!(again.preference(), ThemePreference::Dark);
        assert!(again.is_dark_applied());
    }

    #[test]
    fn test_malformed_theme_falls_back_to_system() {
        let storage = Rc::new(MemoryStorage::new());
        storage
            .set(THEME_KEY, r#"{"state":{"theme":"purple"},"version":0}"#)
            .unwrap();
        let scheme = Rc::new(StaticColorScheme::new(true));
        let theme = theme_store(&storage, &scheme);
        assert_eq!(theme.preference(), ThemePreference::System);
        assert!(theme.is_dark_applied());
    }

    #[test]
    fn test_reload_picks_up_external_write() {
        let storage = Rc::new(MemoryStorage::new());
        let scheme = Rc::new(StaticColorScheme::new(false));
        let mut theme = theme_store(&storage, &scheme);
        store::save_state(
            storage.as_ref(),
            THEME_KEY,
            &ThemeState {
                theme: ThemePreference::Dark,
            },
        )
        .unwrap();
        theme.reload();
        assert_eq!(theme.preference(), ThemePreference::Dark);
        assert!(theme.is_dark_applied());
    }

    #[test]
    fn test_env_scheme_parsing() {
        assert!(scheme_prefers_dark(Some("dark"), None));
        assert!(!scheme_prefers_dark(Some("LIGHT"), Some("15;0")));
        assert!(scheme_prefers_dark(None, Some("15;0")));
        assert!(scheme_prefers_dark(None, Some("15;default;8")));
        assert!(!scheme_prefers_dark(None, Some("0;15")));
        assert!(!scheme_prefers_dark(None, Some("0;7")));
        assert!(!scheme_prefers_dark(Some("sepia"), Some("garbage")));
        assert!(!scheme_prefers_dark(None, None));
    }

    #[test]
    fn test_bundled_palettes_load() {
        let dark = Palette::load("dark").unwrap();
        let light = Palette::load("light").unwrap();
        assert_eq!(dark.name, "dark");
        assert_ne!(dark.colors.heading, light.colors.heading);
        assert!(Palette::load("missing").is_none());
    }

    #[test]
    fn test_parse_color() {
        assert_eq!(
            PaletteColors::parse_color("#ff8000"),
            Color::Rgb {
                r: 255,
                g: 128,
                b: 0
            }
        );
        assert_eq!(PaletteColors::parse_color("nope"), Color::Reset);
    }
}
