mod icons;
mod theme_provider;
mod theme_toggle;

pub use icons::{ Icon, MoonIcon, SunIcon, ThemeIcon };
pub use theme_provider::{ ThemeContext, ThemeProvider };
pub use theme_toggle::{ toggle_view, ThemeToggle, ToggleView };
