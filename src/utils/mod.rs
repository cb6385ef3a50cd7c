pub mod cn;
pub mod date;
mod theme_state;
mod theme_store;

pub use date::{ format_date, format_relative_time, DateFormatOptions, Timestamp };
pub use theme_state::{ MountFlag, ResolvedTheme, ThemePreference, ThemeState };
pub use theme_store::{
    default_store,
    persist,
    restore_state,
    system_prefers_dark,
    toggle_and_persist,
    watch_system_theme,
    MemoryStore,
    SystemThemeWatch,
    ThemeStore,
};
