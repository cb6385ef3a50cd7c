use std::cell::RefCell;
use std::rc::Rc;
use dioxus::prelude::*;

use crate::utils::{
    default_store,
    restore_state,
    system_prefers_dark,
    toggle_and_persist,
    watch_system_theme,
    SystemThemeWatch,
    ThemePreference,
    ThemeState,
    ThemeStore,
};

/// Shared theme state plus the store it persists to. Provided once at the root.
#[derive(Clone)]
pub struct ThemeContext {
    pub state: Signal<ThemeState>,
    store: Rc<dyn ThemeStore>,
}

impl ThemeContext {
    pub fn new(state: Signal<ThemeState>, store: Rc<dyn ThemeStore>) -> Self {
        Self { state, store }
    }

    pub fn preference(&self) -> ThemePreference {
        self.state.read().preference
    }

    /// Flips light/dark, persists, and returns the new preference.
    pub fn toggle(&self) -> ThemePreference {
        let mut state = self.state;
        let next = toggle_and_persist(&mut state.write(), self.store.as_ref());
        log::info!("Theme switched to {}", next);
        next
    }

    /// Replaces the in-memory state with what the store and OS report.
    pub fn sync_from_store(&self) {
        let mut state = self.state;
        let restored = restore_state(self.store.as_ref(), system_prefers_dark());
        log::debug!("Restored theme preference: {}", restored.preference);
        state.set(restored);
    }

    /// Follows an OS colour-scheme change. Only a `system` preference reacts.
    pub fn set_system_dark(&self, dark: bool) {
        let mut state = self.state;
        if state.write().set_system_dark(dark) {
            log::info!("System colour scheme changed, dark = {}", dark);
        }
    }
}

/// Owns the theme state for everything below it and applies the `dark` class.
///
/// The server and the first client render both use the default preference;
/// the persisted one is read in an effect, which only runs on the client. The
/// same effect starts listening for OS colour-scheme changes.
#[component]
pub fn ThemeProvider(children: Element) -> Element {
    let state = use_signal(ThemeState::default);
    let theme = use_context_provider(|| ThemeContext::new(state, default_store()));
    let watch = use_hook(|| Rc::new(RefCell::new(None::<SystemThemeWatch>)));

    use_effect({
        let theme = theme.clone();
        move || {
            theme.sync_from_store();
            let listener = theme.clone();
            *watch.borrow_mut() = watch_system_theme(move |dark| listener.set_system_dark(dark));
        }
    });

    rsx! {
        div {
            class: if state.read().is_dark() { "dark" } else { "" },
            {children}
        }
    }
}
