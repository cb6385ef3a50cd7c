use std::cell::RefCell;
use std::rc::Rc;

use super::theme_state::{ ThemePreference, ThemeState };

/// Key-value persistence for the theme preference.
pub trait ThemeStore {
    /// Returns the stored preference, or `None` if nothing valid is stored.
    fn load(&self) -> Option<ThemePreference>;
    fn save(&self, preference: ThemePreference) -> Result<(), String>;
}

/// Process-local store, used off the browser and in tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    value: RefCell<Option<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the raw stored string, as a previous session would have left it.
    pub fn with_raw(raw: &str) -> Self {
        Self { value: RefCell::new(Some(raw.to_string())) }
    }

    pub fn raw(&self) -> Option<String> {
        self.value.borrow().clone()
    }
}

impl ThemeStore for MemoryStore {
    fn load(&self) -> Option<ThemePreference> {
        self.value.borrow().as_deref().and_then(parse_stored)
    }

    fn save(&self, preference: ThemePreference) -> Result<(), String> {
        *self.value.borrow_mut() = Some(preference.as_str().to_string());
        Ok(())
    }
}

fn parse_stored(raw: &str) -> Option<ThemePreference> {
    match raw.parse() {
        Ok(preference) => Some(preference),
        Err(e) => {
            log::warn!("Ignoring stored theme: {}", e);
            None
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub struct LocalStorageStore {
    key: String,
}

#[cfg(target_arch = "wasm32")]
impl LocalStorageStore {
    pub fn new(key: &str) -> Self {
        Self { key: key.to_string() }
    }

    fn storage() -> Result<web_sys::Storage, String> {
        web_sys::window()
            .ok_or_else(|| "No window available".to_string())?
            .local_storage()
            .map_err(|e| format!("localStorage unavailable: {}", js_error(e)))?
            .ok_or_else(|| "localStorage unavailable".to_string())
    }
}

#[cfg(target_arch = "wasm32")]
impl ThemeStore for LocalStorageStore {
    fn load(&self) -> Option<ThemePreference> {
        let storage = match Self::storage() {
            Ok(storage) => storage,
            Err(e) => {
                log::warn!("{}", e);
                return None;
            }
        };
        storage.get_item(&self.key).ok().flatten().as_deref().and_then(parse_stored)
    }

    fn save(&self, preference: ThemePreference) -> Result<(), String> {
        Self::storage()?
            .set_item(&self.key, preference.as_str())
            .map_err(|e| format!("Failed to write theme: {}", js_error(e)))
    }
}

#[cfg(target_arch = "wasm32")]
fn js_error(e: wasm_bindgen::JsValue) -> String {
    e.as_string().unwrap_or_else(|| format!("{:?}", e))
}

/// State a fresh page should show: the persisted preference, or the default.
pub fn restore_state(store: &dyn ThemeStore, system_dark: bool) -> ThemeState {
    ThemeState::new(store.load().unwrap_or_default(), system_dark)
}

/// Writes `preference` through to `store`. Failures are logged, not returned.
pub fn persist(store: &dyn ThemeStore, preference: ThemePreference) {
    if let Err(e) = store.save(preference) {
        log::warn!("Failed to persist theme preference: {}", e);
    }
}

/// Toggles `state` and persists the result.
pub fn toggle_and_persist(state: &mut ThemeState, store: &dyn ThemeStore) -> ThemePreference {
    let next = state.toggle();
    persist(store, next);
    next
}

/// Store for the current target: `localStorage` in the browser, memory elsewhere.
pub fn default_store() -> Rc<dyn ThemeStore> {
    #[cfg(target_arch = "wasm32")]
    {
        Rc::new(LocalStorageStore::new(crate::constants::THEME_STORAGE_KEY))
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        Rc::new(MemoryStore::new())
    }
}

/// Whether the OS asks for a dark colour scheme. Always `false` off the browser.
pub fn system_prefers_dark() -> bool {
    #[cfg(target_arch = "wasm32")]
    {
        web_sys::window()
            .and_then(|w| w.match_media("(prefers-color-scheme: dark)").ok().flatten())
            .map(|query| query.matches())
            .unwrap_or(false)
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        false
    }
}

/// Keeps an OS colour-scheme listener registered. Dropping it removes the listener.
pub struct SystemThemeWatch {
    #[cfg(target_arch = "wasm32")]
    query: web_sys::MediaQueryList,
    #[cfg(target_arch = "wasm32")]
    callback: wasm_bindgen::closure::Closure<dyn FnMut(web_sys::MediaQueryListEvent)>,
}

#[cfg(target_arch = "wasm32")]
impl Drop for SystemThemeWatch {
    fn drop(&mut self) {
        use wasm_bindgen::JsCast;

        if let Err(e) = self.query.remove_event_listener_with_callback(
            "change",
            self.callback.as_ref().unchecked_ref()
        ) {
            log::warn!("Failed to remove colour scheme listener: {}", js_error(e));
        }
    }
}

/// Calls `on_change` with the new value whenever the OS colour scheme flips.
/// `None` off the browser, or when `matchMedia` is unavailable.
pub fn watch_system_theme(on_change: impl FnMut(bool) + 'static) -> Option<SystemThemeWatch> {
    #[cfg(target_arch = "wasm32")]
    {
        use wasm_bindgen::closure::Closure;
        use wasm_bindgen::JsCast;

        let mut on_change = on_change;
        let query = web_sys::window()?.match_media("(prefers-color-scheme: dark)").ok().flatten()?;
        let callback = Closure::<dyn FnMut(web_sys::MediaQueryListEvent)>::new(
            move |event: web_sys::MediaQueryListEvent| on_change(event.matches())
        );
        if let Err(e) = query.add_event_listener_with_callback("change", callback.as_ref().unchecked_ref()) {
            log::warn!("Failed to watch colour scheme: {}", js_error(e));
            return None;
        }
        Some(SystemThemeWatch { query, callback })
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        drop(on_change);
        None
    }
}
