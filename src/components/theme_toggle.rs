use dioxus::prelude::*;

use super::icons::{ Icon, ThemeIcon };
use super::theme_provider::ThemeContext;
use crate::cn;
use crate::utils::{ MountFlag, ThemePreference };

/// What the toggle shows for a given preference.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ToggleView {
    pub icon: ThemeIcon,
    pub label: String,
    /// Preference a click will switch to.
    pub target: ThemePreference,
}

/// `None` until mounted. Afterwards the icon and label both describe the
/// click target: a sun offers light mode, a moon offers dark mode.
pub fn toggle_view(mounted: &MountFlag, preference: ThemePreference) -> Option<ToggleView> {
    if !mounted.is_mounted() {
        return None;
    }
    let target = preference.toggled();
    let icon = match target {
        ThemePreference::Light => ThemeIcon::Sun,
        _ => ThemeIcon::Moon,
    };
    Some(ToggleView {
        icon,
        label: format!("Switch to {} theme", target),
        target,
    })
}

#[component]
pub fn ThemeToggle() -> Element {
    let theme = use_context::<ThemeContext>();
    let mut mounted = use_signal(MountFlag::new);

    // Effects never run during server rendering.
    use_effect(move || {
        if mounted.write().mark() {
            log::debug!("Theme toggle mounted");
        }
    });

    let Some(view) = toggle_view(&mounted.read(), theme.preference()) else {
        return rsx! {};
    };

    let class = cn!(
        "theme-toggle",
        "rounded-full border border-solid border-black/[.08] dark:border-white/[.145] transition-colors flex items-center justify-center hover:bg-[#f2f2f2] dark:hover:bg-[#1a1a1a] hover:border-transparent p-2 cursor-pointer hover:text-white"
    );

    rsx! {
        button {
            class,
            r#type: "button",
            "aria-label": "{view.label}",
            title: "{view.label}",
            onclick: move |_| {
                theme.toggle();
            },
            Icon { icon: view.icon }
        }
    }
}
