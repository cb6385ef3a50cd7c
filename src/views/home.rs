use dioxus::prelude::*;

use crate::components::ThemeToggle;
use crate::constants::{ SITE_DESCRIPTION, SITE_NAME };

#[component]
pub fn Home() -> Element {
    rsx! {
        document::Title { "{SITE_NAME}" }
        document::Meta { name: "description", content: "{SITE_DESCRIPTION}" }
        main {
            class: "flex min-h-screen flex-col items-center justify-center p-4 relative",
            div {
                class: "absolute top-4 right-4",
                ThemeToggle {}
            }
            div {
                class: "text-center",
                h1 {
                    class: "text-5xl font-bold mb-4",
                    "Welcome"
                }
                p {
                    class: "text-lg text-muted-foreground",
                    "This is a modern and simplistic landing page."
                }
            }
        }
    }
}
