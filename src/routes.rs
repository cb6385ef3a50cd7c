use dioxus::prelude::*;
use crate::views::Home;

#[derive(Clone, Routable, PartialEq)]
pub enum Route {
    #[route("/")]
    Home,
}
