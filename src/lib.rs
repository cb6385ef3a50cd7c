pub mod api;
pub mod components;
pub mod configs;
pub mod constants;
pub mod error;
mod routes;
pub mod utils;
pub mod views;

#[cfg(test)]
mod tests;

pub use crate::routes::*;
pub use crate::error::ApiError;
