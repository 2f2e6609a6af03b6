rust_i18n::i18n!("locales", fallback = "en");

pub mod app;
pub mod clock;
pub mod config;
pub mod content;
pub mod engine;
pub mod error;
pub mod logging;
pub mod session;
pub mod store;
pub mod ui;
