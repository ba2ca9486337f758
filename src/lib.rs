pub mod auth;
pub mod config;
pub mod diff;
pub mod drag;
pub mod error;
pub mod roster;
pub mod session;
pub mod store;
pub mod types;
pub mod utils;
pub mod validation;
pub mod window;
