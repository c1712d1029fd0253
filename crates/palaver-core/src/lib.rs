//! Core palaver library (conversation engine, API client, stream transport, config).

pub mod api;
pub mod chat;
pub mod config;
pub mod draft;
pub mod logging;
pub mod sessions;
pub mod stream;
