pub mod client;
pub mod auth;
pub mod api;

pub use client::TraktClient;
