pub mod client;
pub mod api;
pub mod auth;

pub use client::SimklClient;
