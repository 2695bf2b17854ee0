mod client;
pub mod config;

pub use client::TinyUrlClient;
