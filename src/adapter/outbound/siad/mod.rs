//! Hosting daemon integration.

pub mod client;
pub mod dto;

pub use client::SiadClient;
