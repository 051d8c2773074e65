//! siastats.info host ranking integration.

pub mod client;
pub mod dto;

pub use client::SiastatsClient;
