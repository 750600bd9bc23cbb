pub mod client;

pub use client::ReasoningClient;
