pub mod client;
pub mod command;
pub mod constants;
pub mod decoder;
pub mod error;
pub mod sample;

// Re-export the NiosClient struct for easy access
pub use client::NiosClient;
