//! Volume configuration: persisted settings and resolved client config.

mod client;
mod settings;

pub use client::{ClientConfig, Credentials};
pub use settings::VolumeSettings;
