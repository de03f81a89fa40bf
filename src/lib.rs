pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use config::PanelConfig;
pub use crate::core::{client::PterodactylClient, provisioner::Provisioner};
pub use utils::error::{ProvisionError, Result};
