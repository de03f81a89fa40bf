pub mod toml_config;

pub use toml_config::PanelConfig;

#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "panel-provisioner")]
#[command(about = "HTTP endpoint that provisions Pterodactyl panel accounts and servers")]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "panel.toml")]
    pub config: String,

    /// Override http.bind from the configuration file
    #[arg(long)]
    pub bind: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}
