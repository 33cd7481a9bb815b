//! Command-line arguments

use clap::Parser;
use std::path::PathBuf;
use xcode_proxy_config::{ServerConfig, SettingsSources};

/// Xcode AI Proxy - route OpenAI-style chat requests to configured LLM providers
#[derive(Parser, Debug)]
#[command(name = "xcode-proxy")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Bind host (default: `[server].host` from settings.toml, else 0.0.0.0)
    #[arg(long)]
    pub host: Option<String>,

    /// Bind port (default: `[server].port` from settings.toml, else 3000)
    #[arg(long)]
    pub port: Option<u16>,

    /// Local settings file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Claude CLI settings file providing base credentials
    #[arg(long, value_name = "PATH")]
    pub claude_settings: Option<PathBuf>,
}

impl Cli {
    pub fn settings_sources(&self) -> SettingsSources {
        let mut sources = SettingsSources::default();
        if let Some(path) = &self.config {
            sources = sources.with_local_settings(path);
        }
        if let Some(path) = &self.claude_settings {
            sources = sources.with_claude_settings(path);
        }
        sources
    }

    /// Bind address: command-line values win over the settings file.
    pub fn bind_address(&self, server: &ServerConfig) -> ServerConfig {
        ServerConfig {
            host: self.host.clone().unwrap_or_else(|| server.host.clone()),
            port: self.port.unwrap_or(server.port),
        }
    }
}
