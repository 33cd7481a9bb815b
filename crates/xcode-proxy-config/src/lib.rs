//! Settings for xcode-proxy.
//!
//! Builds the model registry, the default-model pointer and the server bind
//! address from the Claude CLI settings file and a project-local
//! `settings.toml`. Loading never fails: a missing or broken layer is logged
//! and contributes nothing.

pub mod error;
pub mod loader;
pub mod schema;
pub mod settings;

pub use error::SettingsError;
pub use loader::{
    load_claude_cli_env, load_local_settings, read_claude_cli_env, read_local_settings,
    SettingsSources,
};
pub use schema::{
    ClaudeCliEnv, DefaultModelSelector, LocalServerSection, LocalSettings, ModelConfig, Registry,
    ServerConfig, DEFAULT_HOST, DEFAULT_PORT,
};
pub use settings::{ModelSelection, SeedModel, Settings, DEFAULT_SEED_MODEL, ZHIPU_API_BASE};
