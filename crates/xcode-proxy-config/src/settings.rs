//! Settings resolution.
//!
//! The final [`Settings`] are produced from two layers:
//!
//! 1. Claude CLI credentials (`~/.claude/settings.json`) seed one model entry.
//! 2. The local `settings.toml` overlays its `[models]` table per key and may
//!    select a different default model.
//!
//! When the selected default is not configured but the seed entry is, the
//! seed's credentials are cloned under the selected id so a single CLI key is
//! enough to route to any model name the upstream accepts.

use crate::loader::{self, SettingsSources};
use crate::schema::{
    ClaudeCliEnv, LocalServerSection, LocalSettings, ModelConfig, Registry, ServerConfig,
};

/// Seed model name when the CLI settings do not name one.
pub const DEFAULT_SEED_MODEL: &str = "GLM-4.7";

pub const ZHIPU_API_BASE: &str = "https://open.bigmodel.cn/api/paas/v4";

/// Resolved, read-only process settings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Settings {
    pub models: Registry,
    pub default_model: Option<String>,
    pub server: ServerConfig,
}

/// Model entry synthesized from the Claude CLI credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedModel {
    pub id: String,
    pub config: ModelConfig,
}

impl SeedModel {
    /// Build the seed entry; `None` when no API key is configured.
    ///
    /// Keys containing a `.` are Zhipu keys (`<id>.<secret>`); anything else
    /// is treated as an Anthropic-family key.
    pub fn from_claude_env(env: &ClaudeCliEnv) -> Option<Self> {
        let api_key = env.api_key.as_deref().filter(|k| !k.is_empty())?;
        let id = env
            .default_opus_model
            .clone()
            .unwrap_or_else(|| DEFAULT_SEED_MODEL.to_string());

        let config = if api_key.contains('.') {
            ModelConfig::new("zhipu", api_key).with_api_base(ZHIPU_API_BASE)
        } else {
            ModelConfig::new("anthropic", api_key)
        }
        .with_name(format!("{} (Claude CLI)", id));

        Some(Self { id, config })
    }
}

/// How the router picked a model for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelSelection<'a> {
    /// The requested id is configured.
    Requested(&'a str),
    /// The requested id is absent; the default model was substituted.
    Default(&'a str),
    /// Neither the requested id nor the default is configured; the first
    /// registry entry was substituted.
    FirstAvailable(&'a str),
}

impl<'a> ModelSelection<'a> {
    pub fn model_id(&self) -> &'a str {
        match *self {
            Self::Requested(id) | Self::Default(id) | Self::FirstAvailable(id) => id,
        }
    }
}

impl Settings {
    pub fn load(sources: &SettingsSources) -> Self {
        let env = loader::load_claude_cli_env(sources.claude_settings.as_deref());
        let seed = SeedModel::from_claude_env(&env);
        let overlay = loader::load_local_settings(sources.local_settings.as_deref());
        Self::merge(seed, overlay)
    }

    /// Merge the seed entry with the local overlay.
    pub fn merge(seed: Option<SeedModel>, overlay: LocalSettings) -> Self {
        let LocalSettings {
            models: overlay_models,
            default_model: legacy_default,
            server,
        } = overlay;

        let seed_default = seed.as_ref().map(|s| s.id.clone());

        let mut models = Registry::new();
        if let Some(seed) = seed {
            models.insert(seed.id, seed.config);
        }
        // Per-key replacement; existing keys keep their position.
        for (id, config) in overlay_models {
            models.insert(id, config);
        }

        let default_model = match server.as_ref().and_then(|s| s.models.as_ref()) {
            Some(selector) => selector.default.clone().or_else(|| seed_default.clone()),
            None => legacy_default.or_else(|| seed_default.clone()),
        };

        if let Some(target) = default_model.as_deref() {
            if !models.contains_key(target) {
                auto_provision(&mut models, target, seed_default.as_deref());
            }
        }

        Self {
            models,
            default_model,
            server: server
                .as_ref()
                .map(LocalServerSection::to_server_config)
                .unwrap_or_default(),
        }
    }

    pub fn model(&self, model_id: &str) -> Option<&ModelConfig> {
        self.models.get(model_id)
    }

    pub fn model_count(&self) -> usize {
        self.models.len()
    }

    /// Pick the model for a request.
    ///
    /// Order: the requested id if configured, then the default model if
    /// configured, then the first registry entry. `None` only when the
    /// registry is empty.
    pub fn select_model(&self, requested: Option<&str>) -> Option<ModelSelection<'_>> {
        if let Some((id, _)) = requested.and_then(|r| self.models.get_key_value(r)) {
            return Some(ModelSelection::Requested(id.as_str()));
        }

        if let Some((id, _)) = self
            .default_model
            .as_deref()
            .and_then(|d| self.models.get_key_value(d))
        {
            return Some(ModelSelection::Default(id.as_str()));
        }

        self.models
            .keys()
            .next()
            .map(|id| ModelSelection::FirstAvailable(id.as_str()))
    }
}

fn auto_provision(models: &mut Registry, target: &str, seed_default: Option<&str>) {
    let Some(source_id) = seed_default.filter(|id| models.contains_key(*id)) else {
        tracing::warn!(
            model = target,
            "default model not found and no base credentials available"
        );
        return;
    };

    tracing::info!(
        model = target,
        source = source_id,
        "auto-configuring default model from base credentials"
    );

    if let Some(source) = models.get(source_id) {
        let mut config = source.clone();
        config.name = Some(target.to_string());
        models.insert(target.to_string(), config);
    }
}
