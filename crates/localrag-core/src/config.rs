//! Configuration loader and path helpers.
//!
//! Uses Figment to merge built-in defaults, `localrag.toml`,
//! `localrag.<env>.toml` and `LOCALRAG_*` env vars (`__` separates nested
//! keys, e.g. `LOCALRAG_CHUNKING__CHUNK_SIZE=400`).
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::{Error, Result};

pub const ENV_PREFIX: &str = "LOCALRAG_";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingConfig {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    /// File extension (without the dot) of eligible documents.
    pub extension: String,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self { chunk_size: 600, chunk_overlap: 80, extension: "txt".to_string() }
    }
}

impl ChunkingConfig {
    pub fn stride(&self) -> usize {
        self.chunk_size.saturating_sub(self.chunk_overlap).max(1)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    pub top_k: usize,
    /// Terms present in more than this share of chunks are dropped.
    pub max_df: f64,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self { top_k: 4, max_df: 0.9 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    #[default]
    Offline,
    #[serde(rename = "openai")]
    OpenAi,
}

impl FromStr for Provider {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "offline" => Ok(Self::Offline),
            "openai" => Ok(Self::OpenAi),
            other => Err(format!("unknown provider '{other}' (expected 'offline' or 'openai')")),
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Offline => f.write_str("offline"),
            Self::OpenAi => f.write_str("openai"),
        }
    }
}

/// Settings for the chat-completion backed answerer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DelegatedConfig {
    pub model: String,
    pub endpoint: String,
    /// Name of the env var holding the bearer key.
    pub api_key_env: String,
    pub timeout_secs: u64,
    pub temperature: f32,
    pub max_context_blocks: usize,
}

impl Default for DelegatedConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            endpoint: "https://api.openai.com/v1/chat/completions".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            timeout_secs: 30,
            temperature: 0.2,
            max_context_blocks: 6,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnswerConfig {
    pub provider: Provider,
    pub max_context_chars: usize,
    pub delegated: DelegatedConfig,
}

impl Default for AnswerConfig {
    fn default() -> Self {
        Self { provider: Provider::Offline, max_context_chars: 2000, delegated: DelegatedConfig::default() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RagConfig {
    pub data_dir: String,
    pub chunking: ChunkingConfig,
    pub retrieval: RetrievalConfig,
    pub answer: AnswerConfig,
}

impl Default for RagConfig {
    fn default() -> Self {
        Self {
            data_dir: "data".to_string(),
            chunking: ChunkingConfig::default(),
            retrieval: RetrievalConfig::default(),
            answer: AnswerConfig::default(),
        }
    }
}

impl RagConfig {
    pub fn validate(&self) -> Result<()> {
        if self.chunking.chunk_size == 0 {
            return Err(Error::InvalidConfig("chunking.chunk_size must be greater than zero".into()));
        }
        if !(self.retrieval.max_df > 0.0 && self.retrieval.max_df <= 1.0) {
            return Err(Error::InvalidConfig(format!(
                "retrieval.max_df must be in (0, 1], got {}",
                self.retrieval.max_df
            )));
        }
        if self.retrieval.top_k == 0 {
            return Err(Error::InvalidConfig("retrieval.top_k must be greater than zero".into()));
        }
        Ok(())
    }

    /// Corpus directory after `~` and `$VAR` expansion.
    pub fn data_path(&self) -> PathBuf {
        expand_path(&self.data_dir)
    }
}

pub struct Config {
    figment: Figment,
}

impl Config {
    pub fn load() -> Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());
        Ok(Self::from_figment(Self::figment_for(&env_name)))
    }

    pub fn figment_for(env_name: &str) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(RagConfig::default())).merge(Toml::file("localrag.toml"));
        match env_name {
            "dev" | "development" => figment = figment.merge(Toml::file("localrag.dev.toml")),
            "prod" | "production" => figment = figment.merge(Toml::file("localrag.prod.toml")),
            "test" | "testing" => figment = figment.merge(Toml::file("localrag.test.toml")),
            _ => {}
        }
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    pub fn from_figment(figment: Figment) -> Self {
        Self { figment }
    }

    /// Typed, validated settings.
    pub fn settings(&self) -> Result<RagConfig> {
        let config: RagConfig = self.figment.extract().map_err(|e| Error::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}
