//! Generator configuration.
//!
//! Every section has defaults, so a partial file (or no file) is valid.
//!
//! # Example YAML
//!
//! ```yaml
//! api:
//!   base_url: https://api.openai.com/v1
//!   api_key_env: OPENAI_API_KEY
//!   timeout_secs: 60
//! models:
//!   text: gpt-4
//!   image: dall-e-3
//! requests:
//!   statements: { temperature: 0.8, max_tokens: 800 }
//! sketch_count: 3
//! session:
//!   database: ideagen.db
//!   table_prefix: ig_
//!   retention_days: 180
//! ```

use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use ideagen_core::{DEFAULT_SKETCH_COUNT, ResponseKind};
use serde::{Deserialize, Serialize};

use crate::error::{GenerateError, Result};

/// Connection settings for the OpenAI-compatible API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    /// Name of the environment variable holding the API key.
    pub api_key_env: String,
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            timeout_secs: 60,
        }
    }
}

impl ApiConfig {
    /// Reads the API key from the configured environment variable.
    ///
    /// # Errors
    ///
    /// Returns [`MissingApiKey`](GenerateError::MissingApiKey) if the
    /// variable is unset or blank.
    pub fn api_key(&self) -> Result<String> {
        match std::env::var(&self.api_key_env) {
            Ok(key) if !key.trim().is_empty() => Ok(key.trim().to_string()),
            _ => Err(GenerateError::MissingApiKey {
                env_var: self.api_key_env.clone(),
            }),
        }
    }
}

/// Model names and image parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub text: String,
    pub image: String,
    pub image_size: String,
    pub image_quality: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            text: "gpt-4".to_string(),
            image: "dall-e-3".to_string(),
            image_size: "1024x1024".to_string(),
            image_quality: "standard".to_string(),
        }
    }
}

/// Sampling parameters for one request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RequestParams {
    pub temperature: f32,
    pub max_tokens: u32,
}

impl RequestParams {
    pub const fn new(temperature: f32, max_tokens: u32) -> Self {
        Self {
            temperature,
            max_tokens,
        }
    }
}

/// Sampling parameters per response kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestConfig {
    pub statements: RequestParams,
    pub feature_ideas: RequestParams,
    pub layout_ideas: RequestParams,
    pub sketch_prompts: RequestParams,
    pub sketch_concepts: RequestParams,
    pub user_context: RequestParams,
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            statements: RequestParams::new(0.8, 800),
            feature_ideas: RequestParams::new(0.8, 1000),
            layout_ideas: RequestParams::new(0.8, 1200),
            sketch_prompts: RequestParams::new(0.9, 400),
            sketch_concepts: RequestParams::new(0.7, 400),
            user_context: RequestParams::new(0.8, 1000),
        }
    }
}

impl RequestConfig {
    /// Returns the parameters for `kind`.
    pub fn for_kind(&self, kind: ResponseKind) -> RequestParams {
        match kind {
            ResponseKind::Statements => self.statements,
            ResponseKind::FeatureIdeas => self.feature_ideas,
            ResponseKind::LayoutIdeas => self.layout_ideas,
            ResponseKind::SketchPrompts => self.sketch_prompts,
            ResponseKind::SketchConcepts => self.sketch_concepts,
            ResponseKind::UserContext => self.user_context,
        }
    }
}

/// Session persistence settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub database: PathBuf,
    pub table_prefix: String,
    /// Sessions older than this are purged.
    pub retention_days: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            database: PathBuf::from("ideagen.db"),
            table_prefix: "ig_".to_string(),
            retention_days: 180,
        }
    }
}

/// Top-level generator configuration.
///
/// # Examples
///
/// ```
/// use ideagen_generate::GeneratorConfig;
///
/// let config: GeneratorConfig = serde_yaml::from_str("sketch_count: 4").unwrap();
/// assert_eq!(config.sketch_count, 4);
/// assert_eq!(config.models.text, "gpt-4");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub api: ApiConfig,
    pub models: ModelConfig,
    pub requests: RequestConfig,
    /// Number of sketch prompts, images and concepts per run.
    pub sketch_count: usize,
    /// Directory holding `<name>_prompt.txt` overrides.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub templates_dir: Option<PathBuf>,
    pub session: SessionConfig,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            models: ModelConfig::default(),
            requests: RequestConfig::default(),
            sketch_count: DEFAULT_SKETCH_COUNT,
            templates_dir: None,
            session: SessionConfig::default(),
        }
    }
}

impl GeneratorConfig {
    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](GenerateError::IoError) if the file cannot be
    /// read, or [`YamlError`](GenerateError::YamlError) if parsing fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let config = serde_yaml::from_reader(reader)?;
        Ok(config)
    }

    /// Loads `path` if it exists, otherwise returns defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) if path.exists() => Self::load(path),
            _ => Ok(Self::default()),
        }
    }

    /// Saves the configuration as YAML.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = BufWriter::new(file);
        serde_yaml::to_writer(writer, self)?;
        Ok(())
    }
}
