//! Umbra configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::eclipse::{DriverSettings, SpeedProfile};

/// Main Umbra configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// LLM provider configuration
    pub llm: LlmConfig,

    /// Animation pacing
    pub animation: AnimationConfig,

    /// Time dilation near totality
    pub dilation: SpeedProfile,

    /// Generated captions
    pub narrative: NarrativeConfig,

    /// Log level (trace, debug, info, warn, error)
    #[serde(rename = "log-level")]
    pub log_level: Option<String>,
}

impl Config {
    /// Validate configuration before use
    ///
    /// The LLM credential is not checked here: a missing key only means the
    /// built-in captions are shown.
    pub fn validate(&self) -> Result<()> {
        if !(self.animation.cycle_secs.is_finite() && self.animation.cycle_secs > 0.0) {
            return Err(eyre::eyre!(
                "animation.cycle-secs must be a positive number, got {}",
                self.animation.cycle_secs
            ));
        }
        if self.animation.fps == 0 {
            return Err(eyre::eyre!("animation.fps must be at least 1"));
        }
        self.dilation.validate().context("Invalid dilation settings")?;
        Ok(())
    }

    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try project-local config: .umbra.yml
        let local_config = PathBuf::from(".umbra.yml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        // Try user config: ~/.config/umbra/umbra.yml
        if let Some(user_config) = Self::user_config_path()
            && user_config.exists()
        {
            match Self::load_from_file(&user_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", user_config.display(), e);
                }
            }
        }

        // No config file found, use defaults
        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Read only the log level, before logging is initialized
    ///
    /// Errors are swallowed; `load` reports them once logging is up.
    pub fn load_log_level(config_path: Option<&PathBuf>) -> Option<String> {
        let candidates = match config_path {
            Some(path) => vec![path.clone()],
            None => {
                let mut paths = vec![PathBuf::from(".umbra.yml")];
                paths.extend(Self::user_config_path());
                paths
            }
        };

        candidates
            .iter()
            .find(|p| p.exists())
            .and_then(|p| fs::read_to_string(p).ok())
            .and_then(|content| serde_yaml::from_str::<Self>(&content).ok())
            .and_then(|config| config.log_level)
    }

    fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("umbra").join("umbra.yml"))
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }

    /// Driver settings assembled from the animation and dilation sections
    pub fn driver_settings(&self) -> DriverSettings {
        DriverSettings {
            cycle_secs: self.animation.cycle_secs,
            max_frame_delta: Duration::from_millis(self.animation.max_frame_ms),
            profile: self.dilation,
        }
    }
}

/// LLM provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Provider name (currently only "anthropic" supported)
    pub provider: String,

    /// Model identifier
    pub model: String,

    /// Environment variable containing the API key
    #[serde(rename = "api-key-env")]
    pub api_key_env: String,

    /// File containing the API key, used when the env var is unset
    #[serde(rename = "api-key-file")]
    pub api_key_file: Option<PathBuf>,

    /// API base URL
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Maximum tokens per response
    #[serde(rename = "max-tokens")]
    pub max_tokens: u32,

    /// Request timeout in milliseconds
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "anthropic".to_string(),
            model: "claude-sonnet-4-20250514".to_string(),
            api_key_env: "ANTHROPIC_API_KEY".to_string(),
            api_key_file: None,
            base_url: "https://api.anthropic.com".to_string(),
            max_tokens: 2048,
            timeout_ms: 30_000,
        }
    }
}

impl LlmConfig {
    /// Resolve the API key from the env var, then the key file
    pub fn get_api_key(&self) -> Result<String> {
        if let Ok(key) = std::env::var(&self.api_key_env)
            && !key.trim().is_empty()
        {
            return Ok(key.trim().to_string());
        }

        if let Some(path) = &self.api_key_file {
            let path = expand_home(path);
            let key = fs::read_to_string(&path).context(format!("Failed to read API key file {}", path.display()))?;
            let key = key.trim();
            if !key.is_empty() {
                return Ok(key.to_string());
            }
        }

        Err(eyre::eyre!(
            "LLM API key not found. Set the {} environment variable.",
            self.api_key_env
        ))
    }
}

/// Animation pacing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// Seconds for one cycle at full speed
    #[serde(rename = "cycle-secs")]
    pub cycle_secs: f64,

    /// Target frames per second
    pub fps: u32,

    /// Longest frame gap honored in one advance
    #[serde(rename = "max-frame-ms")]
    pub max_frame_ms: u64,

    /// Start paused instead of playing
    #[serde(rename = "start-paused")]
    pub start_paused: bool,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            cycle_secs: 40.0,
            fps: 60,
            max_frame_ms: 250,
            start_paused: false,
        }
    }
}

/// Generated caption settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NarrativeConfig {
    /// Try the generative fetch at startup
    pub enabled: bool,

    /// Voice requested from the model
    pub tone: String,

    /// Directory searched for a `narrative.pmt` prompt override
    #[serde(rename = "prompt-dir")]
    pub prompt_dir: String,
}

impl Default for NarrativeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            tone: "quiet, awe-struck, plainspoken".to_string(),
            prompt_dir: "~/.config/umbra/prompts".to_string(),
        }
    }
}

impl NarrativeConfig {
    /// Prompt directory with `~/` expanded
    pub fn expanded_prompt_dir(&self) -> PathBuf {
        expand_home(Path::new(&self.prompt_dir))
    }
}

fn expand_home(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => dirs::home_dir().map(|home| home.join(rest)).unwrap_or_else(|| path.to_path_buf()),
        Err(_) => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.llm.provider, "anthropic");
        assert_eq!(config.animation.fps, 60);
        assert_eq!(config.animation.cycle_secs, 40.0);
        assert!(config.narrative.enabled);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_llm_config_defaults() {
        let config = LlmConfig::default();

        assert_eq!(config.provider, "anthropic");
        assert!(config.model.contains("sonnet"));
        assert_eq!(config.api_key_env, "ANTHROPIC_API_KEY");
        assert_eq!(config.base_url, "https://api.anthropic.com");
    }

    #[test]
    fn test_deserialize_config() {
        let yaml = r#"
llm:
  provider: anthropic
  model: claude-opus-4
  api-key-env: MY_API_KEY
  base-url: https://api.example.com
  max-tokens: 1024
  timeout-ms: 5000

animation:
  cycle-secs: 20
  fps: 30
  max-frame-ms: 100
  start-paused: true

dilation:
  totality-proximity: 0.02
  approach-proximity: 0.1
  totality-multiplier: 0.15
  approach-multiplier: 0.4

narrative:
  enabled: false
  tone: wry

log-level: debug
"#;

        let config: Config = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.llm.model, "claude-opus-4");
        assert_eq!(config.llm.api_key_env, "MY_API_KEY");
        assert_eq!(config.llm.max_tokens, 1024);
        assert_eq!(config.animation.cycle_secs, 20.0);
        assert_eq!(config.animation.fps, 30);
        assert!(config.animation.start_paused);
        assert_eq!(config.dilation.totality_multiplier, 0.15);
        assert!(!config.narrative.enabled);
        assert_eq!(config.narrative.tone, "wry");
        assert_eq!(config.log_level.as_deref(), Some("debug"));
        assert!(config.validate().is_ok());

        let settings = config.driver_settings();
        assert_eq!(settings.cycle_secs, 20.0);
        assert_eq!(settings.max_frame_delta, Duration::from_millis(100));
        assert_eq!(settings.profile.approach_proximity, 0.1);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let yaml = r#"
llm:
  model: claude-haiku
dilation:
  totality-multiplier: 0.2
"#;

        let config: Config = serde_yaml::from_str(yaml).unwrap();

        // Specified value
        assert_eq!(config.llm.model, "claude-haiku");
        assert_eq!(config.dilation.totality_multiplier, 0.2);

        // Defaults for unspecified
        assert_eq!(config.llm.provider, "anthropic");
        assert_eq!(config.llm.api_key_env, "ANTHROPIC_API_KEY");
        assert_eq!(config.dilation.approach_multiplier, 0.42);
        assert_eq!(config.animation.fps, 60);
    }

    #[test]
    fn test_validate_rejects_bad_animation() {
        let mut config = Config::default();
        config.animation.cycle_secs = 0.0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.animation.fps = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_dilation() {
        let mut config = Config::default();
        config.dilation.totality_multiplier = 2.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_explicit_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "animation:\n  fps: 24\nlog-level: warn").unwrap();
        let path = file.path().to_path_buf();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.animation.fps, 24);
        assert_eq!(Config::load_log_level(Some(&path)).as_deref(), Some("warn"));
    }

    #[test]
    fn test_load_explicit_path_missing_is_error() {
        let path = PathBuf::from("/definitely/not/here/umbra.yml");
        assert!(Config::load(Some(&path)).is_err());
        assert_eq!(Config::load_log_level(Some(&path)), None);
    }

    #[test]
    #[serial]
    fn test_api_key_from_env() {
        let config = LlmConfig {
            api_key_env: "UMBRA_TEST_KEY_ENV".to_string(),
            ..Default::default()
        };
        unsafe { std::env::set_var("UMBRA_TEST_KEY_ENV", "  sk-test  ") };
        assert_eq!(config.get_api_key().unwrap(), "sk-test");
        unsafe { std::env::remove_var("UMBRA_TEST_KEY_ENV") };
        assert!(config.get_api_key().is_err());
    }

    #[test]
    #[serial]
    fn test_api_key_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "sk-from-file").unwrap();

        let config = LlmConfig {
            api_key_env: "UMBRA_TEST_KEY_UNSET".to_string(),
            api_key_file: Some(file.path().to_path_buf()),
            ..Default::default()
        };
        unsafe { std::env::remove_var("UMBRA_TEST_KEY_UNSET") };
        assert_eq!(config.get_api_key().unwrap(), "sk-from-file");
    }
}
