//! Process configuration.
//!
//! Built once at startup and passed by reference into the pipeline. Nothing
//! below this module reads the environment.

use crate::backend::gemini::GEMINI_BASE_URL;
use crate::backend::redact;
use crate::error::Result;
use crate::imaging::huggingface::{DEFAULT_IMAGE_MODEL, HF_BASE_URL};
use crate::PipelineError;
use std::path::PathBuf;
use std::time::Duration;

/// Credential for the text backend.
pub const TEXT_API_KEY_VAR: &str = "GOOGLE_API_KEY";
/// Credential for the image backend.
pub const IMAGE_API_TOKEN_VAR: &str = "HUGGINGFACEHUB_API_TOKEN";

pub const DEFAULT_TEXT_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_MEDIA_ROOT: &str = "media";
pub const DEFAULT_MEDIA_URL: &str = "/media/";
pub const DEFAULT_IMAGE_TIMEOUT_SECS: u64 = 60;

/// Story pipeline configuration.
///
/// | Env Var                    | Default                          |
/// |----------------------------|----------------------------------|
/// | `GOOGLE_API_KEY`           | required                         |
/// | `HUGGINGFACEHUB_API_TOKEN` | required                         |
/// | `MEDIA_ROOT`               | `media`                          |
/// | `MEDIA_URL`                | `/media/`                        |
/// | `STORY_TEXT_MODEL`         | `gemini-1.5-flash`               |
/// | `STORY_IMAGE_MODEL`        | `black-forest-labs/FLUX.1-dev`   |
/// | `GEMINI_BASE_URL`          | Google's public endpoint         |
/// | `HF_BASE_URL`              | Hugging Face inference endpoint  |
/// | `IMAGE_TIMEOUT_SECS`       | `60`                             |
///
/// Credentials are optional at load time; [`Config::require_credentials`]
/// enforces them when a run starts.
#[derive(Clone)]
pub struct Config {
    pub google_api_key: Option<String>,
    pub hf_api_token: Option<String>,
    /// Directory that receives `generated/*.png`.
    pub media_root: PathBuf,
    /// URL prefix under which `media_root` is served.
    pub media_url: String,
    pub text_model: String,
    pub image_model: String,
    pub text_base_url: String,
    pub image_base_url: String,
    /// Upper bound for one image request.
    pub image_timeout: Duration,
}

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    ///
    /// Empty values count as unset.
    ///
    /// ```
    /// use story_pipeline::Config;
    ///
    /// let config = Config::from_lookup(|key| match key {
    ///     "GOOGLE_API_KEY" => Some("g".into()),
    ///     "HUGGINGFACEHUB_API_TOKEN" => Some("h".into()),
    ///     _ => None,
    /// })
    /// .unwrap();
    /// assert!(config.require_credentials().is_ok());
    /// ```
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let image_timeout = match get("IMAGE_TIMEOUT_SECS") {
            Some(raw) => raw.trim().parse::<u64>().map_err(|_| {
                PipelineError::InvalidConfig(format!(
                    "IMAGE_TIMEOUT_SECS must be a whole number of seconds, got {:?}",
                    raw
                ))
            })?,
            None => DEFAULT_IMAGE_TIMEOUT_SECS,
        };

        Ok(Self {
            google_api_key: get(TEXT_API_KEY_VAR),
            hf_api_token: get(IMAGE_API_TOKEN_VAR),
            media_root: get("MEDIA_ROOT")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_MEDIA_ROOT)),
            media_url: get("MEDIA_URL").unwrap_or_else(|| DEFAULT_MEDIA_URL.into()),
            text_model: get("STORY_TEXT_MODEL").unwrap_or_else(|| DEFAULT_TEXT_MODEL.into()),
            image_model: get("STORY_IMAGE_MODEL").unwrap_or_else(|| DEFAULT_IMAGE_MODEL.into()),
            text_base_url: get("GEMINI_BASE_URL").unwrap_or_else(|| GEMINI_BASE_URL.into()),
            image_base_url: get("HF_BASE_URL").unwrap_or_else(|| HF_BASE_URL.into()),
            image_timeout: Duration::from_secs(image_timeout),
        })
    }

    /// Fail with [`PipelineError::Config`] naming the first missing credential.
    pub fn require_credentials(&self) -> Result<()> {
        if self.google_api_key.is_none() {
            return Err(PipelineError::Config {
                var: TEXT_API_KEY_VAR,
            });
        }
        if self.hf_api_token.is_none() {
            return Err(PipelineError::Config {
                var: IMAGE_API_TOKEN_VAR,
            });
        }
        Ok(())
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("google_api_key", &self.google_api_key.as_deref().map(redact))
            .field("hf_api_token", &self.hf_api_token.as_deref().map(redact))
            .field("media_root", &self.media_root)
            .field("media_url", &self.media_url)
            .field("text_model", &self.text_model)
            .field("image_model", &self.image_model)
            .field("text_base_url", &self.text_base_url)
            .field("image_base_url", &self.image_base_url)
            .field("image_timeout", &self.image_timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.media_root, PathBuf::from("media"));
        assert_eq!(config.media_url, "/media/");
        assert_eq!(config.text_model, "gemini-1.5-flash");
        assert_eq!(config.image_model, "black-forest-labs/FLUX.1-dev");
        assert_eq!(config.image_timeout, Duration::from_secs(60));
        assert!(config.google_api_key.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("MEDIA_ROOT", "/var/story"),
            ("STORY_IMAGE_MODEL", "stabilityai/sdxl"),
            ("IMAGE_TIMEOUT_SECS", " 15 "),
        ]))
        .unwrap();
        assert_eq!(config.media_root, PathBuf::from("/var/story"));
        assert_eq!(config.image_model, "stabilityai/sdxl");
        assert_eq!(config.image_timeout, Duration::from_secs(15));
    }

    #[test]
    fn test_bad_timeout_is_invalid_config() {
        let err = Config::from_lookup(lookup(&[("IMAGE_TIMEOUT_SECS", "soon")])).unwrap_err();
        assert!(matches!(err, PipelineError::InvalidConfig(_)));
    }

    #[test]
    fn test_missing_text_key_reported_first() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        let err = config.require_credentials().unwrap_err();
        assert!(matches!(err, PipelineError::Config { var: "GOOGLE_API_KEY" }));
    }

    #[test]
    fn test_missing_image_token() {
        let config = Config::from_lookup(lookup(&[
            ("GOOGLE_API_KEY", "g-key"),
            ("HUGGINGFACEHUB_API_TOKEN", "   "),
        ]))
        .unwrap();
        let err = config.require_credentials().unwrap_err();
        assert_eq!(
            err.to_string(),
            "HUGGINGFACEHUB_API_TOKEN not found. Check your .env file."
        );
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = Config::from_lookup(lookup(&[
            ("GOOGLE_API_KEY", "AIzaSySECRETSECRET"),
            ("HUGGINGFACEHUB_API_TOKEN", "hf_SECRETSECRET"),
        ]))
        .unwrap();
        let out = format!("{:?}", config);
        assert!(!out.contains("SECRETSECRET"));
        assert!(out.contains("hf_SEC***"));
    }
}
