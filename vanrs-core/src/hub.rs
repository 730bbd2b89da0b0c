use std::{
    env, fmt, fs,
    path::{Path, PathBuf},
    str::FromStr,
};

use hf_hub::{
    api::sync::{ApiBuilder, ApiRepo},
    Repo, RepoType,
};
use tracing::info;

use crate::{
    error::{ConfigError, Result},
    utils::tokens::get_token,
};

/// Name of the configuration file inside a model directory or Hub repo.
pub const CONFIG_NAME: &str = "config.json";

#[derive(Debug, Clone, PartialEq)]
/// The source of the HF token.
pub enum TokenSource {
    Literal(String),
    EnvVar(String),
    Path(String),
    CacheToken,
    None,
}

impl FromStr for TokenSource {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let parts: Vec<&str> = s.splitn(2, ':').collect();
        match parts[0] {
            "literal" => parts
                .get(1)
                .map(|&value| TokenSource::Literal(value.to_string()))
                .ok_or_else(|| "Expected a value for 'literal'".to_string()),
            "env" => Ok(TokenSource::EnvVar(
                parts
                    .get(1)
                    .unwrap_or(&"HUGGING_FACE_HUB_TOKEN")
                    .to_string(),
            )),
            "path" => parts
                .get(1)
                .map(|&value| TokenSource::Path(value.to_string()))
                .ok_or_else(|| "Expected a value for 'path'".to_string()),
            "cache" => Ok(TokenSource::CacheToken),
            "none" => Ok(TokenSource::None),
            _ => Err("Invalid token source format".to_string()),
        }
    }
}

impl fmt::Display for TokenSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenSource::Literal(value) => write!(f, "literal:{}", value),
            TokenSource::EnvVar(value) => write!(f, "env:{}", value),
            TokenSource::Path(value) => write!(f, "path:{}", value),
            TokenSource::CacheToken => write!(f, "cache"),
            TokenSource::None => write!(f, "none"),
        }
    }
}

#[derive(Debug, Clone)]
/// Where and how to fetch a `config.json` that is not on the local filesystem.
pub struct HubOptions {
    pub token_source: TokenSource,
    /// Defaults to `main`.
    pub revision: Option<String>,
    /// Falls back to `HF_HUB_CACHE`, then to the `hf-hub` default.
    pub cache_dir: Option<PathBuf>,
    pub silent: bool,
}

impl Default for HubOptions {
    fn default() -> Self {
        Self {
            token_source: TokenSource::CacheToken,
            revision: None,
            cache_dir: None,
            silent: true,
        }
    }
}

impl HubOptions {
    pub fn with_token_source(mut self, token_source: TokenSource) -> Self {
        self.token_source = token_source;
        self
    }

    pub fn with_revision(mut self, revision: impl ToString) -> Self {
        self.revision = Some(revision.to_string());
        self
    }

    pub fn with_cache_dir(mut self, cache_dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = Some(cache_dir.into());
        self
    }

    pub fn with_progress(mut self) -> Self {
        self.silent = false;
        self
    }

    fn repo(&self, model_id: &str) -> Result<ApiRepo> {
        let mut api = ApiBuilder::new()
            .with_progress(!self.silent)
            .with_token(get_token(&self.token_source)?);
        if let Some(cache_dir) = &self.cache_dir {
            api = api.with_cache_dir(cache_dir.clone());
        } else if let Ok(x) = env::var("HF_HUB_CACHE") {
            api = api.with_cache_dir(x.into());
        }
        let api = api.build()?;
        let revision = self.revision.clone().unwrap_or_else(|| "main".to_string());
        Ok(api.repo(Repo::with_revision(
            model_id.to_string(),
            RepoType::Model,
            revision,
        )))
    }
}

/// Resolve `file` for `model_id`. A `model_id` that exists on disk is treated as a local
/// model directory and the Hub is never contacted.
pub fn api_get_file(model_id: &str, file: &str, opts: &HubOptions) -> Result<PathBuf> {
    let local = Path::new(model_id);
    if local.exists() {
        let path = local.join(file);
        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                model_id: local.display().to_string(),
                path: file.to_string(),
            });
        }
        info!("Loading `{file}` locally at `{}`", path.display());
        return Ok(path);
    }
    Ok(opts.repo(model_id)?.get(file)?)
}

/// Read the raw `config.json` of a local model directory or Hub repo.
pub fn load_config_json(model_id: &str, opts: &HubOptions) -> Result<String> {
    let path = api_get_file(model_id, CONFIG_NAME, opts)?;
    Ok(fs::read_to_string(path)?)
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::{load_config_json, HubOptions, TokenSource, CONFIG_NAME};
    use crate::error::ConfigError;

    #[test]
    fn token_source_parsing() {
        assert_eq!(
            TokenSource::from_str("literal:abc").unwrap(),
            TokenSource::Literal("abc".to_string())
        );
        assert_eq!(
            TokenSource::from_str("env").unwrap(),
            TokenSource::EnvVar("HUGGING_FACE_HUB_TOKEN".to_string())
        );
        assert_eq!(
            TokenSource::from_str("env:MY_TOKEN").unwrap(),
            TokenSource::EnvVar("MY_TOKEN".to_string())
        );
        assert_eq!(
            TokenSource::from_str("path:/tmp/token").unwrap(),
            TokenSource::Path("/tmp/token".to_string())
        );
        assert_eq!(TokenSource::from_str("cache").unwrap(), TokenSource::CacheToken);
        assert_eq!(TokenSource::from_str("none").unwrap(), TokenSource::None);
        assert!(TokenSource::from_str("literal").is_err());
        assert!(TokenSource::from_str("bogus").is_err());
    }

    #[test]
    fn token_source_display_parses_back() {
        for source in [
            TokenSource::Literal("x:y".to_string()),
            TokenSource::EnvVar("HF".to_string()),
            TokenSource::Path("/a/b".to_string()),
            TokenSource::CacheToken,
            TokenSource::None,
        ] {
            assert_eq!(TokenSource::from_str(&source.to_string()).unwrap(), source);
        }
    }

    #[test]
    fn hub_options_defaults() {
        let opts = HubOptions::default();
        assert_eq!(opts.token_source, TokenSource::CacheToken);
        assert!(opts.revision.is_none());
        assert!(opts.silent);

        let opts = opts.with_revision("v1").with_progress();
        assert_eq!(opts.revision.as_deref(), Some("v1"));
        assert!(!opts.silent);
    }

    #[test]
    fn loads_local_config() {
        let dir = std::env::temp_dir().join(format!("vanrs-hub-local-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(CONFIG_NAME), "{\"model_type\": \"van\"}").unwrap();

        let raw = load_config_json(dir.to_str().unwrap(), &HubOptions::default()).unwrap();
        std::fs::remove_dir_all(&dir).unwrap();
        assert_eq!(raw, "{\"model_type\": \"van\"}");
    }

    #[test]
    fn local_dir_without_config_is_an_error() {
        let dir = std::env::temp_dir().join(format!("vanrs-hub-empty-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();

        let err = load_config_json(dir.to_str().unwrap(), &HubOptions::default()).unwrap_err();
        std::fs::remove_dir_all(&dir).unwrap();
        assert!(matches!(err, ConfigError::FileNotFound { ref path, .. } if path == CONFIG_NAME));
    }
}
