use std::{
    env, fs,
    path::{Path, PathBuf},
};
use thiserror::Error;

use tracing::info;

use crate::hub::TokenSource;

#[derive(Error, Debug)]
pub enum TokenRetrievalError {
    #[error("No home directory.")]
    HomeDirectoryMissing,
}

/// Location of the token written by `huggingface-cli login`.
pub(crate) fn hf_token_path() -> Option<PathBuf> {
    if let Ok(hf_home) = env::var("HF_HOME") {
        return Some(PathBuf::from(hf_home).join("token"));
    }
    dirs::home_dir().map(|home| home.join(".cache").join("huggingface").join("token"))
}

/// Environment variables checked, in order, before the cached token file.
const TOKEN_ENV_VARS: [&str; 2] = ["HF_TOKEN", "HF_HUB_TOKEN"];

fn from_env(var: &str) -> Option<String> {
    env::var(var).ok().filter(|token| !token.trim().is_empty())
}

fn from_file(path: &Path) -> Option<String> {
    fs::read_to_string(path).ok()
}

/// Resolve the token for `source`, trimmed. A source that cannot be read is logged and
/// treated as anonymous access; only a missing home directory is an error.
pub(crate) fn get_token(source: &TokenSource) -> Result<Option<String>, TokenRetrievalError> {
    let (token, origin) = match source {
        TokenSource::None => return Ok(None),
        TokenSource::Literal(data) => (Some(data.clone()), "a literal".to_string()),
        TokenSource::EnvVar(var) => (from_env(var), format!("${var}")),
        TokenSource::Path(path) => (from_file(Path::new(path)), path.clone()),
        TokenSource::CacheToken => match TOKEN_ENV_VARS.iter().find_map(|var| from_env(var)) {
            Some(token) => (Some(token), TOKEN_ENV_VARS.join(" or ")),
            None => {
                let path = hf_token_path().ok_or(TokenRetrievalError::HomeDirectoryMissing)?;
                (from_file(&path), path.display().to_string())
            }
        },
    };

    if token.is_none() {
        info!("No HF token found at {origin}, continuing without one.");
    }
    Ok(token.map(|token| token.trim().to_string()))
}
