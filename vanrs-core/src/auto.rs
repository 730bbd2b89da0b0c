use std::{fmt, str::FromStr};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{
    error::{ConfigError, Result},
    hub::{load_config_json, HubOptions},
    pretrained::{ModelConfig, PretrainedConfig},
    utils::log::once_log_info,
    vision_models::van::VanConfig,
};

#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq, Hash)]
/// The kind of configuration, keyed by the `model_type` string.
pub enum ConfigType {
    #[serde(rename = "van")]
    Van,
}

impl ConfigType {
    pub const ALL: &'static [ConfigType] = &[ConfigType::Van];

    pub fn known_names() -> String {
        Self::ALL
            .iter()
            .map(|tp| format!("`{tp}`"))
            .collect::<Vec<_>>()
            .join(", ")
    }

    // https://github.com/huggingface/transformers/blob/v4.20.0/src/transformers/models/auto/modeling_auto.py
    pub fn from_architecture_name(name: &str) -> Result<Self> {
        match name {
            "VanModel" | "VanForImageClassification" => Ok(Self::Van),
            other => Err(ConfigError::UnknownArchitecture(other.to_string())),
        }
    }

    fn parse(model_type: &str) -> Result<Self> {
        Self::from_str(model_type).map_err(|_| ConfigError::UnknownModelType {
            model_type: model_type.to_string(),
            known: Self::known_names(),
        })
    }
}

impl FromStr for ConfigType {
    type Err = String;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "van" => Ok(Self::Van),
            a => Err(format!(
                "Unknown model type `{a}`. Possible model types: {}.",
                Self::known_names()
            )),
        }
    }
}

impl fmt::Display for ConfigType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConfigType::Van => VanConfig::MODEL_TYPE,
        };
        write!(f, "{name}")
    }
}

#[derive(Deserialize)]
struct AutoConfigHeader {
    #[serde(default)]
    model_type: Option<String>,
    #[serde(default)]
    architectures: Option<Vec<String>>,
}

/// A configuration of any registered kind, selected from its `model_type`.
#[derive(Debug, Clone, PartialEq)]
pub enum AutoConfig {
    Van(VanConfig),
}

impl AutoConfig {
    pub fn config_type(&self) -> ConfigType {
        match self {
            Self::Van(_) => ConfigType::Van,
        }
    }

    pub fn base(&self) -> &PretrainedConfig {
        match self {
            Self::Van(cfg) => cfg.base(),
        }
    }

    pub fn base_mut(&mut self) -> &mut PretrainedConfig {
        match self {
            Self::Van(cfg) => cfg.base_mut(),
        }
    }

    pub fn as_van(&self) -> Option<&VanConfig> {
        match self {
            Self::Van(cfg) => Some(cfg),
        }
    }

    /// Defaults of `model_type` overridden by `kwargs`.
    pub fn for_model(model_type: &str, kwargs: IndexMap<String, Value>) -> Result<Self> {
        match ConfigType::parse(model_type)? {
            ConfigType::Van => Ok(Self::Van(VanConfig::from_kwargs(kwargs)?)),
        }
    }

    /// Select the kind from the `model_type` key, or else from a single `architectures` entry.
    pub fn from_dict(dict: Value) -> Result<Self> {
        let header: AutoConfigHeader = serde_json::from_value(dict.clone())?;
        let tp = match (header.model_type, header.architectures.as_deref()) {
            (Some(model_type), _) => ConfigType::parse(&model_type)?,
            (None, Some([name])) => ConfigType::from_architecture_name(name)?,
            (None, _) => {
                return Err(ConfigError::UnknownModelType {
                    model_type: "(none)".to_string(),
                    known: ConfigType::known_names(),
                })
            }
        };

        once_log_info(format!("Automatic configuration type determined to be `{tp}`"));

        match tp {
            ConfigType::Van => Ok(Self::Van(VanConfig::from_dict(dict)?)),
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Self::from_dict(serde_json::from_str(json)?)
    }

    pub fn from_pretrained(model_id: &str, opts: &HubOptions) -> Result<Self> {
        let mut config = Self::from_json_str(&load_config_json(model_id, opts)?)?;
        config.base_mut().name_or_path = model_id.to_string();
        Ok(config)
    }

    pub fn to_dict(&self) -> Result<Map<String, Value>> {
        match self {
            Self::Van(cfg) => cfg.to_dict(),
        }
    }
}

impl From<VanConfig> for AutoConfig {
    fn from(cfg: VanConfig) -> Self {
        Self::Van(cfg)
    }
}
