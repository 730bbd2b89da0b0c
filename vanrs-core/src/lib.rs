#![deny(clippy::cast_possible_truncation, clippy::cast_precision_loss)]

mod activation;
mod auto;
mod error;
mod hub;
mod pretrained;
mod utils;
mod vision_models;

pub use activation::{Activation, ActivationFn, CustomActivation, HiddenAct};
pub use auto::{AutoConfig, ConfigType};
pub use error::{ConfigError, Result};
pub use hub::{api_get_file, load_config_json, HubOptions, TokenSource, CONFIG_NAME};
pub use pretrained::{ModelConfig, PretrainedConfig, ProblemType};
pub use utils::tokens::TokenRetrievalError;
pub use vision_models::van::{VanConfig, VAN_PRETRAINED_CONFIG_ARCHIVE_MAP};
