//! Typed configuration for the VAN (Visual Attention Network) backbone.
//!
//! ```no_run
//! use vanrs::{ModelConfig, VanConfigBuilder};
//!
//! let config = VanConfigBuilder::new()
//!     .with_hidden_sizes(vec![32, 64, 160, 256])
//!     .with_depths(vec![3, 3, 5, 2])
//!     .with_extra("dataset", "imagenet-1k")
//!     .build();
//! config.save_pretrained("van-tiny").unwrap();
//! ```

mod van_config_builder;

pub use van_config_builder::VanConfigBuilder;
pub use vanrs_core::{
    api_get_file, load_config_json, Activation, ActivationFn, AutoConfig, ConfigError, ConfigType,
    CustomActivation, HiddenAct, HubOptions, ModelConfig, PretrainedConfig, ProblemType, Result,
    TokenRetrievalError, TokenSource, VanConfig, CONFIG_NAME, VAN_PRETRAINED_CONFIG_ARCHIVE_MAP,
};
