mod config;

pub use config::{VanConfig, VAN_PRETRAINED_CONFIG_ARCHIVE_MAP};
