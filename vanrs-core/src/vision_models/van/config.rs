use serde::{Deserialize, Serialize};

use crate::{
    activation::HiddenAct,
    error::{ConfigError, Result},
    pretrained::{ModelConfig, PretrainedConfig},
    serde_default_fn,
};

pub static VAN_PRETRAINED_CONFIG_ARCHIVE_MAP: &[(&str, &str)] = &[(
    "van-base",
    "https://huggingface.co/van-base/resolve/main/config.json",
)];

serde_default_fn!(usize, d_num_channels, 3);
serde_default_fn!(Vec<usize>, d_patch_sizes, vec![7, 3, 3, 3]);
serde_default_fn!(Vec<usize>, d_strides, vec![4, 2, 2, 2]);
serde_default_fn!(Vec<usize>, d_hidden_sizes, vec![64, 128, 320, 512]);
serde_default_fn!(Vec<usize>, d_depths, vec![3, 3, 12, 3]);
serde_default_fn!(Vec<usize>, d_mlp_expansions, vec![8, 8, 4, 4]);
serde_default_fn!(HiddenAct, d_hidden_act, HiddenAct::default());
serde_default_fn!(f64, d_initializer_range, 0.02);
serde_default_fn!(f64, d_layer_norm_eps, 1e-12);
serde_default_fn!(f64, d_layer_scale_init_value, 1e-6);
serde_default_fn!(f64, d_drop_path_rate, 0.0);
serde_default_fn!(f64, d_dropout_rate, 0.0);
serde_default_fn!(usize, d_image_size, 224);

/// Configuration of a VAN (Visual Attention Network) backbone.
///
/// The defaults reproduce [van-base](https://huggingface.co/van-base).
/// Values are stored as given: nothing here checks ranges, and the per-stage
/// sequences are not required to have matching lengths. See
/// [`VanConfig::check_stage_lengths`] for an explicit check.
// https://github.com/huggingface/transformers/blob/v4.20.0/src/transformers/models/van/configuration_van.py
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VanConfig {
    /// Number of input channels.
    #[serde(default = "d_num_channels")]
    pub num_channels: usize,
    /// Patch size of the overlapping patch embedding at each stage.
    #[serde(default = "d_patch_sizes")]
    pub patch_sizes: Vec<usize>,
    /// Stride of the patch embedding at each stage.
    #[serde(default = "d_strides")]
    pub strides: Vec<usize>,
    /// Hidden size at each stage.
    #[serde(default = "d_hidden_sizes")]
    pub hidden_sizes: Vec<usize>,
    /// Number of blocks at each stage.
    #[serde(default = "d_depths")]
    pub depths: Vec<usize>,
    /// MLP expansion factor at each stage.
    #[serde(default = "d_mlp_expansions")]
    pub mlp_expansions: Vec<usize>,
    #[serde(default = "d_hidden_act")]
    pub hidden_act: HiddenAct,
    /// Standard deviation of the truncated normal weight initializer.
    #[serde(default = "d_initializer_range")]
    pub initializer_range: f64,
    #[serde(default = "d_layer_norm_eps")]
    pub layer_norm_eps: f64,
    /// Initial value of the per-channel layer scale.
    #[serde(default = "d_layer_scale_init_value")]
    pub layer_scale_init_value: f64,
    /// Stochastic depth rate.
    #[serde(default = "d_drop_path_rate")]
    pub drop_path_rate: f64,
    #[serde(default = "d_dropout_rate")]
    pub dropout_rate: f64,
    #[serde(default = "d_image_size")]
    pub image_size: usize,
    #[serde(flatten)]
    pub base: PretrainedConfig,
}

impl Default for VanConfig {
    fn default() -> Self {
        Self {
            num_channels: d_num_channels(),
            patch_sizes: d_patch_sizes(),
            strides: d_strides(),
            hidden_sizes: d_hidden_sizes(),
            depths: d_depths(),
            mlp_expansions: d_mlp_expansions(),
            hidden_act: d_hidden_act(),
            initializer_range: d_initializer_range(),
            layer_norm_eps: d_layer_norm_eps(),
            layer_scale_init_value: d_layer_scale_init_value(),
            drop_path_rate: d_drop_path_rate(),
            dropout_rate: d_dropout_rate(),
            image_size: d_image_size(),
            base: PretrainedConfig::default(),
        }
    }
}

impl VanConfig {
    /// Number of stages, if every per-stage sequence has the length of `hidden_sizes`.
    ///
    /// Nothing calls this implicitly; mismatched lengths are otherwise accepted.
    pub fn check_stage_lengths(&self) -> Result<usize> {
        let expected = self.hidden_sizes.len();
        for (field, found) in [
            ("patch_sizes", self.patch_sizes.len()),
            ("strides", self.strides.len()),
            ("depths", self.depths.len()),
            ("mlp_expansions", self.mlp_expansions.len()),
        ] {
            if found != expected {
                return Err(ConfigError::StageLengthMismatch {
                    field,
                    expected,
                    found,
                });
            }
        }
        Ok(expected)
    }
}

impl ModelConfig for VanConfig {
    const MODEL_TYPE: &'static str = "van";

    fn base(&self) -> &PretrainedConfig {
        &self.base
    }

    fn base_mut(&mut self) -> &mut PretrainedConfig {
        &mut self.base
    }

    fn pretrained_config_archive_map() -> &'static [(&'static str, &'static str)] {
        VAN_PRETRAINED_CONFIG_ARCHIVE_MAP
    }
}
