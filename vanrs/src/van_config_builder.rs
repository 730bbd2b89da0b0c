use serde_json::Value;
use tracing::warn;
use vanrs_core::*;

#[derive(Clone, Debug, Default)]
/// Build a [`VanConfig`] by overriding individual hyperparameters. Anything not set keeps
/// the `van-base` default.
pub struct VanConfigBuilder {
    config: VanConfig,
}

impl VanConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing configuration instead of the defaults.
    pub fn from_config(config: VanConfig) -> Self {
        Self { config }
    }

    pub fn with_num_channels(mut self, num_channels: usize) -> Self {
        self.config.num_channels = num_channels;
        self
    }

    pub fn with_patch_sizes(mut self, patch_sizes: Vec<usize>) -> Self {
        self.config.patch_sizes = patch_sizes;
        self
    }

    pub fn with_strides(mut self, strides: Vec<usize>) -> Self {
        self.config.strides = strides;
        self
    }

    pub fn with_hidden_sizes(mut self, hidden_sizes: Vec<usize>) -> Self {
        self.config.hidden_sizes = hidden_sizes;
        self
    }

    pub fn with_depths(mut self, depths: Vec<usize>) -> Self {
        self.config.depths = depths;
        self
    }

    pub fn with_mlp_expansions(mut self, mlp_expansions: Vec<usize>) -> Self {
        self.config.mlp_expansions = mlp_expansions;
        self
    }

    /// A known [`Activation`], or any activation name.
    pub fn with_hidden_act(mut self, hidden_act: impl Into<HiddenAct>) -> Self {
        self.config.hidden_act = hidden_act.into();
        self
    }

    /// Use a callable as the activation. It is written out by `name` when serialized.
    pub fn with_custom_activation(
        self,
        name: impl ToString,
        func: impl Fn(f64) -> f64 + Send + Sync + 'static,
    ) -> Self {
        self.with_hidden_act(CustomActivation::new(name, func))
    }

    pub fn with_initializer_range(mut self, initializer_range: f64) -> Self {
        self.config.initializer_range = initializer_range;
        self
    }

    pub fn with_layer_norm_eps(mut self, layer_norm_eps: f64) -> Self {
        self.config.layer_norm_eps = layer_norm_eps;
        self
    }

    pub fn with_layer_scale_init_value(mut self, layer_scale_init_value: f64) -> Self {
        self.config.layer_scale_init_value = layer_scale_init_value;
        self
    }

    pub fn with_drop_path_rate(mut self, drop_path_rate: f64) -> Self {
        self.config.drop_path_rate = drop_path_rate;
        self
    }

    pub fn with_dropout_rate(mut self, dropout_rate: f64) -> Self {
        self.config.dropout_rate = dropout_rate;
        self
    }

    pub fn with_image_size(mut self, image_size: usize) -> Self {
        self.config.image_size = image_size;
        self
    }

    /// Set a value by name. Undeclared keys are forwarded to the base metadata; a key naming
    /// a hyperparameter or base field sets that field. A value of the wrong type for a declared
    /// field is logged and ignored.
    pub fn with_extra(mut self, key: impl ToString, value: impl Into<Value>) -> Self {
        let key = key.to_string();
        if let Err(e) = self.config.set_kwarg(&key, value.into()) {
            warn!("Ignoring `{key}`: {e}");
        }
        self
    }

    pub fn with_architectures<S: ToString>(
        mut self,
        architectures: impl IntoIterator<Item = S>,
    ) -> Self {
        self.config.base.architectures =
            Some(architectures.into_iter().map(|a| a.to_string()).collect());
        self
    }

    /// Replace the label maps with `num_labels` generic labels.
    pub fn with_num_labels(mut self, num_labels: usize) -> Self {
        self.config.base.set_num_labels(num_labels);
        self
    }

    pub fn with_name_or_path(mut self, name_or_path: impl ToString) -> Self {
        self.config.base.name_or_path = name_or_path.to_string();
        self
    }

    pub fn build(self) -> VanConfig {
        self.config
    }
}
