use std::{
    collections::HashSet,
    fs,
    path::{Path, PathBuf},
};

use indexmap::IndexMap;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::{
    error::{json_kind, ConfigError, Result},
    hub::{load_config_json, HubOptions, CONFIG_NAME},
    serde_default_fn,
};

pub(crate) const MODEL_TYPE_KEY: &str = "model_type";
const NUM_LABELS_KEY: &str = "num_labels";
const ID2LABEL_KEY: &str = "id2label";
const LABEL2ID_KEY: &str = "label2id";

serde_default_fn!(bool, d_true, true);
serde_default_fn!(IndexMap<String, String>, d_id2label, id2label_for(2));
serde_default_fn!(IndexMap<String, usize>, d_label2id, label2id_for(2));

fn id2label_for(num_labels: usize) -> IndexMap<String, String> {
    (0..num_labels)
        .map(|i| (i.to_string(), format!("LABEL_{i}")))
        .collect()
}

fn label2id_for(num_labels: usize) -> IndexMap<String, usize> {
    (0..num_labels).map(|i| (format!("LABEL_{i}"), i)).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProblemType {
    Regression,
    SingleLabelClassification,
    MultiLabelClassification,
}

/// Metadata shared by every model configuration.
///
/// `id2label` keeps the string keys of the JSON form (`"0"`, `"1"`, ...).
/// Every key the concrete configuration and this struct do not declare is kept in
/// `extra`, in insertion order, and written back out unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PretrainedConfig {
    #[serde(rename = "_name_or_path", default)]
    pub name_or_path: String,
    #[serde(default)]
    pub architectures: Option<Vec<String>>,
    #[serde(default)]
    pub finetuning_task: Option<String>,
    #[serde(default = "d_id2label")]
    pub id2label: IndexMap<String, String>,
    #[serde(default = "d_label2id")]
    pub label2id: IndexMap<String, usize>,
    #[serde(default)]
    pub problem_type: Option<ProblemType>,
    #[serde(default = "d_true")]
    pub return_dict: bool,
    #[serde(default)]
    pub output_hidden_states: bool,
    #[serde(default)]
    pub output_attentions: bool,
    #[serde(default)]
    pub torch_dtype: Option<String>,
    #[serde(default = "d_true")]
    pub tie_word_embeddings: bool,
    #[serde(default)]
    pub is_encoder_decoder: bool,
    #[serde(default)]
    pub chunk_size_feed_forward: usize,
    #[serde(default)]
    pub transformers_version: Option<String>,
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

impl Default for PretrainedConfig {
    fn default() -> Self {
        Self {
            name_or_path: String::new(),
            architectures: None,
            finetuning_task: None,
            id2label: d_id2label(),
            label2id: d_label2id(),
            problem_type: None,
            return_dict: true,
            output_hidden_states: false,
            output_attentions: false,
            torch_dtype: None,
            tie_word_embeddings: true,
            is_encoder_decoder: false,
            chunk_size_feed_forward: 0,
            transformers_version: None,
            extra: IndexMap::new(),
        }
    }
}

impl PretrainedConfig {
    pub fn num_labels(&self) -> usize {
        self.id2label.len()
    }

    /// Replace both label maps with `num_labels` generic `LABEL_i` entries.
    pub fn set_num_labels(&mut self, num_labels: usize) {
        self.id2label = id2label_for(num_labels);
        self.label2id = label2id_for(num_labels);
    }

    pub fn get_extra(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }

    /// Store an undeclared key. A key that names a declared field never overrides that field
    /// when serialized; use [`ModelConfig::set_kwarg`] to route it to the field instead.
    pub fn set_extra(&mut self, key: impl ToString, value: impl Into<Value>) -> Option<Value> {
        self.extra.insert(key.to_string(), value.into())
    }
}

fn into_object(value: Value) -> Result<Map<String, Value>> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(ConfigError::NotAnObject(json_kind(&other))),
    }
}

/// Rebuild every object with its keys in lexicographic order.
fn sort_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|(a, _), (b, _)| a.cmp(b));
            Value::Object(
                entries
                    .into_iter()
                    .map(|(key, value)| (key, sort_keys(value)))
                    .collect(),
            )
        }
        Value::Array(values) => Value::Array(values.into_iter().map(sort_keys).collect()),
        other => other,
    }
}

/// Behavior shared by every model configuration: dictionary and JSON conversion,
/// file I/O and loading from a model directory or the Hub.
///
/// Implementors only declare their fields (with serde defaults), a flattened
/// [`PretrainedConfig`] and the short model type string.
pub trait ModelConfig: Serialize + DeserializeOwned + Default + Clone {
    /// Short identifier written to the `model_type` key.
    const MODEL_TYPE: &'static str;

    fn base(&self) -> &PretrainedConfig;
    fn base_mut(&mut self) -> &mut PretrainedConfig;

    /// Known pretrained names and the location of their `config.json`.
    fn pretrained_config_archive_map() -> &'static [(&'static str, &'static str)] {
        &[]
    }

    fn pretrained_config_url(name: &str) -> Option<&'static str> {
        Self::pretrained_config_archive_map()
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, url)| *url)
    }

    /// Every declared field, every base field and every extra key, plus `model_type`.
    ///
    /// Declared fields win over extra entries of the same name.
    fn to_dict(&self) -> Result<Map<String, Value>> {
        let mut declared = self.clone();
        let extra = std::mem::take(&mut declared.base_mut().extra);
        let mut dict = into_object(serde_json::to_value(&declared)?)?;
        dict.insert(
            MODEL_TYPE_KEY.to_string(),
            Value::String(Self::MODEL_TYPE.to_string()),
        );
        for (key, value) in extra {
            if dict.contains_key(&key) {
                warn!("Extra key `{key}` shadows a declared field and is not serialized.");
            } else {
                dict.insert(key, value);
            }
        }
        Ok(dict)
    }

    /// Keys written by `to_dict` for a configuration without extra entries.
    fn declared_keys() -> Result<HashSet<String>> {
        Ok(Self::default()
            .to_dict()?
            .into_iter()
            .map(|(key, _)| key)
            .collect())
    }

    /// Set one named value. A declared field (or `num_labels`) goes through
    /// [`ModelConfig::update`]; anything else is stored in [`PretrainedConfig::extra`].
    fn set_kwarg(&mut self, key: &str, value: Value) -> Result<()> {
        if key == NUM_LABELS_KEY || Self::declared_keys()?.contains(key) {
            let mut kwargs = IndexMap::new();
            kwargs.insert(key.to_string(), value);
            self.update(kwargs)
        } else {
            self.base_mut().set_extra(key, value);
            Ok(())
        }
    }

    /// Only the entries that differ from `Self::default()`. `model_type` is always kept.
    fn to_diff_dict(&self) -> Result<Map<String, Value>> {
        let defaults = Self::default().to_dict()?;
        Ok(self
            .to_dict()?
            .into_iter()
            .filter(|(key, value)| key == MODEL_TYPE_KEY || defaults.get(key) != Some(value))
            .collect())
    }

    fn to_json_string(&self, use_diff: bool) -> Result<String> {
        let dict = if use_diff {
            self.to_diff_dict()?
        } else {
            self.to_dict()?
        };
        Ok(format!(
            "{}\n",
            serde_json::to_string_pretty(&sort_keys(Value::Object(dict)))?
        ))
    }

    fn to_json_file(&self, path: impl AsRef<Path>, use_diff: bool) -> Result<()> {
        fs::write(path, self.to_json_string(use_diff)?)?;
        Ok(())
    }

    /// Build a configuration from its dictionary form. Missing keys take their defaults and
    /// unknown keys land in [`PretrainedConfig::extra`].
    ///
    /// A `num_labels` entry builds generic label maps unless `id2label` is also given.
    fn from_dict(dict: Value) -> Result<Self> {
        let mut dict = into_object(dict)?;
        if let Some(model_type) = dict.remove(MODEL_TYPE_KEY) {
            if model_type.as_str() != Some(Self::MODEL_TYPE) {
                warn!(
                    "You are using a model of type `{model_type}` to instantiate a model of type `{}`. This is not supported for all configurations of models and can yield errors.",
                    Self::MODEL_TYPE
                );
            }
        }
        let num_labels = dict
            .remove(NUM_LABELS_KEY)
            .map(serde_json::from_value::<usize>)
            .transpose()?;
        let has_id2label = dict.contains_key(ID2LABEL_KEY);
        let mut config: Self = serde_json::from_value(Value::Object(dict))?;
        if let Some(num_labels) = num_labels {
            if !has_id2label {
                config.base_mut().set_num_labels(num_labels);
            } else if config.base().num_labels() != num_labels {
                warn!(
                    "`num_labels` is {num_labels} but `id2label` has {} entries; keeping `id2label`.",
                    config.base().num_labels()
                );
            }
        }
        Ok(config)
    }

    /// Named overrides on top of the defaults. Undeclared names are forwarded to the base metadata.
    fn from_kwargs(kwargs: IndexMap<String, Value>) -> Result<Self> {
        Self::from_dict(Value::Object(kwargs.into_iter().collect()))
    }

    fn from_json_str(json: &str) -> Result<Self> {
        Self::from_dict(serde_json::from_str(json)?)
    }

    fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_json_str(&fs::read_to_string(path)?)
    }

    /// Merge `kwargs` into this configuration.
    ///
    /// This goes through the dictionary form, so a callable activation is replaced by its name.
    fn update(&mut self, kwargs: IndexMap<String, Value>) -> Result<()> {
        let mut dict = self.to_dict()?;
        if kwargs.contains_key(NUM_LABELS_KEY) && !kwargs.contains_key(ID2LABEL_KEY) {
            dict.remove(ID2LABEL_KEY);
            dict.remove(LABEL2ID_KEY);
        }
        dict.extend(kwargs);
        *self = Self::from_dict(Value::Object(dict))?;
        Ok(())
    }

    /// Write `config.json` (non-default entries only) into `save_directory`.
    fn save_pretrained(&self, save_directory: impl AsRef<Path>) -> Result<PathBuf> {
        let save_directory = save_directory.as_ref();
        fs::create_dir_all(save_directory)?;
        let path = save_directory.join(CONFIG_NAME);
        self.to_json_file(&path, true)?;
        info!("Configuration saved in {}", path.display());
        Ok(path)
    }

    /// Load from a local model directory, or from the Hub if `model_id` is not a path.
    fn from_pretrained(model_id: &str, opts: &HubOptions) -> Result<Self> {
        if let Some(url) = Self::pretrained_config_url(model_id) {
            debug!("`{model_id}` is a known pretrained configuration at {url}");
        }
        let mut config = Self::from_json_str(&load_config_json(model_id, opts)?)?;
        config.base_mut().name_or_path = model_id.to_string();
        Ok(config)
    }
}
