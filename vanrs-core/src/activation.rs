use std::{fmt, str::FromStr, sync::Arc};

use serde::{Deserialize, Serialize};

/// The activation functions the VAN blocks know by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Activation {
    #[default]
    Gelu,
    Relu,
    Selu,
    #[serde(rename = "gelu_new")]
    GeluNew,
}

impl Activation {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Gelu => "gelu",
            Self::Relu => "relu",
            Self::Selu => "selu",
            Self::GeluNew => "gelu_new",
        }
    }
}

impl FromStr for Activation {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "gelu" => Ok(Self::Gelu),
            "relu" => Ok(Self::Relu),
            "selu" => Ok(Self::Selu),
            "gelu_new" => Ok(Self::GeluNew),
            a => Err(format!(
                "Unknown activation `{a}`. Possible activations: `gelu`, `relu`, `selu`, `gelu_new`."
            )),
        }
    }
}

impl fmt::Display for Activation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

pub type ActivationFn = Arc<dyn Fn(f64) -> f64 + Send + Sync>;

/// A user supplied activation. Only its name is written out when serialized.
#[derive(Clone)]
pub struct CustomActivation {
    name: String,
    func: ActivationFn,
}

impl CustomActivation {
    pub fn new(name: impl ToString, func: impl Fn(f64) -> f64 + Send + Sync + 'static) -> Self {
        Self {
            name: name.to_string(),
            func: Arc::new(func),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn func(&self) -> &ActivationFn {
        &self.func
    }

    pub fn apply(&self, x: f64) -> f64 {
        (self.func)(x)
    }
}

impl fmt::Debug for CustomActivation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomActivation")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

// Two custom activations are equal only if they share the same closure.
impl PartialEq for CustomActivation {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && Arc::ptr_eq(&self.func, &other.func)
    }
}

/// The `hidden_act` of a configuration: a known activation, any other name, or a callable.
///
/// Names are never rejected. An unrecognized name is carried as [`HiddenAct::Other`]
/// and it is up to the model code to decide what to do with it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum HiddenAct {
    Named(Activation),
    Other(String),
    Custom(CustomActivation),
}

impl HiddenAct {
    pub fn name(&self) -> &str {
        match self {
            Self::Named(act) => act.as_str(),
            Self::Other(name) => name,
            Self::Custom(custom) => custom.name(),
        }
    }

    /// The known activation, if this is one.
    pub fn activation(&self) -> Option<Activation> {
        match self {
            Self::Named(act) => Some(*act),
            Self::Other(_) | Self::Custom(_) => None,
        }
    }
}

impl Default for HiddenAct {
    fn default() -> Self {
        Self::Named(Activation::default())
    }
}

impl From<String> for HiddenAct {
    fn from(name: String) -> Self {
        match name.parse::<Activation>() {
            Ok(act) => Self::Named(act),
            Err(_) => Self::Other(name),
        }
    }
}

impl From<&str> for HiddenAct {
    fn from(name: &str) -> Self {
        Self::from(name.to_string())
    }
}

impl From<Activation> for HiddenAct {
    fn from(act: Activation) -> Self {
        Self::Named(act)
    }
}

impl From<CustomActivation> for HiddenAct {
    fn from(custom: CustomActivation) -> Self {
        Self::Custom(custom)
    }
}

impl From<HiddenAct> for String {
    fn from(act: HiddenAct) -> Self {
        match act {
            HiddenAct::Other(name) => name,
            other => other.name().to_string(),
        }
    }
}

impl fmt::Display for HiddenAct {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
