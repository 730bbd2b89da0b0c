pub(crate) mod log;
pub(crate) mod tokens;

/// Declare a zero-argument function returning a default, for use with `#[serde(default = "...")]`.
#[macro_export]
macro_rules! serde_default_fn {
    ($t:ty, $name:ident, $v:expr) => {
        fn $name() -> $t {
            $v
        }
    };
}
