pub mod loader;
pub mod validator;

pub use loader::{ConfigLoader, ConfigSource, EnvOverrides};
pub use validator::ConfigValidator;
