//! Data models: search mode, platform description and configuration.

mod config;
mod mode;
mod platform;

pub use config::{BehaviorConfig, ConfigError, DisplayConfig, FormConfig, FunkConfig, SystemConfig};
pub use mode::{InputType, Mode};
pub use platform::{DEFAULT_PLATFORM_NAME, Platform, SiteSpec};
