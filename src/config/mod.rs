//! Configuration management for unlatch
//!
//! Settings are layered with figment: embedded defaults, user config,
//! project config (or `--config FILE`), `UNLATCH_` environment variables,
//! then command line flags. [`UnlatchConfig::settings`] extracts the typed
//! [`Settings`] the engine consumes.

pub mod core;
pub mod settings;
pub mod smart_load;

// Re-export main types for easier access
pub use self::core::UnlatchConfig;
pub use settings::{
    ExecutionMode, OutputSettings, ProgressSettings, SearchSettings, SegmentSpec, Settings,
    StageSpec,
};
