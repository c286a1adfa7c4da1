//! Configuration module.
//!
//! Handles the `[unfold]` settings file and its lookup locations.

mod settings;

pub use settings::{
    AliasCollisionPolicy, Settings, SettingsError, UnfoldSettings, CONFIG_ENV_VAR,
    LOCAL_CONFIG_FILE,
};
