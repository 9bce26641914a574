//! Configuration loading for the forum client.
//!
//! Config is read from `forum.{toml,yaml,yml,json}` with `${ENV}` placeholders
//! substituted before parsing. Missing files and missing keys fall back to
//! defaults.

pub mod env_subst;
pub mod loader;
pub mod schema;

pub use {
    loader::{
        clear_config_dir, config_dir, discover_and_load, find_config_file, load_config,
        set_config_dir,
    },
    schema::{AlertsConfig, DEFAULT_SERVER_ERROR_MESSAGE, ForumConfig, HttpConfig},
};
