//! Asynchronous client for XIVAPI.
//!
//! # Overview
//! Wraps the I/O-free `xivapi-core` builder with a pluggable `Transport`
//! (reqwest by default), a timing wrapper around every operation and an
//! optionally injected `tracing` subscriber.
//!
//! ```no_run
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! use xivapi::{Config, IndexSearch, XivApi};
//!
//! let api = XivApi::from_config(&Config::from_env()?);
//! let character = api.character_search("Phoenix", "Lethys", "Luculentus", 1).await?;
//! let recipes = api
//!     .index_search("Crimson Cider", ["Recipe"], ["ID", "Name"], &IndexSearch::default())
//!     .await?;
//! # let _ = (character, recipes);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod timing;
pub mod transport;

pub use client::{ApiResult, XivApi};
pub use config::{Config, ConfigError};
pub use timing::timed;
pub use transport::Transport;
pub use xivapi_core::{
    ApiError, CharacterOptions, Comparison, Filter, FreeCompanyOptions, IndexSearch, Language,
    LodestoneFeed, NameSet, Sort, StringAlgo,
};
