//! Paddock — access-control service for the Paddock cycling-team platform.
//!
//! Paddock owns who may see and who may change each section of the team
//! application (roster, events, planning, scouting, stocks, ...):
//!
//! - **Role catalog**: named permission bundles, including the protected
//!   built-in Administrator role
//! - **Base matrix**: per-role, per-section default grants
//! - **Overrides**: per-user exceptions that replace (not merge with) the
//!   base matrix per section
//! - **Resolver**: the pure function combining all three into effective
//!   permissions, with `edit ⟹ view` guaranteed throughout
//! - **Admin API**: a small hyper-based HTTP surface the permission UI
//!   talks to
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use paddock::{AccessModule, AccessStore, ConfigLoader, Module, Router};
//!
//! #[tokio::main]
//! async fn main() -> paddock::Result<()> {
//!     // Load config
//!     let loader = ConfigLoader::new("PADDOCK");
//!     let config = loader.load(None, None, None, None)?;
//!
//!     // Seed the store, or start with just the Administrator role
//!     let store = Arc::new(match &config.store.seed {
//!         Some(path) => AccessStore::from_seed_file(path)?,
//!         None => AccessStore::new(),
//!     });
//!
//!     // Build router
//!     let mut router = Router::new();
//!     AccessModule::new().routes(&mut router);
//!
//!     // Run server
//!     paddock::server::run(config, store, router.into_handle()).await
//! }
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod grants;
pub mod level;
pub mod module;
pub mod rate_limit;
pub mod resolver;
pub mod response;
pub mod role;
pub mod router;
pub mod section;
pub mod server;
pub mod store;

// Re-export main types at crate root
pub use api::AccessModule;
pub use config::{Config, ConfigLoader};
pub use error::{Error, Result};
pub use grants::{BaseMatrix, GrantMap};
pub use level::{Level, LevelSet};
pub use module::Module;
pub use resolver::{Effective, User, UserId, resolve_effective};
pub use role::{Role, RoleCatalog, RoleId};
pub use router::{Context, Router};
pub use section::{Category, Section};
pub use store::AccessStore;

// Re-export commonly used dependencies for convenience
pub use hyper::Method;
pub use serde_json::json;
