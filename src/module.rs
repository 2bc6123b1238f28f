//! Module trait for pluggable API modules.
//!
//! Modules implement the `Module` trait to register their routes with the
//! server. The access-control API in [`crate::api`] is one such module; a
//! deployment can mount additional modules (health checks, platform
//! endpoints) next to it.
//!
//! # Example
//!
//! ```ignore
//! use paddock::{Module, Router, Result};
//!
//! pub struct HealthModule;
//!
//! impl Module for HealthModule {
//!     fn name(&self) -> &'static str {
//!         "health"
//!     }
//!
//!     fn routes(&self, router: &mut Router) {
//!         router.get("/health", |_ctx| async move {
//!             paddock::response::ok(&serde_json::json!({
//!                 "status": "ok"
//!             }))
//!         });
//!     }
//! }
//! ```

use crate::router::Router;

/// A pluggable API module.
///
/// Modules register their routes with the router and can hold their own
/// state, captured in closures when registering routes.
pub trait Module: Send + Sync {
    /// Module name for identification and logging.
    fn name(&self) -> &'static str;

    /// Register routes with the router.
    fn routes(&self, router: &mut Router);
}
