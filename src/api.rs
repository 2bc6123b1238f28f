//! HTTP admin API for the access-control store.
//!
//! The permission-editing UI talks to these routes: the role catalog and its
//! grants under `/api/v1/roles`, user records and overrides under
//! `/api/v1/users`, and the section listing the UI uses to lay out the
//! permission grid. Authentication is handled upstream by the platform
//! gateway — this module assumes an already-authorized administrator.

use hyper::StatusCode;
use serde::{Deserialize, Serialize};

use crate::grants::GrantMap;
use crate::level::Level;
use crate::module::Module;
use crate::response;
use crate::role::{Role, RoleId};
use crate::router::Router;
use crate::section::{Category, Section};

/// The access-control API module.
///
/// Stateless: handlers reach the shared [`crate::store::AccessStore`]
/// through the request [`crate::router::Context`], which the server fills
/// in per request.
#[derive(Default)]
pub struct AccessModule;

impl AccessModule {
    pub fn new() -> AccessModule {
        AccessModule
    }
}

#[derive(Serialize)]
struct SectionInfo {
    id: Section,
    category: Category,
    in_permission_ui: bool,
}

#[derive(Serialize)]
struct CatalogResponse {
    version: u64,
    roles: Vec<Role>,
}

#[derive(Serialize)]
struct GrantsResponse {
    version: u64,
    grants: GrantMap,
}

#[derive(Deserialize)]
struct RoleNameRequest {
    name: String,
}

#[derive(Deserialize)]
struct GrantToggleRequest {
    section: Section,
    level: Level,
    enabled: bool,
    /// Configuration version the client read before editing. When present,
    /// a mismatch yields 409 instead of silently overwriting a concurrent
    /// administrator's change.
    #[serde(default)]
    version: Option<u64>,
}

#[derive(Deserialize)]
struct OverrideToggleRequest {
    section: Section,
    level: Level,
    enabled: bool,
}

#[derive(Deserialize)]
struct CreateUserRequest {
    name: String,
    #[serde(default)]
    role: Option<RoleId>,
}

#[derive(Deserialize)]
struct AssignRoleRequest {
    role: RoleId,
}

impl Module for AccessModule {
    fn name(&self) -> &'static str {
        "access"
    }

    fn routes(&self, router: &mut Router) {
        // Sections are static; no store needed.
        router.get("/api/v1/sections", |_ctx| async move {
            let sections: Vec<SectionInfo> = Section::ALL
                .into_iter()
                .map(|id| SectionInfo {
                    id,
                    category: id.category(),
                    in_permission_ui: id.in_permission_ui(),
                })
                .collect();
            response::ok(&sections)
        });

        router.get("/api/v1/roles", |ctx| async move {
            response::ok(&CatalogResponse {
                version: ctx.store.version(),
                roles: ctx.store.roles(),
            })
        });

        router.post("/api/v1/roles", |ctx| async move {
            let req: RoleNameRequest = ctx.json()?;
            let role = ctx.store.create_role(&req.name)?;
            response::created(&role)
        });

        router.patch("/api/v1/roles/{id}", |ctx| async move {
            let id = ctx.role_param("id")?;
            let req: RoleNameRequest = ctx.json()?;
            let role = ctx.store.rename_role(id, &req.name)?;
            response::ok(&role)
        });

        router.delete("/api/v1/roles/{id}", |ctx| async move {
            let id = ctx.role_param("id")?;
            ctx.store.delete_role(id)?;
            Ok(response::no_content())
        });

        router.get("/api/v1/roles/{id}/grants", |ctx| async move {
            let id = ctx.role_param("id")?;
            let grants = ctx.store.grants_for(id)?;
            response::ok(&GrantsResponse {
                version: ctx.store.version(),
                grants,
            })
        });

        router.put("/api/v1/roles/{id}/grants", |ctx| async move {
            let id = ctx.role_param("id")?;
            let req: GrantToggleRequest = ctx.json()?;
            let grants =
                ctx.store
                    .set_role_grant(id, req.section, req.level, req.enabled, req.version)?;
            response::ok(&GrantsResponse {
                version: ctx.store.version(),
                grants,
            })
        });

        router.post("/api/v1/users", |ctx| async move {
            let req: CreateUserRequest = ctx.json()?;
            let user = ctx.store.create_user(&req.name, req.role)?;
            response::created(&user)
        });

        router.get("/api/v1/users/{id}", |ctx| async move {
            let id = ctx.user_param("id")?;
            response::ok(&ctx.store.user(id)?)
        });

        router.put("/api/v1/users/{id}/role", |ctx| async move {
            let id = ctx.user_param("id")?;
            let req: AssignRoleRequest = ctx.json()?;
            response::ok(&ctx.store.assign_role(id, req.role)?)
        });

        router.put("/api/v1/users/{id}/overrides", |ctx| async move {
            let id = ctx.user_param("id")?;
            let req: OverrideToggleRequest = ctx.json()?;
            let overrides = ctx
                .store
                .set_user_override(id, req.section, req.level, req.enabled)?;
            response::json(StatusCode::OK, &overrides)
        });

        router.delete("/api/v1/users/{id}/overrides/{section}", |ctx| async move {
            let id = ctx.user_param("id")?;
            let section = ctx.section_param("section")?;
            let overrides = ctx.store.clear_user_override(id, section)?;
            response::ok(&overrides)
        });

        router.get("/api/v1/users/{id}/permissions", |ctx| async move {
            let id = ctx.user_param("id")?;
            response::ok(&ctx.store.resolve(id)?)
        });
    }
}
