/// Router Module Index
///
/// Routes are grouped by access level rather than by entity, so that access control is
/// applied once per module (via Axum route layers) and never per handler.
///
/// Both modules register paths relative to the `/api/v1` prefix applied in `create_router`.

/// Routes open to anonymous clients: catalogue reads and, unless protected by
/// configuration, role management.
pub mod public;

/// Routes behind `authenticate` + `require_role(admin)`.
pub mod admin;
