/// Database models for the client portal
///
/// Each model owns its SQL. Every query on a tenant-owned table filters or
/// stamps `workspace_id`; callers outside the crate reach these through
/// [`crate::store::PortalStore`], which supplies that id from a tenant scope.
///
/// # Models
///
/// - `workspace`: tenants
/// - `user`: principals and their roles
/// - `client`: customer records
/// - `project`: projects run for a client
/// - `task`: work items inside a project
/// - `comment`: discussion on a project

pub mod client;
pub mod comment;
pub mod project;
pub mod task;
pub mod user;
pub mod workspace;
