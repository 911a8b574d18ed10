/// API route handlers
///
/// Handlers parse and validate the request, then hand off to
/// `portal_shared::services`. They never build a tenant scope themselves; the
/// services derive it from the `AuthContext` the auth layer attached.
///
/// - `health`: liveness and database ping
/// - `auth`: register, login, current identity
/// - `workspace`: workspace details, settings, members
/// - `clients`, `projects`, `tasks`: portfolio endpoints

pub mod auth;
pub mod clients;
pub mod health;
pub mod projects;
pub mod tasks;
pub mod workspace;

use serde::{de::IgnoredAny, Deserialize, Deserializer};

/// Accepts and discards a client-supplied `workspaceId`
///
/// Request bodies deny unknown fields except this one, which is accepted and
/// never read. The workspace always comes from the session token.
pub(crate) type IgnoredWorkspaceId = Option<IgnoredAny>;

/// Distinguishes an absent field (`None`) from an explicit `null` (`Some(None)`)
pub(crate) fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
