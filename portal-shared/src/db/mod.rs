/// Database layer
///
/// - [`pool`]: PostgreSQL connection pool with health checks
/// - [`migrations`]: embedded schema migrations
///
/// Queries live on the model types in [`crate::models`]; the rest of the
/// system reaches them through [`crate::store::postgres::PgStore`].

pub mod migrations;
pub mod pool;
