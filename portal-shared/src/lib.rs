//! # Client Portal Core
//!
//! Multi-tenant core of the client portal: credentials and sessions, tenant
//! context, the role gate, the tenant-scoped store and the entity operations
//! built on top of it. The HTTP server in `portal-api` is a thin layer over
//! this crate.
//!
//! ## Module Organization
//!
//! - `auth`: password hashing, session tokens, tenant context, role gate
//! - `store`: tenant-scoped repository trait with PostgreSQL and in-memory backends
//! - `services`: entity lifecycle operations
//! - `models`: entities and their SQL queries
//! - `db`: connection pool and migrations
//! - `error`: core error kinds

pub mod auth;
pub mod db;
pub mod error;
pub mod models;
pub mod services;
pub mod store;

/// Current version of the portal core
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
