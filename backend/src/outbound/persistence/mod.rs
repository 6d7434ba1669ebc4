//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Repositories implement the domain's driven ports over a shared `bb8`
//! pool of `diesel-async` connections.
//!
//! - **Thin adapters**: repositories translate between row structs and
//!   domain types; rules live in the domain services.
//! - **Internal models**: `models.rs` and `schema.rs` never leak into the
//!   domain.
//! - **Typed errors**: Diesel and pool failures become the port's
//!   `Connection`/`Query` variants; unique violations become `Duplicate`.
//!
//! ```ignore
//! use postapp::outbound::persistence::{DbPool, DieselUserRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/postapp")).await?;
//! let users = DieselUserRepository::new(pool);
//! ```

mod diesel_basic_error_mapping;
mod diesel_follow_repository;
mod diesel_post_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_follow_repository::DieselFollowRepository;
pub use diesel_post_repository::DieselPostRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MIGRATIONS, MigrationError, apply_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
