//! Outbound adapters implementing the domain's driven ports.
//!
//! - **persistence**: PostgreSQL repositories using Diesel ORM
//! - **password**: Argon2id password hashing
//!
//! Adapters translate between domain types and infrastructure
//! representations and hold no business rules.

pub mod password;
pub mod persistence;
