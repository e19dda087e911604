//! Infrastructure Layer
//!
//! Adapters implementing the domain repository traits.

pub mod postgres;

pub use postgres::PgAuthStore;
