pub mod postgres;

pub use postgres::PgBillingStore;
