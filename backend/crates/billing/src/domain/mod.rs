//! Domain Layer
//!
//! Core business logic, entities, and repository traits.

pub mod entities;
pub mod repository;
pub mod value_objects;
