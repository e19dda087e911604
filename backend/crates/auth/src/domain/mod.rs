//! Domain Layer
//!
//! Core business logic, entities, and repository traits.
//! No dependencies on infrastructure or frameworks.

pub mod entity;
pub mod repository;
pub mod value_object;
