//! v1 API Data Transfer Objects.
//!
//! Wire types for the HTTP API, kept apart from the domain models in
//! `src/models/`.

pub mod allergens;
pub mod history;
pub mod identify;

pub use allergens::*;
pub use history::*;
pub use identify::*;
