//! Domain layer
//!
//! Contains the core analysis logic and its data model.

pub mod knowledge;
