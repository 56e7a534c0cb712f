// src/application/mod.rs
//
// Application Layer
//
// ARCHITECTURE:
// - Sits between any presentation layer and the services
// - Owns the in-memory collection and its derived views
// - Translates errors into user-facing responses

pub mod controller;
pub mod error_handling;
pub mod filter;
pub mod state;

#[cfg(test)]
mod controller_tests;

pub use controller::{LibraryController, LoadState, MediaInput};
pub use error_handling::{ErrorResponse, ErrorType};
pub use filter::{filter_records, CategoryFilter};
pub use state::AppState;
