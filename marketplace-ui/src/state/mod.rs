//! State Management
//!
//! Global application state shared through Leptos context.

pub mod global;
