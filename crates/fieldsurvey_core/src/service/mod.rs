//! Household use-case services.
//!
//! # Responsibility
//! - Own the in-memory household collection behind one mutation surface.
//! - Provide capture, search and summary read models for the UI layers.

pub mod capture;
pub mod household_store;
pub mod search;
pub mod summary;
