//! Core data models for the hotel listing service.
//!
//! The sole persisted entity lives here. It maps to a SQLite row via
//! `sqlx::FromRow` and serializes naturally as JSON via `serde`.

pub mod hotel;
