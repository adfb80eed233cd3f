//! Core use-case services.
//!
//! # Responsibility
//! - Run the validation gate before any store call.
//! - Keep transport layers decoupled from storage details.

pub mod submission_service;
