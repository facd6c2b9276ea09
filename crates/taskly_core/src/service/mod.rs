//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Keep UI/FFI layers decoupled from storage details.
//! - Define the collaborator seams (ads, billing, observers) so planner
//!   logic stays testable without real network/IAP calls.

pub mod gateway;
pub mod observer;
pub mod planner;
