//! Admin use-case services.
//!
//! # Responsibility
//! - Orchestrate local storage, remote API and seed resolution per collection.
//! - Keep the CLI decoupled from storage and transport details.

pub mod admin_session;
pub mod context;
pub mod hybrid_store;
pub mod mode_switch;
