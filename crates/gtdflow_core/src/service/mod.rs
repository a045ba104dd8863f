//! Use-case services orchestrating validation above the repository layer.
//!
//! # Responsibility
//! - Enforce lifecycle, access and role invariants the schema cannot.
//! - Keep services storage-agnostic: every service is an explicitly
//!   constructed container over injected repository implementations.
//!
//! # Invariants
//! - Services never bypass repository validation/persistence contracts.
//! - No service holds ambient/global state; the composition root owns
//!   construction and lifetime.

pub mod context_service;
pub mod family_service;
pub mod item_service;
pub mod project_service;
pub mod review_service;
