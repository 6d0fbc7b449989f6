//! TopFac Core Types and Definitions
//!
//! This crate provides the foundational types shared by the TopFac parser,
//! layout engine, and renderers. It includes:
//!
//! - **Identifiers**: Stable, collision-free component identities ([`identifier::ComponentId`])
//! - **Classification**: Ordered keyword tables for device and area types ([`classify`] module)
//! - **Topology**: The four-level hierarchy model ([`topology`] module)
//! - **Geometry**: Basic geometric types ([`geometry`] module)
//! - **Direction**: Principal direction for environment sequencing ([`direction::Direction`])
//! - **Colors**: CSS color validation for configurable styles ([`color::Color`])

pub mod classify;
pub mod color;
pub mod direction;
pub mod geometry;
pub mod identifier;
pub mod topology;
