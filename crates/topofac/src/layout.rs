//! Box layout of topologies.
//!
//! The layout engine assigns a rectangle to every environment, datacenter,
//! area and component of a [`Topology`](topofac_core::topology::Topology).
//! Sizes are computed bottom-up and positions top-down.
//!
//! # Pipeline Position
//!
//! ```text
//! Topology text
//!     ↓ parse
//! Topology
//!     ↓ layout (this module)
//! Layout
//!     ↓ export
//! draw.io / Mermaid / Excalidraw
//! ```
//!
//! # Coordinates
//!
//! Environment boxes carry absolute coordinates. Datacenter, area and
//! component boxes carry coordinates relative to their parent box. Renderers
//! that need a flat coordinate space sum the offsets themselves, see
//! [`EnvironmentBox::absolute`].

mod boxes;
mod engine;

pub use boxes::{AreaBox, ComponentBox, DatacenterBox, EnvironmentBox, Layout};
pub(crate) use boxes::offset;
pub use engine::Engine;
