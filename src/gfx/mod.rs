//! # Graphics Module
//!
//! CPU-side meshes and the window surface the editor draws into.
//!
//! - **Geometry** ([`geometry`]) - mesh data and the procedural generators behind
//!   every geometry descriptor kind
//! - **Render engine** ([`render_engine`]) - wgpu device, surface and frame submission
//!
//! ```rust
//! use tessera::gfx::geometry::{generate_capsule, CapsuleParams};
//!
//! let capsule = generate_capsule(&CapsuleParams::default());
//! assert!(capsule.triangle_count() > 0);
//! ```

pub mod geometry;
pub mod render_engine;

pub use geometry::{Geometry, GeometryData, GeometryParameters};
pub use render_engine::RenderEngine;
