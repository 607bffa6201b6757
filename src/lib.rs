//! Tessera scene editor core
//!
//! Loads JSON geometry descriptors into meshes and browses scene resources in an
//! asset explorer panel, on wgpu, winit and Dear ImGui.

pub mod app;
pub mod config;
pub mod gfx;
pub mod loaders;
pub mod resources;
pub mod ui;

// Re-export main types for convenience
pub use app::EditorApp;
pub use loaders::{GeometryError, GeometryLoader};
