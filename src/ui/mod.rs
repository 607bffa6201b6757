//! # User Interface Module
//!
//! Dear ImGui based editor UI.
//!
//! ## Key Components
//!
//! - [`UiManager`] - ImGui context, winit platform glue and wgpu renderer
//! - [`Panel`] / [`TabComponent`] - panels hosted in editor tabs
//! - [`AssetExplorer`] - browser for the resources of a scene
//! - [`AssetCard`] - one resource as shown in the explorer
//!
//! ## Usage
//!
//! ```no_run
//! use std::{cell::RefCell, rc::Rc};
//! use tessera::config::EditorSettings;
//! use tessera::resources::ResourceManager;
//! use tessera::ui::AssetExplorer;
//!
//! let settings = EditorSettings::default();
//! let manager = Rc::new(RefCell::new(ResourceManager::new()));
//!
//! let mut explorer = AssetExplorer::new(&settings, false, 0);
//! explorer.attach(manager);
//! explorer.filter_by_name("brick");
//! ```
//!
//! ## Input Handling
//!
//! While the UI wants the mouse or keyboard, events are not forwarded to the
//! rest of the editor.

pub mod asset;
pub mod asset_explorer;
pub mod manager;
pub mod tab;

pub use asset::{Asset, AssetCard, AssetKind};
pub use asset_explorer::AssetExplorer;
pub use manager::UiManager;
pub use tab::{Panel, TabComponent};
