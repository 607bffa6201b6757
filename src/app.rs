//! Editor shell
//!
//! Hosts the asset explorer in a winit window. Files dropped on the window are
//! imported into the scene's resource manager through the explorer.

use anyhow::Context;
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::Arc;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowAttributes, WindowId},
};

use crate::config::EditorSettings;
use crate::gfx::geometry::{Geometry, Shape};
use crate::gfx::render_engine::RenderEngine;
use crate::loaders::{parse_shapes, GeometryLoader};
use crate::resources::{DroppedFile, ResourceImporter, ResourceManager};
use crate::ui::{AssetCard, AssetExplorer, Panel, UiManager};

pub struct EditorApp {
    event_loop: Option<EventLoop<()>>,
    state: EditorState,
}

struct EditorState {
    window: Option<Arc<Window>>,
    render_engine: Option<RenderEngine>,
    ui_manager: Option<UiManager>,

    settings: EditorSettings,
    settings_path: Option<PathBuf>,
    manager: Rc<RefCell<ResourceManager>>,
    importer: ResourceImporter,
    explorer: AssetExplorer,
    /// Files dropped since the last frame
    dropped: Vec<PathBuf>,
}

impl EditorApp {
    pub fn new(settings: EditorSettings) -> anyhow::Result<Self> {
        let event_loop = EventLoop::new().context("Failed to create event loop")?;

        let manager = Rc::new(RefCell::new(ResourceManager::new()));
        let mut explorer = AssetExplorer::new(&settings, false, 0);
        explorer.attach(manager.clone());

        Ok(Self {
            event_loop: Some(event_loop),
            state: EditorState {
                window: None,
                render_engine: None,
                ui_manager: None,
                importer: ResourceImporter::new(manager.clone()),
                manager,
                explorer,
                settings,
                settings_path: None,
                dropped: Vec::new(),
            },
        })
    }

    /// Saves settings to `path` when the editor exits
    pub fn with_settings_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.state.settings_path = Some(path.into());
        self
    }

    pub fn resources(&self) -> &Rc<RefCell<ResourceManager>> {
        &self.state.manager
    }

    /// Loads shape outlines from a JSON array file for later shape geometries
    pub fn load_shapes(&mut self, path: impl AsRef<Path>) -> anyhow::Result<usize> {
        let path = path.as_ref();
        let shapes = read_shapes(path)?;

        let count = shapes.len();
        let mut manager = self.state.manager.borrow_mut();
        for shape in shapes.into_values() {
            manager.add_shape(shape);
        }
        log::info!("Loaded {} shapes from {}", count, path.display());
        Ok(count)
    }

    /// Loads a geometry descriptor file into the scene
    pub fn load_geometry(&mut self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let path = path.as_ref();
        let mut loader = GeometryLoader::new(&self.state.settings.project_path);
        {
            let manager = self.state.manager.borrow();
            loader
                .set_images(manager.image_map())
                .set_shapes(manager.shapes.clone());
        }

        let geometry = pollster::block_on(loader.load_async(path, |progress| {
            log::trace!("{}: {} bytes read", path.display(), progress.loaded);
        }))
        .with_context(|| format!("Failed to load geometry {}", path.display()))?;

        log::info!("Loaded geometry '{}' ({})", geometry.name, geometry.type_name());
        add_geometry(&self.state.manager, &mut self.state.explorer, geometry);
        Ok(())
    }

    /// Runs the event loop until the window is closed
    pub fn run(mut self) -> anyhow::Result<()> {
        let event_loop = self
            .event_loop
            .take()
            .context("Event loop already consumed")?;
        event_loop.set_control_flow(ControlFlow::Wait);

        event_loop
            .run_app(&mut self.state)
            .context("Event loop failed")?;

        if let Some(path) = &self.state.settings_path {
            self.state
                .settings
                .save(path)
                .with_context(|| format!("Failed to save settings to {}", path.display()))?;
        }
        Ok(())
    }
}

/// Reads a JSON array of shape outlines
fn read_shapes(path: &Path) -> anyhow::Result<HashMap<String, Shape>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read shapes {}", path.display()))?;
    let records: Vec<serde_json::Value> = serde_json::from_str(&text)
        .with_context(|| format!("Shapes file {} is not a JSON array", path.display()))?;
    parse_shapes(&records).with_context(|| format!("Invalid shapes in {}", path.display()))
}

/// Adds a geometry to the scene and appends its card to the explorer
///
/// The explorer keeps its other cards, including their filter visibility.
fn add_geometry(
    manager: &RefCell<ResourceManager>,
    explorer: &mut AssetExplorer,
    geometry: Geometry,
) -> String {
    let card = AssetCard::for_asset(&geometry);
    let uuid = manager.borrow_mut().add_geometry(geometry);
    explorer.add(card);
    uuid
}

impl EditorState {
    fn import_dropped(&mut self) {
        if self.dropped.is_empty() {
            return;
        }

        let files: Vec<DroppedFile> = self
            .dropped
            .drain(..)
            .filter_map(|path| match DroppedFile::from_path(&path) {
                Ok(file) => Some(file),
                Err(e) => {
                    log::warn!("{}", e);
                    None
                }
            })
            .collect();

        let imported = self.explorer.on_drop(&files, &mut self.importer);
        log::info!("Imported {} resources from {} files", imported.len(), files.len());
    }

    fn redraw(&mut self) {
        let (Some(window), Some(render_engine), Some(ui_manager)) = (
            self.window.as_ref(),
            self.render_engine.as_mut(),
            self.ui_manager.as_mut(),
        ) else {
            return;
        };

        let explorer = &mut self.explorer;
        ui_manager.update_logic(window, |ui| explorer.render(ui));

        let result = render_engine.render_frame(|device, queue, encoder, view| {
            if let Err(e) = ui_manager.render(device, queue, encoder, view) {
                log::error!("Failed to render UI: {}", e);
            }
        });

        match result {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                render_engine.reconfigure();
            }
            Err(e) => log::warn!("Skipped frame: {}", e),
        }
    }
}

impl ApplicationHandler for EditorState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window = match event_loop.create_window(
            WindowAttributes::default()
                .with_title("Tessera")
                .with_inner_size(winit::dpi::LogicalSize::new(1200, 800)),
        ) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("Failed to create window: {}", e);
                event_loop.exit();
                return;
            }
        };

        let (width, height) = window.inner_size().into();
        let render_engine =
            match pollster::block_on(RenderEngine::new(window.clone(), width, height)) {
                Ok(engine) => engine,
                Err(e) => {
                    log::error!("{:#}", e);
                    event_loop.exit();
                    return;
                }
            };

        let mut ui_manager = UiManager::new(
            render_engine.device(),
            render_engine.queue(),
            render_engine.surface_format(),
            &window,
        );
        ui_manager.update_display_size(width, height);
        self.explorer
            .update_size([width as f32 * 0.5, height as f32 * 0.5]);

        self.window = Some(window);
        self.render_engine = Some(render_engine);
        self.ui_manager = Some(ui_manager);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        let Some(window) = self.window.clone() else {
            return;
        };

        // UI gets input first
        if let Some(ui_manager) = self.ui_manager.as_mut() {
            if ui_manager.handle_input(&window, window_id, &event) {
                window.request_redraw();
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                if let Some(render_engine) = self.render_engine.as_mut() {
                    render_engine.resize(width, height);
                }
                if let Some(ui_manager) = self.ui_manager.as_mut() {
                    ui_manager.update_display_size(width, height);
                }
                window.request_redraw();
            }
            WindowEvent::DroppedFile(path) => {
                self.dropped.push(path);
                window.request_redraw();
            }
            WindowEvent::RedrawRequested => {
                self.import_dropped();
                self.redraw();
            }
            _ => (),
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::geometry::{generate_box, BoxParams, GeometryParameters};
    use crate::resources::Material;

    #[test]
    fn test_added_geometry_keeps_explorer_filter() {
        let manager = Rc::new(RefCell::new(ResourceManager::new()));
        manager
            .borrow_mut()
            .add_material(Material::new("Brick", [1.0; 4], 0.0, 0.5));
        manager
            .borrow_mut()
            .add_material(Material::new("Stone", [1.0; 4], 0.0, 0.5));

        let mut explorer = AssetExplorer::new(&EditorSettings::default(), false, 0);
        explorer.attach(manager.clone());
        explorer.filter_by_name("brick");

        let geometry = Geometry::new(
            GeometryParameters::Box(BoxParams::default()),
            generate_box(&BoxParams::default()),
        )
        .with_name("Crate");
        let uuid = add_geometry(&manager, &mut explorer, geometry);

        assert!(manager.borrow().get_geometry(&uuid).is_some());
        let cards: Vec<(&str, bool)> = explorer
            .files()
            .iter()
            .map(|c| (c.name.as_str(), c.visible))
            .collect();
        assert_eq!(cards, vec![("Brick", true), ("Stone", false), ("Crate", true)]);
    }

    #[test]
    fn test_read_shapes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shapes.json");
        std::fs::write(&path, r#"[{ "uuid": "tri", "points": [[0, 0], [1, 0], [0, 1]] }]"#)
            .unwrap();

        let shapes = read_shapes(&path).unwrap();
        assert_eq!(shapes["tri"].points.len(), 3);

        std::fs::write(&path, r#"{ "uuid": "tri" }"#).unwrap();
        assert!(read_shapes(&path).is_err());
    }
}
