//! Asset explorer panel
//!
//! Lists the resources of the attached [`ResourceManager`] as asset cards and lets
//! the user filter them by name or by type. Files dropped on the editor are
//! imported through an [`AssetImporter`] and show up as new cards.

use super::asset::AssetCard;
use super::tab::{Panel, TabComponent};
use crate::config::EditorSettings;
use crate::resources::{
    AssetImporter, DroppedFile, ImportError, Imported, ImportedKind, MediaKind, ResourceManager,
};
use std::cell::RefCell;
use std::rc::Rc;

/// Height of the search bar
pub const BAR_HEIGHT: f32 = 25.0;
/// Width of the search box
pub const SEARCH_WIDTH: f32 = 200.0;

const ICON: &str = "icons/misc/new.png";
const ALL_TYPES: &str = "All";

pub struct AssetExplorer {
    tab: TabComponent,
    files: Vec<AssetCard>,
    manager: Option<Rc<RefCell<ResourceManager>>>,
    preview_size: f32,

    search: String,
    type_filter: usize,
    bar_size: [f32; 2],
    assets_position: [f32; 2],
    assets_size: [f32; 2],
}

impl AssetExplorer {
    pub fn new(settings: &EditorSettings, closeable: bool, index: usize) -> Self {
        Self {
            tab: TabComponent::new("Assets", ICON, closeable, index),
            files: Vec::new(),
            manager: None,
            preview_size: settings.general.file_preview_size,
            search: String::new(),
            type_filter: 0,
            bar_size: [0.0, BAR_HEIGHT],
            assets_position: [0.0, BAR_HEIGHT],
            assets_size: [0.0, 0.0],
        }
    }

    pub fn files(&self) -> &[AssetCard] {
        &self.files
    }

    pub fn manager(&self) -> Option<&Rc<RefCell<ResourceManager>>> {
        self.manager.as_ref()
    }

    /// Attaches a resource manager and rebuilds the view
    ///
    /// Attaching the manager that is already attached does nothing.
    pub fn attach(&mut self, manager: Rc<RefCell<ResourceManager>>) {
        if self
            .manager
            .as_ref()
            .is_some_and(|current| Rc::ptr_eq(current, &manager))
        {
            return;
        }

        log::info!("Asset explorer attached to a new resource manager");
        self.manager = Some(manager);
        self.update_objects_view();
    }

    /// Sizes a card with the current preview size and appends it
    pub fn add(&mut self, mut card: AssetCard) {
        card.set_size(self.preview_size);
        self.files.push(card);
    }

    /// Removes the card of a resource, returning whether one was shown
    pub fn remove(&mut self, uuid: &str) -> bool {
        match self.files.iter().position(|card| card.uuid == uuid) {
            Some(index) => {
                self.files.remove(index).destroy();
                true
            }
            None => false,
        }
    }

    /// Destroys every card, last first
    pub fn clear(&mut self) {
        while let Some(card) = self.files.pop() {
            card.destroy();
        }
    }

    /// Rebuilds every card from the attached manager
    ///
    /// Meant for the first fill after attaching; later changes go through
    /// [`add`](Self::add) and [`remove`](Self::remove).
    pub fn update_objects_view(&mut self) {
        self.clear();

        let Some(manager) = self.manager.clone() else {
            return;
        };
        let manager = manager.borrow();

        let cards: Vec<AssetCard> = std::iter::empty()
            .chain(manager.materials.iter().map(|a| AssetCard::for_asset(a)))
            .chain(manager.geometries.iter().map(|a| AssetCard::for_asset(a)))
            .chain(manager.textures.iter().map(|a| AssetCard::for_asset(a)))
            .chain(manager.fonts.iter().map(|a| AssetCard::for_asset(a)))
            .chain(manager.images.iter().map(|a| AssetCard::for_asset(a)))
            .chain(manager.videos.iter().map(|a| AssetCard::for_asset(a)))
            .chain(manager.audio.iter().map(|a| AssetCard::for_asset(a)))
            .chain(manager.resources.iter().map(|a| AssetCard::for_asset(a)))
            .collect();

        for card in cards {
            self.add(card);
        }

        log::debug!("Asset explorer shows {} assets", self.files.len());
    }

    /// Shows only cards whose name contains `search`, ignoring case
    pub fn filter_by_name(&mut self, search: &str) {
        let search = search.to_lowercase();
        for card in &mut self.files {
            let visible = card.name.to_lowercase().contains(&search);
            card.set_visibility(visible);
        }
    }

    /// Shows only cards whose type metadata contains `search`, ignoring case
    pub fn filter_by_type(&mut self, search: &str) {
        let search = search.to_lowercase();
        for card in &mut self.files {
            let visible = card.meta.to_lowercase().contains(&search);
            card.set_visibility(visible);
        }
    }

    /// Shows only cards whose type metadata is exactly `meta`, ignoring case
    ///
    /// Used by the type combo, where picking `Texture` must not also match
    /// `VideoTexture`.
    pub fn filter_by_exact_type(&mut self, meta: &str) {
        for card in &mut self.files {
            let visible = card.meta.eq_ignore_ascii_case(meta);
            card.set_visibility(visible);
        }
    }

    /// Applies the preview size from `settings` to every card
    pub fn update_settings(&mut self, settings: &EditorSettings) {
        self.preview_size = settings.general.file_preview_size;
        for card in &mut self.files {
            card.set_size(self.preview_size);
        }
    }

    /// Lays out the bar and the asset area for a new panel size
    pub fn update_size(&mut self, size: [f32; 2]) {
        self.tab.size = size;
        self.bar_size = [size[0], BAR_HEIGHT];
        self.assets_position = [0.0, BAR_HEIGHT];
        self.assets_size = [size[0], (size[1] - BAR_HEIGHT).max(0.0)];
    }

    pub fn bar_size(&self) -> [f32; 2] {
        self.bar_size
    }

    pub fn assets_area(&self) -> ([f32; 2], [f32; 2]) {
        (self.assets_position, self.assets_size)
    }

    /// Imports dropped files and adds cards for what they became
    ///
    /// Each file goes to the first matching importer entry of image, video, audio,
    /// font and model. Files of any other kind are skipped, and files that fail
    /// to import are logged and skipped.
    pub fn on_drop(
        &mut self,
        files: &[DroppedFile],
        importer: &mut dyn AssetImporter,
    ) -> Vec<Imported> {
        let mut imported = Vec::new();

        for file in files {
            let result: Result<Vec<Imported>, ImportError> = match file.kind() {
                Some(MediaKind::Image) => importer.load_texture(file),
                Some(MediaKind::Video) => importer.load_video_texture(file),
                Some(MediaKind::Audio) => importer.load_audio(file),
                Some(MediaKind::Font) => importer.load_font(file),
                Some(MediaKind::Model) => importer.load_model(file),
                None => {
                    log::debug!("Ignoring dropped file {}", file.name);
                    continue;
                }
            };

            match result {
                Ok(resources) => imported.extend(resources),
                Err(e) => log::warn!("Failed to import {}: {}", file.name, e),
            }
        }

        for resource in &imported {
            if let Some(card) = self.card_for(resource) {
                self.add(card);
            }
        }

        imported
    }

    fn card_for(&self, imported: &Imported) -> Option<AssetCard> {
        let manager = self.manager.as_ref()?.borrow();
        let uuid = imported.uuid.as_str();

        let card = match imported.kind {
            ImportedKind::Geometry => AssetCard::for_asset(manager.geometries.get(uuid)?),
            ImportedKind::Texture => AssetCard::for_asset(manager.textures.get(uuid)?),
            ImportedKind::Font => AssetCard::for_asset(manager.fonts.get(uuid)?),
            ImportedKind::Image => AssetCard::for_asset(manager.images.get(uuid)?),
            ImportedKind::Video => AssetCard::for_asset(manager.videos.get(uuid)?),
            ImportedKind::Audio => AssetCard::for_asset(manager.audio.get(uuid)?),
        };

        Some(card)
    }

    /// Distinct type metadata of the current cards, for the type filter
    fn type_options(&self) -> Vec<String> {
        let mut metas: Vec<String> = self.files.iter().map(|c| c.meta.clone()).collect();
        metas.sort();
        metas.dedup();
        metas.insert(0, ALL_TYPES.to_string());
        metas
    }
}

impl Panel for AssetExplorer {
    fn tab(&self) -> &TabComponent {
        &self.tab
    }

    fn tab_mut(&mut self) -> &mut TabComponent {
        &mut self.tab
    }

    fn update_size(&mut self, size: [f32; 2]) {
        AssetExplorer::update_size(self, size);
    }

    fn update_settings(&mut self, settings: &EditorSettings) {
        AssetExplorer::update_settings(self, settings);
    }

    fn render(&mut self, ui: &imgui::Ui) {
        if !self.tab.open {
            return;
        }

        let label = self.tab.window_label();
        let size = self.tab.size;
        let closeable = self.tab.closeable;
        let mut open = true;

        let mut window = ui
            .window(label)
            .size(size, imgui::Condition::FirstUseEver)
            .position([20.0, 20.0], imgui::Condition::FirstUseEver);
        if closeable {
            window = window.opened(&mut open);
        }

        window.build(|| {
            let [width, height] = ui.content_region_avail();
            self.update_size([width, height]);

            // Bar: type filter on the left, search box on the right
            let options = self.type_options();
            if self.type_filter >= options.len() {
                self.type_filter = 0;
            }
            ui.set_next_item_width((width - SEARCH_WIDTH - 10.0).clamp(60.0, 200.0));
            if ui.combo_simple_string("##type", &mut self.type_filter, &options) {
                if self.type_filter == 0 {
                    self.filter_by_type("");
                } else {
                    self.filter_by_exact_type(&options[self.type_filter]);
                }
            }

            ui.same_line_with_pos((width - SEARCH_WIDTH).max(0.0));
            ui.set_next_item_width(SEARCH_WIDTH);
            if ui
                .input_text("##search", &mut self.search)
                .hint("Search")
                .build()
            {
                let search = self.search.clone();
                self.filter_by_name(&search);
            }

            let (_, assets_size) = self.assets_area();
            ui.child_window("assets")
                .size(assets_size)
                .build(|| {
                    let spacing = ui.clone_style().item_spacing[0];
                    let columns =
                        ((assets_size[0] / (self.preview_size + spacing)).floor() as usize).max(1);

                    let mut column = 0;
                    for card in self.files.iter().filter(|c| c.visible) {
                        if column > 0 {
                            ui.same_line();
                        }
                        card.render(ui);
                        column = (column + 1) % columns;
                    }
                });
        });

        if !open {
            self.tab.open = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::geometry::{generate_box, BoxParams, Geometry, GeometryParameters};
    use crate::resources::{
        Audio, FileResource, Font, Image, Material, ResourceImporter, Texture, TextureSource, Video,
    };
    use crate::ui::AssetKind;

    fn populated_manager() -> Rc<RefCell<ResourceManager>> {
        let mut manager = ResourceManager::new();
        manager.add_audio(Audio::new("a-1", "Theme", "mp3", vec![]));
        manager.add_material(Material::new("Brick", [1.0; 4], 0.0, 0.5));
        manager.add_geometry(
            Geometry::new(
                GeometryParameters::Box(BoxParams::default()),
                generate_box(&BoxParams::default()),
            )
            .with_name("Crate"),
        );
        manager.add_font(Font::new("f-1", "Roboto", "ttf", vec![]));
        manager.add_material(Material::new("Texture Atlas", [1.0; 4], 0.0, 0.5));
        Rc::new(RefCell::new(manager))
    }

    fn explorer() -> AssetExplorer {
        AssetExplorer::new(&EditorSettings::default(), false, 0)
    }

    fn visible_names(explorer: &AssetExplorer) -> Vec<&str> {
        explorer
            .files()
            .iter()
            .filter(|c| c.visible)
            .map(|c| c.name.as_str())
            .collect()
    }

    #[test]
    fn test_attach_lists_in_kind_order() {
        let mut explorer = explorer();
        explorer.attach(populated_manager());

        let names: Vec<&str> = explorer.files().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Brick", "Texture Atlas", "Crate", "Roboto", "Theme"]);
        assert!(explorer.files().iter().all(|c| c.size == 100.0));
    }

    /// One resource of every kind, added in reverse of the listing order
    fn full_manager() -> Rc<RefCell<ResourceManager>> {
        let mut manager = ResourceManager::new();
        manager.add_resource(FileResource::new("r-1", "notes", "txt", vec![]));
        manager.add_audio(Audio::new("a-1", "theme", "mp3", vec![]));
        manager.add_video(Video::new("v-1", "intro", "mp4", vec![]));
        manager.add_image(Image::new("i-1", "bricks", "png", vec![]));
        manager.add_font(Font::new("f-1", "roboto", "ttf", vec![]));
        manager.add_texture(Texture::new("intro texture", TextureSource::Video("v-1".into())));
        manager.add_texture(Texture::new("bricks texture", TextureSource::Image("i-1".into())));
        manager.add_geometry(
            Geometry::new(
                GeometryParameters::Box(BoxParams::default()),
                generate_box(&BoxParams::default()),
            )
            .with_name("crate"),
        );
        manager.add_material(Material::new("brick", [1.0; 4], 0.0, 0.5));
        Rc::new(RefCell::new(manager))
    }

    #[test]
    fn test_every_kind_lists_in_fixed_order() {
        let mut explorer = explorer();
        explorer.attach(full_manager());

        let kinds: Vec<(AssetKind, &str)> = explorer
            .files()
            .iter()
            .map(|c| (c.kind, c.name.as_str()))
            .collect();
        assert_eq!(
            kinds,
            vec![
                (AssetKind::Material, "brick"),
                (AssetKind::Geometry, "crate"),
                (AssetKind::Texture, "intro texture"),
                (AssetKind::Texture, "bricks texture"),
                (AssetKind::Font, "roboto"),
                (AssetKind::Image, "bricks"),
                (AssetKind::Video, "intro"),
                (AssetKind::Audio, "theme"),
                (AssetKind::File, "notes"),
            ]
        );

        explorer.clear();
        explorer.update_objects_view();
        assert_eq!(explorer.files().len(), 9);
    }

    #[test]
    fn test_exact_type_filter_separates_texture_kinds() {
        let mut explorer = explorer();
        explorer.attach(full_manager());

        explorer.filter_by_exact_type("Texture");
        assert_eq!(visible_names(&explorer), vec!["bricks texture"]);

        explorer.filter_by_exact_type("VideoTexture");
        assert_eq!(visible_names(&explorer), vec!["intro texture"]);

        // Substring filtering still matches both
        explorer.filter_by_type("texture");
        assert_eq!(visible_names(&explorer), vec!["intro texture", "bricks texture"]);
    }

    #[test]
    fn test_attach_same_manager_is_noop() {
        let manager = populated_manager();
        let mut explorer = explorer();
        explorer.attach(manager.clone());
        explorer.filter_by_name("brick");

        // Re-attaching keeps the current cards, including their visibility
        explorer.attach(manager.clone());
        assert_eq!(visible_names(&explorer), vec!["Brick"]);

        explorer.attach(populated_manager());
        assert_eq!(visible_names(&explorer).len(), 5);
    }

    #[test]
    fn test_filter_by_name() {
        let mut explorer = explorer();
        explorer.attach(populated_manager());

        explorer.filter_by_name("TEX");
        assert_eq!(visible_names(&explorer), vec!["Texture Atlas"]);

        explorer.filter_by_name("");
        assert_eq!(visible_names(&explorer).len(), explorer.files().len());
    }

    #[test]
    fn test_filter_by_type() {
        let mut explorer = explorer();
        explorer.attach(populated_manager());

        explorer.filter_by_type("geometry");
        assert_eq!(visible_names(&explorer), vec!["Crate"]);

        explorer.filter_by_type("material");
        assert_eq!(visible_names(&explorer), vec!["Brick", "Texture Atlas"]);
    }

    #[test]
    fn test_clear_then_update_matches_fresh_attach() {
        let manager = populated_manager();
        let mut explorer = explorer();
        explorer.attach(manager.clone());
        let fresh = explorer.files().len();

        explorer.clear();
        assert!(explorer.files().is_empty());

        explorer.update_objects_view();
        assert_eq!(explorer.files().len(), fresh);
    }

    #[test]
    fn test_add_and_remove() {
        let mut explorer = explorer();
        explorer.attach(populated_manager());

        let audio = Audio::new("a-2", "Steps", "wav", vec![]);
        explorer.add(AssetCard::for_asset(&audio));
        assert_eq!(explorer.files().last().map(|c| c.size), Some(100.0));

        assert!(explorer.remove("a-2"));
        assert!(!explorer.remove("a-2"));
        assert_eq!(explorer.files().len(), 5);
    }

    #[test]
    fn test_update_settings_resizes_cards() {
        let mut explorer = explorer();
        explorer.attach(populated_manager());

        let mut settings = EditorSettings::default();
        settings.general.file_preview_size = 64.0;
        explorer.update_settings(&settings);

        assert!(explorer.files().iter().all(|c| c.size == 64.0));
    }

    #[test]
    fn test_update_size() {
        let mut explorer = explorer();
        explorer.update_size([300.0, 200.0]);

        assert_eq!(explorer.bar_size(), [300.0, BAR_HEIGHT]);
        assert_eq!(explorer.assets_area(), ([0.0, BAR_HEIGHT], [300.0, 175.0]));
    }

    /// Records which entry point each file went to
    #[derive(Default)]
    struct RecordingImporter {
        calls: Vec<&'static str>,
    }

    impl AssetImporter for RecordingImporter {
        fn load_texture(&mut self, _: &DroppedFile) -> Result<Vec<Imported>, ImportError> {
            self.calls.push("texture");
            Ok(Vec::new())
        }
        fn load_video_texture(&mut self, _: &DroppedFile) -> Result<Vec<Imported>, ImportError> {
            self.calls.push("video");
            Ok(Vec::new())
        }
        fn load_audio(&mut self, _: &DroppedFile) -> Result<Vec<Imported>, ImportError> {
            self.calls.push("audio");
            Ok(Vec::new())
        }
        fn load_font(&mut self, _: &DroppedFile) -> Result<Vec<Imported>, ImportError> {
            self.calls.push("font");
            Ok(Vec::new())
        }
        fn load_model(&mut self, _: &DroppedFile) -> Result<Vec<Imported>, ImportError> {
            self.calls.push("model");
            Ok(Vec::new())
        }
    }

    #[test]
    fn test_audio_drop_uses_audio_path_only() {
        let mut explorer = explorer();
        let mut importer = RecordingImporter::default();

        explorer.on_drop(
            &[DroppedFile::new("theme.mp3", b"ID3\x04\0\0\0\0".to_vec())],
            &mut importer,
        );

        assert_eq!(importer.calls, vec!["audio"]);
    }

    #[test]
    fn test_drop_routes_by_content_and_skips_unknown() {
        let mut explorer = explorer();
        let mut importer = RecordingImporter::default();

        explorer.on_drop(
            &[
                DroppedFile::new("readme.txt", b"hello".to_vec()),
                DroppedFile::new("font.bin", b"wOFF\0\x01\0\0".to_vec()),
                DroppedFile::new("mesh.obj", b"v 0 0 0\n".to_vec()),
            ],
            &mut importer,
        );

        assert_eq!(importer.calls, vec!["font", "model"]);
    }

    #[test]
    fn test_drop_adds_cards_for_imports() {
        let manager = Rc::new(RefCell::new(ResourceManager::new()));
        let mut explorer = explorer();
        explorer.attach(manager.clone());
        let mut importer = ResourceImporter::new(manager.clone());

        let imported = explorer.on_drop(
            &[DroppedFile::new("theme.mp3", b"ID3\x04\0\0\0\0".to_vec())],
            &mut importer,
        );

        assert_eq!(imported.len(), 1);
        assert_eq!(explorer.files().len(), 1);
        assert_eq!(explorer.files()[0].name, "theme");
        assert_eq!(explorer.files()[0].meta, "mp3");
    }
}
