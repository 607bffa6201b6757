//! Asset cards
//!
//! Every resource shown in the asset explorer is wrapped in an [`AssetCard`]. The
//! card copies what it displays (name and metadata) when it is attached, so the
//! explorer can filter and draw without touching the resource manager.

use crate::gfx::geometry::Geometry;
use crate::resources::{Audio, FileResource, Font, Image, Material, Resource, Texture, Video};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKind {
    Material,
    Geometry,
    Texture,
    Font,
    Image,
    Video,
    Audio,
    File,
}

impl AssetKind {
    /// Short label drawn on the preview
    pub fn label(&self) -> &'static str {
        match self {
            AssetKind::Material => "Material",
            AssetKind::Geometry => "Geometry",
            AssetKind::Texture => "Texture",
            AssetKind::Font => "Font",
            AssetKind::Image => "Image",
            AssetKind::Video => "Video",
            AssetKind::Audio => "Audio",
            AssetKind::File => "File",
        }
    }
}

/// A resource that can be shown as an asset
pub trait Asset: Resource {
    fn asset_kind(&self) -> AssetKind;

    /// Type metadata shown under the name and matched by the type filter
    fn meta(&self) -> String;
}

impl Asset for Material {
    fn asset_kind(&self) -> AssetKind {
        AssetKind::Material
    }

    fn meta(&self) -> String {
        self.material_type.clone()
    }
}

impl Asset for Geometry {
    fn asset_kind(&self) -> AssetKind {
        AssetKind::Geometry
    }

    fn meta(&self) -> String {
        self.type_name().to_string()
    }
}

impl Asset for Texture {
    fn asset_kind(&self) -> AssetKind {
        AssetKind::Texture
    }

    fn meta(&self) -> String {
        self.type_name().to_string()
    }
}

macro_rules! encoded_asset {
    ($ty:ty, $kind:ident) => {
        impl Asset for $ty {
            fn asset_kind(&self) -> AssetKind {
                AssetKind::$kind
            }

            fn meta(&self) -> String {
                self.encoding.clone()
            }
        }
    };
}

encoded_asset!(Font, Font);
encoded_asset!(Image, Image);
encoded_asset!(Video, Video);
encoded_asset!(Audio, Audio);
encoded_asset!(FileResource, File);

/// UI card for one resource
#[derive(Debug, Clone, PartialEq)]
pub struct AssetCard {
    pub kind: AssetKind,
    pub uuid: String,
    pub name: String,
    pub meta: String,
    pub visible: bool,
    /// Preview edge length in pixels
    pub size: f32,
}

impl AssetCard {
    /// Empty card of the given kind, shown until a resource is attached
    pub fn new(kind: AssetKind) -> Self {
        Self {
            kind,
            uuid: String::new(),
            name: String::new(),
            meta: String::new(),
            visible: true,
            size: 0.0,
        }
    }

    /// Card already attached to `asset`
    pub fn for_asset(asset: &dyn Asset) -> Self {
        let mut card = Self::new(asset.asset_kind());
        card.attach(asset);
        card
    }

    pub fn attach(&mut self, asset: &dyn Asset) {
        self.kind = asset.asset_kind();
        self.uuid = asset.uuid().to_string();
        self.name = asset.name().to_string();
        self.meta = asset.meta();
    }

    pub fn set_visibility(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn set_size(&mut self, size: f32) {
        self.size = size;
    }

    /// Releases the card
    pub fn destroy(self) {
        log::trace!("Destroyed asset card {} ({})", self.name, self.uuid);
    }

    /// Draws the card and returns whether it was clicked
    pub fn render(&self, ui: &imgui::Ui) -> bool {
        let _id = ui.push_id(self.uuid.as_str());
        let group = ui.begin_group();

        let clicked = ui.button_with_size(self.kind.label(), [self.size, self.size * 0.75]);

        // Clip long names to the card width
        let max_chars = ((self.size / 7.0) as usize).max(4);
        if self.name.chars().count() > max_chars {
            let clipped: String = self.name.chars().take(max_chars - 1).collect();
            ui.text(format!("{}~", clipped));
        } else {
            ui.text(&self.name);
        }

        group.end();

        if ui.is_item_hovered() {
            ui.tooltip_text(format!("{}\n{}", self.name, self.meta));
        }

        clicked
    }
}
