//! Dockable tab panels

use crate::config::EditorSettings;

/// State shared by every tab: title, icon, placement and size
#[derive(Debug, Clone, PartialEq)]
pub struct TabComponent {
    pub title: String,
    /// Icon path, relative to the editor's asset directory
    pub icon: String,
    pub closeable: bool,
    /// Position among the tabs of its container
    pub index: usize,
    pub open: bool,
    pub size: [f32; 2],
}

impl TabComponent {
    pub fn new(title: impl Into<String>, icon: impl Into<String>, closeable: bool, index: usize) -> Self {
        Self {
            title: title.into(),
            icon: icon.into(),
            closeable,
            index,
            open: true,
            size: [0.0, 0.0],
        }
    }

    /// ImGui window label; the `###` suffix keeps the window id stable
    pub fn window_label(&self) -> String {
        format!("{}###tab{}", self.title, self.index)
    }
}

/// A panel hosted in a tab
pub trait Panel {
    fn tab(&self) -> &TabComponent;

    fn tab_mut(&mut self) -> &mut TabComponent;

    /// Lays the panel out for a new size
    fn update_size(&mut self, size: [f32; 2]) {
        self.tab_mut().size = size;
    }

    /// Applies changed editor settings
    fn update_settings(&mut self, _settings: &EditorSettings) {}

    fn render(&mut self, ui: &imgui::Ui);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_label_is_stable() {
        let mut tab = TabComponent::new("Assets", "icons/misc/new.png", false, 2);
        let before = tab.window_label();
        tab.title = "Renamed".to_string();
        assert!(before.ends_with("###tab2"));
        assert!(tab.window_label().ends_with("###tab2"));
    }
}
