mod gui;
mod gui_structure;
mod gui_view_settings;
mod gui_info;

pub use gui::EguiRenderer;
pub use gui_structure::{GuiActions, GuiConfig, ScenePanel, gui};
pub use gui_view_settings::{ViewSettings, view_settings_gui};
pub use gui_info::info_gui;
