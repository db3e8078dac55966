use std::collections::VecDeque;
use egui::{Align2, Context};
use egui_plot::{AxisHints, GridMark, PlotPoints};
use std::ops::RangeInclusive;

use crate::gui_view_settings::{view_settings_gui, ViewSettings};
use crate::gui_info::info_gui;


pub struct GuiConfig {
    pub view_settings_open: bool,
    pub info_open: bool,
    pub frame_limit: u32,
    pub frame_limit_unlimited: bool
}

impl GuiConfig {
    pub fn with_frame_limit(frame_limit: u32) -> Self {
        Self {
            frame_limit,
            frame_limit_unlimited: frame_limit == 0,
            ..Default::default()
        }
    }
}

impl Default for GuiConfig {
    fn default() -> Self {
        Self {
            view_settings_open: false,
            info_open: false,
            frame_limit: 60,
            frame_limit_unlimited: false
        }
    }
}

/// What the top bar shows for the scene this frame.
pub struct ScenePanel<'a> {
    pub door_label: &'a str,
    pub show_all_label: &'a str,
    /// The door can only be toggled while it rests and both door models are loaded.
    pub door_enabled: bool,
    pub show_all_enabled: bool,
    pub assets_loading: usize,
}

/// Buttons clicked this frame.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct GuiActions {
    pub toggle_door: bool,
    pub show_all: bool,
}


pub fn gui(ui: &Context, fps: &VecDeque<f32>, gui_config: &mut GuiConfig, scene: &ScenePanel, view_settings: &mut ViewSettings) -> GuiActions {
    let mut actions = GuiActions::default();

    // Top bar
    egui::TopBottomPanel::top("top").show(ui, |ui| {
        ui.horizontal(|ui| {
            if ui.add_enabled(scene.show_all_enabled, egui::Button::new(scene.show_all_label)).clicked() {
                actions.show_all = true;
            }
            if ui.add_enabled(scene.door_enabled, egui::Button::new(scene.door_label)).clicked() {
                actions.toggle_door = true;
            }
            ui.separator();

            ui.label("Settings:");
            if ui.button("View").clicked() {
                gui_config.view_settings_open = !gui_config.view_settings_open;
            }
            ui.separator();

            if ui.button("Info").clicked() {
                gui_config.info_open = !gui_config.info_open;
            }
            ui.separator();

            if scene.assets_loading > 0 {
                ui.spinner();
                ui.label(format!("Loading {} assets", scene.assets_loading));
            }
        });
    });

    // Frame info window
    egui::Window::new("Frame Info")
        .default_open(true)
        .max_width(1000.0)
        .max_height(800.0)
        .default_width(800.0)
        .anchor(Align2::RIGHT_TOP, [0.0, 0.0])
        .frame(egui::Frame::default().fill(egui::Color32::from_black_alpha(150)))
        .title_bar(false)
        .interactable(false)
        .show(ui, |ui| {
            // average fps over the last 20 frames
            let recent = fps.iter().take(20);
            let count = recent.len().max(1);
            let avg_fps: f32 = recent.sum::<f32>() / count as f32;
            let color = if avg_fps > 60.0 {
                egui::Color32::from_rgb(0, 255, 0) // green
            } else if avg_fps > 30.0 {
                egui::Color32::from_rgb(255, 165, 0) // orange
            } else {
                egui::Color32::from_rgb(255, 0, 0) // red
            };
            ui.colored_label(color, format!("FPS: {:.1}", avg_fps));

            // oldest first
            let frame_times: Vec<f32> = fps.iter().rev().copied().collect();

            let ms_formatter = |mark: GridMark, _digits: usize, _range : &'_ RangeInclusive<f64>| {
                format!("{:}ms", mark.value)
            };

            let y_axis = vec![
                AxisHints::new_y()
                .formatter(ms_formatter)
                .max_digits(4),
                ];
            let x_axis = vec![
                AxisHints::new_x()
                .label(format!("Last {} Frames", frame_times.len()))
                .formatter(|mark, _digits, _range| format!("{:}", mark.value))
                .max_digits(3)];

            ui.vertical(|ui| {
                ui.colored_label(egui::Color32::WHITE, "Frametimes (ms):");
                egui_plot::Plot::new("plot")
                    .allow_zoom(false)
                    .allow_boxed_zoom(false)
                    .allow_drag(false)
                    .allow_scroll(false)
                    .show_x(false)
                    .show_y(false)
                    .width(200.0)
                    .height(100.0)
                    .custom_y_axes(y_axis)
                    .custom_x_axes(x_axis)
                    .show(ui, |plot_ui| {
                        let plot_points: PlotPoints = frame_times.iter().enumerate().map(|(i, fps)| {
                            [i as f64, (1000.0 / fps.max(f32::EPSILON)) as f64]
                        }).collect();
                        plot_ui.line(egui_plot::Line::new(plot_points).name("Frametimes"));
                    })
            });
        });

    // Setting windows
    if gui_config.view_settings_open {
        view_settings_gui(ui, gui_config, view_settings);
    }
    if gui_config.info_open {
        info_gui(ui);
    }

    actions
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_limit_zero_means_unlimited() {
        let config = GuiConfig::with_frame_limit(0);
        assert!(config.frame_limit_unlimited);
        assert!(!config.view_settings_open);

        let config = GuiConfig::with_frame_limit(144);
        assert_eq!(config.frame_limit, 144);
        assert!(!config.frame_limit_unlimited);
    }

    #[test]
    fn test_gui_runs_headless() {
        let ctx = Context::default();
        let fps: VecDeque<f32> = (0..100).map(|_| 60.0).collect();
        let mut gui_config = GuiConfig { view_settings_open: true, info_open: true, ..Default::default() };
        let mut view_settings = ViewSettings { door_speed: 0.04, damping: 0.05 };
        let panel = ScenePanel {
            door_label: "Open door",
            show_all_label: "Show all",
            door_enabled: true,
            show_all_enabled: false,
            assets_loading: 2,
        };

        let mut actions = GuiActions::default();
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            actions = gui(ctx, &fps, &mut gui_config, &panel, &mut view_settings);
        });
        // nothing was clicked
        assert_eq!(actions, GuiActions::default());
        assert_eq!(view_settings.door_speed, 0.04);
    }
}
