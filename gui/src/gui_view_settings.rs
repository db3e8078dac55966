use egui::{Context, InnerResponse, Margin, RichText};
use crate::GuiConfig;

/// Runtime tunables edited in the view settings panel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewSettings {
    /// Door progress per frame.
    pub door_speed: f32,
    pub damping: f32,
}


pub fn view_settings_gui(ui: &Context, gui_config: &mut GuiConfig, view_settings: &mut ViewSettings) -> InnerResponse<()> {
    let startframelimit = gui_config.frame_limit;

    egui::SidePanel::left("View Settings")
        .frame(egui::Frame::default()
            .fill(egui::Color32::from_black_alpha(200))
            .inner_margin(Margin{ left:10.0, right:10.0, top:10.0, bottom:10.0}))
            .show(ui, |ui| {
            ui.heading("View Settings");

            // Framerate limit selection
            ui.horizontal(|ui| {
                ui.label("Framerate Limit:");
                ui.checkbox(&mut gui_config.frame_limit_unlimited, "Unlimited");
                ui.add(egui::Slider::new(&mut gui_config.frame_limit, 1..=240).text("FPS"));
            });
            ui.separator();

            ui.label(RichText::new("Door").strong());
            ui.add(egui::Slider::new(&mut view_settings.door_speed, 0.005..=0.5)
                .logarithmic(true)
                .text("Speed per frame"));
            let frames = (1.0 / view_settings.door_speed).ceil();
            ui.label(format!("A full transition takes {} frames", frames));
            ui.separator();

            ui.label(RichText::new("Camera").strong());
            ui.add(egui::Slider::new(&mut view_settings.damping, 0.01..=1.0).text("Damping"));

            if gui_config.frame_limit != startframelimit {
                gui_config.frame_limit_unlimited = false;
            }

            if gui_config.frame_limit_unlimited && gui_config.frame_limit != 0{
                egui::Window::new("Warning")
                .title_bar(false)
                .show(ui.ctx(), |ui| {
                    ui.colored_label(egui::Color32::from_rgb(255, 165, 0),
                        RichText::new("Warning").heading());

                    ui.colored_label( egui::Color32::from_rgb(255, 165, 0),
                        "Without a framerate limit the viewer renders as fast as the GPU allows."
                    );
                    ui.colored_label( egui::Color32::from_rgb(255, 165, 0),
                        "The door animation advances once per frame, so it also plays faster."
                    );
                    ui.separator();
                    ui.horizontal(|ui| {
                        if ui.button("Confirm").clicked() {
                            gui_config.frame_limit = 0;
                        }
                        if ui.button("Cancel").clicked() {
                            gui_config.frame_limit_unlimited = false;
                        }
                    });
                });
            }
        })
}
