use egui::{Context, InnerResponse, Margin, RichText};


pub fn info_gui(ui: &Context) -> InnerResponse<()> {

    egui::SidePanel::right("Info")
        .frame(egui::Frame::default()
            .fill(egui::Color32::from_black_alpha(200))
            .inner_margin(Margin{ left:10.0, right:10.0, top:10.0, bottom:10.0})
            )
        .show(ui, |ui| {
            ui.heading("Info");
            ui.label(RichText::new("Camera").strong());
            ui.label("Rotate: Left mouse drag");
            ui.label("Pan: Right mouse drag");
            ui.label("Zoom: Mouse wheel");
            ui.label("Frame the ger: 'F'");
            ui.label(RichText::new("Door").strong());
            ui.label("Open: Click the red marker");
            ui.label("Open/Close: 'O'");
            ui.label(RichText::new("Exit").strong());
            ui.label("Close Programm: 'ESC'");
        })
}
