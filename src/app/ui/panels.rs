use std::path::Path;

use eframe::egui::{self, Align, Context, Layout};

use super::super::ViewModel;

impl ViewModel {
    pub(in crate::app) fn show(
        &mut self,
        ctx: &Context,
        source: &Path,
        reload_requested: &mut bool,
        is_loading: bool,
    ) {
        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("relgraph");
                    ui.separator();
                    ui.label(format!("source: {}", source.display()));
                    if let Some(instance) = &self.instance {
                        ui.label(format!("nodes: {}", instance.graph().node_count()));
                        ui.label(format!("links: {}", instance.graph().link_count()));
                    }
                    let reload_button = ui.add_enabled(!is_loading, egui::Button::new("Reload"));
                    if reload_button.clicked() {
                        *reload_requested = true;
                    }
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        if let Some(instance) = &self.instance {
                            ui.label(format!(
                                "alpha {:.3}  |  {:?}",
                                instance.simulation().alpha(),
                                instance.tick_state()
                            ));
                        }
                    });
                });
            });

        egui::SidePanel::left("controls")
            .resizable(true)
            .default_width(320.0)
            .show(ctx, |ui| self.draw_controls(ui));

        egui::SidePanel::right("details")
            .resizable(true)
            .default_width(320.0)
            .show(ctx, |ui| self.details.draw(ui));

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                if is_loading {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Reloading relationship graph...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                } else {
                    self.draw_canvas(ui);
                }
            });
    }
}
