use std::ops::RangeInclusive;

use eframe::egui::{self, RichText, Ui};

use super::super::ViewModel;

fn tuning_slider(
    ui: &mut Ui,
    value: &mut f32,
    range: RangeInclusive<f32>,
    text: &str,
    hover: &str,
) -> bool {
    ui.add(
        egui::Slider::new(value, range)
            .text(text)
            .clamping(egui::SliderClamping::Always),
    )
    .on_hover_text(hover)
    .changed()
}

impl ViewModel {
    pub(in crate::app) fn draw_controls(&mut self, ui: &mut Ui) {
        ui.heading("Graph Controls");
        ui.separator();
        ui.add_space(4.0);

        ui.label("Search (id or name)")
            .on_hover_text("Fuzzy-highlight matching nodes without changing the layout.");
        ui.text_edit_singleline(&mut self.search);

        ui.separator();

        if ui
            .checkbox(&mut self.view.show_labels, "Show labels")
            .on_hover_text("Draw names next to large nodes and when zoomed in.")
            .changed()
            && let Some(instance) = self.instance.as_mut()
        {
            instance.set_view_config(self.view);
        }

        let mut physics_changed = false;
        ui.collapsing("Physics tuning", |ui| {
            let physics = &mut self.physics;
            physics_changed |= tuning_slider(
                ui,
                &mut physics.charge_strength,
                -300.0..=-5.0,
                "Repulsion",
                "Many-body charge. More negative pushes nodes further apart.",
            );
            physics_changed |= tuning_slider(
                ui,
                &mut physics.link_distance,
                20.0..=240.0,
                "Link distance",
                "Resting length of every link before the size-based growth.",
            );
            physics_changed |= tuning_slider(
                ui,
                &mut physics.link_strength,
                0.05..=1.5,
                "Link strength",
                "How strongly linked nodes pull toward the resting length.",
            );
            physics_changed |= tuning_slider(
                ui,
                &mut physics.collision_padding,
                0.0..=24.0,
                "Collision padding",
                "Extra gap kept between node discs.",
            );
            physics_changed |= tuning_slider(
                ui,
                &mut physics.velocity_decay,
                0.1..=0.9,
                "Velocity decay",
                "Fraction of velocity removed on every tick.",
            );
            physics_changed |= tuning_slider(
                ui,
                &mut physics.center_strength,
                0.0..=1.0,
                "Centering",
                "How strongly the layout is pulled back to the canvas centre.",
            );
        });

        let Some(instance) = self.instance.as_mut() else {
            ui.label("Waiting for the canvas...");
            return;
        };

        if physics_changed {
            instance.set_simulation_config(self.physics);
        }

        if ui
            .button("Reheat layout")
            .on_hover_text("Restart the simulation from the current positions.")
            .clicked()
        {
            instance.reheat();
        }

        ui.separator();
        ui.label(format!("Nodes: {}", instance.graph().node_count()));
        ui.label(format!("Links: {}", instance.graph().link_count()));
        ui.label(format!(
            "Alpha: {:.3} ({:?})",
            instance.simulation().alpha(),
            instance.tick_state()
        ));
        if let Some(search) = instance.search() {
            ui.label(format!("Search matches: {}", search.match_count()));
        }

        let diagnostics = instance.diagnostics();
        if !diagnostics.is_empty() {
            ui.separator();
            ui.collapsing(format!("Data issues ({})", diagnostics.len()), |ui| {
                egui::ScrollArea::vertical()
                    .id_salt("diagnostics")
                    .max_height(160.0)
                    .show(ui, |ui| {
                        for diagnostic in diagnostics {
                            ui.small(diagnostic.to_string());
                        }
                    });
            });
        }

        ui.separator();
        ui.label(RichText::new("Activity").strong());
        egui::ScrollArea::vertical()
            .id_salt("activity")
            .max_height(200.0)
            .show(ui, |ui| {
                for entry in self.host.activity() {
                    ui.small(entry);
                }
            });
    }
}
