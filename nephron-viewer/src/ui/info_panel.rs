//! Legend and stage details, shown while info is visible

use egui::Ui;
use nephron::prelude::*;
use nephron::StageParams;

use super::to_color32;

pub fn render_info_panel(ui: &mut Ui, stage: CkdStage) {
    ui.heading("Legend");

    for (population, text) in [
        (Population::Blood, "Blood through the glomerulus"),
        (Population::Filtrate, "Filtrate leaving the capsule"),
        (Population::Protein, "Leaked protein (CKD only)"),
    ] {
        let style = ParticleStyle::for_population(population, Variant::Ckd);
        ui.horizontal(|ui| {
            let (rect, _) = ui.allocate_exact_size(egui::vec2(12.0, 12.0), egui::Sense::hover());
            ui.painter()
                .circle_filled(rect.center(), style.radius + 1.0, to_color32(style.color, 1.0));
            ui.label(text);
        });
    }

    ui.separator();
    ui.label(egui::RichText::new(stage.label()).strong());

    egui::Grid::new("stage_table").striped(true).show(ui, |ui| {
        ui.label("Stage");
        ui.label("GFR");
        ui.label("Protein");
        ui.end_row();
        for params in StageParams::all() {
            let text = |s: String| {
                let rich = egui::RichText::new(s);
                if params.stage == stage {
                    rich.strong()
                } else {
                    rich.weak()
                }
            };
            ui.label(text(params.stage.to_string()));
            ui.label(text(format!("{:.0}", params.baseline_gfr)));
            ui.label(text(params.protein_count.to_string()));
            ui.end_row();
        }
    });

    ui.separator();
    ui.label(
        egui::RichText::new("Space: play/pause   R: reset   I: toggle info")
            .small()
            .weak(),
    );
}
