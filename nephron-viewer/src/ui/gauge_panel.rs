//! GFR gauges and filtrate drop counters

use egui::Ui;
use nephron::prelude::*;

use super::to_color32;

/// GFR below this reads as kidney failure.
const FAILURE_GFR: f32 = 15.0;

pub fn render_gauge_panel(ui: &mut Ui, frame: &Frame) {
    ui.heading("Filtration");

    for variant in Variant::all() {
        ui.add_space(4.0);
        ui.label(egui::RichText::new(variant.label()).strong());

        let value = frame.gfr_for(variant);
        let fill = if value < FAILURE_GFR {
            egui::Color32::from_rgb(200, 40, 40)
        } else {
            let style = ParticleStyle::for_population(Population::Filtrate, variant);
            to_color32(style.color, 1.0)
        };
        ui.add(
            egui::ProgressBar::new(gauge_fraction(value))
                .fill(fill)
                .text(format!("GFR {:.0} mL/min", value)),
        );
        ui.label(format!("Filtrate drops: {}", frame.drops_for(variant)));
    }

    ui.add_space(4.0);
    ui.label(
        egui::RichText::new(format!("Gauge full scale: {:.0} mL/min", GAUGE_MAX))
            .small()
            .weak(),
    );
}
