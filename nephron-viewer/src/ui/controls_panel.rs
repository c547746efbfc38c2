//! Playback controls: play/pause, reset, info, view, speed and stage

use egui::Ui;
use nephron::prelude::*;

/// Draw the control bar and return the events the user triggered.
pub fn render_controls_panel(ui: &mut Ui, state: &ViewState) -> Vec<Event> {
    let mut events = Vec::new();

    ui.horizontal(|ui| {
        let play_label = if state.playing { "⏸ Pause" } else { "▶ Play" };
        if ui.button(play_label).on_hover_text("Space").clicked() {
            events.push(Event::TogglePlay);
        }
        if ui.button("⟲ Reset").on_hover_text("R").clicked() {
            events.push(Event::Reset);
        }
        let info_label = if state.info_visible { "Hide Info" } else { "Show Info" };
        if ui.button(info_label).on_hover_text("I").clicked() {
            events.push(Event::ToggleInfo);
        }

        ui.separator();

        // View selector
        let mut view = state.view;
        egui::ComboBox::from_id_salt("view_mode")
            .selected_text(view.label())
            .show_ui(ui, |ui| {
                for mode in ViewMode::all() {
                    ui.selectable_value(&mut view, mode, mode.label());
                }
            });
        if view != state.view {
            events.push(Event::SetView(view));
        }

        ui.separator();

        let mut speed = state.speed.value();
        if ui
            .add(
                egui::Slider::new(&mut speed, Speed::MIN.value()..=Speed::MAX.value())
                    .step_by(Speed::STEP as f64)
                    .text("Speed")
                    .suffix("×"),
            )
            .changed()
        {
            events.push(Event::SetSpeed(Speed::new(speed)));
        }

        let mut stage = state.stage.get();
        if ui
            .add(egui::Slider::new(&mut stage, CkdStage::MIN.get()..=CkdStage::MAX.get()).text("CKD Stage"))
            .on_hover_text(state.stage.label())
            .changed()
        {
            events.push(Event::SetStage(CkdStage::clamped(stage)));
        }
    });

    events
}
