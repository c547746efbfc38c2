//! UI modules for the viewer

mod controls_panel;
mod gauge_panel;
mod info_panel;
mod kidney_view;

pub use controls_panel::render_controls_panel;
pub use gauge_panel::render_gauge_panel;
pub use info_panel::render_info_panel;
pub use kidney_view::{render_kidney_view, to_color32};
