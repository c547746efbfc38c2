//! Painter for one kidney scene
//!
//! Scene coordinates are mapped into the available rect with a uniform
//! scale. The x range is widened on both sides so labels placed left of the
//! kidney stay on screen.

use egui::{Align2, Color32, FontId, Pos2, Rect, Shape, Stroke, Ui};
use glam::{Vec2, Vec3};
use nephron::scene::{Leader, KIDNEY_ORIGIN, KIDNEY_SIZE, LABEL_LINE_HEIGHT, SCENE_SIZE};
use nephron::{GlomerulusPulse, Population, Scene};

const MARGIN_LEFT: f32 = 40.0;
const MARGIN_RIGHT: f32 = 60.0;

const CORTEX: Vec3 = Vec3::new(0.78, 0.42, 0.38);
const MEDULLA: Vec3 = Vec3::new(0.62, 0.26, 0.26);
const PELVIS: Vec3 = Vec3::new(0.93, 0.85, 0.72);

/// Convert an RGB color in `[0, 1]` plus opacity to egui.
pub fn to_color32(color: Vec3, opacity: f32) -> Color32 {
    let c = (color.clamp(Vec3::ZERO, Vec3::ONE) * 255.0).round();
    Color32::from_rgba_unmultiplied(c.x as u8, c.y as u8, c.z as u8, (opacity.clamp(0.0, 1.0) * 255.0) as u8)
}

/// Maps scene coordinates to screen coordinates.
#[derive(Clone, Copy)]
struct Mapping {
    origin: Pos2,
    scale: f32,
}

impl Mapping {
    fn fit(rect: Rect) -> Self {
        let extent = Vec2::new(SCENE_SIZE.x + MARGIN_LEFT + MARGIN_RIGHT, SCENE_SIZE.y);
        let scale = (rect.width() / extent.x).min(rect.height() / extent.y).max(0.01);
        let used = egui::vec2(extent.x * scale, extent.y * scale);
        let top_left = rect.center() - used * 0.5;
        Self {
            origin: top_left + egui::vec2(MARGIN_LEFT * scale, 0.0),
            scale,
        }
    }

    fn pos(&self, p: Vec2) -> Pos2 {
        self.origin + egui::vec2(p.x * self.scale, p.y * self.scale)
    }

    fn len(&self, l: f32) -> f32 {
        l * self.scale
    }
}

/// Draw `scene` into the remaining space of `ui`.
///
/// `seconds` is wall-clock animation time; it drives only the glomerulus
/// pulse, which keeps beating while playback is paused.
pub fn render_kidney_view(ui: &mut Ui, scene: &Scene, seconds: f32) {
    let size = ui.available_size();
    let (rect, _) = ui.allocate_exact_size(size, egui::Sense::hover());
    let painter = ui.painter_at(rect);
    let map = Mapping::fit(rect);
    let background = ui.visuals().extreme_bg_color;

    draw_kidney(&painter, &map, scene, background);
    draw_glomerulus(&painter, &map, &scene.glomerulus, seconds);

    for population in Population::all() {
        let style = scene.style(population);
        for particle in scene.particles(population) {
            let center = map.pos(particle.position);
            let opacity = particle.opacity * style.opacity_scale;
            painter.circle_filled(
                center,
                map.len(style.radius + style.glow),
                to_color32(style.color, opacity * 0.3),
            );
            painter.circle_filled(center, map.len(style.radius), to_color32(style.color, opacity));
        }
    }

    for annotation in scene.annotations {
        let color = to_color32(annotation.color, 1.0);
        if let Some(leader) = annotation.leader {
            draw_leader(&painter, &map, &leader, color);
        }
        for (i, line) in annotation.lines.iter().enumerate() {
            let anchor = annotation.anchor + Vec2::new(0.0, i as f32 * LABEL_LINE_HEIGHT);
            painter.text(
                map.pos(anchor),
                Align2::LEFT_BOTTOM,
                *line,
                FontId::proportional(map.len(10.0)),
                color,
            );
        }
    }
}

fn ellipse(map: &Mapping, center: Vec2, radii: Vec2, fill: Color32) -> Shape {
    const SEGMENTS: usize = 48;
    let points = (0..SEGMENTS)
        .map(|i| {
            let a = i as f32 / SEGMENTS as f32 * std::f32::consts::TAU;
            map.pos(center + Vec2::new(a.cos() * radii.x, a.sin() * radii.y))
        })
        .collect();
    Shape::convex_polygon(points, fill, Stroke::NONE)
}

fn draw_kidney(painter: &egui::Painter, map: &Mapping, scene: &Scene, background: Color32) {
    let center = KIDNEY_ORIGIN + KIDNEY_SIZE * 0.5;
    let tint = scene.tint;

    painter.add(ellipse(map, center, KIDNEY_SIZE * Vec2::new(0.42, 0.44), to_color32(tint.apply(CORTEX), 1.0)));
    painter.add(ellipse(
        map,
        center + Vec2::new(-10.0, 0.0),
        KIDNEY_SIZE * Vec2::new(0.28, 0.32),
        to_color32(tint.apply(MEDULLA), 1.0),
    ));

    // Hilum notch with the pelvis inside it
    painter.circle_filled(map.pos(Vec2::new(KIDNEY_ORIGIN.x + 40.0, center.y)), map.len(45.0), background);
    painter.add(ellipse(
        map,
        Vec2::new(KIDNEY_ORIGIN.x + 115.0, center.y + 75.0),
        Vec2::new(35.0, 45.0),
        to_color32(tint.apply(PELVIS), 1.0),
    ));
}

fn draw_glomerulus(painter: &egui::Painter, map: &Mapping, pulse: &GlomerulusPulse, seconds: f32) {
    const RINGS: usize = 8;
    let intensity = pulse.intensity(seconds);
    let center = map.pos(pulse.center);
    // Radial falloff approximated by stacked discs, outermost first
    for ring in 0..RINGS {
        let k = (RINGS - ring) as f32 / RINGS as f32;
        let alpha = pulse.opacity * intensity * (1.0 - k) / RINGS as f32 * 2.0;
        painter.circle_filled(center, map.len(pulse.radius * k), to_color32(pulse.color, alpha));
    }
}

fn draw_leader(painter: &egui::Painter, map: &Mapping, leader: &Leader, color: Color32) {
    let points = [map.pos(leader.from), map.pos(leader.to)];
    let stroke = Stroke::new(1.0, color);
    if leader.dashed {
        painter.extend(Shape::dashed_line(&points, stroke, map.len(3.0), map.len(3.0)));
    } else {
        painter.line_segment(points, stroke);
    }
}
