use eframe::egui::{Align2, Color32, FontId, Painter, Pos2, Rect, Stroke, StrokeKind, Vec2, vec2};

use super::Scene;
use super::style;

const LABEL_FONT_SIZE: f32 = 12.0;
const PANEL_PADDING: f32 = 8.0;
const LEGEND_ROW: f32 = 18.0;

fn draw_background(painter: &Painter, rect: Rect, pan: Vec2, zoom: f32) {
    painter.rect_filled(rect, 0.0, style::BACKGROUND);

    let step = (56.0 * zoom.clamp(0.6, 1.8)).max(20.0);
    let origin = rect.min + pan;
    let stroke = Stroke::new(1.0, style::GRID);

    let mut x = rect.left() + (origin.x - rect.left()).rem_euclid(step);
    while x < rect.right() {
        painter.line_segment([Pos2::new(x, rect.top()), Pos2::new(x, rect.bottom())], stroke);
        x += step;
    }

    let mut y = rect.top() + (origin.y - rect.top()).rem_euclid(step);
    while y < rect.bottom() {
        painter.line_segment([Pos2::new(rect.left(), y), Pos2::new(rect.right(), y)], stroke);
        y += step;
    }
}

/// Background-colored copies around the text so labels stay legible over links.
fn draw_halo_text(painter: &Painter, anchor: Pos2, text: &str, color: Color32, halo: Color32) {
    let font = FontId::proportional(LABEL_FONT_SIZE);
    for offset in [vec2(-1.0, 0.0), vec2(1.0, 0.0), vec2(0.0, -1.0), vec2(0.0, 1.0)] {
        painter.text(anchor + offset, Align2::LEFT_CENTER, text, font.clone(), halo);
    }
    painter.text(anchor, Align2::LEFT_CENTER, text, font, color);
}

fn draw_panel(painter: &Painter, bounds: Rect, rect: Rect) -> Rect {
    let shift_x = (bounds.right() - rect.right()).min(0.0) + (bounds.left() - rect.left()).max(0.0);
    let shift_y = (bounds.bottom() - rect.bottom()).min(0.0) + (bounds.top() - rect.top()).max(0.0);
    let rect = rect.translate(vec2(shift_x, shift_y));
    painter.rect_filled(rect, 4.0, style::PANEL);
    painter.rect_stroke(
        rect,
        4.0,
        Stroke::new(1.0, Color32::from_gray(60)),
        StrokeKind::Inside,
    );
    rect
}

/// Draws `scene` into `rect`. Scene coordinates are relative to `rect.min`.
pub fn paint(scene: &Scene, painter: &Painter, rect: Rect) {
    let origin = rect.min.to_vec2();
    draw_background(painter, rect, scene.transform.translation, scene.transform.scale);

    if let Some(message) = &scene.empty_message {
        painter.text(
            rect.center(),
            Align2::CENTER_CENTER,
            message,
            FontId::proportional(16.0),
            style::MUTED_TEXT,
        );
        return;
    }

    for link in &scene.links {
        painter.line_segment([link.from + origin, link.to + origin], link.stroke);
    }

    for node in &scene.nodes {
        let center = node.center + origin;
        painter.circle_filled(center, node.radius, node.fill);
        painter.circle_stroke(center, node.radius, node.outline);
        if let Some(ring) = node.ring {
            painter.circle_stroke(center, node.radius + 4.0, ring);
        }
    }

    for label in &scene.labels {
        draw_halo_text(painter, label.anchor + origin, &label.text, label.color, label.halo);
    }

    if !scene.legend.is_empty() {
        let font = FontId::proportional(LABEL_FONT_SIZE);
        let text_width = scene
            .legend
            .iter()
            .map(|entry| {
                painter
                    .layout_no_wrap(entry.group.clone(), font.clone(), style::PANEL_TEXT)
                    .size()
                    .x
            })
            .fold(0.0_f32, f32::max);
        let size = vec2(
            text_width + 22.0 + PANEL_PADDING * 2.0,
            scene.legend.len() as f32 * LEGEND_ROW + PANEL_PADDING * 2.0,
        );
        let panel = draw_panel(
            painter,
            rect,
            Rect::from_min_size(rect.left_bottom() + vec2(10.0, -10.0 - size.y), size),
        );
        for (row, entry) in scene.legend.iter().enumerate() {
            let y = panel.top() + PANEL_PADDING + (row as f32 + 0.5) * LEGEND_ROW;
            let swatch = Pos2::new(panel.left() + PANEL_PADDING + 6.0, y);
            painter.circle_filled(swatch, 5.0, entry.color);
            painter.text(
                swatch + vec2(12.0, 0.0),
                Align2::LEFT_CENTER,
                &entry.group,
                font.clone(),
                style::PANEL_TEXT,
            );
        }
    }

    painter.text(
        rect.right_top() + vec2(-10.0, 10.0),
        Align2::RIGHT_TOP,
        &scene.zoom_badge,
        FontId::monospace(12.0),
        style::MUTED_TEXT,
    );

    if let Some(tooltip) = &scene.tooltip {
        let mut text = tooltip.title.clone();
        for line in &tooltip.lines {
            text.push('\n');
            text.push_str(line);
        }
        let galley = painter.layout_no_wrap(text, FontId::proportional(13.0), style::PANEL_TEXT);
        let panel = draw_panel(
            painter,
            rect,
            Rect::from_min_size(
                tooltip.anchor + origin,
                galley.size() + Vec2::splat(PANEL_PADDING * 2.0),
            ),
        );
        painter.galley(
            panel.min + Vec2::splat(PANEL_PADDING),
            galley,
            style::PANEL_TEXT,
        );
    }
}
