use eframe::egui::{Color32, Pos2, Rect};

pub const BACKGROUND: Color32 = Color32::from_rgb(19, 23, 29);
pub const GRID: Color32 = Color32::from_rgba_premultiplied(25, 29, 33, 70);
pub const SELECTED: Color32 = Color32::from_rgb(245, 206, 93);
pub const SEARCH_MATCH: Color32 = Color32::from_rgb(103, 196, 255);
pub const NODE_OUTLINE: Color32 = Color32::from_rgba_premultiplied(11, 11, 11, 190);
pub const LABEL: Color32 = Color32::from_gray(238);
pub const PANEL: Color32 = Color32::from_rgba_premultiplied(24, 28, 34, 230);
pub const PANEL_TEXT: Color32 = Color32::from_gray(240);
pub const MUTED_TEXT: Color32 = Color32::from_gray(170);

pub(crate) fn blend_color(base: Color32, overlay: Color32, amount: f32) -> Color32 {
    base.lerp_to_gamma(overlay, amount.clamp(0.0, 1.0))
}

/// Darkens toward black and fades out, for nodes outside the current focus.
pub(crate) fn dim_color(color: Color32, factor: f32) -> Color32 {
    let factor = factor.clamp(0.0, 1.0);
    let [r, g, b, a] = color.to_srgba_unmultiplied();
    let scale = |channel: u8, by: f32| (channel as f32 * by).round() as u8;
    Color32::from_rgba_unmultiplied(
        scale(r, factor),
        scale(g, factor),
        scale(b, factor),
        scale(a, 0.45 + factor * 0.55),
    )
}

pub(crate) fn ease_out_cubic(t: f32) -> f32 {
    let inverse = 1.0 - t.clamp(0.0, 1.0);
    1.0 - inverse * inverse * inverse
}

pub(crate) fn circle_visible(rect: Rect, center: Pos2, radius: f32) -> bool {
    rect.expand(radius).contains(center)
}

/// Whether any part of the segment falls inside `rect` grown by `padding`.
/// Clips the segment parametrically against each slab of the rectangle.
pub(crate) fn edge_visible(rect: Rect, start: Pos2, end: Pos2, padding: f32) -> bool {
    let bounds = rect.expand(padding);
    let delta = end - start;
    let (mut enter, mut exit) = (0.0_f32, 1.0_f32);

    let slabs = [
        (-delta.x, start.x - bounds.left()),
        (delta.x, bounds.right() - start.x),
        (-delta.y, start.y - bounds.top()),
        (delta.y, bounds.bottom() - start.y),
    ];
    for (direction, distance) in slabs {
        if direction == 0.0 {
            if distance < 0.0 {
                return false;
            }
            continue;
        }
        let t = distance / direction;
        if direction < 0.0 {
            enter = enter.max(t);
        } else {
            exit = exit.min(t);
        }
        if enter > exit {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use eframe::egui::pos2;

    use super::*;

    #[test]
    fn ease_out_is_monotonic_and_bounded() {
        assert_eq!(ease_out_cubic(-1.0), 0.0);
        assert_eq!(ease_out_cubic(1.5), 1.0);
        assert!(ease_out_cubic(0.5) > 0.5);
        assert!(ease_out_cubic(0.3) < ease_out_cubic(0.4));
    }

    #[test]
    fn edge_crossing_the_canvas_is_visible() {
        let rect = Rect::from_min_max(pos2(0.0, 0.0), pos2(100.0, 100.0));
        assert!(edge_visible(rect, pos2(-50.0, 50.0), pos2(150.0, 50.0), 0.0));
        assert!(edge_visible(rect, pos2(10.0, 10.0), pos2(20.0, 20.0), 0.0));
        assert!(edge_visible(rect, pos2(-20.0, 120.0), pos2(120.0, -20.0), 0.0));
        assert!(!edge_visible(rect, pos2(-50.0, -50.0), pos2(-10.0, 150.0), 0.0));
        assert!(!edge_visible(rect, pos2(150.0, -10.0), pos2(250.0, 200.0), 0.0));
    }

    #[test]
    fn dimmed_color_is_darker_and_more_transparent() {
        let base = Color32::from_rgb(200, 100, 50);
        let dimmed = dim_color(base, 0.5);
        assert!(dimmed.r() < base.r() && dimmed.g() < base.g());
        assert!(dimmed.a() < 255);
    }

    #[test]
    fn blend_endpoints_return_inputs() {
        let base = Color32::from_rgb(10, 20, 30);
        assert_eq!(blend_color(base, SELECTED, 0.0), base);
        assert_eq!(blend_color(base, SELECTED, 1.0), SELECTED);
    }

    #[test]
    fn circle_overlapping_edge_is_visible() {
        let rect = Rect::from_min_max(pos2(0.0, 0.0), pos2(100.0, 100.0));
        assert!(circle_visible(rect, pos2(-4.0, 50.0), 5.0));
        assert!(!circle_visible(rect, pos2(-6.0, 50.0), 5.0));
    }
}
