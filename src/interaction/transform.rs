use eframe::egui::{Pos2, Vec2};

/// Wheel delta to zoom exponent. The exponent is bounded so the factor stays positive.
const ZOOM_SENSITIVITY: f32 = 0.0018;

/// Pan offset and uniform scale mapping world coordinates onto the canvas.
/// Screen positions here are relative to the canvas origin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
    pub translation: Vec2,
    pub scale: f32,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl ViewTransform {
    pub const IDENTITY: Self = Self {
        translation: Vec2::ZERO,
        scale: 1.0,
    };

    pub fn world_to_screen(&self, world: Vec2) -> Pos2 {
        (self.translation + world * self.scale).to_pos2()
    }

    pub fn screen_to_world(&self, screen: Pos2) -> Vec2 {
        (screen.to_vec2() - self.translation) / self.scale
    }

    pub fn pan_by(&mut self, delta: Vec2) {
        if delta.is_finite() {
            self.translation += delta;
        }
    }

    /// Scales by `factor` keeping the world point under `anchor` fixed.
    /// The resulting scale is clamped to `[min, max]`.
    pub fn zoom_at(&mut self, anchor: Pos2, factor: f32, min: f32, max: f32) {
        if !factor.is_finite() || factor <= 0.0 {
            return;
        }

        let world_before = self.screen_to_world(anchor);
        self.scale = (self.scale * factor).clamp(min, max);
        self.translation = anchor.to_vec2() - world_before * self.scale;
    }

    pub fn wheel_factor(delta: f32) -> f32 {
        (delta * ZOOM_SENSITIVITY).clamp(-20.0, 20.0).exp()
    }

    pub fn reset(&mut self) {
        *self = Self::IDENTITY;
    }
}
