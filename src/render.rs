//! The hand-off between the simulation and whatever draws it.

use eframe::egui::{self, Color32, FontId, Pos2, Rect, Stroke};
use eframe::epaint::Vec2;

use crate::field::Bounds;
use crate::particle::Particle;
use crate::sampling::Statistics;

// Fills are rgb * 0.4 premultiplied, alpha 0.4.

/// Particle fill for sampled particles, `rgba(255, 81, 54, 0.4)`.
pub const SAMPLED_COLOR: Color32 = Color32::from_rgba_premultiplied(102, 32, 22, 102);
/// Particle fill for everything else, `rgba(54, 54, 54, 0.4)`.
pub const UNSAMPLED_COLOR: Color32 = Color32::from_rgba_premultiplied(22, 22, 22, 102);
/// Boundary line and handle.
pub const BOUNDARY_COLOR: Color32 = Color32::from_rgb(255, 81, 54);

/// Everything needed to draw one tick.
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    pub particles: &'a [Particle],
    pub bounds: Bounds,
    pub boundary_x: f32,
    pub statistics: Statistics,
}

impl Frame<'_> {
    pub fn color_of(particle: &Particle) -> Color32 {
        if particle.sampled { SAMPLED_COLOR } else { UNSAMPLED_COLOR }
    }
}

/// Receives one frame per tick. Implementations only draw; they never
/// reach back into the simulation.
pub trait RenderSink {
    fn render(&mut self, frame: &Frame<'_>);
}

/// Paints a frame into an egui canvas whose top-left corner is `rect.min`.
pub struct PainterSink<'p> {
    painter: &'p egui::Painter,
    rect: Rect,
    text_color: Color32,
}

impl<'p> PainterSink<'p> {
    pub fn new(painter: &'p egui::Painter, rect: Rect, text_color: Color32) -> Self {
        Self {
            painter,
            rect,
            text_color,
        }
    }

    fn to_screen(&self, p: Vec2) -> Pos2 {
        self.rect.min + p
    }
}

impl RenderSink for PainterSink<'_> {
    fn render(&mut self, frame: &Frame<'_>) {
        // Shade the sampled region.
        let sampled_rect = Rect::from_min_max(
            self.rect.min,
            egui::pos2(self.rect.min.x + frame.boundary_x.max(0.0), self.rect.max.y),
        );
        self.painter
            .rect_filled(sampled_rect, 0.0, Color32::from_rgba_unmultiplied(255, 81, 54, 12));

        for p in frame.particles {
            self.painter
                .circle_filled(self.to_screen(p.position), p.radius, Frame::color_of(p));
        }

        let top = self.to_screen(Vec2::new(frame.boundary_x, 0.0));
        let bottom = self.to_screen(Vec2::new(frame.boundary_x, frame.bounds.height));
        self.painter
            .line_segment([top, bottom], Stroke::new(2.0, BOUNDARY_COLOR));

        let centre = self.to_screen(frame.bounds.center());
        self.painter.text(
            centre,
            egui::Align2::CENTER_BOTTOM,
            frame.statistics.sampled_label(),
            FontId::proportional(30.0),
            self.text_color,
        );
        self.painter.text(
            centre + Vec2::new(0.0, 24.0),
            egui::Align2::CENTER_BOTTOM,
            frame.statistics.true_label(),
            FontId::proportional(20.0),
            self.text_color,
        );
    }
}
