use eframe::egui;
use gravblocks_core::{Color, PixelRect, Surface};

/// egui painter region exposed as a simulation surface
pub struct PainterSurface<'a> {
    painter: &'a egui::Painter,
    rect: egui::Rect,
}

impl<'a> PainterSurface<'a> {
    pub fn new(painter: &'a egui::Painter, rect: egui::Rect) -> Self {
        Self { painter, rect }
    }
}

pub fn to_color32(color: Color) -> egui::Color32 {
    egui::Color32::from_rgb(color.r, color.g, color.b)
}

impl Surface for PainterSurface<'_> {
    fn width(&self) -> f32 {
        self.rect.width()
    }

    fn height(&self) -> f32 {
        self.rect.height()
    }

    fn fill_rect(&mut self, rect: PixelRect, color: Color) {
        let min = self.rect.min + egui::vec2(rect.x as f32, rect.y as f32);
        let size = egui::vec2(rect.width as f32, rect.height as f32);
        self.painter.rect_filled(
            egui::Rect::from_min_size(min, size),
            0.0,
            to_color32(color),
        );
    }

    fn fill(&mut self, color: Color) {
        self.painter.rect_filled(self.rect, 0.0, to_color32(color));
    }
}
