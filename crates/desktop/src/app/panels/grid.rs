//! Badge grid - one square cell per achievement, selected cell outlined

use badgewatch_core::{cell_origin, Mode};
use eframe::egui::{self, pos2, vec2, Rect, Stroke, StrokeKind};

use crate::app::BadgewatchApp;
use crate::ui::{PLACEHOLDER, SELECTION_BORDER};

const BORDER_WIDTH: f32 = 3.0;

/// Full-texture UV rectangle
pub(super) fn full_uv() -> Rect {
    Rect::from_min_max(pos2(0.0, 0.0), pos2(1.0, 1.0))
}

impl BadgewatchApp {
    pub(crate) fn render_grid(&mut self, ui: &mut egui::Ui) {
        let Some(progress) = &self.progress else {
            return;
        };

        let origin = ui.max_rect().min;
        let per_row = self.config.display.achievements_per_row;
        let size = self.config.display.cell_size();
        let selected = match self.selection.mode() {
            Mode::Weekly => None,
            Mode::Auto | Mode::Manual => Some(self.selection.index()),
        };
        let painter = ui.painter().clone();
        let ctx = ui.ctx().clone();

        for (i, achievement) in progress.achievements.iter().enumerate() {
            let cell = cell_origin(i, per_row, size);
            let rect = Rect::from_min_size(
                origin + vec2(cell.x, cell.y),
                vec2(size, size),
            );

            match self.badges.get(&ctx, &achievement.badge_name, achievement.is_earned()) {
                Some(texture) => {
                    painter.image(texture.id(), rect, full_uv(), egui::Color32::WHITE);
                }
                None => {
                    painter.rect_filled(rect.shrink(2.0), 4.0, PLACEHOLDER);
                }
            }

            if selected == Some(i) {
                painter.rect_stroke(
                    rect,
                    0.0,
                    Stroke::new(BORDER_WIDTH, SELECTION_BORDER),
                    StrokeKind::Inside,
                );
            }
        }
    }
}
