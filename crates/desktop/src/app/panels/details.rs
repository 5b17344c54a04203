//! Detail panel below the grid - badge, trophy, label, wrapped title and description

use badgewatch_core::{
    detail_origin, line_offsets, text_offset, wrap_text, wrap_width, Mode, DETAIL_FONT_SIZE,
    LINE_SPACING, TROPHY_SCALE,
};
use eframe::egui::{self, pos2, vec2, Align2, Color32, FontId, Pos2, Rect};
use egui_phosphor::regular;

use super::grid::full_uv;
use crate::app::BadgewatchApp;
use crate::ui::{DONE_GREEN, ERROR_COLOR, LABEL_COLOR, PLACEHOLDER, TROPHY_EARNED, TROPHY_LOCKED};

const TITLE_SIZE: f32 = 20.0;
const BODY_SIZE: f32 = 18.0;
const LABEL_SIZE: f32 = 14.0;
const MODE_SIZE: f32 = 12.0;
const TROPHY_BASE_SIZE: f32 = 16.0;

/// Draws pre-wrapped lines top-down, returns the y just below the last one
fn draw_lines(painter: &egui::Painter, pos: Pos2, lines: &[String], font: FontId, color: Color32) -> f32 {
    let mut bottom = pos.y;
    for (line, y) in lines.iter().zip(line_offsets(pos.y, lines.len())) {
        painter.text(pos2(pos.x, y), Align2::LEFT_TOP, line, font.clone(), color);
        bottom = y + LINE_SPACING;
    }
    bottom
}

impl BadgewatchApp {
    pub(crate) fn render_details(&mut self, ui: &mut egui::Ui) {
        let area = ui.max_rect();
        let painter = ui.painter().clone();
        let ctx = ui.ctx().clone();
        let per_row = self.config.display.achievements_per_row;
        let cell = self.config.display.cell_size();
        let origin = {
            let p = detail_origin(self.achievement_count(), per_row, cell);
            area.min + vec2(p.x, p.y)
        };

        self.render_footer(&painter, area);

        if self.progress.is_none() {
            painter.text(
                area.center(),
                Align2::CENTER_CENTER,
                "Loading...",
                FontId::proportional(TITLE_SIZE),
                Color32::WHITE,
            );
            return;
        }

        let Some(view) = self.detail_view() else {
            if self.selection.mode() == Mode::Weekly {
                painter.text(
                    origin,
                    Align2::LEFT_TOP,
                    "[Achievement of the Week]\nNot available yet",
                    FontId::proportional(LABEL_SIZE),
                    LABEL_COLOR,
                );
            }
            return;
        };
        let badge_name = view.achievement.badge_name.clone();
        let earned = view.earned;
        let label = view.label;
        let width = wrap_width(per_row, cell);
        let title_lines = wrap_text(&view.achievement.title, width);
        let description_lines = wrap_text(&view.achievement.description, width);

        // Category label in the gap between the grid and the panel
        painter.text(
            origin - vec2(0.0, 40.0),
            Align2::LEFT_TOP,
            label,
            FontId::proportional(LABEL_SIZE),
            LABEL_COLOR,
        );

        let badge_rect = Rect::from_min_size(origin, vec2(cell, cell));
        match self.badges.get(&ctx, &badge_name, earned) {
            Some(texture) => {
                painter.image(texture.id(), badge_rect, full_uv(), Color32::WHITE);
            }
            None => {
                painter.rect_filled(badge_rect, 4.0, PLACEHOLDER);
            }
        }

        let trophy_pos = origin + vec2(0.0, cell + 20.0);
        painter.text(
            trophy_pos,
            Align2::LEFT_TOP,
            regular::TROPHY,
            FontId::proportional(TROPHY_BASE_SIZE * TROPHY_SCALE),
            if earned { TROPHY_EARNED } else { TROPHY_LOCKED },
        );
        if earned {
            painter.text(
                pos2(origin.x + cell / 2.0, trophy_pos.y + TROPHY_BASE_SIZE * TROPHY_SCALE + 8.0),
                Align2::CENTER_TOP,
                "Done!",
                FontId::proportional(BODY_SIZE),
                DONE_GREEN,
            );
        }

        let text_pos = pos2(origin.x + text_offset(cell), origin.y - 5.0);
        let below_title = draw_lines(
            &painter,
            text_pos,
            &title_lines,
            FontId::monospace(DETAIL_FONT_SIZE),
            Color32::WHITE,
        );
        draw_lines(
            &painter,
            pos2(text_pos.x, below_title + 8.0),
            &description_lines,
            FontId::monospace(DETAIL_FONT_SIZE),
            Color32::from_gray(210),
        );
    }

    /// Progress count, last error and the mode indicator along the bottom edge
    fn render_footer(&self, painter: &egui::Painter, area: Rect) {
        let bottom_left = pos2(area.min.x + 6.0, area.max.y - 4.0);

        if let Some(progress) = &self.progress {
            painter.text(
                bottom_left,
                Align2::LEFT_BOTTOM,
                progress.progress_display(),
                FontId::proportional(MODE_SIZE),
                LABEL_COLOR,
            );
        }

        if let Some(error) = &self.last_error {
            painter.text(
                bottom_left - vec2(0.0, MODE_SIZE + 6.0),
                Align2::LEFT_BOTTOM,
                error,
                FontId::proportional(MODE_SIZE),
                ERROR_COLOR,
            );
        }

        if !self.config.display.hide_mode {
            painter.text(
                pos2(area.max.x - 6.0, area.max.y - 4.0),
                Align2::RIGHT_BOTTOM,
                self.selection.mode().label(),
                FontId::proportional(MODE_SIZE),
                LABEL_COLOR,
            );
        }
    }
}
