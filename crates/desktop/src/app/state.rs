//! App state management - refresh handling, input and viewport sync

use crate::ui::{read_nav_inputs, RefreshMessage, WINDOW_TITLE};
use badgewatch_core::{
    refresh, should_fetch_spotlight, window_size, Achievement, Mode, NavInput, RefreshOutcome,
};

use eframe::egui;
use std::sync::mpsc::{channel, TryRecvError};
use std::thread;
use std::time::Instant;

use super::BadgewatchApp;

pub(crate) const SELECTED_LABEL: &str = "[Selected Achievement]";

/// What the detail panel shows this frame
pub(crate) struct DetailView<'a> {
    pub achievement: &'a Achievement,
    pub earned: bool,
    pub label: String,
}

impl BadgewatchApp {
    pub(crate) fn start_refresh(&mut self, ctx: &egui::Context) {
        if self.schedule.is_in_flight() {
            return;
        }
        self.schedule.mark_started();

        let client = self.client.clone();
        let username = self.config.connect.username.clone();
        let fetch_spotlight =
            should_fetch_spotlight(self.config.display.show_weekly, self.spotlight.as_ref());
        let (tx, rx) = channel();
        self.receiver = Some(rx);

        tracing::debug!("Refreshing achievements for {} (spotlight: {})", username, fetch_spotlight);

        let ctx = ctx.clone();
        thread::spawn(move || {
            let message = match refresh(&client, &username, fetch_spotlight) {
                Ok(outcome) => RefreshMessage::Done(Box::new(outcome)),
                Err(e) => RefreshMessage::Error(e),
            };
            let _ = tx.send(message);
            ctx.request_repaint();
        });
    }

    pub(crate) fn check_refresh(&mut self) {
        let received = match &self.receiver {
            Some(rx) => rx.try_recv(),
            None => return,
        };

        match received {
            Ok(RefreshMessage::Done(outcome)) => {
                self.receiver = None;
                self.apply_outcome(*outcome);
                self.schedule.mark_succeeded(Instant::now());
            }
            Ok(RefreshMessage::Error(e)) => {
                self.receiver = None;
                tracing::error!("Error refreshing achievements: {}", e);
                self.last_error = Some(e.to_string());
                self.schedule.mark_failed(Instant::now());
            }
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Disconnected) => {
                self.receiver = None;
                tracing::error!("Refresh worker exited without a result");
                self.last_error = Some("Refresh worker exited without a result".to_string());
                self.schedule.mark_failed(Instant::now());
            }
        }
    }

    /// Publishes a finished refresh in one step
    pub(crate) fn apply_outcome(&mut self, outcome: RefreshOutcome) {
        let RefreshOutcome {
            progress,
            spotlight,
            spotlight_error,
        } = outcome;

        tracing::info!(
            "Refreshed {} ({}): {}",
            progress.game_title,
            progress.console_name,
            progress.progress_display()
        );

        if let Some(e) = spotlight_error {
            tracing::warn!("Error refreshing achievement of the week: {}", e);
        }
        if let Some(spotlight) = spotlight {
            if spotlight.earned_by_user {
                tracing::info!(
                    "{} has earned the achievement of the week \"{}\"",
                    self.config.connect.username,
                    spotlight.achievement.title
                );
            }
            self.spotlight = Some(spotlight);
        }

        self.progress = Some(progress);
        self.last_error = None;
        self.selection.clamp(self.achievement_count());
    }

    pub(crate) fn achievement_count(&self) -> usize {
        self.progress.as_ref().map_or(0, |p| p.len())
    }

    pub(crate) fn handle_input(&mut self, ctx: &egui::Context) {
        for input in read_nav_inputs(ctx) {
            self.apply_input(input);
        }
    }

    pub(crate) fn apply_input(&mut self, input: NavInput) {
        let count = self.achievement_count();
        self.selection
            .handle(input, count, &mut self.config.display.achievements_per_row);
    }

    pub(crate) fn tick_selection(&mut self) {
        match &self.progress {
            Some(progress) => self.selection.tick(&progress.achievements),
            None => self.selection.tick(&[]),
        }
    }

    pub(crate) fn desired_window_size(&self) -> (f32, f32) {
        window_size(
            self.achievement_count(),
            self.config.display.achievements_per_row,
            self.config.display.cell_size(),
        )
    }

    pub(crate) fn desired_title(&self) -> String {
        match &self.progress {
            Some(progress) if !progress.game_title.is_empty() => {
                format!("{} - {}", WINDOW_TITLE, progress.game_title)
            }
            _ => WINDOW_TITLE.to_string(),
        }
    }

    /// Resizes and retitles the window only when something changed
    pub(crate) fn sync_viewport(&mut self, ctx: &egui::Context) {
        let size = self.desired_window_size();
        if self.window_size != Some(size) {
            ctx.send_viewport_cmd(egui::ViewportCommand::InnerSize(egui::vec2(size.0, size.1)));
            self.window_size = Some(size);
        }

        let title = self.desired_title();
        if self.window_title.as_deref() != Some(title.as_str()) {
            ctx.send_viewport_cmd(egui::ViewportCommand::Title(title.clone()));
            self.window_title = Some(title);
        }
    }

    pub(crate) fn detail_view(&self) -> Option<DetailView<'_>> {
        match self.selection.mode() {
            Mode::Weekly => self.spotlight.as_ref().map(|s| DetailView {
                achievement: &s.achievement,
                earned: s.earned_by_user,
                label: s.label(),
            }),
            Mode::Auto | Mode::Manual => {
                let achievement = self.progress.as_ref()?.get(self.selection.index())?;
                Some(DetailView {
                    achievement,
                    earned: achievement.is_earned(),
                    label: SELECTED_LABEL.to_string(),
                })
            }
        }
    }
}
