//! Main application module

mod panels;
mod state;

use crate::badge_cache::{BadgeCache, BadgeSource};
use crate::config::Config;
use crate::ra_api::RaClient;
use crate::ui::{RefreshReceiver, BACKGROUND, TICK_INTERVAL};
use badgewatch_core::{ProgressSnapshot, RefreshSchedule, SelectionState, WeeklySpotlight};

use eframe::egui;
use std::sync::Arc;

pub struct BadgewatchApp {
    pub(crate) config: Config,
    pub(crate) client: RaClient,
    // Replaced wholesale when a refresh completes
    pub(crate) progress: Option<ProgressSnapshot>,
    pub(crate) spotlight: Option<WeeklySpotlight>,
    pub(crate) selection: SelectionState,
    pub(crate) schedule: RefreshSchedule,
    pub(crate) receiver: Option<RefreshReceiver>,
    pub(crate) badges: BadgeCache,
    // Last refresh error, shown until the next successful refresh
    pub(crate) last_error: Option<String>,
    // Size and title last requested from the viewport
    pub(crate) window_size: Option<(f32, f32)>,
    pub(crate) window_title: Option<String>,
}

impl BadgewatchApp {
    pub fn new(config: Config, client: RaClient, badge_source: Arc<dyn BadgeSource>) -> Self {
        let selection = SelectionState::new(config.auto_mode_enabled(), config.display.show_weekly);
        let schedule = RefreshSchedule::new(config.refresh_interval());

        Self {
            config,
            client,
            progress: None,
            spotlight: None,
            selection,
            schedule,
            receiver: None,
            badges: BadgeCache::new(badge_source),
            last_error: None,
            window_size: None,
            window_title: None,
        }
    }
}

impl eframe::App for BadgewatchApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // State update runs to completion before anything is painted
        self.check_refresh();
        if self.schedule.is_due(std::time::Instant::now()) {
            self.start_refresh(ctx);
        }
        self.handle_input(ctx);
        self.tick_selection();
        self.badges.poll(ctx);
        self.sync_viewport(ctx);

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE.fill(BACKGROUND))
            .show(ctx, |ui| {
                self.render_grid(ui);
                self.render_details(ui);
            });

        ctx.request_repaint_after(TICK_INTERVAL);
    }
}
