use badgewatch_core::{BadgewatchError, NavInput, RefreshOutcome};
use eframe::egui::{self, Color32, Key};
use std::sync::mpsc::Receiver;
use std::time::Duration;

/// Frame pacing while idle, roughly 30 ticks per second
pub const TICK_INTERVAL: Duration = Duration::from_millis(33);

pub const WINDOW_TITLE: &str = "Retro Achievements";

pub const BACKGROUND: Color32 = Color32::from_rgb(16, 16, 24);
pub const PLACEHOLDER: Color32 = Color32::from_rgb(40, 40, 52);
pub const SELECTION_BORDER: Color32 = Color32::from_rgb(255, 200, 40);
pub const TROPHY_EARNED: Color32 = Color32::from_rgb(255, 196, 0);
pub const TROPHY_LOCKED: Color32 = Color32::from_rgb(90, 90, 100);
pub const DONE_GREEN: Color32 = Color32::from_rgb(0, 255, 0);
pub const LABEL_COLOR: Color32 = Color32::from_rgb(150, 150, 170);
pub const ERROR_COLOR: Color32 = Color32::from_rgb(230, 80, 80);

/// Message sent from the refresh worker
pub enum RefreshMessage {
    Done(Box<RefreshOutcome>),
    Error(BadgewatchError),
}

pub type RefreshReceiver = Receiver<RefreshMessage>;

const KEY_BINDINGS: &[(&[Key], NavInput)] = &[
    (&[Key::ArrowLeft], NavInput::Left),
    (&[Key::ArrowRight], NavInput::Right),
    (&[Key::ArrowUp], NavInput::Up),
    (&[Key::ArrowDown], NavInput::Down),
    (&[Key::Escape], NavInput::Escape),
    (&[Key::W], NavInput::ToggleWeekly),
    // `+` is shift+`=` on most layouts
    (&[Key::Plus, Key::Equals], NavInput::MoreColumns),
    (&[Key::Minus], NavInput::FewerColumns),
];

/// Inputs pressed since the last frame, in binding order
pub fn read_nav_inputs(ctx: &egui::Context) -> Vec<NavInput> {
    ctx.input(|i| {
        KEY_BINDINGS
            .iter()
            .filter(|(keys, _)| keys.iter().any(|key| i.key_pressed(*key)))
            .map(|(_, input)| *input)
            .collect()
    })
}
