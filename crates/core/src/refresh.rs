//! Periodic refresh of the user's current game progress

use std::time::{Duration, Instant};

use crate::error::{BadgewatchError, Result};
use crate::models::{
    AchievementOfTheWeek, GameProgress, ProgressSnapshot, RecentlyPlayedGame, WeeklySpotlight,
};

/// The three read-only calls a refresh needs from the upstream API
pub trait AchievementSource {
    fn recently_played_games(&self, username: &str) -> Result<Vec<RecentlyPlayedGame>>;

    fn game_progress(&self, username: &str, game_id: u32) -> Result<GameProgress>;

    fn achievement_of_the_week(&self) -> Result<AchievementOfTheWeek>;
}

/// Result of one complete refresh, published as a unit
#[derive(Debug, Clone)]
pub struct RefreshOutcome {
    pub progress: ProgressSnapshot,
    /// `None` when the spotlight was not requested or could not be fetched
    pub spotlight: Option<WeeklySpotlight>,
    pub spotlight_error: Option<BadgewatchError>,
}

/// Once the user holds the weekly achievement in hardcore it is never fetched again
pub fn should_fetch_spotlight(weekly_enabled: bool, current: Option<&WeeklySpotlight>) -> bool {
    weekly_enabled && !current.is_some_and(|s| s.earned_by_user)
}

/// Runs the fetch sequence: recent games, progress of the most recent one,
/// then optionally the weekly spotlight. Only a spotlight failure is
/// tolerated; it is reported in the outcome.
pub fn refresh<S: AchievementSource + ?Sized>(
    source: &S,
    username: &str,
    fetch_spotlight: bool,
) -> Result<RefreshOutcome> {
    let recent = source.recently_played_games(username)?;
    let latest = recent
        .first()
        .ok_or_else(|| BadgewatchError::NoRecentGames(username.to_string()))?;

    let progress = source.game_progress(username, latest.game_id)?;
    let progress = ProgressSnapshot::from_progress(progress);

    let (spotlight, spotlight_error) = if fetch_spotlight {
        match source.achievement_of_the_week() {
            Ok(response) => (Some(WeeklySpotlight::from_response(response, username)), None),
            Err(e) => (None, Some(e)),
        }
    } else {
        (None, None)
    };

    Ok(RefreshOutcome {
        progress,
        spotlight,
        spotlight_error,
    })
}

/// Decides when the next refresh is due
#[derive(Debug, Clone)]
pub struct RefreshSchedule {
    interval: Duration,
    last_refresh: Option<Instant>,
    retry_after: Option<Instant>,
    in_flight: bool,
}

impl RefreshSchedule {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_refresh: None,
            retry_after: None,
            in_flight: false,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn last_refresh(&self) -> Option<Instant> {
        self.last_refresh
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    pub fn is_due(&self, now: Instant) -> bool {
        if self.in_flight {
            return false;
        }
        if let Some(retry_after) = self.retry_after {
            if now < retry_after {
                return false;
            }
        }
        match self.last_refresh {
            None => true,
            Some(last) => now >= last + self.interval,
        }
    }

    pub fn mark_started(&mut self) {
        self.in_flight = true;
    }

    pub fn mark_succeeded(&mut self, now: Instant) {
        self.in_flight = false;
        self.last_refresh = Some(now);
        self.retry_after = None;
    }

    /// Leaves `last_refresh` untouched; the next attempt waits one interval
    pub fn mark_failed(&mut self, now: Instant) {
        self.in_flight = false;
        self.retry_after = Some(now + self.interval);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GameProgressAchievement, WeeklyAchievement, WeeklyGame, WeeklyUnlock};
    use std::cell::{Cell, RefCell};

    struct FakeSource {
        recent: Vec<RecentlyPlayedGame>,
        progress_ids: Vec<u32>,
        weekly_unlockers: RefCell<Vec<(String, bool)>>,
        weekly_fails: bool,
        recent_calls: Cell<usize>,
        weekly_calls: Cell<usize>,
        requested_game: Cell<Option<u32>>,
    }

    impl FakeSource {
        fn new(progress_ids: Vec<u32>) -> Self {
            Self {
                recent: vec![
                    RecentlyPlayedGame {
                        game_id: 1448,
                        title: "Mega Man 2".to_string(),
                        console_name: "NES/Famicom".to_string(),
                        last_played: None,
                    },
                    RecentlyPlayedGame {
                        game_id: 1,
                        title: "Sonic the Hedgehog".to_string(),
                        console_name: "Genesis/Mega Drive".to_string(),
                        last_played: None,
                    },
                ],
                progress_ids,
                weekly_unlockers: RefCell::new(Vec::new()),
                weekly_fails: false,
                recent_calls: Cell::new(0),
                weekly_calls: Cell::new(0),
                requested_game: Cell::new(None),
            }
        }
    }

    impl AchievementSource for FakeSource {
        fn recently_played_games(&self, _username: &str) -> Result<Vec<RecentlyPlayedGame>> {
            self.recent_calls.set(self.recent_calls.get() + 1);
            Ok(self.recent.clone())
        }

        fn game_progress(&self, _username: &str, game_id: u32) -> Result<GameProgress> {
            self.requested_game.set(Some(game_id));
            Ok(GameProgress {
                id: game_id,
                title: "Mega Man 2".to_string(),
                console_name: "NES/Famicom".to_string(),
                num_achievements: self.progress_ids.len() as u32,
                num_awarded_to_user_hardcore: 0,
                achievements: self
                    .progress_ids
                    .iter()
                    .map(|&id| GameProgressAchievement {
                        id,
                        badge_name: format!("{:05}", id),
                        title: format!("Achievement {}", id),
                        description: String::new(),
                        points: 5,
                        display_order: id,
                        date_earned_hardcore: None,
                    })
                    .collect(),
            })
        }

        fn achievement_of_the_week(&self) -> Result<AchievementOfTheWeek> {
            self.weekly_calls.set(self.weekly_calls.get() + 1);
            if self.weekly_fails {
                return Err(BadgewatchError::Network("connection reset".to_string()));
            }
            Ok(AchievementOfTheWeek {
                achievement: WeeklyAchievement {
                    id: 165,
                    badge_name: "04000".to_string(),
                    title: "Lucky".to_string(),
                    description: "Roll a seven".to_string(),
                    points: 10,
                },
                game: WeeklyGame {
                    id: 1,
                    title: "Sonic the Hedgehog".to_string(),
                },
                unlocks: self
                    .weekly_unlockers
                    .borrow()
                    .iter()
                    .map(|(user, hardcore)| WeeklyUnlock {
                        user: user.clone(),
                        hardcore: *hardcore,
                        date_awarded: None,
                    })
                    .collect(),
                start_at: None,
            })
        }
    }

    #[test]
    fn test_refresh_uses_most_recent_game_and_sorts() {
        let source = FakeSource::new(vec![40, 3, 17, 9]);
        let outcome = refresh(&source, "player", false).unwrap();

        assert_eq!(source.requested_game.get(), Some(1448));
        let ids: Vec<u32> = outcome.progress.achievements.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![3, 9, 17, 40]);
        assert!(outcome.spotlight.is_none());
        assert_eq!(source.weekly_calls.get(), 0);
    }

    #[test]
    fn test_refresh_fails_without_recent_games() {
        let mut source = FakeSource::new(vec![1]);
        source.recent.clear();
        let err = refresh(&source, "player", true).unwrap_err();
        assert_eq!(err, BadgewatchError::NoRecentGames("player".to_string()));
        assert_eq!(source.requested_game.get(), None);
    }

    #[test]
    fn test_spotlight_failure_keeps_progress() {
        let mut source = FakeSource::new(vec![1, 2]);
        source.weekly_fails = true;
        let outcome = refresh(&source, "player", true).unwrap();
        assert_eq!(outcome.progress.len(), 2);
        assert!(outcome.spotlight.is_none());
        assert!(matches!(outcome.spotlight_error, Some(BadgewatchError::Network(_))));
    }

    #[test]
    fn test_spotlight_not_refetched_once_earned() {
        let source = FakeSource::new(vec![1]);
        let mut current: Option<WeeklySpotlight> = None;

        for round in 0..6 {
            if round == 2 {
                source
                    .weekly_unlockers
                    .borrow_mut()
                    .push(("Player".to_string(), true));
            }
            let fetch = should_fetch_spotlight(true, current.as_ref());
            let outcome = refresh(&source, "player", fetch).unwrap();
            if let Some(spotlight) = outcome.spotlight {
                current = Some(spotlight);
            }
        }

        // rounds 0, 1 and 2 fetch; from round 3 on the user holds it
        assert_eq!(source.weekly_calls.get(), 3);
        assert_eq!(source.recent_calls.get(), 6);
        assert!(current.unwrap().earned_by_user);
    }

    #[test]
    fn test_softcore_unlock_keeps_spotlight_polling() {
        let source = FakeSource::new(vec![1]);
        source
            .weekly_unlockers
            .borrow_mut()
            .push(("player".to_string(), false));
        let outcome = refresh(&source, "player", true).unwrap();
        let spotlight = outcome.spotlight.unwrap();
        assert!(!spotlight.earned_by_user);
        assert!(should_fetch_spotlight(true, Some(&spotlight)));
        assert!(!should_fetch_spotlight(false, None));
    }

    #[test]
    fn test_schedule_due_on_interval() {
        let start = Instant::now();
        let mut schedule = RefreshSchedule::new(Duration::from_secs(5));
        assert!(schedule.is_due(start));

        schedule.mark_started();
        assert!(!schedule.is_due(start + Duration::from_secs(60)));

        schedule.mark_succeeded(start);
        assert_eq!(schedule.last_refresh(), Some(start));
        assert!(!schedule.is_due(start + Duration::from_secs(4)));
        assert!(schedule.is_due(start + Duration::from_secs(5)));
    }

    #[test]
    fn test_schedule_failure_keeps_last_refresh() {
        let start = Instant::now();
        let mut schedule = RefreshSchedule::new(Duration::from_secs(5));
        schedule.mark_started();
        schedule.mark_succeeded(start);

        let failed_at = start + Duration::from_secs(6);
        schedule.mark_started();
        schedule.mark_failed(failed_at);
        assert_eq!(schedule.last_refresh(), Some(start));
        assert!(!schedule.is_in_flight());
        assert!(!schedule.is_due(failed_at + Duration::from_secs(1)));
        assert!(schedule.is_due(failed_at + Duration::from_secs(5)));
    }
}
