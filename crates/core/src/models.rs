//! Achievement models and the RetroAchievements response shapes they are built from

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Suffix of the earned badge art
pub const BADGE_EARNED_SUFFIX: &str = ".png";
/// Suffix of the locked (greyed out) badge art
pub const BADGE_LOCKED_SUFFIX: &str = "_lock.png";

/// File name of a badge variant, also used as the image cache key
pub fn badge_file_name(name: &str, earned: bool) -> String {
    if earned {
        format!("{}{}", name, BADGE_EARNED_SUFFIX)
    } else {
        format!("{}{}", name, BADGE_LOCKED_SUFFIX)
    }
}

// ============================================================================
// Upstream response shapes
// ============================================================================

/// Entry of API_GetUserRecentlyPlayedGames
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RecentlyPlayedGame {
    #[serde(rename = "GameID", deserialize_with = "lenient_u32")]
    pub game_id: u32,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub console_name: String,
    #[serde(default, deserialize_with = "optional_timestamp")]
    pub last_played: Option<DateTime<Utc>>,
}

/// Response of API_GetGameInfoAndUserProgress
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GameProgress {
    #[serde(rename = "ID", deserialize_with = "lenient_u32")]
    pub id: u32,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub console_name: String,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub num_achievements: u32,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub num_awarded_to_user_hardcore: u32,
    /// Keyed by achievement id upstream; an empty set arrives as `[]`
    #[serde(default, deserialize_with = "achievement_collection")]
    pub achievements: Vec<GameProgressAchievement>,
}

/// Achievement entry inside [`GameProgress`]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GameProgressAchievement {
    #[serde(rename = "ID", deserialize_with = "lenient_u32")]
    pub id: u32,
    #[serde(default)]
    pub badge_name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub points: u32,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub display_order: u32,
    #[serde(default, deserialize_with = "optional_timestamp")]
    pub date_earned_hardcore: Option<DateTime<Utc>>,
}

/// Response of API_GetAchievementOfTheWeek
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AchievementOfTheWeek {
    pub achievement: WeeklyAchievement,
    #[serde(default)]
    pub game: WeeklyGame,
    #[serde(default)]
    pub unlocks: Vec<WeeklyUnlock>,
    #[serde(default, deserialize_with = "optional_timestamp")]
    pub start_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct WeeklyAchievement {
    #[serde(rename = "ID", deserialize_with = "lenient_u32")]
    pub id: u32,
    #[serde(default)]
    pub badge_name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub points: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct WeeklyGame {
    #[serde(rename = "ID", default, deserialize_with = "lenient_u32")]
    pub id: u32,
    #[serde(default)]
    pub title: String,
}

/// One user's unlock of the weekly achievement
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct WeeklyUnlock {
    #[serde(default)]
    pub user: String,
    #[serde(rename = "HardcoreMode", default, deserialize_with = "flag")]
    pub hardcore: bool,
    #[serde(default, deserialize_with = "optional_timestamp")]
    pub date_awarded: Option<DateTime<Utc>>,
}

// ============================================================================
// Local model
// ============================================================================

/// Achievement as displayed, normalized from either upstream shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Achievement {
    pub id: u32,
    pub badge_name: String,
    pub date_earned_hardcore: Option<DateTime<Utc>>,
    pub title: String,
    pub description: String,
    pub points: u32,
    /// Only known for per-game progress entries
    pub display_order: Option<u32>,
}

impl Achievement {
    pub fn is_earned(&self) -> bool {
        self.date_earned_hardcore.is_some()
    }

    pub fn badge_file_name(&self) -> String {
        badge_file_name(&self.badge_name, self.is_earned())
    }
}

impl From<GameProgressAchievement> for Achievement {
    fn from(a: GameProgressAchievement) -> Self {
        Self {
            id: a.id,
            badge_name: a.badge_name,
            date_earned_hardcore: a.date_earned_hardcore,
            title: a.title,
            description: a.description,
            points: a.points,
            display_order: Some(a.display_order),
        }
    }
}

impl From<WeeklyAchievement> for Achievement {
    fn from(a: WeeklyAchievement) -> Self {
        Self {
            id: a.id,
            badge_name: a.badge_name,
            date_earned_hardcore: None,
            title: a.title,
            description: a.description,
            points: a.points,
            display_order: None,
        }
    }
}

/// Index of the first achievement without a hardcore unlock, 0 if there is none
pub fn first_unearned_index(achievements: &[Achievement]) -> usize {
    achievements
        .iter()
        .position(|a| !a.is_earned())
        .unwrap_or(0)
}

/// Current game's achievement set, replaced wholesale on every refresh
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    pub game_id: u32,
    pub game_title: String,
    pub console_name: String,
    /// Count reported upstream
    pub total_achievements: usize,
    /// Sorted ascending by id
    pub achievements: Vec<Achievement>,
}

impl ProgressSnapshot {
    pub fn from_progress(progress: GameProgress) -> Self {
        let mut achievements: Vec<Achievement> = progress
            .achievements
            .into_iter()
            .map(Achievement::from)
            .collect();
        achievements.sort_by_key(|a| a.id);

        Self {
            game_id: progress.id,
            game_title: progress.title,
            console_name: progress.console_name,
            total_achievements: progress.num_achievements as usize,
            achievements,
        }
    }

    pub fn len(&self) -> usize {
        self.achievements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.achievements.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Achievement> {
        self.achievements.get(index)
    }

    pub fn earned_count(&self) -> usize {
        self.achievements.iter().filter(|a| a.is_earned()).count()
    }

    pub fn first_unearned_index(&self) -> usize {
        first_unearned_index(&self.achievements)
    }

    pub fn progress_display(&self) -> String {
        let total = self.total_achievements.max(self.achievements.len());
        format!("{} / {}", self.earned_count(), total)
    }
}

/// Weekly featured achievement and whether the configured user has it in hardcore
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklySpotlight {
    pub achievement: Achievement,
    pub game_id: u32,
    pub game_title: String,
    pub unlocks: Vec<WeeklyUnlockEntry>,
    pub earned_by_user: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyUnlockEntry {
    pub user: String,
    pub hardcore: bool,
    pub date_awarded: Option<DateTime<Utc>>,
}

impl From<WeeklyUnlock> for WeeklyUnlockEntry {
    fn from(u: WeeklyUnlock) -> Self {
        Self {
            user: u.user,
            hardcore: u.hardcore,
            date_awarded: u.date_awarded,
        }
    }
}

impl WeeklySpotlight {
    pub fn from_response(response: AchievementOfTheWeek, username: &str) -> Self {
        let unlocks: Vec<WeeklyUnlockEntry> = response
            .unlocks
            .into_iter()
            .map(WeeklyUnlockEntry::from)
            .collect();
        let earned_by_user = earned_in_hardcore(&unlocks, username);

        Self {
            achievement: Achievement::from(response.achievement),
            game_id: response.game.id,
            game_title: response.game.title,
            unlocks,
            earned_by_user,
        }
    }

    pub fn label(&self) -> String {
        if self.game_title.is_empty() {
            "[Achievement of the Week]".to_string()
        } else {
            format!("[Achievement of the Week: {}]", self.game_title)
        }
    }

    pub fn badge_file_name(&self) -> String {
        badge_file_name(&self.achievement.badge_name, self.earned_by_user)
    }
}

/// RetroAchievements usernames are case-insensitive
pub fn earned_in_hardcore(unlocks: &[WeeklyUnlockEntry], username: &str) -> bool {
    unlocks
        .iter()
        .any(|u| u.hardcore && u.user.eq_ignore_ascii_case(username.trim()))
}

// ============================================================================
// Lenient field decoding
// ============================================================================

/// Parses the `YYYY-MM-DD HH:MM:SS` (UTC) timestamps the API emits, or RFC 3339
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .ok()
        .map(|naive| naive.and_utc())
}

fn optional_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => parse_timestamp(s)
            .map(Some)
            .ok_or_else(|| de::Error::custom(format!("invalid timestamp: {}", s))),
    }
}

fn lenient_u32<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Number(n) => n
            .as_u64()
            .and_then(|v| u32::try_from(v).ok())
            .ok_or_else(|| de::Error::custom(format!("expected unsigned integer, got {}", n))),
        Value::String(s) if s.trim().is_empty() => Ok(0),
        Value::String(s) => s
            .trim()
            .parse()
            .map_err(|_| de::Error::custom(format!("expected unsigned integer, got {:?}", s))),
        Value::Null => Ok(0),
        other => Err(de::Error::custom(format!("expected unsigned integer, got {}", other))),
    }
}

fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Bool(b) => b,
        Value::Number(n) => n.as_i64().unwrap_or(0) != 0,
        Value::String(s) => matches!(s.trim(), "1" | "true"),
        _ => false,
    })
}

fn achievement_collection<'de, D>(deserializer: D) -> Result<Vec<GameProgressAchievement>, D::Error>
where
    D: Deserializer<'de>,
{
    let values: Vec<Value> = match Value::deserialize(deserializer)? {
        Value::Object(map) => map.into_iter().map(|(_, v)| v).collect(),
        Value::Array(items) => items,
        Value::Null => Vec::new(),
        other => {
            return Err(de::Error::custom(format!(
                "expected achievement map, got {}",
                other
            )))
        }
    };
    values
        .into_iter()
        .map(|v| serde_json::from_value(v).map_err(de::Error::custom))
        .collect()
}
