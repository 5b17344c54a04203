//! RetroAchievements Web API calls

use badgewatch_core::{
    AchievementOfTheWeek, AchievementSource, BadgewatchError, GameProgress, RecentlyPlayedGame,
    Result,
};
use serde::de::DeserializeOwned;

const API_BASE: &str = "https://retroachievements.org/API/";
const API_RECENTLY_PLAYED: &str = "API_GetUserRecentlyPlayedGames.php";
const API_GAME_PROGRESS: &str = "API_GetGameInfoAndUserProgress.php";
const API_ACHIEVEMENT_OF_THE_WEEK: &str = "API_GetAchievementOfTheWeek.php";

const USER_AGENT: &str = concat!("badgewatch/", env!("CARGO_PKG_VERSION"));

/// Blocking client, cheap to clone into worker threads
#[derive(Clone)]
pub struct RaClient {
    http: reqwest::blocking::Client,
    api_key: String,
    base_url: String,
}

impl RaClient {
    pub fn new(api_key: &str) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| BadgewatchError::Network(e.to_string()))?;
        Ok(Self {
            http,
            api_key: api_key.to_string(),
            base_url: API_BASE.to_string(),
        })
    }

    fn url(&self, endpoint: &str, params: &[(&str, String)]) -> String {
        let mut url = format!(
            "{}{}?y={}",
            self.base_url,
            endpoint,
            urlencoding::encode(&self.api_key)
        );
        for (key, value) in params {
            url.push('&');
            url.push_str(key);
            url.push('=');
            url.push_str(&urlencoding::encode(value));
        }
        url
    }

    fn get_json<T: DeserializeOwned>(&self, endpoint: &str, params: &[(&str, String)]) -> Result<T> {
        let url = self.url(endpoint, params);
        let response = self
            .http
            .get(&url)
            .send()
            .map_err(|e| BadgewatchError::Network(format!("{}: {}", endpoint, e.without_url())))?;

        let status = response.status();
        let body = response
            .text()
            .map_err(|e| BadgewatchError::Network(format!("{}: {}", endpoint, e.without_url())))?;

        if !status.is_success() {
            return Err(BadgewatchError::Api(format!(
                "{} returned {}",
                endpoint, status
            )));
        }

        parse_body(endpoint, &body)
    }
}

/// Decodes an API body, turning `{"error": ...}` payloads into API errors
fn parse_body<T: DeserializeOwned>(endpoint: &str, body: &str) -> Result<T> {
    let value: serde_json::Value = serde_json::from_str(body)
        .map_err(|e| BadgewatchError::Decode(format!("{}: {}", endpoint, e)))?;

    if let Some(message) = value.get("error").and_then(|e| e.as_str()) {
        return Err(BadgewatchError::Api(format!("{}: {}", endpoint, message)));
    }

    serde_json::from_value(value).map_err(|e| BadgewatchError::Decode(format!("{}: {}", endpoint, e)))
}

impl AchievementSource for RaClient {
    fn recently_played_games(&self, username: &str) -> Result<Vec<RecentlyPlayedGame>> {
        self.get_json(
            API_RECENTLY_PLAYED,
            &[("u", username.to_string()), ("c", "1".to_string())],
        )
    }

    fn game_progress(&self, username: &str, game_id: u32) -> Result<GameProgress> {
        self.get_json(
            API_GAME_PROGRESS,
            &[("u", username.to_string()), ("g", game_id.to_string())],
        )
    }

    fn achievement_of_the_week(&self) -> Result<AchievementOfTheWeek> {
        self.get_json(API_ACHIEVEMENT_OF_THE_WEEK, &[])
    }
}
