use std::env;

const DEFAULT_API_URL: &str = "https://vote.makerdao.com";
const DEFAULT_TAGS_URL: &str =
    "https://raw.githubusercontent.com/makerdao/community/master/governance/polls/meta/tags.json";
const DEFAULT_FONT_PATH: &str = "fonts/Roboto-Regular.ttf";

#[derive(Debug, Clone)]
pub struct Config {
    pub discord_token: String,
    pub api_url: String,
    pub tags_url: String,
    pub font_path: String,
    pub tag_refresh_hours: u64,
    pub new_polls_window_hours: i64,
}

impl Config {
    // Reads the process environment; call after `dotenvy::dotenv()`
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let discord_token = env::var("DISCORD_TOKEN").map_err(|_| "Expected DISCORD_TOKEN in the environment")?;

        Ok(Self {
            discord_token,
            api_url: var_or("GOVERNANCE_API_URL", DEFAULT_API_URL)
                .trim_end_matches('/')
                .to_string(),
            tags_url: var_or("POLL_TAGS_URL", DEFAULT_TAGS_URL),
            font_path: var_or("CHART_FONT_PATH", DEFAULT_FONT_PATH),
            tag_refresh_hours: parse_or("TAG_REFRESH_HOURS", 24)?,
            new_polls_window_hours: parse_or("NEW_POLLS_WINDOW_HOURS", 24)?,
        })
    }
}

fn var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_or<T: std::str::FromStr>(key: &str, default: T) -> Result<T, Box<dyn std::error::Error + Send + Sync>> {
    match env::var(key) {
        Ok(raw) => match raw.trim().parse::<T>() {
            Ok(value) => Ok(value),
            Err(_) => Err(format!("{} must be a number, got '{}'", key, raw).into()),
        },
        Err(_) => Ok(default),
    }
}
