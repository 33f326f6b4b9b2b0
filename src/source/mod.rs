use crate::error::SourceError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::info;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

const REQUEST_TIMEOUT_SECONDS: u64 = 15;

// Raw poll listing entry as served by `/api/polling/all-polls`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PollRecord {
    pub poll_id: u64,
    pub title: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    #[serde(default)]
    pub tags: Vec<TagRecord>,
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TagRecord {
    pub id: String,
}

#[derive(Debug, Deserialize)]
struct PollListing {
    polls: Vec<PollRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TallyRecord {
    pub parameters: TallyParameters,
    pub results: Vec<TallyResult>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TallyParameters {
    pub input_format: InputFormatRecord,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InputFormatRecord {
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TallyResult {
    pub option_id: u64,
    pub option_name: String,
    pub mkr_support: RawAmount,
    #[serde(default)]
    pub transfer: Option<RawAmount>,
    pub first_pct: RawAmount,
    #[serde(default)]
    pub transfer_pct: Option<RawAmount>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutiveRecord {
    pub address: String,
    pub title: String,
    pub date: DateTime<Utc>,
    pub active: bool,
    pub spell_data: SpellData,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpellData {
    pub mkr_support: RawAmount,
    #[serde(default)]
    pub has_been_scheduled: bool,
    #[serde(default)]
    pub has_been_cast: bool,
}

// The API serves token amounts both as JSON numbers and as decimal strings
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawAmount {
    Number(f64),
    Text(String),
}

impl RawAmount {
    pub fn value(&self, field: &str) -> Result<f64, SourceError> {
        let parsed = match self {
            RawAmount::Number(n) => Some(*n),
            RawAmount::Text(s) => s.trim().parse::<f64>().ok(),
        };
        match parsed {
            Some(n) if n.is_finite() => Ok(n),
            _ => Err(SourceError::malformed(field, format!("not a number: {:?}", self))),
        }
    }
}

// Typed access to the governance portal; the aggregator only ever talks to this trait
#[async_trait]
pub trait VoteSource: Send + Sync {
    async fn all_polls(&self) -> Result<Vec<PollRecord>, SourceError>;

    async fn poll_tally(&self, poll_id: u64) -> Result<TallyRecord, SourceError>;

    // Most recent executives first
    async fn executives(&self, limit: usize) -> Result<Vec<ExecutiveRecord>, SourceError>;

    async fn poll_tags(&self) -> Result<Vec<String>, SourceError>;

    // Base URL of the voting portal, used to link votes from embeds
    fn portal_url(&self) -> &str;
}

pub struct MakerApi {
    client: reqwest::Client,
    base_url: String,
    tags_url: String,
}

impl MakerApi {
    pub fn new(base_url: &str, tags_url: &str) -> Result<Self, SourceError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECONDS))
            .build()
            .map_err(|source| SourceError::Http {
                url: base_url.to_string(),
                source,
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            tags_url: tags_url.to_string(),
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, SourceError> {
        info!("Fetching {}", url);
        let response = self.client.get(url).send().await.map_err(|source| SourceError::Http {
            url: url.to_string(),
            source,
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(|source| SourceError::Http {
            url: url.to_string(),
            source,
        })?;

        serde_json::from_slice(&body).map_err(|source| SourceError::Decode {
            url: url.to_string(),
            source,
        })
    }
}

#[async_trait]
impl VoteSource for MakerApi {
    async fn all_polls(&self) -> Result<Vec<PollRecord>, SourceError> {
        let url = format!("{}/api/polling/all-polls", self.base_url);
        let listing: PollListing = self.get_json(&url).await?;
        Ok(listing.polls)
    }

    async fn poll_tally(&self, poll_id: u64) -> Result<TallyRecord, SourceError> {
        let url = format!("{}/api/polling/tally/{}", self.base_url, poll_id);
        self.get_json(&url).await
    }

    async fn executives(&self, limit: usize) -> Result<Vec<ExecutiveRecord>, SourceError> {
        let url = format!("{}/api/executive?start=0&limit={}", self.base_url, limit);
        self.get_json(&url).await
    }

    async fn poll_tags(&self) -> Result<Vec<String>, SourceError> {
        let tags: Vec<TagRecord> = self.get_json(&self.tags_url).await?;
        Ok(tags.into_iter().map(|tag| tag.id).collect())
    }

    fn portal_url(&self) -> &str {
        &self.base_url
    }
}

#[cfg(test)]
pub mod testing {
    use super::*;
    use chrono::{Duration, TimeZone};
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Barrier;

    // In-memory governance API; every tally is a fixed 62% / 38% single-choice split
    #[derive(Default)]
    pub struct StubSource {
        pub polls: Vec<PollRecord>,
        pub executives: Vec<ExecutiveRecord>,
        pub broken_tallies: HashSet<u64>,
        pub unavailable: bool,
        pub tally_requests: AtomicUsize,
        // Held by every tally request until the barrier fills
        pub tally_gate: Option<Arc<Barrier>>,
    }

    impl StubSource {
        fn check_available(&self) -> Result<(), SourceError> {
            if self.unavailable {
                return Err(SourceError::Status {
                    url: "https://vote.example".to_string(),
                    status: 503,
                });
            }
            Ok(())
        }
    }

    #[async_trait]
    impl VoteSource for StubSource {
        async fn all_polls(&self) -> Result<Vec<PollRecord>, SourceError> {
            self.check_available()?;
            Ok(self.polls.clone())
        }

        async fn poll_tally(&self, poll_id: u64) -> Result<TallyRecord, SourceError> {
            self.check_available()?;
            self.tally_requests.fetch_add(1, Ordering::SeqCst);
            if let Some(gate) = &self.tally_gate {
                gate.wait().await;
            }
            let support = if self.broken_tallies.contains(&poll_id) { "??" } else { "620" };
            Ok(TallyRecord {
                parameters: TallyParameters {
                    input_format: InputFormatRecord {
                        kind: "single-choice".to_string(),
                    },
                },
                results: vec![
                    TallyResult {
                        option_id: 1,
                        option_name: "Yes".to_string(),
                        mkr_support: RawAmount::Text(support.to_string()),
                        transfer: None,
                        first_pct: RawAmount::Number(60.0),
                        transfer_pct: Some(RawAmount::Number(2.0)),
                    },
                    TallyResult {
                        option_id: 2,
                        option_name: "No".to_string(),
                        mkr_support: RawAmount::Text("380".to_string()),
                        transfer: None,
                        first_pct: RawAmount::Number(38.0),
                        transfer_pct: None,
                    },
                ],
            })
        }

        async fn executives(&self, limit: usize) -> Result<Vec<ExecutiveRecord>, SourceError> {
            self.check_available()?;
            Ok(self.executives.iter().take(limit).cloned().collect())
        }

        async fn poll_tags(&self) -> Result<Vec<String>, SourceError> {
            self.check_available()?;
            Ok(Vec::new())
        }

        fn portal_url(&self) -> &str {
            "https://vote.example"
        }
    }

    pub fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap()
    }

    // A poll ending `ends_in_hours` from `now()`, opened three days before that
    pub fn poll(id: u64, ends_in_hours: i64, tags: &[&str]) -> PollRecord {
        PollRecord {
            poll_id: id,
            title: format!("Poll {}", id),
            start_date: now() + Duration::hours(ends_in_hours) - Duration::days(3),
            end_date: now() + Duration::hours(ends_in_hours),
            tags: tags.iter().map(|t| TagRecord { id: t.to_string() }).collect(),
            url: format!("https://github.example/poll-{}.md", id),
        }
    }

    pub fn spell(digit: char, support: &str, active: bool, scheduled: bool) -> ExecutiveRecord {
        ExecutiveRecord {
            address: format!("0x{}", digit.to_string().repeat(40)),
            title: format!("Spell {}", digit),
            date: now(),
            active,
            spell_data: SpellData {
                mkr_support: RawAmount::Text(support.to_string()),
                has_been_scheduled: scheduled,
                has_been_cast: false,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn amounts_accept_numbers_and_decimal_strings() {
        let from_text: RawAmount = serde_json::from_value(json!("1234.5")).unwrap();
        let from_number: RawAmount = serde_json::from_value(json!(42)).unwrap();
        assert_eq!(from_text.value("mkrSupport").unwrap(), 1234.5);
        assert_eq!(from_number.value("mkrSupport").unwrap(), 42.0);
    }

    #[test]
    fn garbage_amounts_are_reported_as_malformed() {
        let amount = RawAmount::Text("lots".to_string());
        assert!(matches!(amount.value("mkrSupport"), Err(SourceError::Malformed { .. })));
    }

    #[test]
    fn tally_records_decode_with_optional_transfer_fields() {
        let tally: TallyRecord = serde_json::from_value(json!({
            "parameters": { "inputFormat": { "type": "single-choice", "options": [] } },
            "results": [
                { "optionId": 1, "optionName": "Yes", "mkrSupport": "100.5", "firstPct": 60.0, "transfer": "4.5", "transferPct": 2.0 },
                { "optionId": 2, "optionName": "No", "mkrSupport": "50", "firstPct": 38.0 }
            ]
        }))
        .unwrap();

        assert_eq!(tally.parameters.input_format.kind, "single-choice");
        assert_eq!(tally.results.len(), 2);
        assert!(tally.results[1].transfer.is_none());
        assert!(tally.results[1].transfer_pct.is_none());
    }

    #[test]
    fn executive_records_read_flags_from_spell_data() {
        let spell: ExecutiveRecord = serde_json::from_value(json!({
            "address": "0xabc",
            "title": "Spell",
            "date": "2024-03-01T00:00:00.000Z",
            "active": true,
            "spellData": { "mkrSupport": "75000", "hasBeenScheduled": true }
        }))
        .unwrap();

        assert!(spell.spell_data.has_been_scheduled);
        assert!(!spell.spell_data.has_been_cast);
    }
}
