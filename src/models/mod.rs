use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// A poll or executive spell, normalized from one API snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vote {
    pub kind: VoteKind,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub tags: Vec<String>,
    pub options: Vec<VoteOption>,
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoteOption {
    pub name: String,
    pub support_amount: f64,
    pub percentage: f64,
    pub option_index: usize,
}

// Decided once when the record is normalized; nothing downstream looks at id shapes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum VoteKind {
    Poll {
        poll_id: u64,
        input_format: InputFormat,
    },
    Executive {
        address: String,
        support_amount: f64,
        hat_amount: f64,
        status: SpellStatus,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputFormat {
    SingleChoice,
    MultiChoice,
    RankFree,
    Other(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpellStatus {
    Live,
    Scheduled,
    Executed,
}

// Lightweight listing entry for recently posted polls
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPoll {
    pub id: u64,
    pub title: String,
    pub source_link: String,
}

impl InputFormat {
    pub fn from_type(kind: &str) -> Self {
        match kind {
            "single-choice" => InputFormat::SingleChoice,
            "multi-choice" | "approval" => InputFormat::MultiChoice,
            "rank-free" | "ranked-choice" => InputFormat::RankFree,
            other => InputFormat::Other(other.to_string()),
        }
    }
}

impl SpellStatus {
    pub fn from_flags(has_been_cast: bool, has_been_scheduled: bool) -> Self {
        if has_been_cast {
            SpellStatus::Executed
        } else if has_been_scheduled {
            SpellStatus::Scheduled
        } else {
            SpellStatus::Live
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SpellStatus::Live => "Live",
            SpellStatus::Scheduled => "Scheduled",
            SpellStatus::Executed => "Executed",
        }
    }
}

impl Vote {
    // Active polls end in the future; executives are filtered on the API `active` flag instead
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        match self.kind {
            VoteKind::Poll { .. } => self.end_date.is_some_and(|end| end > now),
            VoteKind::Executive { .. } => true,
        }
    }

    // Stable key used by dropdown values and `Paginator::select`
    pub fn key(&self) -> String {
        match &self.kind {
            VoteKind::Poll { poll_id, .. } => poll_id.to_string(),
            VoteKind::Executive { address, .. } => address.clone(),
        }
    }

    // Human identifier printed in chart headers and embed fields
    pub fn short_id(&self) -> String {
        match &self.kind {
            VoteKind::Poll { poll_id, .. } => poll_id.to_string(),
            VoteKind::Executive { address, .. } => shorten_address(address),
        }
    }

    pub fn kind_label(&self) -> &'static str {
        match self.kind {
            VoteKind::Poll { .. } => "Poll",
            VoteKind::Executive { .. } => "Executive",
        }
    }
}

impl fmt::Display for Vote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind_label(), self.short_id())
    }
}

pub fn shorten_address(address: &str) -> String {
    let chars: Vec<char> = address.chars().collect();
    if chars.len() <= 10 {
        return address.to_string();
    }
    let head: String = chars[..6].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn executive_address_is_shortened_for_display() {
        let vote = fixtures::executive("0x1234567890abcdef1234567890abcdef12345678", 1.0, 2.0);
        assert_eq!(vote.short_id(), "0x1234...5678");
        assert_eq!(vote.key(), "0x1234567890abcdef1234567890abcdef12345678");
        assert_eq!(vote.to_string(), "Executive 0x1234...5678");
    }

    #[test]
    fn poll_activity_uses_strict_end_date_comparison() {
        let vote = fixtures::poll(7, InputFormat::SingleChoice, &[("Yes", 1.0)]);
        assert!(vote.is_active_at(fixtures::at(19)));
        assert!(!vote.is_active_at(fixtures::at(20)));
        assert!(!vote.is_active_at(fixtures::at(21)));
    }

    #[test]
    fn spell_status_prefers_executed_over_scheduled() {
        assert_eq!(SpellStatus::from_flags(true, true), SpellStatus::Executed);
        assert_eq!(SpellStatus::from_flags(false, true), SpellStatus::Scheduled);
        assert_eq!(SpellStatus::from_flags(false, false), SpellStatus::Live);
    }

    #[test]
    fn unknown_input_formats_are_kept_verbatim() {
        assert_eq!(InputFormat::from_type("single-choice"), InputFormat::SingleChoice);
        assert_eq!(InputFormat::from_type("majority"), InputFormat::Other("majority".to_string()));
    }
}
