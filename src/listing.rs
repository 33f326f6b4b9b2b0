use crate::error::SourceError;
use crate::models::Vote;
use crate::source::VoteSource;
use crate::voting::{PollOrder, VoteAggregator};
use chrono::{DateTime, Utc};

// What a paginated message is showing; enough to re-fetch it on every click
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Listing {
    Active,
    Executives,
    Polls { finished: bool, tag: Option<String> },
}

impl Listing {
    pub async fn fetch<S: VoteSource>(
        &self,
        aggregator: &VoteAggregator<S>,
        now: DateTime<Utc>,
    ) -> Result<Vec<Vote>, SourceError> {
        match self {
            Listing::Active => aggregator.list_active(now).await,
            Listing::Executives => aggregator.list_executives().await,
            Listing::Polls { finished, tag } => {
                aggregator
                    .list_polls(now, *finished, tag.as_deref(), PollOrder::Ascending)
                    .await
            }
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Listing::Active => "Active votes",
            Listing::Executives => "Executive votes",
            Listing::Polls { .. } => "On-chain polls",
        }
    }

    pub fn description(&self) -> String {
        match self {
            Listing::Active => "Vote breakdown for active executive votes and on-chain polls".to_string(),
            Listing::Executives => "Vote breakdown for executive votes".to_string(),
            Listing::Polls { finished, .. } => format!(
                "Vote breakdown for {} on-chain polls",
                if *finished { "finished" } else { "active" }
            ),
        }
    }

    pub fn tag(&self) -> Option<&str> {
        match self {
            Listing::Polls { tag, .. } => tag.as_deref(),
            _ => None,
        }
    }

    // "3 polls", "1 executive vote"
    pub fn count_label(&self, count: usize) -> String {
        let noun = match self {
            Listing::Active => "vote",
            Listing::Executives => "executive vote",
            Listing::Polls { .. } => "poll",
        };
        format!("{} {}{}", count, noun, if count == 1 { "" } else { "s" })
    }

    pub fn empty_message(&self) -> String {
        match self {
            Listing::Active => "There are no active votes right now. Please, try again later.".to_string(),
            Listing::Executives => "There are no active executive votes right now. Please, try again later.".to_string(),
            Listing::Polls { finished, tag } => format!(
                "There were no {} polls found{}",
                if *finished { "finished" } else { "active" },
                if tag.is_some() {
                    " for the tag you specified. Please, try with another tag."
                } else {
                    ". Please, try again later."
                }
            ),
        }
    }

    // Compact form carried inside component custom ids
    pub fn encode(&self) -> String {
        match self {
            Listing::Active => "active".to_string(),
            Listing::Executives => "execs".to_string(),
            Listing::Polls { finished, tag } => {
                let base = if *finished { "polls-finished" } else { "polls-active" };
                match tag {
                    Some(tag) => format!("{}/{}", base, tag),
                    None => base.to_string(),
                }
            }
        }
    }

    pub fn decode(raw: &str) -> Option<Self> {
        let (base, tag) = match raw.split_once('/') {
            Some((base, tag)) if !tag.is_empty() => (base, Some(tag.to_string())),
            Some(_) => return None,
            None => (raw, None),
        };

        match (base, tag) {
            ("active", None) => Some(Listing::Active),
            ("execs", None) => Some(Listing::Executives),
            ("polls-active", tag) => Some(Listing::Polls { finished: false, tag }),
            ("polls-finished", tag) => Some(Listing::Polls { finished: true, tag }),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tagged_poll_listing_survives_encoding() {
        let listing = Listing::Polls {
            finished: true,
            tag: Some("collateral-onboard".to_string()),
        };
        assert_eq!(listing.encode(), "polls-finished/collateral-onboard");
        assert_eq!(Listing::decode(&listing.encode()), Some(listing));
    }

    #[test]
    fn malformed_listings_are_rejected() {
        assert_eq!(Listing::decode("execs/extra"), None);
        assert_eq!(Listing::decode("polls-active/"), None);
        assert_eq!(Listing::decode("everything"), None);
    }

    #[test]
    fn empty_messages_mention_the_tag_filter() {
        let tagged = Listing::Polls {
            finished: false,
            tag: Some("stability-fee".to_string()),
        };
        assert_eq!(
            tagged.empty_message(),
            "There were no active polls found for the tag you specified. Please, try with another tag."
        );
        assert_eq!(Listing::Executives.count_label(1), "1 executive vote");
        assert_eq!(Listing::Active.count_label(4), "4 votes");
    }
}
