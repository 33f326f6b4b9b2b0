use crate::listing::Listing;
use crate::models::{Vote, VoteKind};
use crate::pagination::Paginator;
use crate::render::RenderedChart;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

pub const EMBED_COLOR: u32 = 0xF4B731;
// Discord caps select menus at 25 entries and option descriptions at 100 characters
pub const MAX_CHOICES: usize = 25;
const MAX_CHOICE_DESCRIPTION: usize = 100;

// Plain data for one paginated vote message; the chat client turns it into its own widgets
#[derive(Debug, Clone)]
pub struct VoteDisplay {
    pub title: String,
    pub description: String,
    pub color: u32,
    pub fields: Vec<DisplayField>,
    pub footer: String,
    pub image: ImageAttachment,
    pub controls: Controls,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DisplayField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

#[derive(Debug, Clone)]
pub struct ImageAttachment {
    pub filename: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Controls {
    pub listing: Listing,
    pub page_size: usize,
    pub page_index: usize,
    pub previous_enabled: bool,
    pub next_enabled: bool,
    pub choices: Vec<Choice>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Choice {
    pub label: String,
    pub value: String,
    pub description: String,
    pub selected: bool,
}

// Where a finished page goes. Implemented by the chat-client layer.
#[async_trait]
pub trait RenderTarget: Send + Sync {
    // Answers the interaction right away so slow fetches stay inside the client's deadline
    async fn acknowledge(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    async fn show(&self, display: VoteDisplay) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    // Plain-text reply used instead of a chart for empty listings and failures
    async fn notify(&self, message: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}

pub fn status_label(vote: &Vote, now: DateTime<Utc>) -> &'static str {
    match &vote.kind {
        VoteKind::Executive { status, .. } => status.label(),
        VoteKind::Poll { .. } => {
            if vote.is_active_at(now) {
                "Active"
            } else {
                "Ended"
            }
        }
    }
}

pub fn build_display(listing: &Listing, paginator: &Paginator, chart: RenderedChart, now: DateTime<Utc>) -> VoteDisplay {
    let mut fields: Vec<DisplayField> = paginator
        .current()
        .iter()
        .map(|vote| DisplayField {
            name: vote.kind_label().to_string(),
            value: format!(
                "[{}]({}) - {}\nStatus: {}",
                vote.short_id(),
                vote.url,
                vote.title,
                status_label(vote, now)
            ),
            inline: false,
        })
        .collect();

    if let Some(tag) = listing.tag() {
        fields.push(DisplayField {
            name: "Tag filter".to_string(),
            value: tag.to_string(),
            inline: true,
        });
    }

    let footer = format!(
        "{} - page {} of {}",
        listing.count_label(paginator.total()),
        paginator.page_index() + 1,
        paginator.page_count()
    );

    VoteDisplay {
        title: listing.title().to_string(),
        description: listing.description(),
        color: EMBED_COLOR,
        fields,
        footer,
        image: ImageAttachment {
            filename: format!("votes-{}.png", Uuid::new_v4().simple()),
            bytes: chart.png,
        },
        controls: Controls {
            listing: listing.clone(),
            page_size: paginator.page_size(),
            page_index: paginator.page_index(),
            previous_enabled: paginator.has_previous(),
            next_enabled: paginator.has_next(),
            choices: choices(paginator),
        },
    }
}

// A window of at most 25 votes that always contains the current page
fn choices(paginator: &Paginator) -> Vec<Choice> {
    let votes = paginator.votes();
    let page_start = paginator.page_index() * paginator.page_size();
    let start = page_start.min(votes.len().saturating_sub(MAX_CHOICES));

    votes
        .iter()
        .enumerate()
        .skip(start)
        .take(MAX_CHOICES)
        .map(|(index, vote)| Choice {
            label: vote.to_string(),
            value: vote.key(),
            description: truncate_chars(&vote.title, MAX_CHOICE_DESCRIPTION),
            selected: paginator.is_detail() && index == page_start,
        })
        .collect()
}

fn truncate_chars(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max - 1).collect();
    cut.push('…');
    cut
}
