use crate::display::{RenderTarget, build_display};
use crate::listing::Listing;
use crate::pagination::{PAGE_SIZE, Paginator};
use crate::render::{ChartRenderer, Typeface};
use crate::source::VoteSource;
use crate::voting::VoteAggregator;
use chrono::{DateTime, Utc};
use log::{error, info};

pub const SOURCE_UNAVAILABLE_MESSAGE: &str =
    "The governance portal could not be reached right now. Please, try again later.";
pub const RENDER_FAILED_MESSAGE: &str = "The vote breakdown could not be drawn right now. Please, try again later.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Open,
    Next,
    Previous,
    Select(String),
}

// One user action against a listing, with the position the message was last showing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub listing: Listing,
    pub page_size: usize,
    pub page_index: usize,
    pub step: Step,
}

impl PageRequest {
    pub fn open(listing: Listing) -> Self {
        Self {
            listing,
            page_size: PAGE_SIZE,
            page_index: 0,
            step: Step::Open,
        }
    }
}

// Fetch fresh, rebuild the paginator where the message left off, apply the step, render, hand off
pub async fn show_page<S, T, R>(
    aggregator: &VoteAggregator<S>,
    renderer: &ChartRenderer<T>,
    target: &R,
    request: PageRequest,
    now: DateTime<Utc>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>>
where
    S: VoteSource,
    T: Typeface,
    R: RenderTarget + ?Sized,
{
    target.acknowledge().await?;

    let votes = match request.listing.fetch(aggregator, now).await {
        Ok(votes) => votes,
        Err(e) => {
            error!("Failed to fetch {}: {}", request.listing.encode(), e);
            return target.notify(SOURCE_UNAVAILABLE_MESSAGE).await;
        }
    };

    if votes.is_empty() {
        info!("Listing {} is empty", request.listing.encode());
        return target.notify(&request.listing.empty_message()).await;
    }

    let mut paginator = Paginator::resume(votes, request.page_size, request.page_index);
    let moved = match &request.step {
        Step::Open => true,
        Step::Next => paginator.next(),
        Step::Previous => paginator.previous(),
        Step::Select(key) => paginator.select(key),
    };
    if !moved {
        info!("Ignoring {:?} on {} at page {}", request.step, request.listing.encode(), request.page_index);
    }

    let chart = match renderer.render(paginator.current()) {
        Ok(chart) => chart,
        Err(e) => {
            error!("Failed to render {}: {}", request.listing.encode(), e);
            return target.notify(RENDER_FAILED_MESSAGE).await;
        }
    };

    info!(
        "Showing {} vote column(s) out of {} for {} at page {}",
        chart.layout.columns.len(),
        paginator.total(),
        request.listing.encode(),
        paginator.page_index() + 1
    );
    target.show(build_display(&request.listing, &paginator, chart, now)).await
}
