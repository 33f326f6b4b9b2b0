use crate::services::Services;
use crate::source::VoteSource;
use crate::tags;
use log::{error, info, warn};
use std::sync::Arc;
use std::time::Duration as StdDuration;
use tokio::time::interval;

// The first tick fires immediately, so tags are loaded at start-up too
pub async fn refresh_tags_task(services: Arc<Services>) {
    let hours = services.config.tag_refresh_hours.max(1);
    info!("Starting background task to refresh poll tags every {} hours...", hours);
    let mut interval = interval(StdDuration::from_secs(hours * 3600));

    loop {
        interval.tick().await;
        refresh_once(services.aggregator.source()).await;
    }
}

// A failed or empty fetch keeps the previous snapshot
pub async fn refresh_once<S: VoteSource>(source: &S) {
    match source.poll_tags().await {
        Ok(fetched) if fetched.is_empty() => {
            warn!("Poll tag refresh returned no tags, keeping the previous list");
        }
        Ok(fetched) => {
            info!("Loaded {} poll tags", fetched.len());
            tags::replace(fetched);
        }
        Err(e) => {
            error!("Failed to refresh poll tags: {}", e);
        }
    }
}
