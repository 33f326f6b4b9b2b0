use crate::error::SourceError;
use crate::models::{NewPoll, Vote};
use crate::source::{PollRecord, VoteSource};
use crate::voting::tally::{normalize_executives, normalize_poll};
use chrono::{DateTime, Duration, Utc};
use futures::future::try_join_all;
use log::info;

// Finished listings only show the most recently ended polls
pub const FINISHED_POLL_LIMIT: usize = 10;
// Size of the executive batch the hat is chosen from
pub const EXECUTIVE_BATCH_LIMIT: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOrder {
    Ascending,
    Descending,
}

pub struct VoteAggregator<S: VoteSource> {
    source: S,
}

impl<S: VoteSource> VoteAggregator<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub async fn list_polls(
        &self,
        now: DateTime<Utc>,
        finished: bool,
        tag: Option<&str>,
        order: PollOrder,
    ) -> Result<Vec<Vote>, SourceError> {
        let records = self.source.all_polls().await?;
        let total = records.len();
        let selected = select_polls(records, now, finished, tag, order);
        info!(
            "Selected {} of {} polls (finished: {}, tag: {:?})",
            selected.len(),
            total,
            finished,
            tag
        );

        // Tallies are requested together; one failed tally fails the listing
        let tallies = try_join_all(selected.iter().map(|record| self.source.poll_tally(record.poll_id))).await?;
        selected
            .iter()
            .zip(tallies)
            .map(|(record, tally)| normalize_poll(record, &tally, self.source.portal_url()))
            .collect()
    }

    pub async fn list_executives(&self) -> Result<Vec<Vote>, SourceError> {
        let records = self.source.executives(EXECUTIVE_BATCH_LIMIT).await?;
        let votes = normalize_executives(&records, self.source.portal_url())?;

        let mut active: Vec<Vote> = records
            .iter()
            .zip(votes)
            .filter(|(record, _)| record.active)
            .map(|(_, vote)| vote)
            .collect();
        // Stable, so spells sharing a date keep their API order
        active.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(active)
    }

    pub async fn list_active(&self, now: DateTime<Utc>) -> Result<Vec<Vote>, SourceError> {
        let mut votes = self.list_executives().await?;
        votes.extend(self.list_polls(now, false, None, PollOrder::Descending).await?);
        Ok(votes)
    }

    // Cheap listing: no tally requests
    pub async fn new_polls_since(&self, now: DateTime<Utc>, window: Duration) -> Result<Vec<NewPoll>, SourceError> {
        let earliest = now - window;
        let latest = now + window;

        let mut polls: Vec<NewPoll> = self
            .source
            .all_polls()
            .await?
            .into_iter()
            .filter(|record| record.start_date >= earliest && record.start_date <= latest)
            .map(|record| NewPoll {
                id: record.poll_id,
                title: record.title,
                source_link: record.url,
            })
            .collect();
        polls.sort_by_key(|poll| poll.id);
        Ok(polls)
    }
}

// Tag filter, active/finished partition, finished truncation and final ordering
pub fn select_polls(
    records: Vec<PollRecord>,
    now: DateTime<Utc>,
    finished: bool,
    tag: Option<&str>,
    order: PollOrder,
) -> Vec<PollRecord> {
    let mut selected: Vec<PollRecord> = records
        .into_iter()
        .filter(|record| match tag {
            Some(tag) => record.tags.iter().any(|t| t.id.eq_ignore_ascii_case(tag)),
            None => true,
        })
        .filter(|record| (record.end_date > now) != finished)
        .collect();

    if finished {
        selected.sort_by(|a, b| b.end_date.cmp(&a.end_date).then(b.poll_id.cmp(&a.poll_id)));
        selected.truncate(FINISHED_POLL_LIMIT);
    }

    match order {
        PollOrder::Ascending => selected.sort_by_key(|record| record.poll_id),
        PollOrder::Descending => selected.sort_by(|a, b| b.poll_id.cmp(&a.poll_id)),
    }
    selected
}
