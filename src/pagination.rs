use crate::models::Vote;
use log::warn;

// Votes shown side by side when browsing a listing
pub const PAGE_SIZE: usize = 3;

// Page position over one immutable listing. Out-of-range transitions are no-ops.
#[derive(Debug, Clone)]
pub struct Paginator {
    votes: Vec<Vote>,
    page_size: usize,
    page_index: usize,
}

impl Paginator {
    pub fn new(votes: Vec<Vote>, page_size: usize) -> Self {
        Self {
            votes,
            page_size: page_size.max(1),
            page_index: 0,
        }
    }

    // Rebuilds a session from a persisted position; a stale index is pulled back onto the last page
    pub fn resume(votes: Vec<Vote>, page_size: usize, page_index: usize) -> Self {
        let mut paginator = Self::new(votes, page_size);
        paginator.page_index = page_index.min(paginator.page_count().saturating_sub(1));
        paginator
    }

    pub fn votes(&self) -> &[Vote] {
        &self.votes
    }

    pub fn total(&self) -> usize {
        self.votes.len()
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn page_index(&self) -> usize {
        self.page_index
    }

    pub fn page_count(&self) -> usize {
        self.votes.len().div_ceil(self.page_size)
    }

    // Detail view: one vote per page
    pub fn is_detail(&self) -> bool {
        self.page_size == 1
    }

    pub fn current(&self) -> &[Vote] {
        let start = (self.page_index * self.page_size).min(self.votes.len());
        let end = (start + self.page_size).min(self.votes.len());
        &self.votes[start..end]
    }

    pub fn has_next(&self) -> bool {
        (self.page_index + 1) * self.page_size < self.votes.len()
    }

    pub fn has_previous(&self) -> bool {
        self.page_index > 0
    }

    pub fn next(&mut self) -> bool {
        if !self.has_next() {
            return false;
        }
        self.page_index += 1;
        true
    }

    pub fn previous(&mut self) -> bool {
        if !self.has_previous() {
            return false;
        }
        self.page_index -= 1;
        true
    }

    // Jumps to the single-vote view of `vote_key`; further steps move one vote at a time
    pub fn select(&mut self, vote_key: &str) -> bool {
        match self.votes.iter().position(|vote| vote.key() == vote_key) {
            Some(position) => {
                self.page_size = 1;
                self.page_index = position;
                true
            }
            None => {
                warn!("Ignoring selection of unknown vote {}", vote_key);
                false
            }
        }
    }
}
