pub mod aggregate;
pub mod tally;

pub use aggregate::{PollOrder, VoteAggregator};
