use crate::error::SourceError;
use crate::models::{InputFormat, SpellStatus, Vote, VoteKind, VoteOption};
use crate::source::{ExecutiveRecord, PollRecord, TallyRecord};
use lazy_static::lazy_static;
use log::warn;
use regex::Regex;

lazy_static! {
    static ref SPELL_ADDRESS: Regex = Regex::new(r"^0x[0-9a-fA-F]{40}$").unwrap();
}

// Option name used for the single bar an executive collapses to
pub const EXECUTIVE_OPTION_NAME: &str = "Support";

// Merges the delegated/transferred weight into the raw on-chain tally
pub fn poll_options(tally: &TallyRecord, poll_id: u64) -> Result<Vec<VoteOption>, SourceError> {
    tally
        .results
        .iter()
        .enumerate()
        .map(|(index, result)| {
            let record = |field: &str| format!("poll {} option {} {}", poll_id, result.option_id, field);

            let mkr_support = result.mkr_support.value(&record("mkrSupport"))?;
            let transfer = match &result.transfer {
                Some(amount) => amount.value(&record("transfer"))?,
                None => 0.0,
            };
            let first_pct = result.first_pct.value(&record("firstPct"))?;
            let transfer_pct = match &result.transfer_pct {
                Some(amount) => amount.value(&record("transferPct"))?,
                None => 0.0,
            };

            Ok(VoteOption {
                name: result.option_name.clone(),
                support_amount: mkr_support + transfer,
                percentage: (first_pct + transfer_pct) / 100.0,
                option_index: index,
            })
        })
        .collect()
}

pub fn normalize_poll(record: &PollRecord, tally: &TallyRecord, portal_url: &str) -> Result<Vote, SourceError> {
    if record.title.trim().is_empty() {
        return Err(SourceError::malformed(format!("poll {}", record.poll_id), "empty title"));
    }

    Ok(Vote {
        kind: VoteKind::Poll {
            poll_id: record.poll_id,
            input_format: InputFormat::from_type(&tally.parameters.input_format.kind),
        },
        title: record.title.clone(),
        created_at: record.start_date,
        end_date: Some(record.end_date),
        tags: record.tags.iter().map(|tag| tag.id.to_lowercase()).collect(),
        options: poll_options(tally, record.poll_id)?,
        url: format!("{}/polling/{}", portal_url, record.poll_id),
    })
}

// Index of the hat: the first scheduled spell in API order
pub fn find_hat(records: &[ExecutiveRecord]) -> Option<usize> {
    records.iter().position(|record| record.spell_data.has_been_scheduled)
}

// Builds every executive of one batch, all measured against the same hat
pub fn normalize_executives(records: &[ExecutiveRecord], portal_url: &str) -> Result<Vec<Vote>, SourceError> {
    let supports = records
        .iter()
        .map(|record| {
            if !SPELL_ADDRESS.is_match(&record.address) {
                return Err(SourceError::malformed(
                    format!("executive '{}'", record.title),
                    format!("invalid spell address '{}'", record.address),
                ));
            }
            record
                .spell_data
                .mkr_support
                .value(&format!("executive {} spellData.mkrSupport", record.address))
        })
        .collect::<Result<Vec<f64>, SourceError>>()?;

    let hat_index = match find_hat(records) {
        Some(index) => Some(index),
        None => {
            // No scheduled spell in the batch; the best-supported one is the closest stand-in
            if !records.is_empty() {
                warn!("No scheduled executive in batch of {}, using highest support as hat", records.len());
            }
            supports
                .iter()
                .enumerate()
                .max_by(|a, b| a.1.partial_cmp(b.1).unwrap_or(std::cmp::Ordering::Equal))
                .map(|(index, _)| index)
        }
    };
    let hat_amount = hat_index.map(|index| supports[index]).unwrap_or(0.0);

    Ok(records
        .iter()
        .zip(supports)
        .map(|(record, support_amount)| Vote {
            kind: VoteKind::Executive {
                address: record.address.clone(),
                support_amount,
                hat_amount,
                status: SpellStatus::from_flags(record.spell_data.has_been_cast, record.spell_data.has_been_scheduled),
            },
            title: record.title.clone(),
            created_at: record.date,
            end_date: None,
            tags: Vec::new(),
            options: vec![VoteOption {
                name: EXECUTIVE_OPTION_NAME.to_string(),
                support_amount,
                percentage: support_fraction(support_amount, hat_amount),
                option_index: 0,
            }],
            url: format!("{}/executive/{}", portal_url, record.address),
        })
        .collect())
}

// Share of the hat's weight behind a spell, capped at 1.0 once it matches the hat
pub fn support_fraction(support_amount: f64, hat_amount: f64) -> f64 {
    if hat_amount <= 0.0 {
        return 0.0;
    }
    (support_amount / hat_amount).clamp(0.0, 1.0)
}
