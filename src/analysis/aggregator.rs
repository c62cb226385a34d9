//! Failure aggregation across files.
//!
//! This module folds the per-file, per-check records of a results document
//! into failure groups keyed by tier, check name and failure name.

use crate::models::{
    Candidate, FailureGroup, InputError, MessageGroup, RawResults, Summary, Tier, TierSummary,
};
use indexmap::IndexMap;
use std::collections::BTreeSet;
use tracing::debug;

/// Parse a results document and aggregate it in one step.
pub fn summarise_json(s: &str) -> Result<Summary, InputError> {
    let raw = RawResults::from_json_str(s)?;
    Ok(aggregate(&raw))
}

/// Aggregate every failing record of `raw` into a summary.
///
/// Files are visited in identifier order, checks in document order and
/// records in tier order, so the output depends only on the content of
/// the input.
pub fn aggregate(raw: &RawResults) -> Summary {
    let mut summary: IndexMap<Tier, TierSummary> =
        Tier::ALL.into_iter().map(|t| (t, TierSummary::new())).collect();
    let mut failing_files: BTreeSet<&str> = BTreeSet::new();

    for (filename, checks) in &raw.files {
        let mut failures = 0usize;

        for (check_name, result) in checks {
            for tier in Tier::ALL {
                let bucket = summary
                    .entry(tier)
                    .or_default()
                    .entry(check_name.clone())
                    .or_default();

                for candidate in result.tier(tier) {
                    if !candidate.is_failure() {
                        continue;
                    }
                    failures += 1;
                    failing_files.insert(filename.as_str());
                    record_failure(bucket, filename, candidate);
                }
            }
        }

        debug!(file = %filename, checks = checks.len(), failures, "aggregated file");
    }

    let file_count = raw.file_count();
    let summary = Summary {
        file_count,
        clean_file_count: file_count - failing_files.len(),
        summary: prune_empty(summary),
    };

    debug!(
        files = summary.file_count,
        clean = summary.clean_file_count,
        groups = summary.groups().count(),
        "aggregation complete"
    );

    summary
}

/// Merge one failing record into its (tier, check) bucket.
fn record_failure(bucket: &mut Vec<FailureGroup>, filename: &str, candidate: &Candidate) {
    let group = find_or_insert(bucket, |g| g.name == candidate.name, || {
        FailureGroup::new(candidate.name.as_str())
    });
    group.count += 1;
    insert_sorted(&mut group.files, filename);

    // A record counts at most once towards each of its messages.
    let mut seen: BTreeSet<&str> = BTreeSet::new();
    for msg in candidate.msgs.iter().filter(|m| seen.insert(m.as_str())) {
        let message = find_or_insert(&mut group.messages, |m| m.text == *msg, || {
            MessageGroup::new(msg.as_str())
        });
        message.count += 1;
        insert_sorted(&mut message.files, filename);
    }
}

/// Return the first element matching `pred`, appending a new one if none does.
fn find_or_insert<T>(
    items: &mut Vec<T>,
    pred: impl Fn(&T) -> bool,
    make: impl FnOnce() -> T,
) -> &mut T {
    let idx = match items.iter().position(pred) {
        Some(idx) => idx,
        None => {
            items.push(make());
            items.len() - 1
        }
    };
    &mut items[idx]
}

/// Insert `item` keeping `items` sorted. Equal entries go after existing ones.
fn insert_sorted(items: &mut Vec<String>, item: &str) {
    let pos = items.partition_point(|existing| existing.as_str() <= item);
    items.insert(pos, item.to_string());
}

/// Drop checks without failure groups, then tiers without checks.
fn prune_empty(summary: IndexMap<Tier, TierSummary>) -> IndexMap<Tier, TierSummary> {
    summary
        .into_iter()
        .filter_map(|(tier, checks)| {
            let checks: TierSummary = checks
                .into_iter()
                .filter(|(_, groups)| !groups.is_empty())
                .collect();
            (!checks.is_empty()).then_some((tier, checks))
        })
        .collect()
}
