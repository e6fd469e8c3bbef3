pub mod fallback;
pub mod model;
pub mod patterns;
pub mod reject;
pub mod rules;

#[cfg(test)]
mod tests;

pub use model::{Candidate, ListingRecord};
pub use rules::{
    DedupeKey, ExtractionRule, HeadingRule, LineBounds, LinkedRule, NegativeFilter, RuleError,
    SiteRuleSet, UrlScope,
};

use chrono::{Local, NaiveDate};
use std::collections::HashSet;
use tracing::debug;

use crate::extractor::model::{date_stamp, normalize_title};

/// Extract listings from reader content, stamped with today's date.
pub fn extract(content: &str, rules: &SiteRuleSet) -> Vec<ListingRecord> {
    extract_on(content, rules, Local::now().date_naive())
}

/// Extract listings from reader content, stamped with `date`.
///
/// Never fails: content that matches nothing yields an empty list.
pub fn extract_on(content: &str, rules: &SiteRuleSet, date: NaiveDate) -> Vec<ListingRecord> {
    // 1. Ordered pattern rules
    let mut candidates = patterns::pattern_candidates(content, rules);

    // 2. Line heuristic, only when no rule produced anything
    if candidates.is_empty() {
        candidates = fallback::fallback_candidates(content, rules);
    }

    // 3. First occurrence of each key wins
    let mut unique = dedupe(candidates, rules.dedupe());

    // 4. Cap, keeping discovery order
    if let Some(cap) = rules.max_results() {
        unique.truncate(cap);
    }

    debug!(records = unique.len(), "extraction finished");

    let date_added = date_stamp(date);
    unique
        .into_iter()
        .map(|candidate| candidate.into_record(&date_added))
        .collect()
}

pub fn dedupe(candidates: Vec<Candidate>, key: DedupeKey) -> Vec<Candidate> {
    let mut seen = HashSet::new();
    candidates
        .into_iter()
        .filter(|candidate| {
            let link = match key {
                DedupeKey::Title => None,
                DedupeKey::TitleAndLink => Some(candidate.link.clone()),
            };
            seen.insert((normalize_title(&candidate.title), link))
        })
        .collect()
}
