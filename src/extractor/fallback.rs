use tracing::debug;

use crate::extractor::model::{Candidate, is_acceptable_title};
use crate::extractor::reject::{contains_keyword, should_reject};
use crate::extractor::rules::SiteRuleSet;

/// Stage 2: treat plain lines that look like job titles as listings.
///
/// Every candidate carries the site fallback link, so distinct postings found
/// here can share one link.
pub fn fallback_candidates(content: &str, rules: &SiteRuleSet) -> Vec<Candidate> {
    let bounds = rules.line_bounds();
    let filter_negative = rules.negative_filter().fallback;

    let candidates: Vec<Candidate> = content
        .lines()
        .map(str::trim)
        .filter(|line| bounds.contains(line.chars().count()) && is_acceptable_title(line))
        .filter(|line| contains_keyword(line, rules.positive_keywords()))
        .filter(|line| !(filter_negative && should_reject(line, rules.negative_keywords())))
        .take(rules.fallback_limit().unwrap_or(usize::MAX))
        .map(|line| Candidate::new(line, rules.fallback_link()))
        .collect();

    debug!(accepted = candidates.len(), "fallback scan applied");
    candidates
}
