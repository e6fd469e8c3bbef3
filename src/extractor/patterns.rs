//! The two token shapes recognised in reader output: markdown links and
//! markdown headings. Each has its own matcher; rules pick which one runs.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;
use url::Url;

use crate::extractor::model::{Candidate, is_acceptable_title};
use crate::extractor::reject::{contains_keyword, should_reject};
use crate::extractor::rules::{ExtractionRule, HeadingRule, LinkedRule, SiteRuleSet};

/// `[text](url)` with an optional `"title"` after the url.
static LINK_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"\[([^\]]+)\]\(\s*([^)\s]+)(?:\s+"[^"]*")?\s*\)"#).unwrap());

/// `#### text` at the start of a line.
static HEADING_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^[ \t]*(#+)[ \t]+(.+)$").unwrap());

/// Stage 1: run every rule in declared order and keep the accepted candidates.
pub fn pattern_candidates(content: &str, rules: &SiteRuleSet) -> Vec<Candidate> {
    let filter_negative = rules.negative_filter().patterns;
    let mut candidates = Vec::new();

    for (index, rule) in rules.rules().iter().enumerate() {
        let found = match rule {
            ExtractionRule::Linked(linked) => link_candidates(content, linked),
            ExtractionRule::Heading(heading) => {
                heading_candidates(content, heading, rules.fallback_link())
            }
        };

        let before = candidates.len();
        candidates.extend(found.into_iter().filter(|candidate| {
            is_acceptable_title(&candidate.title)
                && !(filter_negative && should_reject(&candidate.title, rules.negative_keywords()))
        }));
        debug!(rule = index, accepted = candidates.len() - before, "pattern rule applied");
    }

    candidates
}

/// All markdown links inside the rule's URL scopes.
pub fn link_candidates(content: &str, rule: &LinkedRule) -> Vec<Candidate> {
    LINK_REGEX
        .captures_iter(content)
        .filter_map(|caps| {
            let text = caps.get(1)?.as_str();
            let raw_url = caps.get(2)?.as_str();

            let url = Url::parse(raw_url).ok()?;
            if !rule.accepts_url(&url) {
                return None;
            }

            let text = match rule.title_marker() {
                Some(marker) => text.strip_prefix(marker)?,
                None => text,
            };

            let title = first_field(text);
            if title.chars().count() < rule.min_title_chars() {
                return None;
            }
            if !rule.title_keywords().is_empty() && !contains_keyword(title, rule.title_keywords())
            {
                return None;
            }

            Some(Candidate::new(title, raw_url))
        })
        .collect()
}

/// All heading lines deep enough for the rule, linked to `fallback_link`.
pub fn heading_candidates(content: &str, rule: &HeadingRule, fallback_link: &str) -> Vec<Candidate> {
    HEADING_REGEX
        .captures_iter(content)
        .filter_map(|caps| {
            let level = caps.get(1)?.as_str().len();
            if level < rule.min_level() {
                return None;
            }

            // Closing hashes (`## Title ##`) are decoration
            let text = caps.get(2)?.as_str().trim_end().trim_end_matches('#');
            let title = first_field(text);
            if title.chars().count() < rule.min_title_chars() {
                return None;
            }
            Some(Candidate::new(title, fallback_link))
        })
        .collect()
}

/// Text before the first `|`, trimmed. Fields after it are location and date metadata.
fn first_field(text: &str) -> &str {
    text.split('|').next().unwrap_or_default().trim()
}
