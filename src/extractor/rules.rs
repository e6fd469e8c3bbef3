//! Per-site extraction rules.
//!
//! A [`SiteRuleSet`] is built once per site through [`SiteRuleSetBuilder`] and
//! is immutable afterwards. Every check that can fail happens in `build`, so a
//! bad site entry stops the program before any page is fetched.

use thiserror::Error;
use url::Url;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RuleError {
    #[error("invalid fallback link '{link}': {reason}")]
    InvalidFallbackLink { link: String, reason: String },

    #[error("rule set has no extraction rules")]
    NoRules,

    #[error("linked rule #{index} has no url scope")]
    EmptyScope { index: usize },

    #[error("linked rule #{index} has a scope without a host")]
    EmptyHost { index: usize },

    #[error("heading rule #{index} must require at least one '#'")]
    ZeroHeadingLevel { index: usize },

    #[error("line bounds {min}..{max} admit no line length")]
    EmptyLineBounds { min: usize, max: usize },

    #[error("result cap must be greater than zero")]
    ZeroCap,

    #[error("fallback line limit must be greater than zero")]
    ZeroFallbackLimit,
}

/// A host (and path prefix) a linked rule accepts URLs from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlScope {
    host: String,
    path_prefix: String,
    include_subdomains: bool,
}

impl UrlScope {
    /// Any page below `path_prefix` on exactly `host`.
    pub fn new(host: impl Into<String>, path_prefix: impl Into<String>) -> Self {
        let mut path_prefix = path_prefix.into();
        if !path_prefix.starts_with('/') {
            path_prefix.insert(0, '/');
        }
        Self {
            host: host.into().trim().to_ascii_lowercase(),
            path_prefix,
            include_subdomains: false,
        }
    }

    /// Also accept every subdomain of the host.
    pub fn with_subdomains(mut self) -> Self {
        self.include_subdomains = true;
        self
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// The URL must point below the prefix; the bare prefix itself is navigation.
    pub fn contains(&self, url: &Url) -> bool {
        if !matches!(url.scheme(), "http" | "https") {
            return false;
        }

        let Some(host) = url.host_str() else {
            return false;
        };
        let host = host.to_ascii_lowercase();
        let host_ok = host == self.host
            || (self.include_subdomains && host.ends_with(&format!(".{}", self.host)));
        if !host_ok {
            return false;
        }

        match url.path().strip_prefix(&self.path_prefix) {
            Some(rest) => !rest.is_empty() || url.query().is_some(),
            None => false,
        }
    }
}

/// Captures a title and a URL from a markdown link `[title](url)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkedRule {
    scopes: Vec<UrlScope>,
    title_marker: Option<String>,
    title_keywords: Vec<String>,
    min_title_chars: usize,
}

impl LinkedRule {
    pub fn new(scopes: impl IntoIterator<Item = UrlScope>) -> Self {
        Self {
            scopes: scopes.into_iter().collect(),
            title_marker: None,
            title_keywords: Vec::new(),
            min_title_chars: 0,
        }
    }

    /// Single-scope shorthand.
    pub fn scoped(host: &str, path_prefix: &str) -> Self {
        Self::new([UrlScope::new(host, path_prefix)])
    }

    /// The link text must open with `marker`, which is stripped from the title.
    pub fn with_title_marker(mut self, marker: impl Into<String>) -> Self {
        self.title_marker = Some(marker.into());
        self
    }

    /// The title must contain one of `keywords`, ignoring case.
    pub fn with_title_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.title_keywords = lowercase_all(keywords);
        self
    }

    /// Titles shorter than `chars` characters are skipped by this rule.
    pub fn with_min_title_chars(mut self, chars: usize) -> Self {
        self.min_title_chars = chars;
        self
    }

    pub fn scopes(&self) -> &[UrlScope] {
        &self.scopes
    }

    pub fn title_marker(&self) -> Option<&str> {
        self.title_marker.as_deref()
    }

    pub fn title_keywords(&self) -> &[String] {
        &self.title_keywords
    }

    pub fn min_title_chars(&self) -> usize {
        self.min_title_chars
    }

    pub fn accepts_url(&self, url: &Url) -> bool {
        self.scopes.iter().any(|scope| scope.contains(url))
    }
}

/// Captures a title from a markdown heading line; the link is the site fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeadingRule {
    min_level: usize,
    min_title_chars: usize,
}

impl HeadingRule {
    /// Headings with at least `min_level` leading `#`.
    pub fn new(min_level: usize) -> Self {
        Self {
            min_level,
            min_title_chars: 0,
        }
    }

    /// Heading titles shorter than `chars` characters are skipped.
    pub fn with_min_title_chars(mut self, chars: usize) -> Self {
        self.min_title_chars = chars;
        self
    }

    pub fn min_level(&self) -> usize {
        self.min_level
    }

    pub fn min_title_chars(&self) -> usize {
        self.min_title_chars
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionRule {
    Linked(LinkedRule),
    Heading(HeadingRule),
}

impl From<LinkedRule> for ExtractionRule {
    fn from(rule: LinkedRule) -> Self {
        Self::Linked(rule)
    }
}

impl From<HeadingRule> for ExtractionRule {
    fn from(rule: HeadingRule) -> Self {
        Self::Heading(rule)
    }
}

/// What makes two listings the same listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DedupeKey {
    #[default]
    Title,
    TitleAndLink,
}

/// Which stages drop titles containing a negative keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NegativeFilter {
    pub patterns: bool,
    pub fallback: bool,
}

impl Default for NegativeFilter {
    fn default() -> Self {
        Self {
            patterns: true,
            fallback: false,
        }
    }
}

/// Exclusive character-count bounds for fallback lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineBounds {
    pub min: usize,
    pub max: usize,
}

impl LineBounds {
    pub fn contains(&self, len: usize) -> bool {
        len > self.min && len < self.max
    }
}

impl Default for LineBounds {
    fn default() -> Self {
        Self { min: 10, max: 200 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteRuleSet {
    rules: Vec<ExtractionRule>,
    fallback_link: String,
    negative_keywords: Vec<String>,
    positive_keywords: Vec<String>,
    negative_filter: NegativeFilter,
    max_results: Option<usize>,
    line_bounds: LineBounds,
    fallback_limit: Option<usize>,
    dedupe: DedupeKey,
}

impl SiteRuleSet {
    pub fn builder(fallback_link: impl Into<String>) -> SiteRuleSetBuilder {
        SiteRuleSetBuilder::new(fallback_link)
    }

    pub fn rules(&self) -> &[ExtractionRule] {
        &self.rules
    }

    pub fn fallback_link(&self) -> &str {
        &self.fallback_link
    }

    /// Lower-cased.
    pub fn negative_keywords(&self) -> &[String] {
        &self.negative_keywords
    }

    /// Lower-cased.
    pub fn positive_keywords(&self) -> &[String] {
        &self.positive_keywords
    }

    pub fn negative_filter(&self) -> NegativeFilter {
        self.negative_filter
    }

    pub fn max_results(&self) -> Option<usize> {
        self.max_results
    }

    pub fn line_bounds(&self) -> LineBounds {
        self.line_bounds
    }

    /// Most lines the fallback scan may contribute, if limited.
    pub fn fallback_limit(&self) -> Option<usize> {
        self.fallback_limit
    }

    pub fn dedupe(&self) -> DedupeKey {
        self.dedupe
    }
}

#[derive(Debug, Clone)]
pub struct SiteRuleSetBuilder {
    rules: Vec<ExtractionRule>,
    fallback_link: String,
    negative_keywords: Vec<String>,
    positive_keywords: Vec<String>,
    negative_filter: NegativeFilter,
    max_results: Option<usize>,
    line_bounds: LineBounds,
    fallback_limit: Option<usize>,
    dedupe: DedupeKey,
}

impl SiteRuleSetBuilder {
    fn new(fallback_link: impl Into<String>) -> Self {
        Self {
            rules: Vec::new(),
            fallback_link: fallback_link.into(),
            negative_keywords: Vec::new(),
            positive_keywords: Vec::new(),
            negative_filter: NegativeFilter::default(),
            max_results: None,
            line_bounds: LineBounds::default(),
            fallback_limit: None,
            dedupe: DedupeKey::default(),
        }
    }

    pub fn rule(mut self, rule: impl Into<ExtractionRule>) -> Self {
        self.rules.push(rule.into());
        self
    }

    pub fn linked(self, rule: LinkedRule) -> Self {
        self.rule(rule)
    }

    pub fn heading(self, min_level: usize) -> Self {
        self.rule(HeadingRule::new(min_level))
    }

    pub fn negative_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.negative_keywords = lowercase_all(keywords);
        self
    }

    pub fn positive_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.positive_keywords = lowercase_all(keywords);
        self
    }

    pub fn negative_filter(mut self, patterns: bool, fallback: bool) -> Self {
        self.negative_filter = NegativeFilter { patterns, fallback };
        self
    }

    pub fn max_results(mut self, cap: usize) -> Self {
        self.max_results = Some(cap);
        self
    }

    pub fn uncapped(mut self) -> Self {
        self.max_results = None;
        self
    }

    pub fn line_bounds(mut self, min: usize, max: usize) -> Self {
        self.line_bounds = LineBounds { min, max };
        self
    }

    pub fn fallback_limit(mut self, limit: usize) -> Self {
        self.fallback_limit = Some(limit);
        self
    }

    pub fn dedupe(mut self, dedupe: DedupeKey) -> Self {
        self.dedupe = dedupe;
        self
    }

    pub fn build(self) -> Result<SiteRuleSet, RuleError> {
        validate_fallback_link(&self.fallback_link)?;

        if self.rules.is_empty() {
            return Err(RuleError::NoRules);
        }

        for (index, rule) in self.rules.iter().enumerate() {
            match rule {
                ExtractionRule::Linked(linked) => {
                    if linked.scopes.is_empty() {
                        return Err(RuleError::EmptyScope { index });
                    }
                    if linked.scopes.iter().any(|scope| scope.host.is_empty()) {
                        return Err(RuleError::EmptyHost { index });
                    }
                }
                ExtractionRule::Heading(heading) => {
                    if heading.min_level == 0 {
                        return Err(RuleError::ZeroHeadingLevel { index });
                    }
                }
            }
        }

        let LineBounds { min, max } = self.line_bounds;
        if min.saturating_add(1) >= max {
            return Err(RuleError::EmptyLineBounds { min, max });
        }

        if self.max_results == Some(0) {
            return Err(RuleError::ZeroCap);
        }

        if self.fallback_limit == Some(0) {
            return Err(RuleError::ZeroFallbackLimit);
        }

        Ok(SiteRuleSet {
            rules: self.rules,
            fallback_link: self.fallback_link,
            negative_keywords: self.negative_keywords,
            positive_keywords: self.positive_keywords,
            negative_filter: self.negative_filter,
            max_results: self.max_results,
            line_bounds: self.line_bounds,
            fallback_limit: self.fallback_limit,
            dedupe: self.dedupe,
        })
    }
}

fn validate_fallback_link(link: &str) -> Result<(), RuleError> {
    let invalid = |reason: String| RuleError::InvalidFallbackLink {
        link: link.to_string(),
        reason,
    };

    let url = Url::parse(link).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }
    if url.host_str().is_none_or(str::is_empty) {
        return Err(invalid("missing host".to_string()));
    }
    Ok(())
}

fn lowercase_all<I, S>(keywords: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    keywords
        .into_iter()
        .map(|k| k.as_ref().trim().to_lowercase())
        .filter(|k| !k.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn scope_requires_path_below_prefix() {
        let scope = UrlScope::new("www.academicwork.se", "/jobb/");
        assert!(scope.contains(&url("https://www.academicwork.se/jobb/utvecklare-123")));
        assert!(!scope.contains(&url("https://www.academicwork.se/jobb/")));
        assert!(!scope.contains(&url("https://www.academicwork.se/om-oss")));
        assert!(!scope.contains(&url("https://academicwork.se/jobb/x")));
        assert!(!scope.contains(&url("ftp://www.academicwork.se/jobb/x")));
    }

    #[test]
    fn scope_with_subdomains() {
        let scope = UrlScope::new("bravura.se", "/").with_subdomains();
        assert!(scope.contains(&url("https://ledigajobb.bravura.se/jobs/1")));
        assert!(scope.contains(&url("https://bravura.se/jobb/2")));
        assert!(!scope.contains(&url("https://notbravura.se/jobb/2")));
    }

    #[test]
    fn scope_host_is_case_insensitive() {
        let scope = UrlScope::new("Jerrie.SE", "lediga-jobb/");
        assert_eq!(scope.host(), "jerrie.se");
        assert!(scope.contains(&url("https://JERRIE.se/lediga-jobb/ekonom")));
    }

    #[test]
    fn query_counts_as_below_prefix() {
        let scope = UrlScope::new("www.wise.se", "/lediga-jobb/");
        assert!(scope.contains(&url("https://www.wise.se/lediga-jobb/?id=4")));
    }

    #[test]
    fn builder_lowercases_keywords() {
        let rules = SiteRuleSet::builder("https://www.wise.se/lediga-jobb/")
            .heading(4)
            .negative_keywords(["Cookie", "  ", "Visa Detaljer"])
            .positive_keywords(["HR", "Lön"])
            .build()
            .unwrap();
        assert_eq!(rules.negative_keywords(), ["cookie", "visa detaljer"]);
        assert_eq!(rules.positive_keywords(), ["hr", "lön"]);
        assert_eq!(rules.negative_filter(), NegativeFilter::default());
        assert_eq!(rules.dedupe(), DedupeKey::Title);
        assert_eq!(rules.max_results(), None);
    }

    #[test]
    fn build_rejects_bad_fallback_link() {
        let err = SiteRuleSet::builder("").heading(4).build().unwrap_err();
        assert!(matches!(err, RuleError::InvalidFallbackLink { .. }));

        let err = SiteRuleSet::builder("mailto:jobs@wise.se")
            .heading(4)
            .build()
            .unwrap_err();
        assert!(matches!(err, RuleError::InvalidFallbackLink { .. }));
    }

    #[test]
    fn build_rejects_missing_rules() {
        let err = SiteRuleSet::builder("https://jerrie.se/lediga-jobb")
            .build()
            .unwrap_err();
        assert_eq!(err, RuleError::NoRules);
    }

    #[test]
    fn build_rejects_empty_scopes_and_levels() {
        let err = SiteRuleSet::builder("https://jerrie.se/lediga-jobb")
            .heading(4)
            .linked(LinkedRule::new([]))
            .build()
            .unwrap_err();
        assert_eq!(err, RuleError::EmptyScope { index: 1 });

        let err = SiteRuleSet::builder("https://jerrie.se/lediga-jobb")
            .linked(LinkedRule::scoped("  ", "/"))
            .build()
            .unwrap_err();
        assert_eq!(err, RuleError::EmptyHost { index: 0 });

        let err = SiteRuleSet::builder("https://jerrie.se/lediga-jobb")
            .heading(0)
            .build()
            .unwrap_err();
        assert_eq!(err, RuleError::ZeroHeadingLevel { index: 0 });
    }

    #[test]
    fn build_rejects_bad_limits() {
        let err = SiteRuleSet::builder("https://jerrie.se/lediga-jobb")
            .heading(4)
            .line_bounds(10, 11)
            .build()
            .unwrap_err();
        assert_eq!(err, RuleError::EmptyLineBounds { min: 10, max: 11 });

        let err = SiteRuleSet::builder("https://jerrie.se/lediga-jobb")
            .heading(4)
            .max_results(0)
            .build()
            .unwrap_err();
        assert_eq!(err, RuleError::ZeroCap);

        let err = SiteRuleSet::builder("https://sjr.se")
            .heading(1)
            .fallback_limit(0)
            .build()
            .unwrap_err();
        assert_eq!(err, RuleError::ZeroFallbackLimit);
    }

    #[test]
    fn line_bounds_are_exclusive() {
        let bounds = LineBounds { min: 10, max: 150 };
        assert!(!bounds.contains(10));
        assert!(bounds.contains(11));
        assert!(bounds.contains(149));
        assert!(!bounds.contains(150));
    }
}
