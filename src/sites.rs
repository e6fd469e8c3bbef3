//! Staffing-agency sites and the rules used to read their listing pages.

use crate::extractor::{DedupeKey, HeadingRule, LinkedRule, RuleError, SiteRuleSet, UrlScope};

/// Fallback heuristic line bounds used by most sites.
const DEFAULT_LINE_BOUNDS: (usize, usize) = (10, 200);

/// Consent banners and site chrome shared by most agencies' pages.
const CONSENT_KEYWORDS: [&str; 4] = ["cookie", "consent", "samtycke", "information"];

/// Generic role words used by the fallback scan.
const ROLE_KEYWORDS: [&str; 5] = ["utvecklare", "konsult", "analyst", "manager", "chef"];

#[derive(Debug, Clone)]
pub struct Site {
    key: &'static str,
    name: &'static str,
    listing_url: &'static str,
    rules: SiteRuleSet,
}

impl Site {
    pub fn new(
        key: &'static str,
        name: &'static str,
        listing_url: &'static str,
        rules: SiteRuleSet,
    ) -> Self {
        Self {
            key,
            name,
            listing_url,
            rules,
        }
    }

    pub fn key(&self) -> &'static str {
        self.key
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn listing_url(&self) -> &'static str {
        self.listing_url
    }

    pub fn rules(&self) -> &SiteRuleSet {
        &self.rules
    }

    /// `{key}_jobs.csv`
    pub fn output_file(&self) -> String {
        format!("{}_jobs.csv", self.key)
    }
}

/// Every known site, in the order the driver runs them.
pub fn all() -> Result<Vec<Site>, RuleError> {
    Ok(vec![
        bravura()?,
        academicwork()?,
        juridikjobb()?,
        amendo()?,
        wise()?,
        jerrie()?,
        randstad()?,
        sjr()?,
    ])
}

pub fn keys() -> [&'static str; 8] {
    [
        "bravura",
        "academicwork",
        "juridikjobb",
        "amendo",
        "wise",
        "jerrie",
        "randstad",
        "sjr",
    ]
}

pub fn find(key: &str) -> Result<Option<Site>, RuleError> {
    let site = match key.trim().to_ascii_lowercase().as_str() {
        "bravura" => bravura()?,
        "academicwork" => academicwork()?,
        "juridikjobb" => juridikjobb()?,
        "amendo" => amendo()?,
        "wise" => wise()?,
        "jerrie" => jerrie()?,
        "randstad" => randstad()?,
        "sjr" => sjr()?,
        _ => return Ok(None),
    };
    Ok(Some(site))
}

pub fn bravura() -> Result<Site, RuleError> {
    let rules = SiteRuleSet::builder("https://www.bravura.se/jobb/")
        .linked(LinkedRule::scoped("ledigajobb.bravura.se", "/").with_title_marker("#### "))
        .linked(
            LinkedRule::new([UrlScope::new("bravura.se", "/").with_subdomains()])
                .with_title_keywords(["jobb"])
                .with_min_title_chars(6),
        )
        .dedupe(DedupeKey::TitleAndLink)
        .uncapped()
        .build()?;

    Ok(Site::new(
        "bravura",
        "Bravura",
        "https://www.bravura.se/jobb/",
        rules,
    ))
}

pub fn academicwork() -> Result<Site, RuleError> {
    let rules = SiteRuleSet::builder("https://www.academicwork.se/lediga-jobb")
        .linked(LinkedRule::scoped("www.academicwork.se", "/jobb/"))
        .linked(LinkedRule::scoped("www.academicwork.se", "/lediga-jobb/"))
        .heading(4)
        .negative_keywords([
            "cookie",
            "consent",
            "om oss",
            "kontakt",
            "för företag",
            "jobbsökande",
            "sök",
            "filter",
        ])
        .positive_keywords(ROLE_KEYWORDS.into_iter().chain([
            "ingenjör",
            "designer",
            "säljare",
            "ekonom",
            "koordinator",
        ]))
        .line_bounds(DEFAULT_LINE_BOUNDS.0, DEFAULT_LINE_BOUNDS.1)
        .max_results(50)
        .build()?;

    Ok(Site::new(
        "academicwork",
        "Academic Work",
        "https://www.academicwork.se/lediga-jobb?l=whosonfirst%3Alocality%3A101752307",
        rules,
    ))
}

pub fn juridikjobb() -> Result<Site, RuleError> {
    let scope = || UrlScope::new("juridikjobb.se", "/");
    let mut builder = SiteRuleSet::builder("https://juridikjobb.se/sv/jobb");
    for keyword in ["jurist", "advokat", "legal", "paralegal"] {
        builder = builder.linked(LinkedRule::new([scope()]).with_title_keywords([keyword]));
    }

    let rules = builder
        .positive_keywords([
            "jurist",
            "advokat",
            "legal",
            "paralegal",
            "juridisk",
            "rättslig",
        ])
        .negative_keywords(["sök jobb", "mitt konto", "för arbetsgivare", "karriärtips"])
        .negative_filter(false, true)
        .line_bounds(10, 150)
        .max_results(20)
        .build()?;

    Ok(Site::new(
        "juridikjobb",
        "Juridikjobb",
        "https://juridikjobb.se/sv/jobb",
        rules,
    ))
}

pub fn amendo() -> Result<Site, RuleError> {
    let rules = SiteRuleSet::builder("https://jobb.amendo.se/jobs")
        .linked(LinkedRule::scoped("jobb.amendo.se", "/jobs/"))
        .linked(LinkedRule::scoped("amendo.se", "/"))
        .heading(4)
        .negative_keywords(CONSENT_KEYWORDS.into_iter().chain(["om", "logotyp"]))
        .positive_keywords(ROLE_KEYWORDS.into_iter().chain([
            "ingenjör",
            "koordinator",
            "specialist",
        ]))
        .line_bounds(DEFAULT_LINE_BOUNDS.0, DEFAULT_LINE_BOUNDS.1)
        .max_results(30)
        .build()?;

    Ok(Site::new(
        "amendo",
        "Amendo",
        "https://jobb.amendo.se/jobs",
        rules,
    ))
}

pub fn wise() -> Result<Site, RuleError> {
    let rules = SiteRuleSet::builder("https://www.wise.se/lediga-jobb/")
        .linked(LinkedRule::scoped("www.wise.se", "/"))
        .heading(4)
        .negative_keywords(CONSENT_KEYWORDS.into_iter().chain([
            "om",
            "logotyp",
            "visa detaljer",
        ]))
        .positive_keywords([
            "hr",
            "lön",
            "ekonomi",
            "chef",
            "marknad",
            "administration",
            "konsult",
            "controller",
        ])
        .line_bounds(DEFAULT_LINE_BOUNDS.0, DEFAULT_LINE_BOUNDS.1)
        .max_results(30)
        .build()?;

    Ok(Site::new(
        "wise",
        "Wise",
        "https://www.wise.se/lediga-jobb/?region[]=Stockholm",
        rules,
    ))
}

pub fn jerrie() -> Result<Site, RuleError> {
    let rules = SiteRuleSet::builder("https://jerrie.se/lediga-jobb")
        .linked(LinkedRule::scoped("jerrie.se", "/"))
        .heading(4)
        .negative_keywords(CONSENT_KEYWORDS.into_iter().chain(["om", "kontakt"]))
        .positive_keywords(ROLE_KEYWORDS.into_iter().chain([
            "ingenjör",
            "specialist",
            "koordinator",
        ]))
        .line_bounds(DEFAULT_LINE_BOUNDS.0, DEFAULT_LINE_BOUNDS.1)
        .max_results(30)
        .build()?;

    Ok(Site::new(
        "jerrie",
        "Jerrie",
        "https://jerrie.se/lediga-jobb",
        rules,
    ))
}

pub fn randstad() -> Result<Site, RuleError> {
    let rules = SiteRuleSet::builder("https://www.randstad.se/jobb/")
        .linked(LinkedRule::scoped("www.randstad.se", "/"))
        .heading(4)
        .negative_keywords(CONSENT_KEYWORDS.into_iter().chain([
            "om",
            "kontakt",
            "randstad",
        ]))
        .positive_keywords(ROLE_KEYWORDS.into_iter().chain([
            "ingenjör",
            "specialist",
            "koordinator",
            "säljare",
        ]))
        .line_bounds(DEFAULT_LINE_BOUNDS.0, DEFAULT_LINE_BOUNDS.1)
        .max_results(30)
        .build()?;

    Ok(Site::new(
        "randstad",
        "Randstad",
        "https://www.randstad.se/jobb/re-stockholms-lan/ci-stockholm/",
        rules,
    ))
}

pub fn sjr() -> Result<Site, RuleError> {
    let rules = SiteRuleSet::builder("https://sjr.se")
        .linked(LinkedRule::new([UrlScope::new("sjr.se", "/").with_subdomains()]))
        .rule(HeadingRule::new(1).with_min_title_chars(6))
        .negative_keywords(["cookie", "consent", "about", "details"])
        .negative_filter(true, true)
        .positive_keywords(ROLE_KEYWORDS.into_iter().chain([
            "ingenjör",
            "designer",
            "säljare",
        ]))
        .line_bounds(DEFAULT_LINE_BOUNDS.0, DEFAULT_LINE_BOUNDS.1)
        .fallback_limit(10)
        .uncapped()
        .build()?;

    Ok(Site::new(
        "sjr",
        "SJR",
        "https://sjr.se/lediga-jobb-samling/?filter=gi_city%3Dstockholm",
        rules,
    ))
}
