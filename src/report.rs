use std::fmt;

use serde::Serialize;

use crate::runner::{SiteOutcome, SiteStatus};

/// Sites with more listings than this are worth using.
const RECOMMENDED_ABOVE: usize = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Quality {
    Excellent,
    Good,
    Moderate,
    Poor,
}

impl Quality {
    pub fn for_count(jobs: usize) -> Self {
        match jobs {
            n if n > 50 => Self::Excellent,
            n if n > RECOMMENDED_ABOVE => Self::Good,
            n if n > 5 => Self::Moderate,
            _ => Self::Poor,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Excellent => "🟢 Excellent",
            Self::Good => "🟡 Good",
            Self::Moderate => "🟠 Moderate",
            Self::Poor => "🔴 Poor",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SummaryRow {
    #[serde(flatten)]
    pub outcome: SiteOutcome,
    pub quality: Quality,
}

#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    rows: Vec<SummaryRow>,
    total_jobs: usize,
}

impl Summary {
    /// Rows sorted by job count, most first; ties keep run order.
    pub fn new(outcomes: Vec<SiteOutcome>) -> Self {
        let total_jobs = outcomes.iter().map(|o| o.jobs).sum();
        let mut rows: Vec<SummaryRow> = outcomes
            .into_iter()
            .map(|outcome| SummaryRow {
                quality: Quality::for_count(outcome.jobs),
                outcome,
            })
            .collect();
        rows.sort_by(|a, b| b.outcome.jobs.cmp(&a.outcome.jobs));

        Self { rows, total_jobs }
    }

    pub fn rows(&self) -> &[SummaryRow] {
        &self.rows
    }

    pub fn total_jobs(&self) -> usize {
        self.total_jobs
    }

    pub fn recommended(&self) -> impl Iterator<Item = &SummaryRow> {
        self.rows
            .iter()
            .filter(|row| row.outcome.jobs > RECOMMENDED_ABOVE)
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "=".repeat(60);
        let thin = "-".repeat(60);

        writeln!(f, "{rule}")?;
        writeln!(f, "SCRAPING SUMMARY")?;
        writeln!(f, "{rule}")?;
        writeln!(
            f,
            "{:<15} {:<12} {:<10} {}",
            "Scraper", "Jobs Found", "Status", "Quality"
        )?;
        writeln!(f, "{thin}")?;
        for row in &self.rows {
            let status = if row.outcome.is_success() {
                "✅ Success"
            } else {
                "❌ Failed"
            };
            writeln!(
                f,
                "{:<15} {:<12} {:<10} {}",
                row.outcome.site,
                row.outcome.jobs,
                status,
                row.quality.label()
            )?;
        }
        writeln!(f, "{thin}")?;
        writeln!(f, "TOTAL JOBS FOUND: {}", self.total_jobs)?;
        writeln!(f)?;

        writeln!(f, "{rule}")?;
        writeln!(f, "RECOMMENDED SCRAPERS")?;
        writeln!(f, "{rule}")?;
        let mut any = false;
        for row in self.recommended() {
            any = true;
            match &row.outcome.status {
                SiteStatus::Saved { path } => writeln!(
                    f,
                    "✅ {}: {} jobs → {}",
                    row.outcome.site.to_uppercase(),
                    row.outcome.jobs,
                    path.display()
                )?,
                _ => writeln!(
                    f,
                    "✅ {}: {} jobs",
                    row.outcome.site.to_uppercase(),
                    row.outcome.jobs
                )?,
            }
        }
        if !any {
            writeln!(f, "No scrapers performed exceptionally well.")?;
            writeln!(f, "Consider improving parsing logic or trying different URLs.")?;
        }
        Ok(())
    }
}
