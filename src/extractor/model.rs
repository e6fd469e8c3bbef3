use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Date format of the `date_added` column, e.g. `19/06/25`.
pub const DATE_FORMAT: &str = "%d/%m/%y";

/// One extracted job posting. Field order is the CSV column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingRecord {
    pub title: String,
    pub link: String,
    pub date_added: String,
}

/// A title/link pair found by a rule or the fallback scan, before dedupe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub title: String,
    pub link: String,
}

impl Candidate {
    pub fn new(title: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            link: link.into(),
        }
    }

    pub fn into_record(self, date_added: &str) -> ListingRecord {
        ListingRecord {
            title: self.title,
            link: self.link,
            date_added: date_added.to_string(),
        }
    }
}

pub fn date_stamp(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Case-insensitive form of a title used for dedupe keys.
pub fn normalize_title(title: &str) -> String {
    title.trim().to_lowercase()
}

/// Titles need more than three characters once trimmed.
pub fn is_acceptable_title(title: &str) -> bool {
    title.chars().count() > 3
}
