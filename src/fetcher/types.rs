use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Charset {
    Utf8,
    Windows1252,
    Utf16Le,
    Utf16Be,
    Other(String),
}

impl Charset {
    pub fn from_encoding(encoding: &'static encoding_rs::Encoding) -> Self {
        use std::ptr;

        if ptr::eq(encoding, encoding_rs::UTF_8) {
            Self::Utf8
        } else if ptr::eq(encoding, encoding_rs::WINDOWS_1252) {
            Self::Windows1252
        } else if ptr::eq(encoding, encoding_rs::UTF_16LE) {
            Self::Utf16Le
        } else if ptr::eq(encoding, encoding_rs::UTF_16BE) {
            Self::Utf16Be
        } else {
            Self::Other(encoding.name().to_string())
        }
    }

    pub fn encoding(&self) -> &'static encoding_rs::Encoding {
        match self {
            Self::Utf8 => encoding_rs::UTF_8,
            Self::Windows1252 => encoding_rs::WINDOWS_1252,
            Self::Utf16Le => encoding_rs::UTF_16LE,
            Self::Utf16Be => encoding_rs::UTF_16BE,
            Self::Other(name) => {
                encoding_rs::Encoding::for_label(name.as_bytes()).unwrap_or(encoding_rs::UTF_8)
            }
        }
    }
}

/// A page as rendered by the reader proxy: markdown-like text plus metadata.
#[derive(Debug, Clone)]
pub struct ReaderPage {
    /// The listing page that was asked for, not the proxy URL.
    pub target_url: Url,
    pub status: StatusCode,
    pub content: String,
    pub charset: Charset,
    pub fetched_at: DateTime<Utc>,
}

impl ReaderPage {
    /// First `max_chars` characters of the content, used when a page yields no listings.
    pub fn preview(&self, max_chars: usize) -> &str {
        match self.content.char_indices().nth(max_chars) {
            Some((idx, _)) => &self.content[..idx],
            None => &self.content,
        }
    }
}
