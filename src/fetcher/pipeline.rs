use crate::fetcher::{
    errors::FetchError,
    types::{Charset, ReaderPage},
};
use chrono::Utc;
use encoding_rs::Encoding;
use regex::Regex;
use reqwest::StatusCode;
use std::sync::LazyLock;
use url::Url;

static CHARSET_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)charset\s*=\s*["']?([^"'\s;]+)"#).unwrap());

const SNIFF_LEN: usize = 4096;

pub fn is_supported_content_type(content_type: &str) -> bool {
    let content_type = content_type.trim().to_ascii_lowercase();
    content_type.starts_with("text/") || content_type.starts_with("application/json")
}

pub fn process_response(
    target_url: Url,
    status: StatusCode,
    body_bytes: &[u8],
    content_type: &str,
) -> Result<ReaderPage, FetchError> {
    let charset = detect_charset(content_type, body_bytes);
    let content = decode_to_utf8(body_bytes, &charset)?;

    Ok(ReaderPage {
        target_url,
        status,
        content,
        charset,
        fetched_at: Utc::now(),
    })
}

fn detect_charset(content_type: &str, body_bytes: &[u8]) -> Charset {
    // 1. Byte order mark wins over everything else
    if let Some((encoding, _)) = Encoding::for_bom(body_bytes) {
        return Charset::from_encoding(encoding);
    }

    // 2. Content-Type header
    if let Some(captures) = CHARSET_REGEX.captures(content_type)
        && let Some(charset_str) = captures.get(1)
    {
        let charset_name = charset_str.as_str().to_lowercase();
        if let Some(encoding) = Encoding::for_label(charset_name.as_bytes()) {
            return Charset::from_encoding(encoding);
        }
    }

    // 3. Heuristic guess over the head of the body
    let search_bytes = &body_bytes[..body_bytes.len().min(SNIFF_LEN)];
    let mut detector = chardetng::EncodingDetector::new();
    detector.feed(search_bytes, search_bytes.len() == body_bytes.len());
    Charset::from_encoding(detector.guess(None, true))
}

fn decode_to_utf8(body_bytes: &[u8], charset: &Charset) -> Result<String, FetchError> {
    let encoding = charset.encoding();
    let (decoded, _encoding, had_errors) = encoding.decode(body_bytes);

    if had_errors {
        return Err(FetchError::Charset(format!(
            "Failed to decode content with encoding: {}",
            encoding.name()
        )));
    }

    Ok(decoded.into_owned())
}
