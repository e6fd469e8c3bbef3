use chrono::NaiveDate;
use std::fs;

use crate::extractor::{LinkedRule, ListingRecord, SiteRuleSet, extract, extract_on};
use crate::sites;

fn run_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 19).unwrap()
}

fn fixture(name: &str) -> String {
    fs::read_to_string(format!("src/extractor/tests/fixtures/{}", name))
        .expect("Failed to read test fixture")
}

fn titles(records: &[ListingRecord]) -> Vec<&str> {
    records.iter().map(|r| r.title.as_str()).collect()
}

#[test]
fn test_bravura_linked_title_cut_at_pipe() {
    let site = sites::bravura().unwrap();
    let content = "[#### Systemutvecklare | Stockholm](https://ledigajobb.bravura.se/jobs/123)";

    let records = extract_on(content, site.rules(), run_date());

    assert_eq!(
        records,
        vec![ListingRecord {
            title: "Systemutvecklare".to_string(),
            link: "https://ledigajobb.bravura.se/jobs/123".to_string(),
            date_added: "19/06/25".to_string(),
        }]
    );
}

#[test]
fn test_bravura_page() {
    let site = sites::bravura().unwrap();
    let records = extract_on(&fixture("bravura.md"), site.rules(), run_date());

    // Same title on two links survives because bravura keys on title and link
    assert_eq!(
        titles(&records),
        vec![
            "Systemutvecklare",
            "Redovisningsekonom",
            "Systemutvecklare",
            "Se alla lediga jobb",
            "Fler lediga jobb inom IT",
        ]
    );
    assert_eq!(records[0].link, "https://ledigajobb.bravura.se/jobs/123");
    assert_eq!(records[2].link, "https://ledigajobb.bravura.se/jobs/125");
    assert!(records.iter().all(|r| r.date_added == "19/06/25"));
}

#[test]
fn test_wise_page_links_then_headings() {
    let site = sites::wise().unwrap();
    let records = extract_on(&fixture("wise.md"), site.rules(), run_date());

    assert_eq!(
        titles(&records),
        vec![
            "Lönespecialist till växande bolag",
            "HR-generalist",
            "Lönekonsult",
        ]
    );
    // The link record for HR-generalist came first and keeps its link
    assert_eq!(
        records[1].link,
        "https://www.wise.se/jobb/hr-generalist-1002/"
    );
    assert_eq!(records[2].link, "https://www.wise.se/lediga-jobb/");
}

#[test]
fn test_fallback_single_line() {
    let site = sites::wise().unwrap();
    let records = extract_on(&fixture("fallback.md"), site.rules(), run_date());

    assert_eq!(records.len(), 1);
    assert_eq!(
        records[0].title,
        "Vi söker en Ekonomichef till vårt Stockholmskontor"
    );
    assert_eq!(records[0].link, site.rules().fallback_link());
}

#[test]
fn test_fallback_not_used_when_patterns_match() {
    let site = sites::wise().unwrap();
    let content = format!(
        "{}\n[Controller](https://www.wise.se/jobb/controller-77/)",
        fixture("fallback.md")
    );

    let records = extract_on(&content, site.rules(), run_date());
    assert_eq!(titles(&records), vec!["Controller"]);
}

#[test]
fn test_juridikjobb_negatives_only_in_fallback() {
    let site = sites::juridikjobb().unwrap();
    let records = extract_on(&fixture("juridikjobb.md"), site.rules(), run_date());

    assert_eq!(
        titles(&records),
        vec![
            "Bolagsjurist till fastighetsbolag",
            "Biträdande jurist, advokatbyrå",
            "Karriärtips för jurister",
            "Legal Counsel, Nordics",
            "Paralegal",
        ]
    );

    // The same navigation text is dropped when it only turns up in the fallback scan
    let plain = "Karriärtips för jurister\nBolagsjurist sökes till Stockholm\n";
    let records = extract_on(plain, site.rules(), run_date());
    assert_eq!(titles(&records), vec!["Bolagsjurist sökes till Stockholm"]);
}

#[test]
fn test_empty_content_for_every_site() {
    for site in sites::all().unwrap() {
        assert!(
            extract("", site.rules()).is_empty(),
            "{} produced records from empty content",
            site.key()
        );
    }
}

#[test]
fn test_extract_is_idempotent() {
    let site = sites::wise().unwrap();
    let content = fixture("wise.md");

    let first = extract_on(&content, site.rules(), run_date());
    let second = extract_on(&content, site.rules(), run_date());
    assert_eq!(first, second);
}

#[test]
fn test_cap_keeps_first_found() {
    let site = sites::wise().unwrap();
    let content: String = (1..=45)
        .map(|n| format!("[Lönekonsult nr {n}](https://www.wise.se/jobb/lonekonsult-{n}/)\n"))
        .collect();

    let records = extract_on(&content, site.rules(), run_date());
    assert_eq!(records.len(), 30);
    assert_eq!(records[0].title, "Lönekonsult nr 1");
    assert_eq!(records[29].title, "Lönekonsult nr 30");
}

#[test]
fn test_dedupe_is_case_insensitive() {
    let site = sites::jerrie().unwrap();
    let content = "[Redovisningskonsult](https://jerrie.se/jobb/1)\n\
                   [REDOVISNINGSKONSULT](https://jerrie.se/jobb/2)\n\
                   #### redovisningskonsult | Solna\n";

    let records = extract_on(content, site.rules(), run_date());
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].title, "Redovisningskonsult");
    assert_eq!(records[0].link, "https://jerrie.se/jobb/1");
}

#[test]
fn test_negative_keywords_removed_from_both_stages() {
    let rules = SiteRuleSet::builder("https://sjr.se")
        .linked(LinkedRule::scoped("sjr.se", "/"))
        .positive_keywords(["konsult"])
        .negative_keywords(["cookie"])
        .negative_filter(true, true)
        .build()
        .unwrap();

    let linked = "[Cookie-konsult](https://sjr.se/jobb/1)\n[IT-konsult](https://sjr.se/jobb/2)";
    assert_eq!(
        titles(&extract_on(linked, &rules, run_date())),
        vec!["IT-konsult"]
    );

    let plain = "Cookie-konsult sökes nu\nIT-konsult sökes nu\n";
    assert_eq!(
        titles(&extract_on(plain, &rules, run_date())),
        vec!["IT-konsult sökes nu"]
    );
}

#[test]
fn test_garbage_content_yields_nothing() {
    let site = sites::randstad().unwrap();
    let content = "](((( [[[ ]] ) #### | | |\n\0\u{feff}[x](y)";
    assert!(extract_on(content, site.rules(), run_date()).is_empty());
}

#[cfg(feature = "fuzz")]
mod fuzz {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn test_extract_never_panics(content in ".*") {
            for site in sites::all().unwrap() {
                let _ = extract_on(&content, site.rules(), run_date());
            }
        }

        #[test]
        fn test_cap_law(titles in prop::collection::vec("[A-Za-zåäö]{4,20}", 0..80)) {
            let content: String = titles
                .iter()
                .enumerate()
                .map(|(i, t)| format!("[{t}](https://www.academicwork.se/jobb/{i})\n"))
                .collect();
            for site in sites::all().unwrap() {
                let records = extract_on(&content, site.rules(), run_date());
                if let Some(cap) = site.rules().max_results() {
                    prop_assert!(records.len() <= cap);
                }
            }
        }

        #[test]
        fn test_no_duplicate_titles(content in "(#### [a-c]{4}\n|\\[[a-c]{4}\\]\\(https://jerrie\\.se/j/[0-9]\\)\n){0,40}") {
            let site = sites::jerrie().unwrap();
            let records = extract_on(&content, site.rules(), run_date());
            let mut seen = std::collections::HashSet::new();
            for record in &records {
                prop_assert!(seen.insert(record.title.to_lowercase()));
            }
        }

        #[test]
        fn test_titles_long_enough(content in ".*") {
            for site in sites::all().unwrap() {
                for record in extract_on(&content, site.rules(), run_date()) {
                    prop_assert!(record.title.trim().chars().count() >= 4);
                }
            }
        }
    }
}
