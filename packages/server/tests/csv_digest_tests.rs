//! Digest format tests for uploaded CSV readings.

use grow_advisor::domains::analysis::activities::{parse_csv, summarize_csv, NO_DATA_SENTINEL};

mod common;
use common::*;

#[test]
fn digest_lists_headers_and_numbered_readings() {
    let digest = summarize_csv(VEG_CSV);

    assert!(digest.starts_with("Environmental data (3 readings):"));
    assert!(digest.contains("Column headers: timestamp, temperature, humidity, vpd"));
    assert!(digest.contains(
        "Reading 1: timestamp: 2024-01-01 08:00, temperature: 75.2, humidity: 52, vpd: 1.35"
    ));
    assert!(digest.contains("Reading 3: "));
    assert!(!digest.contains("Reading 4: "));
}

#[test]
fn header_only_upload_yields_sentinel() {
    assert_eq!(summarize_csv(HEADER_ONLY_CSV), NO_DATA_SENTINEL);
    assert_eq!(summarize_csv(""), NO_DATA_SENTINEL);
}

#[test]
fn values_are_copied_verbatim() {
    let digest = summarize_csv("temperature,humidity\n075.20,52.0%\n");
    assert!(digest.contains("temperature: 075.20, humidity: 52.0%"));
}

#[test]
fn empty_cells_are_left_out_of_a_reading() {
    let parsed = parse_csv("timestamp,temperature,humidity\n08:00,,55\n");
    assert_eq!(parsed.readings[0].render(), "timestamp: 08:00, humidity: 55");
    assert_eq!(parsed.readings[0].get("temperature"), None);
}

#[test]
fn short_rows_keep_the_fields_they_have() {
    let parsed = parse_csv("a,b,c\n1,2,3\n4\n");
    assert_eq!(parsed.len(), 2);
    assert_eq!(parsed.readings[1].render(), "a: 4");
}

#[test]
fn quoted_commas_stay_inside_their_field() {
    let parsed = parse_csv("note,humidity\n\"fan on, door open\",61\n");
    assert_eq!(parsed.readings[0].get("note"), Some("fan on, door open"));
    assert_eq!(parsed.readings[0].get("humidity"), Some("61"));
}

#[test]
fn leading_byte_order_mark_is_ignored() {
    let parsed = parse_csv("\u{feff}temperature\n72\n");
    assert_eq!(parsed.headers, vec!["temperature".to_string()]);
}

#[test]
fn two_row_upload_reports_count_and_pairs() {
    let digest = summarize_csv("temperature,humidity,ppfd\n78,65,800\n79,63,820\n");

    assert!(digest.contains("Environmental data (2 readings)"));
    assert!(digest.contains("Reading 1: temperature: 78, humidity: 65, ppfd: 800"));
    assert!(digest.contains("Reading 2: temperature: 79, humidity: 63, ppfd: 820"));
    assert_eq!(digest.matches("Reading ").count(), 2);
}
