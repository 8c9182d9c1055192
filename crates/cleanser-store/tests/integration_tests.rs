//! Integration tests for cleanser-store
//!
//! These tests drive a load, incremental write and cleanup cycle through files.

use cleanser_domain::{AnalysisResult, ReconciledRecord};
use cleanser_store::{
    analyzed_header, extract_real_contacts, load_contacts, IncrementalWriter, StoreError,
};
use std::fs;
use tempfile::tempdir;

#[test]
fn test_load_write_clean_cycle() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("contacts.csv");
    let analyzed = dir.path().join("out").join("analyzed.csv");
    let cleaned = dir.path().join("out").join("cleaned.csv");

    fs::write(
        &input,
        "\u{feff}email,name,organization,phone\n\
         demo@demo.com,Demo,Demo Inc,555\n\
         \"carol@globex.com\",\"Carol, PhD\",Globex,556\n\
         dan@hooli.com,Dan,Hooli,557\n",
    )
    .unwrap();

    let contacts = load_contacts(&input).unwrap();
    assert_eq!(contacts.len(), 3);
    assert_eq!(contacts[1].name, "Carol, PhD");
    assert_eq!(contacts[0].email, "demo@demo.com");

    let mut writer = IncrementalWriter::new(&analyzed);

    let verdict = AnalysisResult::new("demo@demo.com", false)
        .with_confidence(0.99)
        .with_reason("Demo account");
    writer
        .append(&[ReconciledRecord::analyzed(contacts[0].clone(), &verdict)])
        .unwrap();
    writer
        .append(&[
            ReconciledRecord::defaulted(contacts[1].clone()),
            ReconciledRecord::defaulted(contacts[2].clone()),
        ])
        .unwrap();
    assert_eq!(writer.rows_written(), 3);

    let summary = extract_real_contacts(&analyzed, &cleaned).unwrap();
    assert_eq!(summary.rows_read, 3);
    assert_eq!(summary.rows_kept, 2);

    let reloaded = load_contacts(&cleaned).unwrap();
    assert_eq!(reloaded, contacts[1..].to_vec());
}

#[test]
fn test_analyzed_file_is_loadable_as_input() {
    let dir = tempdir().unwrap();
    let analyzed = dir.path().join("analyzed.csv");

    let mut writer = IncrementalWriter::new(&analyzed);
    writer
        .append(&[ReconciledRecord::defaulted(cleanser_domain::ContactRecord::new(
            "Eve", "Evil", "eve@evil.com",
        ))])
        .unwrap();

    let contents = fs::read_to_string(&analyzed).unwrap();
    assert!(contents.starts_with(&analyzed_header().join(",")));

    let contacts = load_contacts(&analyzed).unwrap();
    assert_eq!(contacts.len(), 1);
    assert_eq!(contacts[0].email, "eve@evil.com");
}

#[test]
fn test_input_missing_email_column() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("contacts.csv");
    fs::write(&input, "name,organization\nA,B\n").unwrap();

    match load_contacts(&input) {
        Err(StoreError::MissingColumn { column, .. }) => assert_eq!(column, "email"),
        other => panic!("expected MissingColumn, got {:?}", other),
    }
}
