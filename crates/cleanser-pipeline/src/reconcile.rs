//! Join model verdicts back onto the chunk's records

use cleanser_domain::{AnalysisResult, ContactRecord, ReconciledRecord};
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

/// Reconciled rows for one chunk plus match counts
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciliation {
    /// One row per input record, in input order
    pub records: Vec<ReconciledRecord>,

    /// Records that received a model verdict
    pub matched: usize,

    /// Emails of records the model did not mention
    pub omitted: Vec<String>,

    /// Emails of records whose only verdict could not be read
    pub malformed: Vec<String>,

    /// Verdicts whose email matched no record in the chunk
    pub unattributed: usize,
}

impl Reconciliation {
    /// Emails of the records that fell back to defaults
    pub fn defaulted_emails(&self) -> Vec<String> {
        self.records
            .iter()
            .filter(|r| r.is_defaulted())
            .map(|r| r.contact.email.clone())
            .collect()
    }
}

/// Match results to records by exact email
///
/// When the model returns several verdicts for the same email, the last one
/// wins. Records sharing an email each receive that verdict. Results that
/// match nothing are counted and dropped. `malformed` lists emails the model
/// mentioned with an unreadable verdict; such records are defaulted like
/// omitted ones but counted apart.
pub fn reconcile(
    records: &[ContactRecord],
    results: Vec<AnalysisResult>,
    malformed: &[String],
) -> Reconciliation {
    let mut by_email: HashMap<String, AnalysisResult> = HashMap::with_capacity(results.len());
    for result in results {
        if by_email.insert(result.email.clone(), result).is_some() {
            debug!("Duplicate verdict in response; keeping the last one");
        }
    }
    let malformed: HashSet<&str> = malformed.iter().map(String::as_str).collect();

    let mut used: HashMap<&str, bool> = by_email.keys().map(|k| (k.as_str(), false)).collect();
    let mut matched = 0;
    let mut omitted = Vec::new();
    let mut unreadable = Vec::new();

    let rows = records
        .iter()
        .map(|contact| match by_email.get(&contact.email) {
            Some(result) => {
                matched += 1;
                used.insert(result.email.as_str(), true);
                ReconciledRecord::analyzed(contact.clone(), result)
            }
            None => {
                if malformed.contains(contact.email.as_str()) {
                    unreadable.push(contact.email.clone());
                } else {
                    omitted.push(contact.email.clone());
                }
                ReconciledRecord::defaulted(contact.clone())
            }
        })
        .collect();

    let unattributed = used.values().filter(|hit| !**hit).count();
    if unattributed > 0 {
        warn!("{} verdicts did not match any contact in the chunk", unattributed);
    }

    Reconciliation {
        records: rows,
        matched,
        omitted,
        malformed: unreadable,
        unattributed,
    }
}
