//! Model verdicts and reconciled output rows

use crate::contact::ContactRecord;

/// Column names appended to the contact columns in the analyzed output
pub const ANALYSIS_FIELDS: [&str; 3] = ["is_real", "confidence_score", "reason"];

/// Confidence used whenever the model did not supply one
pub const DEFAULT_CONFIDENCE: f64 = 0.5;

/// Reason used when the model matched a record but gave no explanation
pub const NO_ISSUES_REASON: &str = "no issues found";

/// Reason used when the model produced no verdict for a record
pub const NO_ANALYSIS_REASON: &str = "no analysis available";

/// The model's verdict for one email
///
/// Produced by the response parser for a subset of a chunk. Optional fields
/// are the ones the model is allowed to omit; defaults are applied during
/// reconciliation, not here.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisResult {
    /// Email the verdict refers to
    pub email: String,

    /// Whether the model judged the contact genuine
    pub is_real: bool,

    /// Model confidence in [0.0, 1.0], if given
    pub confidence_score: Option<f64>,

    /// Free-text explanation, if given
    pub reason: Option<String>,
}

impl AnalysisResult {
    /// Create a verdict with no optional fields
    pub fn new(email: impl Into<String>, is_real: bool) -> Self {
        Self {
            email: email.into(),
            is_real,
            confidence_score: None,
            reason: None,
        }
    }

    /// Attach a confidence score
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence_score = Some(confidence);
        self
    }

    /// Attach a reason
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }
}

/// Where a reconciled verdict came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Classification {
    /// The model returned a verdict for this email
    Analyzed,
    /// No verdict matched; the "assumed genuine" defaults were applied
    Defaulted,
}

/// A contact joined with its (possibly defaulted) verdict
///
/// Every field is always populated, so a record can never disappear from
/// the output just because the model skipped it.
#[derive(Debug, Clone, PartialEq)]
pub struct ReconciledRecord {
    /// The original contact
    pub contact: ContactRecord,

    /// Final genuineness flag
    pub is_real: bool,

    /// Final confidence
    pub confidence_score: f64,

    /// Final reason
    pub reason: String,

    /// Whether the verdict was analyzed or defaulted
    pub classification: Classification,
}

impl ReconciledRecord {
    /// Join a contact with a matching verdict, filling optional fields
    ///
    /// # Examples
    ///
    /// ```
    /// use cleanser_domain::{AnalysisResult, ContactRecord, ReconciledRecord, NO_ISSUES_REASON};
    ///
    /// let contact = ContactRecord::new("A", "X", "a@x.com");
    /// let verdict = AnalysisResult::new("a@x.com", true).with_reason("");
    /// let row = ReconciledRecord::analyzed(contact, &verdict);
    /// assert_eq!(row.reason, NO_ISSUES_REASON);
    /// assert_eq!(row.confidence_score, 0.5);
    /// ```
    pub fn analyzed(contact: ContactRecord, result: &AnalysisResult) -> Self {
        let reason = match result.reason.as_deref() {
            Some(reason) if !reason.trim().is_empty() => reason.to_string(),
            _ => NO_ISSUES_REASON.to_string(),
        };

        Self {
            contact,
            is_real: result.is_real,
            confidence_score: result.confidence_score.unwrap_or(DEFAULT_CONFIDENCE),
            reason,
            classification: Classification::Analyzed,
        }
    }

    /// Apply the full "assumed genuine" defaults to a contact
    pub fn defaulted(contact: ContactRecord) -> Self {
        Self {
            contact,
            is_real: true,
            confidence_score: DEFAULT_CONFIDENCE,
            reason: NO_ANALYSIS_REASON.to_string(),
            classification: Classification::Defaulted,
        }
    }

    /// Whether the defaults were applied
    pub fn is_defaulted(&self) -> bool {
        self.classification == Classification::Defaulted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contact() -> ContactRecord {
        ContactRecord::new("Alice", "Acme", "alice@acme.com")
    }

    #[test]
    fn test_analyzed_keeps_model_fields() {
        let verdict = AnalysisResult::new("alice@acme.com", false)
            .with_confidence(0.9)
            .with_reason("Placeholder name");

        let row = ReconciledRecord::analyzed(contact(), &verdict);
        assert!(!row.is_real);
        assert_eq!(row.confidence_score, 0.9);
        assert_eq!(row.reason, "Placeholder name");
        assert_eq!(row.classification, Classification::Analyzed);
    }

    #[test]
    fn test_analyzed_fills_missing_fields() {
        let verdict = AnalysisResult::new("alice@acme.com", true);

        let row = ReconciledRecord::analyzed(contact(), &verdict);
        assert_eq!(row.confidence_score, DEFAULT_CONFIDENCE);
        assert_eq!(row.reason, NO_ISSUES_REASON);
        assert!(!row.is_defaulted());
    }

    #[test]
    fn test_whitespace_reason_counts_as_empty() {
        let verdict = AnalysisResult::new("alice@acme.com", true).with_reason("   ");
        let row = ReconciledRecord::analyzed(contact(), &verdict);
        assert_eq!(row.reason, NO_ISSUES_REASON);
    }

    #[test]
    fn test_defaulted_assumes_genuine() {
        let row = ReconciledRecord::defaulted(contact());
        assert!(row.is_real);
        assert_eq!(row.confidence_score, DEFAULT_CONFIDENCE);
        assert_eq!(row.reason, NO_ANALYSIS_REASON);
        assert!(row.is_defaulted());
    }
}
