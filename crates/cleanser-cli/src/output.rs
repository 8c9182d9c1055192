//! Output formatting for the CLI.

use crate::cli::CliFormat;
use crate::error::Result;
use cleanser_pipeline::{OutcomeKind, RunReport};
use cleanser_store::CleanupSummary;
use colored::*;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    format: CliFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: CliFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format a run report.
    pub fn format_report(&self, report: &RunReport) -> Result<String> {
        match self.format {
            CliFormat::Json => self.format_report_json(report),
            CliFormat::Table => Ok(self.format_report_table(report)),
        }
    }

    /// Format a cleanup summary.
    pub fn format_cleanup(&self, summary: &CleanupSummary) -> Result<String> {
        match self.format {
            CliFormat::Json => Ok(serde_json::to_string_pretty(&serde_json::json!({
                "rows_read": summary.rows_read,
                "rows_kept": summary.rows_kept,
                "rows_dropped": summary.rows_dropped(),
            }))?),
            CliFormat::Table => {
                let message = format!(
                    "Kept {} of {} contacts ({} dropped)",
                    summary.rows_kept,
                    summary.rows_read,
                    summary.rows_dropped()
                );
                if summary.rows_kept == 0 {
                    Ok(self.warning(&message))
                } else {
                    Ok(self.success(&message))
                }
            }
        }
    }

    fn format_report_json(&self, report: &RunReport) -> Result<String> {
        let outcomes: Vec<serde_json::Value> = report
            .outcomes
            .iter()
            .map(|o| {
                let (matched, omitted, malformed, detail) = match &o.kind {
                    OutcomeKind::Success {
                        matched,
                        omitted,
                        malformed,
                    } => (*matched, *omitted, *malformed, None),
                    OutcomeKind::InvocationFailure { error } => (0, 0, 0, Some(error.as_str())),
                    OutcomeKind::ParseFailure { reason } => (0, 0, 0, Some(reason.as_str())),
                };
                serde_json::json!({
                    "index": o.index,
                    "records": o.records,
                    "kind": o.kind.label(),
                    "matched": matched,
                    "omitted": omitted,
                    "malformed": malformed,
                    "detail": detail,
                    "defaulted": o.defaulted,
                })
            })
            .collect();

        Ok(serde_json::to_string_pretty(&serde_json::json!({
            "run_id": report.run_id.to_string(),
            "model_name": report.model_name,
            "total_records": report.total_records,
            "total_chunks": report.total_chunks,
            "rows_written": report.rows_written,
            "unattributed_results": report.unattributed_results,
            "elapsed_ms": report.elapsed_ms,
            "records_defaulted_by_chunk_failure": report.records_defaulted_by_chunk_failure(),
            "records_omitted_by_model": report.records_omitted_by_model(),
            "records_with_malformed_verdict": report.records_with_malformed_verdict(),
            "outcomes": outcomes,
        }))?)
    }

    fn format_report_table(&self, report: &RunReport) -> String {
        let failed = report.failed_chunks();
        let headline = format!(
            "Classified {} contacts in {} chunks with {}",
            report.total_records, report.total_chunks, report.model_name
        );

        let mut lines = vec![if failed.is_empty() {
            self.success(&headline)
        } else {
            self.warning(&format!("{} ({} chunks failed)", headline, failed.len()))
        }];

        lines.push(format!(
            "  rows written: {}  analyzed: {}  omitted by model: {}  defaulted by failure: {}",
            report.rows_written,
            report.records_analyzed(),
            report.records_omitted_by_model().len(),
            report.records_defaulted_by_chunk_failure().len()
        ));
        let malformed = report.records_with_malformed_verdict().len();
        if malformed > 0 {
            lines.push(self.info(&format!(
                "{} contacts had unreadable verdicts and were defaulted",
                malformed
            )));
        }
        if report.unattributed_results > 0 {
            lines.push(self.info(&format!(
                "{} verdicts referenced unknown emails",
                report.unattributed_results
            )));
        }

        if !failed.is_empty() {
            let mut builder = Builder::default();
            builder.push_record(["Chunk", "Records", "Outcome", "Detail"]);
            for outcome in failed {
                let detail = match &outcome.kind {
                    OutcomeKind::InvocationFailure { error } => error.clone(),
                    OutcomeKind::ParseFailure { reason } => reason.clone(),
                    OutcomeKind::Success { .. } => String::new(),
                };
                builder.push_record([
                    outcome.index.to_string(),
                    outcome.records.to_string(),
                    outcome.kind.label().to_string(),
                    detail,
                ]);
            }

            let mut table = builder.build();
            table
                .with(Style::rounded())
                .with(Modify::new(Rows::first()).with(Alignment::center()));
            lines.push(table.to_string());
        }

        lines.push(format!("  run id {} ({}ms)", report.run_id, report.elapsed_ms));
        lines.join("\n")
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cleanser_pipeline::ChunkOutcome;
    use uuid::Uuid;

    fn create_test_report(failed: bool) -> RunReport {
        let mut outcomes = vec![ChunkOutcome {
            index: 0,
            records: 3,
            defaulted: vec!["b@x.com".to_string(), "d@x.com".to_string()],
            malformed: vec!["d@x.com".to_string()],
            kind: OutcomeKind::Success {
                matched: 1,
                omitted: 1,
                malformed: 1,
            },
        }];
        if failed {
            outcomes.push(ChunkOutcome {
                index: 1,
                records: 1,
                defaulted: vec!["c@x.com".to_string()],
                malformed: vec![],
                kind: OutcomeKind::InvocationFailure {
                    error: "Communication error: refused".to_string(),
                },
            });
        }

        RunReport {
            run_id: Uuid::now_v7(),
            model_name: "llama3.2".to_string(),
            total_records: if failed { 4 } else { 3 },
            total_chunks: outcomes.len(),
            rows_written: if failed { 4 } else { 3 },
            outcomes,
            unattributed_results: 0,
            elapsed_ms: 5,
        }
    }

    #[test]
    fn test_table_lists_failed_chunks() {
        let formatter = Formatter::new(CliFormat::Table, false);
        let output = formatter.format_report(&create_test_report(true)).unwrap();

        let headline = "⚠ Classified 4 contacts in 2 chunks with llama3.2 (1 chunks failed)";
        assert!(output.contains(headline));
        assert!(output.contains("1 contacts had unreadable verdicts"));
        assert!(output.contains("Outcome"));
        assert!(output.contains("invocation failure"));
        assert!(output.contains("Communication error: refused"));
    }

    #[test]
    fn test_table_without_failures_has_no_table() {
        let formatter = Formatter::new(CliFormat::Table, false);
        let output = formatter.format_report(&create_test_report(false)).unwrap();

        assert!(output.starts_with("✓ Classified 3 contacts"));
        assert!(!output.contains("Outcome"));
    }

    #[test]
    fn test_json_report() {
        let formatter = Formatter::new(CliFormat::Json, false);
        let output = formatter.format_report(&create_test_report(true)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value["total_chunks"], 2);
        assert_eq!(value["records_defaulted_by_chunk_failure"][0], "c@x.com");
        assert_eq!(value["records_omitted_by_model"], serde_json::json!(["b@x.com"]));
        assert_eq!(value["records_with_malformed_verdict"][0], "d@x.com");
        assert_eq!(value["outcomes"][0]["malformed"], 1);
        assert_eq!(value["outcomes"][1]["kind"], "invocation failure");
    }

    #[test]
    fn test_cleanup_summary() {
        let formatter = Formatter::new(CliFormat::Table, false);
        let summary = CleanupSummary {
            rows_read: 3,
            rows_kept: 2,
        };
        assert_eq!(
            formatter.format_cleanup(&summary).unwrap(),
            "✓ Kept 2 of 3 contacts (1 dropped)"
        );
    }

    #[test]
    fn test_colorize_disabled() {
        let formatter = Formatter::new(CliFormat::Table, false);
        assert_eq!(formatter.warning("test"), "⚠ test");
        assert_eq!(formatter.info("test"), "ℹ test");
    }
}
