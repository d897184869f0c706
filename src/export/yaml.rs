//! YAML report export
//!
//! Same structure as the JSON report, with a short comment header for people
//! opening the file by hand.

use std::io::Write;

use super::json::ResultsReport;
use crate::error::{SplitError, SplitResult};

/// Write a report as YAML
pub fn export_report_yaml<W: Write>(report: &ResultsReport, writer: &mut W) -> SplitResult<()> {
    let export_err = |e: std::io::Error| SplitError::Export(e.to_string());

    writeln!(writer, "# expense-split results report").map_err(export_err)?;
    writeln!(writer, "# Generated: {}", report.generated_at).map_err(export_err)?;
    writeln!(writer, "# App Version: {}", report.app_version).map_err(export_err)?;
    writeln!(writer).map_err(export_err)?;

    serde_yaml::to_writer(writer, report).map_err(|e| SplitError::Export(e.to_string()))?;
    Ok(())
}

/// Read a YAML report back
pub fn import_report_yaml(yaml_str: &str) -> SplitResult<ResultsReport> {
    serde_yaml::from_str(yaml_str).map_err(|e| SplitError::Import(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::models::{Transaction, Yen};

    #[test]
    fn test_yaml_export() {
        let txns = vec![Transaction::new("1", "1200", "Bank A", "Food")];
        let report = ResultsReport::build("stdin", &txns, &Settings::default());

        let mut output = Vec::new();
        export_report_yaml(&report, &mut output).unwrap();
        let text = String::from_utf8(output).unwrap();

        assert!(text.starts_with("# expense-split results report"));
        assert!(text.contains("partner_name: Partner"));

        let parsed = import_report_yaml(&text).unwrap();
        assert_eq!(parsed.results.need, Yen::new(600));
    }
}
