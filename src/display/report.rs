//! Results panel for terminal output
//!
//! Renders a `CalculationResults` the way the popup does: four labelled
//! amounts, plus an optional breakdown of how the payment was derived.

use crate::models::CalculationResults;
use crate::services::RowStatus;

const PANEL_WIDTH: usize = 44;
const LABEL_WIDTH: usize = 28;

/// Format a separator line
pub fn separator(width: usize) -> String {
    "─".repeat(width)
}

/// Truncate a string to a maximum number of characters with ellipsis
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        ".".repeat(max_len)
    } else {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{}...", head)
    }
}

/// Right-align text in a field of given width
pub fn right_align(s: &str, width: usize) -> String {
    format!("{:>width$}", s, width = width)
}

fn panel_line(label: &str, value: &str) -> String {
    format!(
        "{:<label_width$}{}\n",
        label,
        right_align(value, PANEL_WIDTH - LABEL_WIDTH),
        label_width = LABEL_WIDTH
    )
}

/// Format the four headline amounts
pub fn format_results(results: &CalculationResults, partner_name: &str) -> String {
    let mut output = String::new();

    output.push_str("Expense Split\n");
    output.push_str(&separator(PANEL_WIDTH));
    output.push('\n');
    output.push_str(&panel_line("Total expenses", &results.sum.to_string()));
    output.push_str(&panel_line(
        &format!("{} payment", partner_name),
        &results.need.to_string(),
    ));
    output.push_str(&panel_line(
        &format!("{} paid", partner_name),
        &results.partner.to_string(),
    ));
    output.push_str(&separator(PANEL_WIDTH));
    output.push('\n');
    output.push_str(&panel_line(
        &format!("{} shortfall", partner_name),
        &results.lack.to_string(),
    ));

    if results.partner_overpaid() {
        output.push_str(&format!(
            "\n{} paid {} more than their share.\n",
            partner_name,
            results.lack.abs()
        ));
    }

    output
}

/// Format how `need` was derived
pub fn format_breakdown(
    results: &CalculationResults,
    split_rate: f64,
    statuses: &[RowStatus],
) -> String {
    let in_scope = statuses.iter().filter(|s| s.is_in_scope()).count();
    let special = statuses.iter().filter(|s| s.is_special()).count();

    let mut output = String::new();
    output.push('\n');
    output.push_str("Breakdown\n");
    output.push_str(&separator(PANEL_WIDTH));
    output.push('\n');
    output.push_str(&panel_line(
        "Ordinary expenses",
        &results.ordinary_total().to_string(),
    ));
    output.push_str(&panel_line(
        "Special expenses",
        &results.special_total.to_string(),
    ));
    output.push_str(&panel_line(
        "Special offer",
        &format!("{:.2}", results.special_offer),
    ));
    output.push_str(&panel_line("Split rate", &format!("{}", split_rate)));
    output.push_str(&panel_line(
        "Rows in scope",
        &format!("{} of {}", in_scope, statuses.len()),
    ));
    output.push_str(&panel_line("Special rows", &special.to_string()));

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Yen;

    fn results() -> CalculationResults {
        CalculationResults {
            sum: Yen::new(4000),
            special_total: Yen::new(3000),
            special_offer: 1200.0,
            need: Yen::new(1700),
            partner: Yen::new(3000),
            lack: Yen::new(-1300),
        }
    }

    #[test]
    fn test_format_results() {
        let text = format_results(&results(), "Hanako");

        assert!(text.contains("Total expenses"));
        assert!(text.contains("¥4,000"));
        assert!(text.contains("Hanako payment"));
        assert!(text.contains("¥1,700"));
        assert!(text.contains("Hanako paid"));
        assert!(text.contains("Hanako shortfall"));
        assert!(text.contains("-¥1,300"));
        assert!(text.contains("paid ¥1,300 more"));
    }

    #[test]
    fn test_no_overpaid_note_when_owing() {
        let mut r = results();
        r.lack = Yen::new(500);
        assert!(!format_results(&r, "Partner").contains("more than their share"));
    }

    #[test]
    fn test_format_breakdown() {
        let statuses = vec![
            RowStatus::NotTarget,
            RowStatus::InScope {
                amount: Yen::new(1000),
                special_percentage: None,
                partner_paid: false,
            },
            RowStatus::InScope {
                amount: Yen::new(3000),
                special_percentage: Some(40),
                partner_paid: true,
            },
        ];
        let text = format_breakdown(&results(), 0.5, &statuses);

        assert!(text.contains("¥1,000"));
        assert!(text.contains("1200.00"));
        assert!(text.contains("2 of 3"));
        assert!(text.contains("0.5"));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Hello World", 5), "He...");
        assert_eq!(truncate("Hi", 5), "Hi");
        assert_eq!(truncate("スーパーマーケット", 6), "スーパ...");
    }

    #[test]
    fn test_right_align() {
        assert_eq!(right_align("abc", 5), "  abc");
        assert_eq!(right_align("abcdef", 3), "abcdef");
    }
}
