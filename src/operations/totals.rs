use crate::ledger::Ledger;

/// Formats the per-category totals and the overall total as terminal lines.
/// Every fixed category is listed even when its total is zero.
pub fn totals_lines(ledger: &Ledger) -> Vec<String> {
    let mut lines = Vec::new();
    for (category, total) in ledger.totals_by_category() {
        lines.push(format!(
            "{:<10} ${:>12}",
            category.as_str(),
            format!("{:.2}", total)
        ));
    }
    lines.push(format!(
        "{:<10} ${:>12}",
        "Overall",
        format!("{:.2}", ledger.overall_total())
    ));
    lines
}
