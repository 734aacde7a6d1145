use crate::cost::Costs;
use unicode_width::UnicodeWidthStr;

const DATE_HEADER: &str = "Date";
const COST_HEADER: &str = "Cost (USD)";
const TOTAL_LABEL: &str = "Total";

/// Plain-text report of accumulated costs, oldest day first, with a total row.
pub fn format_cost_table(costs: &Costs) -> Vec<String> {
    let mut rows: Vec<(String, String)> = costs
        .iter()
        .map(|(date, cost)| (date.format("%Y-%m-%d").to_string(), format_usd(*cost)))
        .collect();
    // An empty f64 sum is -0.0, which would print as "$-0.000000".
    let total = costs.values().fold(0.0, |acc, cost| acc + cost);
    rows.push((TOTAL_LABEL.to_string(), format_usd(total)));

    let date_width = rows
        .iter()
        .map(|(date, _)| date.width())
        .chain(std::iter::once(DATE_HEADER.width()))
        .max()
        .unwrap_or(0);
    let cost_width = rows
        .iter()
        .map(|(_, cost)| cost.width())
        .chain(std::iter::once(COST_HEADER.width()))
        .max()
        .unwrap_or(0);

    let mut lines = Vec::with_capacity(rows.len() + 3);
    lines.push(format!(
        "{DATE_HEADER:<date_width$}  {COST_HEADER:>cost_width$}"
    ));
    lines.push(format!(
        "{}  {}",
        "-".repeat(date_width),
        "-".repeat(cost_width)
    ));
    let total_row = rows.pop();
    for (date, cost) in &rows {
        lines.push(format!("{date:<date_width$}  {cost:>cost_width$}"));
    }
    if let Some((label, cost)) = total_row {
        lines.push(format!(
            "{}  {}",
            "-".repeat(date_width),
            "-".repeat(cost_width)
        ));
        lines.push(format!("{label:<date_width$}  {cost:>cost_width$}"));
    }
    lines
}

fn format_usd(amount: f64) -> String {
    format!("${amount:.6}")
}
