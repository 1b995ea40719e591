//! Dashboard rendering: two fixed two-column tables, one per metric, with
//! window labels on the left and values on the right.

use renewcast_estimator::{EstimateError, Estimator};
use renewcast_models::Window;

pub const SALES_TITLE: &str = "Upcoming Recurring Sales";
pub const REVENUE_TITLE: &str = "Upcoming Recurring Revenue";

/// Render both dashboard tables as text.
pub async fn render_dashboard(estimator: &Estimator) -> Result<String, EstimateError> {
    let mut sales_rows = Vec::with_capacity(Window::ALL.len());
    let mut revenue_rows = Vec::with_capacity(Window::ALL.len());
    for window in Window::ALL {
        sales_rows.push((window.label(), estimator.sales(window).await?.to_string()));
        revenue_rows.push((window.label(), estimator.revenue(window).await?));
    }

    let mut out = render_table(SALES_TITLE, &sales_rows);
    out.push('\n');
    out.push_str(&render_table(REVENUE_TITLE, &revenue_rows));
    Ok(out)
}

/// Render the 18 estimates as a JSON object keyed by metric and window tag.
pub async fn dashboard_json(estimator: &Estimator) -> Result<serde_json::Value, EstimateError> {
    let mut sales = serde_json::Map::new();
    let mut revenue = serde_json::Map::new();
    for window in Window::ALL {
        sales.insert(
            window.tag().to_string(),
            estimator.sales(window).await?.into(),
        );
        revenue.insert(
            window.tag().to_string(),
            estimator.revenue(window).await?.into(),
        );
    }
    Ok(serde_json::json!({ "sales": sales, "revenue": revenue }))
}

fn render_table(title: &str, rows: &[(&str, String)]) -> String {
    let label_width = rows.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
    let value_width = rows.iter().map(|(_, value)| value.len()).max().unwrap_or(0);
    let rule_width = title.len().max(label_width + value_width + 2);

    let mut out = String::new();
    out.push_str(title);
    out.push('\n');
    out.push_str(&"-".repeat(rule_width));
    out.push('\n');
    for (label, value) in rows {
        out.push_str(&format!("{label:<label_width$}  {value:>value_width$}\n"));
    }
    out
}
