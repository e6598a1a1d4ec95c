//! Shared HTML layout and formatting helpers for the server-rendered pages.

use std::sync::OnceLock;

use maud::{DOCTYPE, Markup, PreEscaped, html};
use numfmt::{Formatter, Precision};

pub const TABLE_HEADER_STYLE: &str = "table-header";
pub const TABLE_ROW_STYLE: &str = "table-row";
pub const TABLE_CELL_STYLE: &str = "table-cell";
pub const ALERT_WARNING_STYLE: &str = "alert alert-warning";
pub const ALERT_ERROR_STYLE: &str = "alert alert-error";

const BASE_STYLES: &str = r#"
    body { font-family: system-ui, sans-serif; margin: 2rem auto; max-width: 48rem; color: #111827; }
    table { border-collapse: collapse; width: 100%; }
    .table-header th { text-align: left; text-transform: uppercase; font-size: 0.75rem; background: #f9fafb; }
    .table-cell { padding: 0.5rem 1rem; }
    .table-row { border-bottom: 1px solid #e5e7eb; }
    .negative { color: #dc2626; }
    .alert { padding: 0.75rem; border-radius: 0.5rem; margin-bottom: 1rem; background: #fee2e2; }
    .alert-warning { border: 1px solid #ef4444; color: #991b1b; }
    .alert-error { border: 2px solid #ef4444; color: #dc2626; }
"#;

/// The page skeleton that every page is rendered into.
pub fn base(title: &str, content: &Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en"
        {
            head
            {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) " - Pocket Budget" }
                style { (PreEscaped(BASE_STYLES)) }
            }

            body
            {
                (content)
            }
        }
    }
}

/// Format `number` as a dollar amount with two decimal places, e.g. "$12.50" or "-$3.00".
pub fn format_currency(number: f64) -> String {
    static FORMATTER: OnceLock<Option<Formatter>> = OnceLock::new();

    let formatter = FORMATTER.get_or_init(|| {
        Formatter::currency("$")
            .ok()
            .map(|formatter| formatter.precision(Precision::Decimals(2)))
    });

    let magnitude = match formatter {
        // Zero is hardcoded as "0", so we must specify the formatted string for zero
        _ if number == 0.0 => "$0.00".to_owned(),
        Some(formatter) => pad_cents(&formatter.fmt_string(number.abs())),
        None => format!("${:.2}", number.abs()),
    };

    if number < 0.0 {
        format!("-{magnitude}")
    } else {
        magnitude
    }
}

/// numfmt omits trailing zeros, e.g. "12.30" is rendered as "12.3" and "12.00" as "12".
fn pad_cents(formatted: &str) -> String {
    match formatted.find('.') {
        None => format!("{formatted}.00"),
        Some(point) => {
            let decimals = formatted.len() - point - 1;
            format!("{formatted}{}", "0".repeat(2usize.saturating_sub(decimals)))
        }
    }
}
