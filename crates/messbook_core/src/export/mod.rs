//! Report export pipeline.
//!
//! # Responsibility
//! - Stage 1: render the current settlement into a fixed page of text lines.
//! - Stage 2: encode that page into a downloadable document and write it as
//!   `mess-report-<YYYY-MM-DD>.<ext>`.
//!
//! # Invariants
//! - Export reads the report it is handed; callers pass a freshly computed one.
//! - Failure in either stage is returned to the caller and never touches
//!   ledger state.

use crate::model::theme::Theme;
use crate::service::settlement::{format_balance, format_money, SettlementReport};
use chrono::NaiveDate;
use log::{error, info};
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub type ExportResult<T> = Result<T, ExportError>;

const REPORT_TITLE: &str = "Monthly Report";
const FILE_PREFIX: &str = "mess-report";

/// Export failure, tagged with the stage that failed.
#[derive(Debug)]
pub enum ExportError {
    Encode(serde_json::Error),
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl Display for ExportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Encode(err) => write!(f, "failed to encode report document: {err}"),
            Self::Write { path, source } => {
                write!(f, "failed to write report `{}`: {source}", path.display())
            }
        }
    }
}

impl Error for ExportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Encode(err) => Some(err),
            Self::Write { source, .. } => Some(source),
        }
    }
}

/// Document encoding for an exported report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExportFormat {
    #[default]
    Text,
    Json,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Text => "txt",
            Self::Json => "json",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "txt" | "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!("unsupported export format `{other}`; expected txt|json")),
        }
    }
}

/// Stage 1 output: the report view flattened into a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedReport {
    pub title: String,
    pub date: NaiveDate,
    pub theme: Theme,
    pub background: &'static str,
    pub lines: Vec<String>,
}

/// Result of a completed export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportExport {
    pub path: PathBuf,
    pub bytes: usize,
}

/// Renders summary tiles and the settlement table.
pub fn render_report(report: &SettlementReport, theme: Theme, date: NaiveDate) -> RenderedReport {
    let mut lines = vec![REPORT_TITLE.to_string(), String::new()];

    let tiles = [
        ("Total Expenses", format_money(report.total_monthly_expenses)),
        ("Grocery", format_money(report.total_grocery_spending)),
        ("Other Costs", format_money(report.total_other_expenses)),
        ("Cost Per Meal", format_money(report.cost_per_meal)),
    ];
    let label_width = tiles.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
    for (label, value) in &tiles {
        lines.push(format!("{label:<label_width$}  {value}"));
    }
    lines.push(String::new());

    let header = ["Name", "Spent", "Meals", "Meal Cost", "Balance"];
    let rows: Vec<[String; 5]> = report
        .member_balances
        .iter()
        .map(|row| {
            [
                row.name.clone(),
                format_money(row.spending),
                row.meals.to_string(),
                format_money(row.meal_cost),
                format_balance(row.balance),
            ]
        })
        .collect();
    lines.extend(render_table(&header, &rows));

    RenderedReport {
        title: REPORT_TITLE.to_string(),
        date,
        theme,
        background: theme.background(),
        lines,
    }
}

/// Stage 2: encodes a rendered page into document bytes.
pub fn encode_document(rendered: &RenderedReport, format: ExportFormat) -> ExportResult<Vec<u8>> {
    match format {
        ExportFormat::Text => {
            let mut text = rendered.lines.join("\n");
            text.push('\n');
            Ok(text.into_bytes())
        }
        ExportFormat::Json => serde_json::to_vec_pretty(rendered).map_err(ExportError::Encode),
    }
}

/// File name for a report produced on `date`.
pub fn report_file_name(date: NaiveDate, format: ExportFormat) -> String {
    format!(
        "{FILE_PREFIX}-{}.{}",
        date.format("%Y-%m-%d"),
        format.extension()
    )
}

/// Runs both stages and writes the document into `out_dir`.
///
/// An existing file with the same name is overwritten.
pub fn export_report(
    report: &SettlementReport,
    theme: Theme,
    date: NaiveDate,
    format: ExportFormat,
    out_dir: &Path,
) -> ExportResult<ReportExport> {
    let rendered = render_report(report, theme, date);
    let bytes = encode_document(&rendered, format).inspect_err(|err| {
        error!("event=report_export module=export status=error stage=encode error={err}");
    })?;

    let path = out_dir.join(report_file_name(date, format));
    std::fs::write(&path, &bytes).map_err(|source| {
        error!(
            "event=report_export module=export status=error stage=write error={source}"
        );
        ExportError::Write {
            path: path.clone(),
            source,
        }
    })?;

    info!(
        "event=report_export module=export status=ok format={} bytes={}",
        format.extension(),
        bytes.len()
    );
    Ok(ReportExport {
        path,
        bytes: bytes.len(),
    })
}

fn render_table<const N: usize>(header: &[&str; N], rows: &[[String; N]]) -> Vec<String> {
    let mut widths = header.map(|title| title.chars().count());
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let format_row = |cells: Vec<&str>| {
        cells
            .iter()
            .zip(widths.iter())
            .map(|(cell, &width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(format_row(header.to_vec()));
    lines.push(
        widths
            .iter()
            .map(|width| "-".repeat(*width))
            .collect::<Vec<_>>()
            .join("  "),
    );
    for row in rows {
        lines.push(format_row(row.iter().map(String::as_str).collect()));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::{encode_document, render_report, report_file_name, ExportFormat};
    use crate::model::expense::OtherExpense;
    use crate::model::member::Member;
    use crate::model::theme::Theme;
    use crate::service::settlement::calculate_settlement;
    use chrono::NaiveDate;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    #[test]
    fn file_name_follows_date_pattern() {
        assert_eq!(
            report_file_name(date(), ExportFormat::Text),
            "mess-report-2026-10-19.txt"
        );
        assert_eq!(
            report_file_name(date(), ExportFormat::Json),
            "mess-report-2026-10-19.json"
        );
    }

    #[test]
    fn rendered_page_lists_tiles_and_balances() {
        let members = vec![
            Member::with_id("1", "Alice", 100.0, 1),
            Member::with_id("2", "Bob", 0.0, 1),
        ];
        let expenses = vec![OtherExpense::with_id("gas", "Gas", 0.0)];
        let report = calculate_settlement(&members, &expenses);
        let rendered = render_report(&report, Theme::Dark, date());

        assert_eq!(rendered.lines[0], "Monthly Report");
        assert_eq!(rendered.background, "#1f2937");
        let has_line = |prefix: &str, suffix: &str| {
            rendered
                .lines
                .iter()
                .any(|line| line.starts_with(prefix) && line.ends_with(suffix))
        };
        assert!(has_line("Cost Per Meal", "৳50.00"));
        assert!(has_line("Alice", "Receives ৳50.00"));
        assert!(has_line("Bob", "Owes ৳50.00"));
    }

    #[test]
    fn json_document_carries_metadata() {
        let report = calculate_settlement(&[], &[]);
        let rendered = render_report(&report, Theme::Light, date());
        let bytes = encode_document(&rendered, ExportFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(value["date"], "2026-10-19");
        assert_eq!(value["theme"], "light");
        assert_eq!(value["background"], "#ffffff");
        assert!(value["lines"].as_array().is_some_and(|lines| !lines.is_empty()));
    }
}
