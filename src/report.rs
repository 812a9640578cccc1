use std::fmt;

use serde::Serialize;

use crate::symbols::SymbolScan;

/// One line of the footprint report. `origin` is the object file the symbol
/// was first seen in, `"?"` when the symbol has a size but no recorded origin.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FootprintRow {
    pub name: String,
    pub size: u64,
    pub origin: String,
}

/// The two empty outcomes are distinct: no tags in any artifact usually
/// means the audit markers were compiled out, while tags without resolvable
/// sizes point at a naming mismatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportError {
    NoTrackedSymbols,
    NoResolvableSizes,
}

impl fmt::Display for ReportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportError::NoTrackedSymbols => write!(f, "No UI_RAM_AUDIT entries found"),
            ReportError::NoResolvableSizes => {
                write!(f, "UI_RAM_AUDIT entries found but none resolved to a symbol size")
            }
        }
    }
}

impl std::error::Error for ReportError {}

/// Assemble the ranked footprint report: largest symbol first, name order on
/// ties. Tracked names that never resolved to a sized symbol are dropped.
pub fn footprint_report(scan: &SymbolScan) -> Result<Vec<FootprintRow>, ReportError> {
    if scan.tracked.is_empty() {
        return Err(ReportError::NoTrackedSymbols);
    }

    let mut rows: Vec<FootprintRow> = scan
        .tracked
        .iter()
        .filter_map(|name| {
            let size = *scan.sizes.get(name)?;
            let origin = scan
                .origins
                .get(name)
                .cloned()
                .unwrap_or_else(|| "?".to_string());
            Some(FootprintRow {
                name: name.clone(),
                size,
                origin,
            })
        })
        .collect();

    if rows.is_empty() {
        return Err(ReportError::NoResolvableSizes);
    }

    rows.sort_by(|a, b| b.size.cmp(&a.size).then_with(|| a.name.cmp(&b.name)));
    Ok(rows)
}

/// Render the report as the Markdown table the build logs expect.
pub fn render_markdown(rows: &[FootprintRow]) -> String {
    let mut out = vec![
        "| Symbole | Taille (octets) | Fichier |".to_string(),
        "| --- | ---: | --- |".to_string(),
    ];
    for row in rows {
        out.push(format!("| {} | {} | {} |", row.name, row.size, row.origin));
    }
    out.join("\n")
}
