//! Rendering of vault totals.

use anyhow::Result;
use serde::Serialize;
use vaultstat_engine::DrainReport;
use vaultstat_types::{AggregateRecord, OutputFormat, SCHEMA_VERSION};

#[derive(Debug, Clone, Serialize)]
pub(crate) struct ToolInfo {
    pub name: &'static str,
    pub version: &'static str,
}

pub(crate) fn tool_info() -> ToolInfo {
    ToolInfo {
        name: "vaultstat",
        version: env!("CARGO_PKG_VERSION"),
    }
}

/// JSON output of `scan`.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct ScanReceipt<'a> {
    pub schema_version: u32,
    pub tool: ToolInfo,
    pub root: &'a str,
    pub totals: AggregateRecord,
    pub pass: DrainReport,
}

pub(crate) fn render(
    format: OutputFormat,
    root: &str,
    totals: &AggregateRecord,
    pass: &DrainReport,
) -> Result<String> {
    match format {
        OutputFormat::Md => Ok(render_md(totals)),
        OutputFormat::Json => {
            let receipt = ScanReceipt {
                schema_version: SCHEMA_VERSION,
                tool: tool_info(),
                root,
                totals: *totals,
                pass: *pass,
            };
            let mut out = serde_json::to_string(&receipt)?;
            out.push('\n');
            Ok(out)
        }
    }
}

pub(crate) fn render_md(t: &AggregateRecord) -> String {
    let mut s = String::new();
    s.push_str("|Metric|Value|\n");
    s.push_str("|---|---:|\n");
    s.push_str(&format!("|Files|{}|\n", t.files));
    s.push_str(&format!("|Documents|{}|\n", t.documents));
    s.push_str(&format!("|Attachments|{}|\n", t.attachments));
    s.push_str(&format!("|Words|{}|\n", t.word_count));
    s.push_str(&format!("|Links|{}|\n", t.link_count));
    s.push_str(&format!("|Tags|{}|\n", t.tag_count));
    s.push_str(&format!("|Bytes|{}|\n", t.size_bytes));
    s.push_str(&format!("|**Quality**|{:.2}|\n", t.quality));
    s
}

/// One-line summary for `watch`.
pub(crate) fn status_line(t: &AggregateRecord) -> String {
    format!(
        "{} files ({} notes, {} attachments) | {} words | {} links | {} tags | {} | quality {:.2}",
        human_count(t.files),
        human_count(t.documents),
        human_count(t.attachments),
        human_count(t.word_count),
        human_count(t.link_count),
        human_count(t.tag_count),
        human_bytes(t.size_bytes),
        t.quality,
    )
}

/// Decimal units: `999`, `1.2k`, `3.4M`, `5.6G`.
pub(crate) fn human_count(n: u64) -> String {
    const UNITS: [(u64, &str); 3] = [(1_000_000_000, "G"), (1_000_000, "M"), (1_000, "k")];
    for (scale, suffix) in UNITS {
        if n >= scale {
            return format!("{:.1}{suffix}", n as f64 / scale as f64);
        }
    }
    n.to_string()
}

/// Binary units: `512 B`, `1.5 KiB`, `2.0 MiB`.
pub(crate) fn human_bytes(n: u64) -> String {
    const UNITS: [&str; 5] = ["KiB", "MiB", "GiB", "TiB", "PiB"];
    if n < 1024 {
        return format!("{n} B");
    }
    let mut value = n as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{value:.1} {}", UNITS[unit])
}
