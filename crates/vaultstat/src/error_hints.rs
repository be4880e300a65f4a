use anyhow::Error;

pub(crate) fn format(err: &Error) -> String {
    let mut out = format!("Error: {err:#}");
    let hints = suggestions(err);
    if !hints.is_empty() {
        out.push_str("\n\nHints:\n");
        for hint in hints {
            out.push_str("- ");
            out.push_str(hint);
            out.push('\n');
        }
    }
    out
}

fn suggestions(err: &Error) -> Vec<&'static str> {
    let haystack = err
        .chain()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join(" | ")
        .to_ascii_lowercase();
    let mut out = Vec::new();

    if haystack.contains("vault root") && haystack.contains("not found") {
        out.push("Verify the vault path exists and is readable.");
    }
    if haystack.contains("not a directory") {
        out.push("Pass the vault folder, not a single note.");
    }
    if haystack.contains("invalid settings") {
        out.push("Check vaultstat.toml: keys are exclude, drain_interval_ms, deletion and format.");
    }
    if haystack.contains("drain_interval_ms") {
        out.push("Use a drain interval of at least 1 millisecond.");
    }
    out
}
