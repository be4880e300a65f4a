//! Single-responsibility key normalization for deterministic matching.

/// Normalize path separators to `/`.
///
/// # Examples
///
/// ```
/// use vaultstat_path::normalize_slashes;
///
/// assert_eq!(normalize_slashes(r"notes\daily\a.md"), "notes/daily/a.md");
/// assert_eq!(normalize_slashes("already/fine"), "already/fine");
/// ```
#[must_use]
pub fn normalize_slashes(path: &str) -> String {
    if path.contains('\\') {
        path.replace('\\', "/")
    } else {
        path.to_string()
    }
}

/// Normalize a root-relative path into a vault key:
/// - converts `\` to `/`
/// - strips one leading `./`
/// - strips any leading `/`
///
/// # Examples
///
/// ```
/// use vaultstat_path::normalize_key;
///
/// assert_eq!(normalize_key("./notes/a.md"), "notes/a.md");
/// assert_eq!(normalize_key(r".\notes\a.md"), "notes/a.md");
/// assert_eq!(normalize_key("/notes/a.md"), "notes/a.md");
/// ```
#[must_use]
pub fn normalize_key(path: &str) -> String {
    let normalized = normalize_slashes(path);
    let rest = normalized.strip_prefix("./").unwrap_or(&normalized);
    rest.trim_start_matches('/').to_string()
}

/// Iterate the non-empty `/`-separated segments of a key.
///
/// Backslashes are treated as separators too, so raw Windows paths split the
/// same way as normalized keys.
///
/// ```
/// use vaultstat_path::segments;
///
/// let parts: Vec<&str> = segments("archive//2023/old.md").collect();
/// assert_eq!(parts, ["archive", "2023", "old.md"]);
/// ```
pub fn segments(key: &str) -> impl Iterator<Item = &str> {
    key.split(['/', '\\']).filter(|seg| !seg.is_empty())
}

/// The file name of a key (its last segment).
#[must_use]
pub fn file_name(key: &str) -> Option<&str> {
    segments(key).last()
}

/// The extension of a key's file name, without the dot and case preserved.
///
/// Dotfiles (`.obsidian`) and names ending in a dot have no extension.
///
/// ```
/// use vaultstat_path::extension;
///
/// assert_eq!(extension("notes/a.md"), Some("md"));
/// assert_eq!(extension("img/photo.tar.GZ"), Some("GZ"));
/// assert_eq!(extension(".gitignore"), None);
/// assert_eq!(extension("README"), None);
/// ```
#[must_use]
pub fn extension(key: &str) -> Option<&str> {
    let name = file_name(key)?;
    let (stem, ext) = name.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        None
    } else {
        Some(ext)
    }
}
