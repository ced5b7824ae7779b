//! Distfile name helpers

/// Known archive extensions, longest compound forms first
const ARCHIVE_EXTENSIONS: &[&str] = &[
    "tar.gz", "tar.xz", "tar.bz2", "tar.lz", "tar.zst", "tc.gz", "tar.z", "gz", "xz", "zip",
    "tbz2", "bz2", "tbz", "txz", "tar", "tgz", "rar", "7z",
];

/// Returns the archive extension of `filename`, without the leading dot
///
/// Single-token extensions only count after a non-numeric name, so a bare
/// version such as `1.7z` keeps its letter.
pub fn archive_extension(filename: &str) -> Option<&'static str> {
    let lower = filename.to_ascii_lowercase();
    ARCHIVE_EXTENSIONS.iter().copied().find(|ext| {
        lower
            .strip_suffix(ext)
            .and_then(|head| head.strip_suffix('.'))
            .is_some_and(|head| ext.contains('.') || has_name_part(head))
    })
}

fn has_name_part(head: &str) -> bool {
    head.chars()
        .any(|c| !c.is_ascii_digit() && !matches!(c, '.' | '_' | '-'))
}

/// Removes a trailing archive extension, if any
pub fn strip_archive_extension(filename: &str) -> &str {
    match archive_extension(filename) {
        Some(ext) => &filename[..filename.len() - ext.len() - 1],
        None => filename,
    }
}
