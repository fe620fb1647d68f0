//! Extension → MIME type table used when rewriting object metadata.

/// Resolve a MIME type from a file name's extension.
///
/// Matching is case-insensitive and considers only the text after the
/// last dot, so `a.tar.gz` resolves `gz` and names without a dot resolve
/// nothing. `None` means "no mapping" and callers must leave the existing
/// content type untouched.
pub fn resolve(file_name: &str) -> Option<&'static str> {
    let lower = file_name.to_lowercase();
    let (_, ext) = lower.rsplit_once('.')?;
    match ext {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "svg" => Some("image/svg+xml"),
        "bmp" => Some("image/bmp"),
        "pdf" => Some("application/pdf"),
        "mp4" => Some("video/mp4"),
        "mp3" => Some("audio/mpeg"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::resolve;

    #[test]
    fn matches_case_insensitively() {
        assert_eq!(resolve("photo.JPG"), Some("image/jpeg"));
        assert_eq!(resolve("Banner.PnG"), Some("image/png"));
        assert_eq!(resolve("clip.Mp4"), Some("video/mp4"));
    }

    #[test]
    fn resolves_the_whole_table() {
        assert_eq!(resolve("a.jpeg"), Some("image/jpeg"));
        assert_eq!(resolve("a.gif"), Some("image/gif"));
        assert_eq!(resolve("a.webp"), Some("image/webp"));
        assert_eq!(resolve("a.svg"), Some("image/svg+xml"));
        assert_eq!(resolve("a.bmp"), Some("image/bmp"));
        assert_eq!(resolve("a.pdf"), Some("application/pdf"));
        assert_eq!(resolve("a.mp3"), Some("audio/mpeg"));
    }

    #[test]
    fn unknown_or_missing_extension_has_no_mapping() {
        assert_eq!(resolve("file"), None);
        assert_eq!(resolve("archive.zip"), None);
        assert_eq!(resolve(""), None);
    }

    #[test]
    fn only_the_final_extension_counts() {
        assert_eq!(resolve("backup.tar.gz"), None);
        assert_eq!(resolve("render.final.png"), Some("image/png"));
    }

    #[test]
    fn bare_dotfile_still_resolves() {
        assert_eq!(resolve(".jpg"), Some("image/jpeg"));
    }
}
