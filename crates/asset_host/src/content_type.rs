//! File-extension helpers for content-type detection.

/// Content type used when no better guess exists (also used for folder markers).
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Returns the lowercase extension of `name`, without the dot.
///
/// Dotfiles such as `.keep` have no extension.
pub fn extension_of(name: &str) -> Option<String> {
    let (stem, ext) = name.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

/// Guesses a MIME type from a file name's extension.
pub fn content_type_for(name: &str) -> &'static str {
    match extension_of(name).as_deref() {
        Some("webp") => "image/webp",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("avif") => "image/avif",
        Some("svg") => "image/svg+xml",
        Some("mp4" | "m4v") => "video/mp4",
        Some("webm") => "video/webm",
        Some("ogg" | "ogv") => "video/ogg",
        Some("mov") => "video/quicktime",
        Some("pdf") => "application/pdf",
        _ => OCTET_STREAM,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_is_lowercased_and_dotfiles_have_none() {
        assert_eq!(extension_of("Photo.JPG").as_deref(), Some("jpg"));
        assert_eq!(extension_of("clip.final.MP4").as_deref(), Some("mp4"));
        assert_eq!(extension_of(".keep"), None);
        assert_eq!(extension_of("README"), None);
        assert_eq!(extension_of("trailing."), None);
    }

    #[test]
    fn content_type_matches_common_media() {
        let cases = [
            ("a.webp", "image/webp"),
            ("a.JPEG", "image/jpeg"),
            ("a.mov", "video/quicktime"),
            ("a.webm", "video/webm"),
            (".keep", OCTET_STREAM),
            ("notes.txt", OCTET_STREAM),
        ];
        for (name, expected) in cases {
            assert_eq!(content_type_for(name), expected, "name={name:?}");
        }
    }
}
