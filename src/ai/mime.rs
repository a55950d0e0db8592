/// MIME type for an uploaded photo, inferred from its filename extension.
///
/// Unknown or missing extensions fall back to `image/jpeg`.
pub fn mime_for_filename(filename: &str) -> &'static str {
    let extension = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase());

    match extension.as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "image/jpeg",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_extensions() {
        assert_eq!(mime_for_filename("selfie.jpg"), "image/jpeg");
        assert_eq!(mime_for_filename("selfie.jpeg"), "image/jpeg");
        assert_eq!(mime_for_filename("photo.png"), "image/png");
        assert_eq!(mime_for_filename("loop.gif"), "image/gif");
        assert_eq!(mime_for_filename("modern.webp"), "image/webp");
    }

    #[test]
    fn test_extension_is_case_insensitive() {
        assert_eq!(mime_for_filename("photo.PNG"), "image/png");
        assert_eq!(mime_for_filename("selfie.JPeG"), "image/jpeg");
    }

    #[test]
    fn test_unknown_extension_falls_back_to_jpeg() {
        assert_eq!(mime_for_filename("photo.unknownext"), "image/jpeg");
    }

    #[test]
    fn test_missing_extension_falls_back_to_jpeg() {
        assert_eq!(mime_for_filename("photo"), "image/jpeg");
        assert_eq!(mime_for_filename(""), "image/jpeg");
    }
}
