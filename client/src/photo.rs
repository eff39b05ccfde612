/// Placeholder shown whenever a candidate has no usable photo.
pub const DEFAULT_PHOTO: &str = "/static/default.jpg";

/// Serving prefix for photos stored by the upload endpoint under a bare
/// filename.
pub const UPLOADS_PREFIX: &str = "/uploads/photos";

/// Resolve a stored `photo_path` to the URL every renderer displays.
///
/// Single point of truth — the fallback logic must not be re-implemented at
/// call sites, or table rows and previews drift apart.
pub fn resolve_photo_path(photo_path: &str) -> String {
    if photo_path.is_empty() {
        DEFAULT_PHOTO.to_string()
    } else if photo_path.starts_with('/') {
        photo_path.to_string()
    } else {
        format!("{UPLOADS_PREFIX}/{photo_path}")
    }
}

#[cfg(test)]
mod tests {
    use super::{DEFAULT_PHOTO, resolve_photo_path};

    #[test]
    fn empty_falls_back_to_placeholder() {
        assert_eq!(resolve_photo_path(""), DEFAULT_PHOTO);
    }

    #[test]
    fn absolute_paths_pass_through() {
        assert_eq!(resolve_photo_path("/x.jpg"), "/x.jpg");
        assert_eq!(
            resolve_photo_path("/uploads/photos/a.jpg"),
            "/uploads/photos/a.jpg"
        );
    }

    #[test]
    fn bare_filenames_get_the_uploads_prefix() {
        assert_eq!(resolve_photo_path("a.jpg"), "/uploads/photos/a.jpg");
    }
}
