use url::Url;

/// Shown whenever an author's avatar is missing or not a usable image URL.
pub const FALLBACK_AVATAR: &str = "https://images-na.ssl-images-amazon.com/images/I/81-yKbVND-L.png";

const IMAGE_EXTENSIONS: &[&str] = &[".jpeg", ".jpg", ".gif", ".png", ".webp", ".svg", ".bmp"];

/// Returns `avatar` if it is an http(s) URL ending in a known image
/// extension (case-insensitive), the fallback avatar otherwise.
pub fn sanitize_avatar(avatar: &str) -> &str {
    if is_image_url(avatar) {
        avatar
    } else {
        FALLBACK_AVATAR
    }
}

fn is_image_url(avatar: &str) -> bool {
    let lower = avatar.to_ascii_lowercase();
    if !(lower.starts_with("http://") || lower.starts_with("https://")) {
        return false;
    }
    if !IMAGE_EXTENSIONS.iter().any(|ext| lower.ends_with(ext)) {
        return false;
    }
    Url::parse(avatar).is_ok()
}
