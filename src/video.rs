//! Video URL normalization
//!
//! Lessons store whatever YouTube link the admin pasted; players want the
//! canonical embed form. Parsing is done by hand instead of pulling in the
//! `regex` crate for a single pattern.

/// Canonical YouTube embed prefix
const EMBED_PREFIX: &str = "https://www.youtube.com/embed/";

/// YouTube video IDs are exactly 11 characters
const VIDEO_ID_LEN: usize = 11;

/// Normalize a YouTube URL to its embed form.
///
/// Handles `watch?v=`, `youtu.be/`, `/embed/`, `/v/` and `/e/` link shapes.
/// URLs that do not contain a recognizable video ID are returned unchanged,
/// and an empty input stays empty.
pub fn youtube_embed_url(url: &str) -> String {
    if url.is_empty() {
        return String::new();
    }

    match extract_video_id(url) {
        Some(id) => format!("{}{}", EMBED_PREFIX, id),
        None => url.to_string(),
    }
}

fn extract_video_id(url: &str) -> Option<&str> {
    // Short links: youtu.be/<id>
    if let Some(rest) = url.split("youtu.be/").nth(1) {
        return take_video_id(rest);
    }

    if !url.contains("youtube.com/") {
        return None;
    }

    // Query form: watch?v=<id> (v may not be the first parameter)
    for sep in ["?v=", "&v="] {
        if let Some(rest) = url.split(sep).nth(1) {
            return take_video_id(rest);
        }
    }

    // Path forms: /embed/<id>, /v/<id>, /e/<id>
    for sep in ["/embed/", "/v/", "/e/"] {
        if let Some(rest) = url.split(sep).nth(1) {
            return take_video_id(rest);
        }
    }

    None
}

/// An ID is a run of URL-safe base64 characters; anything shorter than
/// 11 chars is not one.
fn take_video_id(rest: &str) -> Option<&str> {
    let end = rest
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_' || c == '-'))
        .unwrap_or(rest.len());
    let id = &rest[..end];

    (id.len() >= VIDEO_ID_LEN).then(|| &id[..VIDEO_ID_LEN])
}
