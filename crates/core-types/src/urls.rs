//! URL helpers for recognizing and constructing video-page locations.

use url::Url;

/// Extracts the video id from a watch URL.
///
/// Understands both `youtube.com/watch?v=<id>` and short `youtu.be/<id>`
/// forms; returns `None` for anything else (search results, channel pages,
/// unparseable strings).
pub fn video_id_from_url(raw: &str) -> Option<String> {
    let parsed = Url::parse(raw).ok()?;
    let host = parsed.host_str()?;

    if host.contains("youtube") {
        if let Some((_, id)) = parsed.query_pairs().find(|(key, _)| key == "v") {
            if !id.is_empty() {
                return Some(id.into_owned());
            }
        }
        return None;
    }

    if host == "youtu.be" {
        let id = parsed.path_segments()?.find(|segment| !segment.is_empty())?;
        return Some(id.to_string());
    }

    None
}

/// Whether a location looks like a loaded video page.
///
/// Matches the readiness condition used by the executor's video-ready poll.
pub fn is_video_page_url(raw: &str) -> bool {
    raw.contains("/watch?v=") || raw.contains("youtu.be/")
}

/// Canonical watch URL for a video id.
pub fn watch_url(video_id: &str) -> String {
    format!("https://www.youtube.com/watch?v={video_id}")
}

/// Search-results URL for a query, with proper percent-encoding.
pub fn search_results_url(query: &str) -> String {
    let mut url = Url::parse("https://www.youtube.com/results").expect("static base url");
    url.query_pairs_mut().append_pair("search_query", query);
    url.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_id_from_watch_url() {
        assert_eq!(
            video_id_from_url("https://www.youtube.com/watch?v=kJQP7kiw5Fk"),
            Some("kJQP7kiw5Fk".to_string())
        );
        assert_eq!(
            video_id_from_url("https://www.youtube.com/watch?v=abc123&t=10s"),
            Some("abc123".to_string())
        );
    }

    #[test]
    fn extracts_id_from_short_url() {
        assert_eq!(
            video_id_from_url("https://youtu.be/kJQP7kiw5Fk"),
            Some("kJQP7kiw5Fk".to_string())
        );
    }

    #[test]
    fn rejects_non_video_urls() {
        assert_eq!(
            video_id_from_url("https://www.youtube.com/results?search_query=rust"),
            None
        );
        assert_eq!(video_id_from_url("https://example.com/watch?v=x"), None);
        assert_eq!(video_id_from_url("not a url"), None);
    }

    #[test]
    fn video_page_detection() {
        assert!(is_video_page_url("https://www.youtube.com/watch?v=abc"));
        assert!(is_video_page_url("https://youtu.be/abc"));
        assert!(!is_video_page_url("https://www.youtube.com/results?search_query=abc"));
        assert!(!is_video_page_url("https://www.youtube.com/"));
    }

    #[test]
    fn search_url_encodes_query() {
        let url = search_results_url("rust tutorial & more");
        assert!(url.starts_with("https://www.youtube.com/results?search_query="));
        assert!(url.contains("rust"));
        assert!(!url.contains(' '));
    }

    #[test]
    fn watch_url_round_trips() {
        let url = watch_url("kJQP7kiw5Fk");
        assert_eq!(video_id_from_url(&url), Some("kJQP7kiw5Fk".to_string()));
        assert!(is_video_page_url(&url));
    }
}
