//! User-Agent string sent with image requests.
//!
//! Some image hosts reject requests without a User-Agent, so every download
//! identifies the tool and its version.

/// Project URL for User-Agent identification (RFC 9308).
const PROJECT_UA_URL: &str = "https://github.com/fierce/image-localizer";

/// Default User-Agent for image downloads.
#[must_use]
pub(crate) fn default_download_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("image-localizer/{version} (markdown-image-tool; +{PROJECT_UA_URL})")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_download_ua_contains_version_and_url() {
        let ua = default_download_user_agent();
        assert!(ua.contains(PROJECT_UA_URL), "UA must contain project URL");
        assert_eq!(
            env!("CARGO_PKG_VERSION"),
            ua.strip_prefix("image-localizer/")
                .and_then(|s| s.split(' ').next())
                .expect("UA has version"),
            "UA must contain crate version"
        );
    }

    #[test]
    fn test_download_ua_identifies_tool() {
        let ua = default_download_user_agent();
        assert!(
            ua.contains("markdown-image-tool"),
            "UA must identify the tool: {ua}"
        );
    }
}
