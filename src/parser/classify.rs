//! URL classification: is a string a URL, and does that URL look like an image.
//!
//! Image detection is a union of three cheap checks:
//! - the URL path ends with a known image extension,
//! - the host is on an allow-list of image CDNs,
//! - the URL contains one of a few image-ish substrings (`image`, `img`, `pic`).
//!
//! The substring check over-includes on purpose. A URL such as
//! `https://example.com/imagehost/article123` is treated as an image because
//! missing a real image costs more than downloading a stray page. Callers that
//! want something stricter can build their own [`ImageClassifier`] or pass any
//! closure implementing [`ImageUrlFilter`].

use std::sync::LazyLock;

use url::Url;

/// URL schemes accepted by [`is_url`].
pub const URL_SCHEMES: &[&str] = &["http://", "https://", "ftp://"];

/// Path suffixes treated as image files (compared lower-cased).
pub const DEFAULT_IMAGE_EXTENSIONS: &[&str] = &[
    ".image", ".png", ".jpg", ".jpeg", ".gif", ".bmp", ".webp", ".svg",
];

/// Hosts known to serve images regardless of path shape.
pub const DEFAULT_IMAGE_HOSTS: &[&str] = &[
    "i.imgur.com",
    "p3-juejin.byteimg.com",
    "cdn.pixabay.com",
    "images.unsplash.com",
];

/// Substrings that mark a URL as an image when present anywhere in it.
pub const DEFAULT_IMAGE_SUBSTRINGS: &[&str] = &["image", "img", "pic"];

static DEFAULT_CLASSIFIER: LazyLock<ImageClassifier> = LazyLock::new(ImageClassifier::default);

/// Decides whether a URL should be treated as an image reference.
pub trait ImageUrlFilter {
    /// Returns true if `url` should be downloaded as an image.
    fn is_image_url(&self, url: &str) -> bool;
}

impl<F> ImageUrlFilter for F
where
    F: Fn(&str) -> bool,
{
    fn is_image_url(&self, url: &str) -> bool {
        self(url)
    }
}

/// Configurable image URL predicate composed of extension, host and substring checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageClassifier {
    extensions: Vec<String>,
    hosts: Vec<String>,
    substrings: Vec<String>,
}

impl Default for ImageClassifier {
    fn default() -> Self {
        Self {
            extensions: to_lowercase_vec(DEFAULT_IMAGE_EXTENSIONS),
            hosts: DEFAULT_IMAGE_HOSTS.iter().map(ToString::to_string).collect(),
            substrings: to_lowercase_vec(DEFAULT_IMAGE_SUBSTRINGS),
        }
    }
}

impl ImageClassifier {
    /// Creates a classifier with the default extension, host and substring lists.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the list of image path suffixes (e.g. `.png`).
    #[must_use]
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.extensions = extensions
            .into_iter()
            .map(|ext| ext.as_ref().to_lowercase())
            .collect();
        self
    }

    /// Replaces the host allow-list. Hosts must match exactly.
    #[must_use]
    pub fn with_hosts<I, S>(mut self, hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.hosts = hosts.into_iter().map(|h| h.as_ref().to_string()).collect();
        self
    }

    /// Replaces the substring list. An empty list disables the substring check.
    #[must_use]
    pub fn with_substrings<I, S>(mut self, substrings: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.substrings = substrings
            .into_iter()
            .map(|s| s.as_ref().to_lowercase())
            .collect();
        self
    }

    /// True if the URL path (query and fragment ignored) ends with an image extension.
    #[must_use]
    pub fn has_image_extension(&self, url: &str) -> bool {
        let path = url_path(url).to_lowercase();
        self.extensions.iter().any(|ext| path.ends_with(ext.as_str()))
    }

    /// True if the URL host is on the allow-list.
    #[must_use]
    pub fn is_known_host(&self, url: &str) -> bool {
        let Ok(parsed) = Url::parse(url) else {
            return false;
        };
        parsed
            .host_str()
            .is_some_and(|host| self.hosts.iter().any(|known| known == host))
    }

    /// True if the lower-cased URL contains any configured substring.
    #[must_use]
    pub fn has_image_substring(&self, url: &str) -> bool {
        let lowered = url.to_lowercase();
        self.substrings
            .iter()
            .any(|needle| lowered.contains(needle.as_str()))
    }
}

impl ImageUrlFilter for ImageClassifier {
    fn is_image_url(&self, url: &str) -> bool {
        self.has_image_extension(url) || self.is_known_host(url) || self.has_image_substring(url)
    }
}

/// Returns true if `s` starts with one of the accepted URL schemes.
///
/// The scheme comparison is case-sensitive.
#[must_use]
pub fn is_url(s: &str) -> bool {
    URL_SCHEMES.iter().any(|scheme| s.starts_with(scheme))
}

/// Classifies `url` with the default [`ImageClassifier`].
///
/// # Examples
///
/// ```
/// use localizer_core::parser::is_image_url;
///
/// assert!(is_image_url("https://example.com/photo.PNG?size=large"));
/// assert!(is_image_url("https://example.com/imagehost/article123"));
/// assert!(!is_image_url("https://example.com/docs/readme"));
/// ```
#[must_use]
pub fn is_image_url(url: &str) -> bool {
    DEFAULT_CLASSIFIER.is_image_url(url)
}

/// Path component of a URL, without query string or fragment.
///
/// Falls back to manual splitting when the URL does not parse.
fn url_path(url: &str) -> String {
    if let Ok(parsed) = Url::parse(url) {
        return parsed.path().to_string();
    }
    let without_fragment = url.split('#').next().unwrap_or(url);
    without_fragment
        .split('?')
        .next()
        .unwrap_or(without_fragment)
        .to_string()
}

fn to_lowercase_vec(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_lowercase()).collect()
}
