//! Version extraction and classification of changelog section headers.
//!
//! A header looks like `v2.0.0-rc.0 (2017-12-12)`: a version token, optionally
//! followed by a human-readable date. The token identifies the tag; the token
//! with its prerelease suffix removed is the key prereleases collapse onto.

use std::sync::LazyLock;

use regex::Regex;

/// Header word marking changes that have not been tagged yet.
pub const UNRELEASED_MARKER: &str = "Unreleased";

/// A stable-looking version immediately followed by a hyphenated suffix.
static PRERELEASE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^v\d+\.\d+\.\d+-").expect("prerelease pattern is valid"));

/// How a changelog section relates to the release history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Classification {
    /// The section for changes not yet tagged.
    Unreleased,
    /// A version with a hyphenated suffix such as `-rc.0`.
    Prerelease,
    Stable,
}

/// The first whitespace-delimited word of `header`.
///
/// ## Examples
///
/// ```
/// use chronicle_lib::version_token;
///
/// assert_eq!(version_token("v2.0.0-rc.0 (2017-12-12)"), "v2.0.0-rc.0");
/// ```
pub fn version_token(header: &str) -> &str {
    header.split_whitespace().next().unwrap_or("")
}

/// The version token with everything from the first `-` removed.
///
/// ## Examples
///
/// ```
/// use chronicle_lib::stable_key;
///
/// assert_eq!(stable_key("v2.0.0-rc.0 (2017-12-12)"), "v2.0.0");
/// assert_eq!(stable_key("v2.0.0 (2017-12-12)"), "v2.0.0");
/// ```
pub fn stable_key(header: &str) -> &str {
    let token = version_token(header);
    token.split('-').next().unwrap_or(token)
}

pub fn is_unreleased(header: &str) -> bool {
    header.starts_with(UNRELEASED_MARKER)
}

/// True for the Unreleased section and for `vX.Y.Z-<suffix>` headers.
pub fn is_prerelease(header: &str) -> bool {
    is_unreleased(header) || PRERELEASE_PATTERN.is_match(header)
}

/// True for every header except the Unreleased one; prereleases count as released.
pub fn is_released(header: &str) -> bool {
    !is_unreleased(header)
}

pub fn classify(header: &str) -> Classification {
    if is_unreleased(header) {
        Classification::Unreleased
    } else if is_prerelease(header) {
        Classification::Prerelease
    } else {
        Classification::Stable
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_token_drops_date_annotation() {
        assert_eq!(version_token("v1.0.0 (12-12-2017)"), "v1.0.0");
        assert_eq!(version_token("v1.0.0-rc.0 (12-12-2017)"), "v1.0.0-rc.0");
    }

    #[test]
    fn version_token_of_blank_header_is_empty() {
        assert_eq!(version_token(""), "");
        assert_eq!(version_token("   "), "");
    }

    #[test]
    fn stable_key_strips_prerelease_suffix() {
        assert_eq!(stable_key("v1.0.0 (12-12-2017)"), "v1.0.0");
        assert_eq!(stable_key("v1.0.0-rc.0 (12-12-2017)"), "v1.0.0");
        assert_eq!(stable_key("v1.0.0-beta.1-hotfix"), "v1.0.0");
    }

    #[test]
    fn stable_key_collapses_prereleases() {
        let headers = ["v2.0.0 (2017)", "v2.0.0-rc.0 (2017)", "v2.0.0-alpha.3"];
        assert!(headers.iter().all(|h| stable_key(h) == "v2.0.0"));
    }

    #[test]
    fn is_released_is_false_only_for_unreleased() {
        assert!(!is_released("Unreleased string here"));
        assert!(is_released("String here"));
        assert!(is_released("v1.0.0-rc.0 (2017-12-12)"));
    }

    #[test]
    fn is_unreleased_requires_prefix() {
        assert!(is_unreleased("Unreleased (2018-01-01)"));
        assert!(!is_unreleased("Still Unreleased"));
    }

    #[test]
    fn is_prerelease_matches_hyphenated_versions() {
        assert!(is_prerelease("v2.0.0-rc.0 (2017-12-12)"));
        assert!(is_prerelease("v10.20.30-beta"));
        assert!(is_prerelease("Unreleased (2018-01-01)"));
    }

    #[test]
    fn is_prerelease_rejects_stable_versions() {
        assert!(!is_prerelease("v1.2.3"));
        assert!(!is_prerelease("v1.2.3 (2017-12-12)"));
        assert!(!is_prerelease("1.2.3-rc.0"));
    }

    #[test]
    fn classify_buckets_headers() {
        assert_eq!(classify("Unreleased"), Classification::Unreleased);
        assert_eq!(classify("v1.0.0-rc.1 (2018)"), Classification::Prerelease);
        assert_eq!(classify("v1.0.0 (2018)"), Classification::Stable);
    }
}
