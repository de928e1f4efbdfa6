//! Splitting changelog documents into per-release sections and back.

use crate::classify::{self, Classification};

/// Sequence that starts every release section in a generated changelog.
pub const SECTION_MARKER: &str = "\n## ";

/// One release block of a changelog: a header line and its body.
///
/// The text excludes the leading marker and is otherwise untouched, so
/// rejoining sections reproduces the document byte for byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Section<'a> {
    text: &'a str,
}

impl<'a> Section<'a> {
    pub fn new(text: &'a str) -> Self {
        Self { text }
    }

    /// Full section text, header included.
    pub fn text(&self) -> &'a str {
        self.text
    }

    /// The first line of the section.
    pub fn header(&self) -> &'a str {
        self.text.split('\n').next().unwrap_or(self.text)
    }

    /// Everything after the header line.
    pub fn body(&self) -> &'a str {
        self.text.split_once('\n').map_or("", |(_, body)| body)
    }

    pub fn version_token(&self) -> &'a str {
        classify::version_token(self.header())
    }

    pub fn stable_key(&self) -> &'a str {
        classify::stable_key(self.header())
    }

    pub fn classification(&self) -> Classification {
        classify::classify(self.header())
    }
}

/// Splits a document on [`SECTION_MARKER`], dropping empty fragments.
///
/// Sections keep their relative order in the document.
///
/// ## Examples
///
/// ```
/// use chronicle_lib::split_sections;
///
/// let sections = split_sections("\n## v2.0.0\nfix\n## v1.0.0\ninit");
/// assert_eq!(sections.len(), 2);
/// assert_eq!(sections[0].header(), "v2.0.0");
/// ```
pub fn split_sections(document: &str) -> Vec<Section<'_>> {
    document
        .split(SECTION_MARKER)
        .filter(|fragment| !fragment.is_empty())
        .map(Section::new)
        .collect()
}

/// Joins sections with [`SECTION_MARKER`] and prefixes the result with it.
///
/// An empty slice yields the marker alone.
pub fn join_sections(sections: &[Section<'_>]) -> String {
    let mut out = String::with_capacity(
        sections
            .iter()
            .map(|s| s.text().len() + SECTION_MARKER.len())
            .sum(),
    );
    for section in sections {
        out.push_str(SECTION_MARKER);
        out.push_str(section.text());
    }
    if out.is_empty() {
        out.push_str(SECTION_MARKER);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = "\n## Unreleased\n- pending\n## v1.0.0 (2017-12-12)\n- first\n";

    #[test]
    fn split_drops_leading_empty_fragment() {
        let sections = split_sections(DOC);
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].text(), "Unreleased\n- pending");
        assert_eq!(sections[1].text(), "v1.0.0 (2017-12-12)\n- first\n");
    }

    #[test]
    fn split_of_empty_document_is_empty() {
        assert!(split_sections("").is_empty());
        assert!(split_sections(SECTION_MARKER).is_empty());
    }

    #[test]
    fn header_and_body() {
        let section = Section::new("v1.0.0 (2017-12-12)\n#### Bug fix\n- thing");
        assert_eq!(section.header(), "v1.0.0 (2017-12-12)");
        assert_eq!(section.body(), "#### Bug fix\n- thing");
        assert_eq!(section.version_token(), "v1.0.0");
        assert_eq!(section.classification(), Classification::Stable);
    }

    #[test]
    fn header_only_section_has_empty_body() {
        let section = Section::new("v1.0.0-rc.2");
        assert_eq!(section.header(), "v1.0.0-rc.2");
        assert_eq!(section.body(), "");
        assert_eq!(section.stable_key(), "v1.0.0");
    }

    #[test]
    fn join_round_trips_document_shape() {
        assert_eq!(join_sections(&split_sections(DOC)), DOC);
    }

    #[test]
    fn join_of_nothing_is_marker() {
        assert_eq!(join_sections(&[]), SECTION_MARKER);
    }
}
