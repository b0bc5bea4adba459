//! Artwork locator classification.
//!
//! A track's artwork locator is either a link (possibly embedded in a longer
//! string) or a filesystem path. Nothing here fetches or reads the image: the
//! host decides what to do with the classified source. Locators that cannot be
//! classified are dropped, so now-playing metadata simply has no artwork.

use std::path::PathBuf;

use url::Url;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArtworkSource {
    Remote(Url),
    Local(PathBuf),
}

impl ArtworkSource {
    pub fn parse(locator: &str) -> Option<Self> {
        let locator = locator.trim();
        if locator.is_empty() {
            return None;
        }

        if let Some(link) = find_link(locator) {
            return Some(ArtworkSource::Remote(link));
        }

        match Url::parse(locator) {
            Ok(url) if url.scheme() == "file" => url.to_file_path().ok().map(ArtworkSource::Local),
            // single-letter schemes are Windows drive letters, not URLs
            Ok(url) if url.scheme().len() == 1 => Some(ArtworkSource::Local(PathBuf::from(locator))),
            Ok(_) => None,
            Err(url::ParseError::RelativeUrlWithoutBase) => {
                Some(ArtworkSource::Local(PathBuf::from(locator)))
            }
            Err(_) => None,
        }
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, ArtworkSource::Remote(_))
    }
}

/// First http(s) link found in `text`, up to the next whitespace.
fn find_link(text: &str) -> Option<Url> {
    let start = ["https://", "http://"]
        .iter()
        .filter_map(|scheme| text.find(scheme))
        .min()?;
    let candidate = text[start..].split_whitespace().next()?;
    Url::parse(candidate).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_link() {
        let source = ArtworkSource::parse("https://covers.example.org/a.jpg").unwrap();
        assert!(source.is_remote());
    }

    #[test]
    fn test_link_embedded_in_text() {
        let source = ArtworkSource::parse("cover: http://img.example.org/x.png (large)").unwrap();
        assert_eq!(
            source,
            ArtworkSource::Remote(Url::parse("http://img.example.org/x.png").unwrap())
        );
    }

    #[test]
    fn test_local_paths() {
        assert_eq!(
            ArtworkSource::parse("/var/covers/a.jpg"),
            Some(ArtworkSource::Local(PathBuf::from("/var/covers/a.jpg")))
        );
        assert_eq!(
            ArtworkSource::parse("covers/a.jpg"),
            Some(ArtworkSource::Local(PathBuf::from("covers/a.jpg")))
        );
    }

    #[test]
    fn test_unusable_locators_are_dropped() {
        assert_eq!(ArtworkSource::parse(""), None);
        assert_eq!(ArtworkSource::parse("   "), None);
        assert_eq!(ArtworkSource::parse("mailto:someone@example.org"), None);
    }
}
