//! Client-side pagination over materialized listings
//!
//! Backends without native pagination (or whose native pagination does not
//! cover a given listing) materialize the full ordered listing and slice a
//! page out of it here. The resume token is the identifier of the first
//! entry that did not fit in the page, so resuming is an exact seek and a
//! token invalidated by a concurrent delete is detected instead of
//! silently skipping entries.
//!
//! Callers never see the difference between this and a backend's native
//! continuation tokens; both surface as the opaque `Page::cursor`.

use crate::error::{Error, Result};
use crate::traits::Page;

/// Slice one page out of a fully materialized listing.
///
/// `entries` must be in the listing's stable order. `cursor` is `None` for
/// the first page or a token from a previous page; a token that no longer
/// matches any entry fails with [`Error::BadCursor`]. `id` projects the
/// identifier that tokens are made of.
///
/// `page_size` must be at least 1; adapters enforce that when they are
/// constructed.
pub fn take_page<T>(
    mut entries: Vec<T>,
    cursor: Option<&str>,
    page_size: usize,
    id: impl Fn(&T) -> &str,
) -> Result<Page<T>> {
    debug_assert!(page_size > 0, "page_size must be at least 1");

    if let Some(token) = cursor {
        let start = entries
            .iter()
            .position(|entry| id(entry) == token)
            .ok_or_else(|| Error::BadCursor(token.to_string()))?;
        entries.drain(..start);
    }

    let next = if entries.len() > page_size {
        let token = id(&entries[page_size]).to_string();
        entries.truncate(page_size);
        Some(token)
    } else {
        None
    };

    Ok(Page {
        entries,
        cursor: next,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    fn page(
        names: &[&str],
        cursor: Option<&str>,
        page_size: usize,
    ) -> Result<Page<String>> {
        take_page(listing(names), cursor, page_size, |s| s.as_str())
    }

    #[test]
    fn test_first_page_without_cursor() {
        let got = page(&["a", "b", "c", "d", "e"], None, 2).unwrap();
        assert_eq!(got.entries, listing(&["a", "b"]));
        assert_eq!(got.cursor.as_deref(), Some("c"));
    }

    #[test]
    fn test_resume_from_cursor() {
        let got = page(&["a", "b", "c", "d", "e"], Some("c"), 2).unwrap();
        assert_eq!(got.entries, listing(&["c", "d"]));
        assert_eq!(got.cursor.as_deref(), Some("e"));
    }

    #[test]
    fn test_final_page_is_short_and_terminal() {
        let got = page(&["a", "b", "c", "d", "e"], Some("e"), 2).unwrap();
        assert_eq!(got.entries, listing(&["e"]));
        assert_eq!(got.cursor, None);
    }

    #[test]
    fn test_page_size_larger_than_listing() {
        let got = page(&["a", "b", "c"], None, 10).unwrap();
        assert_eq!(got.entries, listing(&["a", "b", "c"]));
        assert_eq!(got.cursor, None);
    }

    #[test]
    fn test_exact_multiple_has_no_empty_trailing_page() {
        // Four entries with pages of two: the second page must already
        // report the end instead of handing out a third, empty page.
        let first = page(&["a", "b", "c", "d"], None, 2).unwrap();
        assert_eq!(first.entries, listing(&["a", "b"]));
        let second = page(&["a", "b", "c", "d"], first.cursor.as_deref(), 2).unwrap();
        assert_eq!(second.entries, listing(&["c", "d"]));
        assert_eq!(second.cursor, None);
    }

    #[test]
    fn test_empty_listing() {
        let got = page(&[], None, 3).unwrap();
        assert!(got.entries.is_empty());
        assert_eq!(got.cursor, None);
    }

    #[test]
    fn test_unknown_cursor_rejected() {
        let err = page(&["a", "b", "c"], Some("zz"), 2).unwrap_err();
        assert!(matches!(err, Error::BadCursor(token) if token == "zz"));
    }

    #[test]
    fn test_empty_token_rejected() {
        let err = page(&["a", "b"], Some(""), 2).unwrap_err();
        assert!(matches!(err, Error::BadCursor(_)));
    }

    #[test]
    fn test_cursor_invalidated_by_removal() {
        // The entry the token named is gone from the fresh listing, so the
        // resume point no longer exists.
        let err = page(&["a", "c"], Some("b"), 1).unwrap_err();
        assert!(matches!(err, Error::BadCursor(token) if token == "b"));
    }

    #[test]
    fn test_walked_pages_concatenate_to_full_listing() {
        let names = ["a", "b", "c", "d", "e", "f", "g"];
        for page_size in [1, 2, 3, 7, 20] {
            let mut seen = Vec::new();
            let mut cursor: Option<String> = None;
            loop {
                let got = page(&names, cursor.as_deref(), page_size).unwrap();
                assert!(got.entries.len() <= page_size);
                seen.extend(got.entries);
                match got.cursor {
                    Some(next) => cursor = Some(next),
                    None => break,
                }
            }
            assert_eq!(seen, listing(&names), "page_size {page_size}");
        }
    }
}
