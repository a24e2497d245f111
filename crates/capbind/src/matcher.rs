//! The pattern engine as seen by the binder.

/// Finds the first match of a pattern and reports its capture groups.
pub trait Matcher {
    /// Capture groups of the first match in `haystack`, aligned to slots.
    ///
    /// Slot 0 is the whole match. A group that did not take part in the
    /// match is `None`. Returns `None` if there is no match at all.
    fn captures<'h>(&self, haystack: &'h [u8]) -> Option<Vec<Option<&'h [u8]>>>;

    /// Label of each slot, `""` for unnamed groups.
    fn capture_names(&self) -> Vec<&str>;
}

impl Matcher for regex::bytes::Regex {
    fn captures<'h>(&self, haystack: &'h [u8]) -> Option<Vec<Option<&'h [u8]>>> {
        let caps = regex::bytes::Regex::captures(self, haystack)?;
        Some(caps.iter().map(|m| m.map(|m| m.as_bytes())).collect())
    }

    fn capture_names(&self) -> Vec<&str> {
        regex::bytes::Regex::capture_names(self)
            .map(|name| name.unwrap_or(""))
            .collect()
    }
}

impl Matcher for regex::Regex {
    fn captures<'h>(&self, haystack: &'h [u8]) -> Option<Vec<Option<&'h [u8]>>> {
        // A str regex cannot match input that is not UTF-8.
        let haystack = std::str::from_utf8(haystack).ok()?;
        let caps = regex::Regex::captures(self, haystack)?;
        Some(caps.iter().map(|m| m.map(|m| m.as_str().as_bytes())).collect())
    }

    fn capture_names(&self) -> Vec<&str> {
        regex::Regex::capture_names(self)
            .map(|name| name.unwrap_or(""))
            .collect()
    }
}
