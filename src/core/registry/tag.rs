//! Struct tag parsing.
//!
//! Tags follow the conventional `key:"value" key2:"value2"` layout. Only the
//! `json` key matters for documentation: it renames, excludes, or marks a
//! field optional.

use std::sync::LazyLock;

use regex::Regex;

static TAG_PAIR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([A-Za-z0-9_]+):"((?:[^"\\]|\\.)*)""#).expect("valid tag regex")
});

/// The serialization key that drives field naming.
pub const SERIALIZATION_KEY: &str = "json";

/// Serialization-relevant view of a field tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagInfo {
    /// `json:"-"`: field is never serialized.
    Excluded,
    Named {
        /// Empty when the tag only carries options, e.g. `json:",omitempty"`.
        name: String,
        optional: bool,
    },
}

/// Look up a single key's raw value.
pub fn lookup<'a>(tag: &'a str, key: &str) -> Option<&'a str> {
    TAG_PAIR.captures_iter(tag).find_map(|caps| {
        let (_, [k, v]) = caps.extract();
        (k == key).then_some(v)
    })
}

/// Parse the serialization part of a tag. `None` when the tag has no `json` key.
pub fn parse_serialization_tag(tag: &str) -> Option<TagInfo> {
    let value = lookup(tag, SERIALIZATION_KEY)?;
    if value == "-" {
        return Some(TagInfo::Excluded);
    }

    let mut parts = value.split(',');
    let name = parts.next().unwrap_or_default().to_string();
    let optional = parts.any(|opt| opt.trim() == "omitempty");

    Some(TagInfo::Named { name, optional })
}
