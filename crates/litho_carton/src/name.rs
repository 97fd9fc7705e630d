//! Case-insensitive naming helpers.
//!
//! HTML tag and attribute names are case-insensitive, so every knowledge
//! lookup goes through [`lower_name`].

use compact_str::CompactString;
use phf::phf_set;

static VOID_TAGS: phf::Set<&'static str> = phf_set! {
    "area", "base", "br", "col", "embed", "hr", "img", "input",
    "link", "meta", "param", "source", "track", "wbr",
};

/// Elements whose content is raw text up to the matching end tag.
static RAW_TEXT_TAGS: phf::Set<&'static str> = phf_set! {
    "script", "style", "textarea", "title",
};

/// Lower-case a descriptor name for use as a map key.
#[inline]
pub fn lower_name(name: &str) -> CompactString {
    if name.bytes().any(|b| b.is_ascii_uppercase()) {
        CompactString::from(name.to_ascii_lowercase())
    } else {
        CompactString::from(name)
    }
}

/// Compare two names ignoring ASCII case.
#[inline]
pub fn names_match(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b)
}

/// Check if a tag name is a valid custom element name (contains a dash and
/// starts with a lower-case ASCII letter).
#[inline]
pub fn is_custom_element_name(name: &str) -> bool {
    name.contains('-') && name.as_bytes().first().is_some_and(|b| b.is_ascii_lowercase())
}

/// Check if an element never has an end tag (`<input>`, `<br>`, ...).
#[inline]
pub fn is_void_tag(name: &str) -> bool {
    VOID_TAGS.contains(lower_name(name).as_str())
}

#[inline]
pub fn is_raw_text_tag(name: &str) -> bool {
    RAW_TEXT_TAGS.contains(lower_name(name).as_str())
}
