//! Slug normalization for block-anchor lookup keys.
//!
//! Anchors are matched by their normalized form, so `#^My Block` and a
//! `^my-block` marker in the target document refer to the same span.

/// Generate a slug from anchor or heading text.
///
/// Lowercases alphanumeric characters and collapses every run of other
/// characters (whitespace, punctuation) into a single hyphen, with no
/// leading or trailing hyphens.
///
/// # Examples
///
/// ```
/// use graft::markdown::slugify;
///
/// assert_eq!(slugify("My Block"), "my-block");
/// assert_eq!(slugify("Hello, World!"), "hello-world");
/// assert_eq!(slugify("  spaced   out  "), "spaced-out");
/// ```
pub fn slugify(text: &str) -> String {
    let mut mapped = String::with_capacity(text.len());
    for c in text.chars() {
        if c.is_alphanumeric() {
            for lower in c.to_lowercase() {
                mapped.push(lower);
            }
        } else {
            mapped.push('-');
        }
    }

    mapped.split('-').filter(|s| !s.is_empty()).collect::<Vec<_>>().join("-")
}
