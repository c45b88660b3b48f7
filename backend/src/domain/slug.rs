//! Slug normalisation for tag names.
//!
//! Two tag names denote the same tag iff their slugs are equal. The slug is
//! the Unicode-lowercased name with whitespace and separator punctuation
//! removed, so `"node.js"`, `"Node JS"` and `"node-js"` all become `"nodejs"`.
//! Other symbols are kept, which keeps `"C++"` and `"C#"` apart from `"C"`.

/// Punctuation treated as a word separator and dropped from slugs.
const SEPARATORS: [char; 8] = ['.', '-', '_', '/', '\\', ':', ',', ';'];

fn is_separator(ch: char) -> bool {
    ch.is_whitespace() || SEPARATORS.contains(&ch)
}

/// Compute the slug for a tag display name.
///
/// The result is empty when `name` contains only whitespace and separators.
///
/// # Examples
/// ```
/// use mentor_match::domain::slugify;
///
/// assert_eq!(slugify("node.js"), "nodejs");
/// assert_eq!(slugify("Node JS"), "nodejs");
/// assert_eq!(slugify("C++"), "c++");
/// ```
pub fn slugify(name: &str) -> String {
    name.chars()
        .filter(|ch| !is_separator(*ch))
        .flat_map(char::to_lowercase)
        .collect()
}
