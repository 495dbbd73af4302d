//! Display text helpers

/// Title-case a name: lower-case it, capitalise each word, collapse spaces.
///
/// `None` and empty input give an empty string.
pub fn to_title_case(text: Option<&str>) -> String {
    let Some(text) = text else {
        return String::new();
    };

    text.to_lowercase()
        .split(' ')
        .filter(|word| !word.is_empty())
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
