//! Stateless string-shape rules shared by the user, follow and post flows.
//!
//! Every predicate accepts any input, never panics and never mutates its
//! argument.

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;

static ALPHANUMERIC_RE: OnceLock<Regex> = OnceLock::new();
static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn alphanumeric_regex() -> &'static Regex {
    ALPHANUMERIC_RE.get_or_init(|| {
        Regex::new("^[A-Za-z0-9]+$")
            .unwrap_or_else(|error| panic!("alphanumeric regex failed to compile: {error}"))
    })
}

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        // Local part and labelled domain with a TLD of two or more letters.
        let pattern = concat!(
            r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+",
            r"@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?",
            r"(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)*",
            r"\.[A-Za-z]{2,}$",
        );
        Regex::new(pattern).unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// True when the input still has content after trimming whitespace.
pub fn is_non_empty_trimmed(value: &str) -> bool {
    !value.trim().is_empty()
}

/// True when the input is non-empty and made only of ASCII letters and digits.
pub fn is_alphanumeric(value: &str) -> bool {
    alphanumeric_regex().is_match(value)
}

/// True when the input looks like a deliverable email address.
///
/// Local parts may not start or end with a dot, nor contain two dots in a
/// row.
pub fn is_valid_email(value: &str) -> bool {
    if value.len() > 254 || !email_regex().is_match(value) {
        return false;
    }
    let Some((local, _)) = value.rsplit_once('@') else {
        return false;
    };
    local.len() <= 64 && !local.starts_with('.') && !local.ends_with('.') && !local.contains("..")
}

/// True when the character count of `value` falls within `min..=max`.
pub fn has_length_between(value: &str, min: usize, max: usize) -> bool {
    let length = value.chars().count();
    (min..=max).contains(&length)
}

/// Strip every tag and attribute from `value`, keeping its text content.
///
/// Input is trimmed before and after cleaning so markup-only input collapses
/// to an empty string. `script` and `style` bodies are dropped entirely.
/// Cleaning parses entities before re-escaping, so cleaning twice is the same
/// as cleaning once.
///
/// # Examples
/// ```
/// use postapp::domain::validation::sanitize_markup;
///
/// assert_eq!(sanitize_markup("  <b>Hello</b> world "), "Hello world");
/// assert_eq!(sanitize_markup("a < b"), "a &lt; b");
/// ```
pub fn sanitize_markup(value: &str) -> String {
    let mut builder = ammonia::Builder::empty();
    builder.clean_content_tags(HashSet::from(["script", "style"]));
    builder.clean(value.trim()).to_string().trim().to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("abc", true)]
    #[case("  x ", true)]
    #[case("", false)]
    #[case(" \t\n", false)]
    fn non_empty_trimmed(#[case] input: &str, #[case] expected: bool) {
        assert_eq!(is_non_empty_trimmed(input), expected);
    }

    #[rstest]
    #[case("ada99", true)]
    #[case("ADA", true)]
    #[case("", false)]
    #[case("ada lovelace", false)]
    #[case("ada_l", false)]
    #[case("adé", false)]
    fn alphanumeric(#[case] input: &str, #[case] expected: bool) {
        assert_eq!(is_alphanumeric(input), expected);
    }

    #[rstest]
    #[case("ada@example.com", true)]
    #[case("ada.lovelace+posts@mail.example.co.uk", true)]
    #[case("ada@example", false)]
    #[case("ada@@example.com", false)]
    #[case("@example.com", false)]
    #[case(".ada@example.com", false)]
    #[case("ada..l@example.com", false)]
    #[case("ada example@example.com", false)]
    #[case("", false)]
    fn email(#[case] input: &str, #[case] expected: bool) {
        assert_eq!(is_valid_email(input), expected);
    }

    #[rstest]
    #[case("abc", 3, 30, true)]
    #[case("ab", 3, 30, false)]
    #[case("ééé", 3, 3, true)]
    fn length_between(
        #[case] input: &str,
        #[case] min: usize,
        #[case] max: usize,
        #[case] expected: bool,
    ) {
        assert_eq!(has_length_between(input, min, max), expected);
    }

    #[rstest]
    #[case("<h1 onclick=\"x()\">Title</h1>", "Title")]
    #[case("before<script>alert(1)</script>after", "beforeafter")]
    #[case("<p>   </p>", "")]
    #[case("fish & chips", "fish &amp; chips")]
    fn sanitize_strips_markup(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(sanitize_markup(input), expected);
    }

    #[rstest]
    #[case("fish & chips <i>tonight</i>")]
    #[case("1 < 2 > 0")]
    #[case("<a href=\"https://example.com\">link</a> text")]
    fn sanitize_is_idempotent(#[case] input: &str) {
        let once = sanitize_markup(input);
        assert_eq!(sanitize_markup(&once), once);
    }
}
