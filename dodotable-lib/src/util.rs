//! String helpers

use std::sync::LazyLock;

use regex::Regex;

/// An uppercase letter starting a lowercase run, preceded by any character.
static FIRST_CAP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(.)([A-Z][a-z]+)").expect("valid regex"));

/// An uppercase letter following a lowercase letter or digit.
static ALL_CAP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([a-z0-9])([A-Z])").expect("valid regex"));

/// Converts a CamelCase name to snake_case.
///
/// Runs of capitals are kept together, so acronyms stay one word.
///
/// ```
/// use dodotable_lib::util::camel_to_underscore;
///
/// assert_eq!(camel_to_underscore("SomeRustType"), "some_rust_type");
/// assert_eq!(camel_to_underscore("HTTPResponse"), "http_response");
/// ```
pub fn camel_to_underscore(name: &str) -> String {
    let step = FIRST_CAP.replace_all(name, "${1}_${2}");
    ALL_CAP.replace_all(&step, "${1}_${2}").to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camel_to_underscore() {
        assert_eq!(camel_to_underscore("Music"), "music");
        assert_eq!(camel_to_underscore("AdminRole"), "admin_role");
        assert_eq!(camel_to_underscore("SomeHttpClient"), "some_http_client");
        assert_eq!(camel_to_underscore("Track2Artist"), "track2_artist");
        assert_eq!(camel_to_underscore("already_snake"), "already_snake");
    }

    #[test]
    fn test_acronyms() {
        assert_eq!(camel_to_underscore("HTTPResponse"), "http_response");
        assert_eq!(camel_to_underscore("UserID"), "user_id");
    }
}
