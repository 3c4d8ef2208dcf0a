//! The greeting handler.

/// Format the greeting for `name`.
///
/// The name is interpolated as-is: no trimming, escaping or validation, so an
/// empty name yields `"Hello, !"`.
pub fn greet(name: &str) -> String {
    format!("Hello, {name}!")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn greets_by_name() {
        assert_eq!(greet("World"), "Hello, World!");
    }

    #[test]
    fn empty_name_is_interpolated() {
        assert_eq!(greet(""), "Hello, !");
    }

    #[test]
    fn special_characters_pass_through_unchanged() {
        for name in [
            "  padded  ",
            "<script>",
            "\"quoted\"",
            "line\nbreak",
            "ünïcødé 👋",
            "100%",
            "{name}",
        ] {
            assert_eq!(greet(name), format!("Hello, {name}!"));
        }
    }

    #[test]
    fn is_deterministic() {
        assert_eq!(greet("Ada"), greet("Ada"));
    }
}
