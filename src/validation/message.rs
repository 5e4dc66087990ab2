//! Error-message templates with positional `{n}` placeholders.

use std::borrow::Cow;

use lazy_static::lazy_static;
use regex::{Captures, Regex};

lazy_static! {
    static ref PLACEHOLDER: Regex = Regex::new(r"\{(\d+)\}").unwrap();
}

/// Substitute `{n}` with `args[n]`.
///
/// Placeholders without a matching argument are left as written.
pub fn render_template<'a>(template: &'a str, args: &[String]) -> Cow<'a, str> {
    PLACEHOLDER.replace_all(template, |caps: &Captures<'_>| {
        caps[1]
            .parse::<usize>()
            .ok()
            .and_then(|index| args.get(index))
            .cloned()
            .unwrap_or_else(|| caps[0].to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_substitutes_in_order() {
        let rendered = render_template(
            "{0} length must be between {1} and {2}",
            &args(&["Username", "4", "20"]),
        );
        assert_eq!(rendered, "Username length must be between 4 and 20");
    }

    #[test]
    fn test_missing_indices_stay_literal() {
        let rendered = render_template("{0} needs {1} and {7}", &args(&["Name"]));
        assert_eq!(rendered, "Name needs {1} and {7}");
    }

    #[test]
    fn test_repeated_placeholder() {
        assert_eq!(render_template("{0}/{0}", &args(&["a"])), "a/a");
    }
}
