use std::sync::LazyLock;

use regex::Regex;

// A bold label, a colon, then a value run that stops at the next tag.
static LABEL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<b>([a-zA-Z ]+)</b>:(.[^<]+)<").unwrap());

/// Scan a content blob for `<b>Label</b>: value<` runs, in document order.
/// Label and value are both trimmed.
pub fn scan(content: &str) -> Vec<(String, String)> {
    LABEL_RE
        .captures_iter(content)
        .map(|caps| (caps[1].trim().to_string(), caps[2].trim().to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_pair() {
        let pairs = scan("<b>Country</b>: Germany\n<br />");
        assert_eq!(pairs, vec![("Country".to_string(), "Germany".to_string())]);
    }

    #[test]
    fn keeps_document_order() {
        let pairs = scan("<b>Skills</b>:Rust, Go<br /><b>Category</b>:Web<br />");
        let labels: Vec<&str> = pairs.iter().map(|(l, _)| l.as_str()).collect();
        assert_eq!(labels, vec!["Skills", "Category"]);
    }

    #[test]
    fn value_needs_closing_tag() {
        assert!(scan("<b>Country</b>: Germany").is_empty());
    }

    #[test]
    fn value_spans_newlines() {
        let pairs = scan("<b>Skills</b>: Rust,\n   Go\n<br />");
        assert_eq!(pairs[0].1, "Rust,\n   Go");
    }

    #[test]
    fn label_with_digits_not_matched() {
        assert!(scan("<b>Field 2</b>: x y<br />").is_empty());
    }

    #[test]
    fn no_labels() {
        assert!(scan("Plain description without markup.").is_empty());
    }
}
