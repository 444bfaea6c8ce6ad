use linemark::{parse, to_html, to_html_into};
use proptest::prelude::*;

/// A line built from Markdown-significant prefixes and plain words.
fn markdown_line() -> impl Strategy<Value = String> {
    let prefix = prop::sample::select(vec!["", "> ", "- ", "* ", "1. ", "    ", "  ", "> > ", ">"]);
    (prefix, "[a-z]{1,6}( [a-z]{1,6}){0,3}").prop_map(|(p, words)| format!("{p}{words}"))
}

fn markdown_document() -> impl Strategy<Value = String> {
    prop::collection::vec(prop_oneof![3 => markdown_line(), 1 => Just(String::new())], 0..40)
        .prop_map(|lines| lines.join("\n"))
}

proptest! {
    #[test]
    fn any_input_converts(input in "\\PC{0,200}") {
        let _ = to_html(&input);
    }

    #[test]
    fn markup_heavy_input_converts(input in "[-*_#>`!\\[\\]()<>&\\\\ \\t\\na1.=]{0,200}") {
        let html = to_html(&input);
        let mut buffer = Vec::new();
        to_html_into(&input, &mut buffer);
        prop_assert_eq!(html.as_bytes(), &buffer[..]);
    }

    #[test]
    fn every_text_line_lands_in_one_leaf(input in markdown_document()) {
        let expected = input.lines().filter(|l| !l.trim().is_empty()).count();
        let doc = parse(&input);
        let found: usize = doc
            .root
            .leaves()
            .map(|leaf| leaf.lines().iter().filter(|l| !l.is_blank()).count())
            .sum();
        prop_assert_eq!(found, expected);
    }
}
