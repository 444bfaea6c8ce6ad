use linemark::{to_html, to_html_with_options, Options};

/// Render a single paragraph and strip its `<p>` wrapper.
fn inline(input: &str) -> String {
    let html = to_html(input);
    html.strip_prefix("<p>")
        .and_then(|h| h.strip_suffix("</p>\n"))
        .unwrap_or_else(|| panic!("not a single paragraph: {html:?}"))
        .to_string()
}

#[test]
fn test_emphasis_and_strong() {
    assert_eq!(inline("*a* _b_"), "<em>a</em> <em>b</em>");
    assert_eq!(inline("**a** __b__"), "<strong>a</strong> <strong>b</strong>");
    assert_eq!(inline("***a***"), "<em><strong>a</strong></em>");
    assert_eq!(
        inline("*a **b** c*"),
        "<em>a <strong>b</strong> c</em>"
    );
}

#[test]
fn test_unmatched_delimiters_are_literal() {
    assert_eq!(inline("2 * 3 * 4"), "2 * 3 * 4");
    assert_eq!(inline("snake_case_name"), "snake_case_name");
    assert_eq!(inline("*open"), "*open");
}

#[test]
fn test_code_spans() {
    assert_eq!(inline("`a<b`"), "<code>a&lt;b</code>");
    assert_eq!(inline("`` a ` b ``"), "<code>a ` b</code>");
    assert_eq!(inline("`*no*`"), "<code>*no*</code>");
    assert_eq!(inline("`open"), "`open");
}

#[test]
fn test_backslash_escapes() {
    assert_eq!(inline(r"\*not\*"), "*not*");
    assert_eq!(inline(r"\[x\]"), "[x]");
    assert_eq!(inline(r"a\b"), r"a\b");
}

#[test]
fn test_inline_links() {
    assert_eq!(
        inline("[site](http://x.y \"Title\")"),
        "<a href=\"http://x.y\" title=\"Title\">site</a>"
    );
    assert_eq!(inline("[*a*](/u)"), "<a href=\"/u\"><em>a</em></a>");
    assert_eq!(inline("[a](<my url>)"), "<a href=\"my%20url\">a</a>");
}

#[test]
fn test_links_do_not_nest() {
    assert_eq!(
        inline("[a [b](/x)](/y)"),
        "<a href=\"/y\">a [b](/x)</a>"
    );
}

#[test]
fn test_emphasis_does_not_cross_link_text() {
    assert_eq!(
        inline("*a [b* c](/u)"),
        "*a <a href=\"/u\">b* c</a>"
    );
}

#[test]
fn test_images() {
    assert_eq!(
        inline("![a cat](/cat.png)"),
        "<img src=\"/cat.png\" alt=\"a cat\" />"
    );
    assert_eq!(
        inline("[![logo](/l.png)](/home)"),
        "<a href=\"/home\"><img src=\"/l.png\" alt=\"logo\" /></a>"
    );
}

#[test]
fn test_autolinks() {
    assert_eq!(
        inline("<https://example.com/a>"),
        "<a href=\"https://example.com/a\">https://example.com/a</a>"
    );
    assert_eq!(
        inline("<joe@example.com>"),
        "<a href=\"mailto:joe@example.com\">joe@example.com</a>"
    );
}

#[test]
fn test_raw_html() {
    assert_eq!(
        inline("a <span class=\"x\">y</span>"),
        "a <span class=\"x\">y</span>"
    );
    let options = Options {
        allow_html: false,
        ..Options::default()
    };
    assert_eq!(
        to_html_with_options("<i>y</i>", &options),
        "<p>&lt;i&gt;y&lt;/i&gt;</p>\n"
    );
}

#[test]
fn test_entities() {
    assert_eq!(inline("&copy; &#169; &#xA9;"), "&copy; &#169; &#xA9;");
    assert_eq!(inline("AT&T"), "AT&amp;T");
}

#[test]
fn test_breaks() {
    assert_eq!(inline("one\ntwo"), "one\ntwo");
    assert_eq!(inline("one  \ntwo"), "one<br />\ntwo");
    assert_eq!(inline("one \ntwo"), "one\ntwo");
}

#[test]
fn test_inline_in_headline() {
    assert_eq!(to_html("# *Big* `deal`"), "<h1><em>Big</em> <code>deal</code></h1>\n");
}

#[test]
fn test_link_url_escaping() {
    assert_eq!(
        inline("[q](/s?a=1&b=\"2\")"),
        "<a href=\"/s?a=1&amp;b=%222%22\">q</a>"
    );
}
