use super::*;

#[test]
fn extracts_title_case_insensitively() {
    let html = "<html><HEAD><TiTle>  Hello World  </TiTle></HEAD></html>";
    assert_eq!(extract_title(html).as_deref(), Some("Hello World"));
}

#[test]
fn missing_title_returns_none() {
    assert!(extract_title("<html><body>no title</body></html>").is_none());
}

#[test]
fn strip_tags_drops_script_and_style_blocks() {
    let html = "<html><head><style>.a{color:red}</style></head><body><script>alert(1)</script><p>Hello</p></body></html>";
    let content = strip_tags(html);
    assert_eq!(content, "Hello");
}

#[test]
fn strip_tags_collapses_whitespace() {
    let html = "<p>Hello\n\n   world</p>";
    assert_eq!(strip_tags(html), "Hello world");
}
