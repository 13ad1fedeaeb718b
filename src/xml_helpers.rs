//! Shared attribute helpers for reading XHTML tables with quick-xml.
//!
//! Attribute names are matched case-insensitively since HTML authors mix
//! `colspan` and `colSpan` freely.

use quick_xml::events::BytesStart;

/// Extract a string attribute value by key (case-insensitive).
///
/// Returns `None` if the attribute is missing or its value cannot be unescaped.
pub fn attr_string(e: &BytesStart, key: &[u8]) -> Option<String> {
    for attr in e.attributes().flatten() {
        if attr.key.local_name().as_ref().eq_ignore_ascii_case(key) {
            return attr.unescape_value().ok().map(|v| v.into_owned());
        }
    }
    None
}

/// Extract a `u32` attribute value by key.
pub fn attr_u32(e: &BytesStart, key: &[u8]) -> Option<u32> {
    attr_string(e, key).and_then(|s| s.trim().parse().ok())
}

/// Pixel value of `property` inside an inline `style` attribute.
///
/// `style="width: 120px; color: red"` gives `Some(120)` for `width`.
/// Fractional pixels are rounded; other units are ignored.
pub fn style_px(e: &BytesStart, property: &str) -> Option<u32> {
    let style = attr_string(e, b"style")?;
    style.split(';').find_map(|decl| {
        let (name, value) = decl.split_once(':')?;
        if !name.trim().eq_ignore_ascii_case(property) {
            return None;
        }
        parse_px(value)
    })
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn parse_px(value: &str) -> Option<u32> {
    let number = value.trim().strip_suffix("px")?.trim();
    let v: f64 = number.parse().ok()?;
    if !v.is_finite() || v < 0.0 || v > f64::from(u32::MAX) {
        return None;
    }
    Some(v.round() as u32)
}

/// Get the lowercase local element name.
///
/// Returns empty string if not valid UTF-8.
#[inline]
pub fn local_name_string(e: &BytesStart) -> String {
    let bytes = e.local_name();
    std::str::from_utf8(bytes.as_ref())
        .unwrap_or("")
        .to_ascii_lowercase()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn make_start(xml: &str) -> BytesStart<'_> {
        // Strip < and > / /> to get just the tag content
        let content = xml
            .trim_start_matches('<')
            .trim_end_matches('>')
            .trim_end_matches('/')
            .trim_end();
        BytesStart::from_content(content, content.find(' ').unwrap_or(content.len()))
    }

    #[test]
    fn test_attr_string_ignores_case() {
        let e = make_start(r#"<td colSpan="2" title="a &amp; b">"#);
        assert_eq!(attr_string(&e, b"colspan"), Some("2".to_string()));
        assert_eq!(attr_string(&e, b"title"), Some("a & b".to_string()));
        assert_eq!(attr_string(&e, b"missing"), None);
    }

    #[test]
    fn test_attr_u32() {
        let e = make_start(r#"<td rowspan=" 3 " colspan="x">"#);
        assert_eq!(attr_u32(&e, b"rowspan"), Some(3));
        assert_eq!(attr_u32(&e, b"colspan"), None);
    }

    #[test]
    fn test_style_px() {
        let e = make_start(r#"<col style="color: red; Width: 120.4px"/>"#);
        assert_eq!(style_px(&e, "width"), Some(120));
        assert_eq!(style_px(&e, "height"), None);

        let em = make_start(r#"<col style="width: 3em"/>"#);
        assert_eq!(style_px(&em, "width"), None);
    }

    #[test]
    fn test_local_name_lowercased() {
        let e = make_start("<TD>");
        assert_eq!(local_name_string(&e), "td");
    }
}
