/// Escape text so it can be placed into HTML markup
///
/// Replaces the five characters that carry meaning in markup with their
/// entities. Every other character is copied through unchanged.
///
/// # Arguments
/// * `text` - The text to escape; `None` is treated as empty
///
/// # Returns
/// * `String` - The escaped text
///
/// # Examples
/// ```
/// use cheatsheeter::escape::escape_html;
///
/// assert_eq!(escape_html("<b>\"git\" & 'svn'</b>"),
///            "&lt;b&gt;&quot;git&quot; &amp; &#039;svn&#039;&lt;/b&gt;");
/// assert_eq!(escape_html(None::<&str>), "");
/// ```
pub fn escape_html<'a>(text: impl Into<Option<&'a str>>) -> String {
    let Some(text) = text.into() else {
        return String::new();
    };

    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#039;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
