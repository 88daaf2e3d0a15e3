//! Minimal HTML helpers shared by the site pages and the results renderer.

use std::fmt::Write as _;

/// Escape text for inclusion in element bodies and quoted attribute values.
pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Wrap a page body in the shared document shell. `title` is escaped, `body` is trusted markup.
pub fn document(title: &str, body: &str) -> String {
    let mut html = String::with_capacity(body.len() + 512);
    html.push_str("<!DOCTYPE html>\n<html lang=\"pt-BR\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    writeln!(html, "<title>{}</title>", escape_html(title)).expect("document title");
    html.push_str("</head>\n<body>\n<main>\n");
    html.push_str(body);
    html.push_str("</main>\n</body>\n</html>\n");
    html
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup_characters() {
        assert_eq!(
            escape_html("<b>\"Fazenda\" & 'Sítio'</b>"),
            "&lt;b&gt;&quot;Fazenda&quot; &amp; &#39;Sítio&#39;&lt;/b&gt;"
        );
    }

    #[test]
    fn document_escapes_title_but_not_body() {
        let html = document("Resultado <1>", "<p>ok</p>");
        assert!(html.contains("<title>Resultado &lt;1&gt;</title>"));
        assert!(html.contains("<p>ok</p>"));
        assert!(html.starts_with("<!DOCTYPE html>"));
    }
}
