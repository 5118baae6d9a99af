//! Markup writer
//!
//! Append-only HTML buffer. Everything interpolated from data goes through
//! `esc`, so notes and names can carry `<`, `&` or quotes safely.

pub struct Html {
    buf: String,
}

impl Html {
    pub fn new() -> Self {
        Self { buf: String::with_capacity(4 * 1024) }
    }

    pub fn push<S: AsRef<str>>(&mut self, s: S) {
        self.buf.push_str(s.as_ref());
    }

    /// Escaped text content.
    pub fn text(&mut self, s: &str) {
        self.buf.push_str(&esc(s));
    }

    /// ` name="value"` with the value escaped.
    pub fn attr(&mut self, name: &str, value: &str) {
        self.buf.push(' ');
        self.buf.push_str(name);
        self.buf.push_str("=\"");
        self.buf.push_str(&esc(value));
        self.buf.push('"');
    }

    pub fn finish(self) -> String {
        self.buf
    }
}

impl Default for Html {
    fn default() -> Self {
        Self::new()
    }
}

pub fn esc(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_esc() {
        assert_eq!(esc(r#"<b>"HP5" & 'FP4'</b>"#), "&lt;b&gt;&quot;HP5&quot; &amp; &#39;FP4&#39;&lt;/b&gt;");
    }

    #[test]
    fn test_attr_escapes_value() {
        let mut w = Html::new();
        w.push("<img");
        w.attr("alt", "A \"quoted\" name");
        w.push(">");
        assert_eq!(w.finish(), r#"<img alt="A &quot;quoted&quot; name">"#);
    }
}
