/// Оборачивает значение в кавычки, если в нём есть запятая, кавычка или перевод строки.
/// Внутренние кавычки удваиваются.
pub(crate) fn escape_csv(s: &str) -> String {
    if s.contains([',', '"', '\n']) {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

pub(crate) fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_csv() {
        assert_eq!(escape_csv("Rafael Nadal"), "Rafael Nadal");
        assert_eq!(escape_csv("Nadal, Rafael"), "\"Nadal, Rafael\"");
        assert_eq!(escape_csv("Rafa \"the King\""), "\"Rafa \"\"the King\"\"\"");
        assert_eq!(escape_csv("a\nb"), "\"a\nb\"");
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("O'Neil & <Co> \"x\""), "O&apos;Neil &amp; &lt;Co&gt; &quot;x&quot;");
    }
}
