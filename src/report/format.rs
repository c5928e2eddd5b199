//! Number and text formatting shared by the renderers.

/// Formats a count with comma thousands separators: `6000` → `"6,000"`.
pub fn thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Formats a percentage with one decimal: `6.92` → `"6.9%"`.
pub fn percent(value: f64) -> String {
    let value = if value.is_finite() { value } else { 0.0 };
    format!("{:.1}%", value)
}

/// Turns a campaign slug into a title: `"erify-vip-launch"` → `"Erify Vip Launch"`.
pub fn campaign_title(slug: &str) -> String {
    slug.split(['-', '_', ' '])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Escapes text for inclusion in HTML element content or attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thousands() {
        assert_eq!(thousands(0), "0");
        assert_eq!(thousands(999), "999");
        assert_eq!(thousands(1000), "1,000");
        assert_eq!(thousands(45678), "45,678");
        assert_eq!(thousands(1234567), "1,234,567");
    }

    #[test]
    fn test_percent_one_decimal() {
        assert_eq!(percent(6.92), "6.9%");
        assert_eq!(percent(40.0), "40.0%");
        assert_eq!(percent(f64::NAN), "0.0%");
    }

    #[test]
    fn test_campaign_title() {
        assert_eq!(campaign_title("erify-vip-launch"), "Erify Vip Launch");
        assert_eq!(campaign_title("supreme4-branding"), "Supreme4 Branding");
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html("<b>\"Tom & Jerry's\"</b>"),
            "&lt;b&gt;&quot;Tom &amp; Jerry&#39;s&quot;&lt;/b&gt;"
        );
    }
}
