use crate::http::Response;

/// Copy for the page served when neither the network nor any cache can
/// answer a page request. Defaults to Korean, matching the rest of the app.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OfflinePage {
    pub lang: String,
    pub title: String,
    pub icon: String,
    pub heading: String,
    pub message: String,
    pub retry_label: String,
}

impl Default for OfflinePage {
    fn default() -> Self {
        Self {
            lang: "ko".to_string(),
            title: "오프라인".to_string(),
            icon: "📴".to_string(),
            heading: "오프라인 상태입니다".to_string(),
            message: "인터넷 연결을 확인해 주세요.".to_string(),
            retry_label: "다시 시도".to_string(),
        }
    }
}

impl OfflinePage {
    pub fn english() -> Self {
        Self {
            lang: "en".to_string(),
            title: "Offline".to_string(),
            icon: "📴".to_string(),
            heading: "You are offline".to_string(),
            message: "Please check your internet connection.".to_string(),
            retry_label: "Try again".to_string(),
        }
    }

    /// Self-contained HTML document: inline style, no external resources.
    pub fn render(&self) -> String {
        format!(
            concat!(
                "<!DOCTYPE html><html lang=\"{lang}\"><head>",
                "<meta charset=\"utf-8\">",
                "<meta name=\"viewport\" content=\"width=device-width,initial-scale=1\">",
                "<title>{title}</title>",
                "<style>body{{font-family:system-ui;padding:2rem;text-align:center}}",
                ".icon{{font-size:4rem;margin-bottom:1rem}}</style>",
                "</head><body>",
                "<div class=\"icon\">{icon}</div>",
                "<h1>{heading}</h1>",
                "<p>{message}</p>",
                "<button onclick=\"location.reload()\">{retry}</button>",
                "</body></html>"
            ),
            lang = escape_html(&self.lang),
            title = escape_html(&self.title),
            icon = escape_html(&self.icon),
            heading = escape_html(&self.heading),
            message = escape_html(&self.message),
            retry = escape_html(&self.retry_label),
        )
    }

    pub fn response(&self) -> Response {
        Response::html(self.render())
    }
}

fn escape_html(s: &str) -> String {
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
    fn test_default_page_is_korean_and_self_contained() {
        let html = OfflinePage::default().render();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<meta charset=\"utf-8\">"));
        assert!(html.contains("name=\"viewport\""));
        assert!(html.contains("오프라인 상태입니다"));
        assert!(html.contains("location.reload()"));
        assert!(!html.contains("src="));
        assert!(!html.contains("href="));
    }

    #[test]
    fn test_copy_is_escaped() {
        let page = OfflinePage {
            heading: "<script>x</script>".to_string(),
            ..OfflinePage::english()
        };
        let html = page.render();
        assert!(html.contains("&lt;script&gt;x&lt;/script&gt;"));
        assert!(!html.contains("<script>"));
    }
}
