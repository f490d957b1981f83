use std::fmt::{self, Write};

pub const SUCCESS_TEXT: &str = "Nachricht versendet";
pub const FAILURE_TEXT: &str = "Nachricht konnte nicht versendet werden";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerKind {
    Success,
    Error,
}

impl BannerKind {
    pub fn css_class(self) -> &'static str {
        match self {
            BannerKind::Success => "success",
            BannerKind::Error => "error",
        }
    }
}

/// Notice shown under the form after a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub text: String,
    pub kind: BannerKind,
}

impl Banner {
    pub fn success() -> Self {
        Banner {
            text: SUCCESS_TEXT.to_string(),
            kind: BannerKind::Success,
        }
    }

    pub fn error() -> Self {
        Banner {
            text: FAILURE_TEXT.to_string(),
            kind: BannerKind::Error,
        }
    }
}

const PAGE_HEAD: &str = r#"<!DOCTYPE html>
<html lang="de">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Message Publisher</title>
    <style>
        body {
            font-family: Arial, sans-serif;
            max-width: 600px;
            margin: 50px auto;
            padding: 20px;
            background-color: #f5f5f5;
        }
        .container {
            background-color: white;
            padding: 30px;
            border-radius: 8px;
            box-shadow: 0 2px 4px rgba(0, 0, 0, 0.1);
        }
        h1 { color: #333; text-align: center; }
        form { display: flex; flex-direction: column; }
        label { margin-bottom: 8px; font-weight: bold; color: #555; }
        textarea {
            padding: 10px;
            margin-bottom: 15px;
            border: 1px solid #ddd;
            border-radius: 4px;
            font-family: Arial, sans-serif;
            font-size: 14px;
            resize: vertical;
            min-height: 100px;
        }
        input[type="submit"] {
            padding: 12px;
            background-color: #4CAF50;
            color: white;
            border: none;
            border-radius: 4px;
            cursor: pointer;
            font-size: 16px;
            font-weight: bold;
        }
        input[type="submit"]:hover { background-color: #45a049; }
        .message { margin-top: 20px; padding: 15px; border-radius: 4px; text-align: center; }
        .success { background-color: #d4edda; color: #155724; border: 1px solid #c3e6cb; }
        .error { background-color: #f8d7da; color: #721c24; border: 1px solid #f5c6cb; }
    </style>
</head>
<body>
    <div class="container">
        <h1>Message Publisher</h1>
        <form method="POST" action="/publish">
            <label for="message">Nachricht:</label>
            <textarea id="message" name="message" required placeholder="Geben Sie Ihre Nachricht hier ein..."></textarea>
            <input type="submit" value="Senden">
        </form>
"#;

const PAGE_TAIL: &str = r#"    </div>
</body>
</html>
"#;

pub fn render_form(banner: Option<&Banner>) -> Result<String, fmt::Error> {
    let mut html = String::with_capacity(PAGE_HEAD.len() + PAGE_TAIL.len() + 128);
    html.push_str(PAGE_HEAD);
    if let Some(banner) = banner {
        writeln!(
            html,
            r#"        <div class="message {}">{}</div>"#,
            banner.kind.css_class(),
            html_escape::encode_text(&banner.text)
        )?;
    }
    html.push_str(PAGE_TAIL);
    Ok(html)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_form_has_no_banner() {
        let html = render_form(None).unwrap();
        assert!(html.contains(r#"<form method="POST" action="/publish">"#));
        assert!(html.contains(r#"name="message""#));
        assert!(!html.contains(r#"<div class="message"#));
    }

    #[test]
    fn success_banner() {
        let html = render_form(Some(&Banner::success())).unwrap();
        assert!(html.contains(r#"<div class="message success">Nachricht versendet</div>"#));
    }

    #[test]
    fn error_banner() {
        let html = render_form(Some(&Banner::error())).unwrap();
        assert!(html.contains(r#"class="message error""#));
        assert!(html.contains(FAILURE_TEXT));
    }

    #[test]
    fn banner_text_is_escaped() {
        let banner = Banner {
            text: "<script>alert(1)</script>".to_string(),
            kind: BannerKind::Error,
        };
        let html = render_form(Some(&banner)).unwrap();
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
    }
}
