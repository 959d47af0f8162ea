//! Terminal pages rendered to the browser once the flow concludes.

pub const SUCCESS_HTML: &str = r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"><title>Signed in</title></head>
<body style="font-family: sans-serif; text-align: center; padding-top: 4em;">
<h1>Signed in via your OIDC provider</h1>
<p>You can now close this window and return to the terminal.</p>
</body>
</html>"#;

const GENERIC_SUMMARY: &str = "Authentication error";
const GENERIC_DETAIL: &str = "There was an error authenticating.";

/// Render the failure page for a classified error.
///
/// An all-empty pair (classification failed entirely) falls back to generic
/// text so the browser never shows a blank page.
pub fn error_html(summary: &str, detail: &str) -> String {
    let (summary, detail) = if summary.is_empty() && detail.is_empty() {
        (GENERIC_SUMMARY, GENERIC_DETAIL)
    } else {
        (summary, detail)
    };
    format!(
        r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"><title>Sign-in failed</title></head>
<body style="font-family: sans-serif; text-align: center; padding-top: 4em;">
<h1>{}</h1>
<p>{}</p>
<p>Please check the terminal for more information.</p>
</body>
</html>"#,
        escape(summary),
        escape(detail)
    )
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
