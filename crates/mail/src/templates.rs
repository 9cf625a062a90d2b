//! HTML bodies for outbound email.

/// Subject and body of the password reset email.
pub fn password_reset(user_name: &str, reset_url: &str, ttl_minutes: i64) -> (String, String) {
    let subject = "Reset your password".to_string();
    let html = format!(
        "<p>Hi {name},</p>\
         <p>We received a request to reset your password. \
         Use the link below to choose a new one. It expires in {ttl_minutes} minutes.</p>\
         <p><a href=\"{url}\">Reset password</a></p>\
         <p>If you did not request this, you can ignore this email.</p>",
        name = escape(user_name),
        url = escape(reset_url),
    );
    (subject, html)
}

/// Minimal HTML escaping for interpolated text and attribute values.
fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}
