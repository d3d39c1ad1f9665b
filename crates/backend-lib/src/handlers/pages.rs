//! Minimal HTML forms. Error text is always one of the fixed sanitized
//! messages; the only user-supplied value rendered is the escaped username.
use axum::response::Html;

use crate::config::Settings;

pub fn login_page(settings: &Settings, error: Option<&str>, registered: bool) -> Html<String> {
    let notice = if registered {
        "<p class=\"notice\">Registration successful. Please log in.</p>"
    } else {
        ""
    };
    let body = format!(
        r#"{notice}{error}<form method="post" action="{action}">
<label>Username <input name="username" autocomplete="username" required></label>
<label>Password <input name="password" type="password" autocomplete="current-password" required></label>
<button type="submit">Log in</button>
</form>
<p><a href="{register}">Create an account</a></p>"#,
        error = error_block(error),
        action = settings.url_for("/login"),
        register = settings.url_for("/register"),
    );
    layout("User Login", &body)
}

pub fn register_page(settings: &Settings, error: Option<&str>) -> Html<String> {
    let body = format!(
        r#"{error}<form method="post" action="{action}">
<label>Username <input name="username" autocomplete="username" required></label>
<label>Email <input name="email" type="email" autocomplete="email" required></label>
<label>Password <input name="password" type="password" autocomplete="new-password" required></label>
<label>Confirm password <input name="confirm_password" type="password" autocomplete="new-password" required></label>
<button type="submit">Register</button>
</form>
<p><a href="{login}">Already registered? Log in</a></p>"#,
        error = error_block(error),
        action = settings.url_for("/register"),
        login = settings.url_for("/login"),
    );
    layout("User Registration", &body)
}

pub fn home_page(settings: &Settings, username: &str) -> Html<String> {
    let body = format!(
        r#"<p>Logged in as <strong>{}</strong>.</p>
<p><a href="{}">Log out</a></p>"#,
        escape_html(username),
        settings.url_for("/logout"),
    );
    layout("Home", &body)
}

fn error_block(error: Option<&str>) -> String {
    error
        .map(|message| format!("<p class=\"error\">{}</p>\n", escape_html(message)))
        .unwrap_or_default()
}

fn layout(title: &str, body: &str) -> Html<String> {
    Html(format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head><meta charset=\"utf-8\"><title>{title}</title></head>\n<body>\n<h1>{title}</h1>\n{body}\n</body>\n</html>\n"
    ))
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
