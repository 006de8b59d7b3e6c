//! Shared HTML building blocks
//!
//! Pages are plain server-rendered HTML assembled with `format!`. Every value
//! that came from a user or the database passes through [`escape`].

use atm_common::db::User;
use axum::response::Html;
use std::fmt::Display;

use crate::form::{FormData, FormErrors};
use crate::pagination::Pagination;

/// Escape text for HTML element content and attribute values
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            other => out.push(other),
        }
    }
    out
}

/// Percent-encode a query string value
pub fn encode_query(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' | b'/' => {
                out.push(byte as char)
            }
            other => out.push_str(&format!("%{:02X}", other)),
        }
    }
    out
}

/// Display an optional value, `-` when missing
pub fn or_dash<T: Display>(value: Option<T>) -> String {
    value
        .map(|v| escape(&v.to_string()))
        .unwrap_or_else(|| "-".to_string())
}

pub fn link(href: &str, text: &str) -> String {
    format!(r#"<a href="{}">{}</a>"#, escape(href), escape(text))
}

/// Full page with navigation bar
pub fn layout(title: &str, user: Option<&User>, body: &str) -> Html<String> {
    let account = match user {
        Some(user) => format!(
            r#"<a href="/add-board/">Add music</a> <span class="user">{}</span> <a href="/logout/">Log out</a>"#,
            escape(&user.username)
        ),
        None => r#"<a href="/login/">Log in</a> <a href="/create-account/">Create account</a>"#
            .to_string(),
    };

    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title} - All Time Music</title>
    <style>
        body {{ font-family: sans-serif; margin: 0; background: #f4f4f4; color: #222; }}
        nav {{ background: #222; padding: 10px 20px; }}
        nav a, nav span {{ color: #eee; margin-right: 12px; text-decoration: none; }}
        main {{ padding: 20px; max-width: 900px; }}
        .errorlist {{ color: #b00; }}
        .message {{ background: #fee; border: 1px solid #b00; padding: 8px; }}
        label {{ display: block; margin-top: 8px; }}
    </style>
</head>
<body>
    <nav>
        <a href="/">All Time Music</a>
        <a href="/bands/alphabetical/">Bands</a>
        <a href="/bands/genres/">Genres</a>
        <a href="/labels/">Labels</a>
        <a href="/albums/last-added/">Albums</a>
        <a href="/reviews/list/">Reviews</a>
        {account}
    </nav>
    <main>
        <h1>{title}</h1>
{body}
    </main>
</body>
</html>"#,
        title = escape(title),
        account = account,
        body = body,
    ))
}

pub fn not_found(what: &str) -> Html<String> {
    layout(
        "Page not found",
        None,
        &format!("<p>{}</p>", escape(what)),
    )
}

pub fn server_error() -> Html<String> {
    layout(
        "Server error",
        None,
        "<p>Something went wrong. Please try again later.</p>",
    )
}

/// Highlighted message box, empty when there is no message
pub fn message(message: Option<&str>) -> String {
    match message {
        Some(text) => format!(r#"<p class="message">{}</p>"#, escape(text)),
        None => String::new(),
    }
}

fn error_list(messages: &[String]) -> String {
    if messages.is_empty() {
        return String::new();
    }
    let items: String = messages
        .iter()
        .map(|m| format!("<li>{}</li>", escape(m)))
        .collect();
    format!(r#"<ul class="errorlist">{}</ul>"#, items)
}

/// Single-line input (`text`, `number`, `date`, `password`, `email`)
pub fn input(
    label: &str,
    name: &str,
    kind: &str,
    form: &FormData,
    errors: &FormErrors,
) -> String {
    // Password inputs are never echoed back
    let value = if kind == "password" { "" } else { form.value(name) };
    format!(
        r#"<label for="id_{name}">{label}</label>{errors}<input type="{kind}" name="{name}" id="id_{name}" value="{value}">"#,
        name = escape(name),
        label = escape(label),
        errors = error_list(errors.field(name)),
        kind = kind,
        value = escape(value),
    )
}

pub fn textarea(label: &str, name: &str, form: &FormData, errors: &FormErrors) -> String {
    format!(
        r#"<label for="id_{name}">{label}</label>{errors}<textarea name="{name}" id="id_{name}" rows="10" cols="40">{value}</textarea>"#,
        name = escape(name),
        label = escape(label),
        errors = error_list(errors.field(name)),
        value = escape(form.raw(name).unwrap_or("")),
    )
}

/// Drop-down with a leading blank option; `options` are (value, label)
pub fn select(
    label: &str,
    name: &str,
    options: &[(String, String)],
    form: &FormData,
    errors: &FormErrors,
) -> String {
    let current = form.value(name);
    let mut html = format!(
        r#"<label for="id_{name}">{label}</label>{errors}<select name="{name}" id="id_{name}"><option value="">---------</option>"#,
        name = escape(name),
        label = escape(label),
        errors = error_list(errors.field(name)),
    );
    for (value, text) in options {
        let selected = if value == current { " selected" } else { "" };
        html.push_str(&format!(
            r#"<option value="{}"{}>{}</option>"#,
            escape(value),
            selected,
            escape(text)
        ));
    }
    html.push_str("</select>");
    html
}

/// Checkbox list for multi-valued fields
pub fn checkboxes(
    label: &str,
    name: &str,
    options: &[(String, String)],
    form: &FormData,
    errors: &FormErrors,
) -> String {
    let mut html = format!(
        "<fieldset><legend>{}</legend>{}",
        escape(label),
        error_list(errors.field(name))
    );
    for (value, text) in options {
        let checked = if form.has_value(name, value) { " checked" } else { "" };
        html.push_str(&format!(
            r#"<label><input type="checkbox" name="{}" value="{}"{}> {}</label>"#,
            escape(name),
            escape(value),
            checked,
            escape(text)
        ));
    }
    html.push_str("</fieldset>");
    html
}

pub fn hidden(name: &str, value: &str) -> String {
    format!(
        r#"<input type="hidden" name="{}" value="{}">"#,
        escape(name),
        escape(value)
    )
}

/// POST form around pre-rendered fields, with form-wide errors on top
pub fn form(action: &str, fields: &[String], errors: &FormErrors, submit: &str) -> String {
    format!(
        r#"<form method="post" action="{action}">
{errors}
{fields}
<p><button type="submit">{submit}</button></p>
</form>"#,
        action = escape(action),
        errors = error_list(errors.non_field()),
        fields = fields.join("\n"),
        submit = escape(submit),
    )
}

/// Previous/next links for a listing
pub fn pagination_nav(base_path: &str, pagination: &Pagination) -> String {
    let mut html = String::from(r#"<div class="pagination">"#);
    if pagination.has_previous() {
        html.push_str(&format!(
            r#"<a href="{base}?page=1">&laquo; first</a> <a href="{base}?page={prev}">previous</a> "#,
            base = escape(base_path),
            prev = pagination.page - 1
        ));
    }
    html.push_str(&format!(
        r#"<span class="current">Page {} of {}.</span>"#,
        pagination.page, pagination.total_pages
    ));
    if pagination.has_next() {
        html.push_str(&format!(
            r#" <a href="{base}?page={next}">next</a> <a href="{base}?page={last}">last &raquo;</a>"#,
            base = escape(base_path),
            next = pagination.page + 1,
            last = pagination.total_pages
        ));
    }
    html.push_str("</div>");
    html
}

/// `<ul>` of pre-rendered items, or a placeholder paragraph when empty
pub fn list(items: &[String], empty: &str) -> String {
    if items.is_empty() {
        return format!("<p>{}</p>", escape(empty));
    }
    let body: String = items.iter().map(|i| format!("<li>{}</li>", i)).collect();
    format!("<ul>{}</ul>", body)
}

/// Definition list of (term, already-escaped value) rows
pub fn details(rows: &[(&str, String)]) -> String {
    let body: String = rows
        .iter()
        .map(|(term, value)| format!("<dt>{}</dt><dd>{}</dd>", escape(term), value))
        .collect();
    format!("<dl>{}</dl>", body)
}

/// Delete confirmation body
pub fn confirm_delete(description: &str, delete_path: &str, cancel_path: &str) -> String {
    format!(
        r#"<p>Are you sure you want to delete {}?</p>
<p><a href="{}">Yes, delete</a> <a href="{}">Cancel</a></p>"#,
        escape(description),
        escape(delete_path),
        escape(cancel_path)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape() {
        assert_eq!(
            escape(r#"<b>"Rock" & 'Roll'</b>"#),
            "&lt;b&gt;&quot;Rock&quot; &amp; &#x27;Roll&#x27;&lt;/b&gt;"
        );
    }

    #[test]
    fn test_encode_query() {
        assert_eq!(encode_query("/band/create/"), "/band/create/");
        assert_eq!(encode_query("/a?b=c d"), "/a%3Fb%3Dc%20d");
    }

    #[test]
    fn test_select_marks_current_value() {
        let form = FormData::new().with("status", "2");
        let html = select(
            "Status",
            "status",
            &[("1".into(), "active".into()), ("2".into(), "closed".into())],
            &form,
            &FormErrors::new(),
        );
        assert!(html.contains(r#"<option value="2" selected>closed</option>"#));
        assert!(html.contains(r#"<option value="1">active</option>"#));
    }

    #[test]
    fn test_password_not_echoed() {
        let form = FormData::new().with("password", "secret1!");
        let html = input("Password", "password", "password", &form, &FormErrors::new());
        assert!(!html.contains("secret1!"));
    }
}
