//! Database queries, one module per table family

pub mod albums;
pub mod bands;
pub mod genres;
pub mod labels;
pub mod memberships;
pub mod musicians;
pub mod reviews;
pub mod sessions;
pub mod users;

/// Escape `%`, `_` and `\` for a `LIKE ... ESCAPE '\'` pattern
pub(crate) fn like_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_escape() {
        assert_eq!(like_escape("100%_raw\\"), "100\\%\\_raw\\\\");
        assert_eq!(like_escape("plain"), "plain");
    }
}
