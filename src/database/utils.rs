use std::sync::LazyLock;

use regex::Regex;

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\?").unwrap());

/// Collapses whitespace and rewrites `?` placeholders to Postgres `$n`.
pub fn sql(query: &str) -> String {
    let cleaned = query.split_whitespace().collect::<Vec<&str>>().join(" ");
    let mut param_index = 0;
    PLACEHOLDER
        .replace_all(&cleaned, |_: &regex::Captures| {
            param_index += 1;
            format!("${}", param_index)
        })
        .into_owned()
}

/// Escapes `%`, `_` and `\` so user input matches literally inside ILIKE.
pub fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholders_are_numbered_in_order() {
        let query = sql(r#"
            SELECT id FROM employees
            WHERE status = ? AND (full_name ILIKE ? OR employee_id ILIKE ?)
        "#);
        assert_eq!(
            query,
            "SELECT id FROM employees WHERE status = $1 AND (full_name ILIKE $2 OR employee_id ILIKE $3)"
        );
    }

    #[test]
    fn like_wildcards_are_escaped() {
        assert_eq!(escape_like("ali"), "ali");
        assert_eq!(escape_like("50%_a\\b"), "50\\%\\_a\\\\b");
    }
}
