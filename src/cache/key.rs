/// 查询缓存键：小写、去首尾空白、内部连续空白合并为一个空格
pub fn normalize_query(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folds_case_and_whitespace() {
        assert_eq!(normalize_query("  Foo   Bar "), "foo bar");
        assert_eq!(normalize_query("foo\t\nbar"), "foo bar");
        assert_eq!(
            normalize_query("HEALTHCARE lobbyists in Ohio"),
            "healthcare lobbyists in ohio"
        );
    }

    #[test]
    fn blank_query_normalizes_to_empty() {
        assert_eq!(normalize_query(""), "");
        assert_eq!(normalize_query("   "), "");
    }
}
