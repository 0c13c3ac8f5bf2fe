//! Splitting of free-text form fields into entries
//!
//! Recipients and amounts are typed as comma or newline separated lists.

/// Split `raw` on any run of commas and/or newlines, trimming every piece
/// and dropping the ones left empty. Order is preserved.
pub fn split_entries(raw: &str) -> Vec<String> {
    raw.split([',', '\n'])
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", &[])]
    #[case("  \n , \n", &[])]
    #[case("0xA", &["0xA"])]
    #[case("0xA, 0xB", &["0xA", "0xB"])]
    #[case("0xA\n0xB\n\n0xC", &["0xA", "0xB", "0xC"])]
    #[case("10,,20\n,30", &["10", "20", "30"])]
    #[case("10\r\n20\r\n", &["10", "20"])]
    fn test_split_entries(#[case] raw: &str, #[case] expected: &[&str]) {
        assert_eq!(split_entries(raw), expected);
    }

    #[test]
    fn test_inner_whitespace_kept() {
        // only separators split, spaces inside an entry stay
        assert_eq!(split_entries("1 000, 2"), vec!["1 000", "2"]);
    }
}
