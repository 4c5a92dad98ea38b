use crate::row::Row;

/// Finds the first occurrence of `pattern` at or after (`start_row`, `start_col`), searching
/// to the end of the document and then wrapping around from the first line up to (but not
/// including) `start_row`. Matching is exact and case-sensitive. Returns (row, col) of the
/// match start.
pub fn find_next(
    rows: &[Row],
    pattern: &str,
    start_row: usize,
    start_col: usize,
) -> Option<(usize, usize)> {
    if pattern.is_empty() || start_row >= rows.len() {
        return None;
    }

    let forward = rows
        .iter()
        .enumerate()
        .skip(start_row)
        .map(|(y, row)| (y, if y == start_row { start_col } else { 0 }, row));
    let wrapped = rows
        .iter()
        .enumerate()
        .take(start_row)
        .map(|(y, row)| (y, 0, row));

    forward
        .chain(wrapped)
        .find_map(|(y, from, row)| row.find_from(pattern, from).map(|x| (y, x)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(lines: &[&str]) -> Vec<Row> {
        lines.iter().map(|l| Row::new(*l)).collect()
    }

    #[test]
    fn skips_match_before_start_column() {
        let r = rows(&["foo bar", "baz foo"]);
        assert_eq!(find_next(&r, "foo", 0, 1), Some((1, 4)));
        assert_eq!(find_next(&r, "bar", 0, 1), Some((0, 4)));
    }

    #[test]
    fn wraps_around_to_top() {
        let r = rows(&["needle", "hay", "hay"]);
        assert_eq!(find_next(&r, "needle", 1, 1), Some((0, 0)));
        assert_eq!(find_next(&r, "needle", 0, 1), None);
    }

    #[test]
    fn case_sensitive_and_empty_pattern() {
        let r = rows(&["Foo"]);
        assert_eq!(find_next(&r, "foo", 0, 0), None);
        assert_eq!(find_next(&r, "Foo", 0, 0), Some((0, 0)));
        assert_eq!(find_next(&r, "", 0, 0), None);
    }

    #[test]
    fn start_column_past_end_of_line() {
        let r = rows(&["ab", "ab"]);
        assert_eq!(find_next(&r, "ab", 0, 3), Some((1, 0)));
        assert_eq!(find_next(&r, "ab", 1, 3), Some((0, 0)));
    }
}
