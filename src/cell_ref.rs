//! A1-style references to grid positions and rectangular shapes.
//!
//! Columns are letters (`A` = 0), rows are 1-based numbers (`1` = 0).

use crate::types::SelectionShape;

/// Parse a reference like "B3" into `(col, row)`, both 0-indexed.
pub fn parse_cell_ref(cell_ref: &str) -> Option<(u32, u32)> {
    let cell_ref = cell_ref.trim();
    let split = cell_ref.find(|c: char| !c.is_ascii_alphabetic())?;
    let (letters, digits) = cell_ref.split_at(split);
    if letters.is_empty() || digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let mut col: u32 = 0;
    for b in letters.bytes() {
        let v = u32::from(b.to_ascii_uppercase() - b'A') + 1;
        col = col.checked_mul(26)?.checked_add(v)?;
    }
    let row: u32 = digits.parse().ok()?;
    if row == 0 {
        return None;
    }
    Some((col - 1, row - 1))
}

/// Parse "A1:B2" (or a single "A1") into a shape. Corners may be given in
/// any order.
pub fn parse_shape(range: &str) -> Option<SelectionShape> {
    match range.split_once(':') {
        Some((start, end)) => {
            let (x1, y1) = parse_cell_ref(start)?;
            let (x2, y2) = parse_cell_ref(end)?;
            Some(SelectionShape::new(x1, y1, x2, y2))
        }
        None => {
            let (x, y) = parse_cell_ref(range)?;
            Some(SelectionShape::single(x, y))
        }
    }
}

/// Convert a 0-indexed column to its letters (0 -> "A", 26 -> "AA").
pub fn col_to_letter(col: u32) -> String {
    let mut result = String::new();
    let mut n = u64::from(col) + 1;
    while n > 0 {
        n -= 1;
        let digit = u8::try_from(n % 26).unwrap_or(0);
        result.insert(0, char::from(b'A' + digit));
        n /= 26;
    }
    result
}

pub fn format_cell_ref(col: u32, row: u32) -> String {
    format!("{}{}", col_to_letter(col), u64::from(row) + 1)
}

/// Format a shape as "A1:B2", or "A1" for a single position.
pub fn format_shape(shape: &SelectionShape) -> String {
    let start = format_cell_ref(shape.from_x, shape.from_y);
    if shape.columns() == 1 && shape.rows() == 1 {
        start
    } else {
        format!("{start}:{}", format_cell_ref(shape.to_x, shape.to_y))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("A1", Some((0, 0)))]
    #[test_case("c2", Some((2, 1)))]
    #[test_case("AA10", Some((26, 9)))]
    #[test_case("A0", None)]
    #[test_case("12", None)]
    #[test_case("B", None)]
    #[test_case("B2x", None)]
    fn test_parse_cell_ref(input: &str, expected: Option<(u32, u32)>) {
        assert_eq!(parse_cell_ref(input), expected);
    }

    #[test_case(0, "A")]
    #[test_case(25, "Z")]
    #[test_case(26, "AA")]
    #[test_case(701, "ZZ")]
    #[test_case(702, "AAA")]
    fn test_col_to_letter(col: u32, expected: &str) {
        assert_eq!(col_to_letter(col), expected);
    }

    #[test]
    fn test_shape_round_trip() {
        let shape = parse_shape("B3:A1").unwrap();
        assert_eq!(shape, SelectionShape::new(0, 0, 1, 2));
        assert_eq!(format_shape(&shape), "A1:B3");
        assert_eq!(format_shape(&parse_shape("C4").unwrap()), "C4");
        assert_eq!(parse_shape("A1:"), None);
    }
}
