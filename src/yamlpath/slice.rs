//! Array subscript parsing and index materialization.
//!
//! A subscript is parsed once at compile time into a [`Subscript`]; at
//! evaluation time [`Subscript::positions`] materializes the indices it
//! selects for a sequence of a given length. Out-of-range indices drop
//! silently; a zero step is rejected at parse time.

/// A parsed array subscript: `*` or a union of indices and slices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Subscript {
    /// `*`: every element (or, on a mapping, every value).
    Star,
    /// One or more comma-separated entries, in order.
    Union(Vec<Index>),
}

/// One entry of a subscript union.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Index {
    /// A single index, possibly negative.
    Single(i64),
    /// A `start:end:step` slice with optional parts.
    Slice {
        start: Option<i64>,
        end: Option<i64>,
        step: Option<i64>,
    },
}

impl Subscript {
    /// Parses the text between subscript brackets.
    pub fn parse(text: &str) -> Result<Subscript, String> {
        let trimmed = text.trim();
        if trimmed == "*" {
            return Ok(Subscript::Star);
        }
        let mut entries = Vec::new();
        for part in trimmed.split(',') {
            let part = part.trim();
            if part == "*" {
                return Err(format!("'*' cannot appear in a subscript union: [{}]", trimmed));
            }
            entries.push(parse_index(part, trimmed)?);
        }
        Ok(Subscript::Union(entries))
    }

    /// Whether this subscript is the single star form.
    pub fn is_star(&self) -> bool {
        matches!(self, Subscript::Star)
    }

    /// Materializes the selected positions for a sequence of length `len`,
    /// in selection order, duplicates preserved.
    pub fn positions(&self, len: usize) -> Vec<usize> {
        match self {
            Subscript::Star => (0..len).collect(),
            Subscript::Union(entries) => {
                let mut positions = Vec::new();
                for entry in entries {
                    entry.append_positions(len, &mut positions);
                }
                positions
            }
        }
    }
}

impl Index {
    fn append_positions(&self, len: usize, positions: &mut Vec<usize>) {
        let len = len as i64;
        match *self {
            Index::Single(n) => {
                let n = if n < 0 { len + n } else { n };
                if (0..len).contains(&n) {
                    positions.push(n as usize);
                }
            }
            Index::Slice { start, end, step } => {
                let step = step.unwrap_or(1);
                let start = match start {
                    Some(s) => normalize(s, len, step),
                    None if step > 0 => 0,
                    None => len - 1,
                };
                let end = match end {
                    Some(e) => normalize(e, len, step),
                    None if step > 0 => len,
                    // before index 0, the reverse-iteration endpoint
                    None => normalize(-len - 1, len, step),
                };
                let mut i = start;
                while (step > 0 && i < end) || (step < 0 && i > end) {
                    if (0..len).contains(&i) {
                        positions.push(i as usize);
                    }
                    i += step;
                }
            }
        }
    }
}

/// Adds `len` to negative bounds, then clamps to the enumerable range for
/// the step direction.
fn normalize(bound: i64, len: i64, step: i64) -> i64 {
    let bound = if bound < 0 { bound + len } else { bound };
    if step > 0 {
        bound.clamp(0, len)
    } else {
        bound.clamp(-1, len - 1)
    }
}

fn parse_index(part: &str, whole: &str) -> Result<Index, String> {
    if !part.contains(':') {
        let n = parse_int(part, whole)?;
        return Ok(Index::Single(n));
    }
    let fields: Vec<&str> = part.split(':').collect();
    if fields.len() > 3 {
        return Err(format!("too many ':' in subscript [{}]", whole));
    }
    let parse_field = |field: &str| -> Result<Option<i64>, String> {
        let field = field.trim();
        if field.is_empty() {
            Ok(None)
        } else {
            parse_int(field, whole).map(Some)
        }
    };
    let start = parse_field(fields[0])?;
    let end = parse_field(fields[1])?;
    let step = match fields.get(2) {
        Some(field) => parse_field(field)?,
        None => None,
    };
    if step == Some(0) {
        return Err(format!("subscript step cannot be zero: [{}]", whole));
    }
    Ok(Index::Slice { start, end, step })
}

fn parse_int(text: &str, whole: &str) -> Result<i64, String> {
    text.parse::<i64>()
        .map_err(|_| format!("invalid integer '{}' in subscript [{}]", text, whole))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn positions(text: &str, len: usize) -> Vec<usize> {
        Subscript::parse(text).unwrap().positions(len)
    }

    #[test]
    fn test_star_selects_everything() {
        assert_eq!(positions("*", 4), vec![0, 1, 2, 3]);
        assert_eq!(positions("*", 0), Vec::<usize>::new());
    }

    #[test]
    fn test_single_index() {
        assert_eq!(positions("0", 3), vec![0]);
        assert_eq!(positions("2", 3), vec![2]);
        assert_eq!(positions("3", 3), Vec::<usize>::new());
    }

    #[test]
    fn test_negative_index_counts_from_end() {
        assert_eq!(positions("-1", 3), vec![2]);
        assert_eq!(positions("-3", 3), vec![0]);
        assert_eq!(positions("-4", 3), Vec::<usize>::new());
    }

    #[test]
    fn test_simple_range() {
        assert_eq!(positions("1:3", 5), vec![1, 2]);
        assert_eq!(positions("0:0", 5), Vec::<usize>::new());
    }

    #[test]
    fn test_open_ranges() {
        assert_eq!(positions("2:", 5), vec![2, 3, 4]);
        assert_eq!(positions(":2", 5), vec![0, 1]);
        assert_eq!(positions(":", 5), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_negative_bounds() {
        assert_eq!(positions("-2:", 5), vec![3, 4]);
        assert_eq!(positions(":-2", 5), vec![0, 1, 2]);
        assert_eq!(positions("-4:-1", 5), vec![1, 2, 3]);
    }

    #[test]
    fn test_bounds_clamp_to_length() {
        assert_eq!(positions("2:100", 4), vec![2, 3]);
        assert_eq!(positions("-100:2", 4), vec![0, 1]);
    }

    #[test]
    fn test_stepped_range() {
        assert_eq!(positions("0:5:2", 5), vec![0, 2, 4]);
        assert_eq!(positions("1:5:2", 5), vec![1, 3]);
    }

    #[test]
    fn test_negative_step_reverses() {
        assert_eq!(positions("::-1", 3), vec![2, 1, 0]);
        assert_eq!(positions("2:0:-1", 3), vec![2, 1]);
        assert_eq!(positions("::-2", 5), vec![4, 2, 0]);
    }

    #[test]
    fn test_union_concatenates_and_keeps_duplicates() {
        assert_eq!(positions("0,2", 3), vec![0, 2]);
        assert_eq!(positions("1,1,0", 3), vec![1, 1, 0]);
        assert_eq!(positions("0:2,1:3", 4), vec![0, 1, 1, 2]);
    }

    #[test]
    fn test_union_drops_out_of_range_entries() {
        assert_eq!(positions("9,1", 3), vec![1]);
    }

    #[test]
    fn test_zero_step_is_an_error() {
        let err = Subscript::parse("1:2:0").unwrap_err();
        assert!(err.contains("step"));
    }

    #[test]
    fn test_star_in_union_is_an_error() {
        assert!(Subscript::parse("0,*").is_err());
    }

    #[test]
    fn test_non_integer_is_an_error() {
        assert!(Subscript::parse("a").is_err());
        assert!(Subscript::parse("1:b").is_err());
        assert!(Subscript::parse("1:2:3:4").is_err());
    }

    #[test]
    fn test_whitespace_tolerated() {
        assert_eq!(positions(" 1 : 3 ", 5), vec![1, 2]);
        assert_eq!(positions(" 0 , 2 ", 3), vec![0, 2]);
    }
}
