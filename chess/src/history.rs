//! Move history for display

use std::fmt;
use std::slice;

/// Notation recorded when a side has no moves and passes its turn
pub const PASS: &str = "...";

/// Ordered list of move notations, white's move first
///
/// Entries alternate between white and black. A skipped turn is recorded as [`PASS`].
/// The history is display-only: it is never replayed onto a board.
#[derive(Default, Debug, Clone, Eq, PartialEq)]
pub struct MoveHistory(Vec<String>);

impl MoveHistory {
    pub fn new() -> MoveHistory {
        MoveHistory(Vec::new())
    }

    pub fn push(&mut self, notation: impl Into<String>) {
        self.0.push(notation.into());
    }

    /// Records a skipped turn
    pub fn push_pass(&mut self) {
        self.0.push(PASS.to_string());
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn last(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.0.iter().map(String::as_str)
    }

    /// Returns numbered lines, one per move pair
    ///
    /// # Example
    ///
    /// ```
    /// # use minichess::history::MoveHistory;
    /// #
    /// let mut h = MoveHistory::new();
    /// h.push("e2-e4");
    /// h.push("e7-e5");
    /// h.push("d2-d4");
    /// assert_eq!(
    ///     h.lines().collect::<Vec<_>>(),
    ///     vec!["1. e2-e4 e7-e5", "2. d2-d4"],
    /// );
    /// ```
    pub fn lines(&self) -> Lines<'_> {
        Lines {
            chunks: self.0.chunks(2),
            num: 0,
        }
    }
}

impl<'a> IntoIterator for &'a MoveHistory {
    type Item = &'a String;
    type IntoIter = slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Iterator over numbered history lines
///
/// See docs for [`MoveHistory::lines()`] for more details.
pub struct Lines<'a> {
    chunks: slice::Chunks<'a, String>,
    num: usize,
}

impl<'a> Iterator for Lines<'a> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        let chunk = self.chunks.next()?;
        self.num += 1;
        Some(match chunk {
            [white, black] => format!("{}. {} {}", self.num, white, black),
            [white] => format!("{}. {}", self.num, white),
            _ => unreachable!(),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.chunks.size_hint()
    }
}

impl fmt::Display for MoveHistory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        for (i, m) in self.0.iter().enumerate() {
            if i != 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", m)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lines() {
        let mut h = MoveHistory::new();
        assert_eq!(h.lines().count(), 0);
        assert_eq!(h.to_string(), "");

        h.push("e2-e4");
        assert_eq!(h.lines().collect::<Vec<_>>(), vec!["1. e2-e4"]);
        h.push("e7-e5");
        h.push("d2-d4");
        h.push("e5xd4");
        assert_eq!(
            h.lines().collect::<Vec<_>>(),
            vec!["1. e2-e4 e7-e5", "2. d2-d4 e5xd4"]
        );
        assert_eq!(h.to_string(), "e2-e4 e7-e5 d2-d4 e5xd4");
        assert_eq!(h.len(), 4);
        assert_eq!(h.last(), Some("e5xd4"));

        h.push("a2-a3");
        h.push_pass();
        h.push("a3-a4");
        assert_eq!(
            h.lines().skip(2).collect::<Vec<_>>(),
            vec!["3. a2-a3 ...", "4. a3-a4"]
        );

        h.clear();
        assert!(h.is_empty());
        assert_eq!(h.last(), None);
    }
}
