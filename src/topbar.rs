use tracing::trace;

use crate::error::{OptionsError, OptionsResult};

/// Highest addressable topbar line
pub const MAX_LINES: usize = 99;

/// Horizontal placement within a topbar line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    Left,
    Center,
    Right,
}

impl Position {
    /// Parse the placement word of a composite key. `centre` is accepted
    /// as a spelling alias for `center`.
    pub fn from_suffix(word: &str) -> Option<Position> {
        match word {
            "left" => Some(Position::Left),
            "center" | "centre" => Some(Position::Center),
            "right" => Some(Position::Right),
            _ => None,
        }
    }

    fn slot(self) -> usize {
        match self {
            Position::Left => 0,
            Position::Center => 1,
            Position::Right => 2,
        }
    }
}

/// One status line: left, center and right text slots.
#[derive(Debug, Clone, Default)]
pub struct TopbarLine {
    slots: [String; 3],
}

impl TopbarLine {
    pub fn get(&self, position: Position) -> &str {
        &self.slots[position.slot()]
    }
}

/// The growable status-bar layout grid.
///
/// Lines are 1-based for callers. Writing past the end appends empty lines;
/// reading a line or slot that was never written yields an empty string.
#[derive(Debug, Clone, Default)]
pub struct Topbar {
    lines: Vec<TopbarLine>,
}

impl Topbar {
    pub fn new() -> Topbar {
        Topbar::default()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub(crate) fn clear(&mut self) {
        self.lines.clear();
    }

    /// Set one slot, growing the grid as needed. `line` is 1-based and must
    /// be within 1..=99; nothing is mutated on a range failure.
    pub fn write(&mut self, line: usize, position: Position, text: &str) -> OptionsResult<()> {
        if line == 0 || line > MAX_LINES {
            return Err(OptionsError::InvalidTopbarIndex(line.to_string()));
        }

        while self.lines.len() < line {
            self.lines.push(TopbarLine::default());
        }

        trace!("TOPBAR: line {} {:?} = {:?}", line, position, text);
        self.lines[line - 1].slots[position.slot()] = text.to_string();
        Ok(())
    }

    /// Read one slot. Lines outside the grid read as empty, not as errors.
    pub fn get(&self, line: usize, position: Position) -> &str {
        match line.checked_sub(1).and_then(|i| self.lines.get(i)) {
            Some(l) => l.get(position),
            None => "",
        }
    }
}

/// Outcome of matching a setting key against the composite topbar grammar
/// (`topbar` + 1-2 digits + `.` + placement word).
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum KeyMatch {
    /// Not a grid key; treat as an ordinary setting. Keys like
    /// `topbarborders` land here: no digit follows the prefix.
    NoMatch,
    /// Grid-shaped (digits follow `topbar`) but the index or placement is
    /// bad. Grid-shaped keys never fall through to option lookup.
    Invalid(OptionsError),
    /// Valid composite key: 1-based line and placement.
    Line(usize, Position),
}

pub(crate) fn match_key(key: &str) -> KeyMatch {
    let rest = match key.strip_prefix("topbar") {
        Some(rest) => rest,
        None => return KeyMatch::NoMatch,
    };

    let digits: &str = &rest[..rest
        .bytes()
        .take_while(|b| b.is_ascii_digit())
        .count()];
    if digits.is_empty() {
        return KeyMatch::NoMatch;
    }
    if digits.len() > 2 || digits == "0" {
        return KeyMatch::Invalid(OptionsError::InvalidTopbarIndex(digits.to_string()));
    }
    let line: usize = digits.parse().unwrap_or(0);

    let suffix = &rest[digits.len()..];
    if suffix.is_empty() {
        return KeyMatch::Invalid(OptionsError::MissingTopbarPosition);
    }
    let word = match suffix.strip_prefix('.') {
        Some(word) => word,
        None => return KeyMatch::Invalid(OptionsError::InvalidTopbarPosition(suffix.to_string())),
    };

    match Position::from_suffix(word) {
        Some(position) => KeyMatch::Line(line, position),
        None => KeyMatch::Invalid(OptionsError::InvalidTopbarPosition(word.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_and_read_back() {
        let mut topbar = Topbar::new();
        topbar.write(1, Position::Left, "%artist%").unwrap();
        topbar.write(1, Position::Right, "%volume%").unwrap();

        assert_eq!(topbar.get(1, Position::Left), "%artist%");
        assert_eq!(topbar.get(1, Position::Center), "");
        assert_eq!(topbar.get(1, Position::Right), "%volume%");
        assert_eq!(topbar.len(), 1);
    }

    #[test]
    fn test_write_grows_grid_and_preserves_neighbors() {
        let mut topbar = Topbar::new();
        topbar.write(4, Position::Center, "before").unwrap();
        topbar.write(5, Position::Right, "hello").unwrap();

        assert_eq!(topbar.len(), 5);
        assert_eq!(topbar.get(4, Position::Center), "before");
        assert_eq!(topbar.get(5, Position::Right), "hello");
        // Intermediate lines exist but are empty
        assert_eq!(topbar.get(2, Position::Left), "");
    }

    #[test]
    fn test_write_rejects_out_of_range_lines() {
        let mut topbar = Topbar::new();
        assert_eq!(
            topbar.write(0, Position::Left, "x"),
            Err(OptionsError::InvalidTopbarIndex("0".to_string()))
        );
        assert_eq!(
            topbar.write(100, Position::Left, "x"),
            Err(OptionsError::InvalidTopbarIndex("100".to_string()))
        );
        // Failed writes mutate nothing
        assert!(topbar.is_empty());
    }

    #[test]
    fn test_read_outside_grid_is_empty_not_an_error() {
        let topbar = Topbar::new();
        assert_eq!(topbar.get(0, Position::Left), "");
        assert_eq!(topbar.get(7, Position::Right), "");
    }

    #[test]
    fn test_match_key_valid_forms() {
        assert_eq!(match_key("topbar1.left"), KeyMatch::Line(1, Position::Left));
        assert_eq!(
            match_key("topbar99.right"),
            KeyMatch::Line(99, Position::Right)
        );
        assert_eq!(
            match_key("topbar2.center"),
            KeyMatch::Line(2, Position::Center)
        );
        assert_eq!(
            match_key("topbar2.centre"),
            KeyMatch::Line(2, Position::Center)
        );
    }

    #[test]
    fn test_match_key_ordinary_settings_pass_through() {
        assert_eq!(match_key("topbarborders"), KeyMatch::NoMatch);
        assert_eq!(match_key("topbarspace"), KeyMatch::NoMatch);
        assert_eq!(match_key("showtopbar"), KeyMatch::NoMatch);
        assert_eq!(match_key("columns"), KeyMatch::NoMatch);
        assert_eq!(match_key("topbar"), KeyMatch::NoMatch);
    }

    #[test]
    fn test_match_key_index_errors() {
        assert_eq!(
            match_key("topbar100.left"),
            KeyMatch::Invalid(OptionsError::InvalidTopbarIndex("100".to_string()))
        );
        assert_eq!(
            match_key("topbar0.left"),
            KeyMatch::Invalid(OptionsError::InvalidTopbarIndex("0".to_string()))
        );
    }

    #[test]
    fn test_match_key_position_errors() {
        assert_eq!(
            match_key("topbar1"),
            KeyMatch::Invalid(OptionsError::MissingTopbarPosition)
        );
        assert_eq!(
            match_key("topbar1.up"),
            KeyMatch::Invalid(OptionsError::InvalidTopbarPosition("up".to_string()))
        );
        assert_eq!(
            match_key("topbar1left"),
            KeyMatch::Invalid(OptionsError::InvalidTopbarPosition("left".to_string()))
        );
    }
}
