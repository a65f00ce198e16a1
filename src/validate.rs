use phf::phf_set;

use crate::error::{OptionsError, OptionsResult};

/// Song tag names that may appear in a column list. Matches the fields the
/// track list and library views know how to render.
static SONG_FIELDS: phf::Set<&'static str> = phf_set! {
    "num",
    "file",
    "artist",
    "artistsort",
    "albumartist",
    "albumartistsort",
    "title",
    "album",
    "track",
    "disc",
    "date",
    "year",
    "genre",
    "composer",
    "performer",
    "comment",
    "length",
    "bitrate",
    "name",
};

/// Returns true if `name` is a renderable song field.
pub fn is_song_field(name: &str) -> bool {
    SONG_FIELDS.contains(name)
}

/// Parse a boolean token. Accepts the usual spellings in either case;
/// anything else is rejected.
pub fn parse_boolean(text: &str) -> Option<bool> {
    match text.to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}

/// Lenient integer conversion: parses an optional sign and the leading run
/// of digits, ignoring whatever follows. Non-numeric input yields 0, never
/// an error. Out-of-range values saturate.
pub fn integer_prefix(text: &str) -> i64 {
    let text = text.trim_start();
    let (negative, rest) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };

    let mut value: i64 = 0;
    for byte in rest.bytes().take_while(|b| b.is_ascii_digit()) {
        value = value
            .saturating_mul(10)
            .saturating_add(i64::from(byte - b'0'));
    }

    if negative {
        -value
    } else {
        value
    }
}

/// Check that `text` is a space-separated list of recognized song fields.
pub fn verify_columns(text: &str) -> OptionsResult<()> {
    let mut seen_any = false;
    for column in text.split_whitespace() {
        if !is_song_field(column) {
            return Err(OptionsError::InvalidColumn(column.to_string()));
        }
        seen_any = true;
    }
    if !seen_any {
        return Err(OptionsError::EmptyColumns);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_boolean_truthy() {
        assert_eq!(parse_boolean("true"), Some(true));
        assert_eq!(parse_boolean("yes"), Some(true));
        assert_eq!(parse_boolean("on"), Some(true));
        assert_eq!(parse_boolean("1"), Some(true));
        assert_eq!(parse_boolean("TRUE"), Some(true));
        assert_eq!(parse_boolean("Yes"), Some(true));
    }

    #[test]
    fn test_parse_boolean_falsy() {
        assert_eq!(parse_boolean("false"), Some(false));
        assert_eq!(parse_boolean("no"), Some(false));
        assert_eq!(parse_boolean("off"), Some(false));
        assert_eq!(parse_boolean("0"), Some(false));
        assert_eq!(parse_boolean("OFF"), Some(false));
    }

    #[test]
    fn test_parse_boolean_rejects_everything_else() {
        assert_eq!(parse_boolean(""), None);
        assert_eq!(parse_boolean("maybe"), None);
        assert_eq!(parse_boolean("2"), None);
        assert_eq!(parse_boolean(" true"), None);
    }

    #[test]
    fn test_integer_prefix_plain_numbers() {
        assert_eq!(integer_prefix("5"), 5);
        assert_eq!(integer_prefix("30"), 30);
        assert_eq!(integer_prefix("-12"), -12);
        assert_eq!(integer_prefix("+7"), 7);
    }

    #[test]
    fn test_integer_prefix_stops_at_first_non_digit() {
        assert_eq!(integer_prefix("12abc"), 12);
        assert_eq!(integer_prefix("3.5"), 3);
        assert_eq!(integer_prefix("  42  "), 42);
    }

    #[test]
    fn test_integer_prefix_non_numeric_yields_zero() {
        assert_eq!(integer_prefix(""), 0);
        assert_eq!(integer_prefix("abc"), 0);
        assert_eq!(integer_prefix("-"), 0);
        assert_eq!(integer_prefix("--5"), 0);
    }

    #[test]
    fn test_integer_prefix_saturates() {
        assert_eq!(integer_prefix("99999999999999999999999999"), i64::MAX);
        assert_eq!(integer_prefix("-99999999999999999999999999"), -i64::MAX);
    }

    #[test]
    fn test_is_song_field() {
        assert!(is_song_field("artist"));
        assert!(is_song_field("length"));
        assert!(!is_song_field("Artist"));
        assert!(!is_song_field("loudness"));
        assert!(!is_song_field(""));
    }

    #[test]
    fn test_verify_columns_accepts_known_fields() {
        assert!(verify_columns("artist track title album length").is_ok());
        assert!(verify_columns("file").is_ok());
        assert!(verify_columns("  artist   title  ").is_ok());
    }

    #[test]
    fn test_verify_columns_names_the_bad_field() {
        assert_eq!(
            verify_columns("artist tempo"),
            Err(OptionsError::InvalidColumn("tempo".to_string()))
        );
    }

    #[test]
    fn test_verify_columns_rejects_empty_list() {
        assert_eq!(verify_columns(""), Err(OptionsError::EmptyColumns));
        assert_eq!(verify_columns("   "), Err(OptionsError::EmptyColumns));
    }
}
