//! Helpers shared by unit tests.

use eu4txt::{DefaultEU4Txt, EU4Txt, EU4TxtParseNode};

/// Parses inline rule text, panicking on malformed input.
pub fn rules(text: &str) -> EU4TxtParseNode {
    DefaultEU4Txt::parse_str(text).expect("test rule text should parse")
}
