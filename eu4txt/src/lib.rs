//! A parser library for Paradox-script text files.
//!
//! EU4 game data and converter rule files share one format: braces `{}`,
//! `key = value` assignments and bare values, typically encoded in
//! `WINDOWS_1252`. This crate tokenizes that format, parses it into a tree of
//! [`EU4TxtParseNode`]s and provides accessors for walking the tree.

use std::borrow::Cow;
use std::fmt;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use encoding_rs::WINDOWS_1252;
use encoding_rs_io::DecodeReaderBytesBuilder;

pub mod de;
pub mod error;

pub use de::from_node;
pub use error::ParseError;

/// Represents a token scanned from a Paradox-script file.
#[derive(Debug, Clone, PartialEq)]
pub enum EU4TxtToken {
    /// An unquoted word (keys, tags, dates, names).
    Identifier(String),
    /// A quoted string value, without the quotes.
    StringValue(String),
    /// A floating point number.
    FloatValue(f32),
    /// An integer number.
    IntValue(i32),
    /// `{`
    LeftBrace,
    /// `}`
    RightBrace,
    /// `=`
    Equals,
}

impl fmt::Display for EU4TxtToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EU4TxtToken::Identifier(s) => write!(f, "{}", s),
            EU4TxtToken::StringValue(s) => write!(f, "\"{}\"", s),
            EU4TxtToken::FloatValue(v) => write!(f, "{}", v),
            EU4TxtToken::IntValue(v) => write!(f, "{}", v),
            EU4TxtToken::LeftBrace => write!(f, "{{"),
            EU4TxtToken::RightBrace => write!(f, "}}"),
            EU4TxtToken::Equals => write!(f, "="),
        }
    }
}

/// Represents an item in the parse tree.
#[derive(Debug, Clone, PartialEq)]
pub enum EU4TxtAstItem {
    /// A `key = value` assignment. Children are `[key, value]`.
    Assignment,
    /// A brace-delimited list (or the file root). Children are assignments
    /// and bare values in source order.
    AssignmentList,
    /// An unquoted word.
    Identifier(String),
    /// A quoted string.
    StringValue(String),
    /// A float value.
    FloatValue(f32),
    /// An integer value.
    IntValue(i32),
}

/// A node in the parse tree.
#[derive(Debug, Clone, PartialEq)]
pub struct EU4TxtParseNode {
    /// Child nodes (for lists or assignments).
    pub children: Vec<EU4TxtParseNode>,
    /// The type of item and its data.
    pub entry: EU4TxtAstItem,
}

impl Default for EU4TxtParseNode {
    fn default() -> Self {
        Self::list()
    }
}

impl EU4TxtParseNode {
    /// Creates an empty list node.
    pub fn list() -> Self {
        EU4TxtParseNode {
            children: Vec::new(),
            entry: EU4TxtAstItem::AssignmentList,
        }
    }

    /// Creates a childless node holding a single value.
    pub fn scalar(entry: EU4TxtAstItem) -> Self {
        EU4TxtParseNode {
            children: Vec::new(),
            entry,
        }
    }

    /// Creates a `key = value` node.
    pub fn assignment(key: EU4TxtParseNode, value: EU4TxtParseNode) -> Self {
        EU4TxtParseNode {
            children: vec![key, value],
            entry: EU4TxtAstItem::Assignment,
        }
    }

    pub fn is_assignment(&self) -> bool {
        matches!(self.entry, EU4TxtAstItem::Assignment)
    }

    pub fn is_list(&self) -> bool {
        matches!(self.entry, EU4TxtAstItem::AssignmentList)
    }

    /// Text of a scalar node. Numbers are rendered back to text; lists and
    /// assignments have none.
    pub fn text(&self) -> Option<Cow<'_, str>> {
        match &self.entry {
            EU4TxtAstItem::Identifier(s) | EU4TxtAstItem::StringValue(s) => {
                Some(Cow::Borrowed(s.as_str()))
            }
            EU4TxtAstItem::IntValue(i) => Some(Cow::Owned(i.to_string())),
            EU4TxtAstItem::FloatValue(f) => Some(Cow::Owned(f.to_string())),
            EU4TxtAstItem::Assignment | EU4TxtAstItem::AssignmentList => None,
        }
    }

    /// Left-hand side of an assignment.
    pub fn key(&self) -> Option<Cow<'_, str>> {
        if !self.is_assignment() {
            return None;
        }
        self.children.first()?.text()
    }

    /// Right-hand side of an assignment.
    pub fn value(&self) -> Option<&EU4TxtParseNode> {
        if !self.is_assignment() {
            return None;
        }
        self.children.get(1)
    }

    /// The list this node stands for: itself when it is a list, its
    /// right-hand side when it is `key = { ... }`.
    pub fn body(&self) -> Option<&EU4TxtParseNode> {
        match self.entry {
            EU4TxtAstItem::AssignmentList => Some(self),
            EU4TxtAstItem::Assignment => self.value().filter(|v| v.is_list()),
            _ => None,
        }
    }

    /// The `key = value` children of [`Self::body`], in source order.
    pub fn assignments(&self) -> impl Iterator<Item = &EU4TxtParseNode> {
        self.body()
            .into_iter()
            .flat_map(|b| b.children.iter())
            .filter(|c| c.is_assignment())
    }

    /// The bare values of [`Self::body`] (`{ 1 2 3 }`), in source order.
    /// Nested assignments and lists are skipped.
    pub fn scalars(&self) -> impl Iterator<Item = Cow<'_, str>> {
        self.body()
            .into_iter()
            .flat_map(|b| b.children.iter())
            .filter_map(|c| c.text())
    }

    /// The first assignment in [`Self::body`] whose key is `key`.
    pub fn get(&self, key: &str) -> Option<&EU4TxtParseNode> {
        self.assignments().find(|a| a.key().as_deref() == Some(key))
    }
}

/// Splits file contents into tokens. Comments (`#` to end of line) are dropped.
pub fn tokenize(contents: &str) -> Vec<EU4TxtToken> {
    let mut tokens: Vec<EU4TxtToken> = Vec::new();
    let mut chars = contents.chars().peekable();

    while let Some(&c) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '#' => {
                while let Some(nc) = chars.next() {
                    if nc == '\n' || nc == '\r' {
                        break;
                    }
                }
            }
            '{' => {
                tokens.push(EU4TxtToken::LeftBrace);
                chars.next();
            }
            '}' => {
                tokens.push(EU4TxtToken::RightBrace);
                chars.next();
            }
            '=' => {
                tokens.push(EU4TxtToken::Equals);
                chars.next();
            }
            '"' => {
                chars.next();
                // An unterminated string runs to the end of the input.
                let s: String = chars.by_ref().take_while(|&nc| nc != '"').collect();
                tokens.push(EU4TxtToken::StringValue(s));
            }
            _ => {
                let mut s = String::new();
                while let Some(&nc) = chars.peek() {
                    if nc.is_whitespace() || matches!(nc, '=' | '{' | '}' | '#' | '"') {
                        break;
                    }
                    s.push(nc);
                    chars.next();
                }
                tokens.push(classify_word(s));
            }
        }
    }
    tokens
}

/// Numbers must start like numbers: `inf`, `nan` and friends are words here,
/// since tags and culture names can collide with them.
fn classify_word(s: String) -> EU4TxtToken {
    let mut it = s.chars();
    let numeric_start = match it.next() {
        Some(c) if c.is_ascii_digit() => true,
        Some('-' | '+' | '.') => it.next().is_some_and(|c| c.is_ascii_digit() || c == '.'),
        _ => false,
    };
    if numeric_start {
        if let Ok(i) = s.parse::<i32>() {
            return EU4TxtToken::IntValue(i);
        }
        if let Ok(f) = s.parse::<f32>()
            && f.is_finite()
        {
            return EU4TxtToken::FloatValue(f);
        }
    }
    EU4TxtToken::Identifier(s)
}

pub trait EU4Txt {
    /// Reads a file, decoding it from `WINDOWS_1252`. A UTF-8 byte order mark
    /// switches decoding to UTF-8.
    fn read_txt<P: AsRef<Path>>(path: P) -> std::io::Result<String> {
        let file = File::open(path)?;
        let mut buf_reader = BufReader::new(
            DecodeReaderBytesBuilder::new()
                .encoding(Some(WINDOWS_1252))
                .build(file),
        );
        let mut contents = String::new();
        buf_reader.read_to_string(&mut contents)?;
        Ok(contents)
    }

    fn open_txt<P: AsRef<Path>>(path: P) -> std::io::Result<Vec<EU4TxtToken>> {
        Ok(tokenize(&Self::read_txt(path)?))
    }

    fn parse_terminal(
        tokens: &[EU4TxtToken],
        pos: usize,
    ) -> Result<(EU4TxtParseNode, usize), ParseError> {
        let tok = tokens
            .get(pos)
            .ok_or(ParseError::UnexpectedEof { position: pos })?;
        let entry = match tok {
            EU4TxtToken::Identifier(s) => EU4TxtAstItem::Identifier(s.clone()),
            EU4TxtToken::StringValue(s) => EU4TxtAstItem::StringValue(s.clone()),
            EU4TxtToken::IntValue(i) => EU4TxtAstItem::IntValue(*i),
            EU4TxtToken::FloatValue(f) => EU4TxtAstItem::FloatValue(*f),
            other => {
                return Err(ParseError::UnexpectedToken {
                    position: pos,
                    token: other.to_string(),
                    expected: "a value".to_string(),
                });
            }
        };
        Ok((EU4TxtParseNode::scalar(entry), pos + 1))
    }

    /// Parses list items starting at `pos`. A nested list ends at its closing
    /// brace; the root list ends at end of input.
    fn parse_assignment_list(
        tokens: &[EU4TxtToken],
        pos: usize,
        nested: bool,
    ) -> Result<(EU4TxtParseNode, usize), ParseError> {
        let mut list = EU4TxtParseNode::list();
        let mut pos = pos;
        loop {
            let Some(tok) = tokens.get(pos) else {
                if nested {
                    return Err(ParseError::UnexpectedEof { position: pos });
                }
                break;
            };
            match tok {
                EU4TxtToken::RightBrace => {
                    if nested {
                        return Ok((list, pos + 1));
                    }
                    return Err(ParseError::UnconsumedTokens {
                        position: pos,
                        remaining: tokens.len() - pos,
                    });
                }
                EU4TxtToken::LeftBrace => {
                    let (inner, next) = Self::parse_assignment_list(tokens, pos + 1, true)?;
                    list.children.push(inner);
                    pos = next;
                }
                EU4TxtToken::Equals => {
                    return Err(ParseError::InvalidLhs {
                        position: pos,
                        found: tok.to_string(),
                    });
                }
                _ => {
                    let (lhs, next) = Self::parse_terminal(tokens, pos)?;
                    if !matches!(tokens.get(next), Some(EU4TxtToken::Equals)) {
                        list.children.push(lhs);
                        pos = next;
                        continue;
                    }
                    let rhs_pos = next + 1;
                    let (rhs, after) = match tokens.get(rhs_pos) {
                        Some(EU4TxtToken::LeftBrace) => {
                            Self::parse_assignment_list(tokens, rhs_pos + 1, true)?
                        }
                        None | Some(EU4TxtToken::RightBrace | EU4TxtToken::Equals) => {
                            return Err(ParseError::MissingRhs { position: rhs_pos });
                        }
                        Some(_) => Self::parse_terminal(tokens, rhs_pos)?,
                    };
                    list.children.push(EU4TxtParseNode::assignment(lhs, rhs));
                    pos = after;
                }
            }
        }
        Ok((list, pos))
    }

    fn parse(tokens: Vec<EU4TxtToken>) -> Result<EU4TxtParseNode, ParseError> {
        if tokens.is_empty() {
            return Err(ParseError::EmptyInput);
        }
        Self::parse_assignment_list(&tokens, 0, false).map(|(root, _)| root)
    }

    fn parse_str(contents: &str) -> Result<EU4TxtParseNode, ParseError> {
        Self::parse(tokenize(contents))
    }
}

pub struct DefaultEU4Txt {}
impl EU4Txt for DefaultEU4Txt {}
