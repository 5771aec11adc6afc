//! Textual tree format.
//!
//! A leaf is written as `{"ch":<symbol>,"freq":<weight>}` and an internal node
//! as `{"freq":<weight>,"left":<node>,"right":<node>}`. The reader is a strict
//! recursive-descent parser: whitespace between tokens is skipped, anything
//! else out of place stops parsing with [`HuffmanError::Parse`].

use crate::error::{HuffmanError, Result};
use crate::hufftree::{HuffNode, HuffmanTree};

const KEY_SYMBOL: &str = "ch";
const KEY_WEIGHT: &str = "freq";
const KEY_LEFT: &str = "left";
const KEY_RIGHT: &str = "right";

/// Deepest object nesting accepted. A tree over 256 symbols is at most 255 levels deep.
const MAX_DEPTH: usize = 256;

/// Compact form, no whitespace and no trailing newline.
pub fn to_json(tree: &HuffmanTree) -> String {
    let mut out = String::new();
    write_compact(&tree.root, &mut out);
    out
}

/// Two-space indented form; parses back to the same tree as [`to_json`].
pub fn to_json_pretty(tree: &HuffmanTree) -> String {
    let mut out = String::new();
    write_pretty(&tree.root, 0, &mut out);
    out
}

fn write_compact(node: &HuffNode, out: &mut String) {
    match node {
        HuffNode::Leaf { symbol, weight } => {
            out.push_str(&format!(
                "{{\"{KEY_SYMBOL}\":{symbol},\"{KEY_WEIGHT}\":{weight}}}"
            ));
        }
        HuffNode::Internal {
            weight,
            left,
            right,
        } => {
            out.push_str(&format!("{{\"{KEY_WEIGHT}\":{weight},\"{KEY_LEFT}\":"));
            write_compact(left, out);
            out.push_str(&format!(",\"{KEY_RIGHT}\":"));
            write_compact(right, out);
            out.push('}');
        }
    }
}

fn write_pretty(node: &HuffNode, indent: usize, out: &mut String) {
    let inner = "  ".repeat(indent + 1);
    match node {
        HuffNode::Leaf { symbol, weight } => {
            out.push_str(&format!(
                "{{\n{inner}\"{KEY_SYMBOL}\": {symbol},\n{inner}\"{KEY_WEIGHT}\": {weight}\n"
            ));
        }
        HuffNode::Internal {
            weight,
            left,
            right,
        } => {
            out.push_str(&format!(
                "{{\n{inner}\"{KEY_WEIGHT}\": {weight},\n{inner}\"{KEY_LEFT}\": "
            ));
            write_pretty(left, indent + 1, out);
            out.push_str(&format!(",\n{inner}\"{KEY_RIGHT}\": "));
            write_pretty(right, indent + 1, out);
            out.push('\n');
        }
    }
    out.push_str(&"  ".repeat(indent));
    out.push('}');
}

/// Parses one node object from the start of `text`.
///
/// Text after the closing brace of the root is left unread; see [`Parser::rest`].
pub fn parse(text: &str) -> Result<HuffmanTree> {
    let mut parser = Parser::new(text);
    parser.parse_tree()
}

pub struct Parser<'a> {
    input: &'a [u8],
    pos: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    pub fn new(text: &'a str) -> Self {
        Parser {
            input: text.as_bytes(),
            pos: 0,
            depth: 0,
        }
    }

    pub fn parse_tree(&mut self) -> Result<HuffmanTree> {
        let root = self.parse_node()?;
        Ok(HuffmanTree::new(root))
    }

    /// Unconsumed input after whitespace.
    pub fn rest(&mut self) -> &'a [u8] {
        self.skip_whitespace();
        &self.input[self.pos..]
    }

    pub fn offset(&self) -> usize {
        self.pos
    }

    fn error(&self, message: impl Into<String>) -> HuffmanError {
        HuffmanError::parse(self.pos, message)
    }

    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn next_byte(&mut self) -> Option<u8> {
        let byte = self.peek()?;
        self.pos += 1;
        Some(byte)
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(b' ' | b'\t' | b'\n' | b'\r' | 0x0B | 0x0C)) {
            self.pos += 1;
        }
    }

    fn expect(&mut self, expected: u8) -> Result<()> {
        self.skip_whitespace();
        match self.peek() {
            Some(byte) if byte == expected => {
                self.pos += 1;
                Ok(())
            }
            Some(byte) => Err(self.error(format!(
                "expected '{}', found '{}'",
                expected as char,
                (byte as char).escape_default()
            ))),
            None => Err(self.error(format!(
                "expected '{}', found end of input",
                expected as char
            ))),
        }
    }

    fn parse_string(&mut self) -> Result<String> {
        self.skip_whitespace();
        if self.peek() != Some(b'"') {
            return Err(self.error("expected '\"'"));
        }
        self.pos += 1;

        let mut bytes = Vec::new();
        loop {
            match self.next_byte() {
                None => return Err(self.error("unterminated string")),
                Some(b'"') => break,
                Some(b'\\') => {
                    let unescaped = match self.next_byte() {
                        Some(b'"') => b'"',
                        Some(b'\\') => b'\\',
                        Some(b'/') => b'/',
                        Some(b'b') => 0x08,
                        Some(b'f') => 0x0C,
                        Some(b'n') => b'\n',
                        Some(b'r') => b'\r',
                        Some(b't') => b'\t',
                        Some(other) => {
                            return Err(self.error(format!(
                                "unknown escape '\\{}'",
                                (other as char).escape_default()
                            )))
                        }
                        None => return Err(self.error("unterminated escape")),
                    };
                    bytes.push(unescaped);
                }
                Some(byte) => bytes.push(byte),
            }
        }

        String::from_utf8(bytes).map_err(|_| self.error("string is not valid UTF-8"))
    }

    fn parse_int(&mut self) -> Result<u64> {
        self.skip_whitespace();
        if !matches!(self.peek(), Some(b'0'..=b'9')) {
            return Err(self.error("expected digit"));
        }

        let mut value: u64 = 0;
        while let Some(digit @ b'0'..=b'9') = self.peek() {
            value = value
                .checked_mul(10)
                .and_then(|v| v.checked_add(u64::from(digit - b'0')))
                .ok_or_else(|| self.error("integer does not fit in 64 bits"))?;
            self.pos += 1;
        }
        Ok(value)
    }

    fn expect_key(&mut self, expected: &str) -> Result<()> {
        let start = self.pos;
        let key = self.parse_string()?;
        if key != expected {
            return Err(HuffmanError::parse(
                start,
                format!("expected key \"{expected}\", found \"{key}\""),
            ));
        }
        self.expect(b':')
    }

    fn parse_node(&mut self) -> Result<HuffNode> {
        if self.depth >= MAX_DEPTH {
            return Err(self.error("tree nested too deeply"));
        }
        self.depth += 1;
        let node = self.parse_object();
        self.depth -= 1;
        node
    }

    fn parse_object(&mut self) -> Result<HuffNode> {
        self.expect(b'{')?;

        let key_start = self.pos;
        let key = self.parse_string()?;
        self.expect(b':')?;

        match key.as_str() {
            KEY_SYMBOL => {
                let symbol_start = self.pos;
                let symbol = self.parse_int()?;
                let symbol = u8::try_from(symbol).map_err(|_| {
                    HuffmanError::parse(symbol_start, format!("symbol {symbol} is above 255"))
                })?;
                self.expect(b',')?;

                self.expect_key(KEY_WEIGHT)?;
                let weight = self.parse_int()?;
                self.expect(b'}')?;

                Ok(HuffNode::Leaf { weight, symbol })
            }
            KEY_WEIGHT => {
                let weight = self.parse_int()?;
                self.expect(b',')?;

                self.expect_key(KEY_LEFT)?;
                let left = self.parse_node()?;
                self.expect(b',')?;

                self.expect_key(KEY_RIGHT)?;
                let right = self.parse_node()?;
                self.expect(b'}')?;

                Ok(HuffNode::Internal {
                    weight,
                    left: Box::new(left),
                    right: Box::new(right),
                })
            }
            other => Err(HuffmanError::parse(
                key_start,
                format!("unknown key \"{other}\""),
            )),
        }
    }
}
