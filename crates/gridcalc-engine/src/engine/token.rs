//! Formula tokenizer.
//!
//! Splits the right-hand side of a statement into tokens. Bracketed cell
//! references (`[A.1]`, `[A.1:C.3]`) become a single [`Token::Reference`]
//! holding the text between the brackets. Whitespace is kept so that the
//! token stream can be printed back as the text the user typed.
//!
//! Tokenizing never fails: characters outside the formula language become
//! [`Token::Other`] and are rejected later by the evaluator.

use std::fmt;

#[derive(Clone, Debug, PartialEq)]
pub enum Token {
    /// Numeric literal as written.
    Number(String),
    /// String literal contents (quotes removed, escapes applied).
    Str(String),
    Ident(String),
    /// Text between `[` and `]`.
    Reference(String),
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
    Comma,
    Semicolon,
    /// Start of a call's argument collection (inserted by the rewriter).
    ListOpen,
    /// End of a call's argument collection (inserted by the rewriter).
    ListClose,
    /// Indexed range placeholder (inserted by the resolver).
    Placeholder(usize),
    Space(String),
    Other(char),
}

/// Scope name under which bound ranges are exposed to the evaluator.
pub const RANGES_VAR: &str = "ranges";

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Number(n) => write!(f, "{}", n),
            Token::Str(s) => {
                write!(f, "\"")?;
                for c in s.chars() {
                    if c == '"' || c == '\\' {
                        write!(f, "\\")?;
                    }
                    write!(f, "{}", c)?;
                }
                write!(f, "\"")
            }
            Token::Ident(s) => write!(f, "{}", s),
            Token::Reference(r) => write!(f, "[{}]", r),
            Token::Plus => write!(f, "+"),
            Token::Minus => write!(f, "-"),
            Token::Star => write!(f, "*"),
            Token::Slash => write!(f, "/"),
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
            Token::Comma => write!(f, ","),
            Token::Semicolon => write!(f, ";"),
            Token::ListOpen => write!(f, "["),
            Token::ListClose => write!(f, "]"),
            Token::Placeholder(i) => write!(f, "{}[{}]", RANGES_VAR, i),
            Token::Space(s) => write!(f, "{}", s),
            Token::Other(c) => write!(f, "{}", c),
        }
    }
}

/// Print a token stream back to text.
pub fn render_tokens(tokens: &[Token]) -> String {
    tokens.iter().map(|t| t.to_string()).collect()
}

struct Lexer {
    chars: Vec<char>,
    pos: usize,
}

impl Lexer {
    fn new(input: &str) -> Self {
        Lexer {
            chars: input.chars().collect(),
            pos: 0,
        }
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> String {
        let start = self.pos;
        while self.pos < self.chars.len() && pred(self.chars[self.pos]) {
            self.pos += 1;
        }
        self.chars[start..self.pos].iter().collect()
    }

    fn next_token(&mut self) -> Option<Token> {
        let c = self.peek_at(0)?;

        if c.is_whitespace() {
            return Some(Token::Space(self.take_while(char::is_whitespace)));
        }
        if c.is_ascii_digit() || (c == '.' && self.peek_at(1).is_some_and(|d| d.is_ascii_digit()))
        {
            return Some(self.number());
        }
        if c.is_alphabetic() || c == '_' {
            return Some(Token::Ident(
                self.take_while(|c| c.is_alphanumeric() || c == '_'),
            ));
        }
        if c == '"' || c == '\'' {
            if let Some(token) = self.string(c) {
                return Some(token);
            }
            self.pos += 1;
            return Some(Token::Other(c));
        }
        if c == '[' {
            if let Some(token) = self.reference() {
                return Some(token);
            }
            self.pos += 1;
            return Some(Token::Other(c));
        }

        self.pos += 1;
        Some(match c {
            '+' => Token::Plus,
            '-' => Token::Minus,
            '*' => Token::Star,
            '/' => Token::Slash,
            '(' => Token::LParen,
            ')' => Token::RParen,
            ',' => Token::Comma,
            ';' => Token::Semicolon,
            other => Token::Other(other),
        })
    }

    fn number(&mut self) -> Token {
        let mut text = self.take_while(|c| c.is_ascii_digit());
        if self.peek_at(0) == Some('.') {
            self.pos += 1;
            text.push('.');
            text.push_str(&self.take_while(|c| c.is_ascii_digit()));
        }
        // Exponent only when digits follow, so `2e` stays a number and an ident.
        if matches!(self.peek_at(0), Some('e' | 'E')) {
            let sign = matches!(self.peek_at(1), Some('+' | '-'));
            let digits_at = if sign { 2 } else { 1 };
            if self.peek_at(digits_at).is_some_and(|d| d.is_ascii_digit()) {
                for _ in 0..digits_at {
                    if let Some(c) = self.peek_at(0) {
                        text.push(c);
                    }
                    self.pos += 1;
                }
                text.push_str(&self.take_while(|c| c.is_ascii_digit()));
            }
        }
        Token::Number(text)
    }

    /// Quoted string with backslash escapes. None if unterminated.
    fn string(&mut self, quote: char) -> Option<Token> {
        let mut i = self.pos + 1;
        let mut out = String::new();
        while i < self.chars.len() {
            let c = self.chars[i];
            if c == '\\' && i + 1 < self.chars.len() {
                out.push(self.chars[i + 1]);
                i += 2;
                continue;
            }
            if c == quote {
                self.pos = i + 1;
                return Some(Token::Str(out));
            }
            out.push(c);
            i += 1;
        }
        None
    }

    /// `[...]` up to the next `]`. None if unterminated.
    fn reference(&mut self) -> Option<Token> {
        let start = self.pos + 1;
        let end = self.chars[start..].iter().position(|&c| c == ']')? + start;
        self.pos = end + 1;
        Some(Token::Reference(self.chars[start..end].iter().collect()))
    }
}

/// Tokenize an expression.
pub fn tokenize(input: &str) -> Vec<Token> {
    let mut lexer = Lexer::new(input);
    let mut tokens = Vec::new();
    while let Some(token) = lexer.next_token() {
        tokens.push(token);
    }
    tokens
}
