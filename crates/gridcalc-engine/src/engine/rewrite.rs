//! Function-call rewriting.
//!
//! Built-ins take a single ordered collection rather than a variable number
//! of arguments, so every call site `NAME(a, b, c)` is rewritten to
//! `NAME([a, b, c])`. A call site is an identifier immediately followed by
//! `(`; whitespace in between makes it a plain group.
//!
//! The argument list runs to the balancing `)`, so nested calls and
//! parenthesized arguments are rewritten independently. A call whose `(` is
//! already followed by the collection opener is left alone, which makes the
//! pass idempotent.

use super::token::Token;

/// Wrap the arguments of every call site in a collection.
pub fn rewrite_calls(tokens: Vec<Token>) -> Vec<Token> {
    let mut out: Vec<Token> = Vec::with_capacity(tokens.len() + 4);
    // One entry per open paren: whether it opened a rewritten call.
    let mut open: Vec<bool> = Vec::new();
    let mut iter = tokens.into_iter().peekable();

    while let Some(token) = iter.next() {
        match token {
            Token::LParen => {
                let is_call = matches!(out.last(), Some(Token::Ident(_)))
                    && iter.peek() != Some(&Token::ListOpen);
                out.push(Token::LParen);
                if is_call {
                    out.push(Token::ListOpen);
                }
                open.push(is_call);
            }
            Token::RParen => {
                if open.pop() == Some(true) {
                    out.push(Token::ListClose);
                }
                out.push(Token::RParen);
            }
            other => out.push(other),
        }
    }

    out
}
