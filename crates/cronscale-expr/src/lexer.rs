//! Formula tokenizer.

use std::fmt;

use crate::error::{ExprError, ExprResult};

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Number(f64),
    Ident(String),
    LParen,
    RParen,
    Comma,
    Question,
    Colon,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Bang,
    AndAnd,
    OrOr,
    EqEq,
    NotEq,
    Lt,
    Le,
    Gt,
    Ge,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Number(n) => write!(f, "number {n}"),
            Token::Ident(name) => write!(f, "identifier '{name}'"),
            Token::LParen => f.write_str("'('"),
            Token::RParen => f.write_str("')'"),
            Token::Comma => f.write_str("','"),
            Token::Question => f.write_str("'?'"),
            Token::Colon => f.write_str("':'"),
            Token::Plus => f.write_str("'+'"),
            Token::Minus => f.write_str("'-'"),
            Token::Star => f.write_str("'*'"),
            Token::Slash => f.write_str("'/'"),
            Token::Percent => f.write_str("'%'"),
            Token::Bang => f.write_str("'!'"),
            Token::AndAnd => f.write_str("'&&'"),
            Token::OrOr => f.write_str("'||'"),
            Token::EqEq => f.write_str("'=='"),
            Token::NotEq => f.write_str("'!='"),
            Token::Lt => f.write_str("'<'"),
            Token::Le => f.write_str("'<='"),
            Token::Gt => f.write_str("'>'"),
            Token::Ge => f.write_str("'>='"),
        }
    }
}

/// A token and the character offset it starts at.
pub type Spanned = (Token, usize);

/// Split a formula into tokens.
pub fn tokenize(input: &str) -> ExprResult<Vec<Spanned>> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let ch = chars[i];
        let start = i;

        if ch.is_whitespace() {
            i += 1;
            continue;
        }

        if ch.is_ascii_digit() || (ch == '.' && chars.get(i + 1).is_some_and(|c| c.is_ascii_digit())) {
            while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                i += 1;
            }
            let text: String = chars[start..i].iter().collect();
            let value = text
                .parse::<f64>()
                .map_err(|_| ExprError::InvalidNumber(text.clone()))?;
            tokens.push((Token::Number(value), start));
            continue;
        }

        if ch.is_alphabetic() || ch == '_' {
            while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_') {
                i += 1;
            }
            tokens.push((Token::Ident(chars[start..i].iter().collect()), start));
            continue;
        }

        let next = chars.get(i + 1).copied();
        let (token, width) = match (ch, next) {
            ('&', Some('&')) => (Token::AndAnd, 2),
            ('|', Some('|')) => (Token::OrOr, 2),
            ('=', Some('=')) => (Token::EqEq, 2),
            ('!', Some('=')) => (Token::NotEq, 2),
            ('<', Some('=')) => (Token::Le, 2),
            ('>', Some('=')) => (Token::Ge, 2),
            ('<', _) => (Token::Lt, 1),
            ('>', _) => (Token::Gt, 1),
            ('!', _) => (Token::Bang, 1),
            ('(', _) => (Token::LParen, 1),
            (')', _) => (Token::RParen, 1),
            (',', _) => (Token::Comma, 1),
            ('?', _) => (Token::Question, 1),
            (':', _) => (Token::Colon, 1),
            ('+', _) => (Token::Plus, 1),
            ('-', _) => (Token::Minus, 1),
            ('*', _) => (Token::Star, 1),
            ('/', _) => (Token::Slash, 1),
            ('%', _) => (Token::Percent, 1),
            _ => return Err(ExprError::UnexpectedChar { ch, pos: start }),
        };
        tokens.push((token, start));
        i += width;
    }

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<Token> {
        tokenize(input).unwrap().into_iter().map(|(t, _)| t).collect()
    }

    #[test]
    fn tokenizes_ternary() {
        assert_eq!(
            kinds("MetricsMax > 5 ? 7 : 5"),
            vec![
                Token::Ident("MetricsMax".to_string()),
                Token::Gt,
                Token::Number(5.0),
                Token::Question,
                Token::Number(7.0),
                Token::Colon,
                Token::Number(5.0),
            ]
        );
    }

    #[test]
    fn two_char_operators() {
        assert_eq!(
            kinds("a>=1&&b!=2||!c"),
            vec![
                Token::Ident("a".to_string()),
                Token::Ge,
                Token::Number(1.0),
                Token::AndAnd,
                Token::Ident("b".to_string()),
                Token::NotEq,
                Token::Number(2.0),
                Token::OrOr,
                Token::Bang,
                Token::Ident("c".to_string()),
            ]
        );
    }

    #[test]
    fn decimal_numbers() {
        assert_eq!(kinds("0.5 .25"), vec![Token::Number(0.5), Token::Number(0.25)]);
    }

    #[test]
    fn rejects_malformed_numbers() {
        assert!(matches!(tokenize("1.2.3"), Err(ExprError::InvalidNumber(_))));
    }

    #[test]
    fn rejects_unknown_characters() {
        assert_eq!(
            tokenize("a $ b"),
            Err(ExprError::UnexpectedChar { ch: '$', pos: 2 })
        );
    }
}
