//! Lexer for the match expression language.

use tether_core::errors::ExpressionError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Bare identifier: record roots, attribute names, word operators.
    Ident(String),
    /// Single- or double-quoted string literal (quotes stripped).
    Str(String),
    Dot,
    EqEq,
    NotEq,
    AndAnd,
    OrOr,
    Bang,
    LParen,
    RParen,
}

impl Token {
    pub fn describe(&self) -> String {
        match self {
            Token::Ident(name) => name.clone(),
            Token::Str(s) => format!("'{s}'"),
            Token::Dot => ".".to_string(),
            Token::EqEq => "==".to_string(),
            Token::NotEq => "!=".to_string(),
            Token::AndAnd => "&&".to_string(),
            Token::OrOr => "||".to_string(),
            Token::Bang => "!".to_string(),
            Token::LParen => "(".to_string(),
            Token::RParen => ")".to_string(),
        }
    }
}

/// A token plus its byte offset into the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Spanned {
    pub token: Token,
    pub offset: usize,
}

/// Tokenize an expression source string.
pub fn lex(src: &str) -> Result<Vec<Spanned>, ExpressionError> {
    let bytes: Vec<(usize, char)> = src.char_indices().collect();
    let mut tokens = Vec::new();
    let mut i = 0usize;

    while i < bytes.len() {
        let (offset, c) = bytes[i];
        match c {
            c if c.is_whitespace() => {
                i += 1;
            }
            '.' => {
                tokens.push(Spanned { token: Token::Dot, offset });
                i += 1;
            }
            '(' => {
                tokens.push(Spanned { token: Token::LParen, offset });
                i += 1;
            }
            ')' => {
                tokens.push(Spanned { token: Token::RParen, offset });
                i += 1;
            }
            '=' => {
                if matches!(bytes.get(i + 1), Some((_, '='))) {
                    tokens.push(Spanned { token: Token::EqEq, offset });
                    i += 2;
                } else {
                    // Assignment is not a thing here.
                    return Err(ExpressionError::UnsupportedOperator {
                        operator: "=".to_string(),
                        offset,
                    });
                }
            }
            '!' => {
                if matches!(bytes.get(i + 1), Some((_, '='))) {
                    tokens.push(Spanned { token: Token::NotEq, offset });
                    i += 2;
                } else {
                    tokens.push(Spanned { token: Token::Bang, offset });
                    i += 1;
                }
            }
            '&' => {
                if matches!(bytes.get(i + 1), Some((_, '&'))) {
                    tokens.push(Spanned { token: Token::AndAnd, offset });
                    i += 2;
                } else {
                    return Err(ExpressionError::UnsupportedOperator {
                        operator: "&".to_string(),
                        offset,
                    });
                }
            }
            '|' => {
                if matches!(bytes.get(i + 1), Some((_, '|'))) {
                    tokens.push(Spanned { token: Token::OrOr, offset });
                    i += 2;
                } else {
                    return Err(ExpressionError::UnsupportedOperator {
                        operator: "|".to_string(),
                        offset,
                    });
                }
            }
            quote @ ('\'' | '"') => {
                let mut value = String::new();
                let mut j = i + 1;
                let mut closed = false;
                while j < bytes.len() {
                    let (_, cj) = bytes[j];
                    if cj == '\\' {
                        // Minimal escapes: \' \" \\
                        if let Some((_, next)) = bytes.get(j + 1) {
                            value.push(*next);
                            j += 2;
                            continue;
                        }
                        return Err(ExpressionError::UnterminatedString { offset });
                    }
                    if cj == quote {
                        closed = true;
                        break;
                    }
                    value.push(cj);
                    j += 1;
                }
                if !closed {
                    return Err(ExpressionError::UnterminatedString { offset });
                }
                tokens.push(Spanned { token: Token::Str(value), offset });
                i = j + 1;
            }
            c if c.is_alphabetic() || c == '_' => {
                let mut name = String::new();
                let mut j = i;
                while j < bytes.len() {
                    let (_, cj) = bytes[j];
                    if cj.is_alphanumeric() || cj == '_' || cj == '-' {
                        name.push(cj);
                        j += 1;
                    } else {
                        break;
                    }
                }
                tokens.push(Spanned { token: Token::Ident(name), offset });
                i = j;
            }
            // Digits, arithmetic, and everything else are rejected outright:
            // the language has no numbers and no computation.
            other => {
                return Err(ExpressionError::UnexpectedChar { found: other, offset });
            }
        }
    }

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lexes_comparison() {
        let tokens = lex("source.email == 'a@b'").unwrap();
        let kinds: Vec<&Token> = tokens.iter().map(|t| &t.token).collect();
        assert_eq!(
            kinds,
            vec![
                &Token::Ident("source".into()),
                &Token::Dot,
                &Token::Ident("email".into()),
                &Token::EqEq,
                &Token::Str("a@b".into()),
            ]
        );
    }

    #[test]
    fn rejects_arithmetic() {
        assert!(matches!(
            lex("source.a + target.b"),
            Err(ExpressionError::UnexpectedChar { found: '+', .. })
        ));
    }

    #[test]
    fn rejects_numbers() {
        assert!(lex("source.age == 42").is_err());
    }

    #[test]
    fn unterminated_string_carries_offset() {
        assert_eq!(
            lex("source.a == 'oops").unwrap_err(),
            ExpressionError::UnterminatedString { offset: 12 }
        );
    }

    #[test]
    fn escaped_quote_inside_literal() {
        let tokens = lex(r#"source.name == 'O\'Brien'"#).unwrap();
        assert!(tokens
            .iter()
            .any(|t| t.token == Token::Str("O'Brien".into())));
    }
}
