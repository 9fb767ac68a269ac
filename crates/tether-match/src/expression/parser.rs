//! Recursive-descent parser for match expressions.
//!
//! Precedence, loosest first: `||`, `&&`, `!`, comparison. Comparisons do
//! not chain — `a == b == c` is a compile error.

use tether_core::errors::ExpressionError;

use super::ast::{AttrRef, CmpOp, Expr, Operand, Side};
use super::token::{Spanned, Token};

pub fn parse(tokens: &[Spanned]) -> Result<Expr, ExpressionError> {
    let mut parser = Parser { tokens, pos: 0 };
    let expr = parser.parse_or()?;
    if let Some(trailing) = parser.peek() {
        return Err(ExpressionError::UnexpectedToken {
            expected: "end of expression",
            found: trailing.token.describe(),
            offset: trailing.offset,
        });
    }
    Ok(expr)
}

struct Parser<'a> {
    tokens: &'a [Spanned],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<&'a Spanned> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<&'a Spanned> {
        let t = self.tokens.get(self.pos);
        self.pos += 1;
        t
    }

    fn end_offset(&self) -> usize {
        self.tokens.last().map(|t| t.offset + 1).unwrap_or(0)
    }

    fn expect_any(&mut self, expected: &'static str) -> Result<&'a Spanned, ExpressionError> {
        self.advance().ok_or(ExpressionError::UnexpectedToken {
            expected,
            found: "end of expression".to_string(),
            offset: self.end_offset(),
        })
    }

    fn parse_or(&mut self) -> Result<Expr, ExpressionError> {
        let mut lhs = self.parse_and()?;
        while matches!(self.peek(), Some(t) if t.token == Token::OrOr) {
            self.advance();
            let rhs = self.parse_and()?;
            lhs = Expr::Or(Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn parse_and(&mut self) -> Result<Expr, ExpressionError> {
        let mut lhs = self.parse_unary()?;
        while matches!(self.peek(), Some(t) if t.token == Token::AndAnd) {
            self.advance();
            let rhs = self.parse_unary()?;
            lhs = Expr::And(Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn parse_unary(&mut self) -> Result<Expr, ExpressionError> {
        if matches!(self.peek(), Some(t) if t.token == Token::Bang) {
            self.advance();
            let inner = self.parse_unary()?;
            return Ok(Expr::Not(Box::new(inner)));
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<Expr, ExpressionError> {
        let open_paren = self
            .peek()
            .filter(|t| t.token == Token::LParen)
            .map(|t| t.offset);
        if let Some(open_offset) = open_paren {
            self.advance();
            let inner = self.parse_or()?;
            match self.advance() {
                Some(t) if t.token == Token::RParen => return Ok(inner),
                Some(t) => {
                    return Err(ExpressionError::UnexpectedToken {
                        expected: "`)`",
                        found: t.token.describe(),
                        offset: t.offset,
                    })
                }
                None => {
                    return Err(ExpressionError::UnexpectedToken {
                        expected: "`)`",
                        found: "end of expression".to_string(),
                        offset: open_offset,
                    })
                }
            }
        }
        self.parse_comparison()
    }

    fn parse_comparison(&mut self) -> Result<Expr, ExpressionError> {
        let lhs = self.parse_operand()?;
        let op = self.parse_cmp_op()?;
        let rhs = self.parse_operand()?;
        Ok(Expr::Cmp { op, lhs, rhs })
    }

    fn parse_cmp_op(&mut self) -> Result<CmpOp, ExpressionError> {
        let spanned = self.expect_any("comparison operator")?;
        match &spanned.token {
            Token::EqEq => Ok(CmpOp::Eq),
            Token::NotEq => Ok(CmpOp::Ne),
            Token::Ident(word) => match word.as_str() {
                "contains" => Ok(CmpOp::Contains),
                "starts_with" => Ok(CmpOp::StartsWith),
                "ends_with" => Ok(CmpOp::EndsWith),
                other => Err(ExpressionError::UnsupportedOperator {
                    operator: other.to_string(),
                    offset: spanned.offset,
                }),
            },
            other => Err(ExpressionError::UnexpectedToken {
                expected: "comparison operator",
                found: other.describe(),
                offset: spanned.offset,
            }),
        }
    }

    fn parse_operand(&mut self) -> Result<Operand, ExpressionError> {
        let spanned = self.expect_any("`source.<attr>`, `target.<attr>`, or a string literal")?;
        match &spanned.token {
            Token::Str(value) => Ok(Operand::Literal(value.clone())),
            Token::Ident(root) => {
                let side = match root.as_str() {
                    "source" => Side::Source,
                    "target" => Side::Target,
                    other => {
                        return Err(ExpressionError::UnknownRoot {
                            root: other.to_string(),
                            offset: spanned.offset,
                        })
                    }
                };
                let dot = self.expect_any("`.`")?;
                if dot.token != Token::Dot {
                    return Err(ExpressionError::UnexpectedToken {
                        expected: "`.`",
                        found: dot.token.describe(),
                        offset: dot.offset,
                    });
                }
                let attr = self.expect_any("attribute name")?;
                let attribute = match &attr.token {
                    Token::Ident(name) => name.clone(),
                    other => {
                        return Err(ExpressionError::UnexpectedToken {
                            expected: "attribute name",
                            found: other.describe(),
                            offset: attr.offset,
                        })
                    }
                };
                // `source.attr.more` or `source.attr(...)` means someone is
                // trying to navigate or call — both are outside the language.
                if let Some(next) = self.peek() {
                    if next.token == Token::Dot || next.token == Token::LParen {
                        return Err(ExpressionError::UnexpectedToken {
                            expected: "comparison operator",
                            found: next.token.describe(),
                            offset: next.offset,
                        });
                    }
                }
                Ok(Operand::Attr(AttrRef { side, attribute }))
            }
            other => Err(ExpressionError::UnexpectedToken {
                expected: "`source.<attr>`, `target.<attr>`, or a string literal",
                found: other.describe(),
                offset: spanned.offset,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::token::lex;

    fn parse_src(src: &str) -> Result<Expr, ExpressionError> {
        parse(&lex(src)?)
    }

    #[test]
    fn parses_simple_equality() {
        let expr = parse_src("source.email == target.email").unwrap();
        assert!(matches!(expr, Expr::Cmp { op: CmpOp::Eq, .. }));
    }

    #[test]
    fn or_binds_looser_than_and() {
        // a && b || c parses as (a && b) || c.
        let expr = parse_src(
            "source.a == 'x' && source.b == 'y' || source.c == 'z'",
        )
        .unwrap();
        assert!(matches!(expr, Expr::Or(lhs, _) if matches!(*lhs, Expr::And(..))));
    }

    #[test]
    fn rejects_chained_comparison() {
        assert!(parse_src("source.a == target.a == 'x'").is_err());
    }

    #[test]
    fn rejects_bare_identifier() {
        let err = parse_src("source").unwrap_err();
        assert!(matches!(err, ExpressionError::UnexpectedToken { .. }));
    }

    #[test]
    fn rejects_unknown_root_with_offset() {
        let err = parse_src("source.a == env.b").unwrap_err();
        assert_eq!(
            err,
            ExpressionError::UnknownRoot {
                root: "env".to_string(),
                offset: 12,
            }
        );
    }

    #[test]
    fn rejects_attribute_navigation() {
        assert!(parse_src("source.a.b == 'x'").is_err());
    }

    #[test]
    fn rejects_unbalanced_paren() {
        assert!(parse_src("(source.a == 'x'").is_err());
    }

    #[test]
    fn literal_on_either_side() {
        assert!(parse_src("'x' == source.a").is_ok());
        assert!(parse_src("source.a contains 'x'").is_ok());
    }
}
