//! Rule validity checks
//!
//! A rule is valid when its name is non-empty, its expression is non-empty
//! and syntactically well-formed, and none of its label keys is empty. The
//! expression check is pluggable through [`ExpressionValidator`].

/// Why a rule was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("rule name is empty")]
    EmptyName,

    #[error("expression is empty")]
    EmptyExpression,

    #[error("malformed expression: {0}")]
    MalformedExpression(String),

    #[error("label with empty name")]
    EmptyLabelKey,
}

/// Syntactic well-formedness check for query expressions.
///
/// Implementations only decide whether an expression parses; they never
/// evaluate it.
pub trait ExpressionValidator: Send + Sync {
    /// Return a human-readable reason when `expr` is not well-formed.
    fn check(&self, expr: &str) -> std::result::Result<(), String>;
}

/// Structural PromQL check: balanced and correctly nested `()`, `[]`, `{}`
/// outside string literals, terminated string literals, and no dangling
/// binary operator at the end of the expression.
#[derive(Debug, Clone, Copy, Default)]
pub struct PromqlSyntax;

const TRAILING_OPERATORS: &[char] = &['+', '-', '*', '/', '%', '^', '=', '<', '>', '!', ','];
const TRAILING_KEYWORDS: &[&str] = &["and", "or", "unless", "by", "without", "on", "ignoring"];

impl ExpressionValidator for PromqlSyntax {
    fn check(&self, expr: &str) -> std::result::Result<(), String> {
        let mut open: Vec<char> = Vec::new();
        let mut chars = expr.chars();
        // Text outside strings and comments, used for the trailing check.
        let mut code = String::with_capacity(expr.len());

        while let Some(c) = chars.next() {
            match c {
                '"' | '\'' | '`' => {
                    let mut terminated = false;
                    while let Some(inner) = chars.next() {
                        if inner == '\\' && c != '`' {
                            chars.next();
                        } else if inner == c {
                            terminated = true;
                            break;
                        }
                    }
                    if !terminated {
                        return Err(format!("unterminated string literal starting with {c}"));
                    }
                    code.push('s');
                }
                '#' => {
                    for inner in chars.by_ref() {
                        if inner == '\n' {
                            break;
                        }
                    }
                    code.push(' ');
                }
                '(' | '[' | '{' => {
                    open.push(c);
                    code.push(c);
                }
                ')' | ']' | '}' => {
                    let expected = match c {
                        ')' => '(',
                        ']' => '[',
                        _ => '{',
                    };
                    match open.pop() {
                        Some(found) if found == expected => code.push(c),
                        Some(found) => {
                            return Err(format!("unexpected '{c}' closing '{found}'"));
                        }
                        None => return Err(format!("unexpected '{c}'")),
                    }
                }
                _ => code.push(c),
            }
        }

        if let Some(unclosed) = open.last() {
            return Err(format!("unclosed '{unclosed}'"));
        }

        let tail = code.trim_end();
        if tail.ends_with(TRAILING_OPERATORS) {
            return Err("expression ends with a binary operator".to_string());
        }
        let last_word = tail
            .rsplit(|c: char| !(c.is_alphanumeric() || c == '_' || c == ':'))
            .next()
            .unwrap_or("");
        if tail.len() > last_word.len() && TRAILING_KEYWORDS.contains(&last_word) {
            return Err(format!("expression ends with '{last_word}'"));
        }
        Ok(())
    }
}
