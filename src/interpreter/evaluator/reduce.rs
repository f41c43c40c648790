use std::cmp::Ordering;

use crate::{
    error::Fault,
    interpreter::evaluator::core::{EvalResult, Interpreter},
    token::Token,
    util::num::int_to_float,
};

impl Interpreter {
    /// Folds the run of operators starting at the operand `first`.
    ///
    /// Consumes `<operand> <operator> <operand>` pairs strictly left to
    /// right until the token after the last consumed operand is neither
    /// a math nor an equality operator.
    ///
    /// # Parameters
    /// - `tokens`: Sequence being reduced. Operand references are
    ///   substituted and calls invoked in place as they are reached.
    /// - `first`: Index of the first operand.
    ///
    /// # Returns
    /// The folded value and the index of the last consumed token.
    pub(crate) fn reduce(&mut self,
                         tokens: &mut Vec<Token>,
                         first: usize)
                         -> EvalResult<(Token, usize)> {
        let mut result = self.resolve_operand(tokens, first)?;
        let mut last = first;
        loop {
            match tokens.get(last + 1).cloned() {
                Some(Token::MathOperator(op)) => {
                    let right = self.resolve_operand(tokens, last + 2)?;
                    result = apply_math(&result, op, &right)?;
                    last += 2;
                },
                Some(Token::EqualityOperator(op)) => {
                    let right = self.resolve_operand(tokens, last + 2)?;
                    result = Token::Boolean(compare(&result, &op, &right)?);
                    last += 2;
                },
                _ => break,
            }
        }
        Ok((result, last))
    }

    /// Fetches the value at `at`, substituting a reference or invoking a
    /// call in place first.
    fn resolve_operand(&mut self, tokens: &mut Vec<Token>, at: usize) -> EvalResult<Token> {
        if at >= tokens.len() {
            return Err(Fault::Unknown);
        }
        if let Token::Reference(name) = tokens[at].clone() {
            tokens[at] = self.deref(&name)?;
        }
        if matches!(tokens[at], Token::Function(_))
           && matches!(tokens.get(at + 1), Some(Token::Parenthesis('(')))
        {
            self.invoke(tokens, at)?;
        }
        Ok(tokens[at].clone())
    }
}

/// Applies one math operator to two reduced values.
fn apply_math(left: &Token, op: char, right: &Token) -> EvalResult<Token> {
    match (left, right) {
        (Token::Integer(a), Token::Integer(b)) => apply_integer(*a, op, *b),
        (Token::Float(a), Token::Float(b)) => apply_float(*a, op, *b),
        (Token::Integer(a), Token::Float(b)) => apply_float(int_to_float(*a), op, *b),
        (Token::Float(a), Token::Integer(b)) => apply_float(*a, op, int_to_float(*b)),
        (Token::Str(_), Token::Str(_)) if op == '+' => {
            Ok(Token::Str(format!("\"{}{}\"", left.render(), right.render())))
        },
        (Token::Str(_), Token::Integer(count)) if op == '*' => {
            let count = usize::try_from(*count).unwrap_or(0);
            Ok(Token::Str(format!("\"{}\"", left.render().repeat(count))))
        },
        _ => Err(Fault::TypeMismatch),
    }
}

/// Integer arithmetic, widening to float when an operation overflows.
fn apply_integer(a: i64, op: char, b: i64) -> EvalResult<Token> {
    match op {
        '+' => Ok(promote(a.checked_add(b), int_to_float(a) + int_to_float(b))),
        '-' => Ok(promote(a.checked_sub(b), int_to_float(a) - int_to_float(b))),
        '*' => Ok(promote(a.checked_mul(b), int_to_float(a) * int_to_float(b))),
        '/' => {
            if b == 0 {
                Err(Fault::DivisionByZero)
            } else {
                Ok(Token::Float(int_to_float(a) / int_to_float(b)))
            }
        },
        '%' => {
            if b == 0 {
                Err(Fault::DivisionByZero)
            } else {
                Ok(promote(a.checked_rem(b), int_to_float(a) % int_to_float(b)))
            }
        },
        _ => Err(Fault::TypeMismatch),
    }
}

/// Float arithmetic; division and modulo by zero fault rather than
/// producing an infinity.
fn apply_float(a: f64, op: char, b: f64) -> EvalResult<Token> {
    match op {
        '+' => Ok(Token::Float(a + b)),
        '-' => Ok(Token::Float(a - b)),
        '*' => Ok(Token::Float(a * b)),
        '/' => {
            if b == 0.0 {
                Err(Fault::DivisionByZero)
            } else {
                Ok(Token::Float(a / b))
            }
        },
        '%' => {
            if b == 0.0 {
                Err(Fault::DivisionByZero)
            } else {
                Ok(Token::Float(a % b))
            }
        },
        _ => Err(Fault::TypeMismatch),
    }
}

/// Keeps the integer result when one exists, otherwise falls back to
/// the widened float.
fn promote(exact: Option<i64>, widened: f64) -> Token {
    exact.map_or(Token::Float(widened), Token::Integer)
}

/// Evaluates one equality operator between two reduced values.
///
/// `==` and `!=` are exact: values of different kinds are simply
/// unequal. The ordered forms require two numbers or two strings.
fn compare(left: &Token, op: &str, right: &Token) -> EvalResult<bool> {
    match op {
        "==" => Ok(left == right),
        "!=" => Ok(left != right),
        ">" | "<" | ">=" | "<=" => ordering(left, op, right),
        _ => Err(Fault::TypeMismatch),
    }
}

/// Ordered comparison; mixed numeric widths compare as floats, strings
/// compare lexicographically on their unquoted text.
fn ordering(left: &Token, op: &str, right: &Token) -> EvalResult<bool> {
    match (left, right) {
        (Token::Integer(a), Token::Integer(b)) => Ok(decide(Some(a.cmp(b)), op)),
        (Token::Float(a), Token::Float(b)) => Ok(decide(a.partial_cmp(b), op)),
        (Token::Integer(a), Token::Float(b)) => Ok(decide(int_to_float(*a).partial_cmp(b), op)),
        (Token::Float(a), Token::Integer(b)) => Ok(decide(a.partial_cmp(&int_to_float(*b)), op)),
        (Token::Str(_), Token::Str(_)) => Ok(decide(Some(left.render().cmp(&right.render())), op)),
        _ => Err(Fault::TypeMismatch),
    }
}

/// True when the ordering satisfies the operator; an unordered pair
/// satisfies nothing.
fn decide(ordering: Option<Ordering>, op: &str) -> bool {
    match ordering {
        Some(Ordering::Less) => op == "<" || op == "<=",
        Some(Ordering::Equal) => op == "<=" || op == ">=",
        Some(Ordering::Greater) => op == ">" || op == ">=",
        None => false,
    }
}
