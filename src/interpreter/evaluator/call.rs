use crate::{
    error::Fault,
    interpreter::evaluator::core::{EvalResult, Interpreter},
    token::{FunctionValue, ParamGroup, Token},
};

impl Interpreter {
    /// Handles a `func` definition statement.
    ///
    /// The cursor sits on the keyword; `<name> ( <groups> ) { <body> }`
    /// follows. The parameter groups and the body span are captured
    /// verbatim and bound under the name in the innermost scope.
    ///
    /// # Returns
    /// The cursor position just past the closing brace. The definition
    /// tokens stay in the sequence.
    pub(crate) fn define_function(&mut self,
                                  tokens: &mut Vec<Token>,
                                  cursor: usize)
                                  -> EvalResult<usize> {
        let Some(Token::Reference(name)) = tokens.get(cursor + 1).cloned() else {
            return Err(Fault::Unknown);
        };
        if self.scopes.constants_contain(&name) {
            return Err(Fault::ConstantAssignment);
        }
        if !matches!(tokens.get(cursor + 2), Some(Token::Parenthesis('('))) {
            return Err(Fault::Unknown);
        }
        let (spans, close) = split_groups(tokens, cursor + 3)?;
        let mut params = Vec::new();
        for span in &spans {
            if span.is_empty() {
                continue;
            }
            params.push(parse_group(span)?);
        }
        if !matches!(tokens.get(close + 1), Some(Token::DictBracket('{'))) {
            return Err(Fault::Unknown);
        }
        let (body, end) = capture_body(tokens, close + 2);
        self.scopes
            .set(&name, Token::Function(FunctionValue { params, body }), &mut *self.out);
        Ok(end)
    }

    /// Invokes the function at `cursor`, splicing its result in place.
    ///
    /// The call span `( <arguments> )` is drained from the sequence and
    /// the function token replaced by the call result.
    pub(crate) fn invoke(&mut self, tokens: &mut Vec<Token>, cursor: usize) -> EvalResult<()> {
        let Some(Token::Function(function)) = tokens.get(cursor).cloned() else {
            return Err(Fault::Unknown);
        };
        let mut close = None;
        let mut depth = 1_usize;
        for at in cursor + 2..tokens.len() {
            match &tokens[at] {
                Token::Parenthesis('(') => depth += 1,
                Token::Parenthesis(')') => {
                    depth -= 1;
                    if depth == 0 {
                        close = Some(at);
                        break;
                    }
                },
                _ => {},
            }
        }
        let Some(close) = close else {
            return Err(Fault::Unknown);
        };
        let span: Vec<Token> = tokens.drain(cursor + 1..=close).collect();
        let arguments = split_arguments(&span[1..span.len() - 1]);
        let result = self.call(&function, arguments)?;
        tokens[cursor] = result;
        Ok(())
    }

    /// Runs a function body in a fresh scope.
    ///
    /// The scope is popped when this returns, fault or not. A reference
    /// left over by the body is resolved while the call scope is still
    /// alive, so parameters can be returned directly.
    fn call(&mut self, function: &FunctionValue, arguments: Vec<Vec<Token>>) -> EvalResult<Token> {
        let _guard = self.scopes.scoped();
        self.bind_parameters(&function.params, arguments)?;
        let residual = self.eval_sequence(function.body.clone())?;
        match residual.into_iter().next() {
            Some(Token::Reference(name)) => self.deref(&name),
            Some(token) => Ok(token),
            None => Ok(Token::Null),
        }
    }

    /// Binds call arguments to parameter groups in the innermost scope.
    ///
    /// Required groups take one span each and fault when none is left;
    /// defaulted groups fall back to their captured default span; a
    /// variadic group soaks every remaining span into one
    /// space-separated string. Surplus spans are dropped.
    fn bind_parameters(&mut self,
                       params: &[ParamGroup],
                       arguments: Vec<Vec<Token>>)
                       -> EvalResult<()> {
        let mut supplied = arguments.into_iter();
        for param in params {
            match param {
                ParamGroup::Required(name) => {
                    let Some(span) = supplied.next() else {
                        return Err(Fault::MissingArgument);
                    };
                    let value = self.eval_argument(span)?;
                    self.scopes.set(name, value, &mut *self.out);
                },
                ParamGroup::Defaulted { name, default } => {
                    let value = match supplied.next() {
                        Some(span) => self.eval_argument(span)?,
                        None => self.eval_argument(default.clone())?,
                    };
                    self.scopes.set(name, value, &mut *self.out);
                },
                ParamGroup::Variadic(name) => {
                    let mut rendered = Vec::new();
                    for span in supplied.by_ref() {
                        rendered.push(self.eval_argument(span)?.render());
                    }
                    let joined = rendered.join(" ");
                    self.scopes
                        .set(name, Token::Str(format!("\"{joined}\"")), &mut *self.out);
                },
            }
        }
        Ok(())
    }

    /// Evaluates one argument span down to a single value.
    ///
    /// An empty span is a fault so a skipped argument never binds
    /// silently.
    fn eval_argument(&mut self, span: Vec<Token>) -> EvalResult<Token> {
        if span.is_empty() {
            return Err(Fault::EmptyArgument);
        }
        let mut residual = self.eval_sequence(span)?;
        if residual.is_empty() {
            return Ok(Token::Null);
        }
        Ok(residual.remove(0))
    }
}

/// Splits the parameter list at `start` into separator-delimited spans.
///
/// `start` is the index just inside the opening parenthesis. Nested
/// parentheses stay inside their span. Returns the spans and the index
/// of the closing parenthesis; a list that never closes is a fault.
fn split_groups(tokens: &[Token], start: usize) -> EvalResult<(Vec<Vec<Token>>, usize)> {
    let mut spans = vec![Vec::new()];
    let mut depth = 1_usize;
    for at in start..tokens.len() {
        let token = &tokens[at];
        match token {
            Token::Parenthesis('(') => depth += 1,
            Token::Parenthesis(')') => {
                depth -= 1;
                if depth == 0 {
                    return Ok((spans, at));
                }
            },
            Token::Separator if depth == 1 => {
                spans.push(Vec::new());
                continue;
            },
            _ => {},
        }
        if let Some(span) = spans.last_mut() {
            span.push(token.clone());
        }
    }
    Err(Fault::Unknown)
}

/// Parses one parameter group: a bare name, `name = <default>`, or an
/// ellipsis followed by a name.
fn parse_group(span: &[Token]) -> EvalResult<ParamGroup> {
    match span {
        [Token::Reference(name)] => Ok(ParamGroup::Required(name.clone())),
        [Token::Ellipsis, Token::Reference(name)] => Ok(ParamGroup::Variadic(name.clone())),
        [Token::Reference(name), Token::Assignment(op), default @ ..] if op == "=" => {
            Ok(ParamGroup::Defaulted { name:    name.clone(),
                                       default: default.to_vec(), })
        },
        _ => Err(Fault::Unknown),
    }
}

/// Captures the body span between depth-matched curly braces.
///
/// `start` is the index just inside the opening brace. Interior braces
/// stay in the body. Returns the body and the index just past the
/// closing brace; an unterminated body runs to the end of the sequence.
fn capture_body(tokens: &[Token], start: usize) -> (Vec<Token>, usize) {
    let mut body = Vec::new();
    let mut depth = 1_usize;
    let mut at = start;
    while at < tokens.len() {
        match &tokens[at] {
            Token::DictBracket('{') => depth += 1,
            Token::DictBracket('}') => {
                depth -= 1;
                if depth == 0 {
                    return (body, at + 1);
                }
            },
            _ => {},
        }
        body.push(tokens[at].clone());
        at += 1;
    }
    (body, at)
}

/// Splits a call's argument tokens into separator-delimited spans.
///
/// Separators inside nested parentheses stay in their span. A single
/// trailing empty span (from `f()` or a trailing separator) is dropped;
/// interior empty spans are kept so a skipped argument is visible to
/// the binder.
fn split_arguments(inner: &[Token]) -> Vec<Vec<Token>> {
    let mut spans = vec![Vec::new()];
    let mut depth = 0_usize;
    for token in inner {
        match token {
            Token::Parenthesis('(') => depth += 1,
            Token::Parenthesis(')') => depth = depth.saturating_sub(1),
            Token::Separator if depth == 0 => {
                spans.push(Vec::new());
                continue;
            },
            _ => {},
        }
        if let Some(span) = spans.last_mut() {
            span.push(token.clone());
        }
    }
    if spans.last().is_some_and(Vec::is_empty) {
        spans.pop();
    }
    spans
}
