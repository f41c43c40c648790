use crate::token::Token;

/// The host hook behind the `embed` keyword.
///
/// An `embed` block carries foreign code the interpreter itself never
/// runs. When one is reached, the de-indented block text and a flattened
/// snapshot of every visible binding are handed to the executor. A
/// `Some` result lands in the token sequence as a string token; `None`
/// leaves a null token in its place.
///
/// The default executor discards every block, so embedding a host
/// language is strictly opt-in.
///
/// # Example
///
/// ```
/// use sapp::{
///     interpreter::{evaluator::core::Interpreter, executor::EscapeExecutor},
///     token::Token,
/// };
///
/// struct Shout;
///
/// impl EscapeExecutor for Shout {
///     fn execute(&mut self, block: &str, _bindings: &[(String, Token)]) -> Option<String> {
///         Some(block.to_uppercase())
///     }
/// }
///
/// let mut interpreter = Interpreter::new();
/// interpreter.executor = Box::new(Shout);
/// interpreter.run("embed {\n\thello\n}").unwrap();
/// assert_eq!(interpreter.tokens, vec![Token::Str("\"HELLO\"".to_owned())]);
/// ```
pub trait EscapeExecutor {
    /// Runs one block. `bindings` lists every visible name exactly once,
    /// innermost scope winning.
    fn execute(&mut self, block: &str, bindings: &[(String, Token)]) -> Option<String>;
}

/// The default executor. It ignores every block.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullExecutor;

impl EscapeExecutor for NullExecutor {
    fn execute(&mut self, _block: &str, _bindings: &[(String, Token)]) -> Option<String> {
        None
    }
}
