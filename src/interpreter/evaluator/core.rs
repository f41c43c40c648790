use std::io::{self, Write};

use crate::{
    error::{reporter, Fault, MAX_RECOGNIZED},
    interpreter::{
        executor::{EscapeExecutor, NullExecutor},
        lexer,
        palette::{Channel, Palette},
        scope::ScopeStack,
    },
    token::{Directive, FunctionValue, Keyword, ParamGroup, Token},
};

/// Result type used by the evaluator.
///
/// All evaluation functions return either a value of type `T` or a
/// [`Fault`] describing the failure.
pub type EvalResult<T> = Result<T, Fault>;

/// Signal produced by evaluating one token sequence.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The sequence was reduced to its end.
    Completed,
    /// A `return` keyword cut the sequence short, carrying the evaluated
    /// tail for the caller.
    Returned(Vec<Token>),
}

/// Diagnostic switches toggled by `flag` statements.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Flags {
    /// Print every variable in every scope once the run finishes.
    pub vars:   bool,
    /// Dump the final token sequence once the run finishes.
    pub tokens: bool,
    /// Propagate faults to the caller instead of reporting and recovering.
    pub error:  bool,
}

/// Stores the interpreter state.
///
/// This struct holds the scope stack, the diagnostic flags, the console
/// palette, and the token sequence left over from the most recent run.
///
/// ## Usage
///
/// `Interpreter` is created once and reused: each call to
/// [`Interpreter::run`] lexes and reduces one source text against the
/// accumulated state, so variables and functions persist between runs.
/// All fields are public so embedders can inspect scopes, rebind the
/// output sink, or install an escape executor.
pub struct Interpreter {
    pub scopes:   ScopeStack,
    /// Diagnostic switches toggled by `flag` statements.
    pub flags:    Flags,
    /// Escape sequences for the console channels.
    pub palette:  Palette,
    /// Token sequence left over from the most recent run.
    pub tokens:   Vec<Token>,
    /// Host hook invoked for escape blocks.
    pub executor: Box<dyn EscapeExecutor>,
    /// Sink for all interpreter output.
    pub out:      Box<dyn Write>,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    /// Creates an interpreter with the built-in constants bound, output
    /// wired to stdout, and no escape executor installed.
    #[must_use]
    pub fn new() -> Self {
        Self { scopes:   ScopeStack::new(Self::builtins()),
               flags:    Flags::default(),
               palette:  Palette::default(),
               tokens:   Vec::new(),
               executor: Box::new(NullExecutor),
               out:      Box::new(io::stdout()), }
    }

    /// Bindings seeded into the constants scope.
    fn builtins() -> Vec<(String, Token)> {
        vec![("true".to_owned(), Token::Boolean(true)),
             ("false".to_owned(), Token::Boolean(false)),
             ("void".to_owned(), Token::Null),
             ("print".to_owned(), Token::Function(Self::print_builtin()))]
    }

    /// The built-in `print` soaks its arguments into a single string and
    /// forwards them to the host through an escape block.
    fn print_builtin() -> FunctionValue {
        FunctionValue { params:
                            vec![ParamGroup::Variadic("args".to_owned()),
                                 ParamGroup::Defaulted { name:    "sep".to_owned(),
                                                         default:
                                                             vec![Token::Str("\" \"".to_owned())], },
                                 ParamGroup::Defaulted { name:    "end".to_owned(),
                                                         default:
                                                             vec![Token::Str("\"\n\"".to_owned())], }],
                        body:   vec![Token::Keyword(Keyword::Embed),
                                     Token::EscapeBlock("\tprint(args, sep, end)".to_owned())], }
    }

    /// Runs one source text against the accumulated interpreter state.
    ///
    /// The text is lexed and the resulting sequence reduced in place;
    /// afterwards any dumps requested through flags are printed. A
    /// recognized fault is rendered on the error channel and swallowed
    /// unless the `error` flag is set, in which case the first fault
    /// aborts the run and is handed to the caller. A fault whose code
    /// is above [`MAX_RECOGNIZED`] is never rendered: it aborts the run
    /// whatever the flag says.
    pub fn run(&mut self, source: &str) -> EvalResult<()> {
        match self.execute(source) {
            Ok(()) => {
                self.end_of_run_dumps();
                Ok(())
            },
            Err(fault) => {
                if self.flags.error || fault.code() > MAX_RECOGNIZED {
                    return Err(fault);
                }
                self.end_of_run_dumps();
                reporter::report(fault, &self.palette, &mut *self.out);
                Ok(())
            },
        }
    }

    /// Lexes and evaluates, keeping the token sequence as it stood when
    /// evaluation stopped so end-of-run dumps can show it.
    fn execute(&mut self, source: &str) -> EvalResult<()> {
        let mut tokens = lexer::tokenize(source)?;
        let outcome = self.evaluate(&mut tokens);
        self.tokens = tokens;
        outcome.map(|_| ())
    }

    fn end_of_run_dumps(&mut self) {
        if self.flags.vars {
            self.print_variables();
        }
        if self.flags.tokens {
            let tokens = std::mem::take(&mut self.tokens);
            self.dump_tokens(&tokens);
            self.tokens = tokens;
        }
    }

    /// Reduces a token sequence in place, strictly left to right.
    ///
    /// The cursor only advances past a token once it can no longer
    /// change; every splice leaves the cursor where it is so the edited
    /// sequence is re-examined on the next pass of the loop.
    ///
    /// # Parameters
    /// - `tokens`: Sequence to reduce. Edited in place.
    ///
    /// # Returns
    /// [`Outcome::Returned`] when a `return` keyword cut the sequence
    /// short, [`Outcome::Completed`] otherwise.
    pub fn evaluate(&mut self, tokens: &mut Vec<Token>) -> EvalResult<Outcome> {
        let mut cursor = 0;
        while cursor < tokens.len() {
            match tokens[cursor].clone() {
                Token::Error(code) => return Err(Fault::from_code(code)),
                Token::Keyword(Keyword::Return) => {
                    let tail = tokens.split_off(cursor + 1);
                    let residual = self.eval_sequence(tail)?;
                    return Ok(Outcome::Returned(residual));
                },
                Token::Keyword(keyword) => cursor = self.keyword_step(tokens, cursor, keyword)?,
                Token::Config { name, setting } => {
                    self.apply_flag(&name, &setting);
                    cursor += 1;
                },
                Token::Assignment(op) => {
                    if op == "=" {
                        cursor = self.assign(tokens, cursor)?;
                    } else {
                        self.desugar_compound(tokens, cursor, &op)?;
                    }
                },
                Token::MathOperator(_) => {
                    if cursor == 0 {
                        return Err(Fault::TypeMismatch);
                    }
                    let (result, last) = self.reduce(tokens, cursor - 1)?;
                    tokens[cursor - 1] = result;
                    tokens.drain(cursor..=last);
                },
                Token::Function(_) => {
                    if matches!(tokens.get(cursor + 1), Some(Token::Parenthesis('('))) {
                        self.invoke(tokens, cursor)?;
                    }
                    cursor += 1;
                },
                Token::Reference(name) => {
                    if matches!(tokens.get(cursor + 1), Some(Token::Assignment(_))) {
                        cursor += 1;
                    } else {
                        tokens[cursor] = self.deref(&name)?;
                    }
                },
                _ => cursor += 1,
            }
        }
        Ok(Outcome::Completed)
    }

    /// Executes one keyword statement and returns the next cursor
    /// position.
    ///
    /// Keywords reserved for future language revisions reduce to nothing
    /// and pass the cursor along.
    fn keyword_step(&mut self,
                    tokens: &mut Vec<Token>,
                    cursor: usize,
                    keyword: Keyword)
                    -> EvalResult<usize> {
        match keyword {
            Keyword::Embed => {
                if let Some(Token::EscapeBlock(block)) = tokens.get(cursor + 1).cloned() {
                    tokens[cursor] = self.run_escape(&block);
                    tokens.remove(cursor + 1);
                } else {
                    tokens[cursor] = Token::Null;
                }
                Ok(cursor + 1)
            },
            Keyword::Func => self.define_function(tokens, cursor),
            Keyword::Audit => self.audit_step(tokens, cursor),
            Keyword::Watch => {
                if let Some(Token::Directive(Directive::Watch(name))) = tokens.get(cursor + 1) {
                    self.scopes.add_watch(name);
                    Ok(cursor + 2)
                } else {
                    Ok(cursor + 1)
                }
            },
            Keyword::Color => {
                if let Some(Token::Directive(Directive::Color { channel, sequence })) =
                    tokens.get(cursor + 1).cloned()
                    && let Some(channel) = Channel::from_name(&channel)
                {
                    self.palette.set(channel, sequence);
                    Ok(cursor + 2)
                } else {
                    Ok(cursor + 1)
                }
            },
            Keyword::Dump => {
                if let Some(Token::Directive(Directive::Dump(target))) =
                    tokens.get(cursor + 1).cloned()
                {
                    self.dump(&target, tokens);
                    Ok(cursor + 2)
                } else {
                    Ok(cursor + 1)
                }
            },
            Keyword::Existing => {
                if let Some(Token::Directive(Directive::Existing(name))) =
                    tokens.get(cursor + 1).cloned()
                {
                    self.report_existing(&name);
                    Ok(cursor + 2)
                } else {
                    Ok(cursor + 1)
                }
            },
            _ => Ok(cursor + 1),
        }
    }

    /// Prints the report requested by an `audit` statement.
    ///
    /// A bare `audit` reports every namespace. With a directive payload
    /// only that variable's bindings are reported, and a name that
    /// resolves nowhere is a fault.
    fn audit_step(&mut self, tokens: &[Token], cursor: usize) -> EvalResult<usize> {
        let header = format!("{}AUDIT:{}",
                             self.palette.get(Channel::AuditHeader),
                             self.palette.get(Channel::Audit));
        let _ = writeln!(self.out, "{header}");
        if let Some(Token::Directive(Directive::Audit(name))) = tokens.get(cursor + 1).cloned() {
            if !self.scopes.contains(&name) {
                return Err(Fault::AuditUndefined);
            }
            self.print_variable(&name);
            let _ = write!(self.out, "{}", self.palette.reset);
            Ok(cursor + 2)
        } else {
            self.print_variables();
            let _ = write!(self.out, "{}", self.palette.reset);
            Ok(cursor + 1)
        }
    }

    /// Evaluates the right-hand side of a plain assignment and binds the
    /// result in the innermost scope.
    ///
    /// The cursor sits on the `=`; the target reference precedes it and
    /// the expression follows. The expression tokens stay in the
    /// sequence, so the returned cursor jumps past them.
    fn assign(&mut self, tokens: &mut Vec<Token>, cursor: usize) -> EvalResult<usize> {
        if cursor == 0 {
            return Err(Fault::TypeMismatch);
        }
        let Token::Reference(name) = tokens[cursor - 1].clone() else {
            return Err(Fault::TypeMismatch);
        };
        if self.scopes.constants_contain(&name) {
            return Err(Fault::ConstantAssignment);
        }
        let (value, last) = self.reduce(tokens, cursor + 1)?;
        self.scopes.set(&name, value, &mut *self.out);
        Ok(last + 1)
    }

    /// Rewrites `x op= …` into `x = x op …` in place.
    ///
    /// The cursor is left on the new `=` so the next dispatch handles
    /// the rewritten assignment.
    fn desugar_compound(&mut self,
                        tokens: &mut Vec<Token>,
                        cursor: usize,
                        op: &str)
                        -> EvalResult<()> {
        if cursor == 0 {
            return Err(Fault::TypeMismatch);
        }
        let Some(Token::Reference(name)) = tokens.get(cursor - 1).cloned() else {
            return Err(Fault::TypeMismatch);
        };
        let Some(math) = op.chars().next() else {
            return Err(Fault::Unknown);
        };
        tokens[cursor] = Token::Assignment("=".to_owned());
        tokens.insert(cursor + 1, Token::Reference(name));
        tokens.insert(cursor + 2, Token::MathOperator(math));
        Ok(())
    }

    /// Applies one `flag <name> <setting>` statement.
    ///
    /// Unknown flag names are ignored; an unknown setting word prints a
    /// warning so a typo does not silently flip anything.
    fn apply_flag(&mut self, name: &str, setting: &str) {
        let Some(current) = self.flag_slot(name).map(|slot| *slot) else {
            return;
        };
        let next = match setting {
            "on" => true,
            "off" => false,
            "switch" => !current,
            _ => {
                self.warn(&format!("unknown flag setting \"{setting}\""));
                return;
            },
        };
        if let Some(slot) = self.flag_slot(name) {
            *slot = next;
        }
    }

    /// The audit master switch lives on the scope stack; the rest of the
    /// flags live here.
    fn flag_slot(&mut self, name: &str) -> Option<&mut bool> {
        match name {
            "vars" => Some(&mut self.flags.vars),
            "tokens" => Some(&mut self.flags.tokens),
            "error" => Some(&mut self.flags.error),
            "audit" => Some(&mut self.scopes.audit),
            _ => None,
        }
    }

    pub(crate) fn warn(&mut self, message: &str) {
        let line = self.palette.wrap(Channel::Warning, message);
        let _ = writeln!(self.out, "{line}");
    }

    /// Looks a name up through the scope stack, innermost first.
    pub(crate) fn deref(&mut self, name: &str) -> EvalResult<Token> {
        self.scopes
            .get(name, &mut *self.out)
            .cloned()
            .ok_or(Fault::UndefinedName)
    }

    /// De-indents an escape block and hands it to the installed executor.
    ///
    /// One level of tab indentation is stripped from every line. The
    /// executor sees the flattened view of all visible bindings; its
    /// result is coerced back into the sequence as a quoted string, or
    /// null when it produces nothing.
    fn run_escape(&mut self, block: &str) -> Token {
        let lines = lexer::break_lines(block);
        let body = lines.iter()
                        .map(|line| line.strip_prefix('\t').unwrap_or(line))
                        .collect::<Vec<_>>()
                        .join("\n");
        let bindings = self.scopes.flatten();
        match self.executor.execute(&body, &bindings) {
            Some(output) => Token::Str(format!("\"{output}\"")),
            None => Token::Null,
        }
    }

    /// Evaluates an owned sequence and returns what is left of it.
    ///
    /// A `return` inside the sequence yields its evaluated tail instead
    /// of the reduced sequence itself.
    pub(crate) fn eval_sequence(&mut self, mut tokens: Vec<Token>) -> EvalResult<Vec<Token>> {
        match self.evaluate(&mut tokens)? {
            Outcome::Returned(residual) => Ok(residual),
            Outcome::Completed => Ok(tokens),
        }
    }
}
