use std::fmt;

use crate::util::num::format_float;

/// A single lexed unit of a Sapp program.
///
/// The lexer produces a flat sequence of these and the evaluator reduces
/// that sequence in place; there is no tree stage in between. Comparing
/// tokens with `==` is structural, so an integer never equals a float
/// even when both hold the same mathematical value.
///
/// # Example
///
/// ```
/// use sapp::token::Token;
///
/// assert_ne!(Token::Integer(1), Token::Float(1.0));
/// assert_eq!(Token::Integer(5).to_string(), "(INT, \"5\")");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// `=` or a compound form such as `+=`.
    Assignment(String),
    /// One of `+`, `-`, `*`, `/`, or `%`.
    MathOperator(char),
    /// A bare `!`, `&`, `|`, or `^`.
    LogicOperator(char),
    /// A 64-bit integer literal.
    Integer(i64),
    /// A string literal. The value keeps its surrounding quotes.
    Str(String),
    /// A boolean value, reachable through the `true`/`false` constants.
    Boolean(bool),
    /// A 64-bit float literal.
    Float(f64),
    /// `[` or `]`.
    ListBracket(char),
    /// `{` or `}`.
    DictBracket(char),
    /// `(` or `)`.
    Parenthesis(char),
    /// A `.` between tokens.
    Dot,
    /// A `,` between tokens.
    Separator,
    /// A loose symbol such as `:`.
    Symbol(char),
    /// Reserved for methods referring to their own object.
    SelfRef,
    /// Reserved for instances of user-defined classes.
    Object(String),
    /// The null value, reachable through the `void` constant.
    Null,
    /// A reserved word.
    Keyword(Keyword),
    /// A comparison operator such as `==` or `<=`.
    EqualityOperator(String),
    /// A callable function value.
    Function(FunctionValue),
    /// A name to be resolved against the scope stack.
    Reference(String),
    /// A process flag assignment lexed from a `flag` statement.
    Config {
        /// The flag being addressed, e.g. `vars`.
        name:    String,
        /// The requested state: `on`, `off`, or `switch`.
        setting: String,
    },
    /// A fault carried as data. Evaluating it raises the fault.
    Error(u8),
    /// `...`, marking the parameter after it as variadic.
    Ellipsis,
    /// The text of an `embed` block, handed to the host executor.
    EscapeBlock(String),
    /// The pre-validated payload of a keyword statement.
    Directive(Directive),
}

impl Token {
    /// The three-letter kind tag used by dumps and audit traces.
    #[must_use]
    pub const fn tag(&self) -> &'static str {
        match self {
            Self::Assignment(_) => "ASS",
            Self::MathOperator(_) => "MAT",
            Self::LogicOperator(_) => "LOG",
            Self::Integer(_) => "INT",
            Self::Str(_) => "STR",
            Self::Boolean(_) => "BOL",
            Self::Float(_) => "FLO",
            Self::ListBracket(_) => "LST",
            Self::DictBracket(_) => "DCT",
            Self::Parenthesis(_) => "PAR",
            Self::Dot => "DOT",
            Self::Separator => "SEP",
            Self::Symbol(_) => "SYM",
            Self::SelfRef => "SLF",
            Self::Object(_) => "OBJ",
            Self::Null => "NUL",
            Self::Keyword(_) => "KWD",
            Self::EqualityOperator(_) => "EQU",
            Self::Function(_) => "FUN",
            Self::Reference(_) => "REF",
            Self::Config { .. } => "CON",
            Self::Error(_) => "ERR",
            Self::Ellipsis => "ELI",
            Self::EscapeBlock(_) => "ESC",
            Self::Directive(_) => "DIR",
        }
    }

    /// The plain text of the value, without the quotes a string carries.
    ///
    /// This is the form `print` arguments and other user-facing output
    /// take, as opposed to the tagged form [`Token`]'s `Display` renders.
    #[must_use]
    pub fn render(&self) -> String {
        match self {
            Self::Str(text) => text.strip_prefix('"')
                                   .and_then(|t| t.strip_suffix('"'))
                                   .unwrap_or(text)
                                   .to_owned(),
            other => other.value_text(),
        }
    }

    fn value_text(&self) -> String {
        match self {
            Self::Assignment(op) | Self::EqualityOperator(op) => op.clone(),
            Self::MathOperator(c)
            | Self::LogicOperator(c)
            | Self::ListBracket(c)
            | Self::DictBracket(c)
            | Self::Parenthesis(c)
            | Self::Symbol(c) => c.to_string(),
            Self::Integer(value) => value.to_string(),
            Self::Str(text) | Self::EscapeBlock(text) => text.clone(),
            Self::Boolean(value) => value.to_string(),
            Self::Float(value) => format_float(*value),
            Self::Dot => ".".to_owned(),
            Self::Separator => ",".to_owned(),
            Self::SelfRef => "self".to_owned(),
            Self::Object(name) | Self::Reference(name) => name.clone(),
            Self::Null => "void".to_owned(),
            Self::Keyword(keyword) => keyword.text().to_owned(),
            Self::Function(function) => function.summary(),
            Self::Config { name, setting } => format!("({name}, {setting})"),
            Self::Error(code) => code.to_string(),
            Self::Ellipsis => "...".to_owned(),
            Self::Directive(directive) => directive.value_text(),
        }
    }
}

/// The dump form: `(TAG, "value")`, with newlines and escape characters
/// made visible so one token always occupies one line.
impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = self.value_text()
                        .replace('\n', "\\n")
                        .replace('\x1b', "\\x1b");
        write!(f, "({}, \"{}\")", self.tag(), value)
    }
}

/// A reserved word of the language.
///
/// Only some keywords drive behavior today; the rest are reserved and
/// evaluate to nothing. The lexer matches these by prefix, in the order
/// of [`Keyword::ALL`], without requiring a word boundary after the
/// match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    Func,
    If,
    Elif,
    Else,
    For,
    While,
    In,
    Break,
    Continue,
    Embed,
    Search,
    Switch,
    Return,
    Case,
    Default,
    Class,
    Global,
    Flag,
    Audit,
    Watch,
    Color,
    Dump,
    Existing,
}

impl Keyword {
    /// Every keyword, in the order the lexer tries them.
    pub const ALL: [Self; 23] = [Self::Func,
                                 Self::If,
                                 Self::Elif,
                                 Self::Else,
                                 Self::For,
                                 Self::While,
                                 Self::In,
                                 Self::Break,
                                 Self::Continue,
                                 Self::Embed,
                                 Self::Search,
                                 Self::Switch,
                                 Self::Return,
                                 Self::Case,
                                 Self::Default,
                                 Self::Class,
                                 Self::Global,
                                 Self::Flag,
                                 Self::Audit,
                                 Self::Watch,
                                 Self::Color,
                                 Self::Dump,
                                 Self::Existing];

    /// The source text of the keyword.
    #[must_use]
    pub const fn text(self) -> &'static str {
        match self {
            Self::Func => "func",
            Self::If => "if",
            Self::Elif => "elif",
            Self::Else => "else",
            Self::For => "for",
            Self::While => "while",
            Self::In => "in",
            Self::Break => "break",
            Self::Continue => "continue",
            Self::Embed => "embed",
            Self::Search => "search",
            Self::Switch => "switch",
            Self::Return => "return",
            Self::Case => "case",
            Self::Default => "default",
            Self::Class => "class",
            Self::Global => "global",
            Self::Flag => "flag",
            Self::Audit => "audit",
            Self::Watch => "watch",
            Self::Color => "color",
            Self::Dump => "dump",
            Self::Existing => "existing",
        }
    }
}

/// The payload of a keyword statement, validated by the lexer.
///
/// Directives never print or mutate anything themselves. They sit in the
/// token sequence directly after their keyword and the evaluator acts on
/// the pair.
#[derive(Debug, Clone, PartialEq)]
pub enum Directive {
    /// The name an `audit` statement inspects.
    Audit(String),
    /// The target word of a `dump` statement, checked at evaluation time.
    Dump(String),
    /// The name an `existing` statement looks up.
    Existing(String),
    /// The name a `watch` statement adds to the watch list.
    Watch(String),
    /// A resolved `color` statement.
    Color {
        /// The output channel being recolored.
        channel:  String,
        /// The decoded ANSI escape sequence.
        sequence: String,
    },
}

impl Directive {
    fn value_text(&self) -> String {
        match self {
            Self::Audit(name) | Self::Dump(name) | Self::Existing(name) | Self::Watch(name) => {
                name.clone()
            },
            Self::Color { channel, sequence } => format!("{channel} {sequence}"),
        }
    }
}

/// The value a `func` definition binds: its parameter groups and the raw
/// tokens of its body. The body is evaluated fresh on every call.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionValue {
    /// Parameter groups in declaration order.
    pub params: Vec<ParamGroup>,
    /// The tokens between the braces of the definition.
    pub body:   Vec<Token>,
}

impl FunctionValue {
    /// A short signature line, e.g. `<func (...args, sep=, end=)>`.
    #[must_use]
    pub fn summary(&self) -> String {
        let params: Vec<String> = self.params.iter().map(ParamGroup::label).collect();
        format!("<func ({})>", params.join(", "))
    }
}

/// One declared parameter of a function.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamGroup {
    /// A plain parameter; omitting its argument is a fault.
    Required(String),
    /// A parameter with a fallback expression.
    Defaulted {
        /// The name bound in the call scope.
        name:    String,
        /// Tokens evaluated when no argument is supplied.
        default: Vec<Token>,
    },
    /// A parameter that soaks up every remaining argument, rendered and
    /// joined into one string.
    Variadic(String),
}

impl ParamGroup {
    fn label(&self) -> String {
        match self {
            Self::Required(name) => name.clone(),
            Self::Defaulted { name, .. } => format!("{name}="),
            Self::Variadic(name) => format!("...{name}"),
        }
    }
}
