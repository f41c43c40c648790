/// The highest fault code with a category of its own. A fault raised
/// with a code above this is never rendered; it aborts the run.
pub const MAX_RECOGNIZED: u8 = 9;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Represents every fault a Sapp program can raise.
///
/// Each category carries a fixed numeric code so faults can travel
/// through the token sequence as data: an error token holds a code, and
/// evaluating it raises the matching fault. Whether a recognized fault
/// stops the process or is rendered and recovered from is decided by
/// the `error` process flag; a code above the recognized range is
/// always fatal.
pub enum Fault {
    /// A fault with no more specific category, code 0.
    Unknown,
    /// Assignment targeted a name in the constants scope, code 1.
    ConstantAssignment,
    /// A string literal was still open at the end of input, code 2.
    UnterminatedString,
    /// A reference did not resolve in any scope, code 3.
    UndefinedName,
    /// A `watch` statement had no further code after it, code 4.
    DanglingWatch,
    /// An operation was applied to value kinds it is not defined for,
    /// code 5.
    TypeMismatch,
    /// Division or modulo by zero, code 6.
    DivisionByZero,
    /// An `audit` statement named an undefined variable, code 7.
    AuditUndefined,
    /// A function argument group evaluated to nothing, code 8.
    EmptyArgument,
    /// A call omitted an argument for a required parameter, code 9.
    MissingArgument,
    /// A host-written code above [`MAX_RECOGNIZED`]. Carries the raw
    /// code through the gate so the run aborts with it.
    Hosted(u8),
}

impl Fault {
    /// The numeric code of the category.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Unknown => 0,
            Self::ConstantAssignment => 1,
            Self::UnterminatedString => 2,
            Self::UndefinedName => 3,
            Self::DanglingWatch => 4,
            Self::TypeMismatch => 5,
            Self::DivisionByZero => 6,
            Self::AuditUndefined => 7,
            Self::EmptyArgument => 8,
            Self::MissingArgument => 9,
            Self::Hosted(code) => code,
        }
    }

    /// Maps a numeric code back to its category.
    ///
    /// A code above [`MAX_RECOGNIZED`] has no category of its own; it is
    /// carried as [`Fault::Hosted`] so the gate can abort the run with
    /// the code intact.
    ///
    /// # Example
    ///
    /// ```
    /// use sapp::error::Fault;
    ///
    /// assert_eq!(Fault::from_code(6), Fault::DivisionByZero);
    /// assert_eq!(Fault::from_code(200), Fault::Hosted(200));
    /// assert_eq!(Fault::from_code(200).code(), 200);
    /// ```
    #[must_use]
    pub const fn from_code(code: u8) -> Self {
        match code {
            0 => Self::Unknown,
            1 => Self::ConstantAssignment,
            2 => Self::UnterminatedString,
            3 => Self::UndefinedName,
            4 => Self::DanglingWatch,
            5 => Self::TypeMismatch,
            6 => Self::DivisionByZero,
            7 => Self::AuditUndefined,
            8 => Self::EmptyArgument,
            9 => Self::MissingArgument,
            _ => Self::Hosted(code),
        }
    }
}

impl std::fmt::Display for Fault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unknown => write!(f, "UnknownError: unknown error occurred"),
            Self::ConstantAssignment => {
                write!(f, "ConstantAssignmentError: cannot assign to constant value")
            },
            Self::UnterminatedString => write!(f, "UnterminatedStringError: unterminated string"),
            Self::UndefinedName => write!(f, "UndefinedNameError: variable name not defined"),
            Self::DanglingWatch => write!(f,
                                          "DanglingWatchError: watch statement is not followed by more code"),
            Self::TypeMismatch => write!(f, "OperationTypeError: invalid type(s) for operation"),
            Self::DivisionByZero => write!(f, "ZeroDivisionError: cannot divide by zero"),
            Self::AuditUndefined => {
                write!(f, "AuditVarError: tried to audit undefined variable")
            },
            Self::EmptyArgument => write!(f, "EmptyFuncArgError: function argument had no value"),
            Self::MissingArgument => {
                write!(f, "MissingFuncArgError: missing required function argument")
            },
            Self::Hosted(code) => write!(f, "HostError: unrecognized fault code {code}"),
        }
    }
}

impl std::error::Error for Fault {}
