/// The fault taxonomy.
///
/// Defines the closed set of fault categories a Sapp program can raise,
/// the numeric codes they travel under, and their rendered one-line
/// messages. Lexing faults and evaluation faults share this one type.
pub mod fault;
/// The fault reporter.
///
/// Renders a recovered fault through the interpreter's error color
/// channel. Used by the run entry point after the end-of-run dumps when
/// the `error` flag is clear.
pub mod reporter;

pub use fault::{Fault, MAX_RECOGNIZED};
