//! # sapp
//!
//! sapp is an interpreter for the Sapp scripting language written in Rust.
//! It lexes `.spp` source into a flat sequence of typed tokens and reduces
//! that sequence in place (there is no syntax tree) with lexical scoping,
//! functions, audit tracing, and a colored console.

#![warn(
    clippy::redundant_clone,
    clippy::needless_pass_by_value,
    clippy::similar_names,
    clippy::large_enum_variant,
    clippy::string_lit_as_bytes,
    clippy::match_same_arms,
    clippy::cargo,
    clippy::nursery,
    clippy::perf,
    clippy::style,
    clippy::suspicious,
    clippy::correctness,
    clippy::complexity,
    clippy::pedantic,
    //missing_docs,
)]
#![allow(clippy::missing_errors_doc)]

use crate::interpreter::evaluator::core::Interpreter;

/// Provides the fault taxonomy and console reporting.
///
/// This module defines every fault the interpreter can raise while lexing
/// or evaluating a script. Faults carry a small stable code so scripts and
/// embedders can recognize them, and render as one-line reports.
///
/// # Responsibilities
/// - Defines the `Fault` enum covering all failure modes.
/// - Maps faults to and from their stable numeric codes.
/// - Renders recoverable faults through the error color channel.
pub mod error;
/// Orchestrates the entire process of script execution.
///
/// This module ties together lexing, in-place evaluation, scoping, the
/// console palette, escape execution, and all supporting infrastructure to
/// provide a complete runtime for Sapp scripts. It exposes the public API
/// for embedding the interpreter.
///
/// # Responsibilities
/// - Coordinates all core components: lexer, evaluator, scope stack, and
///   console.
/// - Provides the `Interpreter` entry point for running scripts.
/// - Manages the flow of tokens and faults between phases.
pub mod interpreter;
/// Defines the token vocabulary of the language.
///
/// This module declares the `Token` enum the lexer produces and the
/// evaluator reduces, together with keywords, directive payloads, and
/// captured function values. Tokens are the only program representation;
/// they are tagged, rendered, and dumped throughout the interpreter.
///
/// # Responsibilities
/// - Defines the `Token` enum and all token kinds.
/// - Attaches the three-letter tags used by token dumps.
/// - Carries function parameter groups and body spans as values.
pub mod token;
/// General utilities for safe numeric conversion and helpers.
///
/// This module provides reusable helpers and conversion routines used
/// throughout the lexer and evaluator, including safe widening from
/// integer to floating-point values and float rendering.
///
/// # Responsibilities
/// - Safely convert between `i64` and `f64` without silent surprises.
/// - Render floats the way token dumps expect them.
pub mod util;

/// Runs a source text in a fresh interpreter.
///
/// This function lexes and evaluates every statement in `source` against
/// a new interpreter wired to stdout. Recoverable faults are reported on
/// the console and do not surface here; a hard error is returned only
/// when the script sets the `error` flag or the file machinery fails.
///
/// # Errors
/// Returns an error if a fault propagates under the `error` flag.
///
/// # Examples
/// ```
/// use sapp::run_source;
///
/// // A recoverable fault is reported on the console, not returned.
/// assert!(run_source("x = 1 / 0").is_ok());
///
/// // With the error flag set the same fault aborts the run.
/// assert!(run_source("flag error on\nx = 1 / 0").is_err());
/// ```
pub fn run_source(source: &str) -> Result<(), Box<dyn std::error::Error>> {
    let mut interpreter = Interpreter::new();
    interpreter.run(source)?;
    Ok(())
}

/// Runs a script file.
///
/// A path without the `.spp` extension gets it appended before the read,
/// so scripts can be named by stem.
///
/// # Errors
/// Returns an error when the file cannot be read, or if a fault
/// propagates under the `error` flag.
pub fn run_file(path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let mut path = path.to_owned();
    if !path.ends_with(".spp") {
        path.push_str(".spp");
    }
    let source = std::fs::read_to_string(&path)?;
    run_source(&source)
}
