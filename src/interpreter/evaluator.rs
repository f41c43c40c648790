/// Function definition and invocation.
///
/// Captures parameter groups and body spans from the sequence, binds
/// arguments into call scopes, and splices call results in place.
pub mod call;

/// Core evaluation logic and interpreter state.
///
/// Contains the in-place reduction engine, the interpreter struct with
/// its flags and palette, keyword dispatch, and fault propagation.
pub mod core;

/// Console diagnostics.
///
/// Implements the dump printers, the audit report rows, and the
/// `existing` probe.
pub mod diagnostics;

/// Operator folding.
///
/// Folds runs of math and equality operators over reduced operands,
/// strictly left to right.
pub mod reduce;
