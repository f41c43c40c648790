/// The evaluator module reduces the token sequence and computes results.
///
/// The evaluator walks the flat token sequence with a cursor and splices
/// reduced values back in place of the spans that produced them. There is
/// no syntax tree; evaluation order is the token order. It also owns the
/// interpreter state shared by a run: scopes, flags, palette and output.
///
/// # Responsibilities
/// - Dispatches on the token under the cursor and edits the sequence in
///   place.
/// - Handles assignments, operator folding, keyword statements, and
///   function calls.
/// - Reports faults such as division by zero or invalid operand types.
pub mod evaluator;
/// The executor module defines the host hook for escape blocks.
///
/// Scripts can hand a block of foreign text to the embedding host through
/// the `embed` keyword. The executor trait receives the de-indented block
/// together with every visible binding and may hand a string back.
///
/// # Responsibilities
/// - Declares the `EscapeExecutor` trait implemented by embedders.
/// - Provides the default no-op executor.
pub mod executor;
/// The lexer module tokenizes source code for evaluation.
///
/// The lexer reads the raw source text and produces the flat sequence of
/// typed tokens the evaluator reduces in place. This is the only analysis
/// stage before evaluation.
///
/// # Responsibilities
/// - Converts the input character stream into typed tokens.
/// - Handles numeric and string literals, references, operators, and the
///   prefix-matched keywords with their directive payloads.
/// - Reports lexical faults such as an unterminated string.
pub mod lexer;
/// The palette module holds the console color channels.
///
/// All interpreter output is colored per channel: audit reports, error
/// and warning lines, and the general output channel. Scripts rebind
/// channels at runtime through the `color` keyword.
///
/// # Responsibilities
/// - Defines the `Channel` enum and the default escape sequences.
/// - Validates user-supplied colors against named entries and the ANSI
///   source pattern.
pub mod palette;
/// The scope module implements the lexical scope stack.
///
/// Variables live in a stack of scopes: constants, globals, then one
/// scope per active function call. Lookup walks the stack innermost
/// first. The stack also owns the audit machinery that traces reads and
/// writes.
///
/// # Responsibilities
/// - Binds, resolves, and shadows variables across the stack.
/// - Emits audit trace lines for watched names per the scope policy.
/// - Guards scope lifetimes so call scopes pop on every exit path.
pub mod scope;
