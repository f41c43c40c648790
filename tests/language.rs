use std::{
    fs,
    io::{self, Write},
    sync::{Arc, Mutex},
};

use sapp::{
    error::Fault,
    interpreter::{evaluator::core::Interpreter, executor::EscapeExecutor, lexer},
    token::{FunctionValue, Keyword, Token},
};
use walkdir::WalkDir;

#[test]
fn demo_scripts_run_clean() {
    let mut count = 0;

    for entry in
        WalkDir::new("demos").into_iter()
                             .filter_map(Result::ok)
                             .filter(|e| e.path().extension().is_some_and(|ext| ext == "spp"))
    {
        let path = entry.path();
        let source =
            fs::read_to_string(path).unwrap_or_else(|e| panic!("Failed to read {path:?}: {e}"));

        count += 1;
        let mut interpreter = Interpreter::new();
        interpreter.out = Box::new(Capture::default());
        interpreter.flags.error = true;
        if let Err(e) = interpreter.run(&source) {
            panic!("Demo {path:?} failed:\n{source}\nFault: {e}");
        }
    }

    assert!(count > 0, "No demo scripts found in demos");
}

/// Sink that keeps everything the interpreter writes.
#[derive(Clone, Default)]
struct Capture(Arc<Mutex<Vec<u8>>>);

impl Capture {
    fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl Write for Capture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Runs a script in a fresh interpreter and returns it with the captured
/// console output.
fn eval(source: &str) -> (Interpreter, String) {
    let capture = Capture::default();
    let mut interpreter = Interpreter::new();
    interpreter.out = Box::new(capture.clone());
    if let Err(e) = interpreter.run(source) {
        panic!("Script failed: {e}");
    }
    (interpreter, capture.text())
}

/// Runs a script expected to propagate a fault.
fn eval_fatal(source: &str) -> Fault {
    let mut interpreter = Interpreter::new();
    interpreter.out = Box::new(Capture::default());
    match interpreter.run(source) {
        Ok(()) => panic!("Script succeeded but was expected to fault"),
        Err(fault) => fault,
    }
}

fn value_of(interpreter: &Interpreter, name: &str) -> Token {
    interpreter.scopes
               .peek(name)
               .unwrap_or_else(|| panic!("{name} is not bound"))
               .clone()
}

#[test]
fn assignment_binds_in_global_scope() {
    let (interpreter, _) = eval("x = 5");
    assert_eq!(value_of(&interpreter, "x"), Token::Integer(5));
}

#[test]
fn arithmetic_folds_left_to_right() {
    let (interpreter, _) = eval("x = 2 + 3 * 4");
    assert_eq!(value_of(&interpreter, "x"), Token::Integer(20));
}

#[test]
fn division_always_widens_to_float() {
    let (interpreter, _) = eval("x = 8 / 2");
    assert_eq!(value_of(&interpreter, "x"), Token::Float(4.0));
}

#[test]
fn modulo_keeps_integers() {
    let (interpreter, _) = eval("x = 7 % 2");
    assert_eq!(value_of(&interpreter, "x"), Token::Integer(1));
}

#[test]
fn integer_overflow_widens_to_float() {
    let (interpreter, _) = eval("x = 9223372036854775808\ny = 9223372036854775807 + 1");
    assert_eq!(value_of(&interpreter, "x"), Token::Float(9_223_372_036_854_775_808.0));
    assert_eq!(value_of(&interpreter, "y"), Token::Float(9_223_372_036_854_775_808.0));
}

#[test]
fn compound_assignments_desugar() {
    let (interpreter, _) = eval("x = 2\nx += 3\nx *= 4");
    assert_eq!(value_of(&interpreter, "x"), Token::Integer(20));
}

#[test]
fn string_concat_keeps_quotes() {
    let (interpreter, _) = eval("x = \"ab\" + \"cd\"");
    assert_eq!(value_of(&interpreter, "x"), Token::Str("\"abcd\"".to_owned()));
}

#[test]
fn string_repetition() {
    let (interpreter, _) = eval("x = \"ab\" * 3");
    assert_eq!(value_of(&interpreter, "x"), Token::Str("\"ababab\"".to_owned()));
}

#[test]
fn equality_is_exact_across_kinds() {
    let (interpreter, _) = eval("a = 1 == 1.0\nb = 1 == 1\nc = 2 > 1.5\nd = \"a\" < \"b\"");
    assert_eq!(value_of(&interpreter, "a"), Token::Boolean(false));
    assert_eq!(value_of(&interpreter, "b"), Token::Boolean(true));
    assert_eq!(value_of(&interpreter, "c"), Token::Boolean(true));
    assert_eq!(value_of(&interpreter, "d"), Token::Boolean(true));
}

#[test]
fn comparison_chains_fold_left() {
    let (interpreter, _) = eval("x = 1 < 2 == true");
    assert_eq!(value_of(&interpreter, "x"), Token::Boolean(true));
}

#[test]
fn function_defaults_and_return() {
    let (interpreter, _) = eval("func f(a, b = 10) {\n\treturn a + b\n}\nx = f(5)\ny = f(5, 1)");
    assert_eq!(value_of(&interpreter, "x"), Token::Integer(15));
    assert_eq!(value_of(&interpreter, "y"), Token::Integer(6));
}

#[test]
fn call_without_arguments() {
    let (interpreter, _) = eval("func f() {\n\treturn 3\n}\nx = f()");
    assert_eq!(value_of(&interpreter, "x"), Token::Integer(3));
}

#[test]
fn nested_function_definitions_stay_local() {
    let source = "func outer() {\n\tfunc helper(a) {\n\t\treturn a + 1\n\t}\n\treturn \
                  helper(1)\n}\nx = outer()";
    let (interpreter, _) = eval(source);
    assert_eq!(value_of(&interpreter, "x"), Token::Integer(2));
    assert!(interpreter.scopes.peek("helper").is_none());
}

#[test]
fn variadic_parameter_soaks_arguments() {
    let (interpreter, _) = eval("func join(...parts) {\n\treturn parts\n}\nx = join(\"a\", \"b\", 3)");
    assert_eq!(value_of(&interpreter, "x"), Token::Str("\"a b 3\"".to_owned()));
}

#[test]
fn missing_required_argument_is_a_fault() {
    let fault = eval_fatal("flag error on\nfunc f(a) {\n\treturn a\n}\nx = f()");
    assert_eq!(fault, Fault::MissingArgument);
}

#[test]
fn empty_argument_is_a_fault() {
    let fault = eval_fatal("flag error on\nfunc f(a, b) {\n\treturn a\n}\nx = f(, 2)");
    assert_eq!(fault, Fault::EmptyArgument);
}

#[test]
fn constants_reject_assignment() {
    assert_eq!(eval_fatal("flag error on\ntrue = 5"), Fault::ConstantAssignment);
    assert_eq!(eval_fatal("flag error on\nfunc print(a) {\n}"),
               Fault::ConstantAssignment);
}

#[test]
fn undefined_reference_is_a_fault() {
    assert_eq!(eval_fatal("flag error on\nx = missing + 1"), Fault::UndefinedName);
}

#[test]
fn division_by_zero_under_the_error_flag() {
    assert_eq!(eval_fatal("flag error on\nx = 1 / 0"), Fault::DivisionByZero);
}

#[test]
fn recoverable_fault_reports_and_returns_ok() {
    let (interpreter, output) = eval("x = 1 / 0");
    assert!(output.contains("ZeroDivisionError: cannot divide by zero"));
    assert!(interpreter.scopes.peek("x").is_none());
}

/// Binds a zero-parameter function whose body is a single error token,
/// the shape a host embedder uses to surface its own failures.
fn bind_error_body(interpreter: &mut Interpreter, code: u8) {
    let bomb = Token::Function(FunctionValue { params: Vec::new(),
                                               body:   vec![Token::Error(code)], });
    interpreter.scopes.set("boom", bomb, &mut io::sink());
}

#[test]
fn out_of_range_fault_code_aborts_the_run() {
    let capture = Capture::default();
    let mut interpreter = Interpreter::new();
    interpreter.out = Box::new(capture.clone());
    bind_error_body(&mut interpreter, 200);
    assert_eq!(interpreter.run("boom()"), Err(Fault::Hosted(200)));
    assert!(capture.text().is_empty());
}

#[test]
fn recognized_fault_codes_collapse_to_their_category() {
    let capture = Capture::default();
    let mut interpreter = Interpreter::new();
    interpreter.out = Box::new(capture.clone());
    bind_error_body(&mut interpreter, 6);
    assert_eq!(interpreter.run("boom()"), Ok(()));
    assert!(capture.text().contains("ZeroDivisionError: cannot divide by zero"));
}

#[test]
fn call_scopes_shadow_and_pop() {
    let (interpreter, _) = eval("x = 1\nfunc f(x) {\n\treturn x\n}\ny = f(2)");
    assert_eq!(value_of(&interpreter, "y"), Token::Integer(2));
    assert_eq!(value_of(&interpreter, "x"), Token::Integer(1));
    assert_eq!(interpreter.scopes.depth(), 2);
}

#[test]
fn faulting_call_still_pops_its_scope() {
    let mut interpreter = Interpreter::new();
    interpreter.out = Box::new(Capture::default());
    interpreter.flags.error = true;
    let result = interpreter.run("func f(a) {\n\treturn a / 0\n}\nx = f(1)");
    assert_eq!(result, Err(Fault::DivisionByZero));
    assert_eq!(interpreter.scopes.depth(), 2);
}

#[test]
fn audit_traces_reads_and_writes() {
    let (_, output) = eval("flag audit on\nx = 1\ny = x + 1");
    assert_eq!(output.matches("x (INT, \"1\") NAMESPACE SET").count(), 1);
    assert_eq!(output.matches("x (INT, \"1\") NAMESPACE GET").count(), 1);
    assert_eq!(output.matches("y (INT, \"2\") NAMESPACE SET").count(), 1);
}

#[test]
fn watch_narrows_tracing_to_watched_names() {
    let (_, output) = eval("flag audit on\nwatch y\nx = 1\ny = 2");
    assert!(!output.contains("x (INT, \"1\") NAMESPACE SET"));
    assert!(output.contains("y (INT, \"2\") NAMESPACE SET"));
}

#[test]
fn policy_two_inverts_the_watch_list() {
    let capture = Capture::default();
    let mut interpreter = Interpreter::new();
    interpreter.out = Box::new(capture.clone());
    interpreter.scopes.audit = true;
    interpreter.scopes.add_watch("x");
    interpreter.scopes.set_policy(1, 2);
    interpreter.run("x = 1\ny = 2").unwrap();
    let output = capture.text();
    assert!(!output.contains("x (INT, \"1\") NAMESPACE SET"));
    assert!(output.contains("y (INT, \"2\") NAMESPACE SET"));
}

#[test]
fn audit_keyword_reports_variable_rows() {
    let (_, output) = eval("x = 5\naudit x");
    assert!(output.contains("AUDIT:"));
    assert!(output.contains("global scope:"));
    assert!(output.contains("x = (INT, \"5\")"));
}

#[test]
fn bare_audit_reports_every_scope() {
    let (_, output) = eval("x = 5\naudit");
    assert!(output.contains("constant scope:"));
    assert!(output.contains("global scope:"));
    assert!(output.contains("\tx : (INT, \"5\")"));
}

#[test]
fn audit_of_undefined_variable_is_a_fault() {
    assert_eq!(eval_fatal("flag error on\naudit ghost"), Fault::AuditUndefined);
}

#[test]
fn dangling_watch_is_a_lexing_fault() {
    assert_eq!(lexer::tokenize("watch x"), Err(Fault::DanglingWatch));
}

#[test]
fn unterminated_string_is_a_lexing_fault() {
    assert_eq!(lexer::tokenize("x = \"abc"), Err(Fault::UnterminatedString));
}

#[test]
fn integer_dot_reference_stays_flat() {
    let tokens = lexer::tokenize("5.toString").unwrap();
    assert_eq!(tokens,
               vec![Token::Integer(5), Token::Dot, Token::Reference("toString".to_owned())]);
}

#[test]
fn keyword_prefixes_split_references() {
    let tokens = lexer::tokenize("format").unwrap();
    assert_eq!(tokens,
               vec![Token::Keyword(Keyword::For), Token::Reference("mat".to_owned())]);
}

#[test]
fn float_scan_needs_a_digit_after_the_point() {
    let tokens = lexer::tokenize("x = 2.5").unwrap();
    assert_eq!(tokens[2], Token::Float(2.5));
}

#[test]
fn string_tokens_keep_their_quotes() {
    let tokens = lexer::tokenize("s = \"hi\"").unwrap();
    assert_eq!(tokens[2], Token::Str("\"hi\"".to_owned()));
}

#[test]
fn break_lines_merges_string_spans() {
    let lines = lexer::break_lines("x = \"a\nb\"\ny = 1");
    assert_eq!(lines, vec!["x = \"a\nb\"".to_owned(), "y = 1".to_owned()]);
}

#[test]
fn dump_global_prints_scope_rows() {
    let (_, output) = eval("x = 5\ndump global");
    assert!(output.contains("dumping global scope:"));
    assert!(output.contains("x : (INT, \"5\")"));
    assert!(output.contains("end dump"));
}

#[test]
fn dump_tokens_shows_the_live_sequence() {
    let (_, output) = eval("x = 5\ndump tokens");
    assert!(output.contains("dumping tokens"));
    assert!(output.contains("(ASS, \"=\")"));
}

#[test]
fn dump_space_renders_the_stack() {
    let (_, output) = eval("x = 5\ndump space");
    assert!(output.contains("dumping namespaces:"));
    assert!(output.contains("x : (INT, \"5\")"));
}

#[test]
fn unknown_dump_target_warns() {
    let (_, output) = eval("dump nothing");
    assert!(output.contains("unknown dump target \"nothing\""));
}

#[test]
fn tokens_flag_dumps_after_the_run() {
    let (_, output) = eval("flag tokens on\nx = 5");
    assert!(output.contains("dumping tokens"));
    assert!(output.contains("(INT, \"5\")"));
}

#[test]
fn vars_flag_prints_namespaces_after_the_run() {
    let (_, output) = eval("flag vars on\nx = 5");
    assert!(output.contains("global scope:"));
    assert!(output.contains("\tx : (INT, \"5\")"));
}

#[test]
fn flag_switch_toggles() {
    let mut interpreter = Interpreter::new();
    interpreter.out = Box::new(Capture::default());
    interpreter.run("flag vars switch").unwrap();
    assert!(interpreter.flags.vars);
    interpreter.run("flag vars switch").unwrap();
    assert!(!interpreter.flags.vars);
}

#[test]
fn unknown_flag_setting_warns() {
    let (_, output) = eval("flag vars maybe");
    assert!(output.contains("unknown flag setting \"maybe\""));
}

#[test]
fn color_rebinds_a_channel_from_source_text() {
    let (interpreter, _) = eval("color error \\x1b[31m");
    assert_eq!(interpreter.palette.error, "\u{1b}[31m");
}

#[test]
fn color_accepts_named_entries() {
    let (interpreter, _) = eval("color output red");
    assert_eq!(interpreter.palette.output, "\u{1b}[38;2;255;0;0m");
}

#[test]
fn invalid_color_is_skipped() {
    let (interpreter, _) = eval("color output sparkle");
    assert_eq!(interpreter.palette.output, "\u{1b}[38;2;0;100;200m");
}

#[test]
fn existing_reports_both_ways() {
    let (_, output) = eval("x = 5\nexisting x\nexisting ghost");
    assert!(output.contains("variable \"x\" exists"));
    assert!(output.contains("variable \"ghost\" does not exist"));
}

#[test]
fn reserved_keywords_are_inert() {
    let (interpreter, _) = eval("while\nx = 5");
    assert_eq!(value_of(&interpreter, "x"), Token::Integer(5));
}

#[test]
fn embed_without_an_executor_yields_null() {
    let (interpreter, _) = eval("x = 5\nembed {\n\tanything()\n}");
    assert_eq!(interpreter.tokens.last(), Some(&Token::Null));
}

/// Executor that records what the interpreter hands it.
struct Recorder {
    blocks:   Arc<Mutex<Vec<String>>>,
    bindings: Arc<Mutex<Vec<(String, Token)>>>,
}

impl EscapeExecutor for Recorder {
    fn execute(&mut self, block: &str, bindings: &[(String, Token)]) -> Option<String> {
        self.blocks.lock().unwrap().push(block.to_owned());
        *self.bindings.lock().unwrap() = bindings.to_vec();
        None
    }
}

#[test]
fn print_builtin_soaks_and_forwards() {
    let blocks = Arc::new(Mutex::new(Vec::new()));
    let bindings = Arc::new(Mutex::new(Vec::new()));
    let mut interpreter = Interpreter::new();
    interpreter.out = Box::new(Capture::default());
    interpreter.executor = Box::new(Recorder { blocks:   Arc::clone(&blocks),
                                               bindings: Arc::clone(&bindings), });
    interpreter.run("print(\"hi\", \"there\")").unwrap();

    assert_eq!(blocks.lock().unwrap().as_slice(), ["print(args, sep, end)"]);
    let seen = bindings.lock().unwrap();
    let lookup = |name: &str| {
        seen.iter()
            .find(|(bound, _)| bound == name)
            .map(|(_, token)| token.clone())
    };
    assert_eq!(lookup("args"), Some(Token::Str("\"hi there\"".to_owned())));
    assert_eq!(lookup("sep"), Some(Token::Str("\" \"".to_owned())));
    assert_eq!(lookup("end"), Some(Token::Str("\"\n\"".to_owned())));
}

#[test]
fn run_file_appends_extension() {
    assert!(sapp::run_file("demos/hello").is_ok());
}
