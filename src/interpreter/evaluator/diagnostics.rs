use std::io::Write;

use crate::{
    interpreter::{evaluator::core::Interpreter, palette::Channel},
    token::Token,
};

impl Interpreter {
    /// Reports whether a name resolves anywhere in the scope stack.
    pub(crate) fn report_existing(&mut self, name: &str) {
        let line = if self.scopes.contains(name) {
            self.palette
                .wrap(Channel::Output, &format!("variable \"{name}\" exists"))
        } else {
            self.palette
                .wrap(Channel::Output, &format!("variable \"{name}\" does not exist"))
        };
        let _ = writeln!(self.out, "{line}");
    }

    /// Dispatches one `dump` statement to its printer.
    ///
    /// `tokens` is the live sequence being reduced, so a `dump tokens`
    /// mid-script shows the splices made so far.
    pub(crate) fn dump(&mut self, target: &str, tokens: &[Token]) {
        match target {
            "tokens" => self.dump_tokens(tokens),
            "space" => self.dump_spaces(),
            "constant" => self.dump_scope(0, "constant"),
            "global" => self.dump_scope(1, "global"),
            "local" => self.dump_scope(self.scopes.depth() - 1, "local"),
            _ => self.warn(&format!("unknown dump target \"{target}\"")),
        }
    }

    /// Prints every token in `tokens`, one per line, between dump
    /// markers.
    pub(crate) fn dump_tokens(&mut self, tokens: &[Token]) {
        let header = self.palette.wrap(Channel::Output, "dumping tokens");
        let _ = writeln!(self.out, "{header}");
        for token in tokens {
            let _ = writeln!(self.out, "{token}");
        }
        let footer = self.palette.wrap(Channel::Output, "end dump");
        let _ = writeln!(self.out, "{footer}");
    }

    /// Prints the rendered scope stack between dump markers.
    fn dump_spaces(&mut self) {
        self.scopes.auditing = true;
        let header = self.palette.wrap(Channel::Output, "dumping namespaces:");
        let _ = writeln!(self.out, "{header}");
        let _ = writeln!(self.out, "{}", self.scopes);
        let footer = self.palette.wrap(Channel::Output, "end dump");
        let _ = writeln!(self.out, "{footer}");
        self.scopes.auditing = false;
    }

    /// Prints one scope's bindings between dump markers.
    fn dump_scope(&mut self, index: usize, label: &str) {
        self.scopes.auditing = true;
        let header = self.palette
                         .wrap(Channel::Output, &format!("dumping {label} scope:"));
        let _ = writeln!(self.out, "{header}");
        if let Some(scope) = self.scopes.scopes.get(index) {
            for (name, token) in scope.iter() {
                let _ = writeln!(self.out, "{name} : {token}");
            }
        }
        let footer = self.palette.wrap(Channel::Output, "end dump");
        let _ = writeln!(self.out, "{footer}");
        self.scopes.auditing = false;
    }

    /// Prints one row per scope that binds `name`, colored for the audit
    /// report.
    pub(crate) fn print_variable(&mut self, name: &str) {
        self.scopes.auditing = true;
        for (index, scope) in self.scopes.scopes.iter().enumerate() {
            if let Some(token) = scope.get(name) {
                let row = format!("{} {} {} {name} = {token}",
                                  self.palette.get(Channel::AuditHeader),
                                  scope_label(index),
                                  self.palette.get(Channel::Audit));
                let _ = writeln!(self.out, "{row}");
            }
        }
        self.scopes.auditing = false;
    }

    /// Prints every binding in every scope, one labeled block per scope.
    pub(crate) fn print_variables(&mut self) {
        self.scopes.auditing = true;
        for (index, scope) in self.scopes.scopes.iter().enumerate() {
            let header = format!("{} {} {}",
                                 self.palette.get(Channel::AuditHeader),
                                 scope_label(index),
                                 self.palette.get(Channel::Audit));
            let _ = writeln!(self.out, "{header}");
            for (name, token) in scope.iter() {
                let _ = writeln!(self.out, "\t{name} : {token}");
            }
        }
        self.scopes.auditing = false;
    }
}

/// Human-readable label for a scope index.
fn scope_label(index: usize) -> String {
    match index {
        0 => "constant scope:".to_owned(),
        1 => "global scope:".to_owned(),
        n => format!("local scope ({}):", n - 2),
    }
}
