use std::{fmt, io::Write};

use crate::token::Token;

/// One layer of name bindings.
///
/// Entries keep insertion order so dumps and audit sweeps list variables
/// in the order a program introduced them.
#[derive(Debug, Clone, PartialEq)]
pub struct Scope {
    entries:  Vec<(String, Token)>,
    /// The audit policy of this scope: 0 traces by default, 1 traces
    /// watched names only, 2 traces everything except watched names.
    pub policy: u8,
    /// Policies that trace while the watch list is empty.
    triggers: Vec<u8>,
}

impl Scope {
    #[must_use]
    pub fn new() -> Self {
        Self { entries:  Vec::new(),
               policy:   0,
               triggers: vec![0], }
    }

    /// Looks a name up in this scope only.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Token> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, token)| token)
    }

    /// Binds a name, replacing an existing entry in place.
    pub fn insert(&mut self, name: &str, value: Token) {
        if let Some(slot) = self.entries.iter_mut().find(|(key, _)| key == name) {
            slot.1 = value;
        } else {
            self.entries.push((name.to_owned(), value));
        }
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// The bindings in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Token)> {
        self.entries.iter().map(|(name, token)| (name.as_str(), token))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for Scope {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entries: Vec<String> = self.entries
                                       .iter()
                                       .map(|(name, token)| format!("{name} : {token}"))
                                       .collect();
        write!(f, "{{{}}}", entries.join(", "))
    }
}

/// The stack of scopes a program runs against.
///
/// Index 0 is the constants scope, index 1 the global scope; everything
/// above is a call scope. The stack also owns the audit machinery: the
/// master switch, the watch list shared by every scope, and the
/// re-entrancy flag that keeps diagnostic printers from tracing their
/// own reads.
///
/// Reads and writes that the active policy selects are traced to the
/// writer handed in by the caller as `{name} {token} NAMESPACE GET` and
/// `{name} {token} NAMESPACE SET` lines.
pub struct ScopeStack {
    /// The scopes, innermost last. Never shorter than two.
    pub scopes:   Vec<Scope>,
    /// Master audit switch, toggled by `flag audit`.
    pub audit:    bool,
    /// Set while a diagnostic printer reads scopes, so those reads do
    /// not trace.
    pub auditing: bool,
    watched:      Vec<String>,
}

impl ScopeStack {
    /// Builds a stack from the constants to seed scope 0 with.
    #[must_use]
    pub fn new(constants: Vec<(String, Token)>) -> Self {
        let mut constant_scope = Scope::new();
        for (name, value) in constants {
            constant_scope.insert(&name, value);
        }
        Self { scopes:   vec![constant_scope, Scope::new()],
               audit:    false,
               auditing: false,
               watched:  Vec::new(), }
    }

    #[must_use]
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    pub fn push_scope(&mut self) {
        self.scopes.push(Scope::new());
    }

    /// Pops the innermost call scope. The constants and global scopes
    /// are never popped.
    pub fn pop_scope(&mut self) {
        if self.scopes.len() > 2 {
            self.scopes.pop();
        }
    }

    /// Pushes a new scope and returns a guard that will pop it
    /// automatically.
    ///
    /// This is an RAII helper used to ensure call scopes are properly
    /// unwound even when faults occur. The returned `ScopeGuard` removes
    /// the scope when dropped.
    ///
    /// # Example
    /// ```
    /// use sapp::interpreter::scope::ScopeStack;
    ///
    /// let mut scopes = ScopeStack::new(Vec::new());
    ///
    /// {
    ///     let _guard = scopes.scoped();
    ///     assert_eq!(scopes.depth(), 3);
    /// }
    ///
    /// assert_eq!(scopes.depth(), 2);
    /// ```
    pub fn scoped(&mut self) -> ScopeGuard {
        self.push_scope();
        ScopeGuard { stack_pointer: self, }
    }

    /// Resolves a name, innermost scope first, tracing the read when the
    /// found scope's policy selects it.
    pub fn get(&self, name: &str, out: &mut dyn Write) -> Option<&Token> {
        for scope in self.scopes.iter().rev() {
            if let Some(token) = scope.get(name) {
                if self.should_trace(scope, name) {
                    let _ = writeln!(out, "{name} {token} NAMESPACE GET");
                }
                return Some(token);
            }
        }
        None
    }

    /// Binds a name in the innermost scope, tracing the write when that
    /// scope's policy selects it.
    pub fn set(&mut self, name: &str, value: Token, out: &mut dyn Write) {
        let trace = self.scopes
                        .last()
                        .is_some_and(|scope| self.should_trace(scope, name));
        if trace {
            let _ = writeln!(out, "{name} {value} NAMESPACE SET");
        }
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name, value);
        }
    }

    /// Resolves a name without tracing, for diagnostics and hosts.
    #[must_use]
    pub fn peek(&self, name: &str) -> Option<&Token> {
        self.scopes.iter().rev().find_map(|scope| scope.get(name))
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.peek(name).is_some()
    }

    /// Whether the constants scope binds `name`.
    #[must_use]
    pub fn constants_contain(&self, name: &str) -> bool {
        self.scopes.first().is_some_and(|scope| scope.contains(name))
    }

    /// Adds a name to the stack-wide watch list.
    pub fn add_watch(&mut self, name: &str) {
        if !self.watched.iter().any(|watched| watched == name) {
            self.watched.push(name.to_owned());
        }
    }

    /// Removes a name from the watch list.
    pub fn remove_watch(&mut self, name: &str) {
        self.watched.retain(|watched| watched != name);
    }

    /// Sets the audit policy of the scope at `index`.
    pub fn set_policy(&mut self, index: usize, policy: u8) {
        if let Some(scope) = self.scopes.get_mut(index) {
            scope.policy = policy;
        }
    }

    /// Every visible binding exactly once, innermost scope winning.
    #[must_use]
    pub fn flatten(&self) -> Vec<(String, Token)> {
        let mut bindings: Vec<(String, Token)> = Vec::new();
        for scope in self.scopes.iter().rev() {
            for (name, token) in scope.iter() {
                if !bindings.iter().any(|(bound, _)| bound == name) {
                    bindings.push((name.to_owned(), token.clone()));
                }
            }
        }
        bindings
    }

    fn should_trace(&self, scope: &Scope, name: &str) -> bool {
        if !self.audit || self.auditing {
            return false;
        }
        let watched = self.watched.iter().any(|watched| watched == name);
        (self.watched.is_empty() && scope.triggers.contains(&scope.policy))
            || (watched && scope.policy != 2)
            || (scope.policy == 2 && !watched)
    }
}

impl fmt::Display for ScopeStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scopes: Vec<String> = self.scopes.iter().map(Scope::to_string).collect();
        write!(f, "[\n{}\n]", scopes.join(",\n"))
    }
}

pub struct ScopeGuard {
    stack_pointer: *mut ScopeStack,
}

impl Drop for ScopeGuard {
    fn drop(&mut self) {
        unsafe { (*self.stack_pointer).pop_scope() };
    }
}
