use once_cell::sync::Lazy;
use regex::Regex;

/// The source spelling of an ANSI escape a `color` statement accepts:
/// either a truecolor sequence like `\x1b[38;2;0;255;0m` or a bare
/// two-digit code like `\x1b[39m`, with the escape byte written out as
/// the four characters `\x1b`.
static ANSI_SOURCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:\\x1b\[\d{2};\d;\d{1,3};\d{1,3};\d{1,3}m|\\x1b\[\d{2}m)$")
        .expect("ANSI source pattern is valid")
});

/// Color words a `color` statement accepts in place of a raw sequence.
pub const NAMED_COLORS: [(&str, &str); 5] = [("lime", "\x1b[38;2;0;255;0m"),
                                             ("green", "\x1b[38;2;0;200;0m"),
                                             ("orange", "\x1b[38;2;200;100;0m"),
                                             ("yellow", "\x1b[38;2;255;255;0m"),
                                             ("red", "\x1b[38;2;255;0;0m")];

/// One recolorable output channel.
///
/// Channels are addressed from script code by the names `reset`,
/// `audithead`, `audit`, `error`, `warning`, and `output`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    /// The sequence appended after wrapped text.
    Reset,
    /// Audit block headers and scope labels.
    AuditHeader,
    /// Audit row bodies.
    Audit,
    /// Rendered fault lines.
    Error,
    /// Degraded-statement notices.
    Warning,
    /// Dumps and `existing` reports.
    Output,
}

impl Channel {
    /// Resolves the script-facing channel word.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "reset" => Some(Self::Reset),
            "audithead" => Some(Self::AuditHeader),
            "audit" => Some(Self::Audit),
            "error" => Some(Self::Error),
            "warning" => Some(Self::Warning),
            "output" => Some(Self::Output),
            _ => None,
        }
    }
}

/// The escape sequences console output is wrapped in, one per channel.
///
/// Every field holds a ready-to-print sequence. Scripts rebind them
/// through `color` statements; hosts can assign them directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    /// Sequence for [`Channel::Reset`].
    pub reset:        String,
    /// Sequence for [`Channel::AuditHeader`].
    pub audit_header: String,
    /// Sequence for [`Channel::Audit`].
    pub audit:        String,
    /// Sequence for [`Channel::Error`].
    pub error:        String,
    /// Sequence for [`Channel::Warning`].
    pub warning:      String,
    /// Sequence for [`Channel::Output`].
    pub output:       String,
}

impl Default for Palette {
    fn default() -> Self {
        Self { reset:        "\x1b[39m".to_owned(),
               audit_header: "\x1b[38;2;200;100;0m".to_owned(),
               audit:        "\x1b[38;2;200;100;0m".to_owned(),
               error:        "\x1b[38;2;255;0;0m".to_owned(),
               warning:      "\x1b[38;2;255;255;0m".to_owned(),
               output:       "\x1b[38;2;0;100;200m".to_owned(), }
    }
}

impl Palette {
    /// The sequence currently bound to `channel`.
    #[must_use]
    pub fn get(&self, channel: Channel) -> &str {
        match channel {
            Channel::Reset => &self.reset,
            Channel::AuditHeader => &self.audit_header,
            Channel::Audit => &self.audit,
            Channel::Error => &self.error,
            Channel::Warning => &self.warning,
            Channel::Output => &self.output,
        }
    }

    /// Rebinds `channel` to `sequence`.
    pub fn set(&mut self, channel: Channel, sequence: String) {
        match channel {
            Channel::Reset => self.reset = sequence,
            Channel::AuditHeader => self.audit_header = sequence,
            Channel::Audit => self.audit = sequence,
            Channel::Error => self.error = sequence,
            Channel::Warning => self.warning = sequence,
            Channel::Output => self.output = sequence,
        }
    }

    /// Wraps `text` in the channel's sequence and the reset sequence.
    ///
    /// # Example
    ///
    /// ```
    /// use sapp::interpreter::palette::{Channel, Palette};
    ///
    /// let palette = Palette::default();
    /// let line = palette.wrap(Channel::Error, "boom");
    /// assert!(line.starts_with("\x1b[38;2;255;0;0m"));
    /// assert!(line.ends_with("\x1b[39m"));
    /// ```
    #[must_use]
    pub fn wrap(&self, channel: Channel, text: &str) -> String {
        format!("{}{text}{}", self.get(channel), self.reset)
    }
}

/// Decodes the color word of a `color` statement.
///
/// Accepts either a name from [`NAMED_COLORS`] or a source-spelled ANSI
/// sequence, whose `\x1b` text becomes the real escape byte. Returns
/// `None` for anything else.
///
/// # Example
///
/// ```
/// use sapp::interpreter::palette::resolve_color;
///
/// assert_eq!(resolve_color("lime"), Some("\x1b[38;2;0;255;0m".to_owned()));
/// assert_eq!(resolve_color(r"\x1b[31m"), Some("\x1b[31m".to_owned()));
/// assert_eq!(resolve_color("plaid"), None);
/// ```
#[must_use]
pub fn resolve_color(word: &str) -> Option<String> {
    if ANSI_SOURCE.is_match(word) {
        return Some(word.replace("\\x1b", "\x1b"));
    }
    NAMED_COLORS.iter()
                .find(|(name, _)| *name == word)
                .map(|(_, sequence)| (*sequence).to_owned())
}
