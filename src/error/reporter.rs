use std::io::Write;

use crate::{
    error::Fault,
    interpreter::palette::{Channel, Palette},
};

/// Renders a recovered fault on the error channel.
///
/// The line is the fault's `Display` form wrapped in the palette's error
/// color. Write failures are swallowed; a sink that stops accepting
/// output must not turn a recovered fault into a fatal one.
pub fn report(fault: Fault, palette: &Palette, out: &mut dyn Write) {
    let line = palette.wrap(Channel::Error, &fault.to_string());
    let _ = writeln!(out, "{line}");
}
