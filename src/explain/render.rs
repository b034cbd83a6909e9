//! Line fragments rendered the same way in every mode.

use crate::event::{non_empty, Failure};
use crate::style::{Palette, Styler};

/// Closing rule after captured output.
pub const OUTPUT_RULE: &str = "---------------\n";

/// `"  <host>"`, with `` with "<item>"`` appended when an item is present.
pub fn host_item(host: &str, item: Option<&str>) -> String {
    match non_empty(item) {
        Some(item) => format!("  {host} with {item:?}"),
        None => format!("  {host}"),
    }
}

/// The host line for a failure, followed by any captured output.
///
/// Ignored failures get the ignored marker and no message; others get the
/// error marker and the module's message.
pub fn failure_block(styler: &Styler, failure: &Failure) -> String {
    let subject = host_item(&failure.host, failure.item());
    let mut out = if failure.ignore_errors {
        styler.error_ignored(subject)
    } else {
        styler.err(format!("{subject}: {}", failure.message))
    };

    if let Some(stdout) = failure.stdout() {
        out.push_str(&styler.color(Palette::Red, &format!("---- STDOUT ----\n{stdout}\n")));
    }
    if let Some(stderr) = failure.stderr() {
        out.push_str(&styler.color(Palette::Red, &format!("---- STDERR ----\n{stderr}\n")));
    }
    if failure.stdout().is_some() || failure.stderr().is_some() {
        out.push_str(&styler.color(Palette::Red, OUTPUT_RULE));
    }
    out
}

/// The warning for an event no explainer knows how to render.
pub fn unhandled(styler: &Styler, tag: &str) -> String {
    styler.color(Palette::Orange, &format!("Unhandled event: {tag}\n"))
}
