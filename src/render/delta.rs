//! Rich-text delta interpreter.
//!
//! Editor output is a flat stream of inserts. Inline inserts accumulate in
//! a pending line; a lone `"\n"` insert carrying attributes terminates the
//! block and applies its own (block-level) attributes to the whole pending
//! line. Inline inserts that themselves contain newlines flush every
//! segment but the last immediately, formatted with the insert's own
//! attributes.
//!
//! Formatting is applied in a fixed order, each step wrapping the result
//! of the previous one: bold, italic, underline, inline code, color,
//! highlight, strikethrough, sub/superscript, list marker, heading marker.
//! Changing the order changes the nesting of the produced markup.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use log::{debug, warn};

use crate::error::Result;
use crate::model::{Attributes, Delta, ListKind, Script};

/// Marker rendered in place of an undecodable rich-text payload.
pub const RICH_TEXT_DECODE_FAILED: &str = "Content Cannot be added";

/// Deepest list nesting the editor produces; deeper indents are clamped.
pub const MAX_LIST_INDENT: u32 = 8;

/// Render a base64-encoded JSON delta array.
pub fn render_rich_text(payload: &str) -> String {
    match decode_deltas(payload) {
        Ok(deltas) => deltas_to_markup(&deltas),
        Err(e) => {
            warn!("rich-text payload rejected: {}", e);
            RICH_TEXT_DECODE_FAILED.to_string()
        }
    }
}

/// Decode a base64-encoded JSON delta array.
pub fn decode_deltas(payload: &str) -> Result<Vec<Delta>> {
    let data = STANDARD.decode(payload)?;
    Ok(serde_json::from_slice(&data)?)
}

/// Convert a delta stream to markup.
pub fn deltas_to_markup(deltas: &[Delta]) -> String {
    let mut interpreter = DeltaInterpreter::new();
    for delta in deltas {
        interpreter.feed(delta);
    }
    interpreter.finish()
}

/// Incremental delta-to-markup converter.
#[derive(Debug, Default)]
pub struct DeltaInterpreter {
    output: String,
    pending: String,
}

impl DeltaInterpreter {
    /// Create an interpreter with an empty line buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume one delta.
    pub fn feed(&mut self, delta: &Delta) {
        let attrs = delta.attributes.as_ref();

        if delta.is_block_terminator() {
            let line = std::mem::take(&mut self.pending);
            self.output.push_str(&format_line(&line, attrs));
            self.output.push('\n');
            return;
        }

        let text = escape(&delta.insert);
        let mut segments = text.split('\n').peekable();
        while let Some(segment) = segments.next() {
            if segments.peek().is_none() {
                self.pending.push_str(&format_line(segment, attrs));
                break;
            }
            let mut line = std::mem::take(&mut self.pending);
            line.push_str(segment);
            self.output.push_str(&format_line(&line, attrs));
            self.output.push_str("\n\n");
        }
    }

    /// Text waiting for a block terminator.
    pub fn pending(&self) -> &str {
        &self.pending
    }

    /// Return the produced markup. Text not closed by a newline is dropped.
    pub fn finish(self) -> String {
        if !self.pending.is_empty() {
            debug!("dropping unterminated rich-text line: {:?}", self.pending);
        }
        self.output
    }
}

/// Apply a delta's attributes to one line of already-escaped text.
pub fn format_line(text: &str, attrs: Option<&Attributes>) -> String {
    let mut out = text.to_string();
    let Some(attrs) = attrs else {
        return out;
    };

    if attrs.bold {
        out = format!("* {} *", out);
    }
    if attrs.italic {
        out = format!("_ {} _", out);
    }
    if attrs.underline {
        out = format!("#underline[{}]", out);
    }
    if attrs.inline_code {
        out = format!("` {} `", out);
    }
    if let Some(color) = attrs.color.as_deref().filter(|c| !c.is_empty()) {
        out = format!("#text(fill:rgb(\"{}\"))[{}]", color_literal(color), out);
    }
    if let Some(color) = attrs.background.as_deref().filter(|c| !c.is_empty()) {
        out = format!("#highlight(fill:rgb(\"{}\"))[{}]", color_literal(color), out);
    }
    if attrs.strikethrough {
        out = format!("#strike[{}]", out);
    }
    match attrs.script {
        Script::Sub => out = format!("#sub[{}]", out),
        Script::Super => out = format!("#super[{}]", out),
        Script::None => {}
    }
    let indent = "   ".repeat(attrs.indent.min(MAX_LIST_INDENT) as usize);
    match attrs.list {
        ListKind::Bullet => out = format!("{}- {}", indent, out),
        ListKind::Ordered => out = format!("{}+ {}", indent, out),
        ListKind::None => {}
    }
    if attrs.header > 0 {
        out = format!("{} {}", "=".repeat(attrs.header as usize), out);
    }
    out
}

/// Keep the first character and everything from index 3 on.
///
/// The editor's color strings carry two extra characters after the `#`
/// (an alpha byte for `#AARRGGBB`); they are dropped before use. Shorter
/// strings keep only their first character.
pub fn color_literal(color: &str) -> String {
    let mut chars = color.chars();
    let mut out: String = chars.next().into_iter().collect();
    out.extend(chars.skip(2));
    out
}

/// Backslash-escape the characters that carry markup meaning.
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '*' | '-' | '_' | '=' | '`') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
