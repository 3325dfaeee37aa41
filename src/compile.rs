//! Typesetting compiler driver.

use std::fs;
use std::path::Path;

use log::info;

use crate::error::{Error, Result};
use crate::render::MARKUP_FILE;
use crate::tool::ToolSpec;

/// Name of the compiled output next to `main.typ`.
pub const OUTPUT_FILE: &str = "main.pdf";

/// Compile `{root}/main.typ` and return the PDF bytes.
///
/// A compiler failure is returned as [`Error::Compile`] carrying the
/// compiler's output unchanged; a hang is reported as [`Error::ToolTimeout`].
pub fn compile(root: impl AsRef<Path>, compiler: &ToolSpec) -> Result<Vec<u8>> {
    let root = root.as_ref();
    match compiler.run(root, MARKUP_FILE, OUTPUT_FILE) {
        Ok(_) => {}
        Err(Error::Tool { output, .. }) => return Err(Error::Compile(output)),
        Err(e) => return Err(e),
    }
    let pdf = fs::read(root.join(OUTPUT_FILE))?;
    info!("compiled {} ({} bytes)", root.display(), pdf.len());
    Ok(pdf)
}
