use anyhow::{Context, Result};
use arboard::Clipboard;

/// Best effort: a denied or missing clipboard must never take the app down,
/// so callers log failures and move on.
pub fn copy(text: &str) -> Result<()> {
    let mut cb = Clipboard::new().context("open clipboard")?;
    cb.set_text(text.to_string()).context("write clipboard")?;
    Ok(())
}
