//! Collaborators behind the code block "copy" and "apply" actions.

use anyhow::{anyhow, Result};

pub trait Clipboard {
    fn set_text(&mut self, text: &str) -> Result<()>;
}

pub trait ApplyTarget {
    fn apply(&mut self, code: &str, file_name: &str);
}

/// Platform clipboard via `arboard`. Opening it lazily keeps headless runs
/// (CI, pipes) working; failures surface per copy instead of at startup.
#[derive(Default)]
pub struct SystemClipboard {
    inner: Option<arboard::Clipboard>,
}

impl Clipboard for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<()> {
        if self.inner.is_none() {
            self.inner = Some(arboard::Clipboard::new()?);
        }
        let clipboard = self
            .inner
            .as_mut()
            .ok_or_else(|| anyhow!("clipboard unavailable"))?;
        clipboard.set_text(text.to_string())?;
        Ok(())
    }
}

/// Records apply requests instead of touching files.
#[derive(Debug, Default)]
pub struct LoggingApplyTarget {
    pub applied: Vec<(String, String)>,
}

impl ApplyTarget for LoggingApplyTarget {
    fn apply(&mut self, code: &str, file_name: &str) {
        tracing::info!(
            file = file_name,
            lines = code.lines().count(),
            "apply requested"
        );
        self.applied.push((code.to_string(), file_name.to_string()));
    }
}

/// Invoke `target` with the exact code and file name, but only when both a
/// target and a non-empty file name exist. Returns whether it fired.
pub fn request_apply(
    target: Option<&mut dyn ApplyTarget>,
    code: &str,
    file_name: Option<&str>,
) -> bool {
    let (Some(target), Some(file_name)) = (target, file_name) else {
        return false;
    };
    if file_name.is_empty() {
        return false;
    }
    target.apply(code, file_name);
    true
}
