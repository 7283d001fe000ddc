use std::time::Instant;

/// "Copied" flag of one code block.
///
/// Every copy schedules its own reset. Resets are never cancelled by a later
/// copy, so the earliest pending deadline clears the flag even when another
/// copy happened after it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CopyIndicator {
    copied: bool,
    resets: Vec<Instant>,
}

impl CopyIndicator {
    pub fn is_copied(&self) -> bool {
        self.copied
    }

    pub fn mark(&mut self, reset_at: Instant) {
        self.copied = true;
        self.resets.push(reset_at);
    }

    /// Fire every reset due at `now`. Returns whether the flag changed.
    pub fn expire(&mut self, now: Instant) -> bool {
        let pending = self.resets.len();
        self.resets.retain(|deadline| *deadline > now);
        if self.resets.len() == pending {
            return false;
        }
        let was_copied = self.copied;
        self.copied = false;
        was_copied
    }

    pub fn is_settled(&self) -> bool {
        !self.copied && self.resets.is_empty()
    }
}
