//! Sticky termination state.

use tracing::debug;

use crate::ScanError;

/// Why scanning is stopping (or, for `Eof`, about to stop).
#[derive(Debug)]
pub(crate) enum Halt {
    /// The source is exhausted. Buffered bytes may still hold tokens.
    Eof,
    /// The split callback delivered its last token.
    FinalToken,
    /// A genuine failure. Never replaced.
    Failed(ScanError),
}

/// First-write-wins slot; only `Eof` may be upgraded.
#[derive(Debug, Default)]
pub(crate) struct Sticky(Option<Halt>);

impl Sticky {
    pub(crate) fn record(&mut self, halt: Halt) {
        if !matches!(self.0, None | Some(Halt::Eof)) {
            return;
        }
        match &halt {
            Halt::Failed(err) => debug!(error = %err, "scan failed"),
            Halt::FinalToken => debug!("final token"),
            Halt::Eof => {}
        }
        self.0 = Some(halt);
    }

    pub(crate) fn fail(&mut self, err: ScanError) {
        self.record(Halt::Failed(err));
    }

    pub(crate) fn is_set(&self) -> bool {
        self.0.is_some()
    }

    pub(crate) fn at_eof(&self) -> bool {
        matches!(self.0, Some(Halt::Eof))
    }

    pub(crate) fn is_final(&self) -> bool {
        matches!(self.0, Some(Halt::FinalToken))
    }

    pub(crate) fn is_failed(&self) -> bool {
        matches!(self.0, Some(Halt::Failed(_)))
    }

    /// The genuine error, with both soft stops mapped to `None`.
    pub(crate) fn error(&self) -> Option<&ScanError> {
        match &self.0 {
            Some(Halt::Failed(err)) => Some(err),
            _ => None,
        }
    }

    pub(crate) fn take_error(&mut self) -> Option<ScanError> {
        match self.0.take() {
            Some(Halt::Failed(err)) => Some(err),
            other => {
                self.0 = other;
                None
            }
        }
    }
}
