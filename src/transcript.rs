//! Verbose step log written to stderr with `--verbose`.

use std::time::Instant;

pub(crate) struct Transcript {
    enabled: bool,
    started: bool,
    origin: Instant,
}

impl Transcript {
    pub(crate) fn new(enabled: bool) -> Self {
        Self {
            enabled,
            started: false,
            origin: Instant::now(),
        }
    }

    pub(crate) fn note(&mut self, message: impl AsRef<str>) {
        if !self.enabled {
            return;
        }
        if !self.started {
            self.started = true;
            eprintln!("transcript:");
        }
        let elapsed_ms = self.origin.elapsed().as_millis();
        eprintln!("- [{elapsed_ms:>5}ms] {}", message.as_ref());
    }
}
