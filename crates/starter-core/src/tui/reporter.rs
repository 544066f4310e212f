//! Spinner-backed progress reporter

use crate::report::Reporter;
use std::sync::Mutex;

#[derive(Debug, Clone, Copy)]
enum Level {
    Info,
    Warn,
}

/// Reporter drawing a cliclack spinner per step
///
/// Notes emitted while a spinner is running are held back and logged once
/// the step finishes, so they do not tear the spinner line.
#[derive(Default)]
pub struct CliclackReporter {
    spinner: Mutex<Option<cliclack::ProgressBar>>,
    deferred: Mutex<Vec<(Level, String)>>,
}

impl CliclackReporter {
    fn spinning(&self) -> bool {
        self.spinner.lock().map(|s| s.is_some()).unwrap_or(false)
    }

    fn note(&self, level: Level, message: &str) {
        if self.spinning() {
            if let Ok(mut deferred) = self.deferred.lock() {
                deferred.push((level, message.to_string()));
                return;
            }
        }
        log(level, message);
    }

    fn flush(&self) {
        let pending = self
            .deferred
            .lock()
            .map(|mut d| std::mem::take(&mut *d))
            .unwrap_or_default();
        for (level, message) in pending {
            log(level, &message);
        }
    }

    fn finish(&self, message: &str, failed: bool) {
        let spinner = self.spinner.lock().ok().and_then(|mut s| s.take());
        match spinner {
            Some(spinner) if failed => spinner.error(message),
            Some(spinner) => spinner.stop(message),
            None if failed => {
                let _ = cliclack::log::error(message);
            }
            None => {
                let _ = cliclack::log::success(message);
            }
        }
        self.flush();
    }
}

fn log(level: Level, message: &str) {
    let _ = match level {
        Level::Info => cliclack::log::info(message),
        Level::Warn => cliclack::log::warning(message),
    };
}

impl Reporter for CliclackReporter {
    fn step(&self, message: &str) {
        let spinner = cliclack::spinner();
        spinner.start(message);
        if let Ok(mut slot) = self.spinner.lock() {
            if let Some(previous) = slot.replace(spinner) {
                previous.stop("");
            }
        }
    }

    fn done(&self, message: &str) {
        self.finish(message, false);
    }

    fn fail(&self, message: &str) {
        self.finish(message, true);
    }

    fn info(&self, message: &str) {
        self.note(Level::Info, message);
    }

    fn warn(&self, message: &str) {
        self.note(Level::Warn, message);
    }
}
