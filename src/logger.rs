//! Logger Module
//!
//! The logging capability consumed by the cache repository. The repository never
//! reaches for a global logger; callers inject one at construction time.

use std::error::Error as StdError;

// == Log Trait ==
/// Structured logging sink consumed by [`crate::cache::CacheRepository`].
///
/// All calls are fire-and-forget.
pub trait Log: Send + Sync {
    fn info(&self, message: &str);
    fn debug(&self, message: &str);
    fn warning(&self, message: &str);
    fn error(&self, message: &str);
    /// Logs an error together with the failure that caused it.
    fn error_with_cause(&self, message: &str, cause: &(dyn StdError + 'static));
}

// == Tracing Adaptor ==
/// Forwards every call to the matching `tracing` macro.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLog;

impl TracingLog {
    pub fn new() -> Self {
        Self
    }
}

impl Log for TracingLog {
    fn info(&self, message: &str) {
        tracing::info!("{}", message);
    }

    fn debug(&self, message: &str) {
        tracing::debug!("{}", message);
    }

    fn warning(&self, message: &str) {
        tracing::warn!("{}", message);
    }

    fn error(&self, message: &str) {
        tracing::error!("{}", message);
    }

    fn error_with_cause(&self, message: &str, cause: &(dyn StdError + 'static)) {
        tracing::error!(cause = %cause, "{}", message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use std::io;
    use std::sync::{Arc, Mutex};

    /// Writer that appends formatted events to a shared buffer.
    #[derive(Clone, Default)]
    struct CapturedOutput(Arc<Mutex<Vec<u8>>>);

    impl CapturedOutput {
        fn text(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl io::Write for CapturedOutput {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn capture(f: impl FnOnce()) -> Vec<String> {
        let output = CapturedOutput::default();
        let writer = output.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .without_time()
            .finish();

        tracing::subscriber::with_default(subscriber, f);
        output.text().lines().map(str::to_string).collect()
    }

    #[test]
    fn test_tracing_log_forwards_each_level() {
        let lines = capture(|| {
            let log = TracingLog::new();
            log.info("info message");
            log.debug("debug message");
            log.warning("warning message");
            log.error("error message");
        });

        assert_eq!(lines.len(), 4);
        assert!(lines[0].contains("INFO") && lines[0].contains("info message"));
        assert!(lines[1].contains("DEBUG") && lines[1].contains("debug message"));
        assert!(lines[2].contains("WARN") && lines[2].contains("warning message"));
        assert!(lines[3].contains("ERROR") && lines[3].contains("error message"));
    }

    #[test]
    fn test_error_with_cause_records_cause_field() {
        let lines = capture(|| {
            TracingLog::new().error_with_cause(
                "Cache TryGet failed for key k",
                &StoreError::Unavailable("down".to_string()),
            );
        });

        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("ERROR"));
        assert!(lines[0].contains("Cache TryGet failed for key k"));
        assert!(lines[0].contains("cause=Store unavailable: down"));
    }
}
