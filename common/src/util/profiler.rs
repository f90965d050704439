use std::time::{Duration, Instant};

/// Wall-clock timer for a single search.
#[derive(Clone, Copy, Debug)]
pub struct Stopwatch {
    start: Instant,
}

impl Stopwatch {
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// True once `limit` has passed. `None` never expires.
    #[inline]
    pub fn exceeded(&self, limit: Option<Duration>) -> bool {
        limit.is_some_and(|l| self.start.elapsed() > l)
    }
}

/// Logs how long the enclosing scope took when dropped.
pub struct ScopedTimer {
    name: String,
    watch: Stopwatch,
}

impl ScopedTimer {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            watch: Stopwatch::start(),
        }
    }
}

impl Drop for ScopedTimer {
    fn drop(&mut self) {
        log::info!("{} took {:?}", self.name, self.watch.elapsed());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_limit_never_expires() {
        let watch = Stopwatch::start();
        assert!(!watch.exceeded(None));
        assert!(watch.exceeded(Some(Duration::ZERO)) || watch.elapsed() == Duration::ZERO);
    }
}
