#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Stopwatch {
    accumulated_ms: f64,
    started_at: Option<f64>,
}

impl Stopwatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self, now_ms: f64) {
        if self.started_at.is_none() {
            self.started_at = Some(now_ms);
        }
    }

    pub fn stop(&mut self, now_ms: f64) {
        if let Some(started) = self.started_at.take() {
            self.accumulated_ms += (now_ms - started).max(0.0);
        }
    }

    pub fn is_running(&self) -> bool {
        self.started_at.is_some()
    }

    pub fn elapsed_ms(&self, now_ms: f64) -> f64 {
        match self.started_at {
            Some(started) => self.accumulated_ms + (now_ms - started).max(0.0),
            None => self.accumulated_ms,
        }
    }
}

/// Periodic tick source polled with the current time. Dropping or
/// cancelling it stops further ticks.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ticker {
    interval_ms: f64,
    next_due: f64,
    cancelled: bool,
}

impl Ticker {
    pub fn start(now_ms: f64, interval_ms: f64) -> Self {
        let interval_ms = interval_ms.max(1.0);
        Self {
            interval_ms,
            next_due: now_ms + interval_ms,
            cancelled: false,
        }
    }

    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    pub fn poll(&mut self, now_ms: f64) -> u32 {
        if self.cancelled || now_ms < self.next_due {
            return 0;
        }
        let due = ((now_ms - self.next_due) / self.interval_ms).floor() as u32 + 1;
        self.next_due += due as f64 * self.interval_ms;
        due
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stopwatch_freezes_while_stopped() {
        let mut watch = Stopwatch::new();
        watch.start(1_000.0);
        watch.stop(3_000.0);
        assert_eq!(watch.elapsed_ms(10_000.0), 2_000.0);
        watch.start(10_000.0);
        assert_eq!(watch.elapsed_ms(10_500.0), 2_500.0);
    }

    #[test]
    fn ticker_reports_missed_intervals() {
        let mut ticker = Ticker::start(0.0, 1_000.0);
        assert_eq!(ticker.poll(999.0), 0);
        assert_eq!(ticker.poll(1_000.0), 1);
        assert_eq!(ticker.poll(3_500.0), 2);
        assert_eq!(ticker.poll(3_900.0), 0);
    }

    #[test]
    fn cancel_is_idempotent() {
        let mut ticker = Ticker::start(0.0, 1_000.0);
        ticker.cancel();
        ticker.cancel();
        assert!(ticker.is_cancelled());
        assert_eq!(ticker.poll(5_000.0), 0);
    }
}
