//! Automatic sweep timer.

/// Accumulates animation time while running.
///
/// The sweep position is derived from the accumulated time, so stopping and
/// restarting resumes where it left off.
#[derive(Debug, Clone, PartialEq)]
pub struct AutoSweep {
    running: bool,
    time: f64,
    speed: f64,
}

impl AutoSweep {
    /// Create a sweep advancing `speed` time units per frame.
    pub fn new(speed: f64, running: bool) -> Self {
        Self {
            running,
            time: 0.0,
            speed,
        }
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Accumulated sweep time.
    #[inline]
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Start the sweep. Returns whether the state changed.
    pub fn start(&mut self) -> bool {
        let changed = !self.running;
        self.running = true;
        changed
    }

    /// Stop the sweep. Returns whether the state changed.
    pub fn stop(&mut self) -> bool {
        let changed = self.running;
        self.running = false;
        changed
    }

    /// Flip the running state and return the new one.
    pub fn toggle(&mut self) -> bool {
        self.running = !self.running;
        self.running
    }

    /// Advance one animation frame. Returns the new time while running.
    pub fn tick(&mut self) -> Option<f64> {
        if !self.running {
            return None;
        }
        self.time += self.speed;
        Some(self.time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_only_while_running() {
        let mut sweep = AutoSweep::new(0.5, false);
        assert_eq!(sweep.tick(), None);
        assert_eq!(sweep.time(), 0.0);

        assert!(sweep.start());
        assert_eq!(sweep.tick(), Some(0.5));
        assert_eq!(sweep.tick(), Some(1.0));
    }

    #[test]
    fn test_start_stop_idempotent() {
        let mut sweep = AutoSweep::new(0.02, false);
        assert!(sweep.start());
        assert!(!sweep.start());
        assert!(sweep.is_running());
        assert!(sweep.stop());
        assert!(!sweep.stop());
        assert!(!sweep.is_running());
    }

    #[test]
    fn test_toggle_resumes_time() {
        let mut sweep = AutoSweep::new(0.25, true);
        sweep.tick();
        sweep.tick();
        assert!(!sweep.toggle());
        assert_eq!(sweep.tick(), None);
        assert!(sweep.toggle());
        assert_eq!(sweep.tick(), Some(0.75));
    }
}
