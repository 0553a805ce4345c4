use crate::timer::IntervalTimer;
use std::sync::Arc;
use std::time::Duration;

/// Default auto-refresh period.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(30);

type RefreshCallback = Arc<dyn Fn() + Send + Sync>;

/// Invokes a refresh callback on a fixed interval while enabled.
///
/// The timer is purely a function of the enabled flag: turning it on starts
/// exactly one timer, turning it off (or dropping this) stops it. There is
/// no interaction with filter state.
pub struct AutoRefresh {
    enabled: bool,
    interval: Duration,
    callback: RefreshCallback,
    timer: Option<IntervalTimer>,
}

impl AutoRefresh {
    pub fn new<F>(interval: Duration, callback: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        AutoRefresh {
            enabled: false,
            interval,
            callback: Arc::new(callback),
            timer: None,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_running(&self) -> bool {
        self.timer.is_some()
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        self.sync_timer();
    }

    pub fn toggle(&mut self) -> bool {
        self.set_enabled(!self.enabled);
        self.enabled
    }

    /// Change the period. A running timer restarts with the new interval.
    pub fn set_interval(&mut self, interval: Duration) {
        if interval == self.interval {
            return;
        }
        self.interval = interval;
        if let Some(timer) = self.timer.take() {
            timer.stop();
        }
        self.sync_timer();
    }

    fn sync_timer(&mut self) {
        match (self.enabled, self.timer.is_some()) {
            (true, false) => {
                log::debug!("auto-refresh started every {:?}", self.interval);
                let callback = Arc::clone(&self.callback);
                self.timer = Some(IntervalTimer::start(self.interval, move || callback()));
            }
            (false, true) => {
                log::debug!("auto-refresh stopped");
                if let Some(timer) = self.timer.take() {
                    timer.stop();
                }
            }
            _ => {}
        }
    }
}

impl std::fmt::Debug for AutoRefresh {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AutoRefresh")
            .field("enabled", &self.enabled)
            .field("interval", &self.interval)
            .field("running", &self.is_running())
            .finish()
    }
}
