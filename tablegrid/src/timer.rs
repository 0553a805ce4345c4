// Cancellable timers backed by a single worker thread each

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

enum DebounceCommand<T> {
    Arm(T),
    Cancel,
    Flush,
}

/// Trailing-edge debouncer. Every `arm` replaces the pending value and
/// restarts the quiet period; the callback fires once the period elapses
/// with no further arms. Dropping the debouncer discards a pending value.
pub struct Debouncer<T: Send + 'static> {
    tx: Option<mpsc::Sender<DebounceCommand<T>>>,
    thread: Option<JoinHandle<()>>,
    /// Arms sent but not yet taken up by the worker.
    queued: Arc<AtomicUsize>,
    /// Set and cleared by the worker only.
    armed: Arc<AtomicBool>,
    delay: Duration,
}

impl<T: Send + 'static> Debouncer<T> {
    pub fn new<F>(delay: Duration, callback: F) -> Self
    where
        F: Fn(T) + Send + 'static,
    {
        let (tx, rx) = mpsc::channel::<DebounceCommand<T>>();
        let queued = Arc::new(AtomicUsize::new(0));
        let armed_flag = Arc::new(AtomicBool::new(false));
        let worker_queued = Arc::clone(&queued);
        let worker_armed = Arc::clone(&armed_flag);

        let thread = std::thread::spawn(move || {
            let mut armed: Option<(T, Instant)> = None;

            loop {
                let received = match &armed {
                    Some((_, deadline)) => {
                        let now = Instant::now();
                        if now >= *deadline {
                            Err(RecvTimeoutError::Timeout)
                        } else {
                            rx.recv_timeout(*deadline - now)
                        }
                    }
                    None => rx.recv().map_err(|_| RecvTimeoutError::Disconnected),
                };

                match received {
                    Ok(DebounceCommand::Arm(value)) => {
                        armed = Some((value, Instant::now() + delay));
                        // Raise before releasing the queued count so the
                        // pending state never reads false in between
                        worker_armed.store(true, Ordering::SeqCst);
                        worker_queued.fetch_sub(1, Ordering::SeqCst);
                    }
                    Ok(DebounceCommand::Cancel) => {
                        armed = None;
                        worker_armed.store(false, Ordering::SeqCst);
                    }
                    Ok(DebounceCommand::Flush) | Err(RecvTimeoutError::Timeout) => {
                        if let Some((value, _)) = armed.take() {
                            worker_armed.store(false, Ordering::SeqCst);
                            callback(value);
                        }
                    }
                    Err(RecvTimeoutError::Disconnected) => break,
                }
            }
        });

        Debouncer {
            tx: Some(tx),
            thread: Some(thread),
            queued,
            armed: armed_flag,
            delay,
        }
    }

    /// Schedule `value`, replacing anything still waiting.
    pub fn arm(&self, value: T) {
        // Count up front so `is_pending` is accurate before the worker wakes
        self.queued.fetch_add(1, Ordering::SeqCst);
        if !self.send(DebounceCommand::Arm(value)) {
            self.queued.fetch_sub(1, Ordering::SeqCst);
        }
    }

    /// Drop the pending value without firing.
    pub fn cancel(&self) {
        let _ = self.send(DebounceCommand::Cancel);
    }

    /// Fire the pending value now, if there is one.
    pub fn flush(&self) {
        let _ = self.send(DebounceCommand::Flush);
    }

    pub fn is_pending(&self) -> bool {
        self.queued.load(Ordering::SeqCst) > 0 || self.armed.load(Ordering::SeqCst)
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    fn send(&self, command: DebounceCommand<T>) -> bool {
        let Some(tx) = &self.tx else {
            return false;
        };
        if tx.send(command).is_err() {
            log::warn!("debounce worker exited; dropping command");
            return false;
        }
        true
    }
}

impl<T: Send + 'static> Drop for Debouncer<T> {
    fn drop(&mut self) {
        // Disconnecting the channel stops the worker without firing
        self.tx.take();
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

/// Calls a callback every `interval` until stopped. `stop` (or drop) joins
/// the worker, so no call starts after it returns.
pub struct IntervalTimer {
    stop_tx: Option<mpsc::Sender<()>>,
    thread: Option<JoinHandle<()>>,
}

impl IntervalTimer {
    pub fn start<F>(interval: Duration, callback: F) -> Self
    where
        F: Fn() + Send + 'static,
    {
        let (stop_tx, stop_rx) = mpsc::channel::<()>();

        let thread = std::thread::spawn(move || {
            let mut next_tick = Instant::now() + interval;
            loop {
                let wait = next_tick.saturating_duration_since(Instant::now());
                match stop_rx.recv_timeout(wait) {
                    Err(RecvTimeoutError::Timeout) => {
                        callback();
                        next_tick += interval;
                    }
                    // Explicit stop or the timer was dropped
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            }
        });

        IntervalTimer {
            stop_tx: Some(stop_tx),
            thread: Some(thread),
        }
    }

    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        if let Some(tx) = self.stop_tx.take() {
            let _ = tx.send(());
        }
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

impl Drop for IntervalTimer {
    fn drop(&mut self) {
        self.shutdown();
    }
}
