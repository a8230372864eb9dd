//! The interval capture loop.
//!
//! A [`CaptureSession`] owns at most one worker thread. The worker waits out
//! the interval one second at a time (publishing a [`Countdown`] as it
//! goes), grabs the selected region and writes it to the [`OutputDir`], then
//! starts over while the running flag stays set.
//!
//! Stopping only clears the flag. A wait in progress ends at the next
//! one-second step, after which that iteration's capture is still taken and
//! written before the loop exits.

use anyhow::Result;
use std::path::PathBuf;
use std::sync::{
    atomic::{AtomicBool, AtomicU64, Ordering},
    Arc, Mutex, MutexGuard,
};
use std::thread;
use std::time::{Duration, Instant};
use thiserror::Error;

use super::{BoundingBox, Countdown, OutputDir, ScreenCapture};
use crate::logger;

/// Length of one countdown step
pub const COUNTDOWN_TICK: Duration = Duration::from_secs(1);

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SessionError {
    #[error("Please select a region first!")]
    NoRegionSelected,
    #[error("A capture loop is already running")]
    AlreadyRunning,
}

/// State shared between the UI thread and the worker
#[derive(Debug, Default)]
pub struct SessionShared {
    /// Cleared to ask the worker to stop
    running: AtomicBool,
    /// Region to capture, replaced whenever the user selects again
    region: Mutex<Option<BoundingBox>>,
    /// Countdown to the next capture, `None` when not waiting
    countdown: Mutex<Option<Countdown>>,
    /// Captures written by the current (or last) loop
    captures: AtomicU64,
    last_saved: Mutex<Option<PathBuf>>,
    last_error: Mutex<Option<String>>,
}

// A poisoned lock only means the worker panicked mid-update; the data is
// still a plain value worth reading.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl SessionShared {
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    fn set_countdown(&self, countdown: Option<Countdown>) {
        *lock(&self.countdown) = countdown;
    }
}

/// Start/stop handle for the interval capture worker
pub struct CaptureSession {
    shared: Arc<SessionShared>,
    worker: Option<thread::JoinHandle<Result<()>>>,
    tick: Duration,
}

impl Default for CaptureSession {
    fn default() -> Self {
        Self::new()
    }
}

impl CaptureSession {
    pub fn new() -> Self {
        Self::with_tick(COUNTDOWN_TICK)
    }

    /// Session whose countdown steps last `tick` instead of one second
    pub fn with_tick(tick: Duration) -> Self {
        Self {
            shared: Arc::new(SessionShared::default()),
            worker: None,
            tick,
        }
    }

    /// Record the region the worker captures. Takes effect from the next
    /// capture when a loop is already running.
    pub fn set_region(&self, region: BoundingBox) {
        *lock(&self.shared.region) = Some(region);
    }

    pub fn region(&self) -> Option<BoundingBox> {
        *lock(&self.shared.region)
    }

    pub fn is_running(&self) -> bool {
        self.shared.is_running()
    }

    /// True while a worker thread exists, including one that is finishing
    /// its last wait or capture after a stop
    pub fn is_active(&self) -> bool {
        self.worker.as_ref().map_or(false, |w| !w.is_finished())
    }

    pub fn countdown(&self) -> Option<Countdown> {
        *lock(&self.shared.countdown)
    }

    pub fn captures_taken(&self) -> u64 {
        self.shared.captures.load(Ordering::SeqCst)
    }

    pub fn last_saved(&self) -> Option<PathBuf> {
        lock(&self.shared.last_saved).clone()
    }

    /// Message of the error that ended the last loop, if any
    pub fn last_error(&self) -> Option<String> {
        lock(&self.shared.last_error).clone()
    }

    /// Start capturing every `interval` into `output`.
    ///
    /// `make_capturer` runs on the worker thread, so backends that must stay
    /// on the thread that created them work unchanged.
    pub fn start<F>(
        &mut self,
        interval: Duration,
        output: OutputDir,
        make_capturer: F,
    ) -> Result<(), SessionError>
    where
        F: FnOnce() -> Result<Box<dyn ScreenCapture>> + Send + 'static,
    {
        if self.region().is_none() {
            log::warn!("{}", SessionError::NoRegionSelected);
            return Err(SessionError::NoRegionSelected);
        }
        if self.is_running() || self.is_active() {
            log::warn!("Start ignored: {}", SessionError::AlreadyRunning);
            return Err(SessionError::AlreadyRunning);
        }
        // Reap a worker that already exited so its handle is not leaked
        if let Some(Err(e)) = self.poll_finished() {
            log::debug!("Previous capture loop had ended with: {}", e);
        }

        self.shared.captures.store(0, Ordering::SeqCst);
        *lock(&self.shared.last_saved) = None;
        *lock(&self.shared.last_error) = None;
        self.shared.running.store(true, Ordering::SeqCst);

        let shared = Arc::clone(&self.shared);
        let tick = self.tick;
        log::info!(
            "Starting capture loop: every {:?} into {}",
            interval,
            output.path().display()
        );

        self.worker = Some(thread::spawn(move || {
            let result = make_capturer()
                .and_then(|capturer| run_capture_loop(capturer, &shared, interval, &output, tick));

            shared.running.store(false, Ordering::SeqCst);
            shared.set_countdown(None);
            if let Err(e) = &result {
                logger::log_error("capture loop", e);
                *lock(&shared.last_error) = Some(e.to_string());
            }
            log::info!("Capture loop stopped");
            result
        }));

        Ok(())
    }

    /// Ask the worker to stop after its current iteration
    pub fn stop(&mut self) {
        if self.shared.running.swap(false, Ordering::SeqCst) {
            log::info!("Stopping capture loop");
        }
        self.shared.set_countdown(None);
    }

    /// Collect the worker's result once it has exited
    pub fn poll_finished(&mut self) -> Option<Result<()>> {
        if self.worker.as_ref()?.is_finished() {
            return self.worker.take().map(join_worker);
        }
        None
    }

    /// Block until the worker exits
    pub fn join(&mut self) -> Result<()> {
        match self.worker.take() {
            Some(handle) => join_worker(handle),
            None => Ok(()),
        }
    }
}

impl Drop for CaptureSession {
    fn drop(&mut self) {
        self.shared.running.store(false, Ordering::SeqCst);
    }
}

fn join_worker(handle: thread::JoinHandle<Result<()>>) -> Result<()> {
    handle
        .join()
        .unwrap_or_else(|_| Err(anyhow::anyhow!("Capture thread panicked")))
}

/// Body of the worker thread
fn run_capture_loop(
    mut capturer: Box<dyn ScreenCapture>,
    shared: &SessionShared,
    interval: Duration,
    output: &OutputDir,
    tick: Duration,
) -> Result<()> {
    let mut counter = 0u64;

    while shared.is_running() {
        if !wait_interval(shared, interval, tick) {
            log::debug!("Wait cut short by stop, taking the final capture");
        }

        let Some(region) = *lock(&shared.region) else {
            break;
        };

        let start = Instant::now();
        let image = capturer.capture_region(&region)?;
        logger::log_capture_event(&region.to_string(), image.width(), image.height());

        counter += 1;
        let path = output.save_capture(counter, &image)?;
        logger::log_performance("capture and save", start.elapsed().as_secs_f64() * 1000.0);
        log::info!("Saved capture {} to {}", counter, path.display());

        shared.captures.store(counter, Ordering::SeqCst);
        *lock(&shared.last_saved) = Some(path);
    }

    Ok(())
}

/// Sleep through `interval` in `tick` steps, publishing the countdown.
/// Returns false as soon as the running flag is seen cleared; the countdown
/// is withdrawn either way.
fn wait_interval(shared: &SessionShared, interval: Duration, tick: Duration) -> bool {
    let mut countdown = Countdown::from_duration(interval);

    while !countdown.is_zero() {
        if !shared.is_running() {
            shared.set_countdown(None);
            return false;
        }
        shared.set_countdown(Some(countdown));
        thread::sleep(tick);
        countdown.tick();
    }

    // Sub-second remainder, scaled like the whole seconds
    let fraction = interval.subsec_nanos() as f64 / 1e9;
    if fraction > 0.0 {
        thread::sleep(tick.mul_f64(fraction));
    }
    shared.set_countdown(None);

    shared.is_running()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbaImage;

    struct BlankScreen;

    impl ScreenCapture for BlankScreen {
        fn capture_screen(&mut self) -> Result<RgbaImage> {
            Ok(RgbaImage::new(64, 48))
        }
    }

    fn blank() -> Result<Box<dyn ScreenCapture>> {
        Ok(Box::new(BlankScreen))
    }

    #[test]
    fn start_without_region_is_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let out = OutputDir::new(tmp.path().join("out"));
        let mut session = CaptureSession::with_tick(Duration::from_millis(1));

        let result = session.start(Duration::from_secs(1), out.clone(), blank);

        assert_eq!(result, Err(SessionError::NoRegionSelected));
        assert!(!session.is_running());
        assert!(!session.is_active());
        assert!(!out.path().exists());
    }

    #[test]
    fn second_start_is_rejected_while_running() {
        let tmp = tempfile::tempdir().unwrap();
        let mut session = CaptureSession::with_tick(Duration::from_millis(5));
        session.set_region(BoundingBox::new(0, 0, 10, 10));

        session
            .start(Duration::from_secs(60), OutputDir::new(tmp.path()), blank)
            .unwrap();
        let again = session.start(Duration::from_secs(60), OutputDir::new(tmp.path()), blank);
        assert_eq!(again, Err(SessionError::AlreadyRunning));

        session.stop();
        session.join().unwrap();
        assert!(!session.is_running());
    }

    #[test]
    fn wait_stops_early_when_flag_clears() {
        let shared = SessionShared::default();
        shared.set_countdown(Some(Countdown::from_secs(5)));

        let started = Instant::now();
        assert!(!wait_interval(&shared, Duration::from_secs(3600), Duration::from_secs(1)));
        assert!(started.elapsed() < Duration::from_secs(1));
        assert!(lock(&shared.countdown).is_none());
    }

    #[test]
    fn restart_clears_last_saved() {
        let tmp = tempfile::tempdir().unwrap();
        let out = OutputDir::new(tmp.path().join("out"));
        let mut session = CaptureSession::with_tick(Duration::from_millis(1));
        session.set_region(BoundingBox::new(0, 0, 10, 10));

        session.start(Duration::from_secs(1), out.clone(), blank).unwrap();
        while session.last_saved().is_none() {
            thread::sleep(Duration::from_millis(1));
        }
        session.stop();
        session.join().unwrap();
        assert!(session.last_saved().is_some());

        session.start(Duration::from_secs(3600), out, blank).unwrap();
        assert!(session.last_saved().is_none());
        assert_eq!(session.captures_taken(), 0);

        session.stop();
        session.join().unwrap();
    }

    #[test]
    fn capture_failure_ends_the_loop() {
        struct Broken;
        impl ScreenCapture for Broken {
            fn capture_screen(&mut self) -> Result<RgbaImage> {
                Err(anyhow::anyhow!("no display"))
            }
        }

        let tmp = tempfile::tempdir().unwrap();
        let mut session = CaptureSession::with_tick(Duration::from_millis(1));
        session.set_region(BoundingBox::new(0, 0, 10, 10));
        session
            .start(Duration::from_secs(1), OutputDir::new(tmp.path()), || {
                Ok(Box::new(Broken) as Box<dyn ScreenCapture>)
            })
            .unwrap();

        assert!(session.join().is_err());
        assert!(!session.is_running());
        assert_eq!(session.captures_taken(), 0);
        assert_eq!(session.last_error().as_deref(), Some("no display"));
    }
}
