use anyhow::Result;
use image::{Rgba, RgbaImage};
use std::path::Path;
use std::thread;
use std::time::{Duration, Instant};

use regionlapse::capture::{BoundingBox, CaptureSession, OutputDir, ScreenCapture};

/// 200x100 screen, left half red and right half blue
struct SplitScreen;

impl ScreenCapture for SplitScreen {
    fn capture_screen(&mut self) -> Result<RgbaImage> {
        Ok(RgbaImage::from_fn(200, 100, |x, _| {
            if x < 100 {
                Rgba([255, 0, 0, 255])
            } else {
                Rgba([0, 0, 255, 255])
            }
        }))
    }
}

fn split_screen() -> Result<Box<dyn ScreenCapture>> {
    Ok(Box::new(SplitScreen))
}

/// Counters parsed from `{counter}_{YYYYMMDD_HHMMSS}.png` names, sorted
fn counters_in(dir: &Path) -> Vec<u64> {
    let mut counters: Vec<u64> = std::fs::read_dir(dir)
        .map(|entries| {
            entries
                .flatten()
                .filter_map(|entry| {
                    let name = entry.file_name().to_string_lossy().into_owned();
                    let (counter, rest) = name.split_once('_')?;
                    let stamp = rest.strip_suffix(".png")?;
                    assert_eq!(stamp.len(), 15, "unexpected timestamp in {}", name);
                    counter.parse().ok()
                })
                .collect()
        })
        .unwrap_or_default();
    counters.sort_unstable();
    counters
}

fn wait_for(mut done: impl FnMut() -> bool) {
    let deadline = Instant::now() + Duration::from_secs(10);
    while !done() {
        assert!(Instant::now() < deadline, "timed out");
        thread::sleep(Duration::from_millis(2));
    }
}

#[test]
fn captures_are_numbered_sequentially() {
    let tmp = tempfile::tempdir().unwrap();
    let out = OutputDir::new(tmp.path().join("out"));
    let mut session = CaptureSession::with_tick(Duration::from_millis(2));
    session.set_region(BoundingBox::new(150, 80, 50, 20));

    session
        .start(Duration::from_secs(2), out.clone(), split_screen)
        .unwrap();
    assert!(session.is_running());

    wait_for(|| session.captures_taken() >= 3);
    session.stop();
    session.join().unwrap();

    let counters = counters_in(out.path());
    assert!(counters.len() >= 3);
    assert_eq!(counters, (1..=counters.len() as u64).collect::<Vec<_>>());

    // Only the selected region is written
    let first = image::open(out.path().join(
        std::fs::read_dir(out.path())
            .unwrap()
            .flatten()
            .map(|e| e.file_name())
            .find(|n| n.to_string_lossy().starts_with("1_"))
            .unwrap(),
    ))
    .unwrap()
    .to_rgba8();
    assert_eq!(first.dimensions(), (100, 60));
    assert_eq!(first.get_pixel(10, 10), &Rgba([255, 0, 0, 255]));
    assert_eq!(first.get_pixel(90, 10), &Rgba([0, 0, 255, 255]));
}

#[test]
fn no_writes_after_stop() {
    let tmp = tempfile::tempdir().unwrap();
    let out = OutputDir::new(tmp.path());
    let mut session = CaptureSession::with_tick(Duration::from_millis(2));
    session.set_region(BoundingBox::new(0, 0, 20, 20));

    session
        .start(Duration::from_secs(1), out.clone(), split_screen)
        .unwrap();
    wait_for(|| session.captures_taken() >= 1);

    session.stop();
    assert!(!session.is_running());
    session.join().unwrap();

    let written = counters_in(out.path());
    assert_eq!(written.len() as u64, session.captures_taken());

    thread::sleep(Duration::from_millis(50));
    assert_eq!(counters_in(out.path()), written);
    assert!(session.countdown().is_none());
}

#[test]
fn stop_during_wait_still_writes_that_capture() {
    let tmp = tempfile::tempdir().unwrap();
    let out = OutputDir::new(tmp.path().join("out"));
    let mut session = CaptureSession::with_tick(Duration::from_millis(20));
    session.set_region(BoundingBox::new(0, 0, 20, 20));

    let started = Instant::now();
    session
        .start(Duration::from_secs(3600), out.clone(), split_screen)
        .unwrap();
    wait_for(|| session.countdown().is_some());
    assert!(session.countdown().map_or(false, |c| c.remaining() > 3500));

    session.stop();
    session.join().unwrap();

    // The countdown was cut short, not waited out
    assert!(started.elapsed() < Duration::from_secs(60));
    assert!(session.countdown().is_none());
    assert_eq!(session.captures_taken(), 1);
    assert_eq!(counters_in(out.path()), vec![1]);

    let saved = session.last_saved().unwrap();
    assert_eq!(image::open(saved).unwrap().width(), 20);
}

#[test]
fn restart_begins_counting_from_one() {
    let tmp = tempfile::tempdir().unwrap();
    let mut session = CaptureSession::with_tick(Duration::from_millis(1));
    session.set_region(BoundingBox::new(0, 0, 20, 20));

    for run in ["first", "second"] {
        let out = OutputDir::new(tmp.path().join(run));
        session.start(Duration::from_secs(1), out.clone(), split_screen).unwrap();
        wait_for(|| session.captures_taken() >= 2);
        session.stop();
        session.join().unwrap();
        assert_eq!(counters_in(out.path())[0], 1);
    }
}

#[test]
fn reselecting_applies_to_the_next_capture() {
    let tmp = tempfile::tempdir().unwrap();
    let out = OutputDir::new(tmp.path());
    let mut session = CaptureSession::with_tick(Duration::from_millis(2));
    session.set_region(BoundingBox::new(0, 0, 10, 10));

    session.start(Duration::from_secs(1), out.clone(), split_screen).unwrap();
    wait_for(|| session.captures_taken() >= 1);
    session.set_region(BoundingBox::new(0, 0, 30, 30));
    let seen = session.captures_taken();
    wait_for(|| session.captures_taken() >= seen + 2);
    session.stop();
    session.join().unwrap();

    let last = session.last_saved().unwrap();
    let image = image::open(last).unwrap();
    assert_eq!((image.width(), image.height()), (30, 30));
}
