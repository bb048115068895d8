//! Capture worker and session counters
//!
//! The engine runs its loop on a dedicated background thread, gated by
//! an atomic flag: `start` spawns the worker, `stop` flags it down, the
//! worker releases the source on the way out. Results are published as
//! `frame_update` events on the shared broadcast channel.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use chrono::Utc;
use tokio::sync::broadcast;

use crate::error::EngineError;
use crate::protocol::{DetectionStats, FrameUpdate, WsEvent};

use super::{Detection, FireDetector, FrameSource};

/// Runs the capture/analyze/publish loop
///
/// One engine per server process. Counters accumulate across sessions,
/// like the rest of the process state.
pub struct DetectionEngine {
    active: Arc<AtomicBool>,
    stats: Arc<RwLock<DetectionStats>>,
    events: broadcast::Sender<WsEvent>,
    detector: Arc<dyn FireDetector>,
    source: Arc<Mutex<Box<dyn FrameSource>>>,
    frame_interval: Duration,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl DetectionEngine {
    pub fn new(
        source: Box<dyn FrameSource>,
        detector: Arc<dyn FireDetector>,
        events: broadcast::Sender<WsEvent>,
        frame_interval: Duration,
    ) -> Self {
        Self {
            active: Arc::new(AtomicBool::new(false)),
            stats: Arc::new(RwLock::new(DetectionStats::default())),
            events,
            detector,
            source: Arc::new(Mutex::new(source)),
            frame_interval,
            worker: Mutex::new(None),
        }
    }

    /// Whether the capture loop is currently running
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    /// Snapshot of the session counters
    pub fn stats(&self) -> DetectionStats {
        self.stats.read().unwrap().clone()
    }

    /// The detector shared with the one-shot analysis endpoint
    pub fn detector(&self) -> Arc<dyn FireDetector> {
        self.detector.clone()
    }

    /// Start the capture loop
    ///
    /// Errors if a loop is already running. A previous, already-stopped
    /// worker is joined first so two loops never overlap.
    pub fn start(&self) -> Result<(), EngineError> {
        let mut worker = self.worker.lock().unwrap();
        if self.active.load(Ordering::SeqCst) {
            return Err(EngineError::AlreadyActive);
        }
        if let Some(handle) = worker.take() {
            let _ = handle.join();
        }

        self.active.store(true, Ordering::SeqCst);
        let ctx = WorkerCtx {
            active: self.active.clone(),
            stats: self.stats.clone(),
            events: self.events.clone(),
            detector: self.detector.clone(),
            source: self.source.clone(),
            frame_interval: self.frame_interval,
        };
        *worker = Some(thread::spawn(move || capture_loop(ctx)));
        Ok(())
    }

    /// Stop the capture loop
    ///
    /// Returns whether a loop was running. The worker notices on its
    /// next iteration and releases the source.
    pub fn stop(&self) -> bool {
        self.active.swap(false, Ordering::SeqCst)
    }
}

impl Drop for DetectionEngine {
    fn drop(&mut self) {
        self.active.store(false, Ordering::SeqCst);
    }
}

/// Everything the worker thread owns
struct WorkerCtx {
    active: Arc<AtomicBool>,
    stats: Arc<RwLock<DetectionStats>>,
    events: broadcast::Sender<WsEvent>,
    detector: Arc<dyn FireDetector>,
    source: Arc<Mutex<Box<dyn FrameSource>>>,
    frame_interval: Duration,
}

fn capture_loop(ctx: WorkerCtx) {
    log::info!("detection loop starting");

    if let Err(e) = ctx.source.lock().unwrap().open() {
        log::error!("could not open capture source: {}", e);
        let _ = ctx.events.send(WsEvent::DetectionError {
            message: format!("Could not access capture source: {}", e),
        });
        ctx.active.store(false, Ordering::SeqCst);
        return;
    }

    while ctx.active.load(Ordering::SeqCst) {
        let frame = match ctx.source.lock().unwrap().read() {
            Ok(frame) => frame,
            Err(e) => {
                log::warn!("failed to read frame: {}", e);
                thread::sleep(ctx.frame_interval);
                continue;
            }
        };

        // A detector fault counts as "no fire" for this frame
        let detection = ctx.detector.analyze(&frame).unwrap_or_else(|e| {
            log::warn!("detector error: {}", e);
            Detection::default()
        });

        let stats = {
            let mut stats = ctx.stats.write().unwrap();
            stats.total_frames += 1;
            if detection.fire_detected {
                stats.fire_detected_frames += 1;
                stats.alerts_sent += 1;
                stats.last_detection = Some(Utc::now());
            }
            stats.clone()
        };

        let update = FrameUpdate {
            image: BASE64.encode(&frame),
            fire_detected: detection.fire_detected,
            confidence: detection.confidence,
            stats,
        };
        // No subscribers is fine
        let _ = ctx.events.send(WsEvent::FrameUpdate(update));

        thread::sleep(ctx.frame_interval);
    }

    ctx.source.lock().unwrap().close();
    log::info!("detection loop stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::StillFrameSource;

    /// Detector that pops scripted verdicts, then stays quiet
    struct ScriptedDetector {
        verdicts: Mutex<Vec<bool>>,
    }

    impl ScriptedDetector {
        fn new(verdicts: &[bool]) -> Self {
            Self {
                verdicts: Mutex::new(verdicts.to_vec()),
            }
        }
    }

    impl FireDetector for ScriptedDetector {
        fn analyze(&self, _frame: &[u8]) -> Result<Detection, EngineError> {
            let mut verdicts = self.verdicts.lock().unwrap();
            let fire = if verdicts.is_empty() {
                false
            } else {
                verdicts.remove(0)
            };
            Ok(Detection {
                fire_detected: fire,
                confidence: if fire { 80.0 } else { 0.0 },
            })
        }
    }

    fn test_engine(
        detector: Arc<dyn FireDetector>,
    ) -> (DetectionEngine, broadcast::Receiver<WsEvent>) {
        let (tx, rx) = broadcast::channel(64);
        let engine = DetectionEngine::new(
            Box::new(StillFrameSource::new(vec![1, 2, 3])),
            detector,
            tx,
            Duration::from_millis(1),
        );
        (engine, rx)
    }

    fn next_frame(rx: &mut broadcast::Receiver<WsEvent>) -> FrameUpdate {
        loop {
            match rx.blocking_recv().unwrap() {
                WsEvent::FrameUpdate(update) => return update,
                WsEvent::DetectionError { message } => {
                    panic!("unexpected detection error: {message}")
                }
            }
        }
    }

    #[test]
    fn start_while_active_is_an_error() {
        let (engine, _rx) = test_engine(Arc::new(ScriptedDetector::new(&[])));

        engine.start().unwrap();
        assert!(matches!(engine.start(), Err(EngineError::AlreadyActive)));

        assert!(engine.stop());
        assert!(!engine.stop());
    }

    #[test]
    fn frames_carry_verdicts_and_counters() {
        let (engine, mut rx) = test_engine(Arc::new(ScriptedDetector::new(&[true, false])));
        engine.start().unwrap();

        let first = next_frame(&mut rx);
        assert_eq!(first.image, BASE64.encode([1u8, 2, 3]));
        assert!(first.fire_detected);
        assert_eq!(first.stats.total_frames, 1);
        assert_eq!(first.stats.alerts_sent, 1);
        assert!(first.stats.last_detection.is_some());

        let second = next_frame(&mut rx);
        assert!(!second.fire_detected);
        assert_eq!(second.stats.total_frames, 2);
        assert_eq!(second.stats.alerts_sent, 1);

        engine.stop();
    }

    #[test]
    fn counters_survive_restart() {
        let (engine, mut rx) = test_engine(Arc::new(ScriptedDetector::new(&[true])));

        engine.start().unwrap();
        let first = next_frame(&mut rx);
        assert_eq!(first.stats.alerts_sent, 1);
        engine.stop();

        engine.start().unwrap();
        let next = next_frame(&mut rx);
        assert!(next.stats.total_frames > first.stats.total_frames);
        assert_eq!(next.stats.alerts_sent, 1);
        engine.stop();
    }
}
