use std::sync::{Arc, Mutex, MutexGuard, PoisonError, TryLockError};

use crate::detection::domain::detected_face::DetectedFace;
use crate::detection::domain::face_detector::DetectorVariant;
use crate::detection::domain::tracker_config::TrackerConfig;
use crate::shared::gray_frame::GrayFrame;
use crate::shared::tracker_error::TrackerError;

use super::face_tracker_context::FaceTrackerContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerState {
    Idle,
    Detecting,
}

/// Clonable handle that serializes detections on one context.
///
/// [`detect`](Self::detect) queues behind an in-flight call;
/// [`try_detect`](Self::try_detect) rejects with [`TrackerError::Busy`].
/// The last completed snapshot stays readable while a call is running.
#[derive(Clone)]
pub struct SharedFaceTracker {
    context: Arc<Mutex<FaceTrackerContext>>,
    snapshot: Arc<Mutex<Arc<[DetectedFace]>>>,
}

impl SharedFaceTracker {
    pub fn new(context: FaceTrackerContext) -> Self {
        let snapshot = context.faces();
        Self {
            context: Arc::new(Mutex::new(context)),
            snapshot: Arc::new(Mutex::new(snapshot)),
        }
    }

    pub fn detect(
        &self,
        variant: DetectorVariant,
        frame: &GrayFrame,
    ) -> Result<Arc<[DetectedFace]>, TrackerError> {
        let mut context = self.context.lock().unwrap_or_else(PoisonError::into_inner);
        self.run(&mut context, variant, frame)
    }

    pub fn try_detect(
        &self,
        variant: DetectorVariant,
        frame: &GrayFrame,
    ) -> Result<Arc<[DetectedFace]>, TrackerError> {
        let mut context = match self.context.try_lock() {
            Ok(guard) => guard,
            Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner(),
            Err(TryLockError::WouldBlock) => {
                log::debug!("Rejecting {variant} detection: tracker busy");
                return Err(TrackerError::Busy);
            }
        };
        self.run(&mut context, variant, frame)
    }

    pub fn state(&self) -> TrackerState {
        match self.context.try_lock() {
            Err(TryLockError::WouldBlock) => TrackerState::Detecting,
            _ => TrackerState::Idle,
        }
    }

    /// Faces from the last completed frame; does not wait for one in flight.
    pub fn faces(&self) -> Arc<[DetectedFace]> {
        Arc::clone(&self.snapshot.lock().unwrap_or_else(PoisonError::into_inner))
    }

    /// Edits the configuration between detections.
    pub fn configure<R>(&self, f: impl FnOnce(&mut TrackerConfig) -> R) -> R {
        let mut context = self.context.lock().unwrap_or_else(PoisonError::into_inner);
        f(context.config_mut())
    }

    fn run(
        &self,
        context: &mut MutexGuard<'_, FaceTrackerContext>,
        variant: DetectorVariant,
        frame: &GrayFrame,
    ) -> Result<Arc<[DetectedFace]>, TrackerError> {
        let faces = context.detect(variant, frame)?;
        *self.snapshot.lock().unwrap_or_else(PoisonError::into_inner) = Arc::clone(&faces);
        Ok(faces)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::domain::face_detector::{DetectorOutput, FaceDetector};
    use crate::detection::domain::tracker_config::DetectParams;
    use crate::detection::infrastructure::replay_detector::ReplayDetector;
    use crate::shared::constants::SLOT_BYTES;
    use crossbeam_channel::{bounded, Receiver, Sender};
    use std::thread;

    /// Announces each call, then blocks until released. Call `n` reports
    /// `n` faces so every decode can be traced to its invocation.
    struct GatedDetector {
        started: Sender<usize>,
        release: Receiver<()>,
        calls: usize,
    }

    impl FaceDetector for GatedDetector {
        fn name(&self) -> &str {
            "gated"
        }

        fn detect(
            &mut self,
            _variant: DetectorVariant,
            buffer: &mut [u8],
            _frame: &GrayFrame,
            _params: &DetectParams,
        ) -> Result<DetectorOutput, TrackerError> {
            self.calls += 1;
            let n = self.calls;
            let mut slots = vec![n as i32];
            for i in 0..n {
                slots.extend_from_slice(&[i as i32, 0, 10, 10, n as i32, 0]);
            }
            for (i, v) in slots.iter().enumerate() {
                buffer[i * SLOT_BYTES..(i + 1) * SLOT_BYTES].copy_from_slice(&v.to_ne_bytes());
            }
            self.started.send(n).unwrap();
            self.release.recv().unwrap();
            Ok(DetectorOutput::Written { offset: 0 })
        }
    }

    fn gated() -> (SharedFaceTracker, Receiver<usize>, Sender<()>) {
        let (started_tx, started_rx) = bounded(4);
        let (release_tx, release_rx) = bounded(4);
        let detector = GatedDetector {
            started: started_tx,
            release: release_rx,
            calls: 0,
        };
        let tracker = SharedFaceTracker::new(FaceTrackerContext::new(Box::new(detector)));
        (tracker, started_rx, release_tx)
    }

    fn frame() -> GrayFrame {
        GrayFrame::new(vec![0u8; 4], 2, 2).unwrap()
    }

    fn replay_tracker(slots: &[i32]) -> SharedFaceTracker {
        let dump = slots.iter().flat_map(|v| v.to_ne_bytes()).collect();
        let context = FaceTrackerContext::new(Box::new(ReplayDetector::new(dump)));
        SharedFaceTracker::new(context)
    }

    #[test]
    fn test_idle_tracker_detects() {
        let tracker = replay_tracker(&[1, 5, 6, 7, 8, 2, 0]);
        assert_eq!(tracker.state(), TrackerState::Idle);

        let faces = tracker.try_detect(DetectorVariant::Frontal, &frame()).unwrap();

        assert_eq!(faces.len(), 1);
        assert_eq!(tracker.faces()[0].x(), 5);
        assert_eq!(tracker.state(), TrackerState::Idle);
    }

    #[test]
    fn test_try_detect_rejects_while_in_flight() {
        let (tracker, started, release) = gated();
        let worker = {
            let tracker = tracker.clone();
            thread::spawn(move || tracker.detect(DetectorVariant::Frontal, &frame()))
        };

        assert_eq!(started.recv().unwrap(), 1);
        assert_eq!(tracker.state(), TrackerState::Detecting);
        assert_eq!(
            tracker.try_detect(DetectorVariant::MultiView, &frame()),
            Err(TrackerError::Busy)
        );
        assert!(tracker.faces().is_empty());

        release.send(()).unwrap();
        let faces = worker.join().unwrap().unwrap();
        assert_eq!(faces.len(), 1);
        assert_eq!(tracker.state(), TrackerState::Idle);
    }

    #[test]
    fn test_detect_queues_behind_in_flight_call() {
        let (tracker, started, release) = gated();
        let first = {
            let tracker = tracker.clone();
            thread::spawn(move || tracker.detect(DetectorVariant::Frontal, &frame()))
        };
        assert_eq!(started.recv().unwrap(), 1);

        let second = {
            let tracker = tracker.clone();
            thread::spawn(move || tracker.detect(DetectorVariant::Frontal, &frame()))
        };
        // The second call cannot enter the detector until the first finishes.
        assert!(started
            .recv_timeout(std::time::Duration::from_millis(100))
            .is_err());

        release.send(()).unwrap();
        let first_faces = first.join().unwrap().unwrap();
        assert_eq!(started.recv().unwrap(), 2);
        release.send(()).unwrap();
        let second_faces = second.join().unwrap().unwrap();

        // Each decode saw exactly its own invocation's buffer contents.
        assert_eq!(first_faces.len(), 1);
        assert!(first_faces.iter().all(|f| f.neighbors() == 1));
        assert_eq!(second_faces.len(), 2);
        assert!(second_faces.iter().all(|f| f.neighbors() == 2));
        assert_eq!(tracker.faces().len(), 2);
    }

    #[test]
    fn test_configure_applies_to_next_detect() {
        let tracker = replay_tracker(&[0]);
        tracker.configure(|c| {
            c.min_object_width = 50;
            c.max_object_width = 30;
        });

        let err = tracker.detect(DetectorVariant::Frontal, &frame()).unwrap_err();
        assert!(matches!(err, TrackerError::InvalidConfiguration(_)));
        assert_eq!(tracker.state(), TrackerState::Idle);
    }
}
