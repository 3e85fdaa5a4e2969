//! Upload-and-render state machine.
//!
//! The controller owns the current selection, its preview, the loading flag,
//! the error banner and the last result. It never blocks: a submission runs on
//! a worker thread and the UI calls [`UploadController::poll`] every frame to
//! pick up the outcome.

use crate::client::Classifier;
use crate::error::{Failure, PredictError, UploadError};
use crate::prediction::Prediction;
use crate::upload::{self, FileSource, PREVIEW_SIZE, PreviewImage, SelectedFile};
use std::path::Path;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

struct Completion {
    request: u64,
    outcome: Result<Prediction, PredictError>,
}

pub struct UploadController {
    classifier: Arc<dyn Classifier>,
    selected: Option<SelectedFile>,
    preview: Option<PreviewImage>,
    loading: bool,
    failure: Option<Failure>,
    result: Option<Prediction>,
    // Bumped on every submission and on remove; replies carrying an older id
    // are dropped.
    request: u64,
    // Bumped on every accepted file, including a re-pick of the same one.
    selection: u64,
    worker: Option<JoinHandle<()>>,
    tx: Sender<Completion>,
    rx: Receiver<Completion>,
}

impl UploadController {
    pub fn new(classifier: Arc<dyn Classifier>) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            classifier,
            selected: None,
            preview: None,
            loading: false,
            failure: None,
            result: None,
            request: 0,
            selection: 0,
            worker: None,
            tx,
            rx,
        }
    }

    /// Swaps the backend, e.g. after the server address changed.
    pub fn set_classifier(&mut self, classifier: Arc<dyn Classifier>) {
        self.classifier = classifier;
    }

    /// Picks up a file from disk (chooser or a drop carrying a path).
    /// Returns false when the file was rejected; the banner then says why.
    pub fn accept_path(&mut self, path: &Path, source: FileSource) -> bool {
        match SelectedFile::from_path(path) {
            Ok(file) => {
                self.accept(file, source);
                true
            }
            Err(e) => {
                self.reject(e, source);
                false
            }
        }
    }

    /// Picks up a file whose bytes are already in memory.
    pub fn accept_bytes(
        &mut self,
        name: &str,
        media_type: Option<String>,
        bytes: Arc<[u8]>,
        source: FileSource,
    ) -> bool {
        match SelectedFile::from_bytes(name, media_type, bytes) {
            Ok(file) => {
                self.accept(file, source);
                true
            }
            Err(e) => {
                self.reject(e, source);
                false
            }
        }
    }

    /// Shows a validation failure. The current selection is left alone.
    pub fn reject(&mut self, err: UploadError, source: FileSource) {
        tracing::info!("Rejected {source:?} file: {err}");
        self.failure = Some(Failure::Upload(err));
    }

    /// Shows the preview for a validated file and starts its submission.
    pub fn accept(&mut self, file: SelectedFile, source: FileSource) {
        tracing::debug!("Accepted {source:?} file {} ({} bytes)", file.name, file.size());
        self.preview = match upload::decode_preview(&file.bytes, PREVIEW_SIZE) {
            Ok(p) => Some(p),
            Err(e) => {
                tracing::warn!("No preview for {}: {e}", file.name);
                None
            }
        };
        self.selected = Some(file);
        self.selection += 1;
        self.submit();
    }

    /// Sends the current selection to the classifier on a worker thread.
    pub fn submit(&mut self) {
        let Some(file) = self.selected.clone() else {
            return;
        };
        self.request += 1;
        self.loading = true;
        self.failure = None;
        self.result = None;

        let request = self.request;
        let tx = self.tx.clone();
        let classifier = Arc::clone(&self.classifier);
        let spawned = thread::Builder::new()
            .name(format!("predict-{request}"))
            .spawn(move || {
                let outcome = classifier.classify(&file);
                // The controller may be gone already; nothing to report then.
                let _ = tx.send(Completion { request, outcome });
            });
        match spawned {
            Ok(handle) => self.worker = Some(handle),
            Err(e) => {
                tracing::error!("Could not start prediction worker: {e}");
                self.loading = false;
                self.failure = Some(Failure::Predict(PredictError::Worker));
            }
        }
    }

    /// Applies finished work. Returns true when visible state changed.
    pub fn poll(&mut self) -> bool {
        let mut changed = false;
        loop {
            match self.rx.try_recv() {
                Ok(done) => changed |= self.complete(done),
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
            }
        }
        if self.loading && self.worker.as_ref().is_some_and(JoinHandle::is_finished) {
            // The worker ended without reporting: it panicked. A reply sent
            // just before finishing is still in the channel, so look once more.
            if let Ok(done) = self.rx.try_recv() {
                return self.complete(done) || changed;
            }
            tracing::error!("Prediction worker exited without a result");
            self.worker = None;
            self.loading = false;
            self.failure = Some(Failure::Predict(PredictError::Worker));
            changed = true;
        }
        changed
    }

    fn complete(&mut self, done: Completion) -> bool {
        if done.request != self.request || self.selected.is_none() {
            tracing::debug!("Dropping stale reply for request {}", done.request);
            return false;
        }
        self.loading = false;
        self.worker = None;
        match done.outcome {
            Ok(prediction) => self.result = Some(prediction),
            Err(e) => {
                tracing::warn!("Prediction failed: {e}");
                self.failure = Some(Failure::Predict(e));
            }
        }
        true
    }

    /// Polls until the current request settles or `timeout` passes.
    pub fn wait_idle(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        loop {
            self.poll();
            if !self.loading {
                return true;
            }
            if Instant::now() >= deadline {
                return false;
            }
            thread::sleep(Duration::from_millis(5));
        }
    }

    /// Back to the empty upload prompt.
    pub fn remove(&mut self) {
        self.request += 1;
        self.selected = None;
        self.preview = None;
        self.result = None;
        self.failure = None;
        self.loading = false;
        self.worker = None;
    }

    /// True while the initial prompt is shown instead of a preview.
    pub fn showing_prompt(&self) -> bool {
        self.selected.is_none()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn selected(&self) -> Option<&SelectedFile> {
        self.selected.as_ref()
    }

    /// Identifies the current selection; changes whenever a file is accepted.
    pub fn selection_id(&self) -> Option<u64> {
        self.selected.as_ref().map(|_| self.selection)
    }

    pub fn preview(&self) -> Option<&PreviewImage> {
        self.preview.as_ref()
    }

    pub fn failure(&self) -> Option<&Failure> {
        self.failure.as_ref()
    }

    pub fn error_banner(&self) -> Option<String> {
        self.failure.as_ref().map(Failure::banner)
    }

    /// The result section is visible only when not loading.
    pub fn result(&self) -> Option<&Prediction> {
        if self.loading {
            None
        } else {
            self.result.as_ref()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Scripted {
        calls: AtomicUsize,
        gate: Mutex<()>,
        reply: fn() -> Result<Prediction, PredictError>,
    }

    impl Scripted {
        fn new(reply: fn() -> Result<Prediction, PredictError>) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                gate: Mutex::new(()),
                reply,
            })
        }
    }

    impl Classifier for Scripted {
        fn classify(&self, _file: &SelectedFile) -> Result<Prediction, PredictError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let _held = self.gate.lock().unwrap();
            (self.reply)()
        }
    }

    fn ok() -> Result<Prediction, PredictError> {
        Ok(Prediction {
            ph_value: 6.0,
            confidence: 0.5,
            ph_class: "pH_6".into(),
            all_probabilities: BTreeMap::from([("pH_6".to_string(), 0.5)]),
            health_advice: String::new(),
            top2_weighted_ph: None,
        })
    }

    fn file(name: &str) -> SelectedFile {
        SelectedFile {
            name: name.into(),
            media_type: "image/png".into(),
            bytes: vec![1, 2, 3].into(),
        }
    }

    #[test]
    fn loading_hides_previous_result() {
        let backend = Scripted::new(ok);
        let mut ctl = UploadController::new(backend.clone());
        ctl.accept(file("a.png"), FileSource::Picker);
        assert!(ctl.wait_idle(Duration::from_secs(5)));
        assert!(ctl.result().is_some());

        let gate = backend.gate.lock().unwrap();
        ctl.accept(file("b.png"), FileSource::Drop);
        assert!(ctl.is_loading());
        assert!(ctl.result().is_none());
        assert!(ctl.failure().is_none());
        drop(gate);
        assert!(ctl.wait_idle(Duration::from_secs(5)));
        assert!(ctl.result().is_some());
        assert_eq!(backend.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn reply_after_remove_is_dropped() {
        let backend = Scripted::new(ok);
        let mut ctl = UploadController::new(backend.clone());
        let gate = backend.gate.lock().unwrap();
        ctl.accept(file("a.png"), FileSource::Picker);
        ctl.remove();
        drop(gate);
        thread::sleep(Duration::from_millis(50));
        assert!(!ctl.poll());
        assert!(ctl.showing_prompt());
        assert!(ctl.result().is_none());
        assert!(!ctl.is_loading());
    }

    #[test]
    fn reply_for_superseded_file_is_dropped() {
        let backend = Scripted::new(ok);
        let mut ctl = UploadController::new(backend.clone());
        let gate = backend.gate.lock().unwrap();
        ctl.accept(file("a.png"), FileSource::Picker);
        ctl.accept(file("b.png"), FileSource::Picker);
        drop(gate);
        assert!(ctl.wait_idle(Duration::from_secs(5)));
        assert_eq!(ctl.selected().map(|f| f.name.as_str()), Some("b.png"));
        assert!(ctl.result().is_some());
    }

    #[test]
    fn reselecting_same_bytes_gets_a_new_selection_id() {
        let mut ctl = UploadController::new(Scripted::new(ok));
        assert_eq!(ctl.selection_id(), None);
        let same = file("a.png");
        ctl.accept(same.clone(), FileSource::Picker);
        let first = ctl.selection_id();
        assert!(first.is_some());
        ctl.accept(same, FileSource::Drop);
        assert_ne!(ctl.selection_id(), first);
        ctl.remove();
        assert_eq!(ctl.selection_id(), None);
        assert!(ctl.wait_idle(Duration::from_secs(5)));
    }

    #[test]
    fn panicking_worker_surfaces_an_error() {
        fn boom() -> Result<Prediction, PredictError> {
            panic!("model crashed")
        }
        let mut ctl = UploadController::new(Scripted::new(boom));
        ctl.accept(file("a.png"), FileSource::Picker);
        assert!(ctl.wait_idle(Duration::from_secs(5)));
        assert!(matches!(
            ctl.failure(),
            Some(Failure::Predict(PredictError::Worker))
        ));
    }

    #[test]
    fn undecodable_bytes_still_submit() {
        let mut ctl = UploadController::new(Scripted::new(ok));
        ctl.accept(file("a.png"), FileSource::Picker);
        assert!(ctl.preview().is_none());
        assert!(ctl.wait_idle(Duration::from_secs(5)));
        assert!(ctl.result().is_some());
    }
}
