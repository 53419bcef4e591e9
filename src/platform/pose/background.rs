// Runs a blocking landmark source on its own thread so the frame loop can
// notice a stop request while the source is waiting for input.

use super::{LandmarkSource, SourceEvent};
use crate::models::pose::PoseResult;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::debug;

/// How often a waiting `poll` rechecks the stop flag
const STOP_CHECK_INTERVAL: Duration = Duration::from_millis(50);

/// Events buffered ahead of the frame loop
const QUEUE_DEPTH: usize = 64;

type Item = PoseResult<Option<SourceEvent>>;

pub struct BackgroundSource {
    events: Receiver<Item>,
    stop: Arc<AtomicBool>,
    label: String,
}

impl BackgroundSource {
    /// Build the source with `open` on a reader thread and forward its events.
    ///
    /// `poll` returns `Ok(None)` once `stop` is set, even if the reader is
    /// still blocked. The reader thread is left to finish on its own.
    pub fn spawn<S, F>(label: impl Into<String>, stop: Arc<AtomicBool>, open: F) -> PoseResult<Self>
    where
        S: LandmarkSource,
        F: FnOnce() -> PoseResult<S> + Send + 'static,
    {
        let label = label.into();
        let (tx, rx) = mpsc::sync_channel::<Item>(QUEUE_DEPTH);

        thread::Builder::new()
            .name("landmark-reader".to_string())
            .spawn(move || {
                let mut source = match open() {
                    Ok(source) => source,
                    Err(e) => {
                        let _ = tx.send(Err(e));
                        return;
                    }
                };

                loop {
                    let item = source.poll();
                    let finished = !matches!(item, Ok(Some(_)));
                    if tx.send(item).is_err() || finished {
                        break;
                    }
                }
                debug!("Landmark reader thread finished");
            })?;

        Ok(Self {
            events: rx,
            stop,
            label,
        })
    }
}

impl LandmarkSource for BackgroundSource {
    fn poll(&mut self) -> PoseResult<Option<SourceEvent>> {
        loop {
            match self.events.recv_timeout(STOP_CHECK_INTERVAL) {
                Ok(item) => return item,
                Err(RecvTimeoutError::Timeout) => {
                    if self.stop.load(Ordering::SeqCst) {
                        return Ok(None);
                    }
                }
                Err(RecvTimeoutError::Disconnected) => return Ok(None),
            }
        }
    }

    fn describe(&self) -> String {
        self.label.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::input::UiEvent;
    use crate::models::pose::PoseError;
    use crate::platform::pose::JsonLinesSource;
    use std::io::Cursor;
    use std::time::Instant;

    /// Source whose reads never complete while the sender is alive
    struct Stalled(Receiver<()>);

    impl LandmarkSource for Stalled {
        fn poll(&mut self) -> PoseResult<Option<SourceEvent>> {
            let _ = self.0.recv();
            Ok(None)
        }

        fn describe(&self) -> String {
            "stalled".to_string()
        }
    }

    #[test]
    fn test_forwards_events_in_order() {
        let stop = Arc::new(AtomicBool::new(false));
        let mut source = BackgroundSource::spawn("test", stop, || {
            let input = "{\"type\":\"ui\",\"event\":\"toggle_help\"}\n{\"type\":\"ui\",\"event\":\"exit\"}\n";
            Ok(JsonLinesSource::new(Cursor::new(input.as_bytes().to_vec()), "test"))
        })
        .unwrap();

        assert_eq!(source.poll().unwrap(), Some(SourceEvent::Ui(UiEvent::ToggleHelp)));
        assert_eq!(source.poll().unwrap(), Some(SourceEvent::Ui(UiEvent::Exit)));
        assert_eq!(source.poll().unwrap(), None);
        assert_eq!(source.describe(), "test");
    }

    #[test]
    fn test_open_error_reaches_caller() {
        let stop = Arc::new(AtomicBool::new(false));
        let mut source = BackgroundSource::spawn("missing", stop, || {
            JsonLinesSource::open(std::path::Path::new("/nonexistent/landmarks.jsonl"))
        })
        .unwrap();

        assert!(matches!(source.poll(), Err(PoseError::SourceUnavailable(_))));
    }

    #[test]
    fn test_stop_unblocks_waiting_poll() {
        let (_hold, rx) = mpsc::channel::<()>();
        let stop = Arc::new(AtomicBool::new(false));
        let mut source = BackgroundSource::spawn("stalled", stop.clone(), move || Ok(Stalled(rx))).unwrap();

        let setter = stop.clone();
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(100));
            setter.store(true, Ordering::SeqCst);
        });

        let started = Instant::now();
        assert_eq!(source.poll().unwrap(), None);
        assert!(started.elapsed() < Duration::from_secs(5));
    }
}
