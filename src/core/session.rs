use crate::core::gesture_controller::{FrameReport, GestureController};
use crate::core::mode_controller::LoopControl;
use crate::models::pose::PoseResult;
use crate::platform::input::InputSink;
use crate::platform::pose::{LandmarkSource, SourceEvent};
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, error, info};

// ==============================================================================
// Session Types
// ==============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    EndOfStream,
    ExitRequested,
    Interrupted,
}

impl StopReason {
    pub fn to_string(&self) -> &'static str {
        match self {
            StopReason::EndOfStream => "end_of_stream",
            StopReason::ExitRequested => "exit_requested",
            StopReason::Interrupted => "interrupted",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SessionCounts {
    pub frames: u64,
    pub detections: u64,
    pub ui_events: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SessionSummary {
    pub reason: StopReason,
    #[serde(flatten)]
    pub counts: SessionCounts,
    /// Lines still held when the loop stopped
    pub released_on_exit: usize,
}

// ==============================================================================
// Frame Loop
// ==============================================================================

/// Drive `controller` from `source` until the stream ends, an exit event
/// arrives, `stop` is set or the source fails.
///
/// Every held line is released before this returns, including on error.
pub fn run_session<S, L, F>(
    controller: &mut GestureController<S>,
    source: &mut L,
    stop: &AtomicBool,
    mut on_report: F,
) -> PoseResult<SessionSummary>
where
    S: InputSink,
    L: LandmarkSource,
    F: FnMut(&FrameReport),
{
    info!(
        "Session started: source={}, sink={}, mode={}",
        source.describe(),
        controller.sink().name(),
        controller.mode().as_str()
    );

    let mut counts = SessionCounts::default();
    let outcome = drive(controller, source, stop, &mut counts, &mut on_report);
    let released_on_exit = controller.release_all();

    match outcome {
        Ok(reason) => {
            info!(
                "Session ended ({}): {} frames, {} detections, {} UI events",
                reason.to_string(),
                counts.frames,
                counts.detections,
                counts.ui_events
            );
            Ok(SessionSummary {
                reason,
                counts,
                released_on_exit,
            })
        }
        Err(e) => {
            error!("Landmark source failed after {} frames: {}", counts.frames, e);
            Err(e)
        }
    }
}

fn drive<S, L, F>(
    controller: &mut GestureController<S>,
    source: &mut L,
    stop: &AtomicBool,
    counts: &mut SessionCounts,
    on_report: &mut F,
) -> PoseResult<StopReason>
where
    S: InputSink,
    L: LandmarkSource,
    F: FnMut(&FrameReport),
{
    loop {
        if stop.load(Ordering::SeqCst) {
            return Ok(StopReason::Interrupted);
        }

        let event = match source.poll()? {
            Some(event) => event,
            // A source can end early because it saw the stop request
            None if stop.load(Ordering::SeqCst) => return Ok(StopReason::Interrupted),
            None => return Ok(StopReason::EndOfStream),
        };

        match event {
            SourceEvent::Detection(detection) => {
                counts.frames += 1;
                if detection.is_some() {
                    counts.detections += 1;
                }
                let report = controller.process_frame(detection.as_ref());
                on_report(&report);
            }
            SourceEvent::Ui(ui_event) => {
                counts.ui_events += 1;
                debug!("UI event: {:?}", ui_event);
                if controller.handle_ui_event(ui_event) == LoopControl::Exit {
                    return Ok(StopReason::ExitRequested);
                }
            }
        }
    }
}
