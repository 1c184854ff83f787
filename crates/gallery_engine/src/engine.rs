use std::collections::HashMap;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use gallery_logging::{gallery_debug, gallery_warn};

use crate::pipeline::GalleryPipeline;
use crate::probe::ChannelProgressSink;
use crate::timer::TimerHandle;
use crate::{EngineEvent, TimerId};

enum EngineCommand {
    Load,
    StartTimer {
        timer_id: TimerId,
        delay: Duration,
        repeat: bool,
    },
    CancelTimer {
        timer_id: TimerId,
    },
}

/// Runs the pipeline and timers on a background tokio runtime.
///
/// Results come back as [`EngineEvent`]s. Starting a timer under an id that is
/// already scheduled replaces the old timer.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(pipeline: GalleryPipeline) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let pipeline = Arc::new(pipeline);

        thread::spawn(move || {
            let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");
            let mut timers: HashMap<TimerId, TimerHandle> = HashMap::new();
            while let Ok(command) = cmd_rx.recv() {
                match command {
                    EngineCommand::Load => {
                        let pipeline = pipeline.clone();
                        let event_tx = event_tx.clone();
                        runtime.spawn(async move {
                            run_load(pipeline.as_ref(), event_tx).await;
                        });
                    }
                    EngineCommand::StartTimer {
                        timer_id,
                        delay,
                        repeat,
                    } => {
                        let event_tx = event_tx.clone();
                        let fire = move || {
                            let _ = event_tx.send(EngineEvent::TimerFired { timer_id });
                        };
                        let handle = if repeat {
                            TimerHandle::repeating(runtime.handle(), delay, fire)
                        } else {
                            TimerHandle::once(runtime.handle(), delay, fire)
                        };
                        gallery_debug!("timer {} scheduled in {:?}", timer_id, delay);
                        // Dropping the previous handle cancels it.
                        timers.insert(timer_id, handle);
                    }
                    EngineCommand::CancelTimer { timer_id } => {
                        timers.remove(&timer_id);
                    }
                }
            }
        });

        Self { cmd_tx, event_rx }
    }

    pub fn load(&self) {
        let _ = self.cmd_tx.send(EngineCommand::Load);
    }

    pub fn start_timer(&self, timer_id: TimerId, delay: Duration, repeat: bool) {
        let _ = self.cmd_tx.send(EngineCommand::StartTimer {
            timer_id,
            delay,
            repeat,
        });
    }

    pub fn cancel_timer(&self, timer_id: TimerId) {
        let _ = self.cmd_tx.send(EngineCommand::CancelTimer { timer_id });
    }

    /// Fails with `Disconnected` once the engine thread is gone.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<EngineEvent, mpsc::RecvTimeoutError> {
        self.event_rx.recv_timeout(timeout)
    }
}

async fn run_load(pipeline: &GalleryPipeline, event_tx: mpsc::Sender<EngineEvent>) {
    let sink = ChannelProgressSink::new(event_tx.clone());
    let event = match pipeline.run(&sink).await {
        Ok(output) => EngineEvent::ProbesFinished {
            verified: output.report.verified(),
        },
        Err(err) => {
            gallery_warn!("feed load failed: {}", err);
            EngineEvent::LoadFailed(err)
        }
    };
    let _ = event_tx.send(event);
}
