use std::io::Write;
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;

const FRAMES: [char; 4] = ['-', '\\', '|', '/'];
const FRAME_INTERVAL: Duration = Duration::from_millis(80);

/// Console spinner drawn while discovery runs (stdout by default). Cosmetic only.
pub struct Spinner {
    stop: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl Spinner {
    pub fn start() -> Self {
        Self::start_on(std::io::stdout)
    }

    /// Draw frames on whatever `writer` hands back each tick.
    pub fn start_on<F, W>(writer: F) -> Self
    where
        F: Fn() -> W + Send + 'static,
        W: Write,
    {
        let (stop, mut stopped) = oneshot::channel::<()>();
        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(FRAME_INTERVAL);
            let mut idx = 0;
            loop {
                tokio::select! {
                    _ = &mut stopped => break,
                    _ = ticker.tick() => {
                        let mut out = writer();
                        let _ = write!(out, "\r{}", FRAMES[idx % FRAMES.len()]);
                        let _ = out.flush();
                        idx = idx.wrapping_add(1);
                    }
                }
            }
        });
        Self { stop, task }
    }

    /// Signal the task and wait until it has drawn its last frame.
    pub async fn stop(self) {
        let _ = self.stop.send(());
        if let Err(e) = self.task.await {
            tracing::debug!(error = %e, "spinner task ended abnormally");
        }
    }
}
