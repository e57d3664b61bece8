// Monitoring state machine
//
// STOPPED (no work id) -> start() -> ACTIVE (work id held) -> poll()
// stays ACTIVE -> stop() -> STOPPED. A poll that trips Error::Monitor
// means the server-side work item died; that is recovered here by a
// transparent stop + start, never surfaced to callers.

use tracing::{debug, warn};

use crate::error::Error;
use crate::session::{Session, WorkId};

/// Per-device polling handle layered on [`Session`].
///
/// Callers drive the poll loop themselves (poll, sleep, repeat) -- the
/// library imposes no interval. Stop the monitor on every exit path:
/// an active monitor that is merely dropped leaks its server-side work
/// item (async drop cannot issue the stop RPC).
#[derive(Debug)]
pub struct Monitor {
    session: Session,
    device_id: String,
    work_id: Option<WorkId>,
}

impl Monitor {
    pub fn new(session: Session, device_id: impl Into<String>) -> Self {
        Self {
            session,
            device_id: device_id.into(),
            work_id: None,
        }
    }

    pub fn device_id(&self) -> &str {
        &self.device_id
    }

    /// The active work id, if monitoring is running.
    pub fn work_id(&self) -> Option<&WorkId> {
        self.work_id.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.work_id.is_some()
    }

    /// Register a monitoring work item on the server.
    ///
    /// At most one work item may be live per (session, device) pair, so
    /// starting an already-active monitor is an error rather than a
    /// silent second registration.
    pub async fn start(&mut self) -> Result<(), Error> {
        if self.work_id.is_some() {
            return Err(Error::MonitorActive {
                device_id: self.device_id.clone(),
            });
        }

        let work_id = self.session.start_monitor(&self.device_id).await?;
        debug!(device = %self.device_id, work = %work_id, "monitor started");
        self.work_id = Some(work_id);
        Ok(())
    }

    /// Deregister the work item. No-op when already stopped.
    pub async fn stop(&mut self) -> Result<(), Error> {
        let Some(work_id) = self.work_id.take() else {
            return Ok(());
        };
        debug!(device = %self.device_id, work = %work_id, "monitor stopped");
        self.session.stop_monitor(&self.device_id, &work_id).await
    }

    /// Poll for new monitor data.
    ///
    /// `Ok(None)` when the monitor is stopped, when the server has
    /// nothing new, or when a dead work item was just replaced (the
    /// fresh work item cannot have produced data yet). A dead work item
    /// ([`Error::Monitor`]) is recovered transparently by one stop +
    /// start pair; every other error propagates.
    pub async fn poll(&mut self) -> Result<Option<Vec<u8>>, Error> {
        let Some(ref work_id) = self.work_id else {
            return Ok(None);
        };

        match self.session.poll_monitor(&self.device_id, work_id).await {
            Ok(data) => Ok(data),
            Err(Error::Monitor { code, .. }) => {
                warn!(device = %self.device_id, code, "monitoring work item died -- restarting");
                self.stop().await?;
                self.start().await?;
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}

impl Drop for Monitor {
    fn drop(&mut self) {
        if let Some(ref work_id) = self.work_id {
            warn!(
                device = %self.device_id,
                work = %work_id,
                "monitor dropped while active -- the server-side work item leaks; call stop() on every exit path"
            );
        }
    }
}
