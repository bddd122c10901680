//! Lifecycle controller: coordinates a server restart.
//!
//! Stop the log worker, restart the container, wait a fixed grace interval,
//! reattach. If the container is missing the sequence aborts and the
//! supervisor stays Idle rather than tailing a nonexistent target.

use std::sync::Arc;
use std::time::Duration;

use bridge_core::{BridgeError, Result};
use tracing::{error, info, warn};

use crate::control::ServerControl;
use crate::supervisor::StreamSupervisor;

pub struct LifecycleController {
    supervisor: Arc<StreamSupervisor>,
    control: Arc<dyn ServerControl>,
    grace: Duration,
}

impl LifecycleController {
    pub fn new(
        supervisor: Arc<StreamSupervisor>,
        control: Arc<dyn ServerControl>,
        grace: Duration,
    ) -> Self {
        Self {
            supervisor,
            control,
            grace,
        }
    }

    /// Restarts the server and reattaches the log stream. Returns the
    /// post-restart container status string.
    pub async fn restart(&self) -> Result<String> {
        info!("Restart requested, stopping log stream worker");
        self.supervisor.stop().await;

        if let Err(e) = self.control.restart().await {
            error!(error = %e, "Server restart failed");
            return Err(BridgeError::Control(e));
        }

        info!(
            grace_secs = self.grace.as_secs(),
            "Server restarting, waiting before reattaching"
        );
        tokio::time::sleep(self.grace).await;

        let status = match self.control.status().await {
            Ok(status) => status,
            Err(e) => {
                warn!(error = %e, "Could not read container status after restart");
                "unknown".to_string()
            }
        };

        self.supervisor.start().await;
        Ok(status)
    }
}
