//! Server process/container control.
//!
//! [`ServerControl`] is the opaque external capability the bridge calls into:
//! restart, status, and a follow-mode log stream. [`DockerControl`] implements
//! it against the local Docker daemon via bollard.

use std::pin::Pin;

use async_trait::async_trait;
use bollard::container::{InspectContainerOptions, LogsOptions, RestartContainerOptions};
use bollard::Docker;
use bridge_core::ControlError;
use futures_util::{Stream, StreamExt};

/// Blocks of decoded log output. One item may carry several lines; consumers
/// split and trim.
pub type LogStream = Pin<Box<dyn Stream<Item = Result<String, ControlError>> + Send>>;

/// Control surface for the game-server container.
#[async_trait]
pub trait ServerControl: Send + Sync {
    /// Restarts the container. A missing container maps to
    /// [`ControlError::TargetMissing`].
    async fn restart(&self) -> Result<(), ControlError>;

    /// Returns the container's state string (e.g. "running").
    async fn status(&self) -> Result<String, ControlError>;

    /// Opens a follow-mode stream over stdout+stderr starting at `since`
    /// (unix seconds). No historical replay: only output produced after
    /// `since` is delivered, so reattaching never duplicates events.
    async fn open_log_stream(&self, since: i64) -> Result<LogStream, ControlError>;
}

/// Bollard-backed [`ServerControl`] for a named container on the local daemon.
pub struct DockerControl {
    docker: Docker,
    container_name: String,
}

impl DockerControl {
    pub fn new(container_name: String) -> Result<Self, ControlError> {
        let docker =
            Docker::connect_with_local_defaults().map_err(|e| ControlError::Api(e.to_string()))?;
        Ok(Self {
            docker,
            container_name,
        })
    }

    fn map_error(&self, e: bollard::errors::Error) -> ControlError {
        match e {
            bollard::errors::Error::DockerResponseServerError {
                status_code: 404, ..
            } => ControlError::TargetMissing(self.container_name.clone()),
            other => ControlError::Api(other.to_string()),
        }
    }
}

#[async_trait]
impl ServerControl for DockerControl {
    async fn restart(&self) -> Result<(), ControlError> {
        self.docker
            .restart_container(&self.container_name, None::<RestartContainerOptions>)
            .await
            .map_err(|e| self.map_error(e))
    }

    async fn status(&self) -> Result<String, ControlError> {
        let inspect = self
            .docker
            .inspect_container(&self.container_name, None::<InspectContainerOptions>)
            .await
            .map_err(|e| self.map_error(e))?;

        Ok(inspect
            .state
            .and_then(|state| state.status)
            .map(|status| status.to_string())
            .unwrap_or_else(|| "unknown".to_string()))
    }

    async fn open_log_stream(&self, since: i64) -> Result<LogStream, ControlError> {
        // logs() only fails once polled; check the target exists up front so
        // a bad container name surfaces as TargetMissing immediately.
        self.docker
            .inspect_container(&self.container_name, None::<InspectContainerOptions>)
            .await
            .map_err(|e| self.map_error(e))?;

        let options = LogsOptions::<String> {
            follow: true,
            stdout: true,
            stderr: true,
            since,
            tail: "all".to_string(),
            ..Default::default()
        };

        let stream = self
            .docker
            .logs(&self.container_name, Some(options))
            .map(|chunk| match chunk {
                Ok(output) => Ok(output.to_string()),
                Err(e) => Err(ControlError::Api(e.to_string())),
            });

        Ok(Box::pin(stream))
    }
}
