//! Supervision of the daemon's long-running units.
//!
//! Each unit (the gRPC listener, the HTTP gateway) runs as its own task and
//! reports how it ended through its `Result`. The [`Supervisor`] decides per
//! failure whether the process goes down or the failure is only logged.
//! When supervision ends, the remaining units are aborted without draining.

use std::fmt;
use std::future::Future;

use tokio::task::JoinSet;
use tracing::{error, info, warn};

use crate::{GreeterError, Result};

/// A long-running unit of the daemon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Unit {
    RpcListener,
    HttpGateway,
}

impl Unit {
    pub fn name(self) -> &'static str {
        match self {
            Unit::RpcListener => "gRPC listener",
            Unit::HttpGateway => "HTTP gateway",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What to do when a unit fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Stop supervising and return the failure.
    Exit,
    /// Log the failure and keep the other units running.
    LogOnly,
}

type PolicyFn = Box<dyn Fn(Unit, &GreeterError) -> FailurePolicy + Send + Sync>;

/// Runs units concurrently and applies a [`FailurePolicy`] to each failure.
pub struct Supervisor {
    units: JoinSet<(Unit, Result<()>)>,
    policy: PolicyFn,
}

impl Default for Supervisor {
    fn default() -> Self {
        Self::new()
    }
}

impl Supervisor {
    /// A supervisor that exits on every failure.
    pub fn new() -> Self {
        Self {
            units: JoinSet::new(),
            policy: Box::new(|_, _| FailurePolicy::Exit),
        }
    }

    /// Replace the failure policy.
    pub fn with_policy<F>(mut self, policy: F) -> Self
    where
        F: Fn(Unit, &GreeterError) -> FailurePolicy + Send + Sync + 'static,
    {
        self.policy = Box::new(policy);
        self
    }

    /// Start a unit.
    pub fn spawn<F>(&mut self, unit: Unit, future: F)
    where
        F: Future<Output = Result<()>> + Send + 'static,
    {
        info!(%unit, "starting unit");
        self.units.spawn(async move { (unit, future.await) });
    }

    /// Number of units still running.
    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Wait for units to finish.
    ///
    /// Returns the first failure whose policy is [`FailurePolicy::Exit`], or
    /// `Ok(())` once every unit has stopped.
    pub async fn run(mut self) -> Result<()> {
        while let Some(joined) = self.units.join_next().await {
            let (unit, result) = joined
                .map_err(|e| GreeterError::Serve(format!("supervised unit did not finish: {e}")))?;

            let Err(err) = result else {
                info!(%unit, "unit stopped");
                continue;
            };

            match (self.policy)(unit, &err) {
                FailurePolicy::Exit => {
                    error!(%unit, error = %err, "unit failed, shutting down");
                    return Err(GreeterError::UnitFailed {
                        unit: unit.name(),
                        source: Box::new(err),
                    });
                }
                FailurePolicy::LogOnly => {
                    warn!(%unit, error = %err, "unit failed, continuing");
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::sync::oneshot;

    use super::*;

    async fn explode() -> Result<()> {
        panic!("unit panicked")
    }

    #[tokio::test]
    async fn failure_exits_by_default() {
        let mut supervisor = Supervisor::new();
        supervisor.spawn(Unit::HttpGateway, async {
            Err(GreeterError::Serve("boom".to_string()))
        });
        supervisor.spawn(Unit::RpcListener, std::future::pending());

        let err = supervisor.run().await.unwrap_err();
        match err {
            GreeterError::UnitFailed { unit, source } => {
                assert_eq!(unit, "HTTP gateway");
                assert!(matches!(*source, GreeterError::Serve(_)));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn remaining_units_are_aborted() {
        let (tx, rx) = oneshot::channel::<()>();
        let mut supervisor = Supervisor::new();
        supervisor.spawn(Unit::RpcListener, async move {
            let _tx = tx;
            std::future::pending::<()>().await;
            Ok(())
        });
        supervisor.spawn(Unit::HttpGateway, async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            Err(GreeterError::Serve("boom".to_string()))
        });

        assert!(supervisor.run().await.is_err());
        // The pending unit's sender is dropped once its task is aborted.
        assert!(rx.await.is_err());
    }

    #[tokio::test]
    async fn log_only_keeps_other_units_running() {
        let mut supervisor = Supervisor::new().with_policy(|unit, _| match unit {
            Unit::HttpGateway => FailurePolicy::LogOnly,
            Unit::RpcListener => FailurePolicy::Exit,
        });
        supervisor.spawn(Unit::HttpGateway, async {
            Err(GreeterError::Serve("gateway down".to_string()))
        });
        supervisor.spawn(Unit::RpcListener, async {
            tokio::time::sleep(Duration::from_millis(20)).await;
            Err(GreeterError::Serve("listener down".to_string()))
        });

        let err = supervisor.run().await.unwrap_err();
        assert!(err.to_string().starts_with("gRPC listener failed"));
    }

    #[tokio::test]
    async fn policy_sees_failure_kind() {
        let mut supervisor = Supervisor::new().with_policy(|_, err| {
            if err.is_startup() {
                FailurePolicy::Exit
            } else {
                FailurePolicy::LogOnly
            }
        });
        supervisor.spawn(Unit::HttpGateway, async {
            Err(GreeterError::Serve("transient".to_string()))
        });

        assert!(supervisor.run().await.is_ok());
    }

    #[tokio::test]
    async fn clean_stop_is_ok() {
        let mut supervisor = Supervisor::new();
        supervisor.spawn(Unit::RpcListener, async { Ok(()) });
        assert_eq!(supervisor.len(), 1);
        assert!(supervisor.run().await.is_ok());
    }

    #[tokio::test]
    async fn panicking_unit_is_reported() {
        let mut supervisor = Supervisor::new();
        supervisor.spawn(Unit::RpcListener, explode());
        assert!(matches!(
            supervisor.run().await,
            Err(GreeterError::Serve(_))
        ));
    }
}
