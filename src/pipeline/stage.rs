//! Running blocking stage work on the tokio blocking pool.

use crate::error::{NotetakerError, Result};
use std::time::Duration;
use tracing::warn;

/// Extra time a stage gets beyond its backend's own request timeout.
pub const STAGE_GRACE: Duration = Duration::from_secs(5);

/// Run `work` on the blocking pool, bounded by `timeout`.
///
/// A timeout yields [`NotetakerError::StageTimeout`]; the blocking task keeps
/// running detached and its result is discarded. A panicked or cancelled task
/// yields [`NotetakerError::StageFault`].
pub async fn run_blocking<T, F>(stage: &'static str, timeout: Duration, work: F) -> Result<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    let handle = tokio::task::spawn_blocking(work);
    match tokio::time::timeout(timeout, handle).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(NotetakerError::StageFault {
            stage: stage.to_string(),
            message: e.to_string(),
        }),
        Err(_) => Err(NotetakerError::StageTimeout {
            stage: stage.to_string(),
            timeout,
        }),
    }
}

/// Turn a stage timeout into that stage's error payload.
///
/// Every other error is passed through for the orchestrator to handle.
pub fn degrade_on_timeout<T>(result: Result<T>, failed: impl FnOnce(String) -> T) -> Result<T> {
    match result {
        Err(e @ NotetakerError::StageTimeout { .. }) => {
            warn!(error = %e, "Stage timed out, using error payload");
            Ok(failed(e.to_string()))
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn returns_value_of_completed_work() {
        let value = run_blocking("test", Duration::from_secs(5), || 21 * 2)
            .await
            .unwrap();
        assert_eq!(value, 42);
    }

    #[tokio::test]
    async fn slow_work_times_out() {
        let result = run_blocking("slow stage", Duration::from_millis(20), || {
            std::thread::sleep(Duration::from_millis(300));
        })
        .await;

        match result {
            Err(NotetakerError::StageTimeout { stage, timeout }) => {
                assert_eq!(stage, "slow stage");
                assert_eq!(timeout, Duration::from_millis(20));
            }
            other => panic!("Expected StageTimeout, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn panicking_work_is_a_fault() {
        let result: Result<()> = run_blocking("panicky", Duration::from_secs(5), || {
            panic!("boom");
        })
        .await;

        match result {
            Err(NotetakerError::StageFault { stage, message }) => {
                assert_eq!(stage, "panicky");
                assert!(message.contains("panic"), "unexpected message: {}", message);
            }
            other => panic!("Expected StageFault, got {:?}", other),
        }
    }

    #[test]
    fn degrade_on_timeout_uses_fallback() {
        let timed_out: Result<String> = Err(NotetakerError::StageTimeout {
            stage: "summarization".to_string(),
            timeout: Duration::from_secs(65),
        });
        let value = degrade_on_timeout(timed_out, |msg| format!("failed: {msg}")).unwrap();
        assert_eq!(value, "failed: summarization timed out after 65s");
    }

    #[test]
    fn degrade_on_timeout_passes_other_errors_through() {
        let fault: Result<String> = Err(NotetakerError::StageFault {
            stage: "x".to_string(),
            message: "panicked".to_string(),
        });
        assert!(matches!(
            degrade_on_timeout(fault, |m| m),
            Err(NotetakerError::StageFault { .. })
        ));

        let ok: Result<String> = Ok("fine".to_string());
        assert_eq!(degrade_on_timeout(ok, |m| m).unwrap(), "fine");
    }
}
