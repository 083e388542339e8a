//! Tests for the retrying executor.

use notecraft_error::{
    NotecraftErrorKind, NotecraftResult, ProviderError, ProviderErrorKind,
};
use notecraft_retry::{RetryPolicy, RetrySettings};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

fn fast_policy() -> RetryPolicy {
    RetryPolicy::new(3, Duration::from_millis(1), Duration::from_millis(5))
}

fn unavailable() -> ProviderError {
    ProviderError::new(ProviderErrorKind::Http {
        status_code: 503,
        message: "overloaded".to_string(),
    })
}

/// Fails with 503 `failures` times, then answers "ok".
async fn flaky(calls: &AtomicUsize, failures: usize) -> NotecraftResult<&'static str> {
    let n = calls.fetch_add(1, Ordering::SeqCst);
    if n < failures {
        Err(unavailable().into())
    } else {
        Ok("ok")
    }
}

#[tokio::test]
async fn test_succeeds_on_third_attempt() -> anyhow::Result<()> {
    let calls = AtomicUsize::new(0);
    let value = fast_policy().execute("flaky", || flaky(&calls, 2)).await?;

    assert_eq!(value, "ok");
    assert_eq!(calls.load(Ordering::SeqCst), 3);
    Ok(())
}

#[tokio::test]
async fn test_gives_up_after_three_attempts() {
    let calls = AtomicUsize::new(0);
    let result = fast_policy().execute("flaky", || flaky(&calls, 4)).await;

    assert_eq!(calls.load(Ordering::SeqCst), 3);
    let err = result.expect_err("four failures exceed the attempt cap");
    match err.kind() {
        NotecraftErrorKind::Provider(p) => match &p.kind {
            ProviderErrorKind::RetriesExhausted { attempts, last } => {
                assert_eq!(*attempts, 3);
                assert!(last.contains("503"));
                assert!(p.is_terminal());
            }
            other => panic!("expected RetriesExhausted, got {other}"),
        },
        other => panic!("expected provider error, got {other}"),
    }
}

#[tokio::test]
async fn test_permanent_error_is_not_retried() {
    let calls = AtomicUsize::new(0);
    let result: NotecraftResult<()> = fast_policy()
        .execute("unauthorized", || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(ProviderError::new(ProviderErrorKind::Http {
                status_code: 401,
                message: "bad key".to_string(),
            })
            .into())
        })
        .await;

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    let err = result.expect_err("401 is terminal");
    assert!(format!("{err}").contains("401"));
}

#[test]
fn test_default_delays_grow_between_bounds() {
    let policy = RetryPolicy::default();
    assert_eq!(policy.max_attempts(), 3);
    assert_eq!(
        policy.delays(),
        vec![Duration::from_secs(4), Duration::from_secs(8)]
    );

    let long = RetryPolicy::new(5, Duration::from_secs(4), Duration::from_secs(10));
    let delays = long.delays();
    assert_eq!(delays.len(), 4);
    assert!(delays.iter().all(|d| *d >= Duration::from_secs(4)));
    assert!(delays.iter().all(|d| *d <= Duration::from_secs(10)));
    assert_eq!(delays[3], Duration::from_secs(10));
}

#[test]
fn test_policy_from_settings() {
    let settings = RetrySettings {
        min_delay_ms: 10,
        max_delay_ms: 30,
        jitter: false,
    };
    let policy = RetryPolicy::from_settings(&settings, 4);
    assert_eq!(policy.max_attempts(), 4);
    assert_eq!(
        policy.delays(),
        vec![
            Duration::from_millis(10),
            Duration::from_millis(20),
            Duration::from_millis(30)
        ]
    );
    assert_eq!(RetryPolicy::new(0, Duration::ZERO, Duration::ZERO).max_attempts(), 1);
}
