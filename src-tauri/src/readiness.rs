//! Proxy readiness polling.
//!
//! The checker makes at most `timeout_secs` connect attempts and gives each
//! failed attempt a one-second slot before the next one (or before giving
//! up). A single attempt has no deadline of its own: a connect that hangs
//! keeps the checker waiting past the nominal budget.

use std::{future::Future, time::Duration};

use tokio::net::TcpStream;

use crate::READINESS_POLL_INTERVAL;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ReadinessTarget {
    pub(crate) address: String,
    pub(crate) port: u16,
    pub(crate) timeout_secs: u32,
}

impl ReadinessTarget {
    pub(crate) fn describe(&self) -> String {
        format!("{}:{}", self.address, self.port)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ReadinessOutcome {
    Ready { attempts: u32 },
    TimedOut { attempts: u32 },
}

impl ReadinessOutcome {
    pub(crate) fn is_ready(self) -> bool {
        matches!(self, Self::Ready { .. })
    }

    pub(crate) fn attempts(self) -> u32 {
        match self {
            Self::Ready { attempts } | Self::TimedOut { attempts } => attempts,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ReadinessPhase {
    Idle,
    Polling { attempt: u32 },
    Finished(ReadinessOutcome),
}

/// One connect attempt against the target.
pub(crate) trait ConnectProbe {
    fn probe(
        &mut self,
        target: &ReadinessTarget,
    ) -> impl Future<Output = Result<(), String>> + Send;
}

/// Something shown to the user while polling; consumed when polling ends so
/// it can only be dismissed once.
pub(crate) trait WaitIndicator {
    fn dismiss(self);
}

impl<I: WaitIndicator> WaitIndicator for Option<I> {
    fn dismiss(self) {
        if let Some(indicator) = self {
            indicator.dismiss();
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct TcpProbe;

impl ConnectProbe for TcpProbe {
    async fn probe(&mut self, target: &ReadinessTarget) -> Result<(), String> {
        let stream = TcpStream::connect((target.address.as_str(), target.port))
            .await
            .map_err(|error| format!("connect to {} failed: {error}", target.describe()))?;
        drop(stream);
        Ok(())
    }
}

#[derive(Debug)]
pub(crate) struct ReadinessChecker {
    target: ReadinessTarget,
    interval: Duration,
    phase: ReadinessPhase,
}

impl ReadinessChecker {
    pub(crate) fn new(target: ReadinessTarget) -> Self {
        Self {
            target,
            interval: READINESS_POLL_INTERVAL,
            phase: ReadinessPhase::Idle,
        }
    }

    #[cfg(test)]
    pub(crate) fn phase(&self) -> ReadinessPhase {
        self.phase
    }

    pub(crate) fn target(&self) -> &ReadinessTarget {
        &self.target
    }

    /// Polls until the first successful connect or until the attempt budget
    /// is spent, then dismisses `indicator`.
    ///
    /// A finished checker never polls again; it returns its recorded outcome.
    pub(crate) async fn run<P, I, F>(&mut self, probe: &mut P, indicator: I, log: F) -> ReadinessOutcome
    where
        P: ConnectProbe,
        I: WaitIndicator,
        F: Fn(&str),
    {
        if let ReadinessPhase::Finished(outcome) = self.phase {
            indicator.dismiss();
            return outcome;
        }

        let max_attempts = self.target.timeout_secs.max(1);
        let mut outcome = ReadinessOutcome::TimedOut {
            attempts: max_attempts,
        };

        for attempt in 1..=max_attempts {
            self.phase = ReadinessPhase::Polling { attempt };
            match probe.probe(&self.target).await {
                Ok(()) => {
                    log(&format!(
                        "proxy ready at {} after {attempt} attempt(s)",
                        self.target.describe()
                    ));
                    outcome = ReadinessOutcome::Ready { attempts: attempt };
                    break;
                }
                Err(error) => {
                    log(&format!(
                        "proxy not ready ({attempt}/{max_attempts}): {error}"
                    ));
                    tokio::time::sleep(self.interval).await;
                }
            }
        }

        self.phase = ReadinessPhase::Finished(outcome);
        indicator.dismiss();
        outcome
    }
}

#[cfg(test)]
mod tests {
    use std::{
        collections::VecDeque,
        sync::{
            atomic::{AtomicUsize, Ordering},
            Arc, Mutex,
        },
    };

    use tokio::time::Instant;

    use super::*;

    struct ScriptedProbe {
        results: VecDeque<Result<(), String>>,
        calls: Arc<Mutex<Vec<Instant>>>,
        hang: Option<Duration>,
    }

    impl ScriptedProbe {
        fn failing() -> Self {
            Self {
                results: VecDeque::new(),
                calls: Arc::new(Mutex::new(Vec::new())),
                hang: None,
            }
        }

        fn ready_on(attempt: usize) -> Self {
            let mut results: VecDeque<_> = (1..attempt)
                .map(|_| Err("connection refused".to_string()))
                .collect();
            results.push_back(Ok(()));
            Self {
                results,
                ..Self::failing()
            }
        }

        fn call_count(&self) -> usize {
            self.calls.lock().expect("calls lock").len()
        }
    }

    impl ConnectProbe for ScriptedProbe {
        async fn probe(&mut self, _target: &ReadinessTarget) -> Result<(), String> {
            self.calls.lock().expect("calls lock").push(Instant::now());
            if let Some(hang) = self.hang {
                tokio::time::sleep(hang).await;
            }
            self.results
                .pop_front()
                .unwrap_or_else(|| Err("connection refused".to_string()))
        }
    }

    #[derive(Clone, Default)]
    struct CountingIndicator {
        dismissed: Arc<AtomicUsize>,
    }

    impl WaitIndicator for CountingIndicator {
        fn dismiss(self) {
            self.dismissed.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn target(port: u16, timeout_secs: u32) -> ReadinessTarget {
        ReadinessTarget {
            address: "127.0.0.1".to_string(),
            port,
            timeout_secs,
        }
    }

    fn free_port() -> u16 {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
        listener.local_addr().expect("local addr").port()
    }

    #[tokio::test(start_paused = true)]
    async fn times_out_after_exactly_timeout_attempts() {
        let mut checker = ReadinessChecker::new(target(9, 5));
        let mut probe = ScriptedProbe::failing();
        let indicator = CountingIndicator::default();
        let started = Instant::now();

        let outcome = checker.run(&mut probe, indicator.clone(), |_| {}).await;

        assert_eq!(outcome, ReadinessOutcome::TimedOut { attempts: 5 });
        assert_eq!(probe.call_count(), 5);
        assert_eq!(started.elapsed(), Duration::from_secs(5));
        assert_eq!(indicator.dismissed.load(Ordering::SeqCst), 1);
        assert_eq!(checker.phase(), ReadinessPhase::Finished(outcome));
    }

    #[tokio::test(start_paused = true)]
    async fn failed_attempts_are_spaced_one_second_apart() {
        let mut checker = ReadinessChecker::new(target(9, 4));
        let mut probe = ScriptedProbe::failing();

        checker.run(&mut probe, None::<CountingIndicator>, |_| {}).await;

        let calls = probe.calls.lock().expect("calls lock").clone();
        assert_eq!(calls.len(), 4);
        for pair in calls.windows(2) {
            assert!(pair[1] - pair[0] >= Duration::from_secs(1));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn stops_polling_on_first_success() {
        let mut checker = ReadinessChecker::new(target(9, 10));
        let mut probe = ScriptedProbe::ready_on(3);
        let indicator = CountingIndicator::default();
        let started = Instant::now();

        let outcome = checker.run(&mut probe, indicator.clone(), |_| {}).await;

        assert_eq!(outcome, ReadinessOutcome::Ready { attempts: 3 });
        assert_eq!(probe.call_count(), 3);
        assert_eq!(started.elapsed(), Duration::from_secs(2));
        assert_eq!(indicator.dismissed.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn finished_checker_does_not_poll_again() {
        let mut checker = ReadinessChecker::new(target(9, 2));
        let mut probe = ScriptedProbe::failing();
        let first = checker.run(&mut probe, None::<CountingIndicator>, |_| {}).await;

        let indicator = CountingIndicator::default();
        let second = checker.run(&mut probe, indicator.clone(), |_| {}).await;

        assert_eq!(first, second);
        assert_eq!(probe.call_count(), 2);
        assert_eq!(indicator.dismissed.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn zero_timeout_still_makes_one_attempt() {
        let mut checker = ReadinessChecker::new(target(9, 0));
        let mut probe = ScriptedProbe::failing();

        let outcome = checker.run(&mut probe, None::<CountingIndicator>, |_| {}).await;

        assert_eq!(outcome, ReadinessOutcome::TimedOut { attempts: 1 });
    }

    // A connect that hangs is not cut short: the checker overruns its budget.
    #[tokio::test(start_paused = true)]
    async fn hanging_connect_is_not_bounded_by_the_timeout_budget() {
        let mut checker = ReadinessChecker::new(target(9, 2));
        let mut probe = ScriptedProbe {
            hang: Some(Duration::from_secs(30)),
            ..ScriptedProbe::failing()
        };
        let started = Instant::now();

        let outcome = checker.run(&mut probe, None::<CountingIndicator>, |_| {}).await;

        assert_eq!(outcome, ReadinessOutcome::TimedOut { attempts: 2 });
        assert!(started.elapsed() >= Duration::from_secs(62));
    }

    #[tokio::test]
    async fn tcp_probe_times_out_without_listener() {
        let port = free_port();
        let mut checker = ReadinessChecker::new(target(port, 2));
        let indicator = CountingIndicator::default();
        let started = std::time::Instant::now();

        let outcome = checker.run(&mut TcpProbe, indicator.clone(), |_| {}).await;

        assert_eq!(outcome, ReadinessOutcome::TimedOut { attempts: 2 });
        assert!(started.elapsed() >= Duration::from_secs(2));
        assert!(started.elapsed() < Duration::from_secs(4));
        assert_eq!(indicator.dismissed.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn tcp_probe_is_ready_when_listener_accepts() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind listener");
        let port = listener.local_addr().expect("local addr").port();
        let mut checker = ReadinessChecker::new(target(port, 5));

        let outcome = checker.run(&mut TcpProbe, None::<CountingIndicator>, |_| {}).await;

        assert_eq!(outcome, ReadinessOutcome::Ready { attempts: 1 });
    }

    #[tokio::test]
    async fn tcp_probe_picks_up_a_listener_that_starts_late() {
        let port = free_port();
        let server = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(1_500)).await;
            let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
                .await
                .expect("bind late listener");
            let _ = listener.accept().await;
        });
        let mut checker = ReadinessChecker::new(target(port, 6));

        let outcome = checker.run(&mut TcpProbe, None::<CountingIndicator>, |_| {}).await;

        assert!(outcome.is_ready());
        assert!(outcome.attempts() <= 3);
        server.abort();
    }
}
