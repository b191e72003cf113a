use std::time::Duration;

use crate::{READY_INITIAL_DELAY, READY_MAX_ATTEMPTS, READY_POLL_INTERVAL};

/// Result of a single readiness probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ProbeOutcome {
    /// The server answered with a success status (200 or 302).
    Ready,
    /// The server answered, but not with a success status.
    HttpStatus(u16),
    /// The request failed outright: connection refused, timeout, bad URL.
    Unreachable,
}

/// Terminal result of one polling run. Exactly one of these is produced per
/// run, never both a success and a failure, never neither.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PollOutcome {
    Ready { attempts: u32 },
    /// The retry budget ran out and the last probe got an HTTP answer.
    ServerErroring { attempts: u32 },
    /// The retry budget ran out without ever reaching the server on the
    /// final probe.
    NeverReachable { attempts: u32 },
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct PollPolicy {
    pub(crate) max_attempts: u32,
    pub(crate) initial_delay: Duration,
    pub(crate) interval: Duration,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            max_attempts: READY_MAX_ATTEMPTS,
            initial_delay: READY_INITIAL_DELAY,
            interval: READY_POLL_INTERVAL,
        }
    }
}

/// Runs the bounded retry loop. Attempts are strictly sequential; `sleep`
/// runs before the first probe and between consecutive probes. The probe and
/// sleep are injected so tests can drive the loop without sockets or timers.
pub(crate) fn poll_until_ready<P, S>(
    policy: PollPolicy,
    mut probe: P,
    mut sleep: S,
) -> PollOutcome
where
    P: FnMut(u32) -> ProbeOutcome,
    S: FnMut(Duration),
{
    sleep(policy.initial_delay);

    let mut attempts = 0;
    let mut last_outcome = ProbeOutcome::Unreachable;
    while attempts < policy.max_attempts {
        attempts += 1;
        last_outcome = probe(attempts);
        if last_outcome == ProbeOutcome::Ready {
            return PollOutcome::Ready { attempts };
        }
        if attempts < policy.max_attempts {
            sleep(policy.interval);
        }
    }

    match last_outcome {
        ProbeOutcome::HttpStatus(_) => PollOutcome::ServerErroring { attempts },
        _ => PollOutcome::NeverReachable { attempts },
    }
}

/// Issues one HTTP GET against the server's base URL. Redirects are not
/// followed so a 302 counts as ready; the per-request timeout tears the
/// connection down instead of leaking it.
pub(crate) fn http_probe(url: &str, timeout: Duration) -> ProbeOutcome {
    let client = match reqwest::blocking::Client::builder()
        .timeout(timeout)
        .redirect(reqwest::redirect::Policy::none())
        .build()
    {
        Ok(client) => client,
        Err(_) => return ProbeOutcome::Unreachable,
    };

    match client.get(url).send() {
        Ok(response) => {
            let status = response.status().as_u16();
            if status == 200 || status == 302 {
                ProbeOutcome::Ready
            } else {
                ProbeOutcome::HttpStatus(status)
            }
        }
        Err(_) => ProbeOutcome::Unreachable,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_policy(max_attempts: u32) -> PollPolicy {
        PollPolicy {
            max_attempts,
            initial_delay: Duration::from_millis(2_000),
            interval: Duration::from_millis(1_000),
        }
    }

    #[test]
    fn never_reachable_server_gets_exactly_max_attempts_probes() {
        let mut probes = 0;
        let mut sleeps = Vec::new();
        let outcome = poll_until_ready(
            test_policy(60),
            |_| {
                probes += 1;
                ProbeOutcome::Unreachable
            },
            |delay| sleeps.push(delay),
        );

        assert_eq!(outcome, PollOutcome::NeverReachable { attempts: 60 });
        assert_eq!(probes, 60);
        // One initial delay plus an interval between consecutive probes.
        assert_eq!(sleeps.len(), 60);
        assert_eq!(sleeps[0], Duration::from_millis(2_000));
        assert!(sleeps[1..].iter().all(|d| *d == Duration::from_millis(1_000)));
    }

    #[test]
    fn success_on_nth_attempt_stops_probing_immediately() {
        let mut probes = 0;
        let outcome = poll_until_ready(
            test_policy(60),
            |attempt| {
                probes += 1;
                if attempt == 7 {
                    ProbeOutcome::Ready
                } else {
                    ProbeOutcome::Unreachable
                }
            },
            |_| {},
        );

        assert_eq!(outcome, PollOutcome::Ready { attempts: 7 });
        assert_eq!(probes, 7);
    }

    #[test]
    fn success_on_first_attempt_needs_no_interval_sleep() {
        let mut sleeps = 0;
        let outcome = poll_until_ready(
            test_policy(60),
            |_| ProbeOutcome::Ready,
            |_| sleeps += 1,
        );

        assert_eq!(outcome, PollOutcome::Ready { attempts: 1 });
        assert_eq!(sleeps, 1); // only the initial delay
    }

    #[test]
    fn repeated_error_statuses_classify_as_server_erroring() {
        let outcome = poll_until_ready(test_policy(3), |_| ProbeOutcome::HttpStatus(503), |_| {});
        assert_eq!(outcome, PollOutcome::ServerErroring { attempts: 3 });
    }

    #[test]
    fn classification_follows_the_final_probe_kind() {
        // Reachable early on, gone by the end of the budget.
        let outcome = poll_until_ready(
            test_policy(3),
            |attempt| {
                if attempt == 1 {
                    ProbeOutcome::HttpStatus(500)
                } else {
                    ProbeOutcome::Unreachable
                }
            },
            |_| {},
        );
        assert_eq!(outcome, PollOutcome::NeverReachable { attempts: 3 });
    }

    #[test]
    fn zero_attempt_budget_terminates_without_probing() {
        let mut probes = 0;
        let outcome = poll_until_ready(
            test_policy(0),
            |_| {
                probes += 1;
                ProbeOutcome::Ready
            },
            |_| {},
        );
        assert_eq!(outcome, PollOutcome::NeverReachable { attempts: 0 });
        assert_eq!(probes, 0);
    }

    #[test]
    fn http_probe_reports_unreachable_for_a_closed_port() {
        // Port 1 is essentially never listening on a test machine.
        let outcome = http_probe("http://127.0.0.1:1/", Duration::from_millis(200));
        assert_eq!(outcome, ProbeOutcome::Unreachable);
    }
}
