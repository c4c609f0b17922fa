//! Pre-flight host liveness checks.
//!
//! # Responsibilities
//! - Probe host:port with a TCP connect and graceful shutdown
//! - Retry failed probes with exponential backoff
//! - Abort the bootstrap once the attempt budget is spent
//!
//! # Design Decisions
//! - Each attempt owns its socket; it is closed before the next attempt
//! - Any connection error counts as "unavailable", no error classification
//! - Probe is a trait so the retry loop can be driven without sockets

use std::future::Future;
use std::io;
use std::str::FromStr;
use std::time::{Duration, Instant};

use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;

use crate::config::LivenessConfig;
use crate::resilience::Backoff;

const DEFAULT_PORT: u16 = 80;

/// Host liveness failures.
#[derive(Debug, Error)]
pub enum LivenessError {
    /// The host refused every attempt.
    #[error("Unavailable host: \"{host}:{port}\" after {attempts} attempts")]
    HostUnavailable { host: String, port: u16, attempts: u32 },

    /// A `--check-host` value could not be parsed.
    #[error("Invalid host specification '{0}': expected host[:port]")]
    InvalidHostSpec(String),
}

/// A `host[:port]` pair to check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostSpec {
    pub host: String,
    pub port: u16,
}

impl FromStr for HostSpec {
    type Err = LivenessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || LivenessError::InvalidHostSpec(s.to_string());

        let (host, port) = if s.starts_with('[') && s.ends_with(']') {
            // Bracketed IPv6 literal without a port
            (s, DEFAULT_PORT)
        } else {
            match s.rsplit_once(':') {
                // Bare IPv6 literal without a port
                Some((host, _)) if host.contains(':') && !host.starts_with('[') => (s, DEFAULT_PORT),
                Some((host, port)) => (host, port.parse().map_err(|_| invalid())?),
                None => (s, DEFAULT_PORT),
            }
        };

        let host = host.trim_start_matches('[').trim_end_matches(']');
        if host.is_empty() {
            return Err(invalid());
        }

        Ok(Self {
            host: host.to_string(),
            port,
        })
    }
}

impl std::fmt::Display for HostSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Result of one probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    Reachable,
    Unreachable(String),
}

/// One probe of one host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LivenessAttempt {
    pub host: String,
    pub port: u16,
    pub attempt: u32,
    pub outcome: AttemptOutcome,
}

/// Every attempt made for a host that was eventually reachable.
#[derive(Debug, Clone)]
pub struct LivenessReport {
    pub attempts: Vec<LivenessAttempt>,
    pub elapsed: Duration,
}

/// A single reachability probe.
pub trait Probe {
    fn probe(&mut self, host: &str, port: u16, timeout: Duration) -> impl Future<Output = io::Result<()>> + Send;
}

/// Connect over TCP, then shut the write half down.
#[derive(Debug, Clone, Copy, Default)]
pub struct TcpProbe;

impl Probe for TcpProbe {
    fn probe(&mut self, host: &str, port: u16, timeout: Duration) -> impl Future<Output = io::Result<()>> + Send {
        let host = host.to_string();
        async move {
            let mut stream = tokio::time::timeout(timeout, TcpStream::connect((host.as_str(), port)))
                .await
                .map_err(|_| io::Error::new(io::ErrorKind::TimedOut, "connect timed out"))??;
            stream.shutdown().await
        }
    }
}

/// Retrying reachability gate.
#[derive(Debug)]
pub struct LivenessChecker<P = TcpProbe> {
    probe: P,
    timeout: Duration,
    max_attempts: u32,
    backoff: Backoff,
}

impl LivenessChecker<TcpProbe> {
    pub fn new(config: &LivenessConfig) -> Self {
        Self::with_probe(config, TcpProbe)
    }
}

impl<P: Probe> LivenessChecker<P> {
    pub fn with_probe(config: &LivenessConfig, probe: P) -> Self {
        Self {
            probe,
            timeout: Duration::from_millis(config.timeout_ms),
            max_attempts: config.max_attempts.max(1),
            backoff: Backoff::from(config),
        }
    }

    pub fn with_backoff(mut self, backoff: Backoff) -> Self {
        self.backoff = backoff;
        self
    }

    /// Probe `host:port` until it answers or the attempts run out.
    pub async fn check(&mut self, host: &str, port: u16) -> Result<LivenessReport, LivenessError> {
        let started = Instant::now();
        let mut attempts = Vec::new();

        for attempt in 1..=self.max_attempts {
            match self.probe.probe(host, port, self.timeout).await {
                Ok(()) => {
                    attempts.push(LivenessAttempt {
                        host: host.to_string(),
                        port,
                        attempt,
                        outcome: AttemptOutcome::Reachable,
                    });
                    tracing::info!(host, port, attempt, "Host is alive");
                    return Ok(LivenessReport {
                        attempts,
                        elapsed: started.elapsed(),
                    });
                }
                Err(e) => {
                    attempts.push(LivenessAttempt {
                        host: host.to_string(),
                        port,
                        attempt,
                        outcome: AttemptOutcome::Unreachable(e.to_string()),
                    });

                    if attempt < self.max_attempts {
                        let delay = self.backoff.delay(attempt);
                        tracing::warn!(
                            host,
                            port,
                            attempt,
                            max_attempts = self.max_attempts,
                            delay_ms = delay.as_millis() as u64,
                            error = %e,
                            "Host unavailable, backing off"
                        );
                        tokio::time::sleep(delay).await;
                    } else {
                        tracing::error!(host, port, attempt, error = %e, "Giving up on host");
                    }
                }
            }
        }

        Err(LivenessError::HostUnavailable {
            host: host.to_string(),
            port,
            attempts: self.max_attempts,
        })
    }

    /// Check every host in order, stopping at the first unavailable one.
    pub async fn check_all(&mut self, hosts: &[HostSpec]) -> Result<Vec<LivenessReport>, LivenessError> {
        let mut reports = Vec::with_capacity(hosts.len());
        for spec in hosts {
            reports.push(self.check(&spec.host, spec.port).await?);
        }
        Ok(reports)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Fails a fixed number of times, then succeeds.
    struct ScriptedProbe {
        failures: u32,
        calls: u32,
    }

    impl Probe for ScriptedProbe {
        fn probe(&mut self, _host: &str, _port: u16, _timeout: Duration) -> impl Future<Output = io::Result<()>> + Send {
            self.calls += 1;
            let fail = self.calls <= self.failures;
            async move {
                if fail {
                    Err(io::Error::new(io::ErrorKind::ConnectionRefused, "refused"))
                } else {
                    Ok(())
                }
            }
        }
    }

    fn fast_config() -> LivenessConfig {
        LivenessConfig {
            timeout_ms: 200,
            max_attempts: 5,
            base_delay_ms: 10,
            max_delay_ms: 1_000,
        }
    }

    #[tokio::test]
    async fn test_succeeds_on_fifth_attempt() {
        let probe = ScriptedProbe { failures: 4, calls: 0 };
        let mut checker = LivenessChecker::with_probe(&fast_config(), probe);

        let report = checker.check("kafka", 9092).await.unwrap();
        assert_eq!(report.attempts.len(), 5);
        assert_eq!(report.attempts[4].outcome, AttemptOutcome::Reachable);
        assert!(matches!(report.attempts[0].outcome, AttemptOutcome::Unreachable(_)));
        assert_eq!(checker.probe.calls, 5);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_attempts() {
        let probe = ScriptedProbe { failures: u32::MAX, calls: 0 };
        let config = fast_config();
        let backoff = Backoff::from(&config).without_jitter();
        let mut checker = LivenessChecker::with_probe(&config, probe).with_backoff(backoff);

        let started = Instant::now();
        let err = checker.check("kafka", 9092).await.unwrap_err();
        let elapsed = started.elapsed();

        assert!(matches!(err, LivenessError::HostUnavailable { attempts: 5, .. }));
        assert_eq!(checker.probe.calls, 5);
        // 10 + 20 + 40 + 80 ms between the five attempts
        assert!(elapsed >= Duration::from_millis(150), "elapsed {:?}", elapsed);
        assert!(elapsed < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_tcp_probe_against_live_listener() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        tokio::spawn(async move {
            while let Ok((_socket, _)) = listener.accept().await {}
        });

        let mut checker = LivenessChecker::new(&fast_config());
        let report = checker.check("127.0.0.1", port).await.unwrap();
        assert_eq!(report.attempts.len(), 1);
    }

    #[tokio::test]
    async fn test_tcp_probe_against_closed_port() {
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let config = LivenessConfig {
            max_attempts: 2,
            ..fast_config()
        };

        let mut checker = LivenessChecker::new(&config);
        let err = checker.check("127.0.0.1", port).await.unwrap_err();
        assert!(err.to_string().contains("after 2 attempts"));
    }

    #[test]
    fn test_host_spec_parsing() {
        assert_eq!(
            "kafka:9092".parse::<HostSpec>().unwrap(),
            HostSpec { host: "kafka".into(), port: 9092 }
        );
        assert_eq!("registry".parse::<HostSpec>().unwrap().port, 80);
        assert_eq!(
            "[::1]:8200".parse::<HostSpec>().unwrap(),
            HostSpec { host: "::1".into(), port: 8200 }
        );
        assert_eq!(
            "[::1]".parse::<HostSpec>().unwrap(),
            HostSpec { host: "::1".into(), port: 80 }
        );
        assert_eq!("::1".parse::<HostSpec>().unwrap().port, 80);
        assert!("[]".parse::<HostSpec>().is_err());
        assert!("kafka:http".parse::<HostSpec>().is_err());
        assert!(":9092".parse::<HostSpec>().is_err());
    }
}
