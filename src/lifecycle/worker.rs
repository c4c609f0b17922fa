//! Worker runtime launch.
//!
//! The worker is an external program. It gets exactly the resolved
//! environ, inherits stdio, and its exit code becomes ours.

use thiserror::Error;
use tokio::process::Command;

use crate::config::{Environ, Settings, WorkerConfig};

/// Run profile of the worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    Production,
    Development,
}

#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("Failed to start worker '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

/// Fully built worker command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerCommand {
    program: String,
    args: Vec<String>,
}

impl WorkerCommand {
    pub fn build(profile: Profile, config: &WorkerConfig, settings: &Settings, extra: &[String]) -> Self {
        let mut args = vec!["-A".to_string(), config.app.clone()];
        match profile {
            Profile::Production => {
                let port = settings.web_port.to_string();
                args.extend(
                    [
                        "worker",
                        "-l",
                        "info",
                        "-h",
                        settings.web_host.as_str(),
                        "-p",
                        port.as_str(),
                        "-b",
                        "0.0.0.0",
                    ]
                    .map(String::from),
                );
            }
            Profile::Development => {
                args.extend(["--debug", "worker", "-l", "info"].map(String::from));
            }
        }
        args.extend(extra.iter().cloned());

        Self {
            program: config.program.clone(),
            args,
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Run the worker to completion and return its exit code.
    pub async fn launch(&self, environ: &Environ) -> Result<i32, WorkerError> {
        tracing::info!(
            program = %self.program,
            args = %self.args.join(" "),
            variables = environ.len(),
            "Starting worker"
        );

        let status = Command::new(&self.program)
            .args(&self.args)
            .env_clear()
            .envs(environ.iter())
            .status()
            .await
            .map_err(|source| WorkerError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        // Killed by a signal: no code, report failure
        let code = status.code().unwrap_or(1);
        tracing::info!(code, "Worker exited");
        Ok(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, FileOverrides};

    fn settings() -> Settings {
        let environ: Environ = [
            ("SECRET", "6f1f5b8e-6c1a-4f0e-9a57-2b9c5e1d3a40"),
            ("KAFKA_TOPIC", "users"),
            ("SCHEMA_REGISTRY_URL", "http://registry:8081"),
            ("APP_WEB_HOST", "0.0.0.0"),
            ("APP_WEB_PORT", "7070"),
        ]
        .into_iter()
        .collect();
        Settings::from_config(&mut Config::new(environ, FileOverrides::default())).unwrap()
    }

    #[test]
    fn test_production_command() {
        let command = WorkerCommand::build(Profile::Production, &WorkerConfig::default(), &settings(), &[]);
        assert_eq!(command.program(), "faust");
        assert_eq!(
            command.args().join(" "),
            "-A src.resources:faust_app worker -l info -h 0.0.0.0 -p 7070 -b 0.0.0.0"
        );
    }

    #[test]
    fn test_development_command_with_extra_args() {
        let extra = vec!["--without-web".to_string()];
        let command = WorkerCommand::build(Profile::Development, &WorkerConfig::default(), &settings(), &extra);
        assert_eq!(
            command.args().join(" "),
            "-A src.resources:faust_app --debug worker -l info --without-web"
        );
    }

    #[tokio::test]
    async fn test_missing_program() {
        let config = WorkerConfig {
            program: "/nonexistent/worker-binary".to_string(),
            ..WorkerConfig::default()
        };
        let command = WorkerCommand::build(Profile::Development, &config, &settings(), &[]);
        let err = command.launch(&Environ::new()).await.unwrap_err();
        assert!(err.to_string().contains("/nonexistent/worker-binary"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_exit_code_and_environment_are_passed_through() {
        let command = WorkerCommand {
            program: "/bin/sh".to_string(),
            args: vec!["-c".into(), "test \"$KAFKA_TOPIC\" = users && exit 3".into()],
        };
        let environ: Environ = [("KAFKA_TOPIC", "users")].into_iter().collect();
        assert_eq!(command.launch(&environ).await.unwrap(), 3);
    }
}
