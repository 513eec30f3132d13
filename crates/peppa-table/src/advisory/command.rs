use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tokio::time::Instant;
use tracing::{Level, event};

use super::wire::{MoveRequest, MoveResponse, PassRequest, PassResponse};
use super::{Advisor, AdvisoryError};
use crate::config::AdvisoryConfig;

/// Advisor backed by an external program: one JSON request line on stdin,
/// one JSON response on stdout, one process per call.
#[derive(Debug, Clone)]
pub struct CommandAdvisor {
    command: String,
    args: Vec<String>,
    working_dir: Option<PathBuf>,
}

impl CommandAdvisor {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            args: Vec::new(),
            working_dir: None,
        }
    }

    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }

    pub fn with_working_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.working_dir = dir;
        self
    }

    /// `None` when the service is disabled or has no command.
    pub fn from_config(config: &AdvisoryConfig) -> Option<Self> {
        if !config.enabled {
            return None;
        }
        let command = config.command.as_deref()?.trim();
        if command.is_empty() {
            event!(
                target: "peppa_table::advisory",
                Level::WARN,
                "advisory enabled without a command; using the local heuristic"
            );
            return None;
        }
        Some(
            Self::new(command)
                .with_args(config.args.clone())
                .with_working_dir(config.working_dir.clone()),
        )
    }

    async fn invoke<Request, Response>(
        &self,
        action: &str,
        request: &Request,
    ) -> Result<Response, AdvisoryError>
    where
        Request: Serialize,
        Response: DeserializeOwned,
    {
        if self.command.is_empty() {
            return Err(AdvisoryError::NoCommand);
        }

        let mut cmd = Command::new(&self.command);
        if !self.args.is_empty() {
            cmd.args(&self.args);
        }
        if let Some(dir) = &self.working_dir {
            cmd.current_dir(dir);
        }
        // A timed-out call drops this future; the child must not outlive it.
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true);

        let start = Instant::now();
        let mut child = cmd
            .spawn()
            .map_err(|err| AdvisoryError::Spawn(err.to_string()))?;
        {
            let mut stdin = child
                .stdin
                .take()
                .ok_or_else(|| AdvisoryError::Io("stdin".into()))?;
            let mut line = serde_json::to_vec(request)
                .map_err(|err| AdvisoryError::Protocol(err.to_string()))?;
            line.push(b'\n');
            stdin
                .write_all(&line)
                .await
                .map_err(|err| AdvisoryError::Io(err.to_string()))?;
        }

        let output = child
            .wait_with_output()
            .await
            .map_err(|err| AdvisoryError::Io(err.to_string()))?;

        if !output.status.success() {
            return Err(AdvisoryError::Status(format!(
                "exit status {}",
                output.status
            )));
        }

        event!(
            target: "peppa_table::advisory",
            Level::DEBUG,
            command = %self.command,
            action,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "advisory response received"
        );

        serde_json::from_slice(&output.stdout)
            .map_err(|err| AdvisoryError::Protocol(err.to_string()))
    }
}

#[async_trait]
impl Advisor for CommandAdvisor {
    async fn propose_pass(&self, request: PassRequest) -> Result<Vec<String>, AdvisoryError> {
        let response: PassResponse = self.invoke("pass", &request).await?;
        Ok(response.cards)
    }

    async fn propose_move(&self, request: MoveRequest) -> Result<String, AdvisoryError> {
        let response: MoveResponse = self.invoke("play", &request).await?;
        Ok(response.card)
    }
}

#[cfg(test)]
mod tests {
    use super::CommandAdvisor;
    use crate::advisory::{Advisor, AdvisoryError, PassRequest};
    use crate::config::AdvisoryConfig;
    use peppa_core::game::{Action, GameState};
    use peppa_core::model::deck::Deck;
    use peppa_core::model::seat::Seat;

    fn request() -> PassRequest {
        let names = ["a", "b", "c", "d"].map(String::from);
        let state = GameState::new(names, 4, 0)
            .apply(Action::Deal(Deck::standard()))
            .unwrap();
        PassRequest::from_state(&state, Seat::West)
    }

    #[test]
    fn disabled_or_commandless_config_builds_nothing() {
        assert!(CommandAdvisor::from_config(&AdvisoryConfig::default()).is_none());
        let config = AdvisoryConfig {
            enabled: true,
            command: Some("  ".to_string()),
            ..AdvisoryConfig::default()
        };
        assert!(CommandAdvisor::from_config(&config).is_none());
        let config = AdvisoryConfig {
            enabled: true,
            command: Some("./advisor".to_string()),
            ..AdvisoryConfig::default()
        };
        assert!(CommandAdvisor::from_config(&config).is_some());
    }

    #[tokio::test]
    async fn missing_program_is_a_spawn_error() {
        let advisor = CommandAdvisor::new("./definitely-not-an-advisor-binary");
        let err = advisor.propose_pass(request()).await.unwrap_err();
        assert!(matches!(err, AdvisoryError::Spawn(_)));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn reads_the_proposal_from_stdout() {
        let advisor = CommandAdvisor::new("sh").with_args(vec![
            "-c".to_string(),
            r#"read line; echo '{"cards":["A-diamonds","K-diamonds","Q-diamonds"]}'"#.to_string(),
        ]);
        let cards = advisor.propose_pass(request()).await.expect("proposal");
        assert_eq!(cards, vec!["A-diamonds", "K-diamonds", "Q-diamonds"]);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn garbage_output_is_a_protocol_error() {
        let advisor = CommandAdvisor::new("sh")
            .with_args(vec!["-c".to_string(), "read line; echo nope".to_string()]);
        let err = advisor.propose_pass(request()).await.unwrap_err();
        assert!(matches!(err, AdvisoryError::Protocol(_)));
    }
}
