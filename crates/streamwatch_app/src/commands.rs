//! Command surface consumed by an external command dispatcher.

use watch_logging::watch_warn;

use crate::monitor::{MonitorController, StartOutcome, StopOutcome};

/// The two named operations the dispatcher can invoke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    StartMonitoring,
    StopMonitoring,
}

/// Whoever invoked the command, with the role names the chat platform
/// assigned to them.
#[derive(Debug, Clone)]
pub struct CommandCaller {
    pub name: String,
    pub roles: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandReply {
    Started,
    AlreadyRunning,
    Stopped,
    NotRunning,
    Unauthorized,
}

impl CommandReply {
    /// User-visible acknowledgment for the channel the command came from.
    pub fn message(&self) -> &'static str {
        match self {
            CommandReply::Started => "🎥 Starting to monitor streams...",
            CommandReply::AlreadyRunning => "⚠️ Monitoring is already running.",
            CommandReply::Stopped => "🛑 Monitoring stopped.",
            CommandReply::NotRunning => "⚠️ Monitoring is not running.",
            CommandReply::Unauthorized => "🚫 You don't have permission to use this command.",
        }
    }
}

/// Role-gates and executes one command. Unauthorized callers get a rejection
/// and no state change; both operations are idempotent.
pub async fn dispatch(
    controller: &MonitorController,
    required_role: &str,
    caller: &CommandCaller,
    command: Command,
) -> CommandReply {
    if !caller.roles.iter().any(|role| role == required_role) {
        watch_warn!(
            "Rejected {:?} from {} (missing role {})",
            command,
            caller.name,
            required_role
        );
        return CommandReply::Unauthorized;
    }

    match command {
        Command::StartMonitoring => match controller.start().await {
            StartOutcome::Started => CommandReply::Started,
            StartOutcome::AlreadyRunning => CommandReply::AlreadyRunning,
        },
        Command::StopMonitoring => match controller.stop().await {
            StopOutcome::Stopped => CommandReply::Stopped,
            StopOutcome::NotRunning => CommandReply::NotRunning,
        },
    }
}
