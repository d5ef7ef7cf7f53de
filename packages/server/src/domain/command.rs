//! Commands a connection can issue against the race session.

/// A decoded inbound command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Join { name: Option<String> },
    Accelerate,
    Restart,
    StartRace,
}

impl Command {
    /// Wire name of the command (the envelope `type`)
    pub fn name(&self) -> &'static str {
        match self {
            Command::Join { .. } => "join",
            Command::Accelerate => "accelerate",
            Command::Restart => "restart",
            Command::StartRace => "startRace",
        }
    }
}
