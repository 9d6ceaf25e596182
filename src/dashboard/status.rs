use crate::types::BotCommand;

/// Two-state bot indicator, plus the display used when the backend could not
/// be reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusIndicator {
    Online,
    #[default]
    Offline,
    Error,
}

impl StatusIndicator {
    pub fn from_status(status: &str) -> Self {
        match status {
            "running" | "success" => StatusIndicator::Online,
            _ => StatusIndicator::Offline,
        }
    }

    pub fn text(&self) -> &'static str {
        match self {
            StatusIndicator::Online => "Online",
            StatusIndicator::Offline => "Offline",
            StatusIndicator::Error => "Error: Check logs",
        }
    }
}

/// Start/stop button. `running` is the single source of truth for both the
/// label and the command the next press sends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ToggleControl {
    running: bool,
}

impl ToggleControl {
    #[cfg(test)]
    pub fn new(running: bool) -> Self {
        Self { running }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn set_running(&mut self, running: bool) {
        self.running = running;
    }

    pub fn label(&self) -> &'static str {
        if self.running {
            "Stop Trading"
        } else {
            "Start Trading"
        }
    }

    pub fn next_command(&self) -> BotCommand {
        if self.running {
            BotCommand::Stop
        } else {
            BotCommand::Start
        }
    }
}
