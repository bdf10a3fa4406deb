use crate::animation::LoopPhase;
use serde::{Deserialize, Serialize};
use serde_with::DeserializeFromStr;
use strum::{Display as StrumDisplay, EnumIter, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEvent {
    Expand,
    Contract,
    Toggle,
    StartLoop,
    StopLoop,
    ConfigReload,
    Quit,
}

/// One line of the control socket protocol.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    DeserializeFromStr,
    EnumString,
    EnumIter,
    StrumDisplay,
)]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ControlCommand {
    #[strum(to_string = "expand", serialize = "open")]
    Expand,
    #[strum(to_string = "contract", serialize = "close")]
    Contract,
    Toggle,
    #[strum(to_string = "loop", serialize = "start")]
    Loop,
    Stop,
    Status,
    Quit,
}

impl ControlCommand {
    /// The driver event this command triggers. `Status` is answered by the
    /// server directly and has none.
    pub fn event(self) -> Option<AppEvent> {
        match self {
            Self::Expand => Some(AppEvent::Expand),
            Self::Contract => Some(AppEvent::Contract),
            Self::Toggle => Some(AppEvent::Toggle),
            Self::Loop => Some(AppEvent::StartLoop),
            Self::Stop => Some(AppEvent::StopLoop),
            Self::Quit => Some(AppEvent::Quit),
            Self::Status => None,
        }
    }
}

/// What the driver is doing right now, shared with the control socket.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Status {
    pub frame: u64,
    pub expansion_level: f64,
    pub target_level: f64,
    pub phase: LoopPhase,
    pub looping: bool,
    pub animating: bool,
}
