//! Commands the coordinator can send to a device cluster
//!
//! Every supported command is a variant of [`Command`]. Its fieldless
//! counterpart [`CommandShape`] is what the cluster catalog and the command
//! index key on, so resolving a wire identifier never needs to look at
//! parameter values.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Direction of a level `Move`/`Step`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveMode {
    Up,
    Down,
}

/// Path taken around the hue circle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HueDirection {
    ShortestDistance,
    LongestDistance,
    Up,
    Down,
}

/// A cluster-specific command value
///
/// Transition times are in tenths of a second.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Command {
    // Basic
    ResetToFactoryDefaults,

    // Identify
    Identify { identify_time: u16 },
    IdentifyQuery,
    TriggerEffect { effect_id: u8, effect_variant: u8 },

    // Groups
    AddGroup { group_id: u16, group_name: String },
    ViewGroup { group_id: u16 },
    RemoveGroup { group_id: u16 },
    RemoveAllGroups,

    // Scenes
    StoreScene { group_id: u16, scene_id: u8 },
    RecallScene { group_id: u16, scene_id: u8 },

    // On/Off
    Off,
    On,
    Toggle,
    OffWithEffect { effect_id: u8, effect_variant: u8 },
    OnWithTimedOff { on_off_control: u8, on_time: u16, off_wait_time: u16 },

    // Level control
    MoveToLevel { level: u8, transition_time: u16 },
    Move { mode: MoveMode, rate: u8 },
    Step { mode: MoveMode, step_size: u8, transition_time: u16 },
    Stop,
    MoveToLevelWithOnOff { level: u8, transition_time: u16 },
    StopWithOnOff,

    // Color control
    MoveToHue { hue: u8, direction: HueDirection, transition_time: u16 },
    MoveToSaturation { saturation: u8, transition_time: u16 },
    MoveToHueAndSaturation { hue: u8, saturation: u8, transition_time: u16 },
    MoveToColor { color_x: u16, color_y: u16, transition_time: u16 },
    MoveToColorTemperature { color_temperature_mireds: u16, transition_time: u16 },
}

/// Parameter-free tag identifying which [`Command`] variant a value is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandShape {
    ResetToFactoryDefaults,
    Identify,
    IdentifyQuery,
    TriggerEffect,
    AddGroup,
    ViewGroup,
    RemoveGroup,
    RemoveAllGroups,
    StoreScene,
    RecallScene,
    Off,
    On,
    Toggle,
    OffWithEffect,
    OnWithTimedOff,
    MoveToLevel,
    Move,
    Step,
    Stop,
    MoveToLevelWithOnOff,
    StopWithOnOff,
    MoveToHue,
    MoveToSaturation,
    MoveToHueAndSaturation,
    MoveToColor,
    MoveToColorTemperature,
}

impl Command {
    /// The shape of this command, independent of its parameters
    #[must_use]
    pub const fn shape(&self) -> CommandShape {
        match self {
            Self::ResetToFactoryDefaults => CommandShape::ResetToFactoryDefaults,
            Self::Identify { .. } => CommandShape::Identify,
            Self::IdentifyQuery => CommandShape::IdentifyQuery,
            Self::TriggerEffect { .. } => CommandShape::TriggerEffect,
            Self::AddGroup { .. } => CommandShape::AddGroup,
            Self::ViewGroup { .. } => CommandShape::ViewGroup,
            Self::RemoveGroup { .. } => CommandShape::RemoveGroup,
            Self::RemoveAllGroups => CommandShape::RemoveAllGroups,
            Self::StoreScene { .. } => CommandShape::StoreScene,
            Self::RecallScene { .. } => CommandShape::RecallScene,
            Self::Off => CommandShape::Off,
            Self::On => CommandShape::On,
            Self::Toggle => CommandShape::Toggle,
            Self::OffWithEffect { .. } => CommandShape::OffWithEffect,
            Self::OnWithTimedOff { .. } => CommandShape::OnWithTimedOff,
            Self::MoveToLevel { .. } => CommandShape::MoveToLevel,
            Self::Move { .. } => CommandShape::Move,
            Self::Step { .. } => CommandShape::Step,
            Self::Stop => CommandShape::Stop,
            Self::MoveToLevelWithOnOff { .. } => CommandShape::MoveToLevelWithOnOff,
            Self::StopWithOnOff => CommandShape::StopWithOnOff,
            Self::MoveToHue { .. } => CommandShape::MoveToHue,
            Self::MoveToSaturation { .. } => CommandShape::MoveToSaturation,
            Self::MoveToHueAndSaturation { .. } => CommandShape::MoveToHueAndSaturation,
            Self::MoveToColor { .. } => CommandShape::MoveToColor,
            Self::MoveToColorTemperature { .. } => CommandShape::MoveToColorTemperature,
        }
    }
}

impl CommandShape {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ResetToFactoryDefaults => "reset_to_factory_defaults",
            Self::Identify => "identify",
            Self::IdentifyQuery => "identify_query",
            Self::TriggerEffect => "trigger_effect",
            Self::AddGroup => "add_group",
            Self::ViewGroup => "view_group",
            Self::RemoveGroup => "remove_group",
            Self::RemoveAllGroups => "remove_all_groups",
            Self::StoreScene => "store_scene",
            Self::RecallScene => "recall_scene",
            Self::Off => "off",
            Self::On => "on",
            Self::Toggle => "toggle",
            Self::OffWithEffect => "off_with_effect",
            Self::OnWithTimedOff => "on_with_timed_off",
            Self::MoveToLevel => "move_to_level",
            Self::Move => "move",
            Self::Step => "step",
            Self::Stop => "stop",
            Self::MoveToLevelWithOnOff => "move_to_level_with_on_off",
            Self::StopWithOnOff => "stop_with_on_off",
            Self::MoveToHue => "move_to_hue",
            Self::MoveToSaturation => "move_to_saturation",
            Self::MoveToHueAndSaturation => "move_to_hue_and_saturation",
            Self::MoveToColor => "move_to_color",
            Self::MoveToColorTemperature => "move_to_color_temperature",
        }
    }
}

impl fmt::Display for CommandShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shape_ignores_parameters() {
        let dim = Command::MoveToLevel { level: 10, transition_time: 0 };
        let bright = Command::MoveToLevel { level: 254, transition_time: 20 };
        assert_eq!(dim.shape(), bright.shape());
        assert_ne!(dim.shape(), Command::MoveToLevelWithOnOff { level: 10, transition_time: 0 }.shape());
    }

    #[test]
    fn shape_name_matches_serde_tag() {
        let command = Command::OnWithTimedOff { on_off_control: 0, on_time: 600, off_wait_time: 0 };
        let json = serde_json::to_value(&command).unwrap();
        assert_eq!(json["command"], command.shape().as_str());
        assert_eq!(serde_json::to_value(command.shape()).unwrap(), command.shape().as_str());
    }

    #[test]
    fn command_from_json() {
        let command: Command =
            serde_json::from_str(r#"{"command": "move", "mode": "down", "rate": 5}"#).unwrap();
        assert_eq!(command, Command::Move { mode: MoveMode::Down, rate: 5 });
    }
}
