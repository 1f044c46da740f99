use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown attribute '{0}'")]
pub struct UnknownAttribute(pub String);

/// The fixed rating vocabulary carried by every player row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Attribute {
    Pace,
    Shooting,
    Passing,
    Dribbling,
    Defending,
    Physical,
    Acceleration,
    Agility,
    Jumping,
    Stamina,
    Strength,
    Aggression,
    Balance,
    BallControl,
    Composure,
    Crossing,
    Curve,
    DefensiveAwareness,
    Finishing,
    FreeKickAccuracy,
    GkDiving,
    GkHandling,
    GkKicking,
    GkPositioning,
    GkReflexes,
    HeadingAccuracy,
    Interceptions,
    LongPassing,
    LongShots,
    Penalties,
    Positioning,
    Reactions,
    ShortPassing,
    ShotPower,
    SlidingTackle,
    SprintSpeed,
    StandingTackle,
    Vision,
    Volleys,
}

pub const ATTRIBUTE_COUNT: usize = 39;

impl Attribute {
    pub const ALL: [Attribute; ATTRIBUTE_COUNT] = [
        Attribute::Pace,
        Attribute::Shooting,
        Attribute::Passing,
        Attribute::Dribbling,
        Attribute::Defending,
        Attribute::Physical,
        Attribute::Acceleration,
        Attribute::Agility,
        Attribute::Jumping,
        Attribute::Stamina,
        Attribute::Strength,
        Attribute::Aggression,
        Attribute::Balance,
        Attribute::BallControl,
        Attribute::Composure,
        Attribute::Crossing,
        Attribute::Curve,
        Attribute::DefensiveAwareness,
        Attribute::Finishing,
        Attribute::FreeKickAccuracy,
        Attribute::GkDiving,
        Attribute::GkHandling,
        Attribute::GkKicking,
        Attribute::GkPositioning,
        Attribute::GkReflexes,
        Attribute::HeadingAccuracy,
        Attribute::Interceptions,
        Attribute::LongPassing,
        Attribute::LongShots,
        Attribute::Penalties,
        Attribute::Positioning,
        Attribute::Reactions,
        Attribute::ShortPassing,
        Attribute::ShotPower,
        Attribute::SlidingTackle,
        Attribute::SprintSpeed,
        Attribute::StandingTackle,
        Attribute::Vision,
        Attribute::Volleys,
    ];

    /// Column header used by the ratings CSV.
    pub fn label(self) -> &'static str {
        match self {
            Attribute::Pace => "Pace",
            Attribute::Shooting => "Shooting",
            Attribute::Passing => "Passing",
            Attribute::Dribbling => "Dribbling",
            Attribute::Defending => "Defending",
            Attribute::Physical => "Physical",
            Attribute::Acceleration => "Acceleration",
            Attribute::Agility => "Agility",
            Attribute::Jumping => "Jumping",
            Attribute::Stamina => "Stamina",
            Attribute::Strength => "Strength",
            Attribute::Aggression => "Aggression",
            Attribute::Balance => "Balance",
            Attribute::BallControl => "Ball Control",
            Attribute::Composure => "Composure",
            Attribute::Crossing => "Crossing",
            Attribute::Curve => "Curve",
            Attribute::DefensiveAwareness => "Defensive Awareness",
            Attribute::Finishing => "Finishing",
            Attribute::FreeKickAccuracy => "Free Kick Accuracy",
            Attribute::GkDiving => "GK Diving",
            Attribute::GkHandling => "GK Handling",
            Attribute::GkKicking => "GK Kicking",
            Attribute::GkPositioning => "GK Positioning",
            Attribute::GkReflexes => "GK Reflexes",
            Attribute::HeadingAccuracy => "Heading Accuracy",
            Attribute::Interceptions => "Interceptions",
            Attribute::LongPassing => "Long Passing",
            Attribute::LongShots => "Long Shots",
            Attribute::Penalties => "Penalties",
            Attribute::Positioning => "Positioning",
            Attribute::Reactions => "Reactions",
            Attribute::ShortPassing => "Short Passing",
            Attribute::ShotPower => "Shot Power",
            Attribute::SlidingTackle => "Sliding Tackle",
            Attribute::SprintSpeed => "Sprint Speed",
            Attribute::StandingTackle => "Standing Tackle",
            Attribute::Vision => "Vision",
            Attribute::Volleys => "Volleys",
        }
    }

    /// Position in [`Attribute::ALL`], used to index per-player rating arrays.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn is_goalkeeping(self) -> bool {
        matches!(
            self,
            Attribute::GkDiving
                | Attribute::GkHandling
                | Attribute::GkKicking
                | Attribute::GkPositioning
                | Attribute::GkReflexes
        )
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Attribute {
    type Err = UnknownAttribute;

    // Exact header match first, then a relaxed one so CLI input like "ball_control" works.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        if let Some(attr) = Attribute::ALL.iter().find(|a| a.label() == trimmed) {
            return Ok(*attr);
        }
        let wanted = squash(trimmed);
        Attribute::ALL
            .iter()
            .find(|a| squash(a.label()) == wanted)
            .copied()
            .ok_or_else(|| UnknownAttribute(trimmed.to_string()))
    }
}

fn squash(input: &str) -> String {
    input
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

pub fn parse_attribute_list(raw: &str) -> Result<Vec<Attribute>, UnknownAttribute> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(Attribute::from_str)
        .collect()
}
