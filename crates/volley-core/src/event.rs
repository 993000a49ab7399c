//! Canonical event record
//!
//! Every input layout is normalized into a flat sequence of [`Event`]s. An
//! event's outcome is always drawn from the permitted set of its action;
//! [`Event::new`] refuses anything else.

use crate::error::{Error, Result};
use crate::provenance::Provenance;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Observed action type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Serve,
    Receive,
    Set,
    Attack,
    Block,
    Dig,
}

impl Action {
    /// All actions in canonical order
    pub const ALL: [Action; 6] = [
        Action::Serve,
        Action::Receive,
        Action::Set,
        Action::Attack,
        Action::Block,
        Action::Dig,
    ];

    /// Lowercase wire name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Serve => "serve",
            Self::Receive => "receive",
            Self::Set => "set",
            Self::Attack => "attack",
            Self::Block => "block",
            Self::Dig => "dig",
        }
    }

    /// Outcomes permitted for this action
    pub fn permitted_outcomes(&self) -> &'static [Outcome] {
        use Outcome::*;
        match self {
            Self::Serve => &[Ace, Good, Error],
            Self::Receive | Self::Dig => &[Perfect, Good, Poor, Error],
            Self::Set => &[Exceptional, Good, Poor, Error],
            Self::Attack => &[Kill, Defended, Blocked, Out, Net, Error],
            Self::Block => &[Kill, Touch, BlockNoKill, NoTouch, Error],
        }
    }

    /// Whether `outcome` belongs to this action's permitted set
    pub fn permits(&self, outcome: Outcome) -> bool {
        self.permitted_outcomes().contains(&outcome)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Action {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_ascii_lowercase();
        Action::ALL
            .into_iter()
            .find(|a| a.name() == normalized)
            .ok_or_else(|| Error::InvalidInput(format!("unknown action '{}'", s.trim())))
    }
}

/// Action-specific outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Kill,
    Defended,
    Blocked,
    Out,
    Net,
    Error,
    Ace,
    Good,
    Touch,
    BlockNoKill,
    NoTouch,
    Perfect,
    Poor,
    Exceptional,
}

impl Outcome {
    const ALL: [Outcome; 14] = [
        Outcome::Kill,
        Outcome::Defended,
        Outcome::Blocked,
        Outcome::Out,
        Outcome::Net,
        Outcome::Error,
        Outcome::Ace,
        Outcome::Good,
        Outcome::Touch,
        Outcome::BlockNoKill,
        Outcome::NoTouch,
        Outcome::Perfect,
        Outcome::Poor,
        Outcome::Exceptional,
    ];

    /// Lowercase wire name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Kill => "kill",
            Self::Defended => "defended",
            Self::Blocked => "blocked",
            Self::Out => "out",
            Self::Net => "net",
            Self::Error => "error",
            Self::Ace => "ace",
            Self::Good => "good",
            Self::Touch => "touch",
            Self::BlockNoKill => "block_no_kill",
            Self::NoTouch => "no_touch",
            Self::Perfect => "perfect",
            Self::Poor => "poor",
            Self::Exceptional => "exceptional",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Outcome {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_ascii_lowercase();
        Outcome::ALL
            .into_iter()
            .find(|o| o.name() == normalized)
            .ok_or_else(|| Error::InvalidInput(format!("unknown outcome '{}'", s.trim())))
    }
}

/// Attack style, only meaningful for attacks
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttackType {
    #[default]
    Normal,
    Tip,
    AfterBlock,
}

impl AttackType {
    pub const ALL: [AttackType; 3] = [AttackType::Normal, AttackType::Tip, AttackType::AfterBlock];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Tip => "tip",
            Self::AfterBlock => "after_block",
        }
    }
}

impl FromStr for AttackType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_ascii_lowercase();
        AttackType::ALL
            .into_iter()
            .find(|t| t.name() == normalized)
            .ok_or_else(|| Error::InvalidInput(format!("unknown attack type '{}'", s.trim())))
    }
}

/// Serving rotation, always in 1..=6
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rotation(u8);

impl Rotation {
    /// Create a rotation, rejecting values outside 1..=6
    pub fn new(value: u8) -> Result<Self> {
        if (1..=6).contains(&value) {
            Ok(Self(value))
        } else {
            Err(Error::InvalidRotation(value as i64))
        }
    }

    /// Rotation for the i-th synthesized event: `(i mod 6) + 1`
    pub fn round_robin(index: usize) -> Self {
        Self((index % 6) as u8 + 1)
    }

    pub fn get(&self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Rotation {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Rotation> for u8 {
    fn from(rotation: Rotation) -> Self {
        rotation.0
    }
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R{}", self.0)
    }
}

/// Identifier grouping events into a single rally
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PointId(String);

impl PointId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Identifier derived from set and point numbers
    pub fn from_set_point(set_number: u32, point: u32) -> Self {
        Self(format!("S{set_number}-P{point}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One observed action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub set_number: u32,
    pub rotation: Rotation,
    pub point_id: Option<PointId>,
    pub player: String,
    /// Raw role code as recorded (e.g. `OH2`, `MB1`, `L`)
    pub position: String,
    pub action: Action,
    pub outcome: Outcome,
    pub attack_type: Option<AttackType>,
    /// `Measured` for recorded events, `Synthesized` when rotation or the
    /// event itself was derived from aggregate counts
    pub provenance: Provenance,
    /// Rebuilt from aggregate counts, so its position in the feed carries
    /// no rally order
    #[serde(default)]
    pub from_counts: bool,
}

impl Event {
    /// Create a measured event, validating the outcome against the action
    pub fn new(
        set_number: u32,
        rotation: Rotation,
        player: impl Into<String>,
        action: Action,
        outcome: Outcome,
    ) -> Result<Self> {
        if !action.permits(outcome) {
            return Err(Error::InvalidOutcome { action, outcome });
        }
        if set_number == 0 {
            return Err(Error::InvalidInput("set number must be positive".to_string()));
        }

        Ok(Self {
            set_number,
            rotation,
            point_id: None,
            player: player.into(),
            position: String::new(),
            action,
            outcome,
            attack_type: None,
            provenance: Provenance::Measured,
            from_counts: false,
        })
    }

    pub fn with_point(mut self, point_id: PointId) -> Self {
        self.point_id = Some(point_id);
        self
    }

    pub fn with_position(mut self, position: impl Into<String>) -> Self {
        self.position = position.into();
        self
    }

    /// Attach an attack type; ignored for non-attack actions
    pub fn with_attack_type(mut self, attack_type: AttackType) -> Self {
        if self.action == Action::Attack {
            self.attack_type = Some(attack_type);
        }
        self
    }

    /// Mark the event as derived rather than recorded
    pub fn synthesized(mut self) -> Self {
        self.provenance = Provenance::Synthesized;
        self
    }

    /// Mark the event as rebuilt from aggregate counts
    pub fn from_counts(mut self) -> Self {
        self.from_counts = true;
        self.synthesized()
    }

    pub fn is_kill(&self) -> bool {
        self.outcome == Outcome::Kill
    }

    pub fn is_attack_kill(&self) -> bool {
        self.action == Action::Attack && self.outcome == Outcome::Kill
    }

    pub fn is_synthesized(&self) -> bool {
        self.provenance == Provenance::Synthesized
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permitted_outcomes() {
        assert!(Action::Attack.permits(Outcome::Kill));
        assert!(Action::Block.permits(Outcome::Kill));
        assert!(!Action::Serve.permits(Outcome::Kill));
        assert!(Action::Serve.permits(Outcome::Ace));
        assert!(!Action::Receive.permits(Outcome::Ace));
        assert!(Action::Dig.permits(Outcome::Poor));
        assert!(Action::Set.permits(Outcome::Exceptional));
    }

    #[test]
    fn test_event_rejects_foreign_outcome() {
        let err = Event::new(1, Rotation::new(1).unwrap(), "Alex", Action::Serve, Outcome::Kill)
            .unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidOutcome {
                action: Action::Serve,
                outcome: Outcome::Kill
            }
        ));
    }

    #[test]
    fn test_event_rejects_set_zero() {
        assert!(Event::new(0, Rotation::new(1).unwrap(), "Alex", Action::Serve, Outcome::Ace).is_err());
    }

    #[test]
    fn test_parse_names() {
        assert_eq!(" Attack ".parse::<Action>().unwrap(), Action::Attack);
        assert_eq!("BLOCK_NO_KILL".parse::<Outcome>().unwrap(), Outcome::BlockNoKill);
        assert_eq!("after_block".parse::<AttackType>().unwrap(), AttackType::AfterBlock);
        assert!("free_ball".parse::<Action>().is_err());
        assert!("smash".parse::<Outcome>().is_err());
    }

    #[test]
    fn test_rotation_bounds() {
        assert!(Rotation::new(0).is_err());
        assert!(Rotation::new(7).is_err());
        assert_eq!(Rotation::new(6).unwrap().get(), 6);
    }

    #[test]
    fn test_round_robin_rotation() {
        let rotations: Vec<u8> = (0..8).map(|i| Rotation::round_robin(i).get()).collect();
        assert_eq!(rotations, vec![1, 2, 3, 4, 5, 6, 1, 2]);
    }

    #[test]
    fn test_attack_type_only_on_attacks() {
        let rot = Rotation::new(2).unwrap();
        let serve = Event::new(1, rot, "Alex", Action::Serve, Outcome::Good)
            .unwrap()
            .with_attack_type(AttackType::Tip);
        assert_eq!(serve.attack_type, None);

        let attack = Event::new(1, rot, "Alex", Action::Attack, Outcome::Kill)
            .unwrap()
            .with_attack_type(AttackType::Tip);
        assert_eq!(attack.attack_type, Some(AttackType::Tip));
        assert!(attack.is_attack_kill());
    }

    #[test]
    fn test_rotation_serde_validates() {
        let ok: Rotation = serde_json::from_str("3").unwrap();
        assert_eq!(ok.get(), 3);
        assert!(serde_json::from_str::<Rotation>("9").is_err());
    }
}
