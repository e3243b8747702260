//! Phase tags and phase sets.

use crate::error::{ThermoError, ThermoResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A single phase tag.
///
/// Ordering follows the canonical layout of multi-phase storage:
/// gas, liquid, organic liquid, solid, organic solid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Phase {
    #[serde(rename = "g")]
    Gas,
    #[serde(rename = "l")]
    Liquid,
    #[serde(rename = "L")]
    OrganicLiquid,
    #[serde(rename = "s")]
    Solid,
    #[serde(rename = "S")]
    OrganicSolid,
}

impl Phase {
    pub const ALL: [Phase; 5] = [
        Phase::Gas,
        Phase::Liquid,
        Phase::OrganicLiquid,
        Phase::Solid,
        Phase::OrganicSolid,
    ];

    pub fn as_char(self) -> char {
        match self {
            Phase::Gas => 'g',
            Phase::Liquid => 'l',
            Phase::OrganicLiquid => 'L',
            Phase::Solid => 's',
            Phase::OrganicSolid => 'S',
        }
    }

    pub fn from_char(c: char) -> ThermoResult<Phase> {
        match c {
            'g' => Ok(Phase::Gas),
            'l' => Ok(Phase::Liquid),
            'L' => Ok(Phase::OrganicLiquid),
            's' => Ok(Phase::Solid),
            'S' => Ok(Phase::OrganicSolid),
            other => Err(ThermoError::UndefinedPhase {
                phase: other.to_string(),
            }),
        }
    }

    pub fn is_gas(self) -> bool {
        self == Phase::Gas
    }

    pub fn is_liquid(self) -> bool {
        matches!(self, Phase::Liquid | Phase::OrganicLiquid)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

impl FromStr for Phase {
    type Err = ThermoError;

    fn from_str(s: &str) -> ThermoResult<Phase> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Phase::from_char(c),
            _ => match s.to_ascii_lowercase().as_str() {
                "gas" | "vapor" => Ok(Phase::Gas),
                "liquid" => Ok(Phase::Liquid),
                "solid" => Ok(Phase::Solid),
                _ => Err(ThermoError::UndefinedPhase {
                    phase: s.to_string(),
                }),
            },
        }
    }
}

/// A sorted, deduplicated, non-empty set of phases.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PhaseSet(Vec<Phase>);

impl PhaseSet {
    pub fn new(phases: impl IntoIterator<Item = Phase>) -> ThermoResult<Self> {
        let mut phases: Vec<Phase> = phases.into_iter().collect();
        phases.sort();
        phases.dedup();
        if phases.is_empty() {
            return Err(ThermoError::InvalidArg {
                what: "phase set must contain at least one phase".into(),
            });
        }
        Ok(Self(phases))
    }

    /// Vapor-liquid set (`g`, `l`).
    pub fn vle() -> Self {
        Self(vec![Phase::Gas, Phase::Liquid])
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Phase> + '_ {
        self.0.iter().copied()
    }

    pub fn as_slice(&self) -> &[Phase] {
        &self.0
    }

    pub fn contains(&self, phase: Phase) -> bool {
        self.0.contains(&phase)
    }

    /// Row index of `phase` in multi-phase storage.
    pub fn position(&self, phase: Phase) -> ThermoResult<usize> {
        self.0
            .iter()
            .position(|p| *p == phase)
            .ok_or_else(|| ThermoError::UndefinedPhase {
                phase: phase.to_string(),
            })
    }

    pub fn first(&self) -> Phase {
        self.0[0]
    }
}

impl FromStr for PhaseSet {
    type Err = ThermoError;

    fn from_str(s: &str) -> ThermoResult<PhaseSet> {
        let phases = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != ',')
            .map(Phase::from_char)
            .collect::<ThermoResult<Vec<_>>>()?;
        PhaseSet::new(phases)
    }
}

/// Renders as a tuple of quoted tags, e.g. `('g', 'l')`.
impl fmt::Display for PhaseSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tags: Vec<String> = self.0.iter().map(|p| format!("'{p}'")).collect();
        if tags.len() == 1 {
            write!(f, "({},)", tags[0])
        } else {
            write!(f, "({})", tags.join(", "))
        }
    }
}
