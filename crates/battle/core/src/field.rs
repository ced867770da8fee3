//! Combatant arena.
//!
//! Every entity that takes part in a battle lives here, keyed by a generated
//! [`CombatantId`]. Deletion is an explicit removal by id, so nothing can
//! dangle. Team and role are closed variants queried directly; there is no
//! hierarchy to inspect.

use crate::queue::ActionQueue;

/// Generated identity of a combatant within one battle session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatantId(pub u32);

/// Side a combatant fights for. The local player's side is red.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Team {
    Red,
    Blue,
}

impl Team {
    pub fn opponent(self) -> Team {
        match self {
            Team::Red => Team::Blue,
            Team::Blue => Team::Red,
        }
    }
}

/// Explicit role variant replacing hierarchy checks: obstacles occupy tiles
/// and take hits but never count toward round-clear conditions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CombatRole {
    Fighter,
    Obstacle,
}

/// One tracked entity: identity, allegiance, health, and its own action
/// queue. Queues never interact across combatants.
#[derive(Debug)]
pub struct Combatant {
    pub id: CombatantId,
    pub team: Team,
    pub role: CombatRole,
    pub health: i32,
    pub max_health: i32,
    pub queue: ActionQueue,
}

impl Combatant {
    pub fn is_alive(&self) -> bool {
        self.health > 0
    }
}

/// Arena of live combatants for one battle session.
#[derive(Debug, Default)]
pub struct Field {
    combatants: Vec<Combatant>,
    next_id: u32,
}

impl Field {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawns a combatant and returns its generated id.
    pub fn spawn(&mut self, team: Team, role: CombatRole, health: i32) -> CombatantId {
        let id = CombatantId(self.next_id);
        self.next_id += 1;
        self.combatants.push(Combatant {
            id,
            team,
            role,
            health,
            max_health: health,
            queue: ActionQueue::new(),
        });
        id
    }

    /// Removes a combatant from the field. Returns false if the id was
    /// already gone.
    pub fn remove(&mut self, id: CombatantId) -> bool {
        let before = self.combatants.len();
        self.combatants.retain(|combatant| combatant.id != id);
        self.combatants.len() != before
    }

    pub fn combatant(&self, id: CombatantId) -> Option<&Combatant> {
        self.combatants.iter().find(|combatant| combatant.id == id)
    }

    pub fn combatant_mut(&mut self, id: CombatantId) -> Option<&mut Combatant> {
        self.combatants
            .iter_mut()
            .find(|combatant| combatant.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Combatant> {
        self.combatants.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Combatant> {
        self.combatants.iter_mut()
    }

    /// Fighters of the given team still on the field. Obstacles are excluded
    /// even when they linger after the round clears.
    pub fn fighters_remaining(&self, team: Team) -> usize {
        self.combatants
            .iter()
            .filter(|combatant| combatant.team == team && combatant.role == CombatRole::Fighter)
            .count()
    }
}
