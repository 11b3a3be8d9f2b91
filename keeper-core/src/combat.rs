//! Combat tracker state machine: initiative order, turns, HP and conditions
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::TrackerStatus;
use crate::dice;
use crate::event_log::{EventKind, EventLog};

pub type CombatantId = u32;

/// Condition tag applied on a single hit of at least half max HP.
pub const MAJOR_WOUND: &str = "major wound";

const LOG_CAP: usize = 100;

fn combat_log() -> EventLog {
    EventLog::with_cap(LOG_CAP)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CombatantKind {
    Investigator,
    Npc,
    Enemy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CombatantStatus {
    Active,
    Unconscious,
    Dead,
    Fled,
}

impl std::fmt::Display for CombatantStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Active => "active",
            Self::Unconscious => "unconscious",
            Self::Dead => "dead",
            Self::Fled => "fled",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Combatant {
    pub id: CombatantId,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: CombatantKind,
    pub hp: i32,
    pub max_hp: i32,
    /// Drives the initiative roll.
    pub dex: i32,
    /// 0 until rolled.
    pub initiative: i32,
    pub status: CombatantStatus,
    pub conditions: BTreeSet<String>,
}

impl Combatant {
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == CombatantStatus::Active
    }
}

/// Combat action types, matching the tracker's action buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Attack,
    Defend,
    Dodge,
    Flee,
    Spell,
    Item,
}

impl ActionKind {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Attack => "Attack",
            Self::Defend => "Defend",
            Self::Dodge => "Dodge",
            Self::Flee => "Flee",
            Self::Spell => "Cast Spell",
            Self::Item => "Use Item",
        }
    }
}

/// One recorded action, kept for the session history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionRecord {
    pub round: u32,
    pub combatant_id: CombatantId,
    pub combatant_name: String,
    pub action_type: ActionKind,
    pub target_id: Option<CombatantId>,
    pub target_name: Option<String>,
    pub damage_dealt: i32,
    pub damage_received: i32,
}

/// Session-scoped combat tracker. One instance per session, persisted
/// wholesale after every mutation by the owning adapter; the event log and
/// RNG are rebuilt on load and stay out of the serialized aggregate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombatTracker {
    pub combatants: Vec<Combatant>,
    pub actions: Vec<ActionRecord>,
    #[serde(rename = "currentRound")]
    pub round: u32,
    /// Index into `combatants`; -1 when no turn is in progress.
    #[serde(rename = "currentTurnIndex")]
    pub turn_index: i32,
    pub status: TrackerStatus,
    #[serde(default, rename = "nextId")]
    next_id: CombatantId,
    #[serde(default)]
    seed: u64,
    #[serde(skip, default = "combat_log")]
    pub log: EventLog,
    #[serde(skip)]
    rng: Option<ChaCha20Rng>,
}

impl Default for CombatTracker {
    fn default() -> Self {
        Self {
            combatants: Vec::new(),
            actions: Vec::new(),
            round: 0,
            turn_index: -1,
            status: TrackerStatus::Setup,
            next_id: 0,
            seed: 0,
            log: combat_log(),
            rng: None,
        }
    }
}

impl CombatTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self.rng = Some(ChaCha20Rng::seed_from_u64(seed));
        self
    }

    fn rng(&mut self) -> &mut ChaCha20Rng {
        let seed = self.seed;
        self.rng.get_or_insert_with(|| ChaCha20Rng::seed_from_u64(seed))
    }

    #[must_use]
    pub fn current_combatant(&self) -> Option<&Combatant> {
        usize::try_from(self.turn_index)
            .ok()
            .and_then(|i| self.combatants.get(i))
    }

    fn find(&mut self, id: CombatantId) -> Option<&mut Combatant> {
        self.combatants.iter_mut().find(|c| c.id == id)
    }

    pub fn add_combatant(
        &mut self,
        name: impl Into<String>,
        kind: CombatantKind,
        max_hp: i32,
        dex: i32,
    ) -> CombatantId {
        let id = self.next_id;
        self.next_id += 1;
        let max_hp = max_hp.max(1);
        let combatant = Combatant {
            id,
            name: name.into(),
            kind,
            hp: max_hp,
            max_hp,
            dex: dex.max(0),
            initiative: 0,
            status: CombatantStatus::Active,
            conditions: BTreeSet::new(),
        };
        self.log.push(
            format!(
                "{} joined combat (HP: {}, DEX: {})",
                combatant.name, combatant.hp, combatant.dex
            ),
            EventKind::Normal,
        );
        self.combatants.push(combatant);
        id
    }

    pub fn remove_combatant(&mut self, id: CombatantId) -> bool {
        let Some(index) = self.combatants.iter().position(|c| c.id == id) else {
            return false;
        };
        let removed = self.combatants.remove(index);
        // Keep the turn pointer on the same combatant where possible.
        if self.turn_index >= 0 {
            let cur = self.turn_index as usize;
            if index < cur {
                self.turn_index -= 1;
            } else if self.turn_index >= self.combatants.len() as i32 {
                self.turn_index = if self.combatants.is_empty() { -1 } else { 0 };
            }
        }
        self.log
            .push(format!("{} removed from combat", removed.name), EventKind::Normal);
        true
    }

    /// d100 against DEX: success adds 50 on top of DEX, failure leaves DEX.
    pub fn roll_initiative(&mut self, id: CombatantId) {
        let roll = dice::d100(self.rng());
        let Some(combatant) = self.find(id) else {
            return;
        };
        combatant.initiative = combatant.dex + if roll <= combatant.dex { 50 } else { 0 };
        let message = format!(
            "{} rolled initiative: {}",
            combatant.name, combatant.initiative
        );
        self.sort_by_initiative();
        self.log.push(message, EventKind::Normal);
    }

    pub fn roll_all_initiative(&mut self) {
        for i in 0..self.combatants.len() {
            let dex = self.combatants[i].dex;
            let roll = dice::d100(self.rng());
            self.combatants[i].initiative = dex + if roll <= dex { 50 } else { 0 };
        }
        self.sort_by_initiative();
        self.log
            .push("Initiative rolled for all combatants", EventKind::Round);
    }

    fn sort_by_initiative(&mut self) {
        self.combatants
            .sort_by(|a, b| b.initiative.cmp(&a.initiative));
    }

    /// Begin combat. Requires setup state and at least one combatant;
    /// auto-rolls initiative when nobody has rolled yet.
    pub fn start_combat(&mut self) -> bool {
        if self.status != TrackerStatus::Setup || self.combatants.is_empty() {
            return false;
        }
        if self.combatants.iter().all(|c| c.initiative == 0) {
            self.roll_all_initiative();
        }
        self.status = TrackerStatus::Active;
        self.round = 1;
        self.turn_index = 0;
        self.log.push("--- Combat Started! ---", EventKind::Important);
        self.log.push("--- Round 1 ---", EventKind::Round);
        true
    }

    /// Advance to the next combatant still standing, wrapping into a new
    /// round. No-ops (with a log entry) when nobody is active.
    pub fn next_turn(&mut self) {
        if self.status != TrackerStatus::Active || self.combatants.is_empty() {
            return;
        }
        let len = self.combatants.len();
        let cur = usize::try_from(self.turn_index).unwrap_or(0).min(len - 1);

        let mut found = None;
        for step in 1..=len {
            let idx = (cur + step) % len;
            if self.combatants[idx].is_active() {
                found = Some((idx, cur + step >= len));
                break;
            }
        }
        let Some((idx, wrapped)) = found else {
            self.log
                .push("No active combatants remaining", EventKind::Important);
            return;
        };

        if wrapped {
            self.round += 1;
            self.log
                .push(format!("--- Round {} ---", self.round), EventKind::Round);
        }
        self.turn_index = idx as i32;
        self.log
            .push(format!("{}'s turn", self.combatants[idx].name), EventKind::Normal);
    }

    /// Clamp HP into `[0, max]`, tagging major wounds and tracking
    /// consciousness transitions.
    pub fn adjust_hp(&mut self, id: CombatantId, delta: i32) {
        let Some(combatant) = self.find(id) else {
            return;
        };
        let old_hp = combatant.hp;
        combatant.hp = (combatant.hp + delta).clamp(0, combatant.max_hp);

        let mut entries: Vec<(String, EventKind)> = Vec::new();
        if delta < 0 && -delta >= combatant.max_hp / 2 && combatant.conditions.insert(MAJOR_WOUND.to_string()) {
            entries.push((
                format!("{} suffers a MAJOR WOUND!", combatant.name),
                EventKind::Failure,
            ));
        }
        if combatant.hp == 0 && combatant.status == CombatantStatus::Active {
            combatant.status = CombatantStatus::Unconscious;
            entries.push((
                format!("{} is UNCONSCIOUS!", combatant.name),
                EventKind::Failure,
            ));
        } else if old_hp == 0 && combatant.hp > 0 && combatant.status == CombatantStatus::Unconscious {
            combatant.status = CombatantStatus::Active;
            entries.push((
                format!("{} regains consciousness", combatant.name),
                EventKind::Normal,
            ));
        }
        if delta < 0 {
            entries.push((
                format!(
                    "{} takes {} damage (HP: {}/{})",
                    combatant.name, -delta, combatant.hp, combatant.max_hp
                ),
                EventKind::Normal,
            ));
        } else if delta > 0 {
            entries.push((
                format!(
                    "{} heals {} (HP: {}/{})",
                    combatant.name, delta, combatant.hp, combatant.max_hp
                ),
                EventKind::Success,
            ));
        }
        for (message, kind) in entries {
            self.log.push(message, kind);
        }
    }

    /// Record the current combatant's action, apply damage to the target and
    /// any fight-back damage to the attacker, then advance the turn.
    pub fn record_action(
        &mut self,
        action: ActionKind,
        target_id: Option<CombatantId>,
        damage_to_target: i32,
        fightback_damage: i32,
    ) {
        if self.status != TrackerStatus::Active {
            return;
        }
        let Some(current) = self.current_combatant() else {
            return;
        };
        let (actor_id, actor_name) = (current.id, current.name.clone());
        let target = target_id.and_then(|tid| self.combatants.iter().find(|c| c.id == tid));
        let target_name = target.map(|t| t.name.clone());

        self.actions.push(ActionRecord {
            round: self.round,
            combatant_id: actor_id,
            combatant_name: actor_name.clone(),
            action_type: action,
            target_id,
            target_name: target_name.clone(),
            damage_dealt: damage_to_target,
            damage_received: fightback_damage,
        });

        let mut message = format!("{}: {}", actor_name, action.label());
        if let Some(name) = &target_name {
            message.push_str(&format!(" -> {name}"));
        }
        self.log.push(message, EventKind::Normal);

        if let Some(tid) = target_id
            && damage_to_target > 0
        {
            self.adjust_hp(tid, -damage_to_target);
        }
        if fightback_damage > 0 {
            self.adjust_hp(actor_id, -fightback_damage);
        }
        self.next_turn();
    }

    pub fn set_status(&mut self, id: CombatantId, status: CombatantStatus) {
        let Some(combatant) = self.find(id) else {
            return;
        };
        combatant.status = status;
        let message = format!("{} is now {status}", combatant.name);
        self.log.push(message, EventKind::Normal);
    }

    /// Terminal: combat cannot resume once ended.
    pub fn end_combat(&mut self) {
        self.status = TrackerStatus::Ended;
        self.turn_index = -1;
        self.log.push("--- Combat Ended ---", EventKind::Important);
    }

    /// Clear everything back to setup.
    pub fn reset(&mut self) {
        let seed = self.seed;
        *self = Self::default().with_seed(seed);
        self.log.push("Combat tracker reset", EventKind::Normal);
    }
}
