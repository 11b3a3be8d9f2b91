//! Chase tracker: positional pursuit along a linear track with hazards
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::TrackerStatus;
use crate::combat::CombatantKind;
use crate::dice;
use crate::event_log::{EventKind, EventLog};

pub type ParticipantId = u32;
pub type HazardId = u32;

const LOG_CAP: usize = 50;
const MIN_TRACK_LENGTH: u32 = 2;

fn chase_log() -> EventLog {
    EventLog::with_cap(LOG_CAP)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParticipantStatus {
    Active,
    Caught,
    Escaped,
    Incapacitated,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub id: ParticipantId,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: CombatantKind,
    /// CoC MOV characteristic; feeds the movement roll.
    pub speed: i32,
    /// Track segment, 1-based.
    pub position: u32,
    pub status: ParticipantStatus,
}

impl Participant {
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == ParticipantStatus::Active
    }
}

/// An obstacle at a fixed track segment. Each participant must pass it
/// once with the named skill before moving beyond it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hazard {
    pub id: HazardId,
    pub position: u32,
    pub name: String,
    pub skill: String,
    /// Participants who have cleared this hazard.
    pub passed: BTreeSet<ParticipantId>,
}

/// What a movement attempt produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Nothing happened (wrong status, unknown id).
    Ignored,
    Moved {
        position: u32,
    },
    /// Stopped at an unpassed hazard; resolve it before moving on.
    Blocked {
        hazard_id: HazardId,
        position: u32,
    },
    Escaped,
}

/// Session-scoped chase tracker, persisted wholesale by the owning adapter.
/// The event log and RNG stay out of the serialized aggregate.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChaseTracker {
    pub participants: Vec<Participant>,
    pub hazards: Vec<Hazard>,
    pub track_length: u32,
    pub current_round: u32,
    pub status: TrackerStatus,
    #[serde(default)]
    next_id: u32,
    #[serde(default)]
    seed: u64,
    #[serde(skip, default = "chase_log")]
    pub log: EventLog,
    #[serde(skip)]
    rng: Option<ChaCha20Rng>,
}

impl Default for ChaseTracker {
    fn default() -> Self {
        Self {
            participants: Vec::new(),
            hazards: Vec::new(),
            track_length: 10,
            current_round: 0,
            status: TrackerStatus::Setup,
            next_id: 0,
            seed: 0,
            log: chase_log(),
            rng: None,
        }
    }
}

impl ChaseTracker {
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

    fn next_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn add_participant(
        &mut self,
        name: impl Into<String>,
        kind: CombatantKind,
        speed: i32,
    ) -> ParticipantId {
        let id = self.next_id();
        let participant = Participant {
            id,
            name: name.into(),
            kind,
            speed,
            position: 1,
            status: ParticipantStatus::Active,
        };
        self.log.push(
            format!(
                "{} joins the chase (Speed: {})",
                participant.name, participant.speed
            ),
            EventKind::Normal,
        );
        self.participants.push(participant);
        id
    }

    pub fn remove_participant(&mut self, id: ParticipantId) -> bool {
        let Some(index) = self.participants.iter().position(|p| p.id == id) else {
            return false;
        };
        let removed = self.participants.remove(index);
        self.log
            .push(format!("{} leaves the chase", removed.name), EventKind::Normal);
        true
    }

    pub fn add_hazard(
        &mut self,
        position: u32,
        name: impl Into<String>,
        skill: impl Into<String>,
    ) -> HazardId {
        let id = self.next_id();
        let hazard = Hazard {
            id,
            position: position.clamp(1, self.track_length),
            name: name.into(),
            skill: skill.into(),
            passed: BTreeSet::new(),
        };
        self.log.push(
            format!(
                "Hazard added at position {}: {} ({})",
                hazard.position, hazard.name, hazard.skill
            ),
            EventKind::Hazard,
        );
        self.hazards.push(hazard);
        id
    }

    pub fn remove_hazard(&mut self, id: HazardId) -> bool {
        let Some(index) = self.hazards.iter().position(|h| h.id == id) else {
            return false;
        };
        let removed = self.hazards.remove(index);
        self.log
            .push(format!("Hazard removed: {}", removed.name), EventKind::Normal);
        true
    }

    pub fn set_track_length(&mut self, length: u32) {
        self.track_length = length.max(MIN_TRACK_LENGTH);
        for hazard in &mut self.hazards {
            hazard.position = hazard.position.min(self.track_length);
        }
        for participant in &mut self.participants {
            participant.position = participant.position.min(self.track_length);
        }
    }

    /// Begin the chase. Requires setup state and at least two participants.
    pub fn start_chase(&mut self) -> bool {
        if self.status != TrackerStatus::Setup || self.participants.len() < 2 {
            return false;
        }
        self.status = TrackerStatus::Active;
        self.current_round = 1;
        self.log.push("--- The Chase Begins! ---", EventKind::Important);
        self.log.push("--- Round 1 ---", EventKind::Round);
        true
    }

    /// Move a participant along the track. Forward movement is intercepted
    /// by the nearest unpassed hazard in the crossed span; reaching the end
    /// of the track means escape.
    pub fn move_participant(&mut self, id: ParticipantId, delta: i32) -> MoveOutcome {
        if self.status != TrackerStatus::Active {
            return MoveOutcome::Ignored;
        }
        let track_length = self.track_length;
        let Some(index) = self.participants.iter().position(|p| p.id == id) else {
            return MoveOutcome::Ignored;
        };
        if !self.participants[index].is_active() {
            return MoveOutcome::Ignored;
        }

        let old_pos = self.participants[index].position;
        let new_pos = i64::from(old_pos)
            .saturating_add(i64::from(delta))
            .clamp(1, i64::from(track_length)) as u32;

        if delta > 0 {
            // Nearest hazard in the crossed span this participant has not
            // passed yet snaps them to its segment.
            let blocking = self
                .hazards
                .iter()
                .filter(|h| h.position > old_pos && h.position <= new_pos && !h.passed.contains(&id))
                .min_by_key(|h| h.position)
                .map(|h| (h.id, h.position, h.name.clone(), h.skill.clone()));
            if let Some((hazard_id, position, name, skill)) = blocking {
                let participant = &mut self.participants[index];
                participant.position = position;
                let message = format!(
                    "{} runs into {}! ({} check needed)",
                    participant.name, name, skill
                );
                self.log.push(message, EventKind::Hazard);
                // A hazard on the final segment still counts as reaching
                // the end of the track.
                if position < track_length {
                    return MoveOutcome::Blocked { hazard_id, position };
                }
                let participant = &mut self.participants[index];
                participant.status = ParticipantStatus::Escaped;
                let message = format!("--- {} has ESCAPED! ---", participant.name);
                self.log.push(message, EventKind::Success);
                return MoveOutcome::Escaped;
            }
        }

        let participant = &mut self.participants[index];
        participant.position = new_pos;
        if new_pos >= track_length {
            participant.status = ParticipantStatus::Escaped;
            let message = format!("--- {} has ESCAPED! ---", participant.name);
            self.log.push(message, EventKind::Success);
            return MoveOutcome::Escaped;
        }
        let message = format!("{} moves to position {new_pos}", participant.name);
        self.log.push(message, EventKind::Normal);
        MoveOutcome::Moved { position: new_pos }
    }

    /// Resolve a blocked participant's skill check against a hazard.
    /// Success clears the hazard for that participant; failure costs one
    /// segment of ground.
    pub fn resolve_hazard(&mut self, participant_id: ParticipantId, hazard_id: HazardId, success: bool) {
        let Some(hazard) = self.hazards.iter_mut().find(|h| h.id == hazard_id) else {
            return;
        };
        let hazard_name = hazard.name.clone();
        if success {
            hazard.passed.insert(participant_id);
        }
        let Some(participant) = self.participants.iter_mut().find(|p| p.id == participant_id)
        else {
            return;
        };
        if success {
            let message = format!("{} gets past {}!", participant.name, hazard_name);
            self.log.push(message, EventKind::Success);
        } else {
            participant.position = participant.position.saturating_sub(1).max(1);
            let message = format!(
                "{} fails against {} and loses ground (position {})",
                participant.name, hazard_name, participant.position
            );
            self.log.push(message, EventKind::Failure);
        }
    }

    /// Roll movement for every active participant: 1d6 plus a speed bonus
    /// of floor((speed - 5) / 2), never less than 1 in total.
    pub fn roll_movement(&mut self) {
        if self.status != TrackerStatus::Active {
            return;
        }
        let ids: Vec<ParticipantId> = self
            .participants
            .iter()
            .filter(|p| p.is_active())
            .map(|p| p.id)
            .collect();
        for id in ids {
            let Some(speed) = self
                .participants
                .iter()
                .find(|p| p.id == id)
                .map(|p| p.speed)
            else {
                continue;
            };
            let roll = dice::d6(self.rng());
            let movement = (roll + (speed - 5).div_euclid(2)).max(1);
            self.move_participant(id, movement);
        }
    }

    pub fn next_round(&mut self) {
        if self.status != TrackerStatus::Active {
            return;
        }
        self.current_round += 1;
        self.log.push(
            format!("--- Round {} ---", self.current_round),
            EventKind::Round,
        );
    }

    pub fn set_participant_status(&mut self, id: ParticipantId, status: ParticipantStatus) {
        let Some(participant) = self.participants.iter_mut().find(|p| p.id == id) else {
            return;
        };
        participant.status = status;
        let label = match status {
            ParticipantStatus::Active => "is back in the chase",
            ParticipantStatus::Caught => "has been CAUGHT!",
            ParticipantStatus::Escaped => "has ESCAPED!",
            ParticipantStatus::Incapacitated => "is incapacitated",
        };
        let kind = match status {
            ParticipantStatus::Caught | ParticipantStatus::Incapacitated => EventKind::Failure,
            ParticipantStatus::Escaped => EventKind::Success,
            ParticipantStatus::Active => EventKind::Normal,
        };
        let message = format!("{} {label}", participant.name);
        self.log.push(message, kind);
    }

    /// Terminal: the chase cannot resume once ended.
    pub fn end_chase(&mut self) {
        self.status = TrackerStatus::Ended;
        self.log.push("--- Chase Ended ---", EventKind::Important);
    }

    /// Clear everything back to setup.
    pub fn reset(&mut self) {
        let seed = self.seed;
        *self = Self::default().with_seed(seed);
        self.log.push("Chase tracker reset", EventKind::Normal);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chase() -> (ChaseTracker, ParticipantId, ParticipantId) {
        let mut t = ChaseTracker::new().with_seed(7);
        let runner = t.add_participant("Harvey", CombatantKind::Investigator, 8);
        let pursuer = t.add_participant("Hound", CombatantKind::Enemy, 9);
        assert!(t.start_chase());
        (t, runner, pursuer)
    }

    #[test]
    fn start_requires_two_participants() {
        let mut t = ChaseTracker::new();
        t.add_participant("Harvey", CombatantKind::Investigator, 8);
        assert!(!t.start_chase());
        t.add_participant("Hound", CombatantKind::Enemy, 9);
        assert!(t.start_chase());
        assert_eq!(t.current_round, 1);
    }

    #[test]
    fn forward_movement_clamps_to_track() {
        let (mut t, runner, _) = chase();
        t.set_track_length(10);
        let out = t.move_participant(runner, 4);
        assert_eq!(out, MoveOutcome::Moved { position: 5 });
        // Backward past the start clamps to 1.
        let out = t.move_participant(runner, -20);
        assert_eq!(out, MoveOutcome::Moved { position: 1 });
    }

    #[test]
    fn nearest_unpassed_hazard_intercepts_forward_movement() {
        let (mut t, runner, _) = chase();
        t.move_participant(runner, 1); // position 2
        let hazard = t.add_hazard(5, "Locked gate", "Locksmith");
        t.add_hazard(7, "Barbed fence", "Climb");

        let out = t.move_participant(runner, 6);
        assert_eq!(
            out,
            MoveOutcome::Blocked {
                hazard_id: hazard,
                position: 5
            }
        );
        let p = t.participants.iter().find(|p| p.id == runner).unwrap();
        assert_eq!(p.position, 5);
    }

    #[test]
    fn passed_hazards_do_not_block_again() {
        let (mut t, runner, _) = chase();
        let hazard = t.add_hazard(3, "Locked gate", "Locksmith");
        assert!(matches!(
            t.move_participant(runner, 4),
            MoveOutcome::Blocked { .. }
        ));
        t.resolve_hazard(runner, hazard, true);
        let out = t.move_participant(runner, 2);
        assert_eq!(out, MoveOutcome::Moved { position: 5 });
    }

    #[test]
    fn failed_hazard_check_loses_ground() {
        let (mut t, runner, _) = chase();
        let hazard = t.add_hazard(3, "Locked gate", "Locksmith");
        t.move_participant(runner, 4);
        t.resolve_hazard(runner, hazard, false);
        let p = t.participants.iter().find(|p| p.id == runner).unwrap();
        assert_eq!(p.position, 2);
    }

    #[test]
    fn failure_at_position_one_stays_at_one() {
        let (mut t, runner, _) = chase();
        let hazard = t.add_hazard(1, "Mud pit", "Jump");
        t.resolve_hazard(runner, hazard, false);
        let p = t.participants.iter().find(|p| p.id == runner).unwrap();
        assert_eq!(p.position, 1);
    }

    #[test]
    fn backward_movement_ignores_hazards() {
        let (mut t, runner, _) = chase();
        let hazard = t.add_hazard(3, "Locked gate", "Locksmith");
        t.resolve_hazard(runner, hazard, true);
        t.move_participant(runner, 4); // position 5
        let out = t.move_participant(runner, -3);
        assert_eq!(out, MoveOutcome::Moved { position: 2 });
    }

    #[test]
    fn reaching_track_end_escapes_once() {
        let (mut t, runner, _) = chase();
        t.set_track_length(5);
        let out = t.move_participant(runner, 10);
        assert_eq!(out, MoveOutcome::Escaped);
        let p = t.participants.iter().find(|p| p.id == runner).unwrap();
        assert_eq!(p.status, ParticipantStatus::Escaped);
        // Escaped participants no longer move or re-trigger the escape.
        assert_eq!(t.move_participant(runner, 1), MoveOutcome::Ignored);
    }

    #[test]
    fn hazard_on_the_final_segment_does_not_trap_escapers() {
        let (mut t, runner, _) = chase();
        t.set_track_length(5);
        t.add_hazard(5, "Chained door", "Strength");
        let out = t.move_participant(runner, 10);
        assert_eq!(out, MoveOutcome::Escaped);
        let p = t.participants.iter().find(|p| p.id == runner).unwrap();
        assert_eq!(p.status, ParticipantStatus::Escaped);
        assert_eq!(p.position, 5);
    }

    #[test]
    fn movement_roll_has_a_floor_of_one() {
        let mut t = ChaseTracker::new().with_seed(11);
        let slow = t.add_participant("Shambler", CombatantKind::Enemy, 1);
        t.add_participant("Harvey", CombatantKind::Investigator, 8);
        t.start_chase();
        for _ in 0..10 {
            let before = t.participants.iter().find(|p| p.id == slow).unwrap().position;
            t.roll_movement();
            let p = t.participants.iter().find(|p| p.id == slow).unwrap();
            if p.status != ParticipantStatus::Active {
                break;
            }
            assert!(p.position > before || p.position == t.track_length);
        }
    }

    #[test]
    fn track_length_cannot_drop_below_two() {
        let mut t = ChaseTracker::new();
        t.set_track_length(0);
        assert_eq!(t.track_length, 2);
    }

    #[test]
    fn aggregate_serializes_with_session_layout() {
        let (mut t, _, _) = chase();
        t.add_hazard(4, "Locked gate", "Locksmith");
        let json = serde_json::to_value(&t).unwrap();
        assert!(json.get("participants").is_some());
        assert!(json.get("hazards").is_some());
        assert_eq!(json["trackLength"], 10);
        assert_eq!(json["currentRound"], 1);
        assert_eq!(json["status"], "active");
        assert!(json.get("log").is_none(), "log stays session-local");
        assert_eq!(json["participants"][0]["type"], "investigator");

        let back: ChaseTracker = serde_json::from_value(json).unwrap();
        assert_eq!(back.participants, t.participants);
        assert_eq!(back.hazards, t.hazards);
    }
}
