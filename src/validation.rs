//! Roster validation: composition, captaincy and budget checks
use std::collections::{HashMap, HashSet};

use crate::config::RosterRules;
use crate::error::{ValidationError, Violation};
use crate::types::{DraftRosterPlayer, Money, Player, PlayerId, Position};

/// Source of each player's value for the current week.
pub trait ValueLookup {
    fn current_value(&self, player_id: &PlayerId) -> Option<Money>;
}

impl ValueLookup for HashMap<PlayerId, Money> {
    fn current_value(&self, player_id: &PlayerId) -> Option<Money> {
        self.get(player_id).copied()
    }
}

// Uses the weekly price, never the starting price.
impl ValueLookup for [Player] {
    fn current_value(&self, player_id: &PlayerId) -> Option<Money> {
        self.iter()
            .find(|player| &player.id == player_id)
            .map(|player| player.current_value)
    }
}

impl ValueLookup for Vec<Player> {
    fn current_value(&self, player_id: &PlayerId) -> Option<Money> {
        self.as_slice().current_value(player_id)
    }
}

pub fn validate<V: ValueLookup + ?Sized>(
    roster: &[DraftRosterPlayer],
    rules: &RosterRules,
    values: &V,
) -> Result<(), ValidationError> {
    let violations = violations(roster, rules, values);
    if violations.is_empty() {
        Ok(())
    } else {
        Err(ValidationError { violations })
    }
}

/// Collects every violation in reporting order. Never short-circuits.
pub fn violations<V: ValueLookup + ?Sized>(
    roster: &[DraftRosterPlayer],
    rules: &RosterRules,
    values: &V,
) -> Vec<Violation> {
    let mut out = Vec::new();

    duplicates(roster, &mut out);
    slot_overflow(roster, rules, &mut out);

    let benched = roster.iter().filter(|entry| entry.is_benched).count();
    if benched > rules.bench_capacity {
        out.push(Violation::BenchOverflow {
            count: benched,
            capacity: rules.bench_capacity,
        });
    }

    captaincy(roster, &mut out);
    budget(roster, rules, values, &mut out);

    out
}

fn duplicates(roster: &[DraftRosterPlayer], out: &mut Vec<Violation>) {
    let mut seen = HashSet::new();
    let mut reported = HashSet::new();

    for entry in roster {
        if !seen.insert(&entry.player_id) && reported.insert(&entry.player_id) {
            out.push(Violation::DuplicatePlayer {
                player_id: entry.player_id.clone(),
            });
        }
    }
}

fn slot_overflow(roster: &[DraftRosterPlayer], rules: &RosterRules, out: &mut Vec<Violation>) {
    for position in Position::ALL {
        let count = roster
            .iter()
            .filter(|entry| !entry.is_benched && entry.slot == position)
            .count();
        let capacity = rules.slots.for_position(position);

        if count > capacity {
            out.push(Violation::SlotOverflow {
                position,
                count,
                capacity,
            });
        }
    }
}

fn captaincy(roster: &[DraftRosterPlayer], out: &mut Vec<Violation>) {
    let active_captain = roster
        .iter()
        .any(|entry| entry.is_captain && !entry.is_benched);
    if !roster.is_empty() && !active_captain {
        out.push(Violation::MissingCaptain);
    }

    let captains = roster.iter().filter(|entry| entry.is_captain).count();
    if captains > 1 {
        out.push(Violation::MultipleCaptains { count: captains });
    }

    for entry in roster.iter().filter(|e| e.is_captain && e.is_benched) {
        out.push(Violation::CaptainBenched {
            player_id: entry.player_id.clone(),
        });
    }
}

// Benched players count: they hold a squad place.
fn budget<V: ValueLookup + ?Sized>(
    roster: &[DraftRosterPlayer],
    rules: &RosterRules,
    values: &V,
    out: &mut Vec<Violation>,
) {
    let mut total: Money = 0;
    let mut unknown = Vec::new();

    for entry in roster {
        match values.current_value(&entry.player_id) {
            Some(value) => total = total.saturating_add(value),
            None => unknown.push(Violation::UnknownPlayer {
                player_id: entry.player_id.clone(),
            }),
        }
    }

    if total > rules.budget {
        out.push(Violation::BudgetExceeded {
            total,
            budget: rules.budget,
        });
    }
    out.append(&mut unknown);
}
