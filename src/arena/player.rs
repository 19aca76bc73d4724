//! Per-participant match state.

use std::collections::VecDeque;

use crate::arena::pick::Pick;
use crate::common::error::{ArenaError, ArenaResult};
use crate::common::types::MemberId;
use crate::roster::FighterId;

/// One played round: the pick and whether it took the round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Round {
    pub pick: Pick,
    pub won: bool,
}

impl Round {
    fn new(pick: Pick) -> Self {
        Self { pick, won: false }
    }
}

/// Which half of a round an undo targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UndoKind {
    Play,
    Win,
}

/// A participant's state within one match.
///
/// The win flag lives inside `Round`, so inserting or removing a round
/// shifts the flag together with its pick; win bookkeeping follows the
/// semantic round, never the raw position.
#[derive(Debug, Clone)]
pub struct Player {
    pub member: MemberId,
    pub name: String,
    rounds: Vec<Round>,
    bans: VecDeque<FighterId>,
    /// False once the player left; an inactive player keeps their rounds.
    pub active: bool,
    /// Toggled vote to end the match.
    pub end_vote: bool,
}

impl Player {
    pub fn new(member: MemberId, name: impl Into<String>) -> Self {
        Self {
            member,
            name: name.into(),
            rounds: Vec::new(),
            bans: VecDeque::new(),
            active: true,
            end_vote: false,
        }
    }

    pub fn rounds(&self) -> &[Round] {
        &self.rounds
    }

    pub fn round(&self, index: usize) -> Option<Round> {
        self.rounds.get(index).copied()
    }

    pub fn round_count(&self) -> usize {
        self.rounds.len()
    }

    pub fn bans(&self) -> impl Iterator<Item = FighterId> + '_ {
        self.bans.iter().copied()
    }

    pub fn wins(&self) -> usize {
        self.rounds.iter().filter(|r| r.won).count()
    }

    pub fn has_played(&self, fighter: FighterId) -> bool {
        self.rounds.iter().any(|r| r.pick == Pick::Fighter(fighter))
    }

    pub fn has_banned(&self, fighter: FighterId) -> bool {
        self.bans.contains(&fighter)
    }

    pub fn has_won_with(&self, fighter: FighterId) -> bool {
        self.rounds
            .iter()
            .any(|r| r.won && r.pick == Pick::Fighter(fighter))
    }

    /// Record a pick.
    ///
    /// Without an index the round is appended. With an index beyond the
    /// last round, the gap is padded with `Empty`. An `Empty` slot at the
    /// index is overwritten in place; anything else makes this an insert,
    /// shifting later rounds (and their win flags) up by one.
    pub fn play(&mut self, pick: Pick, index: Option<usize>) {
        match index {
            None => self.rounds.push(Round::new(pick)),
            Some(i) if i >= self.rounds.len() => {
                while self.rounds.len() < i {
                    self.rounds.push(Round::new(Pick::Empty));
                }
                self.rounds.push(Round::new(pick));
            }
            Some(i) if self.rounds[i].pick.is_empty() => {
                self.rounds[i].pick = pick;
            }
            Some(i) => self.rounds.insert(i, Round::new(pick)),
        }
    }

    /// Mark a round won. Defaults to the last round. Returns false with
    /// no mutation when the round does not exist or is already won.
    pub fn win(&mut self, index: Option<usize>) -> bool {
        let i = match index.or_else(|| self.rounds.len().checked_sub(1)) {
            Some(i) => i,
            None => return false,
        };
        match self.rounds.get_mut(i) {
            Some(round) if !round.won => {
                round.won = true;
                true
            }
            _ => false,
        }
    }

    /// Take back a play or a win.
    ///
    /// Defaults to the last round. When no kind is given the play is
    /// removed, unless that round is a recorded win, in which case the
    /// caller has to say which half they mean.
    pub fn undo(&mut self, kind: Option<UndoKind>, index: Option<usize>) -> ArenaResult<()> {
        let i = match index.or_else(|| self.rounds.len().checked_sub(1)) {
            Some(i) => i,
            None => return Err(ArenaError::NothingToUndo),
        };
        let round = self
            .rounds
            .get(i)
            .copied()
            .ok_or(ArenaError::NoSuchRound { index: i })?;

        let kind = match kind {
            Some(kind) => kind,
            None if round.won => return Err(ArenaError::AmbiguousUndo),
            None => UndoKind::Play,
        };

        match kind {
            UndoKind::Play => {
                self.rounds.remove(i);
            }
            UndoKind::Win => {
                if !round.won {
                    return Err(ArenaError::NothingToUndo);
                }
                self.rounds[i].won = false;
            }
        }
        Ok(())
    }

    /// Push a ban, evicting the oldest once the bound is exceeded.
    /// A bound of 0 means unlimited.
    pub fn ban(&mut self, fighter: FighterId, max_bans: usize) {
        self.bans.push_back(fighter);
        if max_bans > 0 {
            while self.bans.len() > max_bans {
                self.bans.pop_front();
            }
        }
    }

    /// Remove a ban. Returns false when the fighter is not banned.
    pub fn unban(&mut self, fighter: FighterId) -> bool {
        match self.bans.iter().position(|&f| f == fighter) {
            Some(pos) => {
                self.bans.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Re-apply a (possibly lowered) ban bound, keeping the most recent.
    pub fn truncate_bans(&mut self, max_bans: usize) {
        if max_bans > 0 {
            while self.bans.len() > max_bans {
                self.bans.pop_front();
            }
        }
    }

    /// Pad the round history with `Empty` up to `count` rounds, so a
    /// participant added mid-match stays index-aligned with the others.
    pub fn pad_to(&mut self, count: usize) {
        while self.rounds.len() < count {
            self.rounds.push(Round::new(Pick::Empty));
        }
    }
}
