//! One in-progress match.
//!
//! The `Game` aggregates players in display order, applies the mode's
//! legality checks before any mutation, and renders the current state to
//! a platform-neutral payload. It signals terminal conditions to the
//! caller but never tears itself down; the registry owns that.

use chrono::{DateTime, Utc};

use crate::arena::mode::Mode;
use crate::arena::pick::Pick;
use crate::arena::player::{Player, UndoKind};
use crate::arena::render::{RenderField, RenderPayload, MAX_PAYLOAD_LEN, NEUTRAL_COLOR};
use crate::common::error::{ArenaError, ArenaResult};
use crate::common::types::{MemberId, Participant};
use crate::roster::{FighterId, Roster};

/// Why a match entered its ending state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Somebody reached the winning score.
    Score,
    /// A majority of active players voted to end.
    Vote,
    /// The inactivity watchdog fired unconfirmed.
    Expired,
}

/// Result of an end vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EndVote {
    pub votes: usize,
    pub needed: usize,
    pub reached: bool,
}

#[derive(Debug)]
pub struct Game {
    roster: &'static Roster,
    players: Vec<Player>,
    pub mode: Mode,
    /// Wins needed to take the set; 0 = unbounded.
    pub winning_score: u32,
    /// Per-player ban bound; 0 = unlimited.
    pub max_bans: usize,
    pub created_at: DateTime<Utc>,
    /// True once a terminal condition fired and the final render is in
    /// flight. No further operations are accepted.
    pub ending: bool,
    outcome: Option<Outcome>,
    /// Earliest rounds hidden from the display to stay under the payload
    /// size limit. Only ever grows.
    hidden_rounds: usize,
}

impl Game {
    pub fn new(
        roster: &'static Roster,
        mode: Mode,
        winning_score: u32,
        max_bans: usize,
        participants: Vec<Participant>,
    ) -> Self {
        let players = participants
            .into_iter()
            .map(|p| Player::new(p.id, p.name))
            .collect();
        Self {
            roster,
            players,
            mode,
            winning_score,
            max_bans,
            created_at: Utc::now(),
            ending: false,
            outcome: None,
            hidden_rounds: 0,
        }
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, member: MemberId) -> Option<&Player> {
        self.players.iter().find(|p| p.member == member)
    }

    fn index_of(&self, member: MemberId) -> Option<usize> {
        self.players.iter().position(|p| p.member == member)
    }

    fn ensure_open(&self) -> ArenaResult<()> {
        if self.ending {
            Err(ArenaError::MatchEnding)
        } else {
            Ok(())
        }
    }

    /// Record a pick for `member`, mode checks first. Placeholders skip
    /// the legality check.
    pub fn pick(&mut self, member: MemberId, pick: Pick, index: Option<usize>) -> ArenaResult<()> {
        self.ensure_open()?;
        let idx = self.index_of(member).ok_or(ArenaError::NotInMatch)?;
        if let Some(fighter) = pick.fighter() {
            self.mode
                .pick_check(&self.players[idx], &self.players, fighter)
                .map_err(|reason| ArenaError::IllegalPick {
                    fighter: self.roster.name(fighter).to_string(),
                    reason: reason.to_string(),
                })?;
        }
        self.players[idx].play(pick, index);
        Ok(())
    }

    pub fn ban(&mut self, member: MemberId, fighter: FighterId) -> ArenaResult<()> {
        self.ensure_open()?;
        let idx = self.index_of(member).ok_or(ArenaError::NotInMatch)?;
        self.mode
            .ban_check(&self.players[idx], &self.players, fighter)
            .map_err(|reason| ArenaError::IllegalBan {
                fighter: self.roster.name(fighter).to_string(),
                reason: reason.to_string(),
            })?;
        let max_bans = self.max_bans;
        self.players[idx].ban(fighter, max_bans);
        Ok(())
    }

    pub fn unban(&mut self, member: MemberId, fighter: FighterId) -> ArenaResult<()> {
        self.ensure_open()?;
        let idx = self.index_of(member).ok_or(ArenaError::NotInMatch)?;
        if self.players[idx].unban(fighter) {
            Ok(())
        } else {
            Err(ArenaError::NotBanned {
                fighter: self.roster.name(fighter).to_string(),
            })
        }
    }

    /// Mark a round won. Returns true when this win reaches the winning
    /// score and the caller should end the match.
    pub fn win(&mut self, member: MemberId, index: Option<usize>) -> ArenaResult<bool> {
        self.ensure_open()?;
        let idx = self.index_of(member).ok_or(ArenaError::NotInMatch)?;
        let player = &mut self.players[idx];
        let i = index
            .or_else(|| player.round_count().checked_sub(1))
            .ok_or(ArenaError::NoSuchRound { index: 0 })?;
        match player.round(i) {
            None => Err(ArenaError::NoSuchRound { index: i }),
            Some(round) if round.won => Err(ArenaError::RoundAlreadyWon { index: i }),
            Some(_) => {
                player.win(Some(i));
                Ok(self.winning_score > 0
                    && self.players[idx].wins() >= self.winning_score as usize)
            }
        }
    }

    pub fn undo(
        &mut self,
        member: MemberId,
        kind: Option<UndoKind>,
        index: Option<usize>,
    ) -> ArenaResult<()> {
        self.ensure_open()?;
        let idx = self.index_of(member).ok_or(ArenaError::NotInMatch)?;
        self.players[idx].undo(kind, index)
    }

    /// Toggle `member`'s end vote and report where the tally stands.
    pub fn vote_end(&mut self, member: MemberId) -> ArenaResult<EndVote> {
        self.ensure_open()?;
        let idx = self.index_of(member).ok_or(ArenaError::NotInMatch)?;
        self.players[idx].end_vote = !self.players[idx].end_vote;
        let votes = self.votes_to_end();
        let needed = self.votes_needed();
        Ok(EndVote {
            votes,
            needed,
            reached: votes >= needed,
        })
    }

    pub fn leave(&mut self, member: MemberId) -> ArenaResult<()> {
        self.ensure_open()?;
        let idx = self.index_of(member).ok_or(ArenaError::NotInMatch)?;
        if !self.players[idx].active {
            return Err(ArenaError::AlreadyInactive);
        }
        self.players[idx].active = false;
        Ok(())
    }

    pub fn rejoin(&mut self, member: MemberId) -> ArenaResult<()> {
        self.ensure_open()?;
        let idx = self.index_of(member).ok_or(ArenaError::NotInMatch)?;
        if self.players[idx].active {
            return Err(ArenaError::StillActive);
        }
        self.players[idx].active = true;
        Ok(())
    }

    /// Add a participant mid-match, padded with `Empty` rounds so round
    /// indices stay aligned across all players.
    pub fn add_participant(&mut self, participant: Participant) -> ArenaResult<()> {
        self.ensure_open()?;
        if self.index_of(participant.id).is_some() {
            return Err(ArenaError::AlreadyInMatch {
                name: participant.name,
            });
        }
        let rounds = self.round_count();
        let mut player = Player::new(participant.id, participant.name);
        player.pad_to(rounds);
        self.players.push(player);
        Ok(())
    }

    pub fn set_mode(&mut self, mode: Mode) -> ArenaResult<()> {
        self.ensure_open()?;
        self.mode = mode;
        Ok(())
    }

    pub fn set_winning_score(&mut self, score: u32) -> ArenaResult<()> {
        self.ensure_open()?;
        self.winning_score = score;
        Ok(())
    }

    /// Change the ban bound; every player's ban list is re-bounded,
    /// keeping the most recent bans.
    pub fn set_max_bans(&mut self, max_bans: usize) -> ArenaResult<()> {
        self.ensure_open()?;
        self.max_bans = max_bans;
        for player in &mut self.players {
            player.truncate_bans(max_bans);
        }
        Ok(())
    }

    pub fn round_count(&self) -> usize {
        self.players
            .iter()
            .map(Player::round_count)
            .max()
            .unwrap_or(0)
    }

    pub fn active_count(&self) -> usize {
        self.players.iter().filter(|p| p.active).count()
    }

    pub fn votes_to_end(&self) -> usize {
        self.players.iter().filter(|p| p.active && p.end_vote).count()
    }

    pub fn votes_needed(&self) -> usize {
        self.active_count() / 2 + 1
    }

    /// Current leader: first player in display order with the maximum
    /// win count. Ties fall to whoever was listed first.
    pub fn winner(&self) -> Option<&Player> {
        let best = self.players.iter().map(Player::wins).max()?;
        self.players.iter().find(|p| p.wins() == best)
    }

    /// Flip into the ending state. The first outcome wins; the watchdog
    /// checks `ending` before acting, so a late timer firing is a no-op.
    pub fn begin_ending(&mut self, outcome: Outcome) {
        if !self.ending {
            self.ending = true;
            self.outcome = Some(outcome);
        }
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    /// Render the current state, hiding earliest rounds as needed to stay
    /// under the payload size limit.
    pub fn render(&mut self) -> RenderPayload {
        self.render_with_limit(MAX_PAYLOAD_LEN)
    }

    pub fn render_with_limit(&mut self, limit: usize) -> RenderPayload {
        loop {
            let payload = self.build_payload();
            if payload.estimated_len() <= limit || self.hidden_rounds >= self.round_count() {
                return payload;
            }
            self.hidden_rounds += 1;
        }
    }

    fn build_payload(&self) -> RenderPayload {
        let title = match self.winning_score {
            0 => format!("Smash — {}", self.mode.name()),
            n => format!("Smash — {}, first to {}", self.mode.name(), n),
        };

        let mut description = Vec::new();
        if self.ending {
            description.push(self.outcome_line());
        } else {
            description.push(format!("Round {}", self.round_count().max(1)));
            let votes = self.votes_to_end();
            if votes > 0 {
                description.push(format!(
                    "{}/{} votes to end the match",
                    votes,
                    self.votes_needed()
                ));
            }
        }
        if self.hidden_rounds > 0 {
            description.push(format!("… first {} rounds hidden", self.hidden_rounds));
        }

        let fields = self
            .players
            .iter()
            .map(|player| {
                let mut name = player.name.clone();
                if !player.active {
                    name.push_str(" (left)");
                }
                if player.end_vote {
                    name.push_str(" ✋");
                }
                RenderField {
                    name,
                    value: self.player_lines(player),
                }
            })
            .collect();

        RenderPayload {
            title,
            description,
            fields,
            footer: "p pick · b ban · ub unban · w win · z undo · e end · r repost".to_string(),
            timestamp: self.created_at,
            color: self.accent(),
        }
    }

    fn player_lines(&self, player: &Player) -> String {
        let mut lines = vec![format!("Wins: {}", player.wins())];
        for (i, round) in player.rounds().iter().enumerate().skip(self.hidden_rounds) {
            let mark = if round.won { " ✔" } else { "" };
            lines.push(format!("{}. {}{}", i + 1, round.pick.label(self.roster), mark));
        }
        let bans: Vec<&str> = player.bans().map(|f| self.roster.name(f)).collect();
        if !bans.is_empty() {
            lines.push(format!("Banned: {}", bans.join(", ")));
        }
        lines.join("\n")
    }

    fn outcome_line(&self) -> String {
        let (name, wins) = match self.winner() {
            Some(p) => (p.name.clone(), p.wins()),
            None => ("nobody".to_string(), 0),
        };
        match self.outcome {
            Some(Outcome::Score) => format!("🏁 {} takes the set with {} wins!", name, wins),
            Some(Outcome::Vote) => {
                format!("Match ended by vote — {} leads with {} wins.", name, wins)
            }
            Some(Outcome::Expired) => {
                format!("Match expired after inactivity — {} led with {} wins.", name, wins)
            }
            None => "Match over.".to_string(),
        }
    }

    /// Accent color: the leader's most recent real pick, else neutral.
    fn accent(&self) -> u32 {
        if let Some(leader) = self.winner() {
            if let Some(fighter) = leader
                .rounds()
                .iter()
                .rev()
                .find_map(|r| r.pick.fighter())
            {
                return self.roster.color(fighter);
            }
        }
        NEUTRAL_COLOR
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game(mode: Mode, winning_score: u32) -> Game {
        Game::new(
            Roster::global(),
            mode,
            winning_score,
            0,
            vec![Participant::new(1, "Alice"), Participant::new(2, "Bob")],
        )
    }

    fn resolve(name: &str) -> crate::roster::FighterId {
        Roster::global().resolve(name).unwrap()
    }

    #[test]
    fn test_open_mode_scenario_to_two_wins() {
        let mut g = game(Mode::Open, 2);
        let f1 = resolve("link");
        let f2 = resolve("kirby");

        g.pick(1, Pick::Fighter(f1), None).unwrap();
        assert!(!g.win(1, Some(0)).unwrap());
        g.pick(2, Pick::Fighter(f2), None).unwrap();
        assert!(!g.win(2, Some(0)).unwrap());

        // Repeat pick: fine under Open, rejected under Elimination.
        let mut elim = game(Mode::Elimination, 2);
        elim.pick(1, Pick::Fighter(f1), None).unwrap();
        assert!(matches!(
            elim.pick(1, Pick::Fighter(f1), Some(1)),
            Err(ArenaError::IllegalPick { .. })
        ));

        g.pick(1, Pick::Fighter(f1), None).unwrap();
        assert!(g.win(1, Some(1)).unwrap());

        g.begin_ending(Outcome::Score);
        assert!(g.ending);
        let winner = g.winner().unwrap();
        assert_eq!(winner.name, "Alice");
        assert_eq!(winner.wins(), 2);
    }

    #[test]
    fn test_majority_vote_three_players() {
        let mut g = Game::new(
            Roster::global(),
            Mode::Open,
            0,
            0,
            vec![
                Participant::new(1, "A"),
                Participant::new(2, "B"),
                Participant::new(3, "C"),
            ],
        );
        let first = g.vote_end(1).unwrap();
        assert_eq!((first.votes, first.needed, first.reached), (1, 2, false));

        let second = g.vote_end(2).unwrap();
        assert_eq!((second.votes, second.needed, second.reached), (2, 2, true));
    }

    #[test]
    fn test_vote_toggle_retracts() {
        let mut g = game(Mode::Open, 0);
        assert_eq!(g.vote_end(1).unwrap().votes, 1);
        assert_eq!(g.vote_end(1).unwrap().votes, 0);
    }

    #[test]
    fn test_inactive_players_do_not_count_for_majority() {
        let mut g = Game::new(
            Roster::global(),
            Mode::Open,
            0,
            0,
            vec![
                Participant::new(1, "A"),
                Participant::new(2, "B"),
                Participant::new(3, "C"),
            ],
        );
        g.vote_end(1).unwrap();
        g.leave(3).unwrap();
        // Two active players now: one vote short of floor(2/2)+1 = 2.
        assert_eq!(g.votes_needed(), 2);
        assert!(g.vote_end(2).unwrap().reached);
    }

    #[test]
    fn test_illegal_pick_mutates_nothing() {
        let mut g = game(Mode::Lockout, 0);
        let f = resolve("fox");
        g.pick(1, Pick::Fighter(f), None).unwrap();
        let err = g.pick(2, Pick::Fighter(f), None).unwrap_err();
        assert!(matches!(err, ArenaError::IllegalPick { .. }));
        assert_eq!(g.player(2).unwrap().round_count(), 0);
    }

    #[test]
    fn test_placeholder_pick_skips_mode_checks() {
        let mut g = game(Mode::Lockout, 0);
        g.pick(1, Pick::Empty, None).unwrap();
        g.pick(2, Pick::Empty, None).unwrap();
        g.pick(1, Pick::Unknown, None).unwrap();
        assert_eq!(g.player(1).unwrap().round_count(), 2);
    }

    #[test]
    fn test_win_errors() {
        let mut g = game(Mode::Open, 0);
        assert!(matches!(g.win(1, None), Err(ArenaError::NoSuchRound { .. })));

        g.pick(1, Pick::Fighter(resolve("roy")), None).unwrap();
        assert!(!g.win(1, None).unwrap());
        assert!(matches!(
            g.win(1, None),
            Err(ArenaError::RoundAlreadyWon { index: 0 })
        ));
    }

    #[test]
    fn test_unbounded_score_never_signals_end() {
        let mut g = game(Mode::Open, 0);
        for i in 0..5 {
            g.pick(1, Pick::Fighter(resolve("roy")), None).unwrap();
            assert!(!g.win(1, Some(i)).unwrap());
        }
    }

    #[test]
    fn test_mode_change_keeps_old_rounds() {
        let mut g = game(Mode::Open, 0);
        let f = resolve("marth");
        g.pick(1, Pick::Fighter(f), None).unwrap();
        g.pick(1, Pick::Fighter(f), None).unwrap();

        g.set_mode(Mode::Elimination).unwrap();
        assert_eq!(g.player(1).unwrap().round_count(), 2);
        assert!(matches!(
            g.pick(1, Pick::Fighter(f), None),
            Err(ArenaError::IllegalPick { .. })
        ));
    }

    #[test]
    fn test_add_participant_pads_history() {
        let mut g = game(Mode::Open, 0);
        g.pick(1, Pick::Fighter(resolve("ike")), None).unwrap();
        g.pick(1, Pick::Fighter(resolve("roy")), None).unwrap();

        g.add_participant(Participant::new(3, "Carol")).unwrap();
        let carol = g.player(3).unwrap();
        assert_eq!(carol.round_count(), 2);
        assert!(carol.rounds().iter().all(|r| r.pick == Pick::Empty));

        assert!(matches!(
            g.add_participant(Participant::new(3, "Carol")),
            Err(ArenaError::AlreadyInMatch { .. })
        ));
    }

    #[test]
    fn test_set_max_bans_truncates_existing() {
        let mut g = game(Mode::Open, 0);
        for name in ["fox", "falco", "wolf"] {
            g.ban(1, resolve(name)).unwrap();
        }
        g.set_max_bans(1).unwrap();
        let bans: Vec<_> = g.player(1).unwrap().bans().collect();
        assert_eq!(bans, vec![resolve("wolf")]);

        // New bans keep evicting at the new bound.
        g.ban(1, resolve("fox")).unwrap();
        let bans: Vec<_> = g.player(1).unwrap().bans().collect();
        assert_eq!(bans, vec![resolve("fox")]);
    }

    #[test]
    fn test_leave_rejoin() {
        let mut g = game(Mode::Open, 0);
        g.leave(1).unwrap();
        assert!(!g.player(1).unwrap().active);
        assert_eq!(g.leave(1), Err(ArenaError::AlreadyInactive));
        assert_eq!(g.rejoin(2), Err(ArenaError::StillActive));
        g.rejoin(1).unwrap();
        assert!(g.player(1).unwrap().active);
    }

    #[test]
    fn test_no_operations_once_ending() {
        let mut g = game(Mode::Open, 0);
        g.begin_ending(Outcome::Vote);
        assert_eq!(
            g.pick(1, Pick::Fighter(resolve("roy")), None),
            Err(ArenaError::MatchEnding)
        );
        assert_eq!(g.vote_end(1), Err(ArenaError::MatchEnding));

        // First outcome sticks.
        g.begin_ending(Outcome::Expired);
        assert_eq!(g.outcome(), Some(Outcome::Vote));
    }

    #[test]
    fn test_render_hides_earliest_rounds_under_pressure() {
        let mut g = game(Mode::Open, 0);
        for _ in 0..18 {
            g.pick(1, Pick::Fighter(resolve("ganondorf")), None).unwrap();
        }
        let full = g.render_with_limit(100_000);
        assert!(full.description.iter().all(|l| !l.contains("hidden")));
        let full_len = full.estimated_len();

        let squeezed = g.render_with_limit(250);
        assert!(squeezed.estimated_len() < full_len);
        assert!(squeezed
            .description
            .iter()
            .any(|l| l.contains("rounds hidden")));
    }

    #[test]
    fn test_winner_tie_takes_first_in_display_order() {
        let mut g = game(Mode::Open, 0);
        g.pick(1, Pick::Fighter(resolve("roy")), None).unwrap();
        g.win(1, None).unwrap();
        g.pick(2, Pick::Fighter(resolve("marth")), None).unwrap();
        g.win(2, None).unwrap();
        assert_eq!(g.winner().unwrap().name, "Alice");
    }

    #[test]
    fn test_accent_follows_leader_pick() {
        let mut g = game(Mode::Open, 0);
        let payload = g.render();
        assert_eq!(payload.color, NEUTRAL_COLOR);

        let fox = resolve("fox");
        g.pick(2, Pick::Fighter(fox), None).unwrap();
        g.win(2, None).unwrap();
        let payload = g.render();
        assert_eq!(payload.color, Roster::global().color(fox));
    }
}
