//! Match rule-sets.
//!
//! A mode is a pair of stateless predicates deciding whether a fighter
//! may presently be picked or banned. Changing mode mid-match never
//! invalidates rounds that were legal when they were played.

use crate::arena::player::Player;
use crate::roster::FighterId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Anything goes, except fighters you banned yourself.
    Open,
    /// You cannot repeat your own picks.
    Elimination,
    /// Nobody can repeat anyone's picks or bans.
    Lockout,
    /// A fighter that has taken a round is retired for everyone.
    AroundTheHorn,
}

impl Mode {
    /// Parse a mode from its command-line name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "open" => Some(Self::Open),
            "elimination" | "elim" => Some(Self::Elimination),
            "lockout" => Some(Self::Lockout),
            "horn" | "around-the-horn" | "aroundthehorn" => Some(Self::AroundTheHorn),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Elimination => "elimination",
            Self::Lockout => "lockout",
            Self::AroundTheHorn => "around-the-horn",
        }
    }

    /// May `who` pick `fighter` right now?
    pub fn pick_check(
        &self,
        who: &Player,
        everyone: &[Player],
        fighter: FighterId,
    ) -> Result<(), &'static str> {
        match self {
            Self::Open => {
                if who.has_banned(fighter) {
                    return Err("you banned them");
                }
            }
            Self::Elimination => {
                if who.has_played(fighter) {
                    return Err("you already played them");
                }
                if who.has_banned(fighter) {
                    return Err("you banned them");
                }
            }
            Self::Lockout => {
                if everyone.iter().any(|p| p.has_played(fighter)) {
                    return Err("they were already played this match");
                }
                if everyone.iter().any(|p| p.has_banned(fighter)) {
                    return Err("they are banned this match");
                }
            }
            Self::AroundTheHorn => {
                if who.has_banned(fighter) {
                    return Err("you banned them");
                }
                if everyone.iter().any(|p| p.has_won_with(fighter)) {
                    return Err("they already took a round");
                }
            }
        }
        Ok(())
    }

    /// May `who` ban `fighter` right now?
    pub fn ban_check(
        &self,
        who: &Player,
        everyone: &[Player],
        fighter: FighterId,
    ) -> Result<(), &'static str> {
        match self {
            Self::Open => {
                if who.has_banned(fighter) {
                    return Err("you already banned them");
                }
            }
            Self::Elimination => {
                if everyone.iter().all(|p| p.has_played(fighter)) {
                    return Err("everyone has already played them");
                }
                if who.has_banned(fighter) {
                    return Err("you already banned them");
                }
            }
            Self::Lockout => {
                if everyone.iter().any(|p| p.has_played(fighter)) {
                    return Err("they were already played this match");
                }
                if everyone.iter().any(|p| p.has_banned(fighter)) {
                    return Err("they are already banned this match");
                }
            }
            Self::AroundTheHorn => {
                if who.has_banned(fighter) {
                    return Err("you already banned them");
                }
                if everyone.iter().any(|p| p.has_won_with(fighter)) {
                    return Err("they already took a round");
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::pick::Pick;

    const F: FighterId = 0;
    const G: FighterId = 1;

    fn two_players() -> Vec<Player> {
        vec![Player::new(1, "A"), Player::new(2, "B")]
    }

    #[test]
    fn test_from_name() {
        assert_eq!(Mode::from_name("open"), Some(Mode::Open));
        assert_eq!(Mode::from_name("ELIM"), Some(Mode::Elimination));
        assert_eq!(Mode::from_name("elimination"), Some(Mode::Elimination));
        assert_eq!(Mode::from_name("lockout"), Some(Mode::Lockout));
        assert_eq!(Mode::from_name("horn"), Some(Mode::AroundTheHorn));
        assert_eq!(Mode::from_name("around-the-horn"), Some(Mode::AroundTheHorn));
        assert_eq!(Mode::from_name("speedrun"), None);
    }

    #[test]
    fn test_open_allows_repeats_blocks_own_bans() {
        let mut players = two_players();
        players[0].play(Pick::Fighter(F), None);
        players[0].ban(G, 0);

        let (a, rest) = players.split_first().unwrap();
        assert!(Mode::Open.pick_check(a, &players, F).is_ok());
        assert!(Mode::Open.pick_check(a, &players, G).is_err());
        assert!(Mode::Open.ban_check(a, &players, G).is_err());
        // B is unaffected by A's ban.
        assert!(Mode::Open.pick_check(&rest[0], &players, G).is_ok());
    }

    #[test]
    fn test_elimination_blocks_own_repeats_only() {
        let mut players = two_players();
        players[0].play(Pick::Fighter(F), None);

        let a = &players[0];
        let b = &players[1];
        assert!(Mode::Elimination.pick_check(a, &players, F).is_err());
        assert!(Mode::Elimination.pick_check(b, &players, F).is_ok());
    }

    #[test]
    fn test_elimination_ban_rejected_once_everyone_played() {
        let mut players = two_players();
        players[0].play(Pick::Fighter(F), None);

        // Only one of two players has played F: banning is still useful.
        assert!(Mode::Elimination.ban_check(&players[1], &players, F).is_ok());

        players[1].play(Pick::Fighter(F), None);
        assert!(Mode::Elimination
            .ban_check(&players[1], &players, F)
            .is_err());
    }

    #[test]
    fn test_lockout_locks_for_everyone() {
        let mut players = two_players();
        players[0].play(Pick::Fighter(F), None);

        for p in &players {
            assert!(Mode::Lockout.pick_check(p, &players, F).is_err());
            assert!(Mode::Lockout.ban_check(p, &players, F).is_err());
        }
        assert!(Mode::Lockout.pick_check(&players[0], &players, G).is_ok());
    }

    #[test]
    fn test_lockout_ban_locks_picks() {
        let mut players = two_players();
        players[1].ban(F, 0);

        assert!(Mode::Lockout.pick_check(&players[0], &players, F).is_err());
        assert!(Mode::Lockout.ban_check(&players[0], &players, F).is_err());
    }

    #[test]
    fn test_around_the_horn_retires_winners() {
        let mut players = two_players();
        players[0].play(Pick::Fighter(F), None);

        // Played but not won: still available to everyone.
        for p in &players {
            assert!(Mode::AroundTheHorn.pick_check(p, &players, F).is_ok());
        }

        players[0].win(Some(0));
        for p in &players {
            assert!(Mode::AroundTheHorn.pick_check(p, &players, F).is_err());
            assert!(Mode::AroundTheHorn.ban_check(p, &players, F).is_err());
        }
        assert!(Mode::AroundTheHorn
            .pick_check(&players[1], &players, G)
            .is_ok());
    }
}
