//! Match commands (!smash, !p, !b, !w, etc).
//!
//! Parses the short match commands, runs the precondition gates, and
//! dispatches into the engine. Domain rule violations come back as
//! transient notices; the match display is re-rendered after every
//! successful mutation.

use std::sync::Arc;

use fancy_regex::Regex;
use serenity::model::channel::Message;
use serenity::prelude::*;
use tracing::{debug, info};

use crate::arena::game::Outcome;
use crate::arena::pick::Pick;
use crate::arena::player::UndoKind;
use crate::arena::registry::MatchRegistry;
use crate::arena::render::Transport;
use crate::arena::session::MatchSession;
use crate::arena::Mode;
use crate::common::error::{AppError, ArenaError};
use crate::common::types::{ChannelKey, MemberId, Participant};
use crate::config::ArenaConfig;
use crate::roster::Roster;

/// Who issued a command, and where.
#[derive(Debug, Clone)]
pub struct CommandCtx {
    pub member: MemberId,
    pub name: String,
    pub channel: ChannelKey,
}

/// Preconditions evaluated, in order, before a command touches a match.
/// Each gate either allows or denies with a reason.
#[derive(Debug, Clone, Copy)]
enum Gate {
    /// The caller belongs to a match at all.
    InMatch,
    /// The match lives in the channel the command came from.
    SameChannel,
    /// The caller has not left the match.
    Active,
    /// The caller *has* left the match (rejoin only).
    Inactive,
}

impl Gate {
    fn check(&self, ctx: &CommandCtx, session: Option<&MatchSession>) -> Result<(), ArenaError> {
        let session = session.ok_or(ArenaError::NotInMatch)?;
        match self {
            Gate::InMatch => Ok(()),
            Gate::SameChannel => {
                if session.channel == ctx.channel {
                    Ok(())
                } else {
                    Err(ArenaError::WrongChannel)
                }
            }
            Gate::Active => {
                let player = session.game.player(ctx.member).ok_or(ArenaError::NotInMatch)?;
                if player.active {
                    Ok(())
                } else {
                    Err(ArenaError::AlreadyInactive)
                }
            }
            Gate::Inactive => {
                let player = session.game.player(ctx.member).ok_or(ArenaError::NotInMatch)?;
                if player.active {
                    Err(ArenaError::StillActive)
                } else {
                    Ok(())
                }
            }
        }
    }
}

const PLAYER_GATES: &[Gate] = &[Gate::InMatch, Gate::SameChannel, Gate::Active];
const REJOIN_GATES: &[Gate] = &[Gate::InMatch, Gate::SameChannel, Gate::Inactive];

/// What to do with the display after a successful engine mutation.
enum Flow {
    Update,
    Repost,
    Finish(Outcome),
}

/// Start-command parameters after parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
struct StartSpec {
    mode: Mode,
    winning_score: u32,
    max_bans: usize,
}

/// Command router for the match engine.
pub struct ArenaRouter {
    registry: Arc<MatchRegistry>,
    transport: Arc<dyn Transport>,
    defaults: ArenaConfig,
    mention_re: Regex,
}

impl ArenaRouter {
    pub fn new(
        registry: Arc<MatchRegistry>,
        transport: Arc<dyn Transport>,
        defaults: ArenaConfig,
    ) -> Self {
        Self {
            registry,
            transport,
            defaults,
            mention_re: Regex::new(r"<@!?(\d+)>").unwrap(),
        }
    }

    /// Parse and execute a match command (content is already
    /// prefix-stripped).
    ///
    /// Returns `true` if the message was a known command.
    pub async fn handle_command(
        &self,
        _ctx: &Context,
        msg: &Message,
        content: &str,
    ) -> anyhow::Result<bool> {
        let parts: Vec<&str> = content.splitn(2, ' ').collect();
        let command = parts[0].to_lowercase();
        let args = parts.get(1).map(|s| s.trim()).unwrap_or("");

        let cctx = CommandCtx {
            member: msg.author.id.get(),
            name: msg
                .member
                .as_ref()
                .and_then(|m| m.nick.clone())
                .unwrap_or_else(|| msg.author.name.clone()),
            channel: msg.channel_id.get(),
        };

        debug!("Processing match command: {} with args: {:?}", command, args);

        let result = match command.as_str() {
            "smash" | "start" => self.handle_start(&cctx, msg, args).await,
            "p" | "pick" | "play" => self.handle_pick(&cctx, args).await,
            "b" | "ban" => self.handle_ban(&cctx, args).await,
            "ub" | "unban" => self.handle_unban(&cctx, args).await,
            "w" | "win" => self.handle_win(&cctx, args).await,
            "z" | "undo" => self.handle_undo(&cctx, args).await,
            "c" | "change" => self.handle_change(&cctx, args).await,
            "r" | "repost" => self.handle_repost(&cctx).await,
            "e" | "end" => self.handle_end(&cctx).await,
            "a" | "add" => self.handle_add(&cctx, msg, args).await,
            "l" | "leave" => self.handle_leave(&cctx).await,
            "j" | "rejoin" => self.handle_rejoin(&cctx).await,
            "help" => {
                self.send_help(&cctx).await;
                Ok(())
            }
            _ => return Ok(false),
        };

        if let Err(err) = result {
            let _ = self
                .transport
                .notice(cctx.channel, &user_message(&err))
                .await;
        }
        Ok(true)
    }

    /// Run `op` against the caller's match, gated, then reconcile the
    /// display according to the resulting flow.
    async fn with_session<F>(&self, ctx: &CommandCtx, gates: &[Gate], op: F) -> Result<(), AppError>
    where
        F: FnOnce(&mut MatchSession) -> Result<Flow, AppError>,
    {
        let session = self.registry.session_for(ctx.member);
        let Some(session) = session else {
            for gate in gates {
                gate.check(ctx, None)?;
            }
            return Err(ArenaError::NotInMatch.into());
        };

        let mut guard = session.lock().await;
        for gate in gates {
            gate.check(ctx, Some(&guard))?;
        }

        let flow = op(&mut guard)?;
        match flow {
            Flow::Update => guard.update(self.transport.as_ref()).await,
            Flow::Repost => guard.repost(self.transport.as_ref()).await,
            Flow::Finish(outcome) => {
                guard.game.begin_ending(outcome);
                guard.finish(self.transport.as_ref()).await;
                self.registry.teardown(&mut guard);
            }
        }
        Ok(())
    }

    async fn handle_start(
        &self,
        ctx: &CommandCtx,
        msg: &Message,
        args: &str,
    ) -> Result<(), AppError> {
        let spec = parse_start_args(args, &self.defaults)?;

        let mut participants = vec![Participant::new(ctx.member, ctx.name.clone())];
        for id in mention_ids(&self.mention_re, args) {
            participants.push(Participant::new(id, mention_name(msg, id)));
        }

        let session = self.registry.create_match(
            ctx.channel,
            spec.mode,
            spec.winning_score,
            spec.max_bans,
            participants,
        )?;

        info!(
            "{} started a {} match in channel {}",
            ctx.name,
            spec.mode.name(),
            ctx.channel
        );

        let mut guard = session.lock().await;
        guard.update(self.transport.as_ref()).await;
        Ok(())
    }

    async fn handle_pick(&self, ctx: &CommandCtx, args: &str) -> Result<(), AppError> {
        let (text, round) = split_round_suffix(args);
        if text.is_empty() {
            return Err(invalid("pick", "name a fighter, e.g. `p link`"));
        }
        let pick = resolve_pick(text)?;
        let member = ctx.member;
        self.with_session(ctx, PLAYER_GATES, |s| {
            s.game.pick(member, pick, round)?;
            Ok(Flow::Update)
        })
        .await
    }

    async fn handle_ban(&self, ctx: &CommandCtx, args: &str) -> Result<(), AppError> {
        if args.is_empty() {
            return Err(invalid("ban", "name a fighter, e.g. `b fox`"));
        }
        let fighter = Roster::global().resolve(args)?;
        let member = ctx.member;
        self.with_session(ctx, PLAYER_GATES, |s| {
            s.game.ban(member, fighter)?;
            Ok(Flow::Update)
        })
        .await
    }

    async fn handle_unban(&self, ctx: &CommandCtx, args: &str) -> Result<(), AppError> {
        if args.is_empty() {
            return Err(invalid("unban", "name a fighter, e.g. `ub fox`"));
        }
        let fighter = Roster::global().resolve(args)?;
        let member = ctx.member;
        self.with_session(ctx, PLAYER_GATES, |s| {
            s.game.unban(member, fighter)?;
            Ok(Flow::Update)
        })
        .await
    }

    async fn handle_win(&self, ctx: &CommandCtx, args: &str) -> Result<(), AppError> {
        let round = parse_round(args)?;
        let member = ctx.member;
        self.with_session(ctx, PLAYER_GATES, |s| {
            let reached = s.game.win(member, round)?;
            Ok(if reached {
                Flow::Finish(Outcome::Score)
            } else {
                Flow::Update
            })
        })
        .await
    }

    async fn handle_undo(&self, ctx: &CommandCtx, args: &str) -> Result<(), AppError> {
        let (kind, round) = parse_undo_args(args)?;
        let member = ctx.member;
        self.with_session(ctx, PLAYER_GATES, |s| {
            s.game.undo(member, kind, round)?;
            Ok(Flow::Update)
        })
        .await
    }

    async fn handle_change(&self, ctx: &CommandCtx, args: &str) -> Result<(), AppError> {
        let parts: Vec<&str> = args.splitn(2, ' ').collect();
        let setting = parts[0].to_lowercase();
        let value = parts.get(1).map(|s| s.trim()).unwrap_or("");

        enum Change {
            Mode(Mode),
            Score(u32),
            Bans(usize),
        }

        let change = match setting.as_str() {
            "mode" => Change::Mode(Mode::from_name(value).ok_or(ArenaError::UnknownMode {
                name: value.to_string(),
            })?),
            "score" => Change::Score(
                value
                    .parse()
                    .map_err(|_| invalid_arena("score", "expected a number (0 = unbounded)"))?,
            ),
            "bans" => Change::Bans(
                value
                    .parse()
                    .map_err(|_| invalid_arena("bans", "expected a number (0 = unlimited)"))?,
            ),
            _ => return Err(invalid("change", "use `c mode <name>`, `c score <n>`, or `c bans <n>`")),
        };

        self.with_session(ctx, PLAYER_GATES, |s| {
            match change {
                Change::Mode(mode) => s.game.set_mode(mode)?,
                Change::Score(score) => s.game.set_winning_score(score)?,
                Change::Bans(bans) => s.game.set_max_bans(bans)?,
            }
            Ok(Flow::Update)
        })
        .await
    }

    async fn handle_repost(&self, ctx: &CommandCtx) -> Result<(), AppError> {
        self.with_session(ctx, PLAYER_GATES, |_s| Ok(Flow::Repost)).await
    }

    async fn handle_end(&self, ctx: &CommandCtx) -> Result<(), AppError> {
        let member = ctx.member;
        self.with_session(ctx, PLAYER_GATES, |s| {
            let vote = s.game.vote_end(member)?;
            Ok(if vote.reached {
                Flow::Finish(Outcome::Vote)
            } else {
                Flow::Update
            })
        })
        .await
    }

    async fn handle_add(
        &self,
        ctx: &CommandCtx,
        msg: &Message,
        args: &str,
    ) -> Result<(), AppError> {
        let ids = mention_ids(&self.mention_re, args);
        if ids.is_empty() {
            return Err(invalid("add", "mention who to add, e.g. `a @friend`"));
        }

        let session = self
            .registry
            .session_for(ctx.member)
            .ok_or(ArenaError::NotInMatch)?;
        let mut guard = session.lock().await;
        for gate in PLAYER_GATES {
            gate.check(ctx, Some(&guard))?;
        }

        for id in ids {
            let name = mention_name(msg, id);
            // Registry first: it atomically rejects members who already
            // play elsewhere, which also covers this very match.
            self.registry.register_member(id, &name, &session)?;
            guard.game.add_participant(Participant::new(id, name))?;
        }

        guard.update(self.transport.as_ref()).await;
        Ok(())
    }

    async fn handle_leave(&self, ctx: &CommandCtx) -> Result<(), AppError> {
        let member = ctx.member;
        self.with_session(ctx, PLAYER_GATES, |s| {
            s.game.leave(member)?;
            Ok(Flow::Update)
        })
        .await
    }

    async fn handle_rejoin(&self, ctx: &CommandCtx) -> Result<(), AppError> {
        let member = ctx.member;
        self.with_session(ctx, REJOIN_GATES, |s| {
            s.game.rejoin(member)?;
            Ok(Flow::Update)
        })
        .await
    }

    async fn send_help(&self, ctx: &CommandCtx) {
        let help_text = "**Match commands:**\n\
            • `smash [mode] [score] [bans=N] @p1 @p2 …` - start a match (modes: open, elimination, lockout, horn)\n\
            • `p <fighter> [round]` - pick (also `empty`, `unknown`, `random`)\n\
            • `b <fighter>` / `ub <fighter>` - ban / unban\n\
            • `w [round]` - mark a round won\n\
            • `z [p|w] [round]` - undo a play or a win\n\
            • `c mode|score|bans <value>` - change match settings\n\
            • `e` - vote to end · `r` - repost the board\n\
            • `a @user` - add a player · `l` / `j` - leave / rejoin";
        let _ = self.transport.send_text(ctx.channel, help_text).await;
    }
}

/// The message shown to users for an error, without the internal
/// subsystem prefixes.
fn user_message(err: &AppError) -> String {
    match err {
        AppError::Arena(e) => e.to_string(),
        AppError::Roster(e) => e.to_string(),
        other => other.to_string(),
    }
}

fn invalid(field: &str, message: &str) -> AppError {
    invalid_arena(field, message).into()
}

fn invalid_arena(field: &str, message: &str) -> ArenaError {
    ArenaError::InvalidSetting {
        field: field.to_string(),
        message: message.to_string(),
    }
}

/// Resolve pick text: sentinels and `random` first, fuzzy lookup last.
fn resolve_pick(text: &str) -> Result<Pick, AppError> {
    if let Some(pick) = Pick::from_token(text) {
        return Ok(pick);
    }
    let roster = Roster::global();
    if text.trim().eq_ignore_ascii_case("random") {
        return Ok(Pick::Fighter(roster.random()));
    }
    Ok(Pick::Fighter(roster.resolve(text)?))
}

/// Mention ids in the order they appear in the text.
fn mention_ids(re: &Regex, text: &str) -> Vec<MemberId> {
    re.captures_iter(text)
        .flatten()
        .filter_map(|caps| caps.get(1).and_then(|m| m.as_str().parse().ok()))
        .collect()
}

/// Display name for a mentioned user, from the message's mention list.
fn mention_name(msg: &Message, id: MemberId) -> String {
    msg.mentions
        .iter()
        .find(|u| u.id.get() == id)
        .map(|u| u.name.clone())
        .unwrap_or_else(|| format!("Player {}", id))
}

/// Split a trailing 1-based round number off a fighter query.
fn split_round_suffix(args: &str) -> (&str, Option<usize>) {
    let trimmed = args.trim();
    if let Some((head, tail)) = trimmed.rsplit_once(' ') {
        if let Ok(round) = tail.parse::<usize>() {
            if round > 0 {
                return (head.trim(), Some(round - 1));
            }
        }
    }
    (trimmed, None)
}

/// Parse an optional 1-based round argument.
fn parse_round(args: &str) -> Result<Option<usize>, AppError> {
    let trimmed = args.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    match trimmed.parse::<usize>() {
        Ok(round) if round > 0 => Ok(Some(round - 1)),
        _ => Err(invalid("round", "expected a round number starting at 1")),
    }
}

/// Parse undo arguments: optional kind (`p`/`play`, `w`/`win`) and
/// optional 1-based round.
fn parse_undo_args(args: &str) -> Result<(Option<UndoKind>, Option<usize>), AppError> {
    let mut kind = None;
    let mut round = None;
    for token in args.split_whitespace() {
        match token.to_lowercase().as_str() {
            "p" | "play" => kind = Some(UndoKind::Play),
            "w" | "win" => kind = Some(UndoKind::Win),
            other => match other.parse::<usize>() {
                Ok(n) if n > 0 => round = Some(n - 1),
                _ => return Err(invalid("undo", "use `z [p|w] [round]`")),
            },
        }
    }
    Ok((kind, round))
}

/// Parse start arguments: mode name, winning score, and `bans=N`,
/// ignoring mention tokens. Unset values fall back to the configured
/// defaults.
fn parse_start_args(args: &str, defaults: &ArenaConfig) -> Result<StartSpec, AppError> {
    let mut mode = None;
    let mut winning_score = None;
    let mut max_bans = None;

    for token in args.split_whitespace() {
        if token.starts_with("<@") {
            continue;
        }
        if let Some(value) = token.strip_prefix("bans=") {
            max_bans = Some(
                value
                    .parse()
                    .map_err(|_| invalid_arena("bans", "expected a number (0 = unlimited)"))?,
            );
            continue;
        }
        if let Ok(score) = token.parse::<u32>() {
            winning_score = Some(score);
            continue;
        }
        match Mode::from_name(token) {
            Some(parsed) => mode = Some(parsed),
            None => {
                return Err(ArenaError::UnknownMode {
                    name: token.to_string(),
                }
                .into())
            }
        }
    }

    let mode = match mode {
        Some(mode) => mode,
        // Validated at startup, but don't trust config to stay valid.
        None => Mode::from_name(&defaults.default_mode).unwrap_or(Mode::Open),
    };

    Ok(StartSpec {
        mode,
        winning_score: winning_score.unwrap_or(defaults.default_winning_score),
        max_bans: max_bans.unwrap_or(defaults.default_max_bans),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::game::Game;

    fn re() -> Regex {
        Regex::new(r"<@!?(\d+)>").unwrap()
    }

    #[test]
    fn test_mention_ids_preserve_text_order() {
        let ids = mention_ids(&re(), "lockout 3 <@!30> <@10> <@20>");
        assert_eq!(ids, vec![30, 10, 20]);
    }

    #[test]
    fn test_split_round_suffix() {
        assert_eq!(split_round_suffix("link"), ("link", None));
        assert_eq!(split_round_suffix("link 3"), ("link", Some(2)));
        assert_eq!(split_round_suffix("young link 2"), ("young link", Some(1)));
        // Round numbers are 1-based; 0 is not a round.
        assert_eq!(split_round_suffix("link 0"), ("link 0", None));
    }

    #[test]
    fn test_parse_round() {
        assert_eq!(parse_round("").unwrap(), None);
        assert_eq!(parse_round("1").unwrap(), Some(0));
        assert_eq!(parse_round("4").unwrap(), Some(3));
        assert!(parse_round("0").is_err());
        assert!(parse_round("x").is_err());
    }

    #[test]
    fn test_parse_undo_args() {
        assert_eq!(parse_undo_args("").unwrap(), (None, None));
        assert_eq!(parse_undo_args("w").unwrap(), (Some(UndoKind::Win), None));
        assert_eq!(
            parse_undo_args("play 2").unwrap(),
            (Some(UndoKind::Play), Some(1))
        );
        assert!(parse_undo_args("banana").is_err());
    }

    #[test]
    fn test_parse_start_args_defaults() {
        let defaults = ArenaConfig::default();
        let spec = parse_start_args("<@1> <@2>", &defaults).unwrap();
        assert_eq!(
            spec,
            StartSpec {
                mode: Mode::Open,
                winning_score: defaults.default_winning_score,
                max_bans: defaults.default_max_bans,
            }
        );
    }

    #[test]
    fn test_parse_start_args_full() {
        let defaults = ArenaConfig::default();
        let spec = parse_start_args("lockout 5 bans=2 <@1> <@2>", &defaults).unwrap();
        assert_eq!(
            spec,
            StartSpec {
                mode: Mode::Lockout,
                winning_score: 5,
                max_bans: 2,
            }
        );
    }

    #[test]
    fn test_parse_start_args_rejects_junk() {
        let defaults = ArenaConfig::default();
        assert!(parse_start_args("speedrun <@1>", &defaults).is_err());
        assert!(parse_start_args("open bans=lots", &defaults).is_err());
    }

    #[test]
    fn test_resolve_pick_sentinels_and_fuzzy() {
        assert_eq!(resolve_pick("empty").unwrap(), Pick::Empty);
        assert_eq!(resolve_pick("?").unwrap(), Pick::Unknown);
        assert!(matches!(resolve_pick("random").unwrap(), Pick::Fighter(_)));
        let link = Roster::global().resolve("link").unwrap();
        assert_eq!(resolve_pick("linc").unwrap(), Pick::Fighter(link));
        assert!(resolve_pick("zzzqqq").is_err());
    }

    fn session_in_channel(channel: ChannelKey) -> MatchSession {
        let game = Game::new(
            Roster::global(),
            Mode::Open,
            0,
            0,
            vec![Participant::new(1, "A"), Participant::new(2, "B")],
        );
        MatchSession::new(game, channel).0
    }

    fn ctx(member: MemberId, channel: ChannelKey) -> CommandCtx {
        CommandCtx {
            member,
            name: "A".to_string(),
            channel,
        }
    }

    #[test]
    fn test_gates_deny_in_order() {
        let mut session = session_in_channel(7);

        // No session at all: everything is NotInMatch.
        for gate in PLAYER_GATES {
            assert_eq!(gate.check(&ctx(1, 7), None), Err(ArenaError::NotInMatch));
        }

        // Wrong channel.
        assert_eq!(
            Gate::SameChannel.check(&ctx(1, 8), Some(&session)),
            Err(ArenaError::WrongChannel)
        );

        // Caller not a participant.
        assert_eq!(
            Gate::Active.check(&ctx(99, 7), Some(&session)),
            Err(ArenaError::NotInMatch)
        );

        // All gates pass for an active participant in the right channel.
        for gate in PLAYER_GATES {
            assert!(gate.check(&ctx(1, 7), Some(&session)).is_ok());
        }

        // Rejoin wants the caller inactive.
        assert_eq!(
            Gate::Inactive.check(&ctx(1, 7), Some(&session)),
            Err(ArenaError::StillActive)
        );
        session.game.leave(1).unwrap();
        assert!(Gate::Inactive.check(&ctx(1, 7), Some(&session)).is_ok());
        assert_eq!(
            Gate::Active.check(&ctx(1, 7), Some(&session)),
            Err(ArenaError::AlreadyInactive)
        );
    }
}
