//! Turn controller
//!
//! The human always plays white, the automated opponent always plays black. The session
//! owns all the game state and is driven by explicit commands, each of them returning an
//! [`Update`] that describes what the host should redraw or schedule.

use crate::api::{GameReport, GameResult};
use crate::bitboard::Bitboard;
use crate::board::Board;
use crate::config::GameConfig;
use crate::history::MoveHistory;
use crate::movegen;
use crate::moves::{self, Move, MoveRecord};
use crate::opponent;
use crate::types::{Cell, Color, Coord, Outcome, Status, WinReason};

use rand::Rng;
use tracing::{debug, info, warn};

/// Side controlled by the player
pub const HUMAN: Color = Color::White;
/// Side controlled by the automated opponent
pub const COMPUTER: Color = Color::Black;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum SessionState {
    AwaitingHumanSelection,
    AwaitingHumanDestination,
    AwaitingAutomatedMove,
    GameOver,
}

/// Piece picked up by the player
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Selection {
    pub coord: Coord,
    pub cell: Cell,
}

/// Permission for the automated opponent to make its move
///
/// A ticket is only honored if nothing happened to the session since it was issued.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct OpponentTicket {
    generation: u64,
}

impl OpponentTicket {
    #[inline]
    pub(crate) const fn new(generation: u64) -> OpponentTicket {
        OpponentTicket { generation }
    }

    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Result of a session command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Update {
    /// The board or the selection changed
    pub render: bool,
    /// New status line
    pub status: Option<Status>,
    /// The opponent must move once the ticket is delivered to [`Session::play_opponent`]
    pub schedule: Option<OpponentTicket>,
    /// Move committed by the command
    pub record: Option<MoveRecord>,
}

impl Update {
    #[inline]
    fn none() -> Update {
        Update::default()
    }

    #[inline]
    fn render() -> Update {
        Update {
            render: true,
            ..Update::default()
        }
    }

    /// Returns `true` if the command was ignored
    #[inline]
    pub fn is_noop(&self) -> bool {
        *self == Update::default()
    }
}

/// Single game against the automated opponent
#[derive(Debug, Clone)]
pub struct Session {
    board: Board,
    selection: Option<Selection>,
    destinations: Bitboard,
    history: MoveHistory,
    side: Color,
    state: SessionState,
    outcome: Option<Outcome>,
    config: GameConfig,
    generation: u64,
}

impl Session {
    /// Starts a game from the initial position
    pub fn new(config: GameConfig) -> Session {
        Self::with_board(Board::initial(), config)
    }

    /// Starts a game from an arbitrary position, white to move
    pub fn with_board(board: Board, config: GameConfig) -> Session {
        info!(
            difficulty = %config.difficulty,
            time_control = %config.time_control(),
            "new game"
        );
        Session {
            board,
            selection: None,
            destinations: Bitboard::EMPTY,
            history: MoveHistory::new(),
            side: HUMAN,
            state: SessionState::AwaitingHumanSelection,
            outcome: None,
            config,
            generation: 0,
        }
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[inline]
    pub fn selection(&self) -> Option<Selection> {
        self.selection
    }

    /// Legal destinations of the selected piece, empty if nothing is selected
    #[inline]
    pub fn destinations(&self) -> Bitboard {
        self.destinations
    }

    #[inline]
    pub fn history(&self) -> &MoveHistory {
        &self.history
    }

    /// Active side
    #[inline]
    pub fn side(&self) -> Color {
        self.side
    }

    #[inline]
    pub fn state(&self) -> SessionState {
        self.state
    }

    #[inline]
    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    #[inline]
    pub fn is_over(&self) -> bool {
        self.state == SessionState::GameOver
    }

    #[inline]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Current status line
    pub fn status(&self) -> Status {
        match (self.outcome, self.side) {
            (Some(outcome), _) => Status::Finished(outcome),
            (None, Color::White) => Status::WhiteToMove,
            (None, Color::Black) => Status::ComputerThinking,
        }
    }

    /// Handles a click on the square `coord`
    ///
    /// Clicking a legal destination of the selected piece commits the move. Clicking a
    /// white piece selects it. Clicking anything else drops the selection. Clicks during
    /// the opponent's turn or after the game is over are ignored.
    pub fn select(&mut self, coord: Coord) -> Update {
        match self.state {
            SessionState::AwaitingHumanSelection | SessionState::AwaitingHumanDestination => {}
            SessionState::AwaitingAutomatedMove | SessionState::GameOver => {
                debug!(%coord, state = ?self.state, "click ignored");
                return Update::none();
            }
        }

        if let Some(sel) = self.selection {
            if self.destinations.has(coord) {
                return self.commit_human(Move::new(sel.coord, coord));
            }
        }

        let cell = self.board.get(coord);
        if cell.has_color(HUMAN) {
            self.destinations = movegen::legal_destinations_with(
                &self.board,
                cell,
                coord,
                self.config.pawn_direction,
            );
            self.selection = Some(Selection { coord, cell });
            self.state = SessionState::AwaitingHumanDestination;
            debug!(%coord, destinations = %self.destinations, "selected");
            return Update::render();
        }

        if self.selection.is_some() {
            self.clear_selection();
            debug!(%coord, "selection cleared");
            return Update::render();
        }
        Update::none()
    }

    fn clear_selection(&mut self) {
        self.selection = None;
        self.destinations = Bitboard::EMPTY;
        self.state = SessionState::AwaitingHumanSelection;
    }

    fn commit(&mut self, mv: Move) -> MoveRecord {
        let record = moves::apply_move_with(&mut self.board, mv, self.config.pawn_direction);
        info!(side = self.side.name(), notation = %record.notation, "move");
        self.history.push(record.notation.clone());
        record
    }

    /// Runs the terminal check, returning the outcome if the game is over
    fn check_terminal(&mut self) -> Option<Outcome> {
        if movegen::has_moves(&self.board, HUMAN, self.config.pawn_direction) {
            return None;
        }
        let outcome = Outcome::win(HUMAN.inv(), WinReason::Checkmate);
        self.finish(outcome);
        Some(outcome)
    }

    fn finish(&mut self, outcome: Outcome) {
        self.clear_selection();
        self.outcome = Some(outcome);
        self.state = SessionState::GameOver;
        self.generation += 1;
        info!(%outcome, moves = self.history.len(), "game over");
    }

    fn commit_human(&mut self, mv: Move) -> Update {
        let record = self.commit(mv);
        self.clear_selection();
        self.side = COMPUTER;

        if let Some(outcome) = self.check_terminal() {
            return Update {
                render: true,
                status: Some(Status::Finished(outcome)),
                schedule: None,
                record: Some(record),
            };
        }

        self.state = SessionState::AwaitingAutomatedMove;
        self.generation += 1;
        Update {
            render: true,
            status: Some(Status::ComputerThinking),
            schedule: Some(OpponentTicket::new(self.generation)),
            record: Some(record),
        }
    }

    /// Makes the automated opponent's move
    ///
    /// Tickets issued before a resignation, a new game, or an earlier opponent move are
    /// ignored. If the opponent has no moves, the turn passes back to white.
    pub fn play_opponent<R: Rng + ?Sized>(
        &mut self,
        ticket: OpponentTicket,
        rng: &mut R,
    ) -> Update {
        if self.state != SessionState::AwaitingAutomatedMove || ticket.generation != self.generation
        {
            warn!(
                ticket = ticket.generation,
                generation = self.generation,
                "stale opponent ticket"
            );
            return Update::none();
        }

        let chosen = opponent::choose_move(
            &self.board,
            COMPUTER,
            self.config.difficulty,
            self.config.pawn_direction,
            rng,
        );
        let record = match chosen {
            Some(mv) => Some(self.commit(mv)),
            None => {
                warn!("computer has no moves, passing the turn");
                self.history.push_pass();
                None
            }
        };
        self.side = HUMAN;
        self.state = SessionState::AwaitingHumanSelection;
        self.generation += 1;

        let status = match self.check_terminal() {
            Some(outcome) => Status::Finished(outcome),
            None => Status::WhiteToMove,
        };
        Update {
            render: true,
            status: Some(status),
            schedule: None,
            record,
        }
    }

    /// Resigns the game on behalf of the player
    ///
    /// The win is credited to the side which is not active. Ignored if the game is over.
    pub fn resign(&mut self) -> Update {
        if self.is_over() {
            return Update::none();
        }
        let outcome = Outcome::win(self.side.inv(), WinReason::Resign);
        self.finish(outcome);
        Update {
            render: true,
            status: Some(Status::Finished(outcome)),
            ..Update::default()
        }
    }

    /// Discards the current game and starts a new one with `config`
    pub fn new_game(&mut self, config: GameConfig) -> Update {
        let generation = self.generation + 1;
        *self = Session::new(config);
        self.generation = generation;
        Update {
            render: true,
            status: Some(Status::WhiteToMove),
            ..Update::default()
        }
    }

    /// Starts a new game with the same configuration
    pub fn restart(&mut self) -> Update {
        self.new_game(self.config.clone())
    }

    /// Builds the report of the finished game, as expected by the account service
    ///
    /// Returns `None` while the game is in progress.
    pub fn report(&self) -> Option<GameReport> {
        let outcome = self.outcome?;
        Some(GameReport {
            result: GameResult::from_outcome(outcome, HUMAN),
            moves: self.history.iter().map(str::to_string).collect(),
            difficulty: self.config.difficulty,
            time_control: self.config.time_control(),
        })
    }
}

impl Default for Session {
    fn default() -> Session {
        Session::new(GameConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::movegen::PawnDirection;
    use crate::opponent::Difficulty;
    use crate::types::Piece;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn sq(s: &str) -> Coord {
        s.parse().unwrap()
    }

    fn by_color(difficulty: Difficulty) -> GameConfig {
        GameConfig {
            difficulty,
            pawn_direction: PawnDirection::ByColor,
            ..GameConfig::default()
        }
    }

    #[test]
    fn test_select() {
        let mut s = Session::default();
        assert_eq!(s.state(), SessionState::AwaitingHumanSelection);
        assert_eq!(s.status(), Status::WhiteToMove);

        assert!(s.select(sq("e4")).is_noop());
        assert!(s.select(sq("e7")).is_noop());
        assert_eq!(s.state(), SessionState::AwaitingHumanSelection);

        let u = s.select(sq("e2"));
        assert!(u.render);
        assert_eq!(s.state(), SessionState::AwaitingHumanDestination);
        assert_eq!(
            s.selection(),
            Some(Selection {
                coord: sq("e2"),
                cell: Cell::from_parts(Color::White, Piece::Pawn),
            })
        );
        assert_eq!(
            s.destinations(),
            Bitboard::EMPTY.with(sq("e3")).with(sq("e4"))
        );

        s.select(sq("d2"));
        assert_eq!(s.selection().map(|x| x.coord), Some(sq("d2")));
        assert!(s.destinations().has(sq("d4")));

        s.select(sq("g1"));
        assert_eq!(s.selection().map(|x| x.coord), Some(sq("g1")));
        assert!(s.destinations().is_empty());

        let u = s.select(sq("e5"));
        assert!(u.render);
        assert_eq!(s.selection(), None);
        assert_eq!(s.state(), SessionState::AwaitingHumanSelection);
        assert_eq!(s.board(), &Board::initial());
    }

    #[test]
    fn test_first_move() {
        let mut s = Session::default();
        s.select(sq("e2"));
        let u = s.select(sq("e4"));
        let record = u.record.unwrap();
        assert_eq!(record.notation, "e2-e4");
        assert_eq!(u.status, Some(Status::ComputerThinking));
        let ticket = u.schedule.unwrap();
        assert_eq!(s.side(), Color::Black);
        assert_eq!(s.state(), SessionState::AwaitingAutomatedMove);
        assert_eq!(s.selection(), None);
        assert_eq!(s.history().iter().collect::<Vec<_>>(), vec!["e2-e4"]);

        // No clicks during the opponent's turn
        assert!(s.select(sq("d2")).is_noop());

        // Black pawns are blocked by their own back rank
        let mut rng = StdRng::seed_from_u64(0);
        let u = s.play_opponent(ticket, &mut rng);
        assert_eq!(u.record, None);
        assert_eq!(u.status, Some(Status::WhiteToMove));
        assert_eq!(s.side(), Color::White);
        assert_eq!(s.state(), SessionState::AwaitingHumanSelection);
        assert!(!s.is_over());

        // The same ticket can't be used twice
        assert!(s.play_opponent(ticket, &mut rng).is_noop());
    }

    #[test]
    fn test_pass_keeps_pairs() {
        let mut s = Session::default();
        let mut rng = StdRng::seed_from_u64(3);
        for (src, dst) in [("e2", "e4"), ("d2", "d4")] {
            s.select(sq(src));
            let ticket = s.select(sq(dst)).schedule.unwrap();
            let u = s.play_opponent(ticket, &mut rng);
            assert_eq!(u.record, None);
        }
        assert_eq!(
            s.history().lines().collect::<Vec<_>>(),
            vec!["1. e2-e4 ...", "2. d2-d4 ..."]
        );

        s.resign();
        assert_eq!(s.report().unwrap().moves, vec!["e2-e4", "...", "d2-d4", "..."]);
    }

    #[test]
    fn test_alternation() {
        let mut s = Session::new(by_color(Difficulty::Easy));
        let mut rng = StdRng::seed_from_u64(17);
        let mut sides = Vec::new();
        for (src, dst) in [("a2", "a3"), ("b2", "b3"), ("c2", "c3")] {
            sides.push(s.side());
            s.select(sq(src));
            let u = s.select(sq(dst));
            let ticket = u.schedule.unwrap();
            sides.push(s.side());
            let u = s.play_opponent(ticket, &mut rng);
            assert!(u.record.is_some());
        }
        sides.push(s.side());
        assert_eq!(
            sides,
            vec![
                Color::White,
                Color::Black,
                Color::White,
                Color::Black,
                Color::White,
                Color::Black,
                Color::White
            ]
        );
        assert_eq!(s.history().len(), 6);
        assert_eq!(s.history().lines().count(), 3);
        assert_eq!(s.board().count(Color::Black), 16);
    }

    #[test]
    fn test_capture_notation() {
        let b = Board::from_cells("4k3/8/8/3p4/4P3/8/8/4K3").unwrap();
        let mut s = Session::with_board(b, GameConfig::default());
        s.select(sq("e4"));
        assert!(s.destinations().has(sq("d5")));
        let u = s.select(sq("d5"));
        let record = u.record.unwrap();
        assert_eq!(record.notation, "e4xd5");
        assert!(record.capture);
        assert_eq!(s.board().count(Color::Black), 1);
    }

    #[test]
    fn test_promotion() {
        let b = Board::from_cells("4k3/P7/8/8/8/8/7P/4K3").unwrap();
        let mut s = Session::with_board(b, GameConfig::default());
        s.select(sq("a7"));
        let u = s.select(sq("a8"));
        assert!(u.record.unwrap().promotion);
        assert_eq!(
            s.board().get(Coord::from_row_col(0, 0)),
            Cell::from_parts(Color::White, Piece::Queen)
        );
    }

    #[test]
    fn test_checkmate_after_own_move() {
        let b = Board::from_cells("8/8/8/4p3/8/4P3/8/8").unwrap();
        let mut s = Session::with_board(b, GameConfig::default());
        s.select(sq("e3"));
        let u = s.select(sq("e4"));
        let outcome = Outcome::win(Color::Black, WinReason::Checkmate);
        assert_eq!(u.status, Some(Status::Finished(outcome)));
        assert_eq!(u.schedule, None);
        assert!(s.is_over());
        assert_eq!(s.outcome(), Some(outcome));
        assert_eq!(s.status().to_string(), "Checkmate! Black wins!");

        assert!(s.select(sq("e4")).is_noop());
        assert!(s.resign().is_noop());
        assert_eq!(s.outcome(), Some(outcome));
    }

    #[test]
    fn test_checkmate_after_opponent_move() {
        let b = Board::from_cells("8/8/8/3p4/8/4P3/8/8").unwrap();
        let mut s = Session::with_board(b, by_color(Difficulty::Hard));
        s.select(sq("e3"));
        let u = s.select(sq("e4"));
        assert_eq!(u.status, Some(Status::ComputerThinking));

        let mut rng = StdRng::seed_from_u64(5);
        let u = s.play_opponent(u.schedule.unwrap(), &mut rng);
        assert_eq!(u.record.unwrap().notation, "d5xe4");
        assert!(s.is_over());
        assert_eq!(u.status.unwrap().to_string(), "Checkmate! Black wins!");
        assert_eq!(s.history().lines().collect::<Vec<_>>(), vec!["1. e3-e4 d5xe4"]);

        let report = s.report().unwrap();
        assert_eq!(report.result, GameResult::Loss);
        assert_eq!(report.moves, vec!["e3-e4", "d5xe4"]);
        assert_eq!(report.difficulty, Difficulty::Hard);
        assert_eq!(report.time_control, "10 min");
    }

    #[test]
    fn test_resign() {
        let mut s = Session::default();
        assert_eq!(s.report(), None);
        let u = s.resign();
        assert_eq!(u.status.unwrap().to_string(), "Black wins by resignation!");
        assert!(s.is_over());
        assert_eq!(s.report().unwrap().result, GameResult::Loss);

        // Resigning while the computer is thinking credits white
        let mut s = Session::default();
        s.select(sq("e2"));
        let ticket = s.select(sq("e4")).schedule.unwrap();
        let u = s.resign();
        assert_eq!(u.status.unwrap().to_string(), "White wins by resignation!");
        assert_eq!(s.report().unwrap().result, GameResult::Win);

        let mut rng = StdRng::seed_from_u64(0);
        assert!(s.play_opponent(ticket, &mut rng).is_noop());
        assert_eq!(s.history().len(), 1);
    }

    #[test]
    fn test_new_game() {
        let mut s = Session::new(by_color(Difficulty::Easy));
        s.select(sq("e2"));
        let ticket = s.select(sq("e4")).schedule.unwrap();

        let u = s.new_game(GameConfig::default());
        assert_eq!(u.status, Some(Status::WhiteToMove));
        assert!(u.render);
        assert_eq!(s.board(), &Board::initial());
        assert!(s.history().is_empty());
        assert_eq!(s.side(), Color::White);
        assert_eq!(s.config(), &GameConfig::default());

        let mut rng = StdRng::seed_from_u64(0);
        assert!(s.play_opponent(ticket, &mut rng).is_noop());
        assert_eq!(s.board(), &Board::initial());

        s.resign();
        s.restart();
        assert!(!s.is_over());
        assert_eq!(s.outcome(), None);
    }
}
