//! Game session: setup editing, turn order, history and terminal detection.
//!
//! ```text
//! Setup    --start-->  Playing   (starting player can move)
//! Setup    --start-->  GameOver  (starting player stuck, opponent wins)
//! Playing  --move--->  Playing   (next player can move)
//! Playing  --move--->  GameOver  (next player stuck, mover wins)
//! Playing  --undo--->  Playing
//! GameOver --undo--->  Playing
//! any      --reset-->  Setup     (blank board at the configured size)
//! Setup    --setup_edit / resize / load_setup-->  Setup
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::config::GameConfig;
use crate::error::{ConfigError, MoveError};
use crate::notation;
use crate::{Board, Cell, CellSet, Move, Player, Pos, Variant};

/// Session phase.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Setup,
    Playing,
    GameOver,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Setup => f.write_str("setup"),
            Phase::Playing => f.write_str("playing"),
            Phase::GameOver => f.write_str("game over"),
        }
    }
}

/// One entry of the move history.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveRecord {
    /// Board as it was before the move.
    pub board: Board,
    /// Player who moved.
    pub player: Player,
    pub description: String,
    /// 1-based turn number.
    pub turn_index: usize,
    #[serde(rename = "move")]
    pub mov: Move,
}

/// Result of a command that can end the game.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum Outcome {
    /// The game continues with `to_move` on turn.
    #[serde(rename_all = "camelCase")]
    Ongoing { to_move: Player },
    /// The opponent of `winner` has no legal move.
    Won { winner: Player },
}

/// Hover preview of what a click on a cell would do.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Preview {
    Expand { group: CellSet, frontier: CellSet },
    Place { cell: Pos },
}

/// Everything a UI needs to render the session.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub board: Board,
    pub to_move: Player,
    pub phase: Phase,
    pub winner: Option<Player>,
    pub variant: Variant,
    pub history: Vec<MoveRecord>,
}

/// A single game session.
///
/// Owns the live board and the linear history of pre-move snapshots. Every
/// command either succeeds or returns a [`MoveError`] without touching state.
#[derive(Clone, Debug)]
pub struct Game {
    config: GameConfig,
    board: Board,
    /// Board the current game started from.
    setup_board: Board,
    to_move: Player,
    phase: Phase,
    winner: Option<Player>,
    history: Vec<MoveRecord>,
}

impl Game {
    /// Create a session in setup with an empty board of the configured size.
    pub fn new(config: GameConfig) -> Result<Game, ConfigError> {
        config.validate()?;
        Ok(Game::from_valid(config))
    }

    fn from_valid(config: GameConfig) -> Game {
        let board = Board::new(config.rows, config.cols);
        Game {
            to_move: config.starting_player,
            setup_board: board.clone(),
            board,
            config,
            phase: Phase::Setup,
            winner: None,
            history: Vec::new(),
        }
    }

    // ========== Observable State ==========

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Player on turn. After a game-ending move this is the stuck loser.
    #[inline]
    pub fn to_move(&self) -> Player {
        self.to_move
    }

    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[inline]
    pub fn winner(&self) -> Option<Player> {
        self.winner
    }

    #[inline]
    pub fn history(&self) -> &[MoveRecord] {
        &self.history
    }

    #[inline]
    pub fn variant(&self) -> Variant {
        self.config.variant
    }

    #[inline]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// The board being edited during setup, otherwise the board play started from.
    pub fn setup_board(&self) -> &Board {
        match self.phase {
            Phase::Setup => &self.board,
            Phase::Playing | Phase::GameOver => &self.setup_board,
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            board: self.board.clone(),
            to_move: self.to_move,
            phase: self.phase,
            winner: self.winner,
            variant: self.config.variant,
            history: self.history.clone(),
        }
    }

    /// Share text for the current game, see [`notation`].
    pub fn export(&self) -> String {
        notation::share_text(self.setup_board(), &self.history)
    }

    fn require(&self, expected: Phase) -> Result<(), MoveError> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(MoveError::WrongPhase {
                expected,
                actual: self.phase,
            })
        }
    }

    // ========== Setup ==========

    /// Cycle a cell Empty -> Blue -> Red -> Empty. Returns the new state.
    #[instrument(skip(self), fields(pos = %pos))]
    pub fn setup_edit(&mut self, pos: Pos) -> Result<Cell, MoveError> {
        self.require(Phase::Setup)?;
        let next = self.board.get(pos).cycled();
        self.board.set(pos, next);
        Ok(next)
    }

    /// Replace the setup board with an empty board of a new size.
    #[instrument(skip(self))]
    pub fn resize(&mut self, rows: u8, cols: u8) -> Result<(), ConfigError> {
        if self.phase != Phase::Setup {
            return Err(ConfigError::Locked(self.phase));
        }
        let config = GameConfig {
            rows,
            cols,
            ..self.config
        };
        config.validate()?;
        self.config = config;
        self.board = Board::new(rows, cols);
        Ok(())
    }

    /// Replace the setup board with a prepared one, e.g. from a share string.
    #[instrument(skip(self, board), fields(rows = board.rows(), cols = board.cols()))]
    pub fn load_setup(&mut self, board: Board) -> Result<(), ConfigError> {
        if self.phase != Phase::Setup {
            return Err(ConfigError::Locked(self.phase));
        }
        let config = GameConfig {
            rows: board.rows(),
            cols: board.cols(),
            ..self.config
        };
        config.validate()?;
        self.config = config;
        self.board = board;
        Ok(())
    }

    pub fn set_variant(&mut self, variant: Variant) -> Result<(), MoveError> {
        self.require(Phase::Setup)?;
        self.config.variant = variant;
        Ok(())
    }

    pub fn set_starting_player(&mut self, player: Player) -> Result<(), MoveError> {
        self.require(Phase::Setup)?;
        self.config.starting_player = player;
        self.to_move = player;
        Ok(())
    }

    // ========== Turn Sequence ==========

    /// Start play from the edited setup board with the configured settings.
    pub fn start(&mut self) -> Result<Outcome, MoveError> {
        let board = self.board.clone();
        self.start_game(self.config.starting_player, self.config.variant, board)
    }

    /// Start play from `board`.
    ///
    /// If the starting player already has no legal move the game ends at once
    /// and the other player wins.
    #[instrument(skip(self, board), fields(rows = board.rows(), cols = board.cols()))]
    pub fn start_game(
        &mut self,
        starting: Player,
        variant: Variant,
        board: Board,
    ) -> Result<Outcome, MoveError> {
        self.require(Phase::Setup)?;
        let config = GameConfig {
            rows: board.rows(),
            cols: board.cols(),
            variant,
            starting_player: starting,
            ..self.config
        };
        config
            .validate()
            .map_err(|e| MoveError::Config(e.to_string()))?;

        self.config = config;
        self.setup_board = board.clone();
        self.board = board;
        self.to_move = starting;
        self.history.clear();
        self.winner = None;
        self.phase = Phase::Playing;
        info!(%starting, ?variant, "game started");

        Ok(self.settle())
    }

    /// Legal moves of the player on turn; empty unless playing.
    pub fn legal_moves(&self) -> Vec<Move> {
        if self.phase != Phase::Playing {
            return Vec::new();
        }
        self.board.legal_moves(self.to_move, self.config.variant)
    }

    /// Apply either kind of move.
    pub fn apply(&mut self, mov: Move) -> Result<Outcome, MoveError> {
        match mov {
            Move::Expand { origin } => self.apply_expansion(origin),
            Move::Place { cell } => self.apply_placement(cell),
        }
    }

    /// Grow the active player's group at `origin` into every frontier cell.
    #[instrument(skip(self), fields(origin = %origin, player = %self.to_move))]
    pub fn apply_expansion(&mut self, origin: Pos) -> Result<Outcome, MoveError> {
        let frontier = self
            .expansion_targets(origin)
            .inspect_err(|err| debug!(%err, "expansion rejected"))?;

        let description = format!(
            "Expanded at ({}, {}) (+{})",
            origin.row + 1,
            origin.col + 1,
            frontier.len()
        );
        self.record(Move::Expand { origin }, description);

        let color = self.to_move.cell();
        for pos in frontier.iter() {
            self.board.set(pos, color);
        }
        Ok(self.finish_turn())
    }

    /// Place an isolated piece (void-expansion only).
    #[instrument(skip(self), fields(cell = %cell, player = %self.to_move))]
    pub fn apply_placement(&mut self, cell: Pos) -> Result<Outcome, MoveError> {
        self.check_placement(cell)
            .inspect_err(|err| debug!(%err, "placement rejected"))?;

        let description = format!("Placed at ({}, {})", cell.row + 1, cell.col + 1);
        self.record(Move::Place { cell }, description);

        self.board.set(cell, self.to_move.cell());
        Ok(self.finish_turn())
    }

    /// Interpret a click during play: own piece expands, empty cell places.
    pub fn move_at(&self, pos: Pos) -> Result<Move, MoveError> {
        self.require(Phase::Playing)?;
        let cell = self.board.get(pos);
        if cell == self.to_move.cell() {
            Ok(Move::Expand { origin: pos })
        } else if cell.is_empty() {
            if self.config.variant.allows_placement() {
                Ok(Move::Place { cell: pos })
            } else {
                Err(MoveError::PlacementDisabled)
            }
        } else {
            Err(MoveError::NotOwnCell {
                pos,
                player: self.to_move,
            })
        }
    }

    /// Apply whatever move a click on `pos` stands for.
    pub fn play_at(&mut self, pos: Pos) -> Result<Outcome, MoveError> {
        let mov = self.move_at(pos)?;
        self.apply(mov)
    }

    /// What clicking `pos` would do, for hover highlighting.
    pub fn preview(&self, pos: Pos) -> Option<Preview> {
        if self.phase != Phase::Playing {
            return None;
        }
        let cell = self.board.get(pos);

        if cell == self.to_move.cell() {
            let group = self.board.connected_group(pos);
            let frontier = self.board.expansion_frontier(&group);
            if !frontier.is_empty() {
                return Some(Preview::Expand { group, frontier });
            }
        }

        if self.config.variant.allows_placement()
            && cell.is_empty()
            && self.board.isolated_empty_cells(self.to_move).contains(pos)
        {
            return Some(Preview::Place { cell: pos });
        }
        None
    }

    /// Take back the last move. Returns false when there is nothing to undo.
    ///
    /// Undoing the final move of a finished game resumes play.
    #[instrument(skip(self))]
    pub fn undo(&mut self) -> bool {
        if self.phase == Phase::Setup {
            return false;
        }
        let Some(record) = self.history.pop() else {
            return false;
        };
        debug!(turn_index = record.turn_index, player = %record.player, "move undone");

        self.board = record.board;
        self.to_move = record.player;
        self.phase = Phase::Playing;
        self.winner = None;
        true
    }

    /// Return to setup with a blank board at the configured size.
    #[instrument(skip(self))]
    pub fn reset(&mut self) {
        self.phase = Phase::Setup;
        self.winner = None;
        self.history.clear();
        self.board = Board::new(self.config.rows, self.config.cols);
        self.setup_board = self.board.clone();
        self.to_move = self.config.starting_player;
    }

    fn expansion_targets(&self, origin: Pos) -> Result<CellSet, MoveError> {
        self.require(Phase::Playing)?;
        let player = self.to_move;
        if self.board.get(origin) != player.cell() {
            return Err(MoveError::NotOwnCell { pos: origin, player });
        }
        let group = self.board.connected_group(origin);
        let frontier = self.board.expansion_frontier(&group);
        if frontier.is_empty() {
            return Err(MoveError::NoFrontier(origin));
        }
        Ok(frontier)
    }

    fn check_placement(&self, cell: Pos) -> Result<(), MoveError> {
        self.require(Phase::Playing)?;
        if !self.config.variant.allows_placement() {
            return Err(MoveError::PlacementDisabled);
        }
        if !self.board.get(cell).is_empty() {
            return Err(MoveError::Occupied(cell));
        }
        let player = self.to_move;
        if !self.board.isolated_empty_cells(player).contains(cell) {
            return Err(MoveError::NotIsolated { pos: cell, player });
        }
        Ok(())
    }

    /// Push the pre-move snapshot. Must run before the board is touched.
    fn record(&mut self, mov: Move, description: String) {
        let turn_index = self.history.len() + 1;
        debug!(turn_index, %description, "move applied");
        self.history.push(MoveRecord {
            board: self.board.clone(),
            player: self.to_move,
            description,
            turn_index,
            mov,
        });
    }

    fn finish_turn(&mut self) -> Outcome {
        self.to_move = self.to_move.opponent();
        self.settle()
    }

    /// End the game if the player on turn is stuck.
    fn settle(&mut self) -> Outcome {
        if self.board.has_legal_move(self.to_move, self.config.variant) {
            return Outcome::Ongoing {
                to_move: self.to_move,
            };
        }
        let winner = self.to_move.opponent();
        self.phase = Phase::GameOver;
        self.winner = Some(winner);
        info!(%winner, loser = %self.to_move, turns = self.history.len(), "game over");
        Outcome::Won { winner }
    }
}

impl Default for Game {
    fn default() -> Self {
        Game::from_valid(GameConfig::default())
    }
}
