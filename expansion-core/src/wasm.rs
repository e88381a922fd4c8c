//! WASM bindings for expansion-core
//!
//! Provides a JavaScript-friendly API for the game session.

use wasm_bindgen::prelude::*;

use crate::notation;
use crate::{Game, GameConfig, Phase, Player, Pos, Variant};

/// WASM-friendly wrapper around Game
#[wasm_bindgen]
pub struct WasmGame {
    inner: Game,
}

#[wasm_bindgen]
impl WasmGame {
    /// Create a session in setup with an empty rows × cols board
    #[wasm_bindgen(constructor)]
    pub fn new(rows: u8, cols: u8) -> Result<WasmGame, JsError> {
        let inner = Game::new(GameConfig::with_size(rows, cols))?;
        Ok(WasmGame { inner })
    }

    /// Create a session limited to the classic 10x10 board
    pub fn classic(rows: u8, cols: u8) -> Result<WasmGame, JsError> {
        let config = GameConfig {
            rows,
            cols,
            ..GameConfig::classic()
        };
        Ok(WasmGame {
            inner: Game::new(config)?,
        })
    }

    pub fn rows(&self) -> u8 {
        self.inner.board().rows()
    }

    pub fn cols(&self) -> u8 {
        self.inner.board().cols()
    }

    /// Cell state at position: 0 (empty), 1 (blue), 2 (red)
    pub fn cell(&self, row: u8, col: u8) -> u8 {
        self.inner.board().get(Pos::new(row, col)) as u8
    }

    /// Player to move (1 or 2)
    #[wasm_bindgen(js_name = currentPlayer)]
    pub fn current_player(&self) -> u8 {
        self.inner.to_move() as u8
    }

    /// Winner: 0 (none), 1 (blue), or 2 (red)
    pub fn winner(&self) -> u8 {
        self.inner.winner().map_or(0, |p| p as u8)
    }

    /// Session phase: "setup", "playing" or "gameover"
    pub fn phase(&self) -> String {
        match self.inner.phase() {
            Phase::Setup => "setup".to_string(),
            Phase::Playing => "playing".to_string(),
            Phase::GameOver => "gameover".to_string(),
        }
    }

    /// Change board size (setup only). Clears the board.
    pub fn resize(&mut self, rows: u8, cols: u8) -> Result<(), JsError> {
        self.inner.resize(rows, cols)?;
        Ok(())
    }

    /// Select the ruleset: "normal" or "void-expansion". Returns true if accepted.
    #[wasm_bindgen(js_name = setVariant)]
    pub fn set_variant(&mut self, variant: &str) -> bool {
        let variant = match variant {
            "normal" => Variant::Normal,
            "void-expansion" => Variant::VoidExpansion,
            _ => return false,
        };
        self.inner.set_variant(variant).is_ok()
    }

    /// Select who moves first (1 or 2). Returns true if accepted.
    #[wasm_bindgen(js_name = setStartingPlayer)]
    pub fn set_starting_player(&mut self, player: u8) -> bool {
        match Player::from_bits(player) {
            Some(p) => self.inner.set_starting_player(p).is_ok(),
            None => false,
        }
    }

    /// Load a shared setup string such as "B**|*R*" (setup only)
    #[wasm_bindgen(js_name = loadSetup)]
    pub fn load_setup(&mut self, setup: &str) -> Result<(), JsError> {
        let board = notation::parse_setup(setup)?;
        self.inner.load_setup(board)?;
        Ok(())
    }

    /// Start play. Returns false if the game was not in setup.
    pub fn start(&mut self) -> bool {
        self.inner.start().is_ok()
    }

    /// Handle a click: cycles the cell in setup, plays a move in game.
    /// Returns true if anything changed.
    pub fn click(&mut self, row: u8, col: u8) -> bool {
        let pos = Pos::new(row, col);
        match self.inner.phase() {
            Phase::Setup => self.inner.setup_edit(pos).is_ok(),
            Phase::Playing => self.inner.play_at(pos).is_ok(),
            Phase::GameOver => false,
        }
    }

    /// Hover preview for a cell as
    /// { type: "expand", group: [{row, col}], frontier: [{row, col}] } |
    /// { type: "place", cell: {row, col} } | null
    pub fn preview(&self, row: u8, col: u8) -> Result<JsValue, JsValue> {
        match self.inner.preview(Pos::new(row, col)) {
            Some(preview) => Ok(serde_wasm_bindgen::to_value(&preview)?),
            None => Ok(JsValue::NULL),
        }
    }

    /// Legal moves of the player to move as [{ type, origin | cell }]
    #[wasm_bindgen(js_name = legalMoves)]
    pub fn legal_moves(&self) -> Result<JsValue, JsValue> {
        Ok(serde_wasm_bindgen::to_value(&self.inner.legal_moves())?)
    }

    /// Take back the last move. Returns true if a move was undone.
    pub fn undo(&mut self) -> bool {
        self.inner.undo()
    }

    /// Back to setup with a blank board
    pub fn reset(&mut self) {
        self.inner.reset();
    }

    /// Full observable state: board, toMove, phase, winner, variant, history
    pub fn snapshot(&self) -> Result<JsValue, JsValue> {
        Ok(serde_wasm_bindgen::to_value(&self.inner.snapshot())?)
    }

    /// Share text: Setup: "<board>" Moves: <moves>
    pub fn export(&self) -> String {
        self.inner.export()
    }

    /// Check if game is over
    #[wasm_bindgen(js_name = isGameOver)]
    pub fn is_game_over(&self) -> bool {
        self.inner.phase() == Phase::GameOver
    }

    /// Get game result: "setup", "ongoing", "blue_wins" or "red_wins"
    pub fn result(&self) -> String {
        match (self.inner.phase(), self.inner.winner()) {
            (Phase::Setup, _) => "setup".to_string(),
            (_, Some(Player::Blue)) => "blue_wins".to_string(),
            (_, Some(Player::Red)) => "red_wins".to_string(),
            (_, None) => "ongoing".to_string(),
        }
    }

    /// Clone the session
    #[wasm_bindgen(js_name = clone)]
    pub fn clone_game(&self) -> WasmGame {
        WasmGame {
            inner: self.inner.clone(),
        }
    }
}

impl Default for WasmGame {
    fn default() -> Self {
        WasmGame {
            inner: Game::default(),
        }
    }
}
