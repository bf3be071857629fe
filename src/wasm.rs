//! WASM bindings for chess-core
//!
//! Provides a JavaScript-friendly API for the rules engine.

use wasm_bindgen::prelude::*;
use crate::{Color, Game, Move, PieceKind, Position};

/// WASM-friendly wrapper around Game
#[wasm_bindgen]
pub struct WasmGame {
    inner: Game,
}

#[wasm_bindgen]
impl WasmGame {
    /// Create a game in the standard starting position
    #[wasm_bindgen(constructor)]
    pub fn new() -> WasmGame {
        WasmGame { inner: Game::new() }
    }

    /// Create a game from a FEN string (placement and active color)
    #[wasm_bindgen(js_name = fromFen)]
    pub fn from_fen(fen: &str) -> Result<WasmGame, JsValue> {
        let inner = Game::from_fen(fen).map_err(js_error)?;
        Ok(WasmGame { inner })
    }

    /// FEN placement and active color
    pub fn fen(&self) -> String {
        self.inner.to_fen()
    }

    /// Side to move: "white" or "black"
    #[wasm_bindgen(js_name = sideToMove)]
    pub fn side_to_move(&self) -> String {
        self.inner.side_to_move().to_string()
    }

    /// Get legal moves of the piece at (row, col) as JSON array
    /// Each move is { start: [row, col], end: [row, col], promotion: "q"|"r"|"b"|"n" | null }
    #[wasm_bindgen(js_name = validMoves)]
    pub fn valid_moves(&self, row: u8, col: u8) -> Result<JsValue, JsValue> {
        let moves: Vec<WasmMove> = self
            .inner
            .valid_moves(square(row, col)?)
            .into_iter()
            .map(WasmMove::from)
            .collect();
        Ok(serde_wasm_bindgen::to_value(&moves)?)
    }

    /// Attempt a move. Throws with the rejection reason if it is refused.
    /// For promotion pass "q", "r", "b" or "n".
    #[wasm_bindgen(js_name = makeMove)]
    pub fn make_move(
        &mut self,
        start_row: u8,
        start_col: u8,
        end_row: u8,
        end_col: u8,
        promotion: Option<String>,
    ) -> Result<(), JsValue> {
        let start = square(start_row, start_col)?;
        let end = square(end_row, end_col)?;
        let mov = match promotion.as_deref() {
            None => Move::new(start, end),
            Some(letter) => {
                let kind = letter
                    .chars()
                    .next()
                    .and_then(PieceKind::from_char)
                    .map(|(_, kind)| kind)
                    .filter(|kind| PieceKind::PROMOTIONS.contains(kind))
                    .ok_or_else(|| js_error(format!("invalid promotion: {letter}")))?;
                Move::promote(start, end, kind)
            }
        };
        self.inner.make_move(mov).map_err(js_error)
    }

    #[wasm_bindgen(js_name = isInCheck)]
    pub fn is_in_check(&self, color: &str) -> Result<bool, JsValue> {
        Ok(self.inner.is_in_check(parse_color(color)?))
    }

    #[wasm_bindgen(js_name = isInCheckmate)]
    pub fn is_in_checkmate(&self, color: &str) -> Result<bool, JsValue> {
        Ok(self.inner.is_in_checkmate(parse_color(color)?))
    }

    #[wasm_bindgen(js_name = isInStalemate)]
    pub fn is_in_stalemate(&self, color: &str) -> Result<bool, JsValue> {
        Ok(self.inner.is_in_stalemate(parse_color(color)?))
    }

    /// Board occupancy as 8 rows of 8 (row 1 first), each cell
    /// { color, kind } or null
    pub fn board(&self) -> Result<JsValue, JsValue> {
        Ok(serde_wasm_bindgen::to_value(self.inner.board())?)
    }

    /// Game status: { state: "ongoing" | "check" | "checkmate" | "stalemate", winner? }
    pub fn status(&self) -> Result<JsValue, JsValue> {
        Ok(serde_wasm_bindgen::to_value(&self.inner.status())?)
    }
}

impl Default for WasmGame {
    fn default() -> Self {
        Self::new()
    }
}

fn js_error(e: impl std::fmt::Display) -> JsValue {
    JsError::new(&e.to_string()).into()
}

fn square(row: u8, col: u8) -> Result<Position, JsValue> {
    Position::checked(row as i32, col as i32)
        .ok_or_else(|| js_error(format!("square ({row}, {col}) is off the board")))
}

fn parse_color(color: &str) -> Result<Color, JsValue> {
    match color {
        "white" => Ok(Color::White),
        "black" => Ok(Color::Black),
        _ => Err(js_error(format!("invalid color: {color}"))),
    }
}

/// Serializable move for JavaScript
#[derive(serde::Serialize)]
struct WasmMove {
    start: [u8; 2],
    end: [u8; 2],
    promotion: Option<char>,
}

impl From<Move> for WasmMove {
    fn from(mov: Move) -> Self {
        WasmMove {
            start: [mov.start().row(), mov.start().column()],
            end: [mov.end().row(), mov.end().column()],
            promotion: mov.promotion().map(|kind| kind.to_char(Color::Black)),
        }
    }
}
