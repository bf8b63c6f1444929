use chess::{Board, BoardStatus, ChessMove, Color, MoveGen, Piece, Square};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::models::game_record::Side;
use crate::rules::errors::RulesError;

/// End-of-game classification reported alongside an applied move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEnding {
    None,
    Checkmate,
    Stalemate,
}

/// Result of a legal move: the new position and everything the session
/// layer needs to update its record.
#[derive(Debug, Clone, PartialEq)]
pub struct AppliedMove {
    pub position: String,
    pub side_to_move: Side,
    pub notation: String,
    pub ending: GameEnding,
}

/// A legal move in coordinate form, as consumed by opponent strategies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegalMove {
    pub from: String,
    pub to: String,
    pub promotion: Option<String>,
}

/// Adapter over the `chess` crate. The session layer never touches board
/// internals; positions cross this boundary as FEN strings only.
#[derive(Clone, Default)]
pub struct ChessRules;

impl ChessRules {
    pub fn new() -> Self {
        ChessRules
    }

    /// Validate a proposed move against a position and apply it.
    /// Promotion defaults to queen when a pawn reaches the back rank and no
    /// piece was named. Malformed squares and rule violations both surface
    /// as `IllegalMove`.
    pub fn validate_and_apply(
        &self,
        fen: &str,
        from: &str,
        to: &str,
        promotion: Option<&str>,
    ) -> Result<AppliedMove, RulesError> {
        let board = Board::from_str(fen)
            .map_err(|e| RulesError::InvalidPosition(format!("Invalid FEN: {}", e)))?;

        let from_sq = Square::from_str(from)
            .map_err(|_| RulesError::IllegalMove(format!("Invalid from square: {}", from)))?;
        let to_sq = Square::from_str(to)
            .map_err(|_| RulesError::IllegalMove(format!("Invalid to square: {}", to)))?;

        let promotion_piece = match promotion {
            Some(p) => Some(parse_promotion(p)?),
            None => {
                // Simplified UI never asks; queen is the default choice.
                let is_pawn = board.piece_on(from_sq) == Some(Piece::Pawn);
                let back_rank = to_sq.get_rank().to_index() == 0 || to_sq.get_rank().to_index() == 7;
                if is_pawn && back_rank {
                    Some(Piece::Queen)
                } else {
                    None
                }
            }
        };

        let chess_move = ChessMove::new(from_sq, to_sq, promotion_piece);

        let legal_moves: Vec<ChessMove> = MoveGen::new_legal(&board).collect();
        if !legal_moves.contains(&chess_move) {
            return Err(RulesError::IllegalMove(format!(
                "{}{} is not legal in this position",
                from, to
            )));
        }

        let notation = san(&board, chess_move);
        let new_board = board.make_move_new(chess_move);

        let ending = match new_board.status() {
            BoardStatus::Ongoing => GameEnding::None,
            BoardStatus::Checkmate => GameEnding::Checkmate,
            BoardStatus::Stalemate => GameEnding::Stalemate,
        };

        Ok(AppliedMove {
            position: format!("{}", new_board),
            side_to_move: side_from_color(new_board.side_to_move()),
            notation,
            ending,
        })
    }

    /// All legal moves for a position, in coordinate form.
    pub fn legal_moves(&self, fen: &str) -> Result<Vec<LegalMove>, RulesError> {
        let board = Board::from_str(fen)
            .map_err(|e| RulesError::InvalidPosition(format!("Invalid FEN: {}", e)))?;

        Ok(MoveGen::new_legal(&board)
            .map(|m| LegalMove {
                from: m.get_source().to_string(),
                to: m.get_dest().to_string(),
                promotion: m.get_promotion().map(|p| piece_letter(p).to_lowercase()),
            })
            .collect())
    }

    /// Side to move, as encoded in the position itself.
    pub fn side_to_move(&self, fen: &str) -> Result<Side, RulesError> {
        let board = Board::from_str(fen)
            .map_err(|e| RulesError::InvalidPosition(format!("Invalid FEN: {}", e)))?;
        Ok(side_from_color(board.side_to_move()))
    }
}

fn side_from_color(color: Color) -> Side {
    match color {
        Color::White => Side::White,
        Color::Black => Side::Black,
    }
}

fn parse_promotion(letter: &str) -> Result<Piece, RulesError> {
    match letter {
        "q" => Ok(Piece::Queen),
        "r" => Ok(Piece::Rook),
        "b" => Ok(Piece::Bishop),
        "n" => Ok(Piece::Knight),
        _ => Err(RulesError::IllegalMove(format!(
            "Invalid promotion piece: {}",
            letter
        ))),
    }
}

fn piece_letter(piece: Piece) -> &'static str {
    match piece {
        Piece::Pawn => "",
        Piece::Knight => "N",
        Piece::Bishop => "B",
        Piece::Rook => "R",
        Piece::Queen => "Q",
        Piece::King => "K",
    }
}

fn file_char(square: Square) -> char {
    (b'a' + square.get_file().to_index() as u8) as char
}

fn rank_char(square: Square) -> char {
    (b'1' + square.get_rank().to_index() as u8) as char
}

/// Standard algebraic notation for a legal move in the given position.
fn san(board: &Board, mv: ChessMove) -> String {
    let source = mv.get_source();
    let dest = mv.get_dest();
    let piece = board.piece_on(source).unwrap_or(Piece::Pawn);

    let mut out = String::new();

    let file_delta =
        (source.get_file().to_index() as i32 - dest.get_file().to_index() as i32).abs();
    if piece == Piece::King && file_delta == 2 {
        out.push_str(if dest.get_file().to_index() == 6 {
            "O-O"
        } else {
            "O-O-O"
        });
    } else {
        let is_capture = board.piece_on(dest).is_some()
            || (piece == Piece::Pawn && source.get_file() != dest.get_file());

        if piece == Piece::Pawn {
            if is_capture {
                out.push(file_char(source));
            }
        } else {
            out.push_str(piece_letter(piece));
            out.push_str(&disambiguation(board, mv, piece));
        }
        if is_capture {
            out.push('x');
        }
        out.push_str(&dest.to_string());
        if let Some(promo) = mv.get_promotion() {
            out.push('=');
            out.push_str(piece_letter(promo));
        }
    }

    let after = board.make_move_new(mv);
    if after.status() == BoardStatus::Checkmate {
        out.push('#');
    } else if after.checkers().popcnt() > 0 {
        out.push('+');
    }

    out
}

/// Source-square disambiguation when two identical pieces can reach the
/// same destination: file if it distinguishes, else rank, else both.
fn disambiguation(board: &Board, mv: ChessMove, piece: Piece) -> String {
    let source = mv.get_source();
    let rivals: Vec<Square> = MoveGen::new_legal(board)
        .filter(|m| {
            m.get_dest() == mv.get_dest()
                && m.get_source() != source
                && board.piece_on(m.get_source()) == Some(piece)
        })
        .map(|m| m.get_source())
        .collect();

    if rivals.is_empty() {
        return String::new();
    }
    if rivals.iter().all(|s| s.get_file() != source.get_file()) {
        return file_char(source).to_string();
    }
    if rivals.iter().all(|s| s.get_rank() != source.get_rank()) {
        return rank_char(source).to_string();
    }
    format!("{}{}", file_char(source), rank_char(source))
}
