//! Default board geometry in normalized screen space.
//!
//! The renderer is free to register its own targets every tick; this is the
//! board used by the simulator and the integration tests.

use crate::models::{Action, Rect, Target, TargetId};

/// Letter rows, most frequent letters first.
pub const LETTER_ROWS: [&str; 5] = ["ETAOI", "NRSHL", "DCUMF", "PGWYB", "VKXJQ"];

pub const QUICK_PHRASES: [&str; 8] = [
    "I AM IN PAIN",
    "I CAN'T BREATHE",
    "CALL NURSE",
    "PLEASE HELP",
    "YES",
    "NO",
    "I NEED WATER",
    "THANK YOU",
];

pub const ACTIONS: [Action; 3] = [Action::Space, Action::Backspace, Action::Clear];

pub const MAX_PREDICTION_SLOTS: usize = 5;

const PREDICTION_STRIP: Rect = Rect::new(0.10, 0.02, 0.80, 0.10);
const LETTER_GRID: Rect = Rect::new(0.25, 0.16, 0.50, 0.55);
const ACTION_COLUMN: Rect = Rect::new(0.79, 0.16, 0.16, 0.55);
const PHRASE_STRIP: Rect = Rect::new(0.05, 0.75, 0.90, 0.22);

// Fraction of a cell left empty between neighbours.
const GAP: f64 = 0.1;

/// Splits `area` into a `rows` x `cols` grid and returns the cell at
/// (`row`, `col`), shrunk by the gap.
fn cell(area: &Rect, rows: usize, cols: usize, row: usize, col: usize) -> Rect {
    let cell_w = area.width / cols as f64;
    let cell_h = area.height / rows as f64;
    let pad_x = cell_w * GAP / 2.0;
    let pad_y = cell_h * GAP / 2.0;
    Rect::new(
        area.x + col as f64 * cell_w + pad_x,
        area.y + row as f64 * cell_h + pad_y,
        cell_w - 2.0 * pad_x,
        cell_h - 2.0 * pad_y,
    )
}

pub fn letter_keys() -> Vec<Target> {
    let mut keys = Vec::with_capacity(25);
    for (row, letters) in LETTER_ROWS.iter().enumerate() {
        for (col, letter) in letters.chars().enumerate() {
            keys.push(Target::new(
                TargetId::Letter(letter),
                cell(&LETTER_GRID, LETTER_ROWS.len(), letters.len(), row, col),
            ));
        }
    }
    keys
}

/// Two rows of four phrases.
pub fn phrase_buttons() -> Vec<Target> {
    let cols = 4;
    QUICK_PHRASES
        .iter()
        .enumerate()
        .map(|(i, phrase)| {
            Target::new(
                TargetId::Phrase((*phrase).to_string()),
                cell(&PHRASE_STRIP, 2, cols, i / cols, i % cols),
            )
        })
        .collect()
}

pub fn action_buttons() -> Vec<Target> {
    ACTIONS
        .iter()
        .enumerate()
        .map(|(i, action)| {
            Target::new(
                TargetId::Action(*action),
                cell(&ACTION_COLUMN, ACTIONS.len(), 1, i, 0),
            )
        })
        .collect()
}

/// One slot per current candidate, capped at `MAX_PREDICTION_SLOTS`.
pub fn prediction_slots(count: usize) -> Vec<Target> {
    (0..count.min(MAX_PREDICTION_SLOTS))
        .map(|i| {
            Target::new(
                TargetId::Prediction(i),
                cell(&PREDICTION_STRIP, 1, MAX_PREDICTION_SLOTS, 0, i),
            )
        })
        .collect()
}

/// The full board for a tick with `predictions` visible candidates.
pub fn default_targets(predictions: usize) -> Vec<Target> {
    let mut targets = letter_keys();
    targets.extend(phrase_buttons());
    targets.extend(action_buttons());
    targets.extend(prediction_slots(predictions));
    targets
}

/// Region of a target in the default board, if present.
pub fn region_of(targets: &[Target], id: &TargetId) -> Option<Rect> {
    targets.iter().find(|t| &t.id == id).map(|t| t.region)
}
