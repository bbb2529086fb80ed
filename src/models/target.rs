use serde::{Deserialize, Serialize};
use std::fmt;

use super::Point;

/// Non-character buttons on the board.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum Action {
    Space,
    Backspace,
    Clear,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Space => "space",
            Action::Backspace => "backspace",
            Action::Clear => "clear",
        }
    }
}

/// Stable identifier of a selectable element.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase", tag = "kind", content = "value")]
pub enum TargetId {
    Letter(char),
    Phrase(String),
    /// Index into the current prediction list.
    Prediction(usize),
    Action(Action),
}

impl TargetId {
    pub fn class(&self) -> TargetClass {
        match self {
            TargetId::Letter(_) => TargetClass::Letter,
            TargetId::Phrase(_) => TargetClass::Phrase,
            TargetId::Prediction(_) => TargetClass::Prediction,
            TargetId::Action(_) => TargetClass::Action,
        }
    }
}

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetId::Letter(c) => write!(f, "{}", c),
            TargetId::Phrase(p) => write!(f, "phrase:{}", p),
            TargetId::Prediction(i) => write!(f, "prediction:{}", i),
            TargetId::Action(a) => write!(f, "action:{}", a.as_str()),
        }
    }
}

/// Target classes carry their own dwell duration.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum TargetClass {
    Letter,
    Phrase,
    Prediction,
    Action,
}

/// Axis-aligned hit region in normalized screen space.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Edges are inclusive.
    pub fn contains(&self, p: &Point) -> bool {
        p.x >= self.x && p.x <= self.x + self.width && p.y >= self.y && p.y <= self.y + self.height
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// A target as registered by the renderer for the current tick.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Target {
    pub id: TargetId,
    pub region: Rect,
}

impl Target {
    pub fn new(id: TargetId, region: Rect) -> Self {
        Self { id, region }
    }
}
