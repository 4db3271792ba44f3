//! Errors raised while loading grid-map layouts.

use thiserror::Error;

/// A layout could not be turned into a playable level.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MapError {
    #[error("map has no levels")]
    NoLevels,
    #[error("level {level} is empty")]
    EmptyLevel { level: usize },
    #[error("level {level}, row {row}: expected {expected} columns, found {found}")]
    RaggedRow {
        level: usize,
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("level {level}, row {row}, column {column}: unknown tile {glyph:?}")]
    UnknownTile {
        level: usize,
        row: usize,
        column: usize,
        glyph: char,
    },
    #[error("level {level} has no player spawn ('P')")]
    MissingPlayerSpawn { level: usize },
    #[error("level {level} has more than one player spawn")]
    DuplicatePlayerSpawn { level: usize },
    #[error("level {level} has no home ('H')")]
    MissingHome { level: usize },
    #[error("level {level} has no enemy spawn ('E')")]
    MissingEnemySpawn { level: usize },
}
