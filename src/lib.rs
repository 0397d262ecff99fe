/// Sky Patrol: a side-scrolling arcade shooter.
///
/// The library holds the game-scene simulation (entities, movement, spawn
/// policy, collisions, win/lose rules) and the small persistence pieces the
/// host needs around it. The terminal front end lives in the binary.

pub mod collisions;
pub mod config;
pub mod entities;
pub mod error;
pub mod geometry;
pub mod level;
pub mod movement;
pub mod profile;
pub mod progress;
pub mod scene;
pub mod scores;
pub mod snapshot;
