#![deny(warnings)]
//! Hidden-information game state reconstruction.
//!
//! A pure reducer folds the decoded game messages of one session into a
//! belief about every hand at the table: which cards a player certainly
//! holds, and which they might hold. Candidate sets only ever shrink; the
//! elimination closure promotes a card to certain once no one else can hold
//! it.

pub mod engine;
pub mod model;
pub mod state;
pub mod stream;
