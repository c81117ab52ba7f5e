//! auto-2048: plays 2048 on its own with depth-limited expectimax search.
//!
//! This crate provides:
//! - A compact `Board` type with move, spawn and game-over primitives (`engine` module)
//! - A weighted board heuristic and an Expectimax policy (`expectimax` module)
//! - A game driver and a multi-run simulation runner (`game`, `sim` modules)
//! - TOML configuration (`config` module)
//!
//! Quick start:
//! ```
//! use auto_2048::engine::{Board, Move};
//! use auto_2048::expectimax::{Expectimax, ExpectimaxConfig};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! // Deterministic board initialization with a seeded RNG
//! let mut rng = StdRng::seed_from_u64(42);
//! let b0 = Board::new_game(&mut rng);
//! let (b1, _changed) = b0.apply_move(Move::Left);
//! assert!(b1.tile_sum() == b0.tile_sum());
//!
//! // Pick a move the way the simulation does
//! let mut policy = Expectimax::with_config(ExpectimaxConfig { max_depth: 1, ..Default::default() }).unwrap();
//! let dir = policy.choose_move(b0).unwrap();
//! let b2 = b0.make_move(dir, &mut rng);
//! assert!(b2.count_empty() >= 13);
//! ```
//!
pub mod config;
pub mod engine;
pub mod expectimax;
pub mod game;
pub mod sim;
