//! Rule questions asked by the room layer.
//!
//! The room never folds abilities itself; it builds a [`GameView`] over the
//! registry and its current state and asks:
//!
//! - distances and attack ranges (`distance`, `attack_range`,
//!   `in_attack_range`)
//! - hand-size limits (`max_hand_size`)
//! - card legality (`legal_use`, `legal_target`, `residue_uses`,
//!   `max_targets`)
//!
//! Answers are never cached; abilities read mutable state.

mod view;

pub use view::GameView;
