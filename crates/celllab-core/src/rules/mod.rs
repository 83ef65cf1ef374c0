//! Built-in automaton rule families.
//!
//! Each family is an independent [`Automaton`](crate::Automaton)
//! implementor:
//!
//! - [`LifeAutomaton`] — two-state B/S (born/survive) Life variants.
//! - [`NLifeAutomaton`] — N-state generalization of Life with threshold
//!   constants.
//! - [`BrianBrainAutomaton`] — three-state firing/refractory/dead rule.
//! - [`ZhabotinskyAutomaton`] — epidemic-style model of the
//!   Belousov-Zhabotinsky reaction.

mod brain;
mod life;
mod nlife;
mod nstate;
mod zhabotinsky;

pub use brain::BrianBrainAutomaton;
pub use life::{LifeAutomaton, LifeRule};
pub use nlife::NLifeAutomaton;
pub use zhabotinsky::ZhabotinskyAutomaton;
