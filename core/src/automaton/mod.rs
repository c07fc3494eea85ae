//! Unicode-codepoint finite automata: states, transitions, the Thompson-style combinators that
//! build automata out of smaller ones, the two simulators, the text-format codec, and substring
//! search.

mod automaton;
mod codec;
mod search;
mod simulate;
mod state;
mod transition;

pub use {
    automaton::{concat, kleene, union, Automaton},
    codec::{to_dot, to_text, FromText},
    search::{search, Hit},
    simulate::{simulate, simulate_det, Simulation, Status},
    state::State,
    transition::{CharRange, Codepoint, Polarity, Transition, EPSILON},
};
