use std::fmt::{Display, Formatter, Result as FmtResult};

/// An index into an [`Automaton`](crate::automaton::Automaton)'s state list. State identity is
/// its index; indices are stable except where a combinator explicitly renumbers them.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct State(pub u32);

impl State {
    #[inline]
    pub fn usize(self) -> usize {
        self.0 as usize
    }
}

impl From<u32> for State {
    fn from(value: u32) -> Self {
        State(value)
    }
}

impl From<State> for u32 {
    fn from(value: State) -> Self {
        value.0
    }
}

impl Display for State {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        write!(f, "{}", self.0)
    }
}
