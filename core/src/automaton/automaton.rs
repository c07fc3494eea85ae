use {
    crate::{
        automaton::{state::State, transition::Transition},
        error::{AutomatonError, Result},
    },
    bitvec::vec::BitVec,
};

/// Owns states, a per-state list of outgoing transitions, a start state, and an accepting set.
///
/// State identity is its index into the dense state vector. Indices are stable under every
/// operation except the combinators in this module, which renumber states linearly (`new = old +
/// offset`) when they append one automaton's states onto another's.
#[derive(Clone, Debug, Default)]
pub struct Automaton {
    start: Option<State>,
    accepting: BitVec,
    transitions: Vec<Vec<Transition>>,
}

impl Automaton {
    /// An empty automaton: no states, no start state, no accepting states.
    pub fn new() -> Self {
        Self::default()
    }

    /// The number of states in this automaton.
    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }

    pub fn start(&self) -> Option<State> {
        self.start
    }

    pub fn set_start(&mut self, state: State) {
        self.start = Some(state);
    }

    /// True iff `state` is a valid index into this automaton.
    pub fn is_valid(&self, state: State) -> bool {
        state.usize() < self.len()
    }

    /// Appends a new state and returns its index.
    pub fn add_state(&mut self, accepting: bool) -> State {
        let index = State(self.transitions.len() as u32);
        self.transitions.push(Vec::new());
        self.accepting.push(accepting);
        index
    }

    pub fn set_accept(&mut self, state: State, accept: bool) {
        self.accepting.set(state.usize(), accept);
    }

    pub fn is_accepting(&self, state: State) -> bool {
        self.accepting[state.usize()]
    }

    /// The accepting states, in ascending order.
    pub fn accepting_states(&self) -> impl Iterator<Item = State> + '_ {
        self.accepting.iter_ones().map(|i| State(i as u32))
    }

    pub fn any_accepting(&self, states: &[State]) -> bool {
        states.iter().any(|&s| self.is_accepting(s))
    }

    /// Outgoing transitions of `state`, in the order they were added.
    pub fn transitions(&self, state: State) -> &[Transition] {
        &self.transitions[state.usize()]
    }

    /// Appends `t` to `from`'s outgoing list. `t.dest` must already be a valid index in this
    /// automaton.
    pub fn add_transition(&mut self, from: State, t: Transition) -> Result<()> {
        if !self.is_valid(from) {
            return Err(AutomatonError::InvalidStateIndex(from.0));
        }
        if !self.is_valid(t.dest) {
            return Err(AutomatonError::InvalidStateIndex(t.dest.0));
        }
        self.transitions[from.usize()].push(t);
        Ok(())
    }

    /// Convenience for a one-range transition.
    pub fn add_single(
        &mut self,
        from: State,
        to: State,
        lo: crate::automaton::Codepoint,
        hi: crate::automaton::Codepoint,
        polarity: crate::automaton::Polarity,
    ) -> Result<()> {
        let t = Transition::single(polarity, lo, hi, to)?;
        self.add_transition(from, t)
    }

    fn add_epsilon(&mut self, from: State, to: State) -> Result<()> {
        self.add_transition(from, Transition::epsilon(to))
    }

    /// A two-state automaton matching exactly `c`.
    pub fn single_char(c: crate::automaton::Codepoint) -> Self {
        let mut a = Self::new();
        let s0 = a.add_state(false);
        let s1 = a.add_state(true);
        a.set_start(s0);
        a.add_single(s0, s1, c, c, crate::automaton::Polarity::Positive).expect("single-char range is always valid");
        a
    }
}

/// Append-graph: copies `src`'s states and transitions onto the end of `dst`, shifting every
/// copied transition's destination by the number of states `dst` had before the copy. This is the
/// only way states and transitions are ever copied across automata (§4.3); it is linear in the
/// size of `src`.
fn append_graph(dst: &mut Automaton, src: &Automaton) -> u32 {
    let offset = dst.len() as u32;

    for state in 0..src.len() {
        let accepting = src.is_accepting(State(state as u32));
        dst.add_state(accepting);
    }

    for state in 0..src.len() {
        for t in src.transitions(State(state as u32)) {
            let shifted = Transition { ranges: t.ranges.clone(), polarity: t.polarity, dest: State(t.dest.0 + offset) };
            dst.transitions[state + offset as usize].push(shifted);
        }
    }

    offset
}

/// Recognizes `L(first) . L(second)`: wires every accepting state of `first` to `second`'s start
/// via an epsilon transition, then appends `second`'s graph and adopts its (shifted) accepting
/// set. `first.start` is unchanged.
pub fn concat(first: &mut Automaton, second: &Automaton) {
    let off = first.len() as u32;
    let accepting_before: Vec<State> = first.accepting_states().collect();
    let second_start = second.start().expect("second operand of concat must have a start state");

    append_graph(first, second);

    for a in accepting_before {
        first.add_epsilon(a, State(second_start.0 + off)).expect("epsilon to freshly-appended state is always valid");
        first.set_accept(a, false);
    }

    for a in second.accepting_states() {
        first.set_accept(State(a.0 + off), true);
    }
}

/// Recognizes `L(first) U L(second)`: appends `second`'s graph, adds a fresh non-accepting start
/// state with epsilon edges to both operands' starts, and unions the accepting sets.
pub fn union(first: &mut Automaton, second: &Automaton) {
    let off = first.len() as u32;
    let first_start = first.start().expect("first operand of union must have a start state");
    let second_start = second.start().expect("second operand of union must have a start state");

    append_graph(first, second);

    let s_new = first.add_state(false);
    first.add_epsilon(s_new, first_start).expect("epsilon to existing start is always valid");
    first.add_epsilon(s_new, State(second_start.0 + off)).expect("epsilon to freshly-appended state is always valid");

    for a in second.accepting_states() {
        first.set_accept(State(a.0 + off), true);
    }

    first.set_start(s_new);
}

/// Recognizes `L(f)*`: adds a fresh accepting start state with an epsilon edge into `f`'s old
/// start, and loops every old accepting state back to the new start via epsilon.
pub fn kleene(f: &mut Automaton) {
    let old_start = f.start().expect("kleene operand must have a start state");
    let old_accepting: Vec<State> = f.accepting_states().collect();

    let s_new = f.add_state(true);
    f.add_epsilon(s_new, old_start).expect("epsilon to existing start is always valid");

    for a in old_accepting {
        f.add_epsilon(a, s_new).expect("epsilon to freshly-added state is always valid");
    }

    f.set_start(s_new);
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::{
            automaton::{simulate, Polarity},
        },
    };

    fn char_automaton(c: char) -> Automaton {
        Automaton::single_char(c as u32)
    }

    #[test]
    fn single_char_accepts_only_that_char() {
        let a = char_automaton('a');
        assert!(simulate(&a, "a"));
        assert!(!simulate(&a, "b"));
        assert!(!simulate(&a, ""));
        assert!(!simulate(&a, "aa"));
    }

    #[test]
    fn concat_recognizes_sequence() {
        let mut a = char_automaton('a');
        let b = char_automaton('b');
        concat(&mut a, &b);
        assert!(simulate(&a, "ab"));
        assert!(!simulate(&a, "a"));
        assert!(!simulate(&a, "b"));
        assert!(!simulate(&a, "ba"));
    }

    #[test]
    fn union_recognizes_either() {
        let mut a = char_automaton('a');
        let b = char_automaton('b');
        union(&mut a, &b);
        assert!(simulate(&a, "a"));
        assert!(simulate(&a, "b"));
        assert!(!simulate(&a, "c"));
        assert!(!simulate(&a, ""));
    }

    #[test]
    fn kleene_accepts_empty_and_repeats() {
        let mut a = char_automaton('a');
        kleene(&mut a);
        assert!(simulate(&a, ""));
        assert!(simulate(&a, "a"));
        assert!(simulate(&a, "aaaa"));
        assert!(!simulate(&a, "aab"));
    }

    #[test]
    fn clone_preserves_language() {
        let mut a = char_automaton('x');
        let b = char_automaton('y');
        concat(&mut a, &b);
        let cloned = a.clone();
        for input in ["xy", "x", "y", "", "xx"] {
            assert_eq!(simulate(&a, input), simulate(&cloned, input), "mismatch on {input:?}");
        }
    }

    #[test]
    fn add_transition_rejects_unknown_destination() {
        let mut a = Automaton::new();
        let s0 = a.add_state(false);
        let bogus = State(7);
        let err = a.add_single(s0, bogus, 'a' as u32, 'a' as u32, Polarity::Positive).unwrap_err();
        assert_eq!(err, AutomatonError::InvalidStateIndex(7));
    }

    mod properties {
        use {super::*, proptest::prelude::*};

        fn word(alphabet: &str) -> impl Strategy<Value = String> {
            prop::collection::vec(prop::sample::select(alphabet.chars().collect::<Vec<_>>()), 0..6)
                .prop_map(|chars| chars.into_iter().collect())
        }

        proptest! {
            #[test]
            fn clone_preserves_language(w in word("ab")) {
                let mut a = char_automaton('a');
                let b = char_automaton('b');
                concat(&mut a, &b);
                kleene(&mut a);
                prop_assert_eq!(simulate(&a, &w), simulate(&a.clone(), &w));
            }

            #[test]
            fn concat_language_is_conjunction_of_some_split(x in word("ab"), y in word("ab")) {
                let a = {
                    let mut a = char_automaton('a');
                    kleene(&mut a);
                    a
                };
                let b = {
                    let mut b = char_automaton('b');
                    kleene(&mut b);
                    b
                };
                let mut ab = a.clone();
                concat(&mut ab, &b);

                let whole = format!("{x}{y}");
                prop_assert_eq!(simulate(&ab, &whole), simulate(&a, &x) && simulate(&b, &y));
            }

            #[test]
            fn union_language_is_disjunction(w in word("abc")) {
                let a = char_automaton('a');
                let b = char_automaton('b');
                let mut u = a.clone();
                union(&mut u, &b);
                prop_assert_eq!(simulate(&u, &w), simulate(&a, &w) || simulate(&b, &w));
            }

            #[test]
            fn kleene_accepts_any_concatenation_of_the_base_language(reps in 0usize..6) {
                let mut a = char_automaton('a');
                kleene(&mut a);
                let input = "a".repeat(reps);
                prop_assert!(simulate(&a, &input));
            }
        }
    }
}
