use {
    crate::automaton::{Automaton, Codepoint, State},
    std::collections::BTreeSet,
};

/// The result of feeding a character, or of inspecting a [`Simulation`] without feeding one.
///
/// `Accepted`/`Rejected` are terminal: once the active thread set is empty (`Rejected`) or the
/// input has been fully consumed, [`Simulation::status`] reports one of these. `Accepting` and
/// `NotAccepting` describe an in-progress simulation that can still consume more input.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Status {
    /// The active thread set is empty; no suffix of the remaining input can be accepted.
    Rejected,
    /// Input is exhausted and at least one active state is accepting.
    Accepted,
    /// Input remains, and at least one active state is accepting (an accepting prefix exists).
    Accepting,
    /// Input remains, and no active state is accepting.
    NotAccepting,
}

/// The epsilon-closure of `states`: every state reachable from `states` by following zero or more
/// epsilon transitions. Computed with a worklist so shared epsilon-cycles (§8 invariant: the
/// automaton may contain epsilon cycles) don't cause non-termination.
fn epsilon_closure(automaton: &Automaton, states: &BTreeSet<State>) -> BTreeSet<State> {
    let mut closure: BTreeSet<State> = states.clone();
    let mut worklist: Vec<State> = states.iter().copied().collect();

    while let Some(s) = worklist.pop() {
        for t in automaton.transitions(s) {
            if t.is_epsilon() && closure.insert(t.dest) {
                worklist.push(t.dest);
            }
        }
    }

    closure
}

/// A live run of an [`Automaton`] over a sequence of codepoints, carried one character at a time.
///
/// This is the nondeterministic simulator of §4.5: the active set is the epsilon-closure of every
/// state reachable so far, so it may contain more than one state at once.
pub struct Simulation<'a> {
    automaton: &'a Automaton,
    active: BTreeSet<State>,
}

impl<'a> Simulation<'a> {
    /// Begins a simulation at the epsilon-closure of the automaton's start state. Panics if the
    /// automaton has no start state; callers are expected to have compiled or parsed one.
    pub fn begin(automaton: &'a Automaton) -> Self {
        let start = automaton.start().expect("automaton has no start state");
        let active = epsilon_closure(automaton, &BTreeSet::from([start]));
        Self { automaton, active }
    }

    /// Feeds one codepoint, advancing every active thread and re-closing over epsilon.
    pub fn step(&mut self, c: Codepoint) {
        if self.active.is_empty() {
            return;
        }

        let mut next = BTreeSet::new();
        for &s in &self.active {
            for t in self.automaton.transitions(s) {
                if !t.is_epsilon() && t.matches(c) {
                    next.insert(t.dest);
                }
            }
        }

        self.active = epsilon_closure(self.automaton, &next);
    }

    /// Whether any active state accepts.
    pub fn is_accepting(&self) -> bool {
        self.automaton.any_accepting(&self.active.iter().copied().collect::<Vec<_>>())
    }

    /// Whether the active set is empty, i.e. every thread has died.
    pub fn is_rejected(&self) -> bool {
        self.active.is_empty()
    }

    /// The status of this simulation, treating it as though input were exhausted right now.
    pub fn status(&self) -> Status {
        if self.is_rejected() {
            Status::Rejected
        } else if self.is_accepting() {
            Status::Accepting
        } else {
            Status::NotAccepting
        }
    }

    /// Feeds the remaining codepoints of `input` and reports the terminal status: `Rejected` if
    /// the thread set died before exhaustion, `Accepted`/`NotAccepting` by whether any thread
    /// accepts once `input` runs out.
    pub fn run(mut self, input: impl IntoIterator<Item = Codepoint>) -> Status {
        for c in input {
            self.step(c);
            if self.is_rejected() {
                return Status::Rejected;
            }
        }
        if self.is_accepting() {
            Status::Accepted
        } else {
            Status::NotAccepting
        }
    }
}

/// Whether `automaton` accepts `input` in full.
pub fn simulate(automaton: &Automaton, input: &str) -> bool {
    matches!(Simulation::begin(automaton).run(input.chars().map(|c| c as Codepoint)), Status::Accepted)
}

/// Legacy deterministic simulation (§4.6): walks exactly one active state, ignoring epsilon
/// transitions entirely and taking the first matching transition found at each state. Logs a
/// warning (does not error) the first time more than one outgoing transition from the current
/// state matches the same codepoint, since that ambiguity is silently resolved by transition
/// order rather than rejected.
pub fn simulate_det(automaton: &Automaton, input: &str) -> Status {
    let Some(mut current) = automaton.start() else {
        return Status::Rejected;
    };

    for c in input.chars().map(|c| c as Codepoint) {
        let matching: Vec<State> =
            automaton.transitions(current).iter().filter(|t| !t.is_epsilon() && t.matches(c)).map(|t| t.dest).collect();

        if matching.len() > 1 {
            log::warn!(
                "nondeterministic transition in deterministic simulation: state {current} has {} matching outgoing \
                 transitions for codepoint {c:#x}, taking the first",
                matching.len()
            );
        }

        match matching.first() {
            Some(&dest) => current = dest,
            None => return Status::Rejected,
        }
    }

    if automaton.is_accepting(current) {
        Status::Accepted
    } else {
        Status::NotAccepting
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::automaton::{kleene, Polarity},
    };

    fn char_automaton(c: char) -> Automaton {
        Automaton::single_char(c as u32)
    }

    #[test]
    fn begin_closes_over_epsilon() {
        let mut a = char_automaton('a');
        kleene(&mut a);
        let sim = Simulation::begin(&a);
        assert_eq!(sim.status(), Status::Accepting);
    }

    #[test]
    fn rejects_once_thread_set_dies() {
        let a = char_automaton('a');
        let mut sim = Simulation::begin(&a);
        sim.step('b' as u32);
        assert_eq!(sim.status(), Status::Rejected);
    }

    #[test]
    fn run_reports_accepted_on_exhaustion() {
        let a = char_automaton('a');
        assert_eq!(Simulation::begin(&a).run(['a' as u32]), Status::Accepted);
        assert_eq!(Simulation::begin(&a).run(['a' as u32, 'b' as u32]), Status::Rejected);
    }

    #[test_log::test]
    fn det_sim_takes_first_matching_transition_and_warns_on_ambiguity() {
        let mut a = Automaton::new();
        let s0 = a.add_state(false);
        let s1 = a.add_state(true);
        let s2 = a.add_state(false);
        a.set_start(s0);
        a.add_single(s0, s1, 'a' as u32, 'a' as u32, Polarity::Positive).unwrap();
        a.add_single(s0, s2, 'a' as u32, 'a' as u32, Polarity::Positive).unwrap();
        assert_eq!(simulate_det(&a, "a"), Status::Accepted);
    }

    #[test]
    fn det_sim_ignores_epsilon_transitions() {
        // s0 (start, non-accepting) --eps--> s1 (accepting): only reachable via epsilon closure.
        let mut a = Automaton::new();
        let s0 = a.add_state(false);
        let s1 = a.add_state(true);
        a.set_start(s0);
        a.add_transition(s0, crate::automaton::Transition::epsilon(s1)).unwrap();

        assert!(simulate(&a, ""));
        assert_eq!(simulate_det(&a, ""), Status::NotAccepting);
    }
}
