use crate::automaton::{Automaton, Codepoint, Simulation, Status};

/// A match found by [`search`]: `length` codepoints of the input starting at codepoint offset
/// `start` were accepted by the automaton.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct Hit {
    pub start: usize,
    pub length: usize,
}

/// Regex-style search over `text` (§4.7). At each candidate start position, runs a fresh
/// simulation and records the longest accepted prefix there (`last_accept_len` is updated on
/// every accepting moment, not only once input at that start is exhausted, so the longest match
/// per start position is always found even if a shorter prefix also accepted).
///
/// - `greedy`: stop and return after the first hit.
/// - `overlap`: when `false` (and not greedy), advance past the whole match before trying the
///   next start position, so returned hits are pairwise disjoint and sorted by `start`; when
///   `true`, advance by one codepoint regardless, so later hits may overlap earlier ones.
pub fn search(automaton: &Automaton, text: &str, greedy: bool, overlap: bool) -> Vec<Hit> {
    let chars: Vec<char> = text.chars().collect();
    let mut hits = Vec::new();
    let mut start = 0;

    while start < chars.len() {
        let mut sim = Simulation::begin(automaton);
        let mut last_accept_len: Option<usize> = None;
        let mut len = 0;

        loop {
            if len >= chars.len() - start {
                break;
            }
            sim.step(chars[start + len] as Codepoint);
            len += 1;
            match sim.status() {
                Status::Rejected => break,
                Status::Accepted => {
                    last_accept_len = Some(len);
                    break;
                }
                Status::Accepting => {
                    last_accept_len = Some(len);
                }
                Status::NotAccepting => {}
            }
        }

        match last_accept_len {
            Some(length) => {
                hits.push(Hit { start, length });
                if greedy {
                    return hits;
                }
                start += if overlap { 1 } else { length };
            }
            None => start += 1,
        }
    }

    hits
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::automaton::{concat, kleene, Polarity},
    };

    fn char_automaton(c: char) -> Automaton {
        Automaton::single_char(c as u32)
    }

    #[test]
    fn finds_single_occurrence() {
        let a = char_automaton('b');
        let hits = search(&a, "abc", false, false);
        assert_eq!(hits, vec![Hit { start: 1, length: 1 }]);
    }

    #[test]
    fn non_overlapping_search_is_disjoint_and_sorted() {
        let a = char_automaton('a');
        let hits = search(&a, "aaa", false, false);
        assert_eq!(hits, vec![Hit { start: 0, length: 1 }, Hit { start: 1, length: 1 }, Hit { start: 2, length: 1 }]);
    }

    #[test]
    fn overlapping_search_reports_every_start() {
        let mut a = char_automaton('a');
        kleene(&mut a);
        let b = char_automaton('b');
        concat(&mut a, &b);
        let hits = search(&a, "xaaabz", false, true);
        assert_eq!(hits, vec![Hit { start: 1, length: 4 }, Hit { start: 2, length: 3 }, Hit { start: 3, length: 2 }]);
    }

    #[test]
    fn greedy_returns_only_first_hit() {
        let a = char_automaton('a');
        let hits = search(&a, "aaa", true, false);
        assert_eq!(hits, vec![Hit { start: 0, length: 1 }]);
    }

    #[test]
    fn no_match_yields_empty_vec() {
        let a = char_automaton('z');
        assert!(search(&a, "abc", false, false).is_empty());
        assert!(search(&a, "", false, false).is_empty());
    }

    #[test]
    fn respects_negative_transitions() {
        let mut a = Automaton::new();
        let s0 = a.add_state(false);
        let s1 = a.add_state(true);
        a.set_start(s0);
        a.add_single(s0, s1, 'a' as u32, 'z' as u32, Polarity::Negative).unwrap();
        let hits = search(&a, "1a2", false, false);
        assert_eq!(hits, vec![Hit { start: 0, length: 1 }, Hit { start: 2, length: 1 }]);
    }

    #[test]
    fn non_overlap_prefers_longest_match_and_skips_past_it() {
        let a = crate::regex::Regex::compile("\\w+").unwrap();
        let hits = search(a.automaton(), "words words words", false, false);
        assert_eq!(hits, vec![Hit { start: 0, length: 5 }, Hit { start: 6, length: 5 }, Hit { start: 12, length: 5 }]);
    }

    mod properties {
        use {super::*, proptest::prelude::*};

        proptest! {
            #[test]
            fn greedy_search_returns_at_most_one_hit(s in "[ab]{0,12}") {
                let re = crate::regex::Regex::compile("a+b*").unwrap();
                let hits = search(re.automaton(), &s, true, false);
                prop_assert!(hits.len() <= 1);
            }

            #[test]
            fn non_overlapping_hits_are_disjoint_and_sorted(s in "[ab ]{0,20}") {
                let re = crate::regex::Regex::compile("[ab]+").unwrap();
                let hits = search(re.automaton(), &s, false, false);
                for pair in hits.windows(2) {
                    prop_assert!(pair[0].start < pair[1].start);
                    prop_assert!(pair[0].start + pair[0].length <= pair[1].start);
                }
            }
        }
    }
}
