//! Longest-match, first-rule-wins tokenization built on top of the regex compiler: each rule
//! compiles to its own automaton, and [`LexSim`] steps every rule's simulation in lockstep to
//! find, at each position, the longest prefix any rule accepts.

use crate::{
    automaton::{Automaton, Codepoint, Simulation},
    error::{AutomatonError, Result},
    regex::Regex,
};

struct Rule {
    label: String,
    automaton: Automaton,
}

/// One token produced by [`Lexer::yylex`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Token {
    pub label: String,
    pub text: String,
    /// Codepoint offset into the original input at which this token begins.
    pub start: usize,
}

/// A set of labeled rules, tried in the order they were added. Rules are stored as compiled
/// automata, not as `Regex`es, since only the automaton is needed once compilation succeeds.
pub struct Lexer {
    rules: Vec<Rule>,
}

impl Lexer {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Compiles `pattern` and appends it as a rule. Rules are tried in the order added; on a tie
    /// for longest match, the earliest-added rule wins.
    pub fn add_rule(&mut self, label: impl Into<String>, pattern: &str) -> Result<()> {
        let automaton = Regex::compile(pattern)?.automaton().clone();
        self.rules.push(Rule { label: label.into(), automaton });
        Ok(())
    }

    /// Loads a tab-separated rule table: one `pattern\tlabel` per line. Blank lines and lines
    /// starting with `#` are skipped. A non-blank, non-comment line with no tab is a
    /// [`AutomatonError::RuleError`] naming its 1-based line number.
    pub fn load(text: &str) -> Result<Self> {
        let mut lexer = Self::new();
        for (lineno, line) in text.lines().enumerate() {
            if line.trim().is_empty() || line.trim_start().starts_with('#') {
                continue;
            }
            let (pattern, label) = line.split_once('\t').ok_or(AutomatonError::RuleError(lineno + 1))?;
            lexer.add_rule(label, pattern)?;
        }
        Ok(lexer)
    }

    /// Begins a fresh lockstep simulation of every rule, for streaming use.
    pub fn begin(&self) -> LexSim<'_> {
        LexSim::begin(&self.rules)
    }

    /// Tokenizes `input` in full: repeatedly takes the longest, earliest-winning-tie match at the
    /// current position, advancing past it. Errors with a [`AutomatonError::ParseError`] at the
    /// offending codepoint offset if no rule matches a nonempty prefix there.
    pub fn yylex(&self, input: &str) -> Result<Vec<Token>> {
        let chars: Vec<char> = input.chars().collect();
        let mut pos = 0;
        let mut tokens = Vec::new();

        while pos < chars.len() {
            let mut sim = self.begin();
            for &c in &chars[pos..] {
                sim.step(c as Codepoint);
                if sim.finished() {
                    break;
                }
            }

            match sim.length() {
                Some(len) if len > 0 => {
                    let label = sim.token().expect("length implies a winning rule").to_string();
                    let text: String = chars[pos..pos + len].iter().collect();
                    tokens.push(Token { label, text, start: pos });
                    pos += len;
                }
                _ => return Err(AutomatonError::parse_at("no rule matches input", pos)),
            }
        }

        Ok(tokens)
    }
}

impl Default for Lexer {
    fn default() -> Self {
        Self::new()
    }
}

/// One in-progress lockstep simulation over every rule of a [`Lexer`]. Tracks, as input is fed in,
/// the longest prefix any rule has accepted and which rule (earliest wins ties at the same
/// length).
pub struct LexSim<'a> {
    rules: &'a [Rule],
    sims: Vec<Simulation<'a>>,
    consumed: usize,
    best: Option<(usize, usize)>,
}

impl<'a> LexSim<'a> {
    fn begin(rules: &'a [Rule]) -> Self {
        let sims: Vec<Simulation<'a>> = rules.iter().map(|r| Simulation::begin(&r.automaton)).collect();
        let best = sims.iter().position(|s| s.is_accepting()).map(|i| (i, 0));
        Self { rules, sims, consumed: 0, best }
    }

    /// Advances every rule's simulation by one codepoint.
    pub fn step(&mut self, c: Codepoint) {
        self.consumed += 1;
        for sim in &mut self.sims {
            sim.step(c);
        }
        for (i, sim) in self.sims.iter().enumerate() {
            let improves = match self.best {
                Some((_, len)) => self.consumed > len,
                None => true,
            };
            if sim.is_accepting() && improves {
                self.best = Some((i, self.consumed));
            }
        }
    }

    /// True once every rule's thread set has died, so no further `step` can change the outcome.
    pub fn finished(&self) -> bool {
        self.sims.iter().all(Simulation::is_rejected)
    }

    /// The label of the currently-winning rule, if any rule has accepted so far.
    pub fn token(&self) -> Option<&str> {
        self.best.map(|(i, _)| self.rules[i].label.as_str())
    }

    /// The length, in codepoints, of the currently-winning match, if any.
    pub fn length(&self) -> Option<usize> {
        self.best.map(|(_, len)| len)
    }
}
