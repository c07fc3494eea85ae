use {
    crate::{
        automaton::{concat, kleene, union, Automaton, CharRange, Polarity, EPSILON},
        error::{AutomatonError, Result},
        regex::classes,
    },
    std::{iter::Peekable, str::Chars},
};

/// A recursive-descent parser over the grammar:
///
/// ```text
/// regex    := alt
/// alt      := concat ('|' concat)*
/// concat   := modifier*
/// modifier := atom ('*' | '+' | '?')*
/// atom     := literal | '.' | '(' alt ')' | class | escape
/// class    := '[' '^'? classitem+ ']'
/// ```
///
/// Each production returns a freshly-built [`Automaton`] recognizing exactly that production's
/// language; `modifier` and `concat` fold their children in-place with the combinators.
pub struct Parser<'a> {
    chars: Peekable<Chars<'a>>,
    pos: usize,
}

impl<'a> Parser<'a> {
    pub fn new(pattern: &'a str) -> Self {
        Self { chars: pattern.chars().peekable(), pos: 0 }
    }

    pub fn parse(mut self) -> Result<Automaton> {
        let automaton = self.parse_alt()?;
        if let Some(c) = self.chars.peek() {
            return Err(AutomatonError::parse_at(format!("unexpected {c:?}"), self.pos));
        }
        Ok(automaton)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.chars.next();
        if c.is_some() {
            self.pos += 1;
        }
        c
    }

    fn eat(&mut self, expected: char) -> Result<()> {
        match self.bump() {
            Some(c) if c == expected => Ok(()),
            Some(c) => Err(AutomatonError::parse_at(format!("expected {expected:?}, found {c:?}"), self.pos)),
            None => Err(AutomatonError::parse_at(format!("expected {expected:?}, found end of pattern"), self.pos)),
        }
    }

    fn parse_alt(&mut self) -> Result<Automaton> {
        let mut automaton = self.parse_concat()?;
        while self.chars.peek() == Some(&'|') {
            self.bump();
            let rhs = self.parse_concat()?;
            union(&mut automaton, &rhs);
        }
        Ok(automaton)
    }

    fn parse_concat(&mut self) -> Result<Automaton> {
        let mut automaton: Option<Automaton> = None;
        while let Some(&c) = self.chars.peek() {
            if c == '|' || c == ')' {
                break;
            }
            let piece = self.parse_modifier()?;
            automaton = Some(match automaton {
                Some(mut a) => {
                    concat(&mut a, &piece);
                    a
                }
                None => piece,
            });
        }
        automaton.ok_or_else(|| AutomatonError::parse_at("empty alternative", self.pos))
    }

    fn parse_modifier(&mut self) -> Result<Automaton> {
        let mut automaton = self.parse_atom()?;
        while let Some(&c) = self.chars.peek() {
            match c {
                '*' => {
                    self.bump();
                    kleene(&mut automaton);
                }
                '+' => {
                    self.bump();
                    let tail = automaton.clone();
                    kleene(&mut automaton);
                    let mut plus = tail;
                    concat(&mut plus, &automaton);
                    automaton = plus;
                }
                '?' => {
                    self.bump();
                    let empty = empty_automaton();
                    union(&mut automaton, &empty);
                }
                _ => break,
            }
        }
        Ok(automaton)
    }

    fn parse_atom(&mut self) -> Result<Automaton> {
        match self.bump() {
            Some('(') => {
                let inner = self.parse_alt()?;
                self.eat(')')?;
                Ok(inner)
            }
            Some('.') => Ok(single_range(Polarity::Positive, vec![classes::any_codepoint_range()])),
            Some('[') => self.parse_class(),
            Some('\\') => self.parse_escape(),
            Some(c @ ('*' | '+' | '?')) => Err(AutomatonError::parse_at(format!("modifier {c:?} with no preceding atom"), self.pos)),
            Some(c) => Ok(Automaton::single_char(c as u32)),
            None => Err(AutomatonError::parse_at("expected a character, found end of pattern", self.pos)),
        }
    }

    fn parse_escape(&mut self) -> Result<Automaton> {
        match self.bump() {
            Some('d') => Ok(single_range(Polarity::Positive, classes::DIGIT.clone())),
            Some('D') => Ok(single_range(Polarity::Negative, classes::DIGIT.clone())),
            Some('s') => Ok(single_range(Polarity::Positive, classes::SPACE.clone())),
            Some('S') => Ok(single_range(Polarity::Negative, classes::SPACE.clone())),
            Some('w') => Ok(single_range(Polarity::Positive, classes::WORD.clone())),
            Some('W') => Ok(single_range(Polarity::Negative, classes::WORD.clone())),
            Some('a') => Ok(Automaton::single_char(0x07)),
            Some('b') => Ok(Automaton::single_char(0x08)),
            Some('f') => Ok(Automaton::single_char(0x0c)),
            Some('n') => Ok(Automaton::single_char('\n' as u32)),
            Some('r') => Ok(Automaton::single_char('\r' as u32)),
            Some('t') => Ok(Automaton::single_char('\t' as u32)),
            Some('v') => Ok(Automaton::single_char(0x0b)),
            // `\e` compiles to a literal epsilon transition, for hand-written specs that build
            // ε-moves directly; a plain regex never emits one through any other path.
            Some('e') => Ok(single_range(Polarity::Positive, vec![CharRange::single(EPSILON)])),
            Some('x') => Ok(Automaton::single_char(self.parse_hex_escape(2)?)),
            Some('u') => Ok(Automaton::single_char(self.parse_hex_escape(4)?)),
            Some(c) => Ok(Automaton::single_char(c as u32)),
            None => Err(AutomatonError::parse_at("dangling escape at end of pattern", self.pos)),
        }
    }

    /// Reads exactly `digits` hex digits following an already-consumed `\x`/`\u` marker.
    fn parse_hex_escape(&mut self, digits: usize) -> Result<u32> {
        let mut value: u32 = 0;
        for _ in 0..digits {
            let d = self
                .bump()
                .ok_or_else(|| AutomatonError::parse_at("truncated hex escape at end of pattern", self.pos))?;
            let digit =
                d.to_digit(16).ok_or_else(|| AutomatonError::parse_at(format!("invalid hex digit {d:?}"), self.pos))?;
            value = value * 16 + digit;
        }
        Ok(value)
    }

    fn parse_class(&mut self) -> Result<Automaton> {
        let negate = if self.chars.peek() == Some(&'^') {
            self.bump();
            true
        } else {
            false
        };

        let mut ranges = Vec::new();
        loop {
            match self.chars.peek() {
                None => return Err(AutomatonError::parse_at("unterminated character class", self.pos)),
                Some(&']') => {
                    self.bump();
                    break;
                }
                _ => ranges.push(self.parse_class_item()?),
            }
        }

        if ranges.is_empty() {
            return Err(AutomatonError::parse_at("empty character class", self.pos));
        }

        let polarity = if negate { Polarity::Negative } else { Polarity::Positive };
        Ok(single_range(polarity, ranges))
    }

    fn parse_class_item(&mut self) -> Result<CharRange> {
        let lo = self.parse_class_char()?;
        if self.chars.peek() == Some(&'-') {
            let mut lookahead = self.chars.clone();
            lookahead.next();
            if lookahead.peek() != Some(&']') {
                self.bump();
                let hi = self.parse_class_char()?;
                return CharRange::new(lo, hi);
            }
        }
        Ok(CharRange::single(lo))
    }

    fn parse_class_char(&mut self) -> Result<u32> {
        match self.bump() {
            Some('\\') => match self.bump() {
                Some('a') => Ok(0x07),
                Some('b') => Ok(0x08),
                Some('f') => Ok(0x0c),
                Some('n') => Ok('\n' as u32),
                Some('r') => Ok('\r' as u32),
                Some('t') => Ok('\t' as u32),
                Some('v') => Ok(0x0b),
                Some('e') => Ok(EPSILON),
                Some('x') => self.parse_hex_escape(2),
                Some('u') => self.parse_hex_escape(4),
                Some(c) => Ok(c as u32),
                None => Err(AutomatonError::parse_at("dangling escape in character class", self.pos)),
            },
            Some(c) => Ok(c as u32),
            None => Err(AutomatonError::parse_at("unterminated character class", self.pos)),
        }
    }
}

fn single_range(polarity: Polarity, ranges: Vec<CharRange>) -> Automaton {
    let mut a = Automaton::new();
    let s0 = a.add_state(false);
    let s1 = a.add_state(true);
    a.set_start(s0);
    a.add_transition(s0, crate::automaton::Transition::new(polarity, ranges, s1).expect("nonempty ranges"))
        .expect("s1 is a valid destination");
    a
}

fn empty_automaton() -> Automaton {
    let mut a = Automaton::new();
    let s0 = a.add_state(true);
    a.set_start(s0);
    a
}
