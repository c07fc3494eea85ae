use {
    crate::{
        automaton::{Automaton, CharRange, Codepoint, Polarity, State, Transition, EPSILON},
        error::{AutomatonError, Result},
    },
    std::fmt::Write as _,
};

/// Escapes a codepoint the way the text format and the dot emitter both want it: the named
/// control escapes the original format recognizes, `\xHH`/`\uHHHH`/`\UHHHHHHHH` for everything
/// else non-printable, and the literal character otherwise.
fn escape_char(c: Codepoint) -> String {
    match c {
        // `\e` is reserved for the EPSILON sentinel (not the ASCII ESC control code, which falls
        // through to a `\xHH` escape below); matching it first keeps the two unambiguous.
        EPSILON => "\\e".to_string(),
        0x07 => "\\a".to_string(),
        0x08 => "\\b".to_string(),
        0x0c => "\\f".to_string(),
        0x0a => "\\n".to_string(),
        0x0d => "\\r".to_string(),
        0x09 => "\\t".to_string(),
        0x0b => "\\v".to_string(),
        b'\\' as u32 => "\\\\".to_string(),
        b'-' as u32 => "\\-".to_string(),
        0x20 => "\\ ".to_string(),
        0x20..=0x7e => char::from_u32(c).map(|ch| ch.to_string()).unwrap_or_default(),
        0x00..=0xff => format!("\\x{c:02x}"),
        0x100..=0xffff => format!("\\u{c:04x}"),
        _ => format!("\\U{c:08x}"),
    }
}

fn escape_range(r: &CharRange) -> String {
    if r.lo == r.hi {
        escape_char(r.lo)
    } else {
        format!("{}-{}", escape_char(r.lo), escape_char(r.hi))
    }
}

/// Reads one escape sequence starting at `chars.next() == Some('\\')`-already-consumed position;
/// `chars` must still hold the character(s) after the backslash.
fn read_escape(chars: &mut std::iter::Peekable<std::str::Chars>) -> Result<Codepoint> {
    let kind = chars.next().ok_or_else(|| AutomatonError::parse("dangling escape at end of input"))?;
    match kind {
        'a' => Ok(0x07),
        'b' => Ok(0x08),
        'e' => Ok(EPSILON),
        'f' => Ok(0x0c),
        'n' => Ok(0x0a),
        'r' => Ok(0x0d),
        't' => Ok(0x09),
        'v' => Ok(0x0b),
        '\\' => Ok(b'\\' as u32),
        '-' => Ok(b'-' as u32),
        ' ' => Ok(b' ' as u32),
        'x' => read_hex_escape(chars, 2),
        'u' => read_hex_escape(chars, 4),
        'U' => read_hex_escape(chars, 8),
        other => Ok(other as Codepoint),
    }
}

fn read_hex_escape(chars: &mut std::iter::Peekable<std::str::Chars>, digits: usize) -> Result<Codepoint> {
    let mut value: u32 = 0;
    for _ in 0..digits {
        let d = chars.next().ok_or_else(|| AutomatonError::parse("truncated hex escape"))?;
        let digit = d.to_digit(16).ok_or_else(|| AutomatonError::parse(format!("invalid hex digit {d:?}")))?;
        value = value * 16 + digit;
    }
    Ok(value)
}

/// Reads one (possibly escaped) codepoint, consuming it from `chars`.
fn read_char(chars: &mut std::iter::Peekable<std::str::Chars>) -> Result<Codepoint> {
    match chars.next() {
        Some('\\') => read_escape(chars),
        Some(c) => Ok(c as Codepoint),
        None => Err(AutomatonError::parse("expected a character, found end of input")),
    }
}

/// Parses the ranges of a transition line's right-hand side: a leading `+` or `-` for polarity,
/// then zero or more space-separated `lo` or `lo-hi` pairs (each side already escaped; a literal
/// space in a range must itself be written `\ `, so an unescaped space is always a separator).
fn parse_ranges(src: &str) -> Result<(Polarity, Vec<CharRange>)> {
    let mut chars = src.chars().peekable();
    let polarity = match chars.next() {
        Some('+') => Polarity::Positive,
        Some('-') => Polarity::Negative,
        _ => return Err(AutomatonError::parse("transition ranges must start with '+' or '-'")),
    };

    let mut ranges = Vec::new();
    loop {
        while chars.peek() == Some(&' ') {
            chars.next();
        }
        if chars.peek().is_none() {
            break;
        }
        let lo = read_char(&mut chars)?;
        let hi = if chars.peek() == Some(&'-') {
            chars.next();
            read_char(&mut chars)?
        } else {
            lo
        };
        ranges.push(CharRange::new(lo, hi)?);
    }

    if ranges.is_empty() {
        return Err(AutomatonError::parse("transition has no ranges"));
    }

    Ok((polarity, ranges))
}

/// Parses `"<src>-<dst>"` into a pair of state indices.
fn parse_state_pair(s: &str) -> Result<(u32, u32)> {
    let (src, dst) = s.split_once('-').ok_or_else(|| AutomatonError::parse(format!("malformed state pair {s:?}")))?;
    let src: u32 = src.trim().parse().map_err(|_| AutomatonError::parse(format!("not a state index: {src:?}")))?;
    let dst: u32 = dst.trim().parse().map_err(|_| AutomatonError::parse(format!("not a state index: {dst:?}")))?;
    Ok((src, dst))
}

/// Grows `automaton` with non-accepting states until `state` is a valid index.
fn extend_to(automaton: &mut Automaton, state: State) {
    while !automaton.is_valid(state) {
        automaton.add_state(false);
    }
}

/// Parses the line-oriented text format (§6) into an [`Automaton`].
pub trait FromText: Sized {
    fn from_text(text: &str) -> Result<Self>;
}

impl FromText for Automaton {
    fn from_text(text: &str) -> Result<Self> {
        let mut automaton = Automaton::new();
        let mut start: Option<State> = None;

        for (lineno, raw_line) in text.lines().enumerate() {
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (key, rest) = line.split_once(':').ok_or_else(|| AutomatonError::parse_at("expected ':'", lineno))?;
            let key = key.trim();
            let rest = rest.trim();

            if key == "start" {
                let idx: u32 = rest.parse().map_err(|_| AutomatonError::parse_at("invalid start state", lineno))?;
                let s = State(idx);
                extend_to(&mut automaton, s);
                start = Some(s);
            } else if key == "accept" {
                for tok in rest.split_whitespace() {
                    let idx: u32 = tok.parse().map_err(|_| AutomatonError::parse_at("invalid accept state", lineno))?;
                    let s = State(idx);
                    extend_to(&mut automaton, s);
                    automaton.set_accept(s, true);
                }
            } else {
                let (src, dst) = parse_state_pair(key).map_err(|_| AutomatonError::parse_at("invalid state pair", lineno))?;
                let (src, dst) = (State(src), State(dst));
                extend_to(&mut automaton, src);
                extend_to(&mut automaton, dst);

                if rest == "eps" {
                    automaton
                        .add_transition(src, Transition::epsilon(dst))
                        .map_err(|_| AutomatonError::parse_at("invalid epsilon transition", lineno))?;
                } else {
                    let (polarity, ranges) = parse_ranges(rest)?;
                    let t = Transition::new(polarity, ranges, dst)?;
                    automaton.add_transition(src, t).map_err(|_| AutomatonError::parse_at("invalid transition", lineno))?;
                }
            }
        }

        if let Some(s) = start {
            automaton.set_start(s);
        }

        Ok(automaton)
    }
}

/// Renders an [`Automaton`] in the line-oriented text format (§6). Round-trips through
/// [`Automaton::from_text`] for any automaton with at least a start state.
pub fn to_text(automaton: &Automaton) -> String {
    let mut out = String::new();

    if let Some(start) = automaton.start() {
        let _ = writeln!(out, "start: {start}");
    }

    let accepting: Vec<String> = automaton.accepting_states().map(|s| s.to_string()).collect();
    if !accepting.is_empty() {
        let _ = writeln!(out, "accept: {}", accepting.join(" "));
    }

    for state in 0..automaton.len() {
        let src = State(state as u32);
        for t in automaton.transitions(src) {
            if t.is_epsilon() {
                let _ = writeln!(out, "{src}-{}: eps", t.dest);
                continue;
            }
            let sign = match t.polarity {
                Polarity::Positive => '+',
                Polarity::Negative => '-',
            };
            let ranges: Vec<String> = t.ranges.iter().map(escape_range).collect();
            let _ = writeln!(out, "{src}-{}: {sign}{}", t.dest, ranges.join(" "));
        }
    }

    out
}

/// Renders an [`Automaton`] as a Graphviz `dot` digraph: an oval for the start state, an octagon
/// for every accepting state, plain circles otherwise, and `eps` edge labels for epsilon
/// transitions.
pub fn to_dot(automaton: &Automaton) -> String {
    let mut out = String::from("digraph automaton {\n\trankdir=LR;\n");

    for state in 0..automaton.len() {
        let s = State(state as u32);
        let shape = if automaton.is_accepting(s) { "doubleoctagon" } else { "oval" };
        let _ = writeln!(out, "\t{s} [shape={shape}];");
    }

    if let Some(start) = automaton.start() {
        let _ = writeln!(out, "\t{start} [style=bold];");
    }

    for state in 0..automaton.len() {
        let src = State(state as u32);
        for t in automaton.transitions(src) {
            let label = if t.is_epsilon() {
                "eps".to_string()
            } else {
                let body: String = t.ranges.iter().map(escape_range).collect();
                let escaped = body.replace('"', "\\\"");
                match t.polarity {
                    Polarity::Positive => escaped,
                    Polarity::Negative => format!("^{escaped}"),
                }
            };
            let _ = writeln!(out, "\t{src} -> {} [label=\"{label}\"];", t.dest);
        }
    }

    out.push_str("}\n");
    out
}
