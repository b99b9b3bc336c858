//! The pattern context: an arena of sequences keyed by alias, plus the
//! expression resolver.

use std::collections::HashMap;

use crate::expr::{self, Piece, Token};
use crate::parser::{self, ParseError};
use crate::sequence::{Accumulator, Picker, PoolValue, SeqId, SeqRef, Sequence};

/// Owns every sequence defined by one generation run.
///
/// Replaces a process-wide registry: thread one context through a bake
/// and repeated/parallel generation never cross-talks. All lookups are
/// by alias; sequences themselves live in an arena and reference each
/// other by [`SeqId`].
#[derive(Debug, Default)]
pub struct PatternContext {
    sequences: Vec<Sequence>,
    aliases: HashMap<String, SeqId>,
    seed: u64,
}

impl PatternContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// A context whose sequences default to the given seed.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn set_seed(&mut self, seed: u64) {
        self.seed = seed;
    }

    /// Number of sequences in the arena (registered or anonymous).
    pub fn len(&self) -> usize {
        self.sequences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
    }

    /// Look up a registered alias.
    pub fn get(&self, alias: &str) -> Option<SeqId> {
        self.aliases.get(alias).copied()
    }

    pub fn sequence(&self, id: SeqId) -> &Sequence {
        &self.sequences[id.0]
    }

    pub fn sequence_mut(&mut self, id: SeqId) -> &mut Sequence {
        &mut self.sequences[id.0]
    }

    // ========================================================================
    // Definition
    // ========================================================================

    /// Define a sequence from a statement, with the context seed and a
    /// binary width of 1.
    pub fn define(&mut self, stmt: &str) -> SeqId {
        self.define_with(stmt, None, 1)
    }

    /// Define a sequence from a statement.
    ///
    /// A malformed statement degrades to an empty no-op sequence (the
    /// failure is logged); one bad statement must never abort
    /// generation. The new sequence always enters the arena; its alias
    /// is registered only if the name is still free.
    pub fn define_with(&mut self, stmt: &str, seed: Option<u64>, binary_length: u32) -> SeqId {
        let seed = seed.unwrap_or(self.seed);
        match parser::parse_statement(stmt) {
            Ok(raw) => {
                let mut values = self.parse_values(&raw.values);
                if raw.reverse {
                    values.reverse();
                }
                let alias = raw
                    .alias
                    .clone()
                    .unwrap_or_else(|| raw.canonical_alias.clone());
                self.insert(
                    Sequence::new(
                        alias.clone(),
                        values,
                        raw.picker,
                        raw.max_iterations,
                        raw.accumulator,
                        seed,
                        binary_length,
                    ),
                    &alias,
                )
            }
            Err(err) => {
                log::warn!("bad sequence statement {stmt:?}: {err}; using empty sequence");
                let alias = degraded_alias(stmt, &err);
                self.insert(
                    Sequence::new(
                        alias.clone(),
                        Vec::new(),
                        Picker::Once,
                        0,
                        Accumulator::Replace,
                        seed,
                        binary_length,
                    ),
                    &alias,
                )
            }
        }
    }

    fn insert(&mut self, seq: Sequence, alias: &str) -> SeqId {
        let id = SeqId(self.sequences.len());
        self.sequences.push(seq);
        if !alias.is_empty() && !self.aliases.contains_key(alias) {
            self.aliases.insert(alias.to_string(), id);
        }
        id
    }

    /// Turn a values expression into a pool. References are resolved
    /// against the registry now; names that don't resolve are dropped.
    fn parse_values(&self, values_exp: &str) -> Vec<PoolValue> {
        let mut values = Vec::new();
        if values_exp.contains(',') {
            for val in values_exp.split(',') {
                self.parse_list_value(val, &mut values);
            }
        } else if let Some(dash) = values_exp
            .char_indices()
            .skip(1)
            .find(|&(_, c)| c == '-')
            .map(|(i, _)| i)
        {
            parse_range(&values_exp[..dash], &values_exp[dash + 1..], &mut values);
        } else if let Ok(n) = values_exp.parse::<f64>() {
            values.push(PoolValue::Number(n));
        } else {
            self.parse_list_value(values_exp, &mut values);
        }
        values
    }

    fn parse_list_value(&self, val: &str, out: &mut Vec<PoolValue>) {
        let val = val.trim();
        if val.is_empty() {
            return;
        }
        if val.chars().any(|c| c.is_ascii_alphabetic()) && !val.contains("0x") {
            // A reference to another sequence, with an optional
            // arithmetic suffix: `other`, `other()`, `other*2`.
            let mut parts = expr::split_bare(val);
            if parts.is_empty() {
                return;
            }
            let head = parts.remove(0);
            let name = head.split('(').next().unwrap_or_default();
            if let Some(target) = self.get(name) {
                out.push(PoolValue::Ref(SeqRef {
                    target,
                    use_current: !head.contains('('),
                    suffix: parts.into_vec(),
                }));
            } else {
                log::debug!("dropping reference to unknown sequence '{name}'");
            }
        } else if let (Some(open), Some(close)) = (val.find('['), val.find(']')) {
            // Repeat shorthand: `v[n]` pushes v n times.
            if open < close {
                let n: f64 = val[..open].parse().unwrap_or(f64::NAN);
                let count: usize = val[open + 1..close].parse().unwrap_or(0);
                if !n.is_nan() {
                    for _ in 0..count {
                        out.push(PoolValue::Number(n));
                    }
                }
            }
        } else if let Some(hex) = val.strip_prefix("0x") {
            if let Ok(n) = i64::from_str_radix(hex, 16) {
                out.push(PoolValue::Number(n as f64));
            }
        } else if let Ok(n) = val.parse::<f64>() {
            out.push(PoolValue::Number(n));
        } else {
            log::debug!("skipping unparseable pool value '{val}'");
        }
    }

    // ========================================================================
    // Reading
    // ========================================================================

    /// The sequence's accumulated current value, or `None` before its
    /// first pick.
    pub fn current(&mut self, id: SeqId) -> Option<f64> {
        let v = self.current_raw(id, false);
        (!v.is_nan()).then_some(v)
    }

    /// Advance the sequence and return its new accumulated value.
    /// Returns NaN while the pool has never yielded (callers at the
    /// resolution boundary map that to zero).
    pub fn next(&mut self, id: SeqId) -> f64 {
        let committed = self.current_raw(id, false);
        self.sequences[id.0].prev = committed;
        self.sequences[id.0].pick();
        self.current_raw(id, true)
    }

    /// Resolve the current value including accumulation. NaN while
    /// unstarted. `force_ref_next` makes a referenced sequence advance
    /// even if it has already started (used right after a pick).
    fn current_raw(&mut self, id: SeqId, force_ref_next: bool) -> f64 {
        self.sequences[id.0].started = true;
        let out = match self.sequences[id.0].current.clone() {
            None => f64::NAN,
            Some(PoolValue::Number(n)) => n,
            Some(PoolValue::Ref(r)) => {
                let target_started = self.sequences[r.target.0].started;
                let v = if (!force_ref_next && target_started) || r.use_current {
                    self.current_raw(r.target, false)
                } else {
                    self.next(r.target)
                };
                if r.suffix.is_empty() {
                    v
                } else {
                    expr::eval_suffix(v, &r.suffix)
                }
            }
        };

        let seq = &mut self.sequences[id.0];
        if seq.prev.is_nan() {
            seq.prev = if seq.accumulator == Accumulator::Replace {
                0.0
            } else {
                out
            };
        }
        let prev = seq.prev;
        let iterations = f64::from(seq.iterations);
        let seed = seq.seed as f64;
        match seq.accumulator {
            Accumulator::Replace => out,
            Accumulator::Add => prev + out,
            Accumulator::Subtract => prev - out,
            Accumulator::Multiply => prev * out,
            Accumulator::Divide => {
                if out == 0.0 {
                    0.0
                } else {
                    prev / out
                }
            }
            Accumulator::Log => log_accum(seed, iterations, out).ln(),
            Accumulator::Log2 => log_accum(seed, iterations, out).log2(),
            Accumulator::Log10 => log_accum(seed, iterations, out).log10(),
            Accumulator::Pow => out.powf(iterations) - out,
        }
    }

    // ========================================================================
    // Reset
    // ========================================================================

    /// Restart one registered sequence.
    pub fn reset(&mut self, alias: &str) {
        if let Some(id) = self.get(alias) {
            self.sequences[id.0].reset();
        }
    }

    /// Restart every sequence, optionally reseeding. Aliases in `skip`
    /// are left untouched, so a sequence that only seeds another
    /// sequence survives its consumers' resets.
    pub fn reset_all(&mut self, seed: Option<u64>, skip: &[&str]) {
        if let Some(seed) = seed {
            self.seed = seed;
        }
        let skip_ids: Vec<SeqId> = skip.iter().filter_map(|a| self.get(a)).collect();
        for (i, seq) in self.sequences.iter_mut().enumerate() {
            if skip_ids.contains(&SeqId(i)) {
                continue;
            }
            match seed {
                Some(s) => seq.update_seed(s),
                None => seq.reset(),
            }
        }
    }

    // ========================================================================
    // Expression resolution
    // ========================================================================

    /// Resolve an expression to a number.
    ///
    /// Operands are separated by space-padded `+ - * / %` and resolved
    /// independently: numeric literals, the `depth`/`idepth`
    /// pseudo-variables, sequence aliases (bare = current value once
    /// started, `alias()` = always advance), or inline statements
    /// parsed on the fly. The rejoined expression evaluates with
    /// ordinary precedence. Anything unresolvable contributes zero.
    pub fn resolve(&mut self, expr: &str, depth: u32) -> f64 {
        let pieces = expr::split_padded(expr);
        let mut tokens: Vec<Token> = Vec::with_capacity(pieces.len());
        for piece in pieces {
            match piece {
                Piece::Op(c) => tokens.push(Token::Op(c)),
                Piece::Operand(text) => {
                    tokens.push(Token::Num(self.resolve_operand(&text, depth)));
                }
            }
        }
        expr::eval_tokens(&tokens)
    }

    fn resolve_operand(&mut self, operand: &str, depth: u32) -> f64 {
        let text = operand.trim().to_lowercase();
        if text.is_empty() {
            return 0.0;
        }
        if let Ok(n) = text.parse::<f64>() {
            return n;
        }
        if text == "depth" {
            return f64::from(depth);
        }
        if text == "idepth" {
            return 1.0 / f64::from(depth);
        }

        let (name, get_next) = match text.split_once("()") {
            Some((name, _)) => (name, true),
            None => (text.as_str(), false),
        };

        // A literal alias.
        if let Some(id) = self.get(name) {
            if get_next {
                return non_nan(self.next(id));
            }
            return match self.current(id) {
                Some(n) => n,
                None => non_nan(self.next(id)),
            };
        }

        // A statement that aliased itself on a previous resolution.
        if let Some((_, alias)) = text.split_once(" as ") {
            if let Some(id) = self.get(alias.trim()) {
                return non_nan(self.next(id));
            }
        }
        if let Some(id) = self.get(&text.replace(' ', "_")) {
            return non_nan(self.next(id));
        }

        // A brand new inline statement.
        let id = self.define(&text);
        non_nan(self.next(id))
    }
}

fn non_nan(v: f64) -> f64 {
    if v.is_nan() {
        0.0
    } else {
        v
    }
}

fn log_accum(seed: f64, iterations: f64, out: f64) -> f64 {
    (1.0 + seed + iterations * out).abs().max(1.0)
}

fn degraded_alias(stmt: &str, err: &ParseError) -> String {
    match err {
        ParseError::Empty => String::new(),
        _ => stmt.trim().to_lowercase().replace(' ', "_"),
    }
}

/// Inclusive numeric range expansion for `a-b` values expressions.
/// Integer operands step by one; decimal operands step at the finer
/// operand's precision.
fn parse_range(lo: &str, hi: &str, out: &mut Vec<PoolValue>) {
    let decimals = |s: &str| s.split('.').nth(1).map_or(0, str::len);
    let (Ok(a), Ok(b)) = (lo.parse::<f64>(), hi.parse::<f64>()) else {
        log::debug!("skipping unparseable range '{lo}-{hi}'");
        return;
    };
    let places = decimals(lo).max(decimals(hi));
    if places == 0 {
        let (a, b) = (a as i64, b as i64);
        for i in a..=b {
            out.push(PoolValue::Number(i as f64));
        }
    } else {
        let factor = 10f64.powi(places as i32);
        let (a, b) = ((a * factor).round() as i64, (b * factor).round() as i64);
        for i in a..=b {
            out.push(PoolValue::Number(i as f64 / factor));
        }
    }
}
