//! Sequence state and picker strategies.

use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::SeedableRng;
use rand::seq::SliceRandom;

/// Index of a sequence inside its [`PatternContext`](crate::PatternContext) arena.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct SeqId(pub(crate) usize);

impl SeqId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Strategy governing how a sequence picks its next value.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Picker {
    /// Drain the pool once; silently yields nothing when exhausted.
    /// (`reverse` statements parse to `Once` over a reversed pool.)
    #[default]
    Once,
    /// Cyclic refill from the consumed buffer, in original order.
    Repeat,
    /// Like `Repeat`, but consumed values refill front-first, so each
    /// cycle runs in the opposite order of the previous one.
    Yoyo,
    /// Seeded Fisher-Yates reshuffle before the first pick, then
    /// cyclic refill.
    Shuffle,
    /// Reshuffle once per full cycle; no immediate repeats inside a
    /// cycle.
    Random,
    /// The iteration counter, read as a fixed-width binary number,
    /// indexes the original pool digit by digit.
    Binary,
}

impl Picker {
    pub fn parse(s: &str) -> Option<Picker> {
        match s {
            "once" | "reverse" => Some(Picker::Once),
            "repeat" => Some(Picker::Repeat),
            "yoyo" => Some(Picker::Yoyo),
            "shuffle" => Some(Picker::Shuffle),
            "random" => Some(Picker::Random),
            "binary" => Some(Picker::Binary),
            _ => None,
        }
    }

    pub fn is_type_keyword(s: &str) -> bool {
        Picker::parse(s).is_some()
    }
}

/// Arithmetic chaining applied across successive picks.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Accumulator {
    #[default]
    Replace,
    Add,
    Subtract,
    Multiply,
    Divide,
    Log,
    Log2,
    Log10,
    Pow,
}

impl Accumulator {
    pub fn parse(s: &str) -> Option<Accumulator> {
        match s {
            "replace" => Some(Accumulator::Replace),
            "add" => Some(Accumulator::Add),
            "subtract" => Some(Accumulator::Subtract),
            "multiply" => Some(Accumulator::Multiply),
            "divide" => Some(Accumulator::Divide),
            "log" => Some(Accumulator::Log),
            "log2" => Some(Accumulator::Log2),
            "log10" => Some(Accumulator::Log10),
            "pow" => Some(Accumulator::Pow),
            _ => None,
        }
    }
}

/// A lazy reference to another sequence, with an optional arithmetic
/// suffix applied to the referenced value (`other*2`).
#[derive(Clone, Debug)]
pub struct SeqRef {
    pub target: SeqId,
    /// Bare references read the target's current value; `alias()` form
    /// always advances it.
    pub use_current: bool,
    /// Trailing operator/operand tokens, alternating.
    pub suffix: Vec<String>,
}

/// One entry of a sequence's value pool.
#[derive(Clone, Debug)]
pub enum PoolValue {
    Number(f64),
    Ref(SeqRef),
}

/// A named, stateful, seeded value generator.
///
/// Picking mutates the pool/used buffers; accumulation and reference
/// resolution happen in [`PatternContext`](crate::PatternContext),
/// which owns the arena the references point into.
#[derive(Debug)]
pub struct Sequence {
    pub(crate) alias: String,
    pub(crate) values: VecDeque<PoolValue>,
    pub(crate) original: Vec<PoolValue>,
    pub(crate) used: VecDeque<PoolValue>,
    pub(crate) picker: Picker,
    pub(crate) accumulator: Accumulator,
    pub(crate) max_iterations: u32,
    pub(crate) iterations: u32,
    pub(crate) binary_length: u32,
    pub(crate) first_pick: bool,
    pub(crate) seed: u64,
    pub(crate) rng: StdRng,
    /// Running accumulated value; NaN until seeded by the first pick.
    pub(crate) prev: f64,
    pub(crate) current: Option<PoolValue>,
    /// Set once any consumer has observed this sequence.
    pub started: bool,
    /// Set when a configured max-iteration count has been reached.
    pub done: bool,
}

impl Sequence {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        alias: String,
        values: Vec<PoolValue>,
        picker: Picker,
        max_iterations: u32,
        accumulator: Accumulator,
        seed: u64,
        binary_length: u32,
    ) -> Self {
        Self {
            alias,
            original: values.clone(),
            values: values.into(),
            used: VecDeque::new(),
            picker,
            accumulator,
            max_iterations,
            iterations: 0,
            binary_length: binary_length.clamp(1, 32),
            first_pick: true,
            seed,
            rng: StdRng::seed_from_u64(seed),
            prev: f64::NAN,
            current: None,
            started: false,
            done: false,
        }
    }

    pub fn alias(&self) -> &str {
        &self.alias
    }

    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    /// Restore the initial pool and picking state. The `started` flag
    /// deliberately survives a reset: consumers that saw this sequence
    /// keep reading it through `current` semantics.
    pub fn reset(&mut self) {
        self.prev = f64::NAN;
        self.current = None;
        self.values = self.original.clone().into();
        self.used.clear();
        self.iterations = 0;
        self.first_pick = true;
        self.rng = StdRng::seed_from_u64(self.seed);
        self.done = false;
    }

    /// Change the seed and restart.
    pub fn update_seed(&mut self, seed: u64) {
        self.seed = seed;
        self.reset();
    }

    /// Run the picker once, moving one pool value into `current`.
    pub(crate) fn pick(&mut self) {
        match self.picker {
            Picker::Once => self.pick_once(),
            Picker::Repeat => self.pick_repeat(false),
            Picker::Yoyo => self.pick_repeat(true),
            Picker::Shuffle => self.pick_shuffle(),
            Picker::Random => self.pick_random(),
            Picker::Binary => self.pick_binary(),
        }
    }

    fn take_front(&mut self, to_front: bool) {
        if let Some(v) = self.values.pop_front() {
            self.current = Some(v.clone());
            if to_front {
                self.used.push_front(v);
            } else {
                self.used.push_back(v);
            }
        }
    }

    /// Refill the pool from the consumed buffer when drained.
    fn refill_if_empty(&mut self) {
        if self.values.is_empty() {
            std::mem::swap(&mut self.values, &mut self.used);
        }
    }

    /// Bump the cycle counter when the pool just drained; flags `done`
    /// once the configured cycle cap is hit.
    fn end_cycle_check(&mut self) {
        if self.values.is_empty() {
            self.iterations += 1;
            if self.max_iterations > 0 && self.iterations == self.max_iterations {
                self.done = true;
            }
        }
    }

    fn pick_once(&mut self) {
        if self.values.is_empty() {
            return;
        }
        self.take_front(false);
    }

    fn pick_repeat(&mut self, yoyo: bool) {
        if self.done {
            return;
        }
        self.refill_if_empty();
        self.take_front(yoyo);
        self.end_cycle_check();
    }

    fn pick_shuffle(&mut self) {
        if self.done {
            return;
        }
        if self.current.is_none() {
            self.shuffle_pool();
        }
        self.refill_if_empty();
        self.take_front(true);
        self.end_cycle_check();
    }

    fn pick_random(&mut self) {
        if self.done {
            return;
        }
        self.refill_if_empty();
        if self.used.is_empty() {
            self.shuffle_pool();
        }
        self.take_front(true);
        self.end_cycle_check();
    }

    fn pick_binary(&mut self) {
        if self.done {
            return;
        }
        if self.first_pick {
            let width = self.binary_length as usize;
            let digits = format!("{:0width$b}", self.iterations);
            self.values = digits
                .bytes()
                .filter_map(|b| self.original.get((b - b'0') as usize).cloned())
                .collect();
            self.used.clear();
            self.first_pick = false;
            if self.iterations == 0 && self.seed > 0 {
                for _ in 0..self.seed {
                    self.values.pop_front();
                }
            }
        }
        self.take_front(false);
        if self.values.is_empty() {
            self.iterations += 1;
            self.first_pick = true;
            if u64::from(self.iterations) > 1u64 << self.binary_length {
                self.iterations = 0;
            }
        }
    }

    fn shuffle_pool(&mut self) {
        self.values.make_contiguous().shuffle(&mut self.rng);
    }
}
