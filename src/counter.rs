use log::{debug, warn};
use web_sys::Element;

use crate::clock::{self, Machine, Step};
use crate::config::CounterConfig;

pub const COUNT_ATTR: &str = "data-count";

/// Count-up from zero toward `target` in fixed increments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Counter {
    target: i64,
    current: i64,
    step: i64,
    finished: bool,
}

impl Counter {
    pub fn new(target: i64, config: CounterConfig) -> Self {
        let frames = f64::from(config.duration_ms) / f64::from(config.tick_ms.max(1));
        let step = (target as f64 / frames).ceil() as i64;
        Self {
            target,
            current: 0,
            step,
            finished: false,
        }
    }

    pub fn step(&self) -> i64 {
        self.step
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Advances one tick and returns the value to display. Once the running
    /// value reaches the target the target itself is returned, so the
    /// display never overshoots. A target of zero or below finishes on the
    /// first tick because the step can never be positive.
    pub fn tick(&mut self) -> i64 {
        self.current = self.current.saturating_add(self.step);
        if self.current >= self.target {
            self.finished = true;
            self.target
        } else {
            self.current
        }
    }
}

/// Lenient integer parse in the style of `parseInt`: leading whitespace,
/// an optional sign, then as many digits as there are. Trailing junk is
/// ignored; no digits at all is `None`.
pub fn parse_count(raw: &str) -> Option<i64> {
    let raw = raw.trim_start();
    let (negative, rest) = match raw.as_bytes().first() {
        Some(b'-') => (true, &raw[1..]),
        Some(b'+') => (false, &raw[1..]),
        _ => (false, raw),
    };
    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    let value: i64 = rest[..digits].parse().ok()?;
    Some(if negative { -value } else { value })
}

/// `1234567` -> `"1,234,567"`. Always en-style commas rather than the
/// visitor's locale, so the same page renders the same digits everywhere.
pub fn group_thousands(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if n < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Ties a `Counter` to wherever its text goes. The first `advance` only
/// schedules the first tick, the way an interval timer behaves.
pub struct CountUp<F: FnMut(&str)> {
    counter: Counter,
    tick_ms: u32,
    started: bool,
    render: F,
}

impl<F: FnMut(&str)> CountUp<F> {
    pub fn new(counter: Counter, tick_ms: u32, render: F) -> Self {
        Self {
            counter,
            tick_ms,
            started: false,
            render,
        }
    }
}

impl<F: FnMut(&str)> Machine for CountUp<F> {
    fn advance(&mut self) -> Step {
        if self.counter.is_finished() {
            return Step::Done;
        }
        if self.started {
            let shown = self.counter.tick();
            (self.render)(&group_thousands(shown));
            if self.counter.is_finished() {
                return Step::Done;
            }
        }
        self.started = true;
        Step::Wait(self.tick_ms)
    }
}

pub fn start_count(el: Element, config: CounterConfig) {
    let raw = el.get_attribute(COUNT_ATTR).unwrap_or_default();
    let Some(target) = parse_count(&raw) else {
        warn!("Skipping counter with unreadable {COUNT_ATTR}={raw:?}");
        return;
    };
    let counter = Counter::new(target, config);
    debug!("Counting to {target} in steps of {}", counter.step());
    clock::spawn(CountUp::new(counter, config.tick_ms, move |text: &str| {
        el.set_text_content(Some(text));
    }));
}
