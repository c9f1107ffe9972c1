//! Simulation-wide parameters and engine parameter maps.
//!
//! Every registered component carries the same clock rate, tick budget
//! and debug level. Quantities keep their textual engine form (`"1GHz"`,
//! `"1ns"`) but are parsed and validated once, at the edge.

use crate::error::ParamsError;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Parameters attached to an engine component, in insertion order.
pub type ParamMap = IndexMap<String, String>;

/// Split `"<digits><unit>"` into its magnitude and unit.
fn split_quantity<'a>(what: &'static str, input: &'a str) -> Result<(u64, &'a str), ParamsError> {
    let trimmed = input.trim();
    let split = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len());
    let (digits, unit) = trimmed.split_at(split);
    if digits.is_empty() {
        return Err(ParamsError::Malformed {
            what,
            input: input.to_string(),
            reason: "expected a leading integer magnitude".to_string(),
        });
    }
    let value = digits.parse::<u64>().map_err(|e| ParamsError::Malformed {
        what,
        input: input.to_string(),
        reason: e.to_string(),
    })?;
    Ok((value, unit.trim()))
}

// ── Delay ──────────────────────────────────────────────────────────

/// Time unit of a [`Delay`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TimeUnit {
    /// Picoseconds.
    Ps,
    /// Nanoseconds.
    Ns,
    /// Microseconds.
    Us,
    /// Milliseconds.
    Ms,
    /// Seconds.
    S,
}

impl TimeUnit {
    fn as_str(self) -> &'static str {
        match self {
            Self::Ps => "ps",
            Self::Ns => "ns",
            Self::Us => "us",
            Self::Ms => "ms",
            Self::S => "s",
        }
    }

    fn picos(self) -> u128 {
        match self {
            Self::Ps => 1,
            Self::Ns => 1_000,
            Self::Us => 1_000_000,
            Self::Ms => 1_000_000_000,
            Self::S => 1_000_000_000_000,
        }
    }
}

/// Propagation delay of an engine link, e.g. `"1ns"`.
///
/// Zero delays are rejected: the engine orders events on a link by
/// delivery time.
///
/// ```
/// use townplan_core::Delay;
///
/// let d: Delay = "2ns".parse().unwrap();
/// assert_eq!(d.to_string(), "2ns");
/// assert!("0ns".parse::<Delay>().is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Delay {
    value: u64,
    unit: TimeUnit,
}

impl Delay {
    /// Create a delay; `value` must be non-zero.
    pub fn new(value: u64, unit: TimeUnit) -> Result<Self, ParamsError> {
        if value == 0 {
            return Err(ParamsError::ZeroDelay {
                input: format!("{value}{}", unit.as_str()),
            });
        }
        Ok(Self { value, unit })
    }

    /// One nanosecond.
    pub const fn one_ns() -> Self {
        Self {
            value: 1,
            unit: TimeUnit::Ns,
        }
    }

    /// Magnitude in the delay's own unit.
    pub fn value(&self) -> u64 {
        self.value
    }

    /// The delay's unit.
    pub fn unit(&self) -> TimeUnit {
        self.unit
    }

    /// The delay in picoseconds.
    pub fn as_picos(&self) -> u128 {
        u128::from(self.value) * self.unit.picos()
    }
}

impl Default for Delay {
    fn default() -> Self {
        Self::one_ns()
    }
}

impl fmt::Display for Delay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.value, self.unit.as_str())
    }
}

impl FromStr for Delay {
    type Err = ParamsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (value, unit) = split_quantity("delay", s)?;
        let unit = match unit {
            "ps" => TimeUnit::Ps,
            "ns" => TimeUnit::Ns,
            "us" => TimeUnit::Us,
            "ms" => TimeUnit::Ms,
            "s" => TimeUnit::S,
            other => {
                return Err(ParamsError::Malformed {
                    what: "delay",
                    input: s.to_string(),
                    reason: format!("unknown time unit '{other}'"),
                })
            }
        };
        if value == 0 {
            return Err(ParamsError::ZeroDelay {
                input: s.to_string(),
            });
        }
        Ok(Self { value, unit })
    }
}

impl TryFrom<String> for Delay {
    type Error = ParamsError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Delay> for String {
    fn from(d: Delay) -> Self {
        d.to_string()
    }
}

// ── ClockRate ──────────────────────────────────────────────────────

/// Frequency unit of a [`ClockRate`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FreqUnit {
    /// Hertz.
    Hz,
    /// Kilohertz.
    KHz,
    /// Megahertz.
    MHz,
    /// Gigahertz.
    GHz,
}

impl FreqUnit {
    fn as_str(self) -> &'static str {
        match self {
            Self::Hz => "Hz",
            Self::KHz => "kHz",
            Self::MHz => "MHz",
            Self::GHz => "GHz",
        }
    }
}

/// Simulation clock rate, e.g. `"1GHz"`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClockRate {
    value: u64,
    unit: FreqUnit,
}

impl ClockRate {
    /// One gigahertz.
    pub const fn one_ghz() -> Self {
        Self {
            value: 1,
            unit: FreqUnit::GHz,
        }
    }

    /// Magnitude in the rate's own unit.
    pub fn value(&self) -> u64 {
        self.value
    }

    /// The rate's unit.
    pub fn unit(&self) -> FreqUnit {
        self.unit
    }
}

impl Default for ClockRate {
    fn default() -> Self {
        Self::one_ghz()
    }
}

impl fmt::Display for ClockRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.value, self.unit.as_str())
    }
}

impl FromStr for ClockRate {
    type Err = ParamsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (value, unit) = split_quantity("clock rate", s)?;
        let unit = match unit.to_ascii_lowercase().as_str() {
            "hz" => FreqUnit::Hz,
            "khz" => FreqUnit::KHz,
            "mhz" => FreqUnit::MHz,
            "ghz" => FreqUnit::GHz,
            _ => {
                return Err(ParamsError::Malformed {
                    what: "clock rate",
                    input: s.to_string(),
                    reason: format!("unknown frequency unit '{unit}'"),
                })
            }
        };
        if value == 0 {
            return Err(ParamsError::ZeroClock {
                input: s.to_string(),
            });
        }
        Ok(Self { value, unit })
    }
}

impl TryFrom<String> for ClockRate {
    type Error = ParamsError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<ClockRate> for String {
    fn from(c: ClockRate) -> Self {
        c.to_string()
    }
}

// ── DebugLevel ─────────────────────────────────────────────────────

/// Engine-side debug verbosity passed to every component.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum DebugLevel {
    /// 0
    Fatal,
    /// 1
    Warn,
    /// 2
    #[default]
    Info,
    /// 3
    Debug,
    /// 4
    Trace,
    /// 5
    All,
}

impl TryFrom<u8> for DebugLevel {
    type Error = ParamsError;

    fn try_from(v: u8) -> Result<Self, Self::Error> {
        Ok(match v {
            0 => Self::Fatal,
            1 => Self::Warn,
            2 => Self::Info,
            3 => Self::Debug,
            4 => Self::Trace,
            5 => Self::All,
            value => return Err(ParamsError::DebugLevelOutOfRange { value }),
        })
    }
}

impl From<DebugLevel> for u8 {
    fn from(level: DebugLevel) -> Self {
        level as u8
    }
}

impl fmt::Display for DebugLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", u8::from(*self))
    }
}

// ── SimParams ──────────────────────────────────────────────────────

/// Parameters shared by every component in an assembly run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimParams {
    /// Simulation clock rate. Default: `1GHz`.
    pub clock: ClockRate,
    /// Number of clock ticks before the simulation ends. Default: 2.
    pub clock_ticks: u64,
    /// Engine debug level. Default: [`DebugLevel::Info`].
    pub debug: DebugLevel,
}

impl Default for SimParams {
    fn default() -> Self {
        Self {
            clock: ClockRate::one_ghz(),
            clock_ticks: 2,
            debug: DebugLevel::Info,
        }
    }
}

impl SimParams {
    /// Set the clock rate.
    pub fn with_clock(mut self, clock: ClockRate) -> Self {
        self.clock = clock;
        self
    }

    /// Set the tick budget.
    pub fn with_clock_ticks(mut self, ticks: u64) -> Self {
        self.clock_ticks = ticks;
        self
    }

    /// Set the debug level.
    pub fn with_debug(mut self, debug: DebugLevel) -> Self {
        self.debug = debug;
        self
    }

    /// Check invariants not already enforced by the field types.
    pub fn validate(&self) -> Result<(), ParamsError> {
        if self.clock_ticks == 0 {
            return Err(ParamsError::ZeroTicks);
        }
        Ok(())
    }

    /// Engine parameters under the keys components expect.
    pub fn to_param_map(&self) -> ParamMap {
        let mut map = ParamMap::new();
        self.extend_params(&mut map);
        map
    }

    /// Append `clock`, `clockTicks` and `debug` to `map`.
    pub fn extend_params(&self, map: &mut ParamMap) {
        map.insert("clock".to_string(), self.clock.to_string());
        map.insert("clockTicks".to_string(), self.clock_ticks.to_string());
        map.insert("debug".to_string(), self.debug.to_string());
    }
}
