//! Worker-count interpretation.
//!
//! `N` is an exact worker count, `<factor>x` means `factor * logical cores`.
//! Both are floored and clamped to at least one worker. Factors are exact
//! decimals and results beyond `u64` saturate.

use std::fmt;
use std::str::FromStr;

use crate::errors::TranslateError;

/// Source of the logical core count.
pub trait CoreCount {
    fn logical_cores(&self) -> usize;
}

/// Logical CPUs of the current machine.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemCores;

impl CoreCount for SystemCores {
    fn logical_cores(&self) -> usize {
        num_cpus::get()
    }
}

/// A fixed core count (config override, tests).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedCores(pub usize);

impl CoreCount for FixedCores {
    fn logical_cores(&self) -> usize {
        self.0
    }
}

/// A non-negative decimal factor kept as its digits and a decimal scale,
/// so `0.29` is `29 / 10^2` exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Factor {
    digits: Vec<u8>,
    scale: usize,
}

impl Factor {
    /// `floor(self * n)`, saturating at `u64::MAX`.
    fn floor_mul(&self, n: u64) -> u64 {
        let mut product = Vec::with_capacity(self.digits.len() + 20);
        let mut carry: u128 = 0;
        for &d in self.digits.iter().rev() {
            let cur = u128::from(d) * u128::from(n) + carry;
            product.push((cur % 10) as u8);
            carry = cur / 10;
        }
        while carry > 0 {
            product.push((carry % 10) as u8);
            carry /= 10;
        }
        // `product` is little-endian; drop the fractional digits.
        let integer = product.get(self.scale..).unwrap_or_default();
        saturating_decimal(integer.iter().rev().copied())
    }
}

impl FromStr for Factor {
    type Err = ();

    /// `1`, `0.5`, `.5`, `2.`; no sign, exponent or `inf`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (int, frac) = s.split_once('.').unwrap_or((s, ""));
        let bytes = int.bytes().chain(frac.bytes());
        if int.len() + frac.len() == 0 || !bytes.clone().all(|b| b.is_ascii_digit()) {
            return Err(());
        }
        Ok(Factor {
            digits: bytes.map(|b| b - b'0').collect(),
            scale: frac.len(),
        })
    }
}

impl fmt::Display for Factor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let split = self.digits.len() - self.scale;
        let render = |ds: &[u8]| ds.iter().map(|d| char::from(b'0' + d)).collect::<String>();
        let int = render(&self.digits[..split]);
        let frac = render(&self.digits[split..]);
        let frac = frac.trim_end_matches('0');
        let int = match int.trim_start_matches('0') {
            "" => "0",
            trimmed => trimmed,
        };
        if frac.is_empty() {
            write!(f, "{int}")
        } else {
            write!(f, "{int}.{frac}")
        }
    }
}

/// Value of a big-endian digit sequence, saturating at `u64::MAX`.
fn saturating_decimal(digits: impl Iterator<Item = u8>) -> u64 {
    digits.fold(0u64, |acc, d| {
        acc.checked_mul(10)
            .and_then(|v| v.checked_add(u64::from(d)))
            .unwrap_or(u64::MAX)
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerCount {
    Exact(u64),
    PerCore(Factor),
}

impl WorkerCount {
    pub fn resolve(&self, cores: &dyn CoreCount) -> u64 {
        let n = match self {
            WorkerCount::Exact(n) => *n,
            WorkerCount::PerCore(factor) => {
                factor.floor_mul(u64::try_from(cores.logical_cores()).unwrap_or(u64::MAX))
            }
        };
        n.max(1)
    }
}

impl FromStr for WorkerCount {
    type Err = TranslateError;

    fn from_str(spec: &str) -> Result<Self, Self::Err> {
        if let Some(factor) = spec.strip_suffix('x') {
            return factor.parse().map(WorkerCount::PerCore).map_err(|()| {
                TranslateError::invalid_worker_spec(
                    spec,
                    "expected <factor>x with a non-negative decimal factor",
                )
            });
        }

        if spec.is_empty() || !spec.bytes().all(|b| b.is_ascii_digit()) {
            return Err(TranslateError::invalid_worker_spec(
                spec,
                "expected an integer or <factor>x",
            ));
        }
        Ok(WorkerCount::Exact(saturating_decimal(
            spec.bytes().map(|b| b - b'0'),
        )))
    }
}

impl fmt::Display for WorkerCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkerCount::Exact(n) => write!(f, "{n}"),
            WorkerCount::PerCore(factor) => write!(f, "{factor}x"),
        }
    }
}

/// Parse and resolve in one step.
pub fn resolve_workers(spec: &str, cores: &dyn CoreCount) -> Result<u64, TranslateError> {
    let count: WorkerCount = spec.parse()?;
    let resolved = count.resolve(cores);
    tracing::debug!(spec, cores = cores.logical_cores(), resolved, "resolved worker count");
    Ok(resolved)
}
