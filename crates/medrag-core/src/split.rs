//! Reproducible train/test partitioning of the corpus.
//!
//! Sampling reproduces CPython's `random.seed(seed)` followed by
//! `random.sample(range(n), test_size)`: an MT19937 generator initialised with
//! `init_by_array` over the little-endian 32-bit words of the seed, the
//! bit-rejection `randbelow`, and the pool / selection-set variants of
//! `sample`. Splits therefore match those produced by the Python tooling the
//! corpus was first evaluated with.

use rand::RngCore;
use rand_mt::Mt;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::info;

use crate::error::{Error, Result};
use crate::types::CorpusRecord;

/// Index partition of a corpus of size `n`. Both lists are ascending, disjoint
/// and together cover `0..n`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Split {
    pub train_indices: Vec<usize>,
    pub test_indices: Vec<usize>,
}

/// The three derived lists persisted after a split, in corpus order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    pub train_answers: Vec<String>,
    pub test_questions: Vec<String>,
    pub test_answers: Vec<String>,
}

impl Split {
    pub fn len(&self) -> usize { self.train_indices.len() + self.test_indices.len() }

    pub fn is_empty(&self) -> bool { self.len() == 0 }

    /// Project `records` onto the split. `records` must be the corpus the split
    /// was computed for.
    pub fn partition(&self, records: &[CorpusRecord]) -> Result<Partition> {
        if records.len() != self.len() {
            return Err(Error::InvalidInput(format!(
                "split covers {} records but corpus has {}",
                self.len(),
                records.len()
            )));
        }
        Ok(Partition {
            train_answers: self.train_indices.iter().map(|&i| records[i].answer.clone()).collect(),
            test_questions: self.test_indices.iter().map(|&i| records[i].question.clone()).collect(),
            test_answers: self.test_indices.iter().map(|&i| records[i].answer.clone()).collect(),
        })
    }
}

/// Split `records` into a training pool and `test_size` held-out records.
pub fn split(records: &[CorpusRecord], test_size: usize, seed: u64) -> Result<Split> {
    let split = split_indices(records.len(), test_size, seed)?;
    info!(
        corpus = records.len(),
        train = split.train_indices.len(),
        test = split.test_indices.len(),
        seed,
        "corpus split"
    );
    Ok(split)
}

/// Index-only variant of [`split`] for a corpus of `n` records.
pub fn split_indices(n: usize, test_size: usize, seed: u64) -> Result<Split> {
    if test_size == 0 || test_size >= n {
        return Err(Error::InvalidConfiguration(format!(
            "test_size must satisfy 0 < test_size < {n}, got {test_size}"
        )));
    }
    let mut sampler = PySampler::seeded(seed);
    let mut chosen = vec![false; n];
    for i in sampler.sample(n, test_size) {
        chosen[i] = true;
    }
    let (test_indices, train_indices): (Vec<usize>, Vec<usize>) = (0..n).partition(|&i| chosen[i]);
    Ok(Split { train_indices, test_indices })
}

/// Sampling primitives with CPython `random` semantics over any 32-bit source.
pub struct PySampler<R: RngCore> {
    rng: R,
}

impl PySampler<Mt> {
    pub fn seeded(seed: u64) -> Self {
        let lo = seed as u32;
        let hi = (seed >> 32) as u32;
        let key: Vec<u32> = if hi == 0 { vec![lo] } else { vec![lo, hi] };
        Self { rng: Mt::new_with_key(key) }
    }
}

impl<R: RngCore> PySampler<R> {
    /// `getrandbits(k)` for `k <= 64`; words are filled least significant first.
    fn getrandbits(&mut self, k: u32) -> u64 {
        match k {
            0 => 0,
            1..=32 => u64::from(self.rng.next_u32() >> (32 - k)),
            _ => {
                let low = u64::from(self.rng.next_u32());
                let high = u64::from(self.rng.next_u32() >> (64 - k));
                (high << 32) | low
            }
        }
    }

    /// Uniform integer in `0..n`, `n >= 1`.
    pub fn randbelow(&mut self, n: usize) -> usize {
        let bits = usize::BITS - n.leading_zeros();
        loop {
            let r = self.getrandbits(bits) as usize;
            if r < n {
                return r;
            }
        }
    }

    /// `k` distinct values from `0..n`, in selection order.
    pub fn sample(&mut self, n: usize, k: usize) -> Vec<usize> {
        debug_assert!(k <= n);
        let mut setsize = 21usize;
        if k > 5 {
            let exp = ((k as f64) * 3.0).ln() / 4f64.ln();
            setsize += 4usize.pow(exp.ceil() as u32);
        }
        let mut result = Vec::with_capacity(k);
        if n <= setsize {
            let mut pool: Vec<usize> = (0..n).collect();
            for i in 0..k {
                let j = self.randbelow(n - i);
                result.push(pool[j]);
                pool[j] = pool[n - i - 1];
            }
        } else {
            let mut selected = HashSet::with_capacity(k);
            for _ in 0..k {
                let mut j = self.randbelow(n);
                while selected.contains(&j) {
                    j = self.randbelow(n);
                }
                selected.insert(j);
                result.push(j);
            }
        }
        result
    }
}
