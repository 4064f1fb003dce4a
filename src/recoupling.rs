//! Angular momentum recoupling coefficients (Wigner 3-jm, 6-j and
//! Clebsch–Gordan).
//!
//! The symbols are evaluated exactly by `wigner_symbols` and rounded to
//! `f64`.  The oracle has to be initialized before use:
//!
//! ```
//! use jblock::recoupling::{RecouplingOracle, Wigner3jm};
//! use jblock::runtime::RuntimeConf;
//!
//! let rt = RuntimeConf::default().build().unwrap();
//! let mut oracle = RecouplingOracle::default();
//! oracle.initialize(&rt).unwrap();
//! let w = oracle.wigner_3jm(Wigner3jm {
//!     tj1: 2, tm1: 0, tj2: 2, tm2: 0, tj3: 0, tm3: 0,
//! }).unwrap();
//! assert!((w + 1.0 / 3f64.sqrt()).abs() < 1e-14);
//! ```
//!
//! All arguments use doubled units (e.g. `tj1 = 3` means `j1 = 3/2`).
use std::sync::Mutex;
use fnv::FnvHashMap;
use super::error::{Error, Result};
use super::runtime::Runtime;

/// Arguments of a Wigner 3-jm symbol.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Wigner3jm {
    pub tj1: i32,
    pub tm1: i32,
    pub tj2: i32,
    pub tm2: i32,
    pub tj3: i32,
    pub tm3: i32,
}

impl Wigner3jm {
    fn value(self) -> f64 {
        let Wigner3jm { tj1, tm1, tj2, tm2, tj3, tm3 } = self;
        if tm1 + tm2 + tm3 != 0
            || !triangle(tj1, tj2, tj3)
            || !projection(tj1, tm1)
            || !projection(tj2, tm2)
            || !projection(tj3, tm3)
        {
            return 0.0;
        }
        f64::from(wigner_symbols::Wigner3jm {
            tj1, tm1, tj2, tm2, tj3, tm3,
        }.value())
    }
}

/// Arguments of a Wigner 6-j symbol.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Wigner6j {
    pub tj1: i32,
    pub tj2: i32,
    pub tj3: i32,
    pub tj4: i32,
    pub tj5: i32,
    pub tj6: i32,
}

impl Wigner6j {
    fn value(self) -> f64 {
        let Wigner6j { tj1, tj2, tj3, tj4, tj5, tj6 } = self;
        if !triangle(tj1, tj2, tj3)
            || !triangle(tj1, tj5, tj6)
            || !triangle(tj4, tj2, tj6)
            || !triangle(tj4, tj5, tj3)
        {
            return 0.0;
        }
        f64::from(wigner_symbols::Wigner6j {
            tj1, tj2, tj3, tj4, tj5, tj6,
        }.value())
    }
}

/// Arguments of a Clebsch–Gordan coefficient `⟨j1 m1 j2 m2|j12 m12⟩`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ClebschGordan {
    pub tj1: i32,
    pub tm1: i32,
    pub tj2: i32,
    pub tm2: i32,
    pub tj12: i32,
    pub tm12: i32,
}

impl ClebschGordan {
    fn value(self) -> f64 {
        let ClebschGordan { tj1, tm1, tj2, tm2, tj12, tm12 } = self;
        if tm1 + tm2 != tm12
            || !triangle(tj1, tj2, tj12)
            || !projection(tj1, tm1)
            || !projection(tj2, tm2)
            || !projection(tj12, tm12)
        {
            return 0.0;
        }
        f64::from(wigner_symbols::ClebschGordan {
            tj1, tm1, tj2, tm2, tj12, tm12,
        }.value())
    }
}

/// Whether `(tj1, tj2, tj3)` satisfies the triangular condition.
#[inline]
pub fn triangle(tj1: i32, tj2: i32, tj3: i32) -> bool {
    tj1 >= 0 && tj2 >= 0 && tj3 >= 0
        && tj3 >= (tj1 - tj2).abs()
        && tj3 <= tj1 + tj2
        && (tj1 + tj2 + tj3) % 2 == 0
}

/// Whether `tm` is an allowed projection of `tj`.
#[inline]
fn projection(tj: i32, tm: i32) -> bool {
    tm.abs() <= tj && (tj + tm) % 2 == 0
}

#[derive(Debug)]
struct Tables {
    max_two_j: i32,
    /// One 6-j cache per worker plus one for threads outside the pool.
    ///
    /// Entries are never evicted.  Every key has all six `tj` in
    /// `0 ..= max_two_j`, so a cache holds at most `(max_two_j + 1)^6`
    /// entries and in practice far fewer, since only symbols satisfying
    /// the four triads reach the cache.
    w6j_caches: Vec<Mutex<FnvHashMap<Wigner6j, f64>>>,
}

#[derive(Debug)]
enum State {
    Uninitialized,
    Initialized(Tables),
}

/// Service handle for recoupling coefficients.
///
/// Lifecycle: `Uninitialized → Initialized`.  Queries before
/// initialization, repeated initialization, and initialization from within
/// a parallel region are all precondition errors.  Once initialized, the
/// oracle can be shared by reference across threads.
#[derive(Debug)]
pub struct RecouplingOracle {
    state: State,
}

impl Default for RecouplingOracle {
    fn default() -> Self {
        Self { state: State::Uninitialized }
    }
}

impl RecouplingOracle {
    pub fn is_initialized(&self) -> bool {
        match self.state {
            State::Initialized(_) => true,
            State::Uninitialized => false,
        }
    }

    pub fn initialize(&mut self, runtime: &Runtime) -> Result<()> {
        precondition!(!Runtime::in_parallel_region(),
                      "recoupling oracle initialized inside a parallel region");
        precondition!(!self.is_initialized(),
                      "recoupling oracle initialized twice");
        let max_two_j = runtime.conf().max_two_j;
        let w6j_caches = (0 .. runtime.num_threads() + 1)
            .map(|_| Mutex::new(FnvHashMap::default()))
            .collect();
        trace!("recoupling oracle: max_two_j = {}, {} scratch slots",
               max_two_j, runtime.num_threads() + 1);
        self.state = State::Initialized(Tables { max_two_j, w6j_caches });
        Ok(())
    }

    fn tables(&self) -> Result<&Tables> {
        match self.state {
            State::Initialized(ref t) => Ok(t),
            State::Uninitialized => Err(Error::Precondition {
                site: concat!(module_path!(), ":", line!()),
                cond: "recoupling oracle queried before initialization"
                    .to_owned(),
            }),
        }
    }

    /// Wigner 3-jm symbol.  Returns zero if the selection rules are violated.
    pub fn wigner_3jm(&self, w: Wigner3jm) -> Result<f64> {
        let t = self.tables()?;
        t.check_range(&[w.tj1, w.tj2, w.tj3])?;
        Ok(w.value())
    }

    /// Wigner 6-j symbol `{j1 j2 j3; j4 j5 j6}`.  Returns zero if any of the
    /// four triads violates the triangular condition.
    pub fn wigner_6j(&self, w: Wigner6j) -> Result<f64> {
        let t = self.tables()?;
        t.check_range(&[w.tj1, w.tj2, w.tj3, w.tj4, w.tj5, w.tj6])?;
        let n = t.w6j_caches.len() - 1;
        let slot = rayon::current_thread_index().map(|i| i % n).unwrap_or(n);
        let mut cache = match t.w6j_caches[slot].lock() {
            Ok(c) => c,
            Err(poisoned) => poisoned.into_inner(),
        };
        Ok(*cache.entry(w).or_insert_with(|| w.value()))
    }

    /// Clebsch–Gordan coefficient.
    pub fn clebsch_gordan(&self, cg: ClebschGordan) -> Result<f64> {
        let t = self.tables()?;
        t.check_range(&[cg.tj1, cg.tj2, cg.tj12])?;
        Ok(cg.value())
    }

    /// Number of cached 6-j symbols summed over all slots.
    pub fn num_cached_6j(&self) -> Result<usize> {
        Ok(self.tables()?.w6j_caches.iter().map(|c| match c.lock() {
            Ok(c) => c.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }).sum())
    }
}

impl Tables {
    fn check_range(&self, tjs: &[i32]) -> Result<()> {
        for &tj in tjs {
            precondition!(tj <= self.max_two_j,
                          "angular momentum {}/2 exceeds max_two_j = {}",
                          tj, self.max_two_j);
        }
        Ok(())
    }
}
