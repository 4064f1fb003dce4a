//! Coupled two-body matrix elements in the ME2JP text format.
//!
//! ```text
//! ME2JP emax=<N>
//! # optional comment lines
//! <A[p q r s; J]> for
//!     p ≥ q, in pair order p (p + 1) / 2 + q,
//!     r ≥ s, with pair order not above that of (p, q),
//!     π and tz of (r, s) equal to those of (p, q),
//!     J ascending within both triangles
//! ```
//!
//! Orbitals are numbered in the canonical order of
//! [`ho_orbitals`](../fn.ho_orbitals.html).  Elements of states forbidden by
//! the Pauli principle (`p = q` or `r = s` with an odd exchange symmetry)
//! must be zero.
use std::io::{self as stdio, BufRead};
use std::path::Path;
use std::sync::Arc;
use fnv::FnvHashMap;
use super::super::ang_mom;
use super::super::basis::Isospin;
use super::super::error::{Error, Result};
use super::super::half::Half;
use super::super::io::{self, TextTable};
use super::super::j_scheme::TwoBodyModelSpace;
use super::super::op::{Hermiticity, TwoBodyOp};
use super::super::parity::Parity;
use super::{check_orbitals, ho_orbitals, Nlj};

const MAGIC: &str = "ME2JP";

#[inline]
fn pair_index(p: usize, q: usize) -> usize {
    p * (p + 1) / 2 + q
}

type Key = (usize, usize, usize, usize, Half<i32>);

#[derive(Clone, Debug)]
pub struct Me2jp {
    e_max: i32,
    herm: Hermiticity,
    orbitals: Vec<(Nlj, Isospin)>,
    elems: FnvHashMap<Key, f64>,
}

impl Me2jp {
    /// Load from a (possibly `.gz` or `.xz` compressed) file.
    pub fn load(path: &Path, herm: Hermiticity) -> Result<Self> {
        let (_, r) = io::open_compressed(path)?;
        Self::from_reader(stdio::BufReader::new(r), herm)
    }

    pub fn from_reader<R: BufRead>(r: R, herm: Hermiticity) -> Result<Self> {
        let table = TextTable::read(r)?;
        let e_max = io::parse_header(&table.header, MAGIC)?;
        let orbitals = ho_orbitals(e_max);
        let j = |p: usize| orbitals[p].0.j;
        let pi = |p: usize| Parity::of(orbitals[p].0.l);
        let tz = |p: usize| orbitals[p].1.tz();
        let pauli = |p: usize, q: usize, jj: Half<i32>| {
            p == q && ang_mom::exchange_phase(j(p), j(q), jj) < 0.0
        };
        let mut values = table.values.into_iter();
        let mut elems = FnvHashMap::default();
        for p in 0 .. orbitals.len() {
            for q in 0 ..= p {
                for r in 0 ..= p {
                    for s in 0 ..= r {
                        if pair_index(r, s) > pair_index(p, q)
                            || pi(p) + pi(q) != pi(r) + pi(s)
                            || tz(p) + tz(q) != tz(r) + tz(s)
                        {
                            continue;
                        }
                        for jj in Half::tri_range_2((j(p), j(q)), (j(r), j(s))) {
                            let value = io::next_value(&mut values, MAGIC)?;
                            let forbidden = pauli(p, q, jj) || pauli(r, s, jj)
                                || ((p, q) == (r, s)
                                    && herm == Hermiticity::AntiHermitian);
                            if forbidden {
                                if value != 0.0 {
                                    return Err(Error::Format(format!(
                                        "{}: element ({} {}|{} {}; J={}) must \
                                         be zero, got {}",
                                        MAGIC, p, q, r, s, jj, value)));
                                }
                                continue;
                            }
                            elems.insert((p, q, r, s, jj), value);
                        }
                    }
                }
            }
        }
        io::expect_end(&mut values, MAGIC)?;
        debug!("loaded {} two-body elements (emax = {})", elems.len(), e_max);
        Ok(Self { e_max, herm, orbitals, elems })
    }

    #[inline]
    pub fn e_max(&self) -> i32 {
        self.e_max
    }

    #[inline]
    pub fn herm(&self) -> Hermiticity {
        self.herm
    }

    #[inline]
    pub fn orbitals(&self) -> &[(Nlj, Isospin)] {
        &self.orbitals
    }

    /// Number of stored (canonical, allowed) elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.elems.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.elems.is_empty()
    }

    /// `A[p q r s; J]` for any ordering of the indices; zero if absent.
    pub fn get(&self, p: usize, q: usize, r: usize, s: usize,
               jj: Half<i32>) -> f64 {
        let n = self.orbitals.len();
        if p >= n || q >= n || r >= n || s >= n {
            return 0.0;
        }
        let j = |x: usize| self.orbitals[x].0.j;
        if !jj.tri(j(p), j(q)) || !jj.tri(j(r), j(s)) {
            return 0.0;
        }
        let mut factor = 1.0;
        let (p, q) = if p < q {
            factor *= ang_mom::exchange_phase(j(p), j(q), jj);
            (q, p)
        } else {
            (p, q)
        };
        let (r, s) = if r < s {
            factor *= ang_mom::exchange_phase(j(r), j(s), jj);
            (s, r)
        } else {
            (r, s)
        };
        let (p, q, r, s) = if pair_index(p, q) < pair_index(r, s) {
            factor *= self.herm.factor();
            (r, s, p, q)
        } else {
            (p, q, r, s)
        };
        match self.elems.get(&(p, q, r, s, jj)) {
            Some(&value) => factor * value,
            None => 0.0,
        }
    }

    /// Copy into an operator.  The model space must use the canonical
    /// orbitals of the same `emax`.
    pub fn to_op(&self, space: &Arc<TwoBodyModelSpace>) -> Result<TwoBodyOp> {
        check_orbitals(space.sp(), &self.orbitals)?;
        let mut op = TwoBodyOp::from_model_space(space, self.herm);
        op.fill_with(|p, q, r, s, jj| self.get(p, q, r, s, jj));
        Ok(op)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tiny() {
        // emax = 0: orbitals 0 = 0s1/2 n, 1 = 0s1/2 p
        // (0 0|0 0) J=0,1; (1 0|1 0) J=0,1; (1 1|1 1) J=0,1
        let m = Me2jp::from_reader(&b"ME2JP emax=0\n\
                                      -1.0 0.0\n\
                                      -2.0 -3.0\n\
                                      -4.0 0\n"[..],
                                   Hermiticity::Hermitian).unwrap();
        assert_eq!(m.len(), 4);
        assert_eq!(m.get(0, 0, 0, 0, Half(0)), -1.0);
        assert_eq!(m.get(0, 1, 1, 0, Half(0)), -2.0);
        assert_eq!(m.get(0, 1, 1, 0, Half(2)), 3.0);
        assert_eq!(m.get(0, 1, 0, 1, Half(2)), -3.0);
        assert_eq!(m.get(1, 1, 1, 1, Half(2)), 0.0);
        assert_eq!(m.get(0, 0, 1, 1, Half(0)), 0.0);
        assert_eq!(m.get(0, 1, 1, 0, Half(4)), 0.0);
    }

    #[test]
    fn test_errors() {
        let e = Me2jp::from_reader(&b"ME2JP emax=0\n-1 0 -2 -3\n"[..],
                                   Hermiticity::Hermitian).unwrap_err();
        assert!(e.to_string().contains("unexpected end"));
        let e = Me2jp::from_reader(&b"ME2JP emax=0\n1 0 2 3 4 0\n"[..],
                                   Hermiticity::AntiHermitian).unwrap_err();
        assert!(e.to_string().contains("must be zero"));
        let e = Me2jp::from_reader(&b"ME1J emax=0\n"[..],
                                   Hermiticity::Hermitian).unwrap_err();
        assert!(e.is_format());
    }
}
