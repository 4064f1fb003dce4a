//! One-body matrix elements in the ME1J text format.
//!
//! ```text
//! ME1J emax=<N>
//! # optional comment lines
//! <zero-body constant>
//! <A[p q]> for p = 0, 1, …  and q = 0, …, p sharing (j, π, tz) with p
//! ```
//!
//! Orbitals are numbered in the canonical order of
//! [`ho_orbitals`](../fn.ho_orbitals.html).
use std::io::{self as stdio, BufRead};
use std::path::Path;
use std::sync::Arc;
use fnv::FnvHashMap;
use super::super::basis::Isospin;
use super::super::error::{Error, Result};
use super::super::io::{self, TextTable};
use super::super::j_scheme::OneBodyModelSpace;
use super::super::op::{Hermiticity, OneBodyOp};
use super::{check_orbitals, conserved, ho_orbitals, Nlj};

const MAGIC: &str = "ME1J";

#[derive(Clone, Debug)]
pub struct Me1j {
    e_max: i32,
    herm: Hermiticity,
    e0: f64,
    orbitals: Vec<(Nlj, Isospin)>,
    elems: FnvHashMap<(usize, usize), f64>,
}

impl Me1j {
    /// Load from a (possibly `.gz` or `.xz` compressed) file.
    pub fn load(path: &Path, herm: Hermiticity) -> Result<Self> {
        let (_, r) = io::open_compressed(path)?;
        Self::from_reader(stdio::BufReader::new(r), herm)
    }

    pub fn from_reader<R: BufRead>(r: R, herm: Hermiticity) -> Result<Self> {
        let table = TextTable::read(r)?;
        let e_max = io::parse_header(&table.header, MAGIC)?;
        let orbitals = ho_orbitals(e_max);
        let mut values = table.values.into_iter();
        let e0 = io::next_value(&mut values, MAGIC)?;
        let mut elems = FnvHashMap::default();
        for p in 0 .. orbitals.len() {
            for q in 0 ..= p {
                if conserved(orbitals[p]) != conserved(orbitals[q]) {
                    continue;
                }
                let value = io::next_value(&mut values, MAGIC)?;
                if p == q && herm == Hermiticity::AntiHermitian && value != 0.0 {
                    return Err(Error::Format(format!(
                        "{}: diagonal element {} of an anti-Hermitian \
                         operator is {}", MAGIC, p, value)));
                }
                elems.insert((p, q), value);
            }
        }
        io::expect_end(&mut values, MAGIC)?;
        debug!("loaded {} one-body elements (emax = {})", elems.len(), e_max);
        Ok(Self { e_max, herm, e0, orbitals, elems })
    }

    #[inline]
    pub fn e_max(&self) -> i32 {
        self.e_max
    }

    #[inline]
    pub fn herm(&self) -> Hermiticity {
        self.herm
    }

    /// Zero-body constant.
    #[inline]
    pub fn e0(&self) -> f64 {
        self.e0
    }

    #[inline]
    pub fn orbitals(&self) -> &[(Nlj, Isospin)] {
        &self.orbitals
    }

    /// `A[p q]`; zero if absent.
    pub fn get(&self, p: usize, q: usize) -> f64 {
        if p >= q {
            self.elems.get(&(p, q)).cloned().unwrap_or(0.0)
        } else {
            self.herm.factor() * self.elems.get(&(q, p)).cloned().unwrap_or(0.0)
        }
    }

    /// Copy into an operator.  The model space must use the canonical
    /// orbitals of the same `emax`.
    pub fn to_op(&self, space: &Arc<OneBodyModelSpace>) -> Result<OneBodyOp> {
        check_orbitals(space.sp(), &self.orbitals)?;
        let mut op = OneBodyOp::from_model_space(space, self.herm);
        op.fill_with(|p, q| self.get(p, q));
        Ok(op)
    }
}
