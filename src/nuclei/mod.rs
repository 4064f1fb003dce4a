//! Nuclei in a 3D harmonic oscillator basis.
//!
//! Here we use the particle physics convention of proton = +½, neutron = −½.
//!
//! The canonical orbital ordering used by the matrix element files is
//! `(e, l, j, tz)`: shells in increasing order, then increasing `l`, then
//! `j = l − ½` before `j = l + ½`, then neutron before proton.

pub mod me1j;
pub mod me2jp;

use std::fmt;
use super::basis::{Isospin, SpBasis, SpState};
use super::error::Result;
use super::half::Half;
use super::parity::Parity;
use super::sp_chan::SpModelSpace;

/// Principal quantum number, orbital angular momentum magnitude, and total
/// angular momentum magnitude
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Nlj {
    /// Principal quantum number (n)
    pub n: i32,
    /// Orbital angular momentum magnitude (l)
    pub l: i32,
    /// Total angular momentum magnitude (j)
    pub j: Half<i32>,
}

/// Display using spectroscopic notation.
impl fmt::Display for Nlj {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let l = "spdfghiklmnoqrtuvwxyz".chars().nth(self.l as usize)
            .unwrap_or('?');
        write!(f, "{}{}{}", self.n, l, self.j)
    }
}

impl Nlj {
    /// Shell index (e)
    pub fn shell(self) -> i32 {
        2 * self.n + self.l
    }

    pub fn with(self, iso: Isospin, occ: f64) -> SpState {
        SpState { n: self.n, l: self.l, j: self.j, iso, occ }
    }
}

/// Iterator for 3D harmonic oscillator states in (e, l, j)-order.
#[derive(Clone, Debug)]
pub struct Ho3dIter(pub Nlj);

impl Default for Ho3dIter {
    fn default() -> Self {
        Ho3dIter(Nlj { n: 0, l: 0, j: Half(1) })
    }
}

impl Iterator for Ho3dIter {
    type Item = Nlj;
    fn next(&mut self) -> Option<Self::Item> {
        let nlj = self.0;
        let greater_j = Half::from(nlj.l) + Half(1);
        self.0 = if nlj.j != greater_j {
            Nlj { j: greater_j, .. nlj }
        } else if nlj.n > 0 {
            Nlj { n: nlj.n - 1, l: nlj.l + 2, j: nlj.j + Half(2) }
        } else {
            let e = nlj.shell() + 1;
            Nlj { n: e / 2, l: e % 2, j: Half(1) }
        };
        Some(nlj)
    }
}

/// Canonical orbitals up to shell `e_max` (empty if `e_max < 0`).
pub fn ho_orbitals(e_max: i32) -> Vec<(Nlj, Isospin)> {
    Ho3dIter::default()
        .take_while(|nlj| nlj.shell() <= e_max)
        .flat_map(|nlj| Isospin::ALL.iter().map(move |&iso| (nlj, iso)))
        .collect()
}

/// `(j, π, tz)` of an orbital, i.e. what a scalar one-body operator
/// conserves.
#[inline]
pub fn conserved((nlj, iso): (Nlj, Isospin)) -> (Half<i32>, Parity, Isospin) {
    (nlj.j, Parity::of(nlj.l), iso)
}

/// Check that the global orbital indices of `sp` follow `orbitals`.
pub fn check_orbitals(sp: &SpModelSpace, orbitals: &[(Nlj, Isospin)])
                      -> Result<()>
{
    precondition!(sp.num_orbitals() == orbitals.len(),
                  "expected {} orbitals, got {}",
                  orbitals.len(), sp.num_orbitals());
    for (p, &(nlj, iso)) in orbitals.iter().enumerate() {
        let ok = sp.state(p).map(|s| {
            s.n == nlj.n && s.l == nlj.l && s.j == nlj.j && s.iso == iso
        }).unwrap_or(false);
        precondition!(ok, "orbital {} is not {}{}", p, nlj, iso.label());
    }
    Ok(())
}

/// A closed-shell nucleus: all shells up to the Fermi level are filled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimpleNucleus {
    /// Maximum index of all available shells.
    pub e_max: i32,
    /// Maximum index of filled neutron shell.
    pub e_fermi_n: i32,
    /// Maximum index of filled proton shell.
    pub e_fermi_p: i32,
}

impl SimpleNucleus {
    /// ¹⁶O: `0s` and `0p` filled for both species.
    pub fn oxygen16(e_max: i32) -> Self {
        Self { e_max, e_fermi_n: 1, e_fermi_p: 1 }
    }

    pub fn e_fermi(&self, iso: Isospin) -> i32 {
        match iso {
            Isospin::Neutron => self.e_fermi_n,
            Isospin::Proton => self.e_fermi_p,
        }
    }

    /// The basis in canonical order with the reference occupations.
    pub fn to_basis(&self) -> Result<SpBasis> {
        precondition!(self.e_max >= 0, "e_max must not be negative");
        precondition!(self.e_fermi_n <= self.e_max
                      && self.e_fermi_p <= self.e_max,
                      "Fermi level above e_max: {:?}", self);
        SpBasis::new(ho_orbitals(self.e_max).into_iter().map(|(nlj, iso)| {
            let occ = if nlj.shell() <= self.e_fermi(iso) { 1.0 } else { 0.0 };
            nlj.with(iso, occ)
        }).collect())
    }
}
