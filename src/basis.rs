//! Single-particle basis.
//!
//! Naming convention (used throughout the crate):
//!
//!   - `l` = channel index (in text, `λ` is sometimes used)
//!   - `u` = auxiliary index, i.e. the position of a state within its channel
//!   - `p` = global orbital index, isomorphic to `(l, u)`
//!
//! Be aware that these letters may also have other meanings in more
//! concrete contexts (e.g. `l` is also the orbital angular momentum of an
//! [`SpState`](struct.SpState.html)).
use std::fmt;
use super::error::Result;
use super::half::Half;
use super::parity::Parity;

/// Isospin projection.  We use the particle physics convention of
/// proton = +½, neutron = −½.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord,
         Serialize, Deserialize)]
pub enum Isospin {
    Neutron,
    Proton,
}

impl Isospin {
    pub const ALL: [Isospin; 2] = [Isospin::Neutron, Isospin::Proton];

    /// Doubled isospin projection.
    #[inline]
    pub fn tz(self) -> Half<i32> {
        match self {
            Isospin::Neutron => Half(-1),
            Isospin::Proton => Half(1),
        }
    }

    #[inline]
    pub fn from_tz(tz: Half<i32>) -> Option<Self> {
        match tz {
            Half(-1) => Some(Isospin::Neutron),
            Half(1) => Some(Isospin::Proton),
            _ => None,
        }
    }

    #[inline]
    pub fn label(self) -> char {
        match self {
            Isospin::Neutron => 'n',
            Isospin::Proton => 'p',
        }
    }
}

/// A single-particle orbital.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpState {
    /// Radial excitation number
    pub n: i32,
    /// Orbital angular momentum
    pub l: i32,
    /// Total angular momentum
    pub j: Half<i32>,
    pub iso: Isospin,
    /// Occupation number in the reference state: 1 for holes, 0 for
    /// particles, anything in between for valence orbitals.
    pub occ: f64,
}

impl fmt::Display for SpState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let l = "spdfghiklmnoqrtuvwxyz".chars().nth(self.l as usize)
            .unwrap_or('?');
        write!(f, "{}{}{}{}", self.n, l, self.j, self.iso.label())
    }
}

impl SpState {
    /// Harmonic oscillator shell index `e = 2 n + l`.
    #[inline]
    pub fn shell(&self) -> i32 {
        2 * self.n + self.l
    }

    #[inline]
    pub fn parity(&self) -> Parity {
        Parity::of(self.l)
    }

    /// `1 − occ`
    #[inline]
    pub fn unocc(&self) -> f64 {
        1.0 - self.occ
    }
}

/// An ordered list of single-particle orbitals.  The position of an orbital
/// in the list is its global index `p`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SpBasis {
    states: Vec<SpState>,
}

impl SpBasis {
    pub fn new(states: Vec<SpState>) -> Result<Self> {
        for s in &states {
            precondition!(s.j.twice() % 2 != 0 && s.j.twice() > 0,
                          "orbital {} has a non-half-odd j", s);
            precondition!(s.l >= 0 && s.n >= 0, "orbital {} has n or l < 0", s);
            precondition!(Half::from(s.l).abs_diff(s.j) == Half(1),
                          "orbital {}: l must be within 1/2 of j", s);
            precondition!(0.0 <= s.occ && s.occ <= 1.0,
                          "orbital {} has occupation {}", s, s.occ);
        }
        Ok(Self { states })
    }

    #[inline]
    pub fn states(&self) -> &[SpState] {
        &self.states
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Update the occupation of orbital `p` in place.
    pub fn set_occupation(&mut self, p: usize, occ: f64) -> Result<()> {
        precondition!(p < self.states.len(), "orbital {} out of range", p);
        precondition!(0.0 <= occ && occ <= 1.0, "bad occupation: {}", occ);
        self.states[p].occ = occ;
        Ok(())
    }

    /// Number of particles in the reference state, split by isospin.
    pub fn num_particles(&self, iso: Isospin) -> f64 {
        self.states.iter()
            .filter(|s| s.iso == iso)
            .map(|s| s.occ * (s.j.twice() + 1) as f64)
            .sum()
    }
}
