//! Single-particle channels.
//!
//! Orbitals sharing the same `(j, π, tz)` form a channel.  Scalar operators
//! never connect different channels, so they become block-diagonal in this
//! decomposition.
use std::fmt;
use std::sync::Arc;
use ndarray::Array1;
use super::basis::{Isospin, SpBasis, SpState};
use super::error::Result;
use super::half::Half;
use super::parity::Parity;
use super::utils::cast;

/// Largest doubled `j` that fits in the packed key (safe up to
/// `e_max = 30`).
pub const MAX_TWO_J: i32 = 63;

/// Number of distinct packed keys.
pub const NUM_KEYS: usize = 128;

/// Packed `(j, π, tz)`.
///
/// Layout of the `u8`: bits 2–6 hold `(2 j − 1) / 2`, bit 1 the parity,
/// bit 0 the isospin (`1` = proton).  Packing is order-preserving, so keys
/// compare lexicographically in `(j, π, tz)`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SpChanKey(u8);

impl fmt::Debug for SpChanKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "SpChanKey({})", self)
    }
}

impl fmt::Display for SpChanKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}{}", self.j(), self.parity(), self.iso().label())
    }
}

impl SpChanKey {
    pub fn encode(j: Half<i32>, parity: Parity, iso: Isospin) -> Result<Self> {
        let tj = j.twice();
        precondition!(tj > 0 && tj % 2 != 0 && tj <= MAX_TWO_J,
                      "cannot pack j = {} (must be half-odd and at most {})",
                      j, Half(MAX_TWO_J));
        let p: u8 = parity.into();
        let t: u8 = match iso {
            Isospin::Neutron => 0,
            Isospin::Proton => 1,
        };
        Ok(SpChanKey(cast::<_, u8>((tj - 1) / 2) << 2 | p << 1 | t))
    }

    #[inline]
    pub fn decode(self) -> (Half<i32>, Parity, Isospin) {
        (self.j(), self.parity(), self.iso())
    }

    pub fn of_state(s: &SpState) -> Result<Self> {
        Self::encode(s.j, s.parity(), s.iso)
    }

    /// Recover a key from its packed index.
    pub fn from_index(index: usize) -> Result<Self> {
        precondition!(index < NUM_KEYS, "bad channel index: {}", index);
        Ok(SpChanKey(cast(index)))
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub fn j(self) -> Half<i32> {
        Half(2 * (self.0 >> 2) as i32 + 1)
    }

    #[inline]
    pub fn parity(self) -> Parity {
        Parity::of((self.0 >> 1) & 1)
    }

    #[inline]
    pub fn iso(self) -> Isospin {
        if self.0 & 1 == 0 {
            Isospin::Neutron
        } else {
            Isospin::Proton
        }
    }

    #[inline]
    pub fn tz(self) -> Half<i32> {
        self.iso().tz()
    }
}

/// The orbitals of one channel.
#[derive(Clone, Debug, PartialEq)]
pub struct PartialBasis {
    /// Global orbital index of each state.
    pub orbitals: Vec<usize>,
    pub states: Vec<SpState>,
    pub occ: Array1<f64>,
    /// `1 − occ`
    pub unocc: Array1<f64>,
}

impl PartialBasis {
    fn new(entries: Vec<(usize, SpState)>) -> Self {
        let occ = entries.iter().map(|&(_, s)| s.occ).collect();
        let unocc = entries.iter().map(|&(_, s)| s.unocc()).collect();
        let (orbitals, states) = entries.into_iter().unzip();
        Self { orbitals, states, occ, unocc }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

#[derive(Clone, Debug)]
pub struct SpChannel {
    pub key: SpChanKey,
    pub basis: Arc<PartialBasis>,
}

impl SpChannel {
    #[inline]
    pub fn len(&self) -> usize {
        self.basis.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.basis.is_empty()
    }

    #[inline]
    pub fn j(&self) -> Half<i32> {
        self.key.j()
    }

    #[inline]
    pub fn occ(&self) -> &Array1<f64> {
        &self.basis.occ
    }

    #[inline]
    pub fn unocc(&self) -> &Array1<f64> {
        &self.basis.unocc
    }
}

/// All single-particle channels of a basis, sorted by key.
///
/// Occupations are captured at construction; later changes to the
/// `SpBasis` need a new model space.
#[derive(Debug)]
pub struct SpModelSpace {
    channels: Vec<SpChannel>,
    chan_index: Vec<Option<usize>>,
    /// `(l, u)` of each global orbital.
    locations: Vec<(usize, usize)>,
}

impl SpModelSpace {
    pub fn new(basis: &SpBasis) -> Result<Arc<Self>> {
        Self::with_keys(basis, &[])
    }

    /// Like `new`, but also create (possibly empty) channels for `keys`.
    pub fn with_keys(basis: &SpBasis, keys: &[SpChanKey])
                     -> Result<Arc<Self>>
    {
        let mut groups: Vec<Vec<(usize, SpState)>> = vec![Vec::new(); NUM_KEYS];
        let mut present = vec![false; NUM_KEYS];
        for &k in keys {
            present[k.index()] = true;
        }
        for (p, s) in basis.states().iter().enumerate() {
            let k = SpChanKey::of_state(s)?;
            present[k.index()] = true;
            groups[k.index()].push((p, *s));
        }

        let mut channels = Vec::new();
        let mut chan_index = vec![None; NUM_KEYS];
        let mut locations = vec![(0, 0); basis.len()];
        for (i, group) in groups.into_iter().enumerate() {
            if !present[i] {
                continue;
            }
            let mut group = group;
            group.sort_by_key(|&(p, s)| (s.n, p));
            let l = channels.len();
            for (u, &(p, _)) in group.iter().enumerate() {
                locations[p] = (l, u);
            }
            chan_index[i] = Some(l);
            channels.push(SpChannel {
                key: SpChanKey::from_index(i)?,
                basis: Arc::new(PartialBasis::new(group)),
            });
        }

        let this = Self { channels, chan_index, locations };
        this.validate(basis)?;
        info!("single-particle model space: {} orbitals in {} channels",
              basis.len(), this.channels.len());
        Ok(Arc::new(this))
    }

    fn validate(&self, basis: &SpBasis) -> Result<()> {
        for w in self.channels.windows(2) {
            postcondition!(w[0].key < w[1].key, "channels not sorted");
        }
        for (p, &(l, u)) in self.locations.iter().enumerate() {
            let chan = &self.channels[l];
            postcondition!(chan.basis.orbitals[u] == p,
                           "orbital {} not at ({}, {})", p, l, u);
            postcondition!(SpChanKey::of_state(&basis.states()[p])? == chan.key,
                           "orbital {} in the wrong channel", p);
        }
        Ok(())
    }

    #[inline]
    pub fn channels(&self) -> &[SpChannel] {
        &self.channels
    }

    #[inline]
    pub fn channel(&self, l: usize) -> &SpChannel {
        &self.channels[l]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.channels.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    #[inline]
    pub fn num_orbitals(&self) -> usize {
        self.locations.len()
    }

    /// O(1) lookup of a channel index by key.
    #[inline]
    pub fn index_of(&self, key: SpChanKey) -> Option<usize> {
        self.chan_index[key.index()]
    }

    #[inline]
    pub fn channel_of(&self, key: SpChanKey) -> Option<&SpChannel> {
        self.index_of(key).map(|l| &self.channels[l])
    }

    /// `(l, u)` of orbital `p`.
    #[inline]
    pub fn locate(&self, p: usize) -> Option<(usize, usize)> {
        self.locations.get(p).cloned()
    }

    /// Orbital data for `p`.
    pub fn state(&self, p: usize) -> Option<&SpState> {
        self.locate(p).map(|(l, u)| &self.channels[l].basis.states[u])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn basis() -> SpBasis {
        let mut states = Vec::new();
        for &(n, l, tj, occ) in &[(0, 0, 1, 1.0), (0, 1, 1, 0.0),
                                  (0, 1, 3, 0.0), (1, 0, 1, 0.0)] {
            for &iso in &Isospin::ALL {
                states.push(SpState { n, l, j: Half(tj), iso, occ });
            }
        }
        SpBasis::new(states).unwrap()
    }

    #[test]
    fn test_key_bijection() {
        let mut seen = vec![false; NUM_KEYS];
        for tj in (1 ..= MAX_TWO_J).step_by(2) {
            for &p in &[Parity::Even, Parity::Odd] {
                for &iso in &Isospin::ALL {
                    let k = SpChanKey::encode(Half(tj), p, iso).unwrap();
                    assert_eq!(k.decode(), (Half(tj), p, iso));
                    assert!(!seen[k.index()]);
                    seen[k.index()] = true;
                    assert_eq!(SpChanKey::from_index(k.index()).unwrap(), k);
                }
            }
        }
        assert!(seen.iter().all(|&x| x));
        assert!(SpChanKey::encode(Half(65), Parity::Even, Isospin::Proton)
                .unwrap_err().is_precondition());
        assert!(SpChanKey::encode(Half(2), Parity::Even, Isospin::Proton)
                .unwrap_err().is_precondition());
        assert!(SpChanKey::from_index(NUM_KEYS).is_err());
    }

    #[test]
    fn test_key_order() {
        let a = SpChanKey::encode(Half(1), Parity::Odd, Isospin::Proton)
            .unwrap();
        let b = SpChanKey::encode(Half(3), Parity::Even, Isospin::Neutron)
            .unwrap();
        let c = SpChanKey::encode(Half(3), Parity::Even, Isospin::Proton)
            .unwrap();
        assert!(a < b && b < c);
        assert_eq!(format!("{}", a), "1/2-p");
    }

    #[test]
    fn test_model_space() {
        let b = basis();
        let space = SpModelSpace::new(&b).unwrap();
        // s1/2 (n, p), p1/2 (n, p), p3/2 (n, p)
        assert_eq!(space.len(), 6);
        assert_eq!(space.num_orbitals(), 8);
        let s_n = SpChanKey::encode(Half(1), Parity::Even, Isospin::Neutron)
            .unwrap();
        let l = space.index_of(s_n).unwrap();
        let chan = space.channel(l);
        assert_eq!(chan.len(), 2);
        assert_eq!(chan.basis.orbitals, vec![0, 6]);
        assert_eq!(chan.occ().to_vec(), vec![1.0, 0.0]);
        assert_eq!(chan.unocc().to_vec(), vec![0.0, 1.0]);
        assert_eq!(space.locate(6), Some((l, 1)));
        assert_eq!(space.state(6).unwrap().n, 1);
        let d_n = SpChanKey::encode(Half(5), Parity::Even, Isospin::Neutron)
            .unwrap();
        assert_eq!(space.index_of(d_n), None);
    }

    #[test]
    fn test_empty_channels() {
        let b = basis();
        let d_p = SpChanKey::encode(Half(5), Parity::Even, Isospin::Proton)
            .unwrap();
        let space = SpModelSpace::with_keys(&b, &[d_p]).unwrap();
        assert_eq!(space.len(), 7);
        let l = space.index_of(d_p).unwrap();
        assert!(space.channel(l).is_empty());
        assert_eq!(space.channel(l).occ().len(), 0);
        let empty = SpModelSpace::new(&SpBasis::default()).unwrap();
        assert!(empty.is_empty());
    }
}
