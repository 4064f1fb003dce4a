//! J-scheme channels for one- and two-body operators.
//!
//! A one-body channel pairs a single-particle channel with itself (scalar
//! operators are block-diagonal in `(j, π, tz)`).  A two-body channel is an
//! ordered quadruple of single-particle channels `(k1 k2 | k3 k4)` together
//! with a coupled angular momentum `J`, subject to
//!
//! ```text
//! π1 + π2 = π3 + π4
//! tz1 + tz2 = tz3 + tz4
//! J ∈ tri(j1, j2) ∩ tri(j3, j4)
//! ```
//!
//! Both orderings of every pair are kept, so the two-body model space is
//! closed under exchange of the bra (or ket) constituents.
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use fnv::FnvHashMap;
use super::ang_mom;
use super::error::{Error, Result};
use super::half::Half;
use super::parity::Parity;
use super::sp_chan::{SpChanKey, SpChannel, SpModelSpace};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OneBodyChanKey {
    pub bra: SpChanKey,
    pub ket: SpChanKey,
}

#[derive(Clone, Debug)]
pub struct OneBodyChannel {
    pub key: OneBodyChanKey,
    pub bra: SpChannel,
    pub ket: SpChannel,
}

impl OneBodyChannel {
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.bra.len(), self.ket.len())
    }
}

/// Channels of scalar one-body operators.  Channel `l` is built from
/// single-particle channel `l`.
#[derive(Debug)]
pub struct OneBodyModelSpace {
    sp: Arc<SpModelSpace>,
    channels: Vec<OneBodyChannel>,
}

impl OneBodyModelSpace {
    pub fn new(sp: &Arc<SpModelSpace>) -> Result<Arc<Self>> {
        let channels: Vec<_> = sp.channels().iter().map(|chan| {
            OneBodyChannel {
                key: OneBodyChanKey { bra: chan.key, ket: chan.key },
                bra: chan.clone(),
                ket: chan.clone(),
            }
        }).collect();
        for (l, chan) in channels.iter().enumerate() {
            postcondition!(sp.index_of(chan.key.bra) == Some(l),
                           "one-body channel {} out of order", l);
        }
        Ok(Arc::new(Self { sp: sp.clone(), channels }))
    }

    #[inline]
    pub fn sp(&self) -> &Arc<SpModelSpace> {
        &self.sp
    }

    #[inline]
    pub fn channels(&self) -> &[OneBodyChannel] {
        &self.channels
    }

    #[inline]
    pub fn channel(&self, l: usize) -> &OneBodyChannel {
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

    pub fn index_of(&self, key: OneBodyChanKey) -> Option<usize> {
        if key.bra != key.ket {
            return None;
        }
        self.sp.index_of(key.bra)
    }
}

/// Conserved quantum numbers of a pair of single-particle channels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PairChan {
    pub parity: Parity,
    pub tz: Half<i32>,
}

impl PairChan {
    #[inline]
    pub fn of(k1: SpChanKey, k2: SpChanKey) -> Self {
        Self { parity: k1.parity() + k2.parity(), tz: k1.tz() + k2.tz() }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TwoBodyChanKey {
    pub k1: SpChanKey,
    pub k2: SpChanKey,
    pub k3: SpChanKey,
    pub k4: SpChanKey,
    pub j: Half<i32>,
}

impl fmt::Display for TwoBodyChanKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({} {}|{} {}; J={})",
               self.k1, self.k2, self.k3, self.k4, self.j)
    }
}

impl TwoBodyChanKey {
    #[inline]
    pub fn new(
        (k1, k2): (SpChanKey, SpChanKey),
        (k3, k4): (SpChanKey, SpChanKey),
        j: Half<i32>,
    ) -> Self {
        Self { k1, k2, k3, k4, j }
    }

    /// Whether the key satisfies the conservation laws and both triangular
    /// conditions.
    pub fn is_valid(&self) -> bool {
        PairChan::of(self.k1, self.k2) == PairChan::of(self.k3, self.k4)
            && self.j.tri(self.k1.j(), self.k2.j())
            && self.j.tri(self.k3.j(), self.k4.j())
    }

    /// Member of the minimal antisymmetric set: both pairs in
    /// non-decreasing order.
    #[inline]
    pub fn is_minimal(&self) -> bool {
        self.k1 <= self.k2 && self.k3 <= self.k4
    }

    /// `(k3 k4 | k1 k2)`
    #[inline]
    pub fn transpose(self) -> Self {
        Self { k1: self.k3, k2: self.k4, k3: self.k1, k4: self.k2, j: self.j }
    }

    #[inline]
    pub fn swap_bra(self) -> Self {
        Self { k1: self.k2, k2: self.k1, .. self }
    }

    #[inline]
    pub fn swap_ket(self) -> Self {
        Self { k3: self.k4, k4: self.k3, .. self }
    }

    /// Phase picked up when exchanging the bra constituents.
    #[inline]
    pub fn bra_phase(&self) -> f64 {
        ang_mom::exchange_phase(self.k1.j(), self.k2.j(), self.j)
    }

    /// Phase picked up when exchanging the ket constituents.
    #[inline]
    pub fn ket_phase(&self) -> f64 {
        ang_mom::exchange_phase(self.k3.j(), self.k4.j(), self.j)
    }
}

#[derive(Clone, Debug)]
pub struct TwoBodyChannel {
    pub key: TwoBodyChanKey,
    /// Single-particle channels in `k1 k2 k3 k4` order.
    pub sp: [SpChannel; 4],
}

impl TwoBodyChannel {
    #[inline]
    pub fn shape(&self) -> (usize, usize, usize, usize) {
        (self.sp[0].len(), self.sp[1].len(), self.sp[2].len(), self.sp[3].len())
    }

    #[inline]
    pub fn bra_len(&self) -> usize {
        self.sp[0].len() * self.sp[1].len()
    }

    #[inline]
    pub fn ket_len(&self) -> usize {
        self.sp[2].len() * self.sp[3].len()
    }
}

/// Where an element of a minimal channel reappears after exchanging the bra
/// and/or ket constituents.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AntisymPartner {
    pub chan: usize,
    pub swap_bra: bool,
    pub swap_ket: bool,
    pub phase: f64,
}

impl AntisymPartner {
    /// Map an index of the minimal channel to the partner's index.
    #[inline]
    pub fn permute(&self, (a, b, c, d): (usize, usize, usize, usize))
                   -> (usize, usize, usize, usize)
    {
        let (a, b) = if self.swap_bra { (b, a) } else { (a, b) };
        let (c, d) = if self.swap_ket { (d, c) } else { (c, d) };
        (a, b, c, d)
    }
}

/// Channels of scalar two-body operators, sorted by key.
#[derive(Debug)]
pub struct TwoBodyModelSpace {
    sp: Arc<SpModelSpace>,
    channels: Vec<TwoBodyChannel>,
    index: FnvHashMap<TwoBodyChanKey, usize>,
    pair_chans: FnvHashMap<PairChan, usize>,
    /// Ordered pairs of single-particle channels grouped by `PairChan`.
    buckets: Vec<Vec<(SpChanKey, SpChanKey)>>,
    /// Two-body channels grouped by the single-particle channel of `k2`.
    by_second_bra: Vec<Vec<usize>>,
}

impl TwoBodyModelSpace {
    pub fn new(sp: &Arc<SpModelSpace>) -> Result<Arc<Self>> {
        let mut groups = BTreeMap::new();
        for c1 in sp.channels() {
            for c2 in sp.channels() {
                groups.entry(PairChan::of(c1.key, c2.key))
                    .or_insert_with(Vec::new)
                    .push((c1.key, c2.key));
            }
        }

        let mut keys = Vec::new();
        for bucket in groups.values() {
            for &bra in bucket {
                for &ket in bucket {
                    for j in Half::tri_range_2((bra.0.j(), bra.1.j()),
                                               (ket.0.j(), ket.1.j())) {
                        keys.push(TwoBodyChanKey::new(bra, ket, j));
                    }
                }
            }
        }
        let num_generated = keys.len();
        keys.sort();
        keys.dedup();
        postcondition!(keys.len() == num_generated,
                       "duplicate two-body channels generated");

        let mut channels = Vec::with_capacity(keys.len());
        for key in keys {
            let lookup = |k| sp.channel_of(k).cloned();
            match (lookup(key.k1), lookup(key.k2),
                   lookup(key.k3), lookup(key.k4)) {
                (Some(c1), Some(c2), Some(c3), Some(c4)) => {
                    channels.push(TwoBodyChannel { key, sp: [c1, c2, c3, c4] });
                }
                _ => postcondition!(false, "unknown channel in {}", key),
            }
        }

        let index: FnvHashMap<_, _> = channels.iter().enumerate()
            .map(|(i, chan)| (chan.key, i))
            .collect();
        let mut pair_chans = FnvHashMap::default();
        let mut buckets = Vec::with_capacity(groups.len());
        for (pc, bucket) in groups {
            pair_chans.insert(pc, buckets.len());
            buckets.push(bucket);
        }
        let mut by_second_bra = vec![Vec::new(); sp.len()];
        for (i, chan) in channels.iter().enumerate() {
            if let Some(l) = sp.index_of(chan.key.k2) {
                by_second_bra[l].push(i);
            }
        }

        let this = Self {
            sp: sp.clone(),
            channels,
            index,
            pair_chans,
            buckets,
            by_second_bra,
        };
        this.validate()?;
        info!("two-body model space: {} channels, {} elements",
              this.channels.len(), this.num_elems());
        Ok(Arc::new(this))
    }

    fn validate(&self) -> Result<()> {
        postcondition!(self.index.len() == self.channels.len(),
                       "channel index is not a bijection");
        for (i, chan) in self.channels.iter().enumerate() {
            postcondition!(self.index.get(&chan.key) == Some(&i),
                           "channel index is not a bijection at {}", i);
            postcondition!(chan.key.is_valid(), "invalid channel {}", chan.key);
            for (c, k) in chan.sp.iter()
                .zip(&[chan.key.k1, chan.key.k2, chan.key.k3, chan.key.k4])
            {
                postcondition!(c.key == *k, "channel {} has wrong parts",
                               chan.key);
            }
        }
        let mut total = 0;
        for l in &self.by_second_bra {
            total += l.len();
        }
        postcondition!(total == self.channels.len(),
                       "second-bra index is incomplete");
        Ok(())
    }

    #[inline]
    pub fn sp(&self) -> &Arc<SpModelSpace> {
        &self.sp
    }

    #[inline]
    pub fn channels(&self) -> &[TwoBodyChannel] {
        &self.channels
    }

    #[inline]
    pub fn channel(&self, l: usize) -> &TwoBodyChannel {
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

    /// Total number of matrix elements over all blocks.
    pub fn num_elems(&self) -> usize {
        self.channels.iter().map(|c| c.bra_len() * c.ket_len()).sum()
    }

    #[inline]
    pub fn index_of(&self, key: &TwoBodyChanKey) -> Option<usize> {
        self.index.get(key).cloned()
    }

    /// Like `index_of`, but a missing channel is an internal error.
    pub fn require_index(&self, key: &TwoBodyChanKey) -> Result<usize> {
        match self.index_of(key) {
            Some(i) => Ok(i),
            None => Err(Error::Postcondition {
                site: concat!(module_path!(), ":", line!()),
                cond: format!("channel {} is missing", key),
            }),
        }
    }

    /// Index of the channel `(k3 k4 | k1 k2)` for channel `i`.
    #[inline]
    pub fn transpose_index(&self, i: usize) -> Result<usize> {
        self.require_index(&self.channels[i].key.transpose())
    }

    /// All ordered pairs `(X, Y)` with the same conserved quantum numbers as
    /// `(k1, k2)`.
    pub fn pair_bucket(&self, k1: SpChanKey, k2: SpChanKey)
                       -> &[(SpChanKey, SpChanKey)]
    {
        match self.pair_chans.get(&PairChan::of(k1, k2)) {
            Some(&i) => &self.buckets[i],
            None => &[],
        }
    }

    /// Indices of the two-body channels whose `k2` is single-particle
    /// channel `l`.
    #[inline]
    pub fn channels_with_second_bra(&self, l: usize) -> &[usize] {
        &self.by_second_bra[l]
    }

    /// The channel itself followed by its bra-swapped, ket-swapped, and
    /// doubly swapped partners.
    pub fn antisym_partners(&self, key: &TwoBodyChanKey)
                            -> Result<[AntisymPartner; 4]>
    {
        let bra_phase = key.bra_phase();
        let ket_phase = key.ket_phase();
        let mut partners = [AntisymPartner {
            chan: 0,
            swap_bra: false,
            swap_ket: false,
            phase: 1.0,
        }; 4];
        let variants = [
            (*key, false, false, 1.0),
            (key.swap_bra(), true, false, bra_phase),
            (key.swap_ket(), false, true, ket_phase),
            (key.swap_bra().swap_ket(), true, true, bra_phase * ket_phase),
        ];
        for (slot, &(k, swap_bra, swap_ket, phase)) in
            partners.iter_mut().zip(&variants)
        {
            let chan = match self.index_of(&k) {
                Some(i) => i,
                None => return Err(Error::Precondition {
                    site: concat!(module_path!(), ":", line!()),
                    cond: format!("channel {} is missing", k),
                }),
            };
            *slot = AntisymPartner { chan, swap_bra, swap_ket, phase };
        }
        Ok(partners)
    }
}

#[cfg(test)]
mod tests {
    use super::super::basis::{Isospin, SpBasis, SpState};
    use super::super::nuclei::SimpleNucleus;
    use super::*;

    fn key(tj: i32, parity: Parity, iso: Isospin) -> SpChanKey {
        SpChanKey::encode(Half(tj), parity, iso).unwrap()
    }

    #[test]
    fn test_one_body() {
        let b = SimpleNucleus::oxygen16(2).to_basis().unwrap();
        let sp = SpModelSpace::new(&b).unwrap();
        let space = OneBodyModelSpace::new(&sp).unwrap();
        assert_eq!(space.len(), sp.len());
        for (l, chan) in space.channels().iter().enumerate() {
            assert_eq!(chan.key.bra, chan.key.ket);
            assert_eq!(space.index_of(chan.key), Some(l));
            assert!(Arc::ptr_eq(&chan.bra.basis, &sp.channel(l).basis));
        }
        let k1 = sp.channel(0).key;
        let k2 = sp.channel(1).key;
        assert_eq!(space.index_of(OneBodyChanKey { bra: k1, ket: k2 }), None);
    }

    #[test]
    fn test_hand_enumerated() {
        let b = SimpleNucleus { e_max: 0, e_fermi_n: 0, e_fermi_p: 0 }
            .to_basis().unwrap();
        assert_eq!(b.len(), 2);
        let sp = SpModelSpace::new(&b).unwrap();
        let space = TwoBodyModelSpace::new(&sp).unwrap();
        let n = key(1, Parity::Even, Isospin::Neutron);
        let p = key(1, Parity::Even, Isospin::Proton);
        let mut expected = Vec::new();
        for &(bra, ket) in &[((n, n), (n, n)),
                             ((n, p), (n, p)), ((n, p), (p, n)),
                             ((p, n), (n, p)), ((p, n), (p, n)),
                             ((p, p), (p, p))] {
            for &j in &[Half(0), Half(2)] {
                expected.push(TwoBodyChanKey::new(bra, ket, j));
            }
        }
        expected.sort();
        let actual: Vec<_> = space.channels().iter().map(|c| c.key).collect();
        assert_eq!(actual, expected);
        assert_eq!(space.pair_bucket(n, p), &[(n, p), (p, n)]);
        assert_eq!(space.pair_bucket(p, p), &[(p, p)]);
    }

    #[test]
    fn test_invariants() {
        let b = SimpleNucleus::oxygen16(3).to_basis().unwrap();
        let sp = SpModelSpace::new(&b).unwrap();
        let space = TwoBodyModelSpace::new(&sp).unwrap();
        for (i, chan) in space.channels().iter().enumerate() {
            let k = chan.key;
            assert!(k.j.tri(k.k1.j(), k.k2.j()));
            assert!(k.j.tri(k.k3.j(), k.k4.j()));
            assert_eq!(k.k1.parity() + k.k2.parity(),
                       k.k3.parity() + k.k4.parity());
            assert_eq!(k.k1.tz() + k.k2.tz(), k.k3.tz() + k.k4.tz());
            assert_eq!(space.index_of(&k), Some(i));
            assert!(space.index_of(&k.transpose()).is_some());
            assert!(space.channels_with_second_bra(
                sp.index_of(k.k2).unwrap()).contains(&i));
            let (n1, n2, n3, n4) = chan.shape();
            assert_eq!(chan.bra_len() * chan.ket_len(), n1 * n2 * n3 * n4);
        }
        for w in space.channels().windows(2) {
            assert!(w[0].key < w[1].key);
        }
    }

    #[test]
    fn test_exhaustive_against_brute_force() {
        let b = SimpleNucleus::oxygen16(2).to_basis().unwrap();
        let sp = SpModelSpace::new(&b).unwrap();
        let space = TwoBodyModelSpace::new(&sp).unwrap();
        let keys: Vec<_> = sp.channels().iter().map(|c| c.key).collect();
        let mut count = 0;
        for &k1 in &keys {
            for &k2 in &keys {
                for &k3 in &keys {
                    for &k4 in &keys {
                        for tj in (0 .. 20).step_by(2) {
                            let key = TwoBodyChanKey::new((k1, k2), (k3, k4),
                                                          Half(tj));
                            assert_eq!(key.is_valid(),
                                       space.index_of(&key).is_some(),
                                       "{}", key);
                            if key.is_valid() {
                                count += 1;
                            }
                        }
                    }
                }
            }
        }
        assert_eq!(count, space.len());
    }

    #[test]
    fn test_antisym_partners() {
        let b = SimpleNucleus::oxygen16(1).to_basis().unwrap();
        let sp = SpModelSpace::new(&b).unwrap();
        let space = TwoBodyModelSpace::new(&sp).unwrap();
        let s = key(1, Parity::Even, Isospin::Neutron);
        let p = key(3, Parity::Odd, Isospin::Proton);
        let k = TwoBodyChanKey::new((s, p), (s, p), Half(2));
        let partners = space.antisym_partners(&k).unwrap();
        assert_eq!(partners[0].chan, space.index_of(&k).unwrap());
        assert_eq!(partners[1].chan, space.index_of(&k.swap_bra()).unwrap());
        // j1 + j2 − J = 1/2 + 3/2 − 1 = 1
        assert_eq!(partners[1].phase, 1.0);
        assert_eq!(partners[3].phase, 1.0);
        assert_eq!(partners[3].permute((0, 1, 2, 3)), (1, 0, 3, 2));
        assert_eq!(partners[2].permute((0, 1, 2, 3)), (0, 1, 3, 2));
        let k = TwoBodyChanKey::new((s, p), (s, p), Half(4));
        let partners = space.antisym_partners(&k).unwrap();
        assert_eq!(partners[1].phase, -1.0);
        assert_eq!(partners[2].phase, -1.0);
        assert_eq!(partners[3].phase, 1.0);

        let d = key(5, Parity::Even, Isospin::Neutron);
        let k = TwoBodyChanKey::new((s, d), (s, d), Half(4));
        let e = space.antisym_partners(&k).unwrap_err();
        assert!(e.is_precondition());
        assert!(e.to_string().contains("is missing"));
    }

    #[test]
    fn test_empty_channels() {
        let b = SpBasis::new(vec![SpState {
            n: 0, l: 0, j: Half(1), iso: Isospin::Neutron, occ: 1.0,
        }]).unwrap();
        let d = key(5, Parity::Even, Isospin::Neutron);
        let sp = SpModelSpace::with_keys(&b, &[d]).unwrap();
        let space = TwoBodyModelSpace::new(&sp).unwrap();
        let k = TwoBodyChanKey::new((d, d), (d, d), Half(4));
        let l = space.index_of(&k).unwrap();
        assert_eq!(space.channel(l).shape(), (0, 0, 0, 0));
        assert!(space.num_elems() > 0);
    }
}
