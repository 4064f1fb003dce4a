//! Block-diagonal operators over J-scheme model spaces.
//!
//! An operator owns one dense block per channel of its model space and
//! shares the model space itself through an `Arc`.  Two operators are
//! compatible only if they point to the very same model space.
use std::sync::Arc;
use ndarray::{Array2, Array4, ArrayView2, ArrayView4, ArrayViewMut2,
              ArrayViewMut4};
use rand::Rng;
use rand_distr::StandardNormal;
use super::antisym;
use super::error::Result;
use super::half::Half;
use super::j_scheme::{OneBodyModelSpace, TwoBodyChanKey, TwoBodyModelSpace};
use super::sp_chan::SpModelSpace;

/// Whether an operator is Hermitian (`A† = A`) or anti-Hermitian
/// (`A† = −A`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Hermiticity {
    Hermitian,
    AntiHermitian,
}

impl Hermiticity {
    /// `+1` or `−1`: the factor relating `A[q p]` to `A[p q]`.
    #[inline]
    pub fn factor(self) -> f64 {
        match self {
            Hermiticity::Hermitian => 1.0,
            Hermiticity::AntiHermitian => -1.0,
        }
    }

    /// Hermiticity of `[A, B]`.
    #[inline]
    pub fn commutator(a: Self, b: Self) -> Self {
        if a == b {
            Hermiticity::AntiHermitian
        } else {
            Hermiticity::Hermitian
        }
    }
}

#[derive(Clone, Debug)]
pub struct OneBodyOp {
    space: Arc<OneBodyModelSpace>,
    blocks: Vec<Array2<f64>>,
    herm: Hermiticity,
}

impl OneBodyOp {
    /// Zero operator.
    pub fn from_model_space(space: &Arc<OneBodyModelSpace>,
                            herm: Hermiticity) -> Self {
        let blocks = space.channels().iter()
            .map(|chan| Array2::zeros(chan.shape()))
            .collect();
        Self { space: space.clone(), blocks, herm }
    }

    #[inline]
    pub fn space(&self) -> &Arc<OneBodyModelSpace> {
        &self.space
    }

    #[inline]
    pub fn sp(&self) -> &Arc<SpModelSpace> {
        self.space.sp()
    }

    #[inline]
    pub fn herm(&self) -> Hermiticity {
        self.herm
    }

    #[inline]
    pub fn block(&self, l: usize) -> ArrayView2<f64> {
        self.blocks[l].view()
    }

    #[inline]
    pub fn block_mut(&mut self, l: usize) -> ArrayViewMut2<f64> {
        self.blocks[l].view_mut()
    }

    #[inline]
    pub fn blocks(&self) -> &[Array2<f64>] {
        &self.blocks
    }

    /// Disjoint mutable access to every block.
    #[inline]
    pub fn blocks_mut(&mut self) -> &mut [Array2<f64>] {
        &mut self.blocks
    }

    #[inline]
    pub fn same_space(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.space, &other.space)
    }

    /// Matrix element by global orbital indices.  Zero if the orbitals are
    /// in different channels (or out of range).
    pub fn get(&self, p: usize, q: usize) -> f64 {
        match (self.sp().locate(p), self.sp().locate(q)) {
            (Some((l1, u1)), Some((l2, u2))) if l1 == l2 => {
                self.blocks[l1][[u1, u2]]
            }
            _ => 0.0,
        }
    }

    /// Overwrite every stored element with `f(p, q)`.
    pub fn fill_with<F>(&mut self, mut f: F)
        where F: FnMut(usize, usize) -> f64
    {
        let space = self.space.clone();
        for (chan, block) in space.channels().iter().zip(&mut self.blocks) {
            for ((u1, u2), x) in block.indexed_iter_mut() {
                *x = f(chan.bra.basis.orbitals[u1], chan.ket.basis.orbitals[u2]);
            }
        }
    }

    pub fn set_zero(&mut self) {
        for block in &mut self.blocks {
            block.fill(0.0);
        }
    }

    /// `self ← self + alpha other`
    pub fn scale_add(&mut self, alpha: f64, other: &Self) -> Result<()> {
        precondition!(self.same_space(other), "model spaces differ");
        for (x, y) in self.blocks.iter_mut().zip(&other.blocks) {
            x.scaled_add(alpha, y);
        }
        Ok(())
    }

    /// Frobenius norm over the stored blocks.
    pub fn norm(&self) -> f64 {
        self.blocks.iter()
            .map(|b| b.iter().map(|x| x * x).sum::<f64>())
            .sum::<f64>()
            .sqrt()
    }

    pub fn max_abs_diff(&self, other: &Self) -> Result<f64> {
        precondition!(self.same_space(other), "model spaces differ");
        Ok(max_abs_diff(self.blocks.iter().zip(&other.blocks)
                        .flat_map(|(x, y)| x.iter().zip(y.iter()))))
    }

    /// Project onto the declared hermiticity: `A ← (A + h Aᵀ) / 2`.
    pub fn hermitize(&mut self) {
        let h = self.herm.factor();
        for block in &mut self.blocks {
            let old = block.clone();
            for ((u1, u2), x) in block.indexed_iter_mut() {
                *x = 0.5 * (old[[u1, u2]] + h * old[[u2, u1]]);
            }
        }
    }

    /// Fill with standard normal entries, then hermitize.
    pub fn randomize<R: Rng>(&mut self, rng: &mut R) {
        for block in &mut self.blocks {
            for x in block.iter_mut() {
                *x = rng.sample(StandardNormal);
            }
        }
        self.hermitize();
    }
}

#[derive(Clone, Debug)]
pub struct TwoBodyOp {
    space: Arc<TwoBodyModelSpace>,
    blocks: Vec<Array4<f64>>,
    herm: Hermiticity,
}

impl TwoBodyOp {
    /// Zero operator.
    pub fn from_model_space(space: &Arc<TwoBodyModelSpace>,
                            herm: Hermiticity) -> Self {
        let blocks = space.channels().iter()
            .map(|chan| Array4::zeros(chan.shape()))
            .collect();
        Self { space: space.clone(), blocks, herm }
    }

    #[inline]
    pub fn space(&self) -> &Arc<TwoBodyModelSpace> {
        &self.space
    }

    #[inline]
    pub fn sp(&self) -> &Arc<SpModelSpace> {
        self.space.sp()
    }

    #[inline]
    pub fn herm(&self) -> Hermiticity {
        self.herm
    }

    #[inline]
    pub fn block(&self, i: usize) -> ArrayView4<f64> {
        self.blocks[i].view()
    }

    #[inline]
    pub fn block_mut(&mut self, i: usize) -> ArrayViewMut4<f64> {
        self.blocks[i].view_mut()
    }

    #[inline]
    pub fn blocks(&self) -> &[Array4<f64>] {
        &self.blocks
    }

    /// Disjoint mutable access to every block.
    #[inline]
    pub fn blocks_mut(&mut self) -> &mut [Array4<f64>] {
        &mut self.blocks
    }

    #[inline]
    pub fn same_space(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.space, &other.space)
    }

    /// Whether a one-body operator lives on the same single-particle
    /// channels.
    #[inline]
    pub fn same_sp(&self, other: &OneBodyOp) -> bool {
        Arc::ptr_eq(self.sp(), other.sp())
    }

    /// Coupled matrix element `⟨p q; J| A |r s; J⟩` by global orbital
    /// indices.  Zero if no such channel exists.
    pub fn get(&self, p: usize, q: usize, r: usize, s: usize,
               j: Half<i32>) -> f64 {
        let sp = self.sp();
        let loc = |x| sp.locate(x).map(|(l, u)| (sp.channel(l).key, u));
        match (loc(p), loc(q), loc(r), loc(s)) {
            (Some((k1, u1)), Some((k2, u2)), Some((k3, u3)), Some((k4, u4))) => {
                let key = TwoBodyChanKey::new((k1, k2), (k3, k4), j);
                match self.space.index_of(&key) {
                    Some(i) => self.blocks[i][[u1, u2, u3, u4]],
                    None => 0.0,
                }
            }
            _ => 0.0,
        }
    }

    /// Overwrite every stored element with `f(p, q, r, s, J)`.
    pub fn fill_with<F>(&mut self, mut f: F)
        where F: FnMut(usize, usize, usize, usize, Half<i32>) -> f64
    {
        let space = self.space.clone();
        for (chan, block) in space.channels().iter().zip(&mut self.blocks) {
            let orbs: Vec<&[usize]> = chan.sp.iter()
                .map(|c| &c.basis.orbitals[..])
                .collect();
            for ((u1, u2, u3, u4), x) in block.indexed_iter_mut() {
                *x = f(orbs[0][u1], orbs[1][u2], orbs[2][u3], orbs[3][u4],
                       chan.key.j);
            }
        }
    }

    pub fn set_zero(&mut self) {
        for block in &mut self.blocks {
            block.fill(0.0);
        }
    }

    /// `self ← self + alpha other`
    pub fn scale_add(&mut self, alpha: f64, other: &Self) -> Result<()> {
        precondition!(self.same_space(other), "model spaces differ");
        for (x, y) in self.blocks.iter_mut().zip(&other.blocks) {
            x.scaled_add(alpha, y);
        }
        Ok(())
    }

    /// Frobenius norm over the stored blocks (every ordering of each pair
    /// counts separately).
    pub fn norm(&self) -> f64 {
        self.blocks.iter()
            .map(|b| b.iter().map(|x| x * x).sum::<f64>())
            .sum::<f64>()
            .sqrt()
    }

    pub fn max_abs_diff(&self, other: &Self) -> Result<f64> {
        precondition!(self.same_space(other), "model spaces differ");
        Ok(max_abs_diff(self.blocks.iter().zip(&other.blocks)
                        .flat_map(|(x, y)| x.iter().zip(y.iter()))))
    }

    /// Project onto the declared hermiticity:
    ///
    /// ```text
    /// A[a b c d] ← (A[a b c d] + h A[c d a b]) / 2
    /// ```
    pub fn hermitize(&mut self) -> Result<()> {
        let h = self.herm.factor();
        let old = self.blocks.clone();
        for i in 0 .. self.blocks.len() {
            let t = &old[self.space.transpose_index(i)?];
            for ((a, b, c, d), x) in self.blocks[i].indexed_iter_mut() {
                *x = 0.5 * (old[i][[a, b, c, d]] + h * t[[c, d, a, b]]);
            }
        }
        Ok(())
    }

    /// Fill with standard normal entries, then hermitize and antisymmetrize.
    pub fn randomize<R: Rng>(&mut self, rng: &mut R) -> Result<()> {
        for block in &mut self.blocks {
            for x in block.iter_mut() {
                *x = rng.sample(StandardNormal);
            }
        }
        self.hermitize()?;
        antisym::antisymmetrize(self)
    }
}

fn max_abs_diff<'a, I>(pairs: I) -> f64
    where I: Iterator<Item = (&'a f64, &'a f64)>
{
    pairs.fold(0.0, |m, (x, y)| f64::max(m, (x - y).abs()))
}

/// An operator with zero-, one-, and two-body parts.
#[derive(Clone, Debug)]
pub struct ManyBodyOp {
    pub e0: f64,
    pub one: OneBodyOp,
    pub two: TwoBodyOp,
}

impl ManyBodyOp {
    pub fn new(one: OneBodyOp, two: TwoBodyOp) -> Result<Self> {
        precondition!(two.same_sp(&one),
                      "one- and two-body parts use different channels");
        precondition!(one.herm() == two.herm(),
                      "one- and two-body parts differ in hermiticity");
        Ok(Self { e0: 0.0, one, two })
    }

    /// Zero operator.
    pub fn from_model_space(one: &Arc<OneBodyModelSpace>,
                            two: &Arc<TwoBodyModelSpace>,
                            herm: Hermiticity) -> Result<Self> {
        Self::new(OneBodyOp::from_model_space(one, herm),
                  TwoBodyOp::from_model_space(two, herm))
    }

    #[inline]
    pub fn herm(&self) -> Hermiticity {
        self.one.herm()
    }

    pub fn set_zero(&mut self) {
        self.e0 = 0.0;
        self.one.set_zero();
        self.two.set_zero();
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_xorshift::XorShiftRng;
    use super::super::j_scheme::OneBodyModelSpace;
    use super::super::nuclei::SimpleNucleus;
    use super::super::sp_chan::SpModelSpace;
    use super::*;

    fn spaces() -> (Arc<OneBodyModelSpace>, Arc<TwoBodyModelSpace>) {
        let b = SimpleNucleus::oxygen16(1).to_basis().unwrap();
        let sp = SpModelSpace::new(&b).unwrap();
        (OneBodyModelSpace::new(&sp).unwrap(),
         TwoBodyModelSpace::new(&sp).unwrap())
    }

    #[test]
    fn test_hermiticity() {
        use self::Hermiticity::*;
        assert_eq!(Hermiticity::commutator(Hermitian, Hermitian),
                   AntiHermitian);
        assert_eq!(Hermiticity::commutator(AntiHermitian, AntiHermitian),
                   AntiHermitian);
        assert_eq!(Hermiticity::commutator(Hermitian, AntiHermitian),
                   Hermitian);
        assert_eq!(Hermiticity::commutator(AntiHermitian, Hermitian),
                   Hermitian);
        assert_eq!(AntiHermitian.factor(), -1.0);
    }

    #[test]
    fn test_one_body() {
        let (s1, _) = spaces();
        let mut rng = XorShiftRng::seed_from_u64(1);
        let mut a = OneBodyOp::from_model_space(&s1, Hermiticity::AntiHermitian);
        a.randomize(&mut rng);
        let n = s1.sp().num_orbitals();
        for p in 0 .. n {
            assert_eq!(a.get(p, p), 0.0);
            for q in 0 .. n {
                assert_eq!(a.get(p, q), -a.get(q, p));
            }
        }
        // 0s1/2 n and 0p1/2 n
        assert_eq!(a.get(0, 2), 0.0);
        assert_eq!(a.get(0, n), 0.0);

        let mut b = OneBodyOp::from_model_space(&s1, Hermiticity::AntiHermitian);
        b.fill_with(|p, q| (10 * p + q) as f64);
        assert_eq!(b.get(5, 5), 55.0);
        b.scale_add(2.0, &a).unwrap();
        assert_eq!(b.get(4, 4), 44.0);
        b.set_zero();
        assert_eq!(b.norm(), 0.0);
        assert_eq!(b.max_abs_diff(&a).unwrap(),
                   a.blocks().iter().flat_map(|x| x.iter())
                   .fold(0.0, |m, x| f64::max(m, x.abs())));

        let (other, _) = spaces();
        let c = OneBodyOp::from_model_space(&other, Hermiticity::Hermitian);
        assert!(!c.same_space(&a));
        assert!(b.scale_add(1.0, &c).unwrap_err().is_precondition());
    }

    #[test]
    fn test_two_body() {
        let (s1, s2) = spaces();
        let mut rng = XorShiftRng::seed_from_u64(2);
        let mut a = TwoBodyOp::from_model_space(&s2, Hermiticity::Hermitian);
        a.randomize(&mut rng).unwrap();
        assert!(a.norm() > 0.0);
        let sp = s2.sp();
        let n = sp.num_orbitals();
        for p in 0 .. n {
            for q in 0 .. n {
                for r in 0 .. n {
                    for s in 0 .. n {
                        let jp = sp.state(p).unwrap().j;
                        let jq = sp.state(q).unwrap().j;
                        for j in Half::tri_range(jp, jq) {
                            let x = a.get(p, q, r, s, j);
                            assert!((x - a.get(r, s, p, q, j)).abs() < 1e-12);
                            let phase = -(jp + jq - j).phase();
                            assert!((a.get(q, p, r, s, j) - phase * x).abs()
                                    < 1e-12);
                        }
                    }
                }
            }
        }
        let one = OneBodyOp::from_model_space(&s1, Hermiticity::Hermitian);
        assert!(ManyBodyOp::new(one.clone(), a.clone()).is_ok());
        let anti = TwoBodyOp::from_model_space(&s2, Hermiticity::AntiHermitian);
        assert!(ManyBodyOp::new(one, anti).unwrap_err().is_precondition());
    }
}
