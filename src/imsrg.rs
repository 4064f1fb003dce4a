//! IM-SRG(2) commutator terms in J-scheme.
//!
//! Each term `cXYZ` accumulates into `C` the part of `α [A, B]` with an
//! `X`-body output, a `Y`-body `A`, and a `Z`-body `B`.  All sums run over
//! single-particle states without restriction; occupation numbers enter as
//! weights (`n` = occupation, `n̄ = 1 − n`).  Channels that do not exist in
//! the model space are structural zeros.
//!
//! The `[2,2]→2` term only contains the ladder (particle-particle and
//! hole-hole) part.  The particle-hole part, which requires a Pandya
//! transformation, is not implemented.
use std::fmt;
use std::sync::Once;
use ndarray::{s, Array1, Array2, ArrayView2, Axis};
use rayon::prelude::*;
use super::ang_mom::hat_sq;
use super::antisym;
use super::error::{Error, Result};
use super::half::Half;
use super::j_scheme::TwoBodyChanKey;
use super::linalg::{self, Transpose};
use super::op::{Hermiticity, ManyBodyOp, OneBodyOp, TwoBodyOp};
use super::sp_chan::SpChannel;

static PANDYA_WARNING: Once = Once::new();

pub(crate) fn check_herm(a: Hermiticity, b: Hermiticity, c: Hermiticity)
                         -> Result<()>
{
    let expected = Hermiticity::commutator(a, b);
    precondition!(c == expected,
                  "[{:?}, {:?}] is {:?}, but the output is {:?}",
                  a, b, expected, c);
    Ok(())
}

/// `f(n[a], n[b], n̄[a], n̄[b])` for every `(a, b)` in `x × y`, row-major.
fn pair_weights<F>(x: &SpChannel, y: &SpChannel, f: F) -> Array1<f64>
    where F: Fn(f64, f64, f64, f64) -> f64
{
    let (nx, ux) = (x.occ(), x.unocc());
    let (ny, uy) = (y.occ(), y.unocc());
    let mut w = Vec::with_capacity(x.len() * y.len());
    for a in 0 .. x.len() {
        for b in 0 .. y.len() {
            w.push(f(nx[a], ny[b], ux[a], uy[b]));
        }
    }
    Array1::from(w)
}

/// `diag(w) M`
fn scale_rows(m: ArrayView2<f64>, w: &Array1<f64>) -> Array2<f64> {
    let mut m = m.to_owned();
    m *= &w.view().insert_axis(Axis(1));
    m
}

/// `M diag(w)`
fn scale_columns(m: ArrayView2<f64>, w: &Array1<f64>) -> Array2<f64> {
    let mut m = m.to_owned();
    m *= w;
    m
}

/// Term 011
///
/// ```text
/// C[] ←+ α ∑[p q] ĵp² (n[p] n̄[q] − n̄[p] n[q]) A[p q] B[q p]
/// ```
///
/// Vanishes identically when `A` and `B` have the same hermiticity, in
/// which case `C` is left untouched.
pub fn c011(
    alpha: f64,
    a1: &OneBodyOp,
    b1: &OneBodyOp,
    c0: &mut f64,
) -> Result<()>
{
    precondition!(a1.same_space(b1), "operands use different model spaces");
    if a1.herm() == b1.herm() {
        return Ok(());
    }
    let space = a1.space();
    let sum: f64 = space.channels().par_iter().enumerate().map(|(l, chan)| {
        let (occ, unocc) = (chan.bra.occ(), chan.bra.unocc());
        let (a, b) = (a1.block(l), b1.block(l));
        let mut s = 0.0;
        for ((p, q), &apq) in a.indexed_iter() {
            s += (occ[p] * unocc[q] - unocc[p] * occ[q]) * apq * b[[q, p]];
        }
        hat_sq(chan.bra.j()) * s
    }).sum();
    *c0 += alpha * sum;
    Ok(())
}

/// Term 111
///
/// ```text
/// C[p q] ←+ α ∑[r] (A[p r] B[r q] − B[p r] A[r q])
/// ```
pub fn c111(
    alpha: f64,
    a1: &OneBodyOp,
    b1: &OneBodyOp,
    c1: &mut OneBodyOp,
) -> Result<()>
{
    precondition!(a1.same_space(b1) && a1.same_space(c1),
                  "operands use different model spaces");
    check_herm(a1.herm(), b1.herm(), c1.herm())?;
    c1.blocks_mut().par_iter_mut().enumerate()
        .try_for_each(|(l, c)| -> Result<()> {
            let (a, b) = (a1.block(l), b1.block(l));
            linalg::gemm(Transpose::None, Transpose::None,
                         alpha, a, b, 1.0, c)?;
            linalg::gemm(Transpose::None, Transpose::None,
                         -alpha, b, a, 1.0, c)
        })?;
    debug!("c111: {} channels", c1.blocks().len());
    Ok(())
}

/// Term 112
///
/// ```text
/// C[p q] ←+ α ∑[X] ∑[J] Ĵ² / ĵp² ∑[a b ∈ X] (n[a] n̄[b] − n̄[a] n[b])
///                                             A[a b] B[b p a q; J]
/// ```
pub fn c112(
    alpha: f64,
    a1: &OneBodyOp,
    b2: &TwoBodyOp,
    c1: &mut OneBodyOp,
) -> Result<()>
{
    precondition!(b2.same_sp(a1) && a1.same_space(c1),
                  "operands use different model spaces");
    check_herm(a1.herm(), b2.herm(), c1.herm())?;
    let sp = a1.sp().clone();
    let s2 = b2.space();
    let weighted: Vec<Array2<f64>> = sp.channels().iter().enumerate()
        .map(|(lx, chan)| {
            let w = pair_weights(chan, chan, |na, nb, ma, mb| na * mb - ma * nb);
            let n = chan.len();
            let mut a = a1.block(lx).to_owned();
            for ((u1, u2), x) in a.indexed_iter_mut() {
                *x *= w[u1 * n + u2];
            }
            a
        })
        .collect();
    c1.blocks_mut().par_iter_mut().enumerate()
        .try_for_each(|(lp, c)| -> Result<()> {
            let chan_p = sp.channel(lp);
            for (lx, chan_x) in sp.channels().iter().enumerate() {
                if chan_x.is_empty() {
                    continue;
                }
                let w = &weighted[lx];
                for j in Half::tri_range(chan_x.j(), chan_p.j()) {
                    let key = TwoBodyChanKey::new((chan_x.key, chan_p.key),
                                                  (chan_x.key, chan_p.key), j);
                    let i = s2.require_index(&key)?;
                    let f = alpha * hat_sq(j) / hat_sq(chan_p.j());
                    // [p q a b] ↦ B[b p a q]
                    let b = b2.block(i).permuted_axes([1, 3, 2, 0]);
                    for ((p, q), x) in c.indexed_iter_mut() {
                        let bpq = b.slice(s![p, q, .., ..]);
                        *x += f * bpq.iter().zip(w.iter())
                            .map(|(u, v)| u * v)
                            .sum::<f64>();
                    }
                }
            }
            Ok(())
        })?;
    debug!("c112: {} channels", c1.blocks().len());
    Ok(())
}

/// Term 121
///
/// ```text
/// C[p q] ←+ −α [B, A] (one-body part)
/// ```
pub fn c121(
    alpha: f64,
    a2: &TwoBodyOp,
    b1: &OneBodyOp,
    c1: &mut OneBodyOp,
) -> Result<()>
{
    c112(-alpha, b1, a2, c1)
}

/// Term 212
///
/// ```text
/// C[i j k l; J] ←+ α 𝒜 (∑[a] A[i a] B[a j k l] + ∑[a] A[j a] B[i a k l]
///                      − ∑[a] B[i j a l] A[a k] − ∑[a] B[i j k a] A[a l])
/// ```
///
/// where `𝒜` antisymmetrizes the bracket before it is added to `C`.
pub fn c212(
    alpha: f64,
    a1: &OneBodyOp,
    b2: &TwoBodyOp,
    c2: &mut TwoBodyOp,
) -> Result<()>
{
    precondition!(b2.same_sp(a1) && b2.same_space(c2),
                  "operands use different model spaces");
    check_herm(a1.herm(), b2.herm(), c2.herm())?;
    let space = c2.space().clone();
    let sp = space.sp().clone();
    let mut scratch = TwoBodyOp::from_model_space(&space, c2.herm());
    scratch.blocks_mut().par_iter_mut().enumerate()
        .try_for_each(|(i, out)| -> Result<()> {
            let chan = space.channel(i);
            let mut ls = [0; 4];
            for (l, c) in ls.iter_mut().zip(&chan.sp) {
                match sp.index_of(c.key) {
                    Some(x) => *l = x,
                    None => postcondition!(false, "{} is not in the model space",
                                           c.key),
                }
            }
            let (n1, n2, n3, n4) = chan.shape();
            let b = b2.block(i);
            let (a_1, a_2) = (a1.block(ls[0]), a1.block(ls[1]));
            let (a_3, a_4) = (a1.block(ls[2]), a1.block(ls[3]));
            for u3 in 0 .. n3 {
                for u4 in 0 .. n4 {
                    let bkl = b.slice(s![.., .., u3, u4]);
                    let mut okl = out.slice_mut(s![.., .., u3, u4]);
                    linalg::gemm(Transpose::None, Transpose::None,
                                 1.0, a_1, bkl, 1.0, &mut okl)?;
                    linalg::gemm(Transpose::None, Transpose::Ordinary,
                                 1.0, bkl, a_2, 1.0, &mut okl)?;
                }
            }
            for u1 in 0 .. n1 {
                for u2 in 0 .. n2 {
                    let bij = b.slice(s![u1, u2, .., ..]);
                    let mut oij = out.slice_mut(s![u1, u2, .., ..]);
                    linalg::gemm(Transpose::Ordinary, Transpose::None,
                                 -1.0, a_3, bij, 1.0, &mut oij)?;
                    linalg::gemm(Transpose::None, Transpose::None,
                                 -1.0, bij, a_4, 1.0, &mut oij)?;
                }
            }
            Ok(())
        })?;
    antisym::antisymmetrize(&mut scratch)?;
    c2.scale_add(alpha, &scratch)?;
    debug!("c212: {} channels", space.len());
    Ok(())
}

/// Term 221
///
/// ```text
/// C[i j k l; J] ←+ −α [B, A] (two-body part)
/// ```
pub fn c221(
    alpha: f64,
    a2: &TwoBodyOp,
    b1: &OneBodyOp,
    c2: &mut TwoBodyOp,
) -> Result<()>
{
    c212(-alpha, b1, a2, c2)
}

/// Term 022
///
/// ```text
/// C[] ←+ α/4 ∑[J] Ĵ² ∑[i j k l] n[i] n[j] n̄[k] n̄[l]
///                          (A[i j k l; J] B[k l i j; J] − B[i j k l; J] A[k l i j; J])
/// ```
///
/// Using the hermiticity of both operands the bracket reduces to
/// `(1 − hA hB) A[i j k l] B[k l i j]`.
pub fn c022(
    alpha: f64,
    a2: &TwoBodyOp,
    b2: &TwoBodyOp,
    c0: &mut f64,
) -> Result<()>
{
    precondition!(a2.same_space(b2), "operands use different model spaces");
    let factor = 1.0 - a2.herm().factor() * b2.herm().factor();
    if factor == 0.0 {
        return Ok(());
    }
    let space = a2.space();
    let sum = space.channels().par_iter().enumerate()
        .map(|(i, chan)| -> Result<f64> {
            let t = space.transpose_index(i)?;
            let (a, b) = (a2.block(i), b2.block(t));
            let [o1, o2, o3, o4] = [chan.sp[0].occ(), chan.sp[1].occ(),
                                    chan.sp[2].unocc(), chan.sp[3].unocc()];
            let mut s = 0.0;
            for ((p, q, r, u), &x) in a.indexed_iter() {
                let w = o1[p] * o2[q] * o3[r] * o4[u];
                if w != 0.0 {
                    s += w * x * b[[r, u, p, q]];
                }
            }
            Ok(hat_sq(chan.key.j) * s)
        })
        .sum::<Result<f64>>()?;
    *c0 += alpha / 4.0 * factor * sum;
    Ok(())
}

/// Term 122
///
/// ```text
/// C[p q] ←+ α / (2 ĵp²) ∑[J] Ĵ² ∑[a b c] (n̄[a] n̄[b] n[c] + n[a] n[b] n̄[c])
///                          (A[c p a b; J] B[a b c q; J] − B[c p a b; J] A[a b c q; J])
/// ```
///
/// Only the first product `M` is computed; the second one equals
/// `hA hB Mᵀ`.
pub fn c122(
    alpha: f64,
    a2: &TwoBodyOp,
    b2: &TwoBodyOp,
    c1: &mut OneBodyOp,
) -> Result<()>
{
    precondition!(a2.same_space(b2) && a2.same_sp(c1),
                  "operands use different model spaces");
    check_herm(a2.herm(), b2.herm(), c1.herm())?;
    let hh = a2.herm().factor() * b2.herm().factor();
    let space = a2.space().clone();
    let sp = space.sp().clone();
    c1.blocks_mut().par_iter_mut().enumerate()
        .try_for_each(|(lp, c)| -> Result<()> {
            let chan_p = sp.channel(lp);
            let np = chan_p.len();
            let mut m = Array2::zeros((np, np));
            for &i in space.channels_with_second_bra(lp) {
                let chan = space.channel(i);
                let t = space.transpose_index(i)?;
                let (chan_c, chan_x, chan_y) =
                    (&chan.sp[0], &chan.sp[2], &chan.sp[3]);
                let a = linalg::as_matrix(&a2.blocks()[i])?;
                let b = linalg::as_matrix(&b2.blocks()[t])?;
                let jw = hat_sq(chan.key.j);
                for u in 0 .. chan_c.len() {
                    let (nc, mc) = (chan_c.occ()[u], chan_c.unocc()[u]);
                    let w = pair_weights(chan_x, chan_y, |na, nb, ma, mb| {
                        ma * mb * nc + na * nb * mc
                    });
                    let rows = u * np .. (u + 1) * np;
                    let aw = scale_columns(a.slice(s![rows.clone(), ..]), &w);
                    let bc = b.slice(s![.., rows]);
                    linalg::gemm(Transpose::None, Transpose::None,
                                 jw, aw.view(), bc, 1.0, &mut m)?;
                }
            }
            let f = alpha / (2.0 * hat_sq(chan_p.j()));
            c.scaled_add(f, &m);
            c.scaled_add(-f * hh, &m.t());
            Ok(())
        })?;
    debug!("c122: {} channels", c1.blocks().len());
    Ok(())
}

/// Term 222 (ladder part only)
///
/// ```text
/// C[i j k l; J] ←+ α/2 ∑[a b] (n̄[a] n̄[b] − n[a] n[b])
///                      (A[i j a b; J] B[a b k l; J] − B[i j a b; J] A[a b k l; J])
/// ```
///
/// The intermediate pairs `(a, b)` run over every ordered pair of channels
/// with the same parity and isospin projection as `(i, j)`.  The
/// particle-hole part is omitted; a warning is logged on first use.
pub fn c222(
    alpha: f64,
    a2: &TwoBodyOp,
    b2: &TwoBodyOp,
    c2: &mut TwoBodyOp,
) -> Result<()>
{
    precondition!(a2.same_space(b2) && a2.same_space(c2),
                  "operands use different model spaces");
    check_herm(a2.herm(), b2.herm(), c2.herm())?;
    PANDYA_WARNING.call_once(|| {
        warn!("[2,2]->2 evaluates only the ladder term; \
               the Pandya-transformed particle-hole term is omitted");
    });
    let space = a2.space().clone();
    c2.blocks_mut().par_iter_mut().enumerate()
        .try_for_each(|(i, c)| -> Result<()> {
            let key = space.channel(i).key;
            let mut c = linalg::as_matrix_mut(c)?;
            for &(x, y) in space.pair_bucket(key.k1, key.k2) {
                if !key.j.tri(x.j(), y.j()) {
                    continue;
                }
                let l = space.require_index(
                    &TwoBodyChanKey::new((key.k1, key.k2), (x, y), key.j))?;
                let r = space.require_index(
                    &TwoBodyChanKey::new((x, y), (key.k3, key.k4), key.j))?;
                let mid = space.channel(l);
                let w = pair_weights(&mid.sp[2], &mid.sp[3],
                                     |na, nb, ma, mb| ma * mb - na * nb);
                let al = linalg::as_matrix(&a2.blocks()[l])?;
                let bl = linalg::as_matrix(&b2.blocks()[l])?;
                let bw = scale_rows(linalg::as_matrix(&b2.blocks()[r])?, &w);
                let aw = scale_rows(linalg::as_matrix(&a2.blocks()[r])?, &w);
                linalg::gemm(Transpose::None, Transpose::None,
                             0.5 * alpha, al, bw.view(), 1.0, &mut c)?;
                linalg::gemm(Transpose::None, Transpose::None,
                             -0.5 * alpha, bl, aw.view(), 1.0, &mut c)?;
            }
            Ok(())
        })?;
    debug!("c222: {} channels", space.len());
    Ok(())
}

/// The commutator terms, named after the ranks of their operands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CommutatorKind {
    C011,
    C111,
    C112,
    C121,
    C212,
    C221,
    C022,
    C122,
    C222,
}

impl fmt::Display for CommutatorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl CommutatorKind {
    pub const ALL: [CommutatorKind; 9] = [
        CommutatorKind::C011,
        CommutatorKind::C111,
        CommutatorKind::C112,
        CommutatorKind::C121,
        CommutatorKind::C212,
        CommutatorKind::C221,
        CommutatorKind::C022,
        CommutatorKind::C122,
        CommutatorKind::C222,
    ];

    /// `(rank of A, rank of B, rank of C)`
    pub fn ranks(self) -> (u8, u8, u8) {
        match self {
            CommutatorKind::C011 => (1, 1, 0),
            CommutatorKind::C111 => (1, 1, 1),
            CommutatorKind::C112 => (1, 2, 1),
            CommutatorKind::C121 => (2, 1, 1),
            CommutatorKind::C212 => (1, 2, 2),
            CommutatorKind::C221 => (2, 1, 2),
            CommutatorKind::C022 => (2, 2, 0),
            CommutatorKind::C122 => (2, 2, 1),
            CommutatorKind::C222 => (2, 2, 2),
        }
    }

    pub fn of(a: u8, b: u8, c: u8) -> Option<Self> {
        Self::ALL.iter().cloned().find(|k| k.ranks() == (a, b, c))
    }

    /// E.g. `[1,2]->1`.
    pub fn name(self) -> &'static str {
        match self {
            CommutatorKind::C011 => "[1,1]->0",
            CommutatorKind::C111 => "[1,1]->1",
            CommutatorKind::C112 => "[1,2]->1",
            CommutatorKind::C121 => "[2,1]->1",
            CommutatorKind::C212 => "[1,2]->2",
            CommutatorKind::C221 => "[2,1]->2",
            CommutatorKind::C022 => "[2,2]->0",
            CommutatorKind::C122 => "[2,2]->1",
            CommutatorKind::C222 => "[2,2]->2",
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub enum Operand<'a> {
    One(&'a OneBodyOp),
    Two(&'a TwoBodyOp),
}

impl<'a> Operand<'a> {
    pub fn rank(&self) -> u8 {
        match *self {
            Operand::One(_) => 1,
            Operand::Two(_) => 2,
        }
    }
}

#[derive(Debug)]
pub enum Target<'a> {
    Zero(&'a mut f64),
    One(&'a mut OneBodyOp),
    Two(&'a mut TwoBodyOp),
}

impl<'a> Target<'a> {
    pub fn rank(&self) -> u8 {
        match *self {
            Target::Zero(_) => 0,
            Target::One(_) => 1,
            Target::Two(_) => 2,
        }
    }
}

/// Evaluate one term, checking that the operand ranks match `kind`.
pub fn commutator(
    kind: CommutatorKind,
    alpha: f64,
    a: Operand,
    b: Operand,
    c: Target,
) -> Result<()>
{
    use self::CommutatorKind::*;
    match (kind, a, b, c) {
        (C011, Operand::One(a), Operand::One(b), Target::Zero(c)) =>
            c011(alpha, a, b, c),
        (C111, Operand::One(a), Operand::One(b), Target::One(c)) =>
            c111(alpha, a, b, c),
        (C112, Operand::One(a), Operand::Two(b), Target::One(c)) =>
            c112(alpha, a, b, c),
        (C121, Operand::Two(a), Operand::One(b), Target::One(c)) =>
            c121(alpha, a, b, c),
        (C212, Operand::One(a), Operand::Two(b), Target::Two(c)) =>
            c212(alpha, a, b, c),
        (C221, Operand::Two(a), Operand::One(b), Target::Two(c)) =>
            c221(alpha, a, b, c),
        (C022, Operand::Two(a), Operand::Two(b), Target::Zero(c)) =>
            c022(alpha, a, b, c),
        (C122, Operand::Two(a), Operand::Two(b), Target::One(c)) =>
            c122(alpha, a, b, c),
        (C222, Operand::Two(a), Operand::Two(b), Target::Two(c)) =>
            c222(alpha, a, b, c),
        (kind, a, b, c) => Err(Error::Precondition {
            site: concat!(module_path!(), ":", line!()),
            cond: format!("{} does not accept ranks [{},{}]->{}",
                          kind, a.rank(), b.rank(), c.rank()),
        }),
    }
}

/// `C ←+ α [A, B]` with every term (zero-, one-, and two-body outputs).
pub fn commut(
    alpha: f64,
    a: &ManyBodyOp,
    b: &ManyBodyOp,
    c: &mut ManyBodyOp,
) -> Result<()>
{
    c011(alpha, &a.one, &b.one, &mut c.e0)?;
    c022(alpha, &a.two, &b.two, &mut c.e0)?;
    c111(alpha, &a.one, &b.one, &mut c.one)?;
    c112(alpha, &a.one, &b.two, &mut c.one)?;
    c121(alpha, &a.two, &b.one, &mut c.one)?;
    c122(alpha, &a.two, &b.two, &mut c.one)?;
    c212(alpha, &a.one, &b.two, &mut c.two)?;
    c221(alpha, &a.two, &b.one, &mut c.two)?;
    c222(alpha, &a.two, &b.two, &mut c.two)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds() {
        for &kind in &CommutatorKind::ALL {
            let (a, b, c) = kind.ranks();
            assert_eq!(CommutatorKind::of(a, b, c), Some(kind));
            assert_eq!(kind.name(), format!("[{},{}]->{}", a, b, c));
        }
        assert_eq!(CommutatorKind::of(2, 2, 3), None);
        assert_eq!(CommutatorKind::C121.to_string(), "[2,1]->1");
    }
}
