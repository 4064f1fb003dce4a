//! Naive versions of the commutator terms.
//!
//! Every sum runs over global orbital indices and every matrix element is
//! fetched through `get`.  No hermiticity shortcuts, no matrix products.
//! Slow, but simple enough to check `imsrg` against.
use super::ang_mom::hat_sq;
use super::antisym;
use super::error::{Error, Result};
use super::half::Half;
use super::imsrg::{check_herm, CommutatorKind, Operand, Target};
use super::op::{OneBodyOp, TwoBodyOp};
use super::sp_chan::SpModelSpace;

/// Angular momenta and occupations indexed by global orbital.
struct Orbitals {
    j: Vec<Half<i32>>,
    occ: Vec<f64>,
    unocc: Vec<f64>,
}

impl Orbitals {
    fn new(sp: &SpModelSpace) -> Self {
        let n = sp.num_orbitals();
        let mut this = Orbitals {
            j: vec![Half(0); n],
            occ: vec![0.0; n],
            unocc: vec![0.0; n],
        };
        for chan in sp.channels() {
            for (&p, s) in chan.basis.orbitals.iter().zip(&chan.basis.states) {
                this.j[p] = s.j;
                this.occ[p] = s.occ;
                this.unocc[p] = s.unocc();
            }
        }
        this
    }

    fn len(&self) -> usize {
        self.j.len()
    }
}

pub fn c011(
    alpha: f64,
    a1: &OneBodyOp,
    b1: &OneBodyOp,
    c0: &mut f64,
) -> Result<()>
{
    precondition!(a1.same_space(b1), "operands use different model spaces");
    let o = Orbitals::new(a1.sp());
    let mut s = 0.0;
    for p in 0 .. o.len() {
        for q in 0 .. o.len() {
            let w = o.occ[p] * o.unocc[q] - o.unocc[p] * o.occ[q];
            s += hat_sq(o.j[p]) * w * a1.get(p, q) * b1.get(q, p);
        }
    }
    *c0 += alpha * s;
    Ok(())
}

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
    let n = a1.sp().num_orbitals();
    let mut d = OneBodyOp::from_model_space(c1.space(), c1.herm());
    d.fill_with(|p, q| {
        (0 .. n).map(|r| a1.get(p, r) * b1.get(r, q)
                     - b1.get(p, r) * a1.get(r, q)).sum()
    });
    c1.scale_add(alpha, &d)
}

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
    let o = Orbitals::new(a1.sp());
    let mut d = OneBodyOp::from_model_space(c1.space(), c1.herm());
    d.fill_with(|p, q| {
        let mut s = 0.0;
        for a in 0 .. o.len() {
            for b in 0 .. o.len() {
                let w = o.occ[a] * o.unocc[b] - o.unocc[a] * o.occ[b];
                for j in Half::tri_range_2((o.j[b], o.j[p]), (o.j[a], o.j[q])) {
                    s += hat_sq(j) / hat_sq(o.j[p]) * w
                        * a1.get(a, b) * b2.get(b, p, a, q, j);
                }
            }
        }
        s
    });
    c1.scale_add(alpha, &d)
}

pub fn c121(
    alpha: f64,
    a2: &TwoBodyOp,
    b1: &OneBodyOp,
    c1: &mut OneBodyOp,
) -> Result<()>
{
    c112(-alpha, b1, a2, c1)
}

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
    let n = a1.sp().num_orbitals();
    let mut d = TwoBodyOp::from_model_space(c2.space(), c2.herm());
    d.fill_with(|i, j, k, l, jj| {
        let mut s = 0.0;
        for a in 0 .. n {
            s += a1.get(i, a) * b2.get(a, j, k, l, jj);
            s += a1.get(j, a) * b2.get(i, a, k, l, jj);
            s -= b2.get(i, j, a, l, jj) * a1.get(a, k);
            s -= b2.get(i, j, k, a, jj) * a1.get(a, l);
        }
        s
    });
    antisym::antisymmetrize(&mut d)?;
    c2.scale_add(alpha, &d)
}

pub fn c221(
    alpha: f64,
    a2: &TwoBodyOp,
    b1: &OneBodyOp,
    c2: &mut TwoBodyOp,
) -> Result<()>
{
    c212(-alpha, b1, a2, c2)
}

pub fn c022(
    alpha: f64,
    a2: &TwoBodyOp,
    b2: &TwoBodyOp,
    c0: &mut f64,
) -> Result<()>
{
    precondition!(a2.same_space(b2), "operands use different model spaces");
    let o = Orbitals::new(a2.sp());
    let n = o.len();
    let mut s = 0.0;
    for i in 0 .. n {
        for j in 0 .. n {
            for k in 0 .. n {
                for l in 0 .. n {
                    let w = o.occ[i] * o.occ[j] * o.unocc[k] * o.unocc[l];
                    if w == 0.0 {
                        continue;
                    }
                    for jj in Half::tri_range_2((o.j[i], o.j[j]),
                                                (o.j[k], o.j[l])) {
                        s += hat_sq(jj) * w
                            * (a2.get(i, j, k, l, jj) * b2.get(k, l, i, j, jj)
                               - b2.get(i, j, k, l, jj) * a2.get(k, l, i, j, jj));
                    }
                }
            }
        }
    }
    *c0 += alpha / 4.0 * s;
    Ok(())
}

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
    let o = Orbitals::new(a2.sp());
    let n = o.len();
    let mut d = OneBodyOp::from_model_space(c1.space(), c1.herm());
    d.fill_with(|p, q| {
        let mut s = 0.0;
        for a in 0 .. n {
            for b in 0 .. n {
                for c in 0 .. n {
                    let w = o.unocc[a] * o.unocc[b] * o.occ[c]
                        + o.occ[a] * o.occ[b] * o.unocc[c];
                    for jj in Half::tri_range_2((o.j[c], o.j[p]),
                                                (o.j[a], o.j[b])) {
                        s += hat_sq(jj) * w
                            * (a2.get(c, p, a, b, jj) * b2.get(a, b, c, q, jj)
                               - b2.get(c, p, a, b, jj) * a2.get(a, b, c, q, jj));
                    }
                }
            }
        }
        s / (2.0 * hat_sq(o.j[p]))
    });
    c1.scale_add(alpha, &d)
}

/// Ladder part only, as in `imsrg::c222`.
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
    let o = Orbitals::new(a2.sp());
    let n = o.len();
    let mut d = TwoBodyOp::from_model_space(c2.space(), c2.herm());
    d.fill_with(|i, j, k, l, jj| {
        let mut s = 0.0;
        for a in 0 .. n {
            for b in 0 .. n {
                let w = o.unocc[a] * o.unocc[b] - o.occ[a] * o.occ[b];
                if w == 0.0 {
                    continue;
                }
                s += w * (a2.get(i, j, a, b, jj) * b2.get(a, b, k, l, jj)
                          - b2.get(i, j, a, b, jj) * a2.get(a, b, k, l, jj));
            }
        }
        s / 2.0
    });
    c2.scale_add(alpha, &d)
}

/// Same as `imsrg::commutator`, but using the naive terms.
pub fn commutator(
    kind: CommutatorKind,
    alpha: f64,
    a: Operand,
    b: Operand,
    c: Target,
) -> Result<()>
{
    use super::imsrg::CommutatorKind::*;
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
