//! Antisymmetrization of two-body operators.
//!
//! Blocks store both orderings of every pair.  An antisymmetric operator
//! satisfies, for each coupled `J`,
//!
//! ```text
//! A[b a c d] = −(−1)^(ja + jb − J) A[a b c d]
//! A[a b d c] = −(−1)^(jc + jd − J) A[a b c d]
//! ```
//!
//! Antisymmetrization averages each element with its three partners and
//! writes the phased average back to all four locations.
use super::error::Result;
use super::j_scheme::TwoBodyChanKey;
use super::op::TwoBodyOp;

/// Antisymmetrize the minimal channel `key` together with its partners.
pub fn antisymmetrize_channel(op: &mut TwoBodyOp, key: &TwoBodyChanKey)
                              -> Result<()>
{
    precondition!(key.is_minimal(), "{} is not a minimal channel", key);
    let space = op.space().clone();
    let partners = space.antisym_partners(key)?;
    let (n1, n2, n3, n4) = space.channel(partners[0].chan).shape();
    let blocks = op.blocks_mut();
    for a in 0 .. n1 {
        for b in 0 .. n2 {
            for c in 0 .. n3 {
                for d in 0 .. n4 {
                    let mut s = 0.0;
                    for p in &partners {
                        let (a, b, c, d) = p.permute((a, b, c, d));
                        s += p.phase * blocks[p.chan][[a, b, c, d]];
                    }
                    s *= 0.25;
                    for p in &partners {
                        let (a, b, c, d) = p.permute((a, b, c, d));
                        blocks[p.chan][[a, b, c, d]] = p.phase * s;
                    }
                }
            }
        }
    }
    Ok(())
}

/// Antisymmetrize every channel.  Idempotent.
pub fn antisymmetrize(op: &mut TwoBodyOp) -> Result<()> {
    let space = op.space().clone();
    for chan in space.channels() {
        if chan.key.is_minimal() {
            antisymmetrize_channel(op, &chan.key)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use rand::SeedableRng;
    use rand_xorshift::XorShiftRng;
    use super::super::half::Half;
    use super::super::j_scheme::TwoBodyModelSpace;
    use super::super::nuclei::SimpleNucleus;
    use super::super::op::Hermiticity;
    use super::super::sp_chan::SpModelSpace;
    use super::*;

    fn space(e_max: i32) -> Arc<TwoBodyModelSpace> {
        let b = SimpleNucleus::oxygen16(e_max).to_basis().unwrap();
        TwoBodyModelSpace::new(&SpModelSpace::new(&b).unwrap()).unwrap()
    }

    #[test]
    fn test_idempotent() {
        let s2 = space(2);
        let mut rng = XorShiftRng::seed_from_u64(7);
        let mut a = TwoBodyOp::from_model_space(&s2, Hermiticity::Hermitian);
        a.randomize(&mut rng).unwrap();
        let once = a.clone();
        antisymmetrize(&mut a).unwrap();
        assert!(a.max_abs_diff(&once).unwrap() < 1e-14);
    }

    #[test]
    fn test_pauli() {
        let s2 = space(1);
        let sp = s2.sp().clone();
        let mut a = TwoBodyOp::from_model_space(&s2, Hermiticity::Hermitian);
        a.fill_with(|_, _, _, _, _| 1.0);
        antisymmetrize(&mut a).unwrap();
        for p in 0 .. sp.num_orbitals() {
            let jp = sp.state(p).unwrap().j;
            for j in Half::tri_range(jp, jp) {
                let x = a.get(p, p, p, p, j);
                if (jp + jp - j).phase() > 0.0 {
                    assert_eq!(x, 0.0);
                }
            }
        }
    }

    #[test]
    fn test_non_minimal() {
        let s2 = space(1);
        let key = s2.channels().iter().map(|c| c.key)
            .find(|k| !k.is_minimal())
            .unwrap();
        let mut a = TwoBodyOp::from_model_space(&s2, Hermiticity::Hermitian);
        assert!(antisymmetrize_channel(&mut a, &key).unwrap_err()
                .is_precondition());
    }
}
