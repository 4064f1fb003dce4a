extern crate env_logger;
#[macro_use]
extern crate jblock;

use std::path::Path;
use jblock::antisym;
use jblock::imsrg;
use jblock::j_scheme::{OneBodyModelSpace, TwoBodyModelSpace};
use jblock::nuclei::SimpleNucleus;
use jblock::nuclei::me1j::Me1j;
use jblock::nuclei::me2jp::Me2jp;
use jblock::op::{Hermiticity, OneBodyOp};
use jblock::reference;
use jblock::sp_chan::SpModelSpace;
use jblock::utils::Toler;

const TOLER: Toler = Toler { relerr: 0.0, abserr: 1e-5 };

macro_rules! data_file {
    ($name:expr) => {
        Path::new(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/data/", $name))
    }
}

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn test_o16_emax4_golden() {
    init_logging();
    let basis = SimpleNucleus::oxygen16(4).to_basis().unwrap();
    let sp = SpModelSpace::new(&basis).unwrap();
    let space = OneBodyModelSpace::new(&sp).unwrap();

    let h1 = Me1j::load(data_file!("h1_emax4.me1j"), Hermiticity::Hermitian)
        .unwrap();
    let g1 = Me1j::load(data_file!("g1_emax4.me1j.xz"),
                        Hermiticity::AntiHermitian).unwrap();
    let expected = Me1j::load(data_file!("expected_c1_emax4.me1j"),
                              Hermiticity::Hermitian).unwrap();
    assert_eq!(h1.e_max(), 4);
    assert_eq!(g1.orbitals().len(), 30);

    let h = h1.to_op(&space).unwrap();
    let g = g1.to_op(&space).unwrap();
    let herm = Hermiticity::commutator(h.herm(), g.herm());
    assert_eq!(herm, Hermiticity::Hermitian);

    let mut c0 = 0.0;
    let mut c1 = OneBodyOp::from_model_space(&space, herm);
    imsrg::c011(1.0, &h, &g, &mut c0).unwrap();
    imsrg::c111(1.0, &h, &g, &mut c1).unwrap();
    toler_assert_eq!(TOLER, c0, expected.e0());
    let n = sp.num_orbitals();
    for p in 0 .. n {
        for q in 0 .. n {
            toler_assert_eq!(TOLER, c1.get(p, q), expected.get(p, q),
                             "p = {}, q = {}", p, q);
        }
    }

    let mut r1 = OneBodyOp::from_model_space(&space, herm);
    reference::c111(1.0, &h, &g, &mut r1).unwrap();
    assert!(c1.max_abs_diff(&r1).unwrap() < 1e-10);

    // swapping the operands flips the sign
    let mut d1 = OneBodyOp::from_model_space(&space, herm);
    imsrg::c111(1.0, &g, &h, &mut d1).unwrap();
    d1.scale_add(1.0, &c1).unwrap();
    assert!(d1.norm() < 1e-10);
}

#[test]
fn test_me2jp_compressed() {
    init_logging();
    let basis = SimpleNucleus::oxygen16(1).to_basis().unwrap();
    let sp = SpModelSpace::new(&basis).unwrap();
    let space = TwoBodyModelSpace::new(&sp).unwrap();
    let v = Me2jp::load(data_file!("v2_emax1.me2jp.gz"),
                        Hermiticity::Hermitian).unwrap();
    assert_eq!(v.e_max(), 1);
    assert_eq!(v.len(), 74);
    let op = v.to_op(&space).unwrap();

    let n = sp.num_orbitals();
    let mut nonzero = 0;
    for p in 0 .. n {
        for q in 0 .. n {
            for r in 0 .. n {
                for s in 0 .. n {
                    let jp = sp.state(p).unwrap().j;
                    let jq = sp.state(q).unwrap().j;
                    for j in jp.tri_range(jq) {
                        let x = op.get(p, q, r, s, j);
                        assert_eq!(x, v.get(p, q, r, s, j));
                        assert_eq!(x, op.get(r, s, p, q, j));
                        if x != 0.0 {
                            nonzero += 1;
                        }
                    }
                }
            }
        }
    }
    assert!(nonzero >= v.len());

    let mut w = op.clone();
    antisym::antisymmetrize(&mut w).unwrap();
    assert!(w.max_abs_diff(&op).unwrap() < 1e-12);
}

#[test]
fn test_missing_file() {
    let e = Me1j::load(data_file!("no_such_file.me1j"),
                       Hermiticity::Hermitian).unwrap_err();
    assert!(!e.is_format());
    let e = Me2jp::load(data_file!("h1_emax4.me1j"),
                        Hermiticity::Hermitian).unwrap_err();
    assert!(e.is_format());
}
