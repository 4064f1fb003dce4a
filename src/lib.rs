//! Block-sparse IMSRG commutators in the J-scheme.
//!
//! Operators are stored as dense blocks over angular-momentum-coupled
//! channels (see [`j_scheme`](j_scheme/index.html)) and the commutator
//! terms of [`imsrg`](imsrg/index.html) work block by block.  Naive
//! versions of every term live in [`reference`](reference/index.html).
extern crate conv;
extern crate flate2;
extern crate fnv;
#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate log;
extern crate ndarray;
extern crate num;
#[macro_use]
extern crate quick_error;
extern crate rand;
extern crate rand_distr;
#[cfg(test)]
extern crate rand_xorshift;
extern crate rayon;
extern crate regex;
extern crate serde;
#[macro_use]
extern crate serde_derive;
extern crate serde_yaml;
extern crate wigner_symbols;
extern crate xz2;

#[macro_use]
mod macros;

pub mod ang_mom;
pub mod antisym;
pub mod basis;
pub mod error;
pub mod half;
pub mod imsrg;
pub mod io;
pub mod j_scheme;
pub mod linalg;
pub mod nuclei;
pub mod op;
pub mod parity;
pub mod recoupling;
pub mod reference;
pub mod runtime;
pub mod sp_chan;
pub mod utils;
