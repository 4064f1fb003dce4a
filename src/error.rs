//! Error type shared by the whole crate.
use std::{io, result};
use ndarray::ShapeError;
use rayon::ThreadPoolBuildError;
use serde_yaml;

quick_error! {
    #[derive(Debug)]
    pub enum Error {
        /// Bad input: mismatched model spaces, wrong hermiticity, malformed
        /// channel keys, misuse of a stateful service, etc.
        Precondition { site: &'static str, cond: String } {
            display("precondition failed at {}: {}", site, cond)
        }
        /// An internal invariant does not hold.
        Postcondition { site: &'static str, cond: String } {
            display("postcondition failed at {}: {}", site, cond)
        }
        /// Malformed matrix element file.
        Format(msg: String) {
            display("format error: {}", msg)
        }
        Io(err: io::Error) {
            from()
            source(err)
            display("I/O error: {}", err)
        }
        Yaml(err: serde_yaml::Error) {
            from()
            source(err)
            display("YAML error: {}", err)
        }
        Shape(err: ShapeError) {
            from()
            source(err)
            display("shape error: {}", err)
        }
        ThreadPool(err: ThreadPoolBuildError) {
            from()
            source(err)
            display("cannot build thread pool: {}", err)
        }
    }
}

impl Error {
    pub fn is_precondition(&self) -> bool {
        match *self {
            Error::Precondition { .. } => true,
            _ => false,
        }
    }

    pub fn is_format(&self) -> bool {
        match *self {
            Error::Format(_) => true,
            _ => false,
        }
    }
}

pub type Result<T> = result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    fn check_positive(x: i32) -> Result<i32> {
        precondition!(x > 0);
        Ok(x)
    }

    fn check_even(x: i32) -> Result<i32> {
        postcondition!(x % 2 == 0, "{} is odd", x);
        Ok(x)
    }

    #[test]
    fn test_condition_macros() {
        assert_eq!(check_positive(3).unwrap(), 3);
        let e = check_positive(-1).unwrap_err();
        assert!(e.is_precondition());
        assert!(e.to_string().contains("x > 0"));
        assert!(e.to_string().contains("jblock::error"));
        let e = check_even(3).unwrap_err();
        assert!(!e.is_precondition());
        assert!(e.to_string().contains("3 is odd"));
    }
}
