use conv::ValueInto;

/// Shorthand for casting numbers.  Panics if out of range.
pub fn cast<T: ValueInto<U>, U>(x: T) -> U {
    x.value_into().expect("integer conversion failure")
}

/// Tolerance for comparing floating-point numbers.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Toler {
    pub relerr: f64,
    pub abserr: f64,
}

/// `{ relerr: 1e-8, abserr: 1e-8 }`
impl Default for Toler {
    fn default() -> Self {
        Self { relerr: 1e-8, abserr: 1e-8 }
    }
}

impl Toler {
    /// Whether `x` and `y` agree within `abserr + relerr * max(|x|, |y|)`.
    pub fn is_eq(&self, x: f64, y: f64) -> bool {
        (x - y).abs() <= self.abserr + self.relerr * x.abs().max(y.abs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toler() {
        let toler = Toler { relerr: 0.0, abserr: 1e-5 };
        assert!(toler.is_eq(1.0, 1.0 + 5e-6));
        assert!(!toler.is_eq(1.0, 1.0 + 5e-5));
        let toler = Toler { relerr: 1e-3, abserr: 0.0 };
        assert!(toler.is_eq(1000.0, 1000.5));
        assert!(!toler.is_eq(1.0, 1.5));
        assert_eq!(cast::<usize, i32>(42), 42);
    }
}
