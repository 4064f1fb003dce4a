//! Half-integers for angular momentum quantities.
use std::fmt;
use std::ops::{Add, Div, Neg, Rem, Sub};
use num::{One, Zero};

/// Type that logically behaves like half-integers, but what is actually
/// stored is twice its logical value.
///
/// For example, `Half(3)` represents the fraction `3/2`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord,
         Serialize, Deserialize)]
pub struct Half<T>(pub T);

impl<T> fmt::Display for Half<T>
    where T: fmt::Display + Div<Output = T> + Rem<Output = T> +
             Zero + One + Clone
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.clone().try_get() {
            Ok(x) => write!(f, "{}", x),
            Err(d) => write!(f, "{}/2", d.0),
        }
    }
}

impl<T: Add<Output = T> + Clone> From<T> for Half<T> {
    #[inline]
    fn from(t: T) -> Self {
        Half(t.clone() + t)
    }
}

impl<T> Half<T> {
    /// Unwrap to twice its logical value.
    #[inline]
    pub fn twice(self) -> T {
        self.0
    }
}

impl<T: Clone + Div<Output = T> + Rem<Output = T> + Zero + One> Half<T> {
    /// Get the value if it's half-even.  Otherwise, returns `Err(self)`.
    #[inline]
    pub fn try_get(self) -> Result<T, Half<T>> {
        let two = T::one() + T::one();
        if (self.0.clone() % two.clone()).is_zero() {
            Ok(self.0 / two)
        } else {
            Err(self)
        }
    }
}

impl<T: Ord + Sub> Half<T> {
    #[inline]
    pub fn abs_diff(self, other: Self) -> Half<T::Output> {
        if self.0 >= other.0 {
            self - other
        } else {
            other - self
        }
    }
}

impl<T: Add<U>, U> Add<Half<U>> for Half<T> {
    type Output = Half<T::Output>;
    #[inline]
    fn add(self, other: Half<U>) -> Self::Output {
        Half(self.0 + other.0)
    }
}

impl<T: Sub<U>, U> Sub<Half<U>> for Half<T> {
    type Output = Half<T::Output>;
    #[inline]
    fn sub(self, other: Half<U>) -> Self::Output {
        Half(self.0 - other.0)
    }
}

impl<T: Neg> Neg for Half<T> {
    type Output = Half<T::Output>;
    #[inline]
    fn neg(self) -> Self::Output {
        Half(-self.0)
    }
}

impl<T: Zero> Zero for Half<T> {
    #[inline]
    fn zero() -> Self {
        Half(Zero::zero())
    }
    #[inline]
    fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

/// Inclusive range of angular momenta in steps of one (two in doubled
/// units).  Empty if `start > end`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct HalfRange {
    pub start: Half<i32>,
    pub end: Half<i32>,
}

impl HalfRange {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }

    #[inline]
    pub fn contains(&self, j: Half<i32>) -> bool {
        self.start <= j && j <= self.end
            && (j.twice() - self.start.twice()) % 2 == 0
    }

    /// Number of values in the range.
    #[inline]
    pub fn len(&self) -> usize {
        if self.is_empty() {
            0
        } else {
            ((self.end.twice() - self.start.twice()) / 2 + 1) as usize
        }
    }

    /// Overlap of two ranges of the same parity class.
    #[inline]
    pub fn intersect(self, other: Self) -> Self {
        HalfRange {
            start: self.start.max(other.start),
            end: self.end.min(other.end),
        }
    }
}

impl Iterator for HalfRange {
    type Item = Half<i32>;
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.is_empty() {
            return None;
        }
        let j = self.start;
        self.start = j + Half(2);
        Some(j)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = HalfRange::len(self);
        (n, Some(n))
    }
}

impl ExactSizeIterator for HalfRange {}

impl Half<i32> {
    /// Obtain the range of values that satisfy the triangular condition, i.e.
    /// the range from `|self − other|` to `self + other` (inclusive).
    #[inline]
    pub fn tri_range(self, other: Self) -> HalfRange {
        HalfRange {
            start: self.abs_diff(other),
            end: self + other,
        }
    }

    /// Values that satisfy both triangular conditions `(j1, j2)` and
    /// `(j3, j4)`.
    #[inline]
    pub fn tri_range_2(
        (j1, j2): (Self, Self),
        (j3, j4): (Self, Self),
    ) -> HalfRange {
        Half::tri_range(j1, j2).intersect(Half::tri_range(j3, j4))
    }

    /// Whether `(self, j2, j3)` satisfies the triangular condition,
    /// including the integrality of `self + j2 + j3`.
    #[inline]
    pub fn tri(self, j2: Self, j3: Self) -> bool {
        self.tri_range(j2).contains(j3)
    }

    /// Returns the phase `(-1)^j`.  Only meaningful if `self` is an integer;
    /// half-odd values are rounded toward zero.
    #[inline]
    pub fn phase(self) -> f64 {
        debug_assert!(self.twice() % 2 == 0, "phase is not real: {}", self);
        if (self.twice() / 2) % 2 == 0 {
            1.0
        } else {
            -1.0
        }
    }
}
