/// Check whether two `f64` numbers are equal within the given
/// [`Toler`](utils/struct.Toler.html).
///
/// ```
/// #[macro_use]
/// extern crate jblock;
///
/// use jblock::utils::Toler;
///
/// fn main() {
///     toler_assert_eq!(Toler { abserr: 1e-2, relerr: 1e-3 }, 10.0, 10.02);
/// }
/// ```
#[macro_export]
macro_rules! toler_assert_eq {
    ($toler:expr, $left:expr, $right:expr) => {
        let toler = &$toler;
        let left = $left;
        let right = $right;
        assert!(toler.is_eq(left, right),
                "{} does not equal to {} within {:?}",
                left, right, toler)
    };
    ($toler:expr, $left:expr, $right:expr, $($arg:tt)+) => {
        let toler = &$toler;
        let left = $left;
        let right = $right;
        assert!(toler.is_eq(left, right),
                "{} does not equal to {} within {:?}: {}",
                left, right, toler, format_args!($($arg)+))
    };
}

/// Declare a regular expression (`Regex`) cached via `lazy_static!`.
/// This macro is mainly for internal use.
#[macro_export]
macro_rules! re {
    ($e:expr) => {
        {
            lazy_static! {
                static ref REGEX: Regex = Regex::new($e).unwrap();
            }
            &REGEX
        }
    }
}

/// Return early with `Error::Precondition` if the condition does not hold.
/// The error records the call site and the condition text (or a formatted
/// message when one is given).
#[macro_export]
macro_rules! precondition {
    ($cond:expr) => {
        if !$cond {
            return Err($crate::error::Error::Precondition {
                site: concat!(module_path!(), ":", line!()),
                cond: stringify!($cond).to_owned(),
            }.into());
        }
    };
    ($cond:expr, $($arg:tt)+) => {
        if !$cond {
            return Err($crate::error::Error::Precondition {
                site: concat!(module_path!(), ":", line!()),
                cond: format!($($arg)+),
            }.into());
        }
    };
}

/// Same as `precondition!` but for internal invariants: a failure here
/// indicates a bug in this crate rather than bad input.
#[macro_export]
macro_rules! postcondition {
    ($cond:expr) => {
        if !$cond {
            return Err($crate::error::Error::Postcondition {
                site: concat!(module_path!(), ":", line!()),
                cond: stringify!($cond).to_owned(),
            }.into());
        }
    };
    ($cond:expr, $($arg:tt)+) => {
        if !$cond {
            return Err($crate::error::Error::Postcondition {
                site: concat!(module_path!(), ":", line!()),
                cond: format!($($arg)+),
            }.into());
        }
    };
}
