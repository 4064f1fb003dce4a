//! Linear algebra.
use ndarray::{Array4, ArrayBase, ArrayView2, ArrayViewMut2, DataMut, Ix2};
use ndarray::linalg::general_mat_mul;
use super::error::Result;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transpose {
    None,
    Ordinary,
}

impl Transpose {
    fn apply<'a>(self, a: ArrayView2<'a, f64>) -> ArrayView2<'a, f64> {
        match self {
            Transpose::None => a,
            Transpose::Ordinary => a.reversed_axes(),
        }
    }
}

/// ```text
/// C ← α op(A) op(B) + β C
/// ```
///
/// Empty dimensions are allowed; with `k = 0` this reduces to `C ← β C`.
pub fn gemm<S>(
    transa: Transpose,
    transb: Transpose,
    alpha: f64,
    a: ArrayView2<f64>,
    b: ArrayView2<f64>,
    beta: f64,
    c: &mut ArrayBase<S, Ix2>,
) -> Result<()>
    where S: DataMut<Elem = f64>
{
    let a = transa.apply(a);
    let b = transb.apply(b);
    let (m, k) = a.dim();
    let (k2, n) = b.dim();
    precondition!(k == k2 && c.dim() == (m, n),
                  "gemm: cannot multiply {:?} by {:?} into {:?}",
                  a.dim(), b.dim(), c.dim());
    if m == 0 || n == 0 {
        return Ok(());
    }
    if k == 0 {
        if beta == 0.0 {
            c.fill(0.0);
        } else {
            *c *= beta;
        }
        return Ok(());
    }
    general_mat_mul(alpha, &a, &b, beta, c);
    Ok(())
}

/// View a block `(n1, n2, n3, n4)` as the matrix `(n1 n2, n3 n4)`.
pub fn as_matrix(block: &Array4<f64>) -> Result<ArrayView2<f64>> {
    let (n1, n2, n3, n4) = block.dim();
    Ok(block.view().into_shape((n1 * n2, n3 * n4))?)
}

/// Mutable version of `as_matrix`.
pub fn as_matrix_mut(block: &mut Array4<f64>) -> Result<ArrayViewMut2<f64>> {
    let (n1, n2, n3, n4) = block.dim();
    Ok(block.view_mut().into_shape((n1 * n2, n3 * n4))?)
}
