//! Axis orders used to bring the class axis of a `[N, C, d1, ..., dk]` tensor last.

/// Axis holding the classes of a classification input, and the axis gathered along
/// once the input is flattened to `[rows, classes]`.
pub const CLASS_AXIS: usize = 1;

/// Permutation moving the class axis of a rank-`D` tensor to the end.
///
/// `[N, C, H]` becomes `[N, H, C]` and `[N, C, H, W]` becomes `[N, H, W, C]`. The
/// order is fixed by the rank, so it is computed once at compile time.
pub struct ClassLast<const D: usize>;

impl<const D: usize> ClassLast<D> {
    /// Axis order handed to a transpose.
    pub const AXES: [isize; D] = {
        let mut axes = [0isize; D];
        let mut i = 1;
        while i + 1 < D {
            axes[i] = (i + 1) as isize;
            i += 1;
        }
        if D > 1 {
            axes[D - 1] = CLASS_AXIS as isize;
        }
        axes
    };
}
