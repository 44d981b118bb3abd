//! Numeric helpers for the placement hot loops.

/// A fast approximation of `exp(a)` as `(1 + a/1024)^1024`, computed by ten
/// repeated squarings.
///
/// Accurate to a relative error of roughly `5e-4` over the argument range the
/// wirelength model produces; arguments far below the exp-underflow guard are
/// never passed in.
pub fn fast_exp(a: f32) -> f32 {
    let mut a = 1.0 + a / 1024.0;
    a *= a;
    a *= a;
    a *= a;
    a *= a;
    a *= a;
    a *= a;
    a *= a;
    a *= a;
    a *= a;
    a *= a;
    a
}
