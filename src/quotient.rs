//! Quotient polynomial `H = (A·B - C) / Z`.
//!
//! The solver produces `A`, `B`, `C` as evaluations over the domain. They are
//! interpolated, re-evaluated on the coset `{g·ωⁱ}` where `Z` is the constant
//! `-2`, combined pointwise, and interpolated back into `H`'s coefficients.

use crate::domain::FftDomain;
use crate::exp_table::exp_table;

use ark_ff::PrimeField;
use rayon::prelude::*;
use tracing::debug_span;

/// Runs `f` on three vectors at once: two on pool workers, the third on the
/// calling thread.
fn join3<T, G>(a: &mut Vec<T>, b: &mut Vec<T>, c: &mut Vec<T>, f: G)
where
    T: Send,
    G: Fn(&mut Vec<T>) + Sync,
{
    let f = &f;
    rayon::join(|| f(a), || rayon::join(|| f(b), || f(c)));
}

fn scale<F: PrimeField>(values: &mut [F], table: &[F]) {
    values
        .par_iter_mut()
        .zip(table.par_iter())
        .for_each(|(v, t)| *v *= t);
}

/// Computes the coefficients of `H`, as canonical integers ready for MSM.
///
/// `a`, `b`, `c` are the QAP evaluations; they are zero-padded to the domain
/// size. The result has `n` entries, the last of which is zero for a
/// satisfying assignment.
///
/// # Panics
///
/// Panics if the three vectors differ in length or exceed the domain.
pub fn compute_h<F: PrimeField>(
    mut a: Vec<F>,
    mut b: Vec<F>,
    mut c: Vec<F>,
    domain: &FftDomain<F>,
) -> Vec<F::BigInt> {
    let n = domain.cardinality();
    assert!(
        a.len() == b.len() && b.len() == c.len(),
        "QAP vectors differ in length: {} / {} / {}",
        a.len(),
        b.len(),
        c.len()
    );
    assert!(a.len() <= n, "QAP has {} rows, domain has {}", a.len(), n);
    let _span = debug_span!("compute_h", n).entered();

    a.resize(n, F::zero());
    b.resize(n, F::zero());
    c.resize(n, F::zero());

    // Interpolate while the coset table is built.
    let (table, ()) = rayon::join(
        || exp_table(domain.cardinality_inv(), domain.generator_sqrt(), n),
        || join3(&mut a, &mut b, &mut c, |v| domain.ifft_unnormalized(v)),
    );

    join3(&mut a, &mut b, &mut c, |v| {
        scale(v, &table);
        domain.fft(v);
    });

    let z_inv = domain.vanishing_inv_on_coset();
    a.par_iter_mut()
        .zip(b.par_iter().zip(c.par_iter()))
        .for_each(|(a, (b, c))| *a = (*a * b - c) * z_inv);
    drop(b);
    drop(c);

    let (table, ()) = rayon::join(
        || exp_table(domain.cardinality_inv(), domain.generator_sqrt_inv(), n),
        || domain.ifft_unnormalized(&mut a),
    );

    a.par_iter()
        .zip(table.par_iter())
        .map(|(h, t)| (*h * t).into_bigint())
        .collect()
}
