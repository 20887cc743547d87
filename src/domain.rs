//! Radix-2 evaluation domains with the coset used by the quotient step.
//!
//! The coset shift is `g`, a primitive `2n`-th root of unity. With `gⁿ = -1`
//! the vanishing polynomial `Xⁿ - 1` is the constant `-2` on the whole coset,
//! so dividing by it is one multiplication by `-1/2`.

use crate::errors::DomainError;
use crate::exp_table::exp_table;

use ark_ff::{Field, PrimeField};
use ark_poly::{EvaluationDomain, Radix2EvaluationDomain};
use rayon::prelude::*;

/// Power-of-two evaluation domain `{ωⁱ}` plus its coset `{g·ωⁱ}`.
#[derive(Clone, Debug)]
pub struct FftDomain<F: PrimeField> {
    domain: Radix2EvaluationDomain<F>,
    // Same domain with ω and ω⁻¹ swapped: a forward FFT over it is the
    // inverse FFT without the 1/n factor.
    inverse: Radix2EvaluationDomain<F>,
    generator_sqrt: F,
    generator_sqrt_inv: F,
}

impl<F: PrimeField> FftDomain<F> {
    /// Smallest domain of at least `size` points.
    pub fn new(size: usize) -> Result<Self, DomainError> {
        let too_large = || DomainError::DomainTooLarge {
            size,
            two_adicity: F::TWO_ADICITY,
        };
        let domain = Radix2EvaluationDomain::<F>::new(size).ok_or_else(too_large)?;
        let generator_sqrt =
            F::get_root_of_unity(2 * domain.size() as u64).ok_or_else(too_large)?;
        let generator_sqrt_inv = generator_sqrt.inverse().ok_or_else(too_large)?;
        let inverse = Radix2EvaluationDomain {
            group_gen: domain.group_gen_inv,
            group_gen_inv: domain.group_gen,
            ..domain
        };
        Ok(Self {
            domain,
            inverse,
            generator_sqrt,
            generator_sqrt_inv,
        })
    }

    /// Number of points `n`.
    pub fn cardinality(&self) -> usize {
        self.domain.size()
    }

    /// `1/n`.
    pub fn cardinality_inv(&self) -> F {
        self.domain.size_inv
    }

    /// `ω`.
    pub fn generator(&self) -> F {
        self.domain.group_gen
    }

    /// `ω⁻¹`.
    pub fn generator_inv(&self) -> F {
        self.domain.group_gen_inv
    }

    /// The coset shift `g`, with `g² = ω`.
    pub fn generator_sqrt(&self) -> F {
        self.generator_sqrt
    }

    /// `g⁻¹`.
    pub fn generator_sqrt_inv(&self) -> F {
        self.generator_sqrt_inv
    }

    /// `1 / Z(g·ωⁱ) = -1/2`.
    pub fn vanishing_inv_on_coset(&self) -> F {
        // (r - 1) / 2 is -1/2 modulo r.
        F::from(F::MODULUS_MINUS_ONE_DIV_TWO)
    }

    /// `Z(x) = xⁿ - 1`.
    pub fn evaluate_vanishing(&self, x: F) -> F {
        self.domain.evaluate_vanishing_polynomial(x)
    }

    /// Coefficients to evaluations over `{ωⁱ}`, in place. Pads to `n`.
    pub fn fft(&self, values: &mut Vec<F>) {
        self.domain.fft_in_place(values);
    }

    /// Evaluations to `n` times the coefficients, in place.
    pub fn ifft_unnormalized(&self, values: &mut Vec<F>) {
        self.inverse.fft_in_place(values);
    }

    /// Evaluations to coefficients, in place.
    pub fn ifft(&self, values: &mut Vec<F>) {
        self.domain.ifft_in_place(values);
    }

    /// Coefficients to evaluations over the coset `{g·ωⁱ}`.
    pub fn coset_fft(&self, values: &mut Vec<F>) {
        values.resize(self.cardinality(), F::zero());
        let table = exp_table(F::one(), self.generator_sqrt, values.len());
        values
            .par_iter_mut()
            .zip(table.par_iter())
            .for_each(|(v, t)| *v *= t);
        self.fft(values);
    }

    /// Evaluations over the coset `{g·ωⁱ}` to coefficients.
    pub fn coset_ifft(&self, values: &mut Vec<F>) {
        self.ifft_unnormalized(values);
        let table = exp_table(self.cardinality_inv(), self.generator_sqrt_inv, values.len());
        values
            .par_iter_mut()
            .zip(table.par_iter())
            .for_each(|(v, t)| *v *= t);
    }
}

/// Evaluates a polynomial given by its coefficients at `x`.
pub fn evaluate_polynomial<F: Field>(coeffs: &[F], x: F) -> F {
    coeffs.iter().rev().fold(F::zero(), |acc, c| acc * x + c)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bn254::Fr;
    use ark_ff::{FftField, One, UniformRand};
    use rand_chacha::{rand_core::SeedableRng, ChaCha20Rng};

    fn random_vec(n: usize, seed: u64) -> Vec<Fr> {
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        (0..n).map(|_| Fr::rand(&mut rng)).collect()
    }

    #[test]
    fn rounds_up_to_power_of_two() {
        assert_eq!(FftDomain::<Fr>::new(5).unwrap().cardinality(), 8);
        assert_eq!(FftDomain::<Fr>::new(8).unwrap().cardinality(), 8);
        assert_eq!(FftDomain::<Fr>::new(1).unwrap().cardinality(), 1);
    }

    #[test]
    fn coset_shift_squares_to_generator() {
        let domain = FftDomain::<Fr>::new(16).unwrap();
        let g = domain.generator_sqrt();
        assert_eq!(g * g, domain.generator());
        assert_eq!(g.pow([16u64]), -Fr::one());
        assert_eq!(g * domain.generator_sqrt_inv(), Fr::one());
        assert_eq!(domain.evaluate_vanishing(g), -Fr::from(2u64));
        assert_eq!(domain.vanishing_inv_on_coset() * Fr::from(2u64), -Fr::one());
    }

    #[test]
    fn unnormalized_inverse_scales_by_n() {
        let domain = FftDomain::<Fr>::new(32).unwrap();
        let coeffs = random_vec(32, 1);
        let mut evals = coeffs.clone();
        domain.fft(&mut evals);
        domain.ifft_unnormalized(&mut evals);
        let n = Fr::from(32u64);
        let expected: Vec<Fr> = coeffs.iter().map(|c| *c * n).collect();
        assert_eq!(evals, expected);
    }

    #[test]
    fn fft_evaluates_at_powers_of_generator() {
        let domain = FftDomain::<Fr>::new(8).unwrap();
        let coeffs = random_vec(8, 2);
        let mut evals = coeffs.clone();
        domain.fft(&mut evals);
        let w = domain.generator();
        for (i, e) in evals.iter().enumerate() {
            assert_eq!(*e, evaluate_polynomial(&coeffs, w.pow([i as u64])));
        }
        domain.ifft(&mut evals);
        assert_eq!(evals, coeffs);
    }

    #[test]
    fn coset_round_trip() {
        let domain = FftDomain::<Fr>::new(16).unwrap();
        let coeffs = random_vec(16, 3);
        let mut evals = coeffs.clone();
        domain.coset_fft(&mut evals);
        let g = domain.generator_sqrt();
        let w = domain.generator();
        assert_eq!(evals[3], evaluate_polynomial(&coeffs, g * w.pow([3u64])));
        domain.coset_ifft(&mut evals);
        assert_eq!(evals, coeffs);
    }

    #[test]
    fn rejects_domain_beyond_two_adicity() {
        // Asking for the full 2^TWO_ADICITY leaves no room for the coset shift.
        let size = 1usize << Fr::TWO_ADICITY;
        assert!(matches!(
            FftDomain::<Fr>::new(size),
            Err(DomainError::DomainTooLarge { .. })
        ));
    }
}
