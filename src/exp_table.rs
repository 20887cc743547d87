//! Scaled power tables `t[i] = scale · wⁱ`.

use ark_ff::Field;
use rayon::prelude::*;

/// Below this many entries per thread, one sequential chain of
/// multiplications beats paying an exponentiation per chunk.
pub const EXP_MUL_RATIO: usize = 2400 / 26;

/// Returns `[scale, scale·w, scale·w², …]` of length `n`.
///
/// The tail is split into one chunk per thread; each chunk is seeded with a
/// single exponentiation and filled by repeated multiplication.
pub fn exp_table<F: Field>(scale: F, w: F, n: usize) -> Vec<F> {
    let mut table = vec![F::zero(); n];
    let Some((first, tail)) = table.split_first_mut() else {
        return table;
    };
    *first = scale;

    let interval = tail.len() / rayon::current_num_threads();
    if interval < EXP_MUL_RATIO {
        fill_chunk(scale, w, 1, tail);
    } else {
        tail.par_chunks_mut(interval)
            .enumerate()
            .for_each(|(i, chunk)| fill_chunk(scale, w, (1 + i * interval) as u64, chunk));
    }
    table
}

fn fill_chunk<F: Field>(scale: F, w: F, power: u64, chunk: &mut [F]) {
    let Some((first, rest)) = chunk.split_first_mut() else {
        return;
    };
    *first = w.pow([power]) * scale;
    let mut acc = *first;
    for v in rest {
        acc *= w;
        *v = acc;
    }
}
