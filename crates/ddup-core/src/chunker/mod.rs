//! Rabin-Karp style content-defined chunking.
//!
//! Boundaries are a pure function of the input bytes and [`ChunkerParams`].
//! The fingerprint is computed with wrapping `i32` arithmetic over input
//! bytes read as `i8`, so every store built with the same parameters agrees
//! on where chunks start.

use crate::config::ChunkerParams;
use crate::error::Result;

/// Raise `base` to `exponent` the way the fingerprint expects.
///
/// The accumulator starts at `base % modulus` and is multiplied by that value
/// `exponent - 1` more times with wrapping multiplication and no reduction in
/// between; only the final product is reduced. Remainders are truncated, so
/// the result carries the sign of the wrapped product.
pub fn power_mod(base: i32, exponent: i32, modulus: i32) -> i32 {
    let reduced = base.wrapping_rem(modulus);
    let mut acc = reduced;
    let mut remaining = exponent;
    while remaining > 1 {
        acc = acc.wrapping_mul(reduced);
        remaining -= 1;
    }
    acc.wrapping_rem(modulus)
}

/// Compute chunk start offsets for `data`.
///
/// The first offset is always 0 and offsets are strictly increasing. The
/// final chunk runs from the last offset to the end of `data`.
pub fn compute_boundaries(data: &[u8], params: &ChunkerParams) -> Result<Vec<usize>> {
    params.validate()?;

    let m = params.min_chunk_len();
    let max = params.max_chunk_len();
    let d = params.multiplier;
    let q = params.modulus;
    let mask = q.wrapping_sub(1);

    // powers[k] == power_mod(d, k, q) for k in 1..=m
    let mut powers = vec![0i32; m + 1];
    for (k, slot) in powers.iter_mut().enumerate().skip(1) {
        *slot = power_mod(d, k as i32, q);
    }
    let dm1 = power_mod(d, params.min_chunk - 1, q);

    let mut boundaries = vec![0usize];
    let mut last = 0usize;
    let mut prev = 0i32;
    let mut s = 0usize;

    while s + m <= data.len() {
        if s - last + 1 >= max {
            last = s + 1;
            boundaries.push(last);
            s += 1;
            continue;
        }

        let mut rfp = if s == 0 || s == last {
            (0..m).fold(0i32, |acc, i| {
                let term = signed(data[s + i])
                    .wrapping_mul(powers[m - i])
                    .wrapping_rem(q);
                acc.wrapping_add(term)
            })
        } else {
            let outgoing = dm1.wrapping_mul(signed(data[s - 1]));
            d.wrapping_mul(prev.wrapping_sub(outgoing))
                .wrapping_add(signed(data[s + m - 1]))
        };
        rfp = rfp.wrapping_rem(q);
        prev = rfp;

        if rfp & mask == 0 && s + m < data.len() {
            last = s + m;
            boundaries.push(last);
            s = last;
            continue;
        }
        s += 1;
    }

    Ok(boundaries)
}

/// Chunk `data` into `(offset, length)` pairs.
///
/// Zero-length extents are dropped, so empty input yields no chunks.
pub fn chunk_data(data: &[u8], params: &ChunkerParams) -> Result<Vec<(usize, usize)>> {
    let boundaries = compute_boundaries(data, params)?;
    let ends = boundaries.iter().skip(1).copied().chain(std::iter::once(data.len()));
    Ok(boundaries
        .iter()
        .zip(ends)
        .filter(|(start, end)| end > *start)
        .map(|(start, end)| (*start, end - start))
        .collect())
}

#[inline]
fn signed(byte: u8) -> i32 {
    byte as i8 as i32
}
