use crate::chunker::{chunk_data, compute_boundaries, power_mod};
use crate::config::ChunkerParams;
use crate::error::DedupError;
use crate::testutil::{lcg_bytes, random_bytes};

fn params(min_chunk: i32, modulus: i32, max_chunk: i32, multiplier: i32) -> ChunkerParams {
    ChunkerParams {
        min_chunk,
        modulus,
        max_chunk,
        multiplier,
    }
}

fn default_params() -> ChunkerParams {
    params(64, 4096, 8192, 131)
}

#[test]
fn lcg_generator_is_stable() {
    assert_eq!(
        lcg_bytes(42, 8),
        vec![0x76, 0x52, 0xd2, 0x1f, 0x56, 0x0c, 0xd9, 0x96]
    );
}

#[test]
fn power_mod_wraps_without_intermediate_reduction() {
    // 131^5 overflows i32 and the truncated remainder keeps the sign.
    assert_eq!(power_mod(131, 5, 4096), -1165);
    assert_eq!(power_mod(131, 63, 4096), 3371);
    assert_eq!(power_mod(131, 64, 4096), -767);
    assert_eq!(power_mod(2, 40, 1 << 20), 0);
}

#[test]
fn power_mod_small_exponents() {
    assert_eq!(power_mod(131, 1, 4096), 131);
    assert_eq!(power_mod(7, 0, 16), 7);
    assert_eq!(power_mod(5000, 1, 4096), 904);
}

#[test]
fn golden_boundaries_power_of_two_modulus() {
    let data = lcg_bytes(42, 4000);
    let boundaries = compute_boundaries(&data, &params(16, 256, 1024, 257)).unwrap();
    assert_eq!(
        boundaries,
        vec![0, 888, 913, 1298, 1640, 1856, 2486, 2556, 2582, 2796, 2927, 3062, 3835]
    );
}

#[test]
fn golden_boundaries_signed_arithmetic() {
    // With a non power-of-two modulus the boundary test depends on the sign
    // and width of every intermediate value.
    let data = lcg_bytes(42, 4000);
    let boundaries = compute_boundaries(&data, &params(16, 1000, 1024, 257)).unwrap();
    assert_eq!(
        boundaries,
        vec![0, 21, 330, 635, 1429, 1468, 1953, 2977, 3166, 3338, 3494, 3737, 3821]
    );
}

#[test]
fn golden_boundaries_typical_params() {
    let data = lcg_bytes(7, 200_000);
    let boundaries = compute_boundaries(&data, &default_params()).unwrap();
    assert_eq!(boundaries.len(), 52);
    assert_eq!(
        &boundaries[..8],
        &[0, 8192, 11211, 19403, 19481, 22736, 24107, 28034]
    );
    assert_eq!(&boundaries[49..], &[189832, 190293, 198485]);
}

#[test]
fn forced_boundaries_every_max_chunk() {
    // A 2^30 modulus practically never yields a content boundary.
    let data = lcg_bytes(42, 4000);
    let boundaries = compute_boundaries(&data, &params(32, 1 << 30, 500, 131)).unwrap();
    assert_eq!(
        boundaries,
        vec![0, 500, 1000, 1500, 2000, 2500, 3000, 3500]
    );
}

#[test]
fn zero_bytes_cut_at_every_window() {
    let data = vec![0u8; 1000];
    let boundaries = compute_boundaries(&data, &default_params()).unwrap();
    let expected: Vec<usize> = (0..=960).step_by(64).collect();
    assert_eq!(boundaries, expected);

    let chunks = chunk_data(&data, &default_params()).unwrap();
    assert_eq!(chunks.len(), 16);
    assert_eq!(chunks.last(), Some(&(960, 40)));
}

#[test]
fn chunks_cover_entire_input() {
    let data = random_bytes(1, 300_000);
    let chunks = chunk_data(&data, &default_params()).unwrap();

    let mut expected_offset = 0;
    for (offset, length) in &chunks {
        assert_eq!(*offset, expected_offset, "gap or overlap at offset {offset}");
        assert!(*length > 0);
        expected_offset = offset + length;
    }
    assert_eq!(expected_offset, data.len(), "chunks don't cover entire input");
}

#[test]
fn deterministic_chunking() {
    let data = random_bytes(2, 100_000);
    let first = compute_boundaries(&data, &default_params()).unwrap();
    let second = compute_boundaries(&data, &default_params()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn boundaries_strictly_increase_from_zero() {
    let data = random_bytes(3, 100_000);
    let boundaries = compute_boundaries(&data, &params(48, 512, 2048, 257)).unwrap();
    assert_eq!(boundaries[0], 0);
    assert!(boundaries.windows(2).all(|w| w[0] < w[1]));
    assert!(*boundaries.last().unwrap() < data.len());
}

#[test]
fn chunk_lengths_bounded_by_max_plus_window() {
    let p = params(64, 4096, 1024, 131);
    let data = random_bytes(4, 200_000);
    let chunks = chunk_data(&data, &p).unwrap();
    let limit = p.largest_chunk_len() as usize;
    assert_eq!(limit, p.max_chunk_len() + p.min_chunk_len() - 2);
    for (_, length) in &chunks {
        assert!(*length <= limit, "chunk of {length} bytes exceeds bound {limit}");
    }
    // Random data with a 4096 modulus needs forced cuts at max_chunk.
    assert!(chunks.iter().any(|(_, length)| *length == p.max_chunk_len()));
}

#[test]
fn two_byte_window_never_exceeds_max_chunk() {
    // Modulus too large for any content cut, so every chunk is forced or trailing.
    let p = params(2, 1 << 30, 100, 131);
    assert_eq!(p.largest_chunk_len(), 100);
    for len in [1usize, 99, 100, 101, 199, 200, 201, 1000] {
        let data = random_bytes(len as u64, len);
        for (_, length) in chunk_data(&data, &p).unwrap() {
            assert!(length <= 100, "chunk of {length} bytes from {len} byte input");
        }
    }
}

#[test]
fn small_data_single_chunk() {
    let data = vec![0x42u8; 40];
    let chunks = chunk_data(&data, &default_params()).unwrap();
    assert_eq!(chunks, vec![(0, 40)]);
}

#[test]
fn empty_data_no_chunks() {
    assert_eq!(compute_boundaries(b"", &default_params()).unwrap(), vec![0]);
    assert!(chunk_data(b"", &default_params()).unwrap().is_empty());
}

#[test]
fn data_of_exactly_max_chunk_is_one_chunk_or_more() {
    let p = default_params();
    let data = random_bytes(5, p.max_chunk_len());
    let chunks = chunk_data(&data, &p).unwrap();
    let total: usize = chunks.iter().map(|(_, len)| len).sum();
    assert_eq!(total, p.max_chunk_len());
}

#[test]
fn unit_window_drops_trailing_empty_extent() {
    let p = params(1, 1 << 20, 1, 3);
    let data = [9u8, 8, 7, 6, 5];
    assert_eq!(compute_boundaries(&data, &p).unwrap(), vec![0, 1, 2, 3, 4, 5]);
    assert_eq!(
        chunk_data(&data, &p).unwrap(),
        vec![(0, 1), (1, 1), (2, 1), (3, 1), (4, 1)]
    );
}

#[test]
fn invalid_params_rejected_before_chunking() {
    let err = compute_boundaries(b"data", &params(0, 4096, 8192, 131)).unwrap_err();
    assert!(matches!(err, DedupError::Config(_)));
    let err = chunk_data(b"data", &params(64, 4096, 32, 131)).unwrap_err();
    assert!(matches!(err, DedupError::Config(_)));
}
