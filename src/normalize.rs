//! Position normalizer: subtracts a common offset from every stored
//! position to avoid 32-bit overflow of the cursor. Cells at or below the
//! offset are reset to the empty sentinel (0).
//!
//! Dispatches across scalar / SSE4.1 / AVX2 / NEON, generalized to `i32`
//! position arrays shared by the hash-index layer and every dictionary
//! store.

/// Align to a 64-byte cache line before relocating the window.
pub(crate) const MOVE_BLOCK_ALIGN: i32 = 64;
pub(crate) const MOVE_BLOCK_ALIGN_MASK: i32 = !(MOVE_BLOCK_ALIGN - 1);

pub(crate) fn normalize(positions: &mut [i32], norm_offset: i32) {
    #[cfg(all(feature = "std", feature = "optimization", target_arch = "x86_64"))]
    {
        if std::arch::is_x86_feature_detected!("avx2") {
            // SAFETY: we've checked that the CPU supports AVX2.
            return unsafe { normalize_avx2(positions, norm_offset) };
        }
        if std::arch::is_x86_feature_detected!("sse4.1") {
            // SAFETY: we've checked that the CPU supports SSE4.1.
            return unsafe { normalize_sse41(positions, norm_offset) };
        }
    }

    #[cfg(all(feature = "std", feature = "optimization", target_arch = "aarch64"))]
    {
        if std::arch::is_aarch64_feature_detected!("neon") {
            // SAFETY: we've checked that the CPU supports NEON.
            return unsafe { normalize_neon(positions, norm_offset) };
        }
    }

    normalize_scalar(positions, norm_offset);
}

#[inline(always)]
fn normalize_scalar(positions: &mut [i32], norm_offset: i32) {
    positions
        .iter_mut()
        .for_each(|p| *p = (*p - norm_offset).max(0));
}

#[cfg(all(feature = "std", feature = "optimization", target_arch = "aarch64"))]
#[target_feature(enable = "neon")]
unsafe fn normalize_neon(positions: &mut [i32], norm_offset: i32) {
    use core::arch::aarch64::*;

    let norm_v = vdupq_n_s32(norm_offset);
    let (prefix, chunks, suffix) = positions.align_to_mut::<int32x4_t>();

    normalize_scalar(prefix, norm_offset);

    for chunk in chunks {
        let ptr = chunk as *mut int32x4_t as *mut i32;
        let data = vld1q_s32(ptr);
        let sub = vsubq_s32(data, norm_v);
        let zero = vdupq_n_s32(0);
        let result = vmaxq_s32(sub, zero);
        vst1q_s32(ptr, result);
    }

    normalize_scalar(suffix, norm_offset);
}

#[cfg(all(feature = "std", feature = "optimization", target_arch = "x86_64"))]
#[target_feature(enable = "avx2")]
unsafe fn normalize_avx2(positions: &mut [i32], norm_offset: i32) {
    use core::arch::x86_64::*;

    let norm_v = _mm256_set1_epi32(norm_offset);
    let zero = _mm256_setzero_si256();
    let (prefix, chunks, suffix) = positions.align_to_mut::<__m256i>();

    normalize_scalar(prefix, norm_offset);

    for chunk in chunks {
        let data = _mm256_load_si256(chunk as *mut _);
        let sub = _mm256_sub_epi32(data, norm_v);
        let result = _mm256_max_epi32(sub, zero);
        _mm256_store_si256(chunk as *mut _, result);
    }

    normalize_scalar(suffix, norm_offset);
}

#[cfg(all(feature = "std", feature = "optimization", target_arch = "x86_64"))]
#[target_feature(enable = "sse4.1")]
unsafe fn normalize_sse41(positions: &mut [i32], norm_offset: i32) {
    use core::arch::x86_64::*;

    let norm_v = _mm_set1_epi32(norm_offset);
    let zero = _mm_setzero_si128();
    let (prefix, chunks, suffix) = positions.align_to_mut::<__m128i>();

    normalize_scalar(prefix, norm_offset);

    for chunk in chunks {
        let data = _mm_load_si128(chunk as *mut _);
        let sub = _mm_sub_epi32(data, norm_v);
        let result = _mm_max_epi32(sub, zero);
        _mm_store_si128(chunk as *mut _, result);
    }

    normalize_scalar(suffix, norm_offset);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subtracts_offset_and_floors_at_zero() {
        let mut positions = [0, 5, 10, 100, 1000];
        normalize(&mut positions, 50);
        assert_eq!(positions, [0, 0, 0, 0, 950]);
    }

    #[test]
    fn sentinel_zero_stays_zero() {
        let mut positions = vec![0; 37];
        normalize(&mut positions, 12345);
        assert!(positions.iter().all(|&p| p == 0));
    }

    #[test]
    fn large_buffer_matches_scalar_reference() {
        let mut fast: Vec<i32> = (0..10_000).collect();
        let mut reference = fast.clone();
        normalize(&mut fast, 4242);
        normalize_scalar(&mut reference, 4242);
        assert_eq!(fast, reference);
    }
}
