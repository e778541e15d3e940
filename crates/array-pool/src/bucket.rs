//! 桶长度计算与空闲桶簿记。
//!
//! # 设计概要（How）
//! - [`bucket_length`] 从 2 开始逐次翻倍，返回第一个不小于请求长度且不超过上限的二次幂；
//! - [`FreeBucket`] 以栈保存某一长度下空闲数组在竞技场中的槽位索引，并记录该长度累计分配的数组数量。

use tracing::error;

use crate::error::{ArrayPoolError, Result};

/// 最小桶长度，长度 1 的请求同样落入长度 2 的桶。
pub const MIN_BUCKET_LENGTH: usize = 2;

/// 计算请求长度所属的桶长度。
///
/// # 契约说明（What）
/// - **前置条件**：调用方已校验 `1 <= min_length <= max_supported_length`；
/// - **返回值**：`[2, max_supported_length]` 内第一个满足 `candidate >= min_length` 的二次幂；
///   请求长度本身为二次幂时原样返回；
/// - **失败**：区间内不存在候选时返回 [`ArrayPoolError::InvariantViolation`]，绝不回退为非二次幂长度。
pub fn bucket_length(min_length: usize, max_supported_length: usize) -> Result<usize> {
    let mut candidate = MIN_BUCKET_LENGTH;
    while candidate <= max_supported_length {
        if min_length <= candidate {
            return Ok(candidate);
        }
        match candidate.checked_mul(2) {
            Some(next) => candidate = next,
            None => break,
        }
    }

    error!(
        min_length,
        max_supported_length, "power-of-two search exhausted the supported range"
    );
    Err(ArrayPoolError::InvariantViolation {
        min_length,
        max_supported_length,
    })
}

/// 单一长度的空闲数组集合。
///
/// - `free`：当前空闲的槽位索引，后进先出；选择顺序对调用方不构成承诺；
/// - `allocated`：该长度下池累计创建的数组数量（预填充与按需分配之和），只增不减。
#[derive(Debug, Default)]
pub(crate) struct FreeBucket {
    free: Vec<usize>,
    allocated: usize,
}

impl FreeBucket {
    /// 登记一个新创建且立即空闲的槽位。
    pub(crate) fn adopt_free(&mut self, slot: usize) {
        self.allocated += 1;
        self.free.push(slot);
    }

    /// 登记一个新创建且立即被租出的槽位。
    pub(crate) fn adopt_rented(&mut self) {
        self.allocated += 1;
    }

    /// 取出任意一个空闲槽位。
    pub(crate) fn take_free(&mut self) -> Option<usize> {
        self.free.pop()
    }

    /// 归还槽位。调用方保证该槽位此前处于租出状态，因此不会重复入栈。
    pub(crate) fn release(&mut self, slot: usize) {
        self.free.push(slot);
    }

    pub(crate) fn free_count(&self) -> usize {
        self.free.len()
    }

    pub(crate) fn allocated(&self) -> usize {
        self.allocated
    }
}

#[cfg(test)]
mod tests {
    use tracing_test::traced_test;

    use super::*;
    use crate::error::ErrorKind;

    #[test]
    #[traced_test]
    fn exhausted_search_is_logged() {
        assert!(bucket_length(7, 6).is_err());
        assert!(logs_contain("power-of-two search exhausted"));
    }

    #[test]
    fn rounds_up_to_next_power_of_two() {
        let max = 1 << 20;
        let cases = [(1, 2), (2, 2), (3, 4), (4, 4), (5, 8), (9, 16), (1000, 1024), (1024, 1024)];
        for (requested, expected) in cases {
            assert_eq!(bucket_length(requested, max), Ok(expected), "requested {requested}");
        }
    }

    #[test]
    fn largest_bucket_equals_power_of_two_bound() {
        assert_eq!(bucket_length(1 << 30, 1 << 30), Ok(1 << 30));
        assert_eq!(bucket_length((1 << 29) + 1, 1 << 30), Ok(1 << 30));
    }

    #[test]
    fn search_fails_above_largest_power_within_bound() {
        let err = bucket_length(5, 6).expect_err("5 需要长度 8 的桶，超出上限 6");
        assert_eq!(err.kind(), ErrorKind::InvariantViolation);
        assert_eq!(bucket_length(4, 6), Ok(4));

        let err = bucket_length(1, 1).expect_err("上限 1 时不存在任何桶");
        assert_eq!(err.kind(), ErrorKind::InvariantViolation);
    }

    #[test]
    fn search_does_not_overflow_at_usize_max() {
        let top = 1usize << (usize::BITS - 1);
        assert_eq!(bucket_length(top, usize::MAX), Ok(top));
        assert!(bucket_length(top + 1, usize::MAX).is_err());
    }

    #[test]
    fn free_bucket_tracks_allocation_and_reuse() {
        let mut bucket = FreeBucket::default();
        bucket.adopt_free(0);
        bucket.adopt_free(1);
        bucket.adopt_rented();
        assert_eq!(bucket.allocated(), 3);
        assert_eq!(bucket.free_count(), 2);

        let slot = bucket.take_free().expect("存在空闲槽位");
        assert_eq!(bucket.free_count(), 1);
        bucket.release(slot);
        assert_eq!(bucket.free_count(), 2);
        assert_eq!(bucket.allocated(), 3);
    }
}
