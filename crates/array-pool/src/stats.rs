//! 池状态快照。

/// 单一长度桶的统计。
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct BucketStats {
    /// 桶长度（二次幂）。
    pub length: usize,
    /// 当前空闲的数组数量。
    pub free: usize,
    /// 当前租出的数组数量。
    pub rented: usize,
    /// 累计创建的数组数量，恒等于 `free + rented`。
    pub allocated: usize,
}

/// 整个池的只读快照。
///
/// # 契约说明（What）
/// - `buckets` 按长度升序排列，仅包含已被惰性创建的桶；
/// - `total_allocated` 统计池生命周期内创建过的全部数组，池从不释放数组，因此它同时也是当前存活数组的数量；
/// - `on_demand_allocations` 为桶内无空闲数组时额外创建的数组数量，不含预填充；
/// - `rents` / `returns` 为成功租借与实际生效的归还次数，`ignored_returns` 为被静默忽略的归还次数。
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ArrayPoolStats {
    pub max_supported_length: usize,
    pub buckets: Vec<BucketStats>,
    pub total_allocated: usize,
    pub on_demand_allocations: usize,
    pub rented: usize,
    pub free: usize,
    pub rents: u64,
    pub returns: u64,
    pub ignored_returns: u64,
}

impl ArrayPoolStats {
    /// 查找指定长度桶的统计。
    pub fn bucket(&self, length: usize) -> Option<&BucketStats> {
        self.buckets.iter().find(|bucket| bucket.length == length)
    }

    /// 复用率：租借中未触发按需分配的比例，尚无租借时返回 0.0。
    pub fn reuse_ratio(&self) -> f64 {
        if self.rents == 0 {
            return 0.0;
        }
        let reused = self.rents.saturating_sub(self.on_demand_allocations as u64);
        reused as f64 / self.rents as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reuse_ratio_counts_non_allocating_rents() {
        let stats = ArrayPoolStats {
            rents: 20,
            on_demand_allocations: 5,
            ..ArrayPoolStats::default()
        };
        assert!((stats.reuse_ratio() - 0.75).abs() < 1e-9);
        assert_eq!(ArrayPoolStats::default().reuse_ratio(), 0.0);
    }
}
