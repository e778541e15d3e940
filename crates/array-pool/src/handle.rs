//! 租借句柄与池标识。
//!
//! # 设计初衷（Why）
//! - 数组始终由池内部的竞技场持有，调用方只拿到轻量的 [`ArrayHandle`]，
//!   以“池标识 + 槽位索引 + 代数”表达一次租借，取代按引用地址比较的做法；
//! - 槽位每次归还后代数递增，旧句柄因此无法触及同一数组的下一次租借；
//! - 两个内容完全相同的数组占据不同槽位，因而是不同的句柄，互不影响租借状态。

use core::sync::atomic::{AtomicU64, Ordering};

static NEXT_POOL_ID: AtomicU64 = AtomicU64::new(1);

/// 进程内唯一的池实例标识。
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct PoolId(u64);

impl PoolId {
    pub(crate) fn next() -> Self {
        PoolId(NEXT_POOL_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// 指向池中某个数组的句柄。
///
/// # 契约说明（What）
/// - 句柄可自由复制；复制品指向同一数组；
/// - 句柄在数组归还后依旧存在，但此时 `in_rent` 返回 `false`，元素访问返回 `None`；
///   即使同一数组随后被再次租出，旧句柄依旧失效，再次租借会签发代数不同的新句柄；
/// - 由其它池实例签发的句柄对本池而言是“陌生”句柄，所有查询与归还均被忽略。
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct ArrayHandle {
    pub(crate) pool: PoolId,
    pub(crate) slot: usize,
    pub(crate) generation: u32,
    pub(crate) length: usize,
}

impl ArrayHandle {
    /// 数组长度，恒为二次幂。
    pub fn length(&self) -> usize {
        self.length
    }

    /// 签发该句柄的池实例。
    pub fn pool_id(&self) -> PoolId {
        self.pool
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_ids_are_unique() {
        let first = PoolId::next();
        let second = PoolId::next();
        assert_ne!(first, second);
    }
}
