use std::{collections::BTreeMap, fmt};

use tracing::{debug, trace};

use crate::{
    bucket::{FreeBucket, bucket_length},
    config::ArrayPoolConfig,
    error::{ArrayPoolError, Result},
    handle::{ArrayHandle, PoolId},
    scoped::ScopedArray,
    stats::{ArrayPoolStats, BucketStats},
};

/// `ArrayPool` 按二次幂长度分桶复用数组，专注于单线程热路径中的临时缓冲（如逐帧的草稿数组）。
///
/// # 模块角色（Why）
/// - 将“按最小长度租借、用完归还”的模式收敛到一个结构，摊薄可变长度短生命周期缓冲的分配开销；
/// - 以句柄跟踪数组身份，归还后的数组无法再经由公开 API 被读写。
///
/// # 核心机制（How）
/// - 全部数组存放于 `slots` 竞技场，槽位索引即数组身份；池从不释放或收缩槽位；
/// - `free_buckets` 以桶长度为键，记录该长度下空闲槽位；桶在首次被请求时惰性创建，并一次性预填充
///   `initial_bucket_population` 个新数组；
/// - 每个槽位携带 `rented` 标志，等价于“已租出集合”；一个数组任一时刻要么在某个空闲桶中、要么处于租出状态；
/// - 槽位代数在归还时递增，句柄需代数一致才能命中槽位，旧句柄无法触及同一数组的下一次租借。
///
/// # 契约说明（What）
/// - **线程模型**：所有修改操作取 `&mut self`，并发访问需由调用方在外部同步（例如每线程一个池）；
/// - **后置条件**：`rent` 返回的数组长度恒为二次幂且不小于请求长度，且不在任何空闲桶中；
/// - **容错**：重复归还、归还陌生句柄均为静默空操作；
/// - **内容**：归还时不清零，后续租借可能观察到旧数据。
pub struct ArrayPool<T> {
    id: PoolId,
    config: ArrayPoolConfig,
    slots: Vec<Slot<T>>,
    free_buckets: BTreeMap<usize, FreeBucket>,
    counters: Counters,
}

struct Slot<T> {
    array: Box<[T]>,
    rented: bool,
    // 每次归还递增，使归还前签发的句柄失效。
    generation: u32,
}

#[derive(Default)]
struct Counters {
    rented: usize,
    on_demand_allocations: usize,
    rents: u64,
    returns: u64,
    ignored_returns: u64,
}

impl<T> Default for ArrayPool<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ArrayPool<T> {
    /// 以默认配置创建空池，不预先分配任何数组。
    pub fn new() -> Self {
        Self::from_validated(ArrayPoolConfig::default())
    }

    /// 以指定最大支持长度创建空池。
    ///
    /// - **失败**：`max_supported_length == 0` 时返回 `InvalidConfiguration`。
    pub fn with_max_supported_length(max_supported_length: usize) -> Result<Self> {
        Self::with_config(ArrayPoolConfig::default().with_max_supported_length(max_supported_length))
    }

    /// 以完整配置创建空池。
    pub fn with_config(config: ArrayPoolConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_validated(config))
    }

    fn from_validated(config: ArrayPoolConfig) -> Self {
        Self {
            id: PoolId::next(),
            config,
            slots: Vec::new(),
            free_buckets: BTreeMap::new(),
            counters: Counters::default(),
        }
    }

    /// 可租借的最大请求长度，构造后不可变。
    pub fn max_supported_length(&self) -> usize {
        self.config.max_supported_length
    }

    /// 构造时使用的配置。
    pub fn config(&self) -> &ArrayPoolConfig {
        &self.config
    }

    /// 本池实例的标识，与其签发的句柄中的 [`ArrayHandle::pool_id`] 一致。
    pub fn id(&self) -> PoolId {
        self.id
    }

    /// 判断句柄指向的数组当前是否处于租出状态。纯查询，无副作用。
    ///
    /// 陌生句柄（来自其它池）与已归还句柄均返回 `false`。
    pub fn in_rent(&self, handle: ArrayHandle) -> bool {
        self.slot(handle).is_some_and(|slot| slot.rented)
    }

    /// 归还数组，使其可以满足后续同桶长度的租借。
    ///
    /// # 契约说明（What）
    /// - 句柄未处于租出状态（从未租出、已归还或来自其它池）时静默返回；
    /// - 成功归还后 `in_rent(handle)` 为 `false`，数组进入与其自身长度一致的空闲桶。
    pub fn return_array(&mut self, handle: ArrayHandle) {
        let released = self
            .slot_mut(handle)
            .filter(|slot| slot.rented)
            .map(|slot| {
                slot.rented = false;
                slot.generation = slot.generation.wrapping_add(1);
                slot.array.len()
            });
        let Some(length) = released else {
            self.counters.ignored_returns += 1;
            trace!(
                slot = handle.slot,
                length = handle.length,
                "ignored return of an array that is not rented from this pool"
            );
            return;
        };

        self.counters.rented -= 1;
        self.counters.returns += 1;
        self.free_buckets
            .entry(length)
            .or_default()
            .release(handle.slot);
        trace!(slot = handle.slot, length, "returned array");
    }

    /// 读取租出中的数组；句柄未租出时返回 `None`。
    pub fn array(&self, handle: ArrayHandle) -> Option<&[T]> {
        self.slot(handle)
            .filter(|slot| slot.rented)
            .map(|slot| &*slot.array)
    }

    /// 写入租出中的数组；句柄未租出时返回 `None`。
    pub fn array_mut(&mut self, handle: ArrayHandle) -> Option<&mut [T]> {
        self.slot_mut(handle)
            .filter(|slot| slot.rented)
            .map(|slot| &mut *slot.array)
    }

    /// 当前租出的数组数量。
    pub fn rented_count(&self) -> usize {
        self.counters.rented
    }

    /// 生成池状态快照。
    pub fn statistics(&self) -> ArrayPoolStats {
        let buckets: Vec<BucketStats> = self
            .free_buckets
            .iter()
            .map(|(&length, bucket)| BucketStats {
                length,
                free: bucket.free_count(),
                rented: bucket.allocated() - bucket.free_count(),
                allocated: bucket.allocated(),
            })
            .collect();
        let free: usize = buckets.iter().map(|bucket| bucket.free).sum();

        ArrayPoolStats {
            max_supported_length: self.config.max_supported_length,
            buckets,
            total_allocated: self.slots.len(),
            on_demand_allocations: self.counters.on_demand_allocations,
            rented: self.counters.rented,
            free,
            rents: self.counters.rents,
            returns: self.counters.returns,
            ignored_returns: self.counters.ignored_returns,
        }
    }

    /// 供 [`ScopedArray`] 访问已知处于租出状态的槽位。
    pub(crate) fn rented_slice(&self, handle: ArrayHandle) -> &[T] {
        &self.slots[handle.slot].array
    }

    pub(crate) fn rented_slice_mut(&mut self, handle: ArrayHandle) -> &mut [T] {
        &mut self.slots[handle.slot].array
    }

    fn slot(&self, handle: ArrayHandle) -> Option<&Slot<T>> {
        if handle.pool != self.id {
            return None;
        }
        self.slots
            .get(handle.slot)
            .filter(|slot| slot.generation == handle.generation)
    }

    fn slot_mut(&mut self, handle: ArrayHandle) -> Option<&mut Slot<T>> {
        if handle.pool != self.id {
            return None;
        }
        self.slots
            .get_mut(handle.slot)
            .filter(|slot| slot.generation == handle.generation)
    }
}

impl<T: Default> ArrayPool<T> {
    /// 租借长度不小于 `min_length` 的数组。
    ///
    /// # 实现策略（How）
    /// 1. 校验 `1 <= min_length <= max_supported_length`；
    /// 2. 计算桶长度：不小于请求长度的最小二次幂（至少为 2）；
    /// 3. 定位或惰性创建该长度的空闲桶，新桶预填充 `initial_bucket_population` 个数组；
    /// 4. 桶内有空闲数组时任取其一，否则按需新建一个同长度数组；
    /// 5. 标记为租出并返回句柄。
    ///
    /// # 契约说明（What）
    /// - **失败**：`min_length` 为 0 或超过上限时返回 `InvalidArgument`，池状态不变；
    ///   二次幂查找在上限内失败时返回 `InvariantViolation`；
    /// - **选择顺序**：同桶中选中哪一个空闲数组不作承诺。
    pub fn rent(&mut self, min_length: usize) -> Result<ArrayHandle> {
        let max_supported_length = self.config.max_supported_length;
        if min_length == 0 {
            return Err(ArrayPoolError::invalid_argument(
                "min_length",
                "must be greater than zero",
            ));
        }
        if min_length > max_supported_length {
            return Err(ArrayPoolError::invalid_argument(
                "min_length",
                format!("{min_length} exceeds max_supported_length {max_supported_length}"),
            ));
        }

        let length = bucket_length(min_length, max_supported_length)?;
        let reused = self.free_bucket(length).take_free();
        let slot = match reused {
            Some(slot) => slot,
            None => self.allocate_on_demand(length),
        };

        let generation = {
            let entry = &mut self.slots[slot];
            entry.rented = true;
            entry.generation
        };
        self.counters.rented += 1;
        self.counters.rents += 1;
        trace!(slot, length, min_length, "rented array");

        Ok(ArrayHandle {
            pool: self.id,
            slot,
            generation,
            length,
        })
    }

    /// 租借数组并以作用域守卫持有，守卫析构时自动归还。
    pub fn rent_scoped(&mut self, min_length: usize) -> Result<ScopedArray<'_, T>> {
        let handle = self.rent(min_length)?;
        Ok(ScopedArray::new(self, handle))
    }

    /// 定位或惰性创建指定长度的空闲桶。
    fn free_bucket(&mut self, length: usize) -> &mut FreeBucket {
        let population = self.config.initial_bucket_population;
        let Self {
            slots,
            free_buckets,
            ..
        } = self;

        free_buckets.entry(length).or_insert_with(|| {
            let mut bucket = FreeBucket::default();
            for _ in 0..population {
                bucket.adopt_free(slots.len());
                slots.push(Slot {
                    array: allocate(length),
                    rented: false,
                    generation: 0,
                });
            }
            debug!(length, population, "created free bucket");
            bucket
        })
    }

    /// 空闲桶耗尽时新建一个数组，槽位直接记为该桶已分配、未空闲。
    fn allocate_on_demand(&mut self, length: usize) -> usize {
        let slot = self.slots.len();
        self.slots.push(Slot {
            array: allocate(length),
            rented: false,
            generation: 0,
        });
        if let Some(bucket) = self.free_buckets.get_mut(&length) {
            bucket.adopt_rented();
        }
        self.counters.on_demand_allocations += 1;
        debug!(
            slot,
            length,
            total_allocated = self.slots.len(),
            "free bucket exhausted, allocated array on demand"
        );
        slot
    }
}

fn allocate<T: Default>(length: usize) -> Box<[T]> {
    core::iter::repeat_with(T::default).take(length).collect()
}

impl<T> fmt::Debug for ArrayPool<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArrayPool")
            .field("id", &self.id)
            .field("max_supported_length", &self.config.max_supported_length)
            .field("buckets", &self.free_buckets.len())
            .field("total_allocated", &self.slots.len())
            .field("rented", &self.counters.rented)
            .finish()
    }
}
