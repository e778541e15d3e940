//! `array-pool` 提供按二次幂分桶的数组租借池。
//!
//! # 模块定位（Why）
//! - 为逐帧草稿缓冲、可变长度临时数组等短生命周期分配提供复用来源，摊薄堆分配成本；
//! - 以句柄而非引用地址跟踪数组身份，重复归还与归还陌生数组都被定义为安全的空操作。
//!
//! # 设计概要（How）
//! - `pool` 模块实现 [`ArrayPool`]：惰性创建桶、预填充、按需扩容与租借簿记；
//! - `bucket` 模块负责二次幂桶长度计算与单桶空闲集合；
//! - `scoped` 模块提供 [`ScopedArray`] 作用域守卫，析构即归还；
//! - `source` 模块定义 [`ArraySource`] trait，供调用方对池实现保持泛型；
//! - `config`、`error`、`stats` 分别承载构造配置、错误域与状态快照。
//!
//! # 线程模型（Trade-offs）
//! - 池本身不做任何同步，修改操作取 `&mut self`；跨线程共享时由调用方外部加锁，或每线程持有独立实例。
//!
//! ```
//! use array_pool::ArrayPool;
//!
//! let mut pool = ArrayPool::<f32>::new();
//! let handle = pool.rent(100)?;
//! assert_eq!(handle.length(), 128);
//! assert!(pool.in_rent(handle));
//!
//! pool.return_array(handle);
//! assert!(!pool.in_rent(handle));
//! pool.return_array(handle);
//! # Ok::<(), array_pool::ArrayPoolError>(())
//! ```

mod bucket;
mod config;
mod error;
mod handle;
mod pool;
mod scoped;
mod source;
mod stats;

pub use bucket::{MIN_BUCKET_LENGTH, bucket_length};
pub use config::{ArrayPoolConfig, DEFAULT_INITIAL_BUCKET_POPULATION, DEFAULT_MAX_SUPPORTED_LENGTH};
pub use error::{ArrayPoolError, ErrorKind, Result};
pub use handle::{ArrayHandle, PoolId};
pub use pool::ArrayPool;
pub use scoped::ScopedArray;
pub use source::ArraySource;
pub use stats::{ArrayPoolStats, BucketStats};
