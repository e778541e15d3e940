//! 数组池构造配置。
//!
//! # 模块定位（Why）
//! - 把“最大支持长度”与“新桶预填充数量”收敛到一个可序列化结构，便于从宿主的 TOML 配置片段直接装配池；
//! - 所有校验集中在 [`ArrayPoolConfig::validate`]，构造路径只需调用一次即可获得一致的错误语义。

use serde::{Deserialize, Serialize};

use crate::error::{ArrayPoolError, Result};

/// 默认最大支持长度：2^30。
///
/// 以 `i32` 为界的池所能形成的最大二次幂桶即为 2^30，选用该值可保证默认配置下二次幂查找永不失败。
pub const DEFAULT_MAX_SUPPORTED_LENGTH: usize = 1 << 30;

/// 新桶首次创建时预先分配的数组数量。
pub const DEFAULT_INITIAL_BUCKET_POPULATION: usize = 16;

/// 数组池配置。
///
/// # 契约说明（What）
/// - `max_supported_length`：可租借的最大请求长度，必须为正；构造后不可变；
/// - `initial_bucket_population`：桶被惰性创建时一次性预分配的数组数量，允许为 0（完全按需分配）。
///
/// # 使用方式（How）
/// ```
/// use array_pool::ArrayPoolConfig;
///
/// let config = ArrayPoolConfig::from_toml_str("max_supported_length = 4096").unwrap();
/// assert_eq!(config.max_supported_length, 4096);
/// assert_eq!(config.initial_bucket_population, 16);
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ArrayPoolConfig {
    pub max_supported_length: usize,
    pub initial_bucket_population: usize,
}

impl Default for ArrayPoolConfig {
    fn default() -> Self {
        Self {
            max_supported_length: DEFAULT_MAX_SUPPORTED_LENGTH,
            initial_bucket_population: DEFAULT_INITIAL_BUCKET_POPULATION,
        }
    }
}

impl ArrayPoolConfig {
    /// 替换最大支持长度。
    pub fn with_max_supported_length(mut self, max_supported_length: usize) -> Self {
        self.max_supported_length = max_supported_length;
        self
    }

    /// 替换新桶预填充数量。
    pub fn with_initial_bucket_population(mut self, population: usize) -> Self {
        self.initial_bucket_population = population;
        self
    }

    /// 从 TOML 片段解析配置，缺省字段取默认值。
    ///
    /// - **契约 (What)**：语法错误、未知字段与类型不符统一映射为 `InvalidConfiguration`；
    ///   解析成功后立即执行 [`validate`](Self::validate)。
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self = toml::from_str(source)
            .map_err(|err| ArrayPoolError::invalid_configuration("toml", err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// 校验配置是否可用于构造池。
    pub fn validate(&self) -> Result<()> {
        if self.max_supported_length == 0 {
            return Err(ArrayPoolError::invalid_configuration(
                "max_supported_length",
                "must be greater than zero",
            ));
        }
        Ok(())
    }
}
