//! # error 模块说明
//!
//! ## 角色定位（Why）
//! - 集中定义数组池对外暴露的全部错误语义，调用方只需匹配一个枚举即可区分配置错误、参数错误与内部不变量破坏；
//! - 为每个变体提供稳定错误码，便于日志与告警按 `array_pool.*` 前缀聚合。
//!
//! ## 设计要求（What）
//! - 所有错误类型通过 `thiserror::Error` 派生，兼容 `std::error::Error`；
//! - 重复归还、归还未知数组等情形**不是**错误，不在此处建模。

use std::borrow::Cow;

use thiserror::Error;

/// 数组池操作的统一结果别名。
pub type Result<T, E = ArrayPoolError> = core::result::Result<T, E>;

/// 错误的粗粒度分类，对应配置、参数与内部不变量三类失败。
///
/// - **意图 (Why)**：上层通常只关心“是不是自己传错了”，无需逐个匹配细粒度变体；
/// - **契约 (What)**：`InvariantViolation` 出现即意味着池内部逻辑缺陷或配置边界不可满足，调用方不应重试。
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum ErrorKind {
    /// 构造参数不合法，池未被创建。
    InvalidConfiguration,
    /// 调用参数不合法，池状态未被修改。
    InvalidArgument,
    /// 二次幂查找在合法输入下失败。
    InvariantViolation,
}

/// 数组池错误域。
///
/// # 教案式说明
/// - **意图 (Why)**：把构造期与调用期的失败路径显式化，替代“抛异常”式的隐式控制流；
/// - **契约 (What)**：
///   - 所有变体均为 `Send + Sync + 'static`，可安全跨线程传播；
///   - 返回错误时池的内部簿记保持调用前状态；
/// - **设计权衡 (Trade-offs)**：`reason` 使用 `Cow<'static, str>`，常量描述零分配，动态描述按需分配。
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum ArrayPoolError {
    /// 构造池时给出的配置项不合法。
    ///
    /// - **契约 (What)**：`field` 为配置字段名，`reason` 为人类可读说明。
    #[error("invalid array pool configuration `{field}`: {reason}")]
    InvalidConfiguration {
        field: &'static str,
        reason: Cow<'static, str>,
    },

    /// 调用参数越界。
    ///
    /// - **契约 (What)**：`parameter` 为参数名，例如 `min_length`。
    #[error("invalid argument `{parameter}`: {reason}")]
    InvalidArgument {
        parameter: &'static str,
        reason: Cow<'static, str>,
    },

    /// 在 `[2, max_supported_length]` 内找不到不小于请求长度的二次幂。
    ///
    /// - **意图 (Why)**：拒绝静默降级为非二次幂长度，保持“租出的数组长度恒为二次幂”的承诺；
    /// - **风险 (Trade-offs)**：默认上限为二次幂时不可达；自定义非二次幂上限会让靠近上限的请求落入此分支。
    #[error(
        "no power-of-two bucket fits min_length {min_length} within max_supported_length {max_supported_length}"
    )]
    InvariantViolation {
        min_length: usize,
        max_supported_length: usize,
    },
}

impl ArrayPoolError {
    /// 构造配置错误。
    pub fn invalid_configuration(
        field: &'static str,
        reason: impl Into<Cow<'static, str>>,
    ) -> Self {
        ArrayPoolError::InvalidConfiguration {
            field,
            reason: reason.into(),
        }
    }

    /// 构造参数错误。
    pub fn invalid_argument(parameter: &'static str, reason: impl Into<Cow<'static, str>>) -> Self {
        ArrayPoolError::InvalidArgument {
            parameter,
            reason: reason.into(),
        }
    }

    /// 返回错误所属的粗粒度分类。
    pub fn kind(&self) -> ErrorKind {
        match self {
            ArrayPoolError::InvalidConfiguration { .. } => ErrorKind::InvalidConfiguration,
            ArrayPoolError::InvalidArgument { .. } => ErrorKind::InvalidArgument,
            ArrayPoolError::InvariantViolation { .. } => ErrorKind::InvariantViolation,
        }
    }

    /// 返回稳定错误码，供日志字段与告警规则引用。
    pub fn code(&self) -> &'static str {
        match self.kind() {
            ErrorKind::InvalidConfiguration => "array_pool.invalid_configuration",
            ErrorKind::InvalidArgument => "array_pool.invalid_argument",
            ErrorKind::InvariantViolation => "array_pool.invariant_violation",
        }
    }
}
