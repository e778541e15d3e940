use crate::{error::Result, handle::ArrayHandle, pool::ArrayPool};

/// `ArraySource` 抽象“按最小长度租借数组”的能力。
///
/// # 设计初衷（Why）
/// - 帧循环、解码器等消费方只依赖租借 / 查询 / 归还三个动作，通过 trait 解耦后可替换为带统计或带上限的包装实现；
///
/// # 契约定义（What）
/// - `rent`：返回长度为二次幂且不小于 `min_length` 的数组句柄；
/// - `in_rent`：纯查询；
/// - `return_array`：对未租出的句柄必须是空操作；
/// - `array` / `array_mut`：仅对租出中的句柄返回 `Some`。
pub trait ArraySource<T> {
    /// 可租借的最大请求长度。
    fn max_supported_length(&self) -> usize;

    /// 租借长度不小于 `min_length` 的数组。
    fn rent(&mut self, min_length: usize) -> Result<ArrayHandle>;

    /// 句柄当前是否处于租出状态。
    fn in_rent(&self, handle: ArrayHandle) -> bool;

    /// 归还数组；未租出的句柄静默忽略。
    fn return_array(&mut self, handle: ArrayHandle);

    /// 只读访问租出中的数组。
    fn array(&self, handle: ArrayHandle) -> Option<&[T]>;

    /// 可写访问租出中的数组。
    fn array_mut(&mut self, handle: ArrayHandle) -> Option<&mut [T]>;
}

impl<T: Default> ArraySource<T> for ArrayPool<T> {
    fn max_supported_length(&self) -> usize {
        ArrayPool::max_supported_length(self)
    }

    fn rent(&mut self, min_length: usize) -> Result<ArrayHandle> {
        ArrayPool::rent(self, min_length)
    }

    fn in_rent(&self, handle: ArrayHandle) -> bool {
        ArrayPool::in_rent(self, handle)
    }

    fn return_array(&mut self, handle: ArrayHandle) {
        ArrayPool::return_array(self, handle)
    }

    fn array(&self, handle: ArrayHandle) -> Option<&[T]> {
        ArrayPool::array(self, handle)
    }

    fn array_mut(&mut self, handle: ArrayHandle) -> Option<&mut [T]> {
        ArrayPool::array_mut(self, handle)
    }
}
