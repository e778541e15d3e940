use core::{
    mem,
    ops::{Deref, DerefMut},
};

use crate::{handle::ArrayHandle, pool::ArrayPool};

/// `ScopedArray` 以独占借用持有一次租借，并在析构时把数组归还给池。
///
/// # 设计初衷（Why）
/// - 调用方常在多个退出路径上归还缓冲，作用域守卫让归还与作用域绑定，无需逐一手写 `return_array`；
/// - 守卫持有 `&mut ArrayPool`，借用期间池无法被其它路径修改，归还后再访问数组在编译期即被拒绝。
///
/// # 契约说明（What）
/// - 解引用得到长度为二次幂的切片；
/// - [`into_handle`](Self::into_handle) 放弃自动归还，改由调用方持有句柄自行归还。
pub struct ScopedArray<'a, T> {
    pool: &'a mut ArrayPool<T>,
    handle: ArrayHandle,
}

impl<'a, T> ScopedArray<'a, T> {
    pub(crate) fn new(pool: &'a mut ArrayPool<T>, handle: ArrayHandle) -> Self {
        Self { pool, handle }
    }

    /// 当前租借的句柄。
    pub fn handle(&self) -> ArrayHandle {
        self.handle
    }

    /// 解除守卫，数组保持租出状态。
    pub fn into_handle(self) -> ArrayHandle {
        let handle = self.handle;
        mem::forget(self);
        handle
    }
}

impl<T> Deref for ScopedArray<'_, T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        self.pool.rented_slice(self.handle)
    }
}

impl<T> DerefMut for ScopedArray<'_, T> {
    fn deref_mut(&mut self) -> &mut [T] {
        self.pool.rented_slice_mut(self.handle)
    }
}

impl<T> Drop for ScopedArray<'_, T> {
    fn drop(&mut self) {
        self.pool.return_array(self.handle);
    }
}
