#![no_std]

//! # 块设备接口层
//!
//! 块设备是以**块**为单位存储数据的设备，例如磁盘、光盘、U盘等；
//! [`BlockDevice`] 就是对读写块设备的抽象，
//! 实现了此特质的类型称为**块设备驱动**。
//!
//! 读写按「块号 + 块内偏移」寻址，一次调用就是一次完整的设备往返：
//! 要么恰好搬运 `buf.len()` 字节，要么返回错误。

use core::any::Any;
use core::fmt::Debug;

/// 设备层错误
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DevError {
    /// 访问越出设备或块的边界
    OutOfRange,
    /// 底层介质读写失败
    Io,
}

pub type DevResult<T> = core::result::Result<T, DevError>;

/// 块设备驱动特质
pub trait BlockDevice: Send + Sync + Any + Debug {
    /// 从 `block_no` 块的 `offset` 字节处读满 `buf`
    fn read_block(&self, block_no: u32, offset: usize, buf: &mut [u8]) -> DevResult<()>;

    /// 把 `buf` 全部写入 `block_no` 块的 `offset` 字节处
    fn write_block(&self, block_no: u32, offset: usize, buf: &[u8]) -> DevResult<()>;

    /// 设备总块数
    fn block_count(&self) -> u32;

    /// 单块字节数
    fn block_size(&self) -> usize;
}
