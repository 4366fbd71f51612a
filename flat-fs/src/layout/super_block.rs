use core::{ptr, slice};

use super::Directory;
use crate::MAGIC;

/// 超级块：
/// - 提供文件系统合法性校验；
/// - 记录卷的几何参数与用量；
/// - 内嵌根目录
#[derive(Debug, Default)]
#[repr(C)]
pub struct SuperBlock {
    /// 魔数：用于校验文件系统合法性
    magic: u32,
    /// 卷总块数
    pub block_count: u32,
    /// 单块字节数
    pub block_size: u32,
    /// 索引节点槽总数
    pub inode_count: u32,
    /// 已占用的索引节点数
    pub inodes_in_use: u32,
    /// 位图字节数
    pub bitmap_bytes: u32,
    pub root_dir: Directory,
}

impl SuperBlock {
    pub const SIZE: usize = 24 + Directory::SIZE;

    pub fn new(block_count: u32, block_size: u32, inode_count: u32, bitmap_bytes: u32) -> Self {
        Self {
            magic: MAGIC,
            block_count,
            block_size,
            inode_count,
            bitmap_bytes,
            ..Default::default()
        }
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.magic == MAGIC
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        unsafe { slice::from_raw_parts(ptr::from_ref(self).cast(), Self::SIZE) }
    }

    #[inline]
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        unsafe { slice::from_raw_parts_mut(ptr::from_mut(self).cast(), Self::SIZE) }
    }
}
