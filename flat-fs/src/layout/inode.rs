//! 索引节点只有直接索引：`direct` 里的每个编号都指向一个数据块，
//! 文件大小因此封顶在 `DIRECT_COUNT * 块大小`。
//! 槽位值0表示尚未挂块(0号块是超级块，不可能充当数据块)。

use alloc::vec::Vec;
use core::{ptr, slice};

/// 直接索引槽数量
pub const DIRECT_COUNT: usize = 11;

/// 索引节点编号
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct InodeNo(u32);

impl From<u32> for InodeNo {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}

impl From<InodeNo> for u32 {
    fn from(no: InodeNo) -> Self {
        no.0
    }
}

impl From<InodeNo> for usize {
    fn from(no: InodeNo) -> Self {
        no.0 as usize
    }
}

impl InodeNo {
    /// 空槽标记，同时用在节点表与目录项里
    pub const EMPTY: Self = Self(u32::MAX);

    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }
}

#[derive(Debug, Clone, Copy)]
#[repr(C)]
pub struct DiskInode {
    /// 节点编号；为 `EMPTY` 即空槽
    pub id: InodeNo,
    pub kind: InodeKind,
    /// 硬链接个数
    pub links: u32,
    /// 所在设备编号，单设备卷上恒为0
    pub device: u32,
    // 不用usize是为了严控布局
    pub size: u32,
    direct: [u32; DIRECT_COUNT],
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum InodeKind {
    #[default]
    Free = 0,
    File = 1,
}

impl DiskInode {
    /// 节点记录大小恒为64字节，一个最小块恰好容纳8条
    pub const SIZE: usize = 64;

    #[inline]
    pub fn init(&mut self, id: InodeNo) {
        *self = Self {
            id,
            kind: InodeKind::File,
            links: 1,
            ..Default::default()
        };
    }

    #[inline]
    pub fn is_free(&self) -> bool {
        self.id == InodeNo::EMPTY
    }

    /// 逻辑块索引对应的设备块号
    #[inline]
    pub fn block_id(&self, index: usize) -> u32 {
        self.direct[index]
    }

    /// 把数据块挂进直接索引
    #[inline]
    pub fn set_block(&mut self, index: usize, block: u32) {
        self.direct[index] = block;
    }

    /// 解除全部直接索引，归零尺寸，返回曾占用的数据块
    pub fn clear(&mut self, block_size: usize) -> Vec<u32> {
        let count = Self::count_data_block(self.size, block_size);
        let blocks = self.direct[..count].to_vec();
        self.size = 0;
        self.direct.fill(0);
        blocks
    }

    /// 计算容纳指定数据量需要多少个数据块
    #[inline]
    pub fn count_data_block(size: u32, block_size: usize) -> usize {
        (size as usize).div_ceil(block_size)
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

impl Default for DiskInode {
    fn default() -> Self {
        Self {
            id: InodeNo::EMPTY,
            kind: InodeKind::Free,
            links: 0,
            device: 0,
            size: 0,
            direct: [0; DIRECT_COUNT],
        }
    }
}
