use core::mem;

use super::InodeNo;

pub const NAME_MAX_LEN: usize = 27;

/// 根目录的项数上限；超级块连同目录必须装进一个最小块
pub const DIR_CAPACITY: usize = 15;

/// 文件名到索引节点号的映射
#[derive(Debug, Clone)]
#[repr(C)]
pub struct DirEntry {
    // 最后一字节留给 \0
    name: [u8; NAME_MAX_LEN + 1],
    inode_no: InodeNo,
}

impl DirEntry {
    /// 目录项大小恒为32字节
    pub const SIZE: usize = 32;

    #[inline]
    pub fn new(name: &str, inode_no: InodeNo) -> Self {
        let bytes = name.as_bytes();
        let mut name = [0; NAME_MAX_LEN + 1];
        name[..bytes.len()].copy_from_slice(bytes);

        Self { name, inode_no }
    }

    pub fn name(&self) -> &str {
        let len = self.name.iter().position(|&c| c == 0).unwrap();
        core::str::from_utf8(&self.name[..len]).unwrap()
    }

    #[inline]
    pub fn inode_no(&self) -> InodeNo {
        self.inode_no
    }
}

impl Default for DirEntry {
    fn default() -> Self {
        Self {
            name: [0; NAME_MAX_LEN + 1],
            inode_no: InodeNo::EMPTY,
        }
    }
}

/// 根目录，内嵌于超级块。项保持致密：
/// 活跃项填满 `entry_count` 之前的槽位，其后全部空置
#[derive(Debug, Default, Clone)]
#[repr(C)]
pub struct Directory {
    entry_count: u32,
    entries: [DirEntry; DIR_CAPACITY],
}

impl Directory {
    pub const SIZE: usize = 4 + DIR_CAPACITY * DirEntry::SIZE;

    /// 活跃项
    #[inline]
    pub fn entries(&self) -> &[DirEntry] {
        &self.entries[..self.entry_count as usize]
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.entry_count as usize == DIR_CAPACITY
    }

    pub fn find(&self, name: &str) -> Option<&DirEntry> {
        self.entries().iter().find(|entry| entry.name() == name)
    }

    /// 填进第一个空槽
    pub fn push(&mut self, entry: DirEntry) {
        let index = self.entry_count as usize;
        assert!(index < DIR_CAPACITY);
        self.entries[index] = entry;
        self.entry_count += 1;
    }

    /// 摘除名字对应的项，以尾项补位
    pub fn remove(&mut self, name: &str) -> Option<DirEntry> {
        let index = self.entries().iter().position(|entry| entry.name() == name)?;
        let last = self.entry_count as usize - 1;
        self.entries.swap(index, last);
        self.entry_count -= 1;
        Some(mem::take(&mut self.entries[last]))
    }
}
