//! # 磁盘数据结构层
//!
//! flat-fs 的磁盘布局：
//! 超级块(含根目录) | 空闲块位图 | 索引节点区 | 数据块区

mod super_block;
pub use super_block::SuperBlock;

mod bitmap;
pub use bitmap::Bitmap;

mod inode;
pub use inode::{DiskInode, InodeKind, InodeNo, DIRECT_COUNT};

/// 目录与目录项，同属磁盘文件系统数据结构
mod dir_entry;
pub use dir_entry::{DirEntry, Directory, DIR_CAPACITY, NAME_MAX_LEN};
