#![no_std]

extern crate alloc;

#[cfg(test)]
extern crate std;

/* flat-fs 的整体架构，自上而下 */

// 文件操作层：实现文件创建、打开、读写等操作
mod vfs;
pub use vfs::FileStat;

// 卷管理器层：装载卷、分配索引节点与数据块
mod ffs;
pub use ffs::FlatFileSystem;

// 打开文件表层：记录每个打开会话的游标与访问模式
mod oft;
pub use oft::AccessMode;

// 磁盘数据结构层：表示磁盘文件系统的数据结构
mod layout;
pub use layout::{DirEntry, Directory, DiskInode, InodeKind, InodeNo, SuperBlock};
pub use layout::{DIRECT_COUNT, DIR_CAPACITY, NAME_MAX_LEN};

// 打开标志
mod flags;
pub use flags::OpenFlag;

// 错误层
mod error;
pub use error::{FsError, FsResult};

#[cfg(test)]
pub(crate) mod test_dev;

pub const MAGIC: u32 = 0x464c_4653;

/// 超级块所在块号
pub const SUPER_BLOCK_ID: u32 = 0;
/// 位图所在块号
pub const BITMAP_BLOCK_ID: u32 = 1;
/// 索引节点区起始块号
pub const INODE_AREA_START: u32 = 2;

pub const DEFAULT_INODE_COUNT: u32 = 64;
pub const MIN_BLOCK_SIZE: usize = 512;

/// 打开文件表的槽位数
pub const MAX_OPEN_FILES: usize = 16;
