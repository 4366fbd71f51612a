//! # 打开文件表层
//!
//! 会话记录一次打开的游标、访问模式和索引节点的内存副本。
//! `close` 只把会话转为关闭态，槽位及其缓存留待同名重开；
//! 真正清空槽位的是 `unlink`。

use enumflags2::BitFlags;

use crate::flags::OpenFlag;
use crate::layout::{DirEntry, DiskInode, InodeNo};
use crate::MAX_OPEN_FILES;

/// 会话的访问模式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMode {
    ReadOnly,
    WriteOnly,
    ReadWrite,
}

impl AccessMode {
    /// 只认纯粹的模式：空标志、只写或读写，其余组合一概拒绝
    pub fn from_flags(flags: BitFlags<OpenFlag>) -> Option<Self> {
        if flags.is_empty() {
            Some(Self::ReadOnly)
        } else if flags == BitFlags::from(OpenFlag::WRONLY) {
            Some(Self::WriteOnly)
        } else if flags == BitFlags::from(OpenFlag::RDWR) {
            Some(Self::ReadWrite)
        } else {
            None
        }
    }

    #[inline]
    pub fn readable(self) -> bool {
        self != Self::WriteOnly
    }

    #[inline]
    pub fn writable(self) -> bool {
        self != Self::ReadOnly
    }
}

/// 一次打开会话
#[derive(Debug)]
pub(crate) struct Session {
    pub open: bool,
    /// 文件内的读写游标(字节)
    pub cursor: usize,
    pub mode: AccessMode,
    /// 所打开目录项的副本
    pub dirent: DirEntry,
    /// 索引节点的内存副本，随读写更新，按需落盘
    pub inode: DiskInode,
}

/// 打开文件表；描述符就是槽位下标
#[derive(Debug, Default)]
pub(crate) struct FileTable {
    slots: [Option<Session>; MAX_OPEN_FILES],
}

impl FileTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// 以文件名查找会话槽
    pub fn find(&self, name: &str) -> Option<(usize, &Session)> {
        self.slots.iter().enumerate().find_map(|(fd, slot)| match slot {
            Some(session) if session.dirent.name() == name => Some((fd, session)),
            _ => None,
        })
    }

    pub fn find_mut(&mut self, name: &str) -> Option<(usize, &mut Session)> {
        self.slots
            .iter_mut()
            .enumerate()
            .find_map(|(fd, slot)| match slot {
                Some(session) if session.dirent.name() == name => Some((fd, session)),
                _ => None,
            })
    }

    pub fn first_free(&self) -> Option<usize> {
        self.slots.iter().position(Option::is_none)
    }

    pub fn install(&mut self, fd: usize, session: Session) {
        debug_assert!(self.slots[fd].is_none());
        self.slots[fd] = Some(session);
    }

    /// 描述符对应的会话；越界或空槽得到空
    pub fn session_mut(&mut self, fd: usize) -> Option<&mut Session> {
        self.slots.get_mut(fd)?.as_mut()
    }

    /// 清空槽位，交出其中的会话
    pub fn remove(&mut self, fd: usize) -> Option<Session> {
        self.slots.get_mut(fd)?.take()
    }

    pub fn sessions(&self) -> impl Iterator<Item = &Session> {
        self.slots.iter().flatten()
    }

    fn sessions_mut(&mut self) -> impl Iterator<Item = &mut Session> {
        self.slots.iter_mut().flatten()
    }

    /// 把最新的硬链接数同步进缓存着该节点的所有会话
    pub fn sync_links(&mut self, no: InodeNo, links: u32) {
        for session in self.sessions_mut() {
            if session.inode.id == no {
                session.inode.links = links;
            }
        }
    }
}
