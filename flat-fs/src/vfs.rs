//! # 文件操作层
//!
//! 描述符式的文件API，确立了文件系统的操作逻辑：
//! 目录与节点表定位文件，打开文件表承载会话，
//! 读写沿着直接索引逐块推进。

use enumflags2::BitFlags;

use crate::error::{FsError, FsResult};
use crate::ffs::FlatFileSystem;
use crate::flags::OpenFlag;
use crate::layout::{DirEntry, DiskInode, InodeKind, InodeNo, NAME_MAX_LEN};
use crate::oft::{AccessMode, Session};

/// 文件元信息
#[derive(Debug, Clone, Copy)]
pub struct FileStat {
    pub inode: InodeNo,
    pub kind: InodeKind,
    pub size: u32,
    pub links: u32,
}

impl FlatFileSystem {
    /// 建立新文件，随即以读写模式打开，返回其描述符
    pub fn create(&mut self, name: &str, mode: BitFlags<OpenFlag>) -> FsResult<usize> {
        if mode != BitFlags::from(OpenFlag::CREATE) {
            log::error!("create: mode {mode:?} is not plain CREATE");
            return Err(FsError::InvalidFlags);
        }
        if self.super_block.root_dir.is_full() {
            log::error!("create: directory is full");
            return Err(FsError::DirectoryFull);
        }
        check_name(name)?;
        if self.super_block.root_dir.find(name).is_some() {
            log::error!("create: {name} already exists");
            return Err(FsError::AlreadyExists);
        }
        let no = self.alloc_inode_slot()?;
        let Some(fd) = self.table.first_free() else {
            log::error!("create: open-file table is full");
            return Err(FsError::TableFull);
        };

        // 检查全部通过，开始动手
        let mut inode = DiskInode::default();
        inode.init(no);
        self.put_inode(no, &inode)?;

        let dirent = DirEntry::new(name, no);
        self.super_block.root_dir.push(dirent.clone());
        self.super_block.inodes_in_use += 1;
        self.flush_super_block()?;

        self.table.install(
            fd,
            Session {
                open: true,
                cursor: 0,
                mode: AccessMode::ReadWrite,
                dirent,
                inode,
            },
        );
        Ok(fd)
    }

    /// 打开既有文件，返回其描述符
    pub fn open(&mut self, name: &str, flags: BitFlags<OpenFlag>) -> FsResult<usize> {
        check_name(name)?;
        let Some(mode) = AccessMode::from_flags(flags) else {
            log::error!("open: flags {flags:?} are not a pure access mode");
            return Err(FsError::InvalidFlags);
        };

        // 同名会话至多一个：开着的拒绝，关闭的原槽重开，游标一并保留
        if let Some((fd, session)) = self.table.find_mut(name) {
            if session.open {
                log::error!("open: {name} is already open at fd={fd}");
                return Err(FsError::AlreadyOpen);
            }
            session.open = true;
            session.mode = mode;
            return Ok(fd);
        }

        let Some(entry) = self.super_block.root_dir.find(name) else {
            log::error!("open: {name} not found");
            return Err(FsError::NotFound);
        };
        let dirent = entry.clone();
        let Some(fd) = self.table.first_free() else {
            log::error!("open: open-file table is full");
            return Err(FsError::TableFull);
        };

        let inode = self.get_inode(dirent.inode_no())?;
        self.table.install(
            fd,
            Session {
                open: true,
                cursor: 0,
                mode,
                dirent,
                inode,
            },
        );
        Ok(fd)
    }

    /// 关闭会话。槽位保留，同名重开时复用
    pub fn close(&mut self, fd: usize) -> FsResult<()> {
        let Some(session) = self.table.session_mut(fd) else {
            log::error!("close: fd={fd} is invalid");
            return Err(FsError::BadDescriptor);
        };
        if !session.open {
            return Err(FsError::AlreadyClosed);
        }

        session.open = false;
        Ok(())
    }

    /// 把游标移到文件内的绝对偏移处
    pub fn seek(&mut self, fd: usize, offset: usize) -> FsResult<()> {
        let Some(session) = self.table.session_mut(fd) else {
            log::error!("seek: fd={fd} is invalid");
            return Err(FsError::BadDescriptor);
        };
        if !session.open {
            return Err(FsError::NotOpen);
        }
        if offset > session.inode.size as usize {
            log::error!("seek: offset {offset} is beyond size {}", session.inode.size);
            return Err(FsError::OutOfBounds);
        }

        session.cursor = offset;
        Ok(())
    }

    /// 从游标处读进 `buf`，返回读到的字节数；到文件尾就短读
    pub fn read(&mut self, fd: usize, buf: &mut [u8]) -> FsResult<usize> {
        let device = self.device.clone();
        let block_size = self.block_size();

        let Some(session) = self.table.session_mut(fd) else {
            log::error!("read: fd={fd} is invalid");
            return Err(FsError::BadDescriptor);
        };
        if !session.open {
            return Err(FsError::NotOpen);
        }
        if !session.mode.readable() {
            log::error!("read: fd={fd} is write-only");
            return Err(FsError::PermissionDenied);
        }

        let size = session.inode.size as usize;
        let mut count = 0;
        while count < buf.len() && session.cursor < size {
            let index = session.cursor / block_size;
            let offset = session.cursor % block_size;
            let chunk = (buf.len() - count)
                .min(block_size - offset)
                .min(size - session.cursor);

            device.read_block(
                session.inode.block_id(index),
                offset,
                &mut buf[count..count + chunk],
            )?;

            session.cursor += chunk;
            count += chunk;
        }
        Ok(count)
    }

    /// 从游标处写入 `buf`，返回写入的字节数。
    /// 空闲块耗尽或撞到直接索引的容量上限都只会截断，不是错误
    pub fn write(&mut self, fd: usize, buf: &[u8]) -> FsResult<usize> {
        let device = self.device.clone();
        let block_size = self.block_size();
        let limit = self.max_file_size();
        let block_count = self.super_block.block_count;

        let Some(session) = self.table.session_mut(fd) else {
            log::error!("write: fd={fd} is invalid");
            return Err(FsError::BadDescriptor);
        };
        if !session.open {
            return Err(FsError::NotOpen);
        }
        if !session.mode.writable() {
            log::error!("write: fd={fd} is read-only");
            return Err(FsError::PermissionDenied);
        }

        let mut count = 0;
        let mut claimed = false;
        while count < buf.len() && session.cursor < limit {
            let index = session.cursor / block_size;
            let offset = session.cursor % block_size;

            // 游标越过已挂块的范围时认领新块
            if index >= DiskInode::count_data_block(session.inode.size, block_size) {
                let Some(block) = self.bitmap.find_first_free(block_count) else {
                    log::warn!("write: no free block left, {count} bytes written");
                    break;
                };
                self.bitmap.set(block);
                session.inode.set_block(index, block);
                claimed = true;
            }

            let chunk = (buf.len() - count)
                .min(block_size - offset)
                .min(limit - session.cursor);

            device.write_block(
                session.inode.block_id(index),
                offset,
                &buf[count..count + chunk],
            )?;

            session.cursor += chunk;
            count += chunk;
            if session.cursor > session.inode.size as usize {
                session.inode.size = session.cursor as u32;
            }
        }

        // 节点随尺寸与索引的变化写回；位图只在认领过新块时落盘
        let inode = session.inode;
        self.put_inode(inode.id, &inode)?;
        if claimed {
            self.flush_bitmap()?;
        }
        Ok(count)
    }

    /// 给既有文件再挂一个名字(硬链接)
    pub fn link(&mut self, src: &str, dst: &str) -> FsResult<()> {
        if src.is_empty() {
            log::error!("link: source name is empty");
            return Err(FsError::NameEmpty);
        }
        check_name(dst)?;
        if self.super_block.root_dir.is_full() {
            log::error!("link: directory is full");
            return Err(FsError::DirectoryFull);
        }
        if self.super_block.root_dir.find(dst).is_some() {
            log::error!("link: {dst} already exists");
            return Err(FsError::AlreadyExists);
        }
        let Some(entry) = self.super_block.root_dir.find(src) else {
            log::error!("link: {src} not found");
            return Err(FsError::NotFound);
        };
        let no = entry.inode_no();

        let mut inode = self.get_inode(no)?;
        inode.links += 1;
        self.put_inode(no, &inode)?;

        self.super_block.root_dir.push(DirEntry::new(dst, no));
        self.flush_super_block()?;
        self.table.sync_links(no, inode.links);
        Ok(())
    }

    /// 摘除一个名字；最后一个名字摘除时回收节点并归还数据块
    pub fn unlink(&mut self, name: &str) -> FsResult<()> {
        if name.is_empty() {
            log::error!("unlink: name is empty");
            return Err(FsError::NameEmpty);
        }
        let Some(entry) = self.super_block.root_dir.find(name) else {
            log::error!("unlink: {name} not found");
            return Err(FsError::NotFound);
        };
        let no = entry.inode_no();
        let mut inode = self.get_inode(no)?;

        if inode.links > 1 {
            inode.links -= 1;
            self.put_inode(no, &inode)?;
            self.table.sync_links(no, inode.links);
        } else {
            // 链接数归零：归还数据块，节点槽写回空记录
            let block_size = self.block_size();
            for block in inode.clear(block_size) {
                self.bitmap.clear(block);
            }
            self.put_inode(no, &DiskInode::default())?;
            self.super_block.inodes_in_use -= 1;
            self.flush_bitmap()?;
        }

        self.super_block.root_dir.remove(name);
        self.flush_super_block()?;

        // 会话不得指向已除名的目录项
        if let Some((fd, open)) = self.table.find(name).map(|(fd, session)| (fd, session.open)) {
            self.table.remove(fd);
            if open {
                log::warn!("unlink: {name} was open at fd={fd}, session dropped");
            }
        }
        Ok(())
    }

    /// 文件元信息
    pub fn stat(&self, name: &str) -> FsResult<FileStat> {
        let Some(entry) = self.super_block.root_dir.find(name) else {
            log::error!("stat: {name} not found");
            return Err(FsError::NotFound);
        };

        let inode = self.get_inode(entry.inode_no())?;
        Ok(FileStat {
            inode: inode.id,
            kind: inode.kind,
            size: inode.size,
            links: inode.links,
        })
    }

    /// 线性扫描节点表，认领第一个空槽；
    /// 解链腾出的槽位因此会被复用
    fn alloc_inode_slot(&self) -> FsResult<InodeNo> {
        if self.super_block.inodes_in_use == self.super_block.inode_count {
            log::error!("create: inode table is full");
            return Err(FsError::NoFreeInodes);
        }

        for raw in 0..self.super_block.inode_count {
            let no = InodeNo::new(raw);
            if self.get_inode(no)?.is_free() {
                return Ok(no);
            }
        }
        Err(FsError::NoFreeInodes)
    }
}

fn check_name(name: &str) -> FsResult<()> {
    if name.is_empty() {
        log::error!("file name is empty");
        return Err(FsError::NameEmpty);
    }
    if name.as_bytes().contains(&0) {
        log::error!("file name {name:?} carries a NUL byte");
        return Err(FsError::InvalidName);
    }
    if name.len() > NAME_MAX_LEN {
        log::error!("file name {name} is over {NAME_MAX_LEN} bytes");
        return Err(FsError::NameTooLong);
    }
    Ok(())
}
