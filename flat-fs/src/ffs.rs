//! # 卷管理器层
//!
//! 构建出磁盘的布局并使用。
//! 一个 [`FlatFileSystem`] 值就是一卷：独占设备句柄与全部元数据，
//! 操作一律走独占借用；要跨线程共享就由调用者整体套一把锁。

use alloc::sync::Arc;
use alloc::vec;
use alloc::vec::Vec;

use block_dev::BlockDevice;

use crate::error::{FsError, FsResult};
use crate::layout::*;
use crate::oft::FileTable;
use crate::{BITMAP_BLOCK_ID, INODE_AREA_START, SUPER_BLOCK_ID};
use crate::{DEFAULT_INODE_COUNT, MIN_BLOCK_SIZE};

#[derive(Debug)]
pub struct FlatFileSystem {
    pub(crate) device: Arc<dyn BlockDevice>,
    pub(crate) super_block: SuperBlock,
    pub(crate) bitmap: Bitmap,
    pub(crate) table: FileTable,
}

impl FlatFileSystem {
    /// 在设备上制作新卷并返回它。
    /// `inode_count` 不足一个时退回默认值
    pub fn mkfs(device: Arc<dyn BlockDevice>, inode_count: u32) -> FsResult<Self> {
        let block_count = device.block_count();
        let block_size = device.block_size();
        let inode_count = if inode_count == 0 {
            DEFAULT_INODE_COUNT
        } else {
            inode_count
        };

        if block_size < MIN_BLOCK_SIZE {
            log::error!("mkfs: block size {block_size} is below {MIN_BLOCK_SIZE}");
            return Err(FsError::InvalidConfig);
        }

        // 位图必须装进1号块
        let bitmap = Bitmap::new(block_count);
        if bitmap.byte_count() > block_size {
            log::error!("mkfs: {block_count} blocks overflow the bitmap block");
            return Err(FsError::InvalidConfig);
        }

        let mut fs = Self {
            super_block: SuperBlock::new(
                block_count,
                block_size as u32,
                inode_count,
                bitmap.byte_count() as u32,
            ),
            device,
            bitmap,
            table: FileTable::new(),
        };

        // 保留块、节点表之外还得剩下至少一个数据块
        let area = fs.inode_area_blocks();
        if INODE_AREA_START + area + 1 > block_count {
            log::error!("mkfs: {block_count} blocks cannot host {inode_count} inodes");
            return Err(FsError::InvalidConfig);
        }

        fs.bitmap.set(SUPER_BLOCK_ID);
        fs.bitmap.set(BITMAP_BLOCK_ID);
        for block in INODE_AREA_START..INODE_AREA_START + area {
            fs.bitmap.set(block);
        }

        fs.wipe_inode_area()?;
        fs.flush_super_block()?;
        fs.flush_bitmap()?;

        Ok(fs)
    }

    /// 装载设备上既有的卷
    pub fn mount(device: Arc<dyn BlockDevice>) -> FsResult<Self> {
        let block_size = device.block_size();
        if block_size < MIN_BLOCK_SIZE {
            log::error!("mount: block size {block_size} is below {MIN_BLOCK_SIZE}");
            return Err(FsError::UnsupportedDevice);
        }

        let mut super_block = SuperBlock::default();
        device.read_block(SUPER_BLOCK_ID, 0, super_block.as_bytes_mut())?;

        if !super_block.is_valid() {
            log::error!("mount: magic mismatch");
            return Err(FsError::UnsupportedDevice);
        }
        if super_block.block_count != device.block_count()
            || super_block.block_size as usize != block_size
            || super_block.bitmap_bytes as usize != (device.block_count() as usize).div_ceil(8)
            || super_block.bitmap_bytes as usize > block_size
        {
            log::error!("mount: volume geometry does not match the device");
            return Err(FsError::UnsupportedDevice);
        }

        let mut bytes = vec![0; super_block.bitmap_bytes as usize];
        device.read_block(BITMAP_BLOCK_ID, 0, &mut bytes)?;
        let bitmap = Bitmap::from_bytes(bytes);

        if !bitmap.test(SUPER_BLOCK_ID) || !bitmap.test(BITMAP_BLOCK_ID) {
            log::error!("mount: reserved blocks are not marked used");
            return Err(FsError::UnsupportedDevice);
        }

        Ok(Self {
            device,
            super_block,
            bitmap,
            table: FileTable::new(),
        })
    }

    /// 卸载并消耗掉卷：元数据落盘，内存随即释放
    pub fn freefs(self) -> FsResult<()> {
        let open = self.table.sessions().filter(|session| session.open).count();
        if open > 0 {
            log::warn!("freefs: {open} sessions still open");
        }

        self.flush_super_block()
            .and(self.flush_bitmap())
            .map_err(|_| FsError::ReleaseFailed)
    }

    /// 单块字节数
    #[inline]
    pub fn block_size(&self) -> usize {
        self.super_block.block_size as usize
    }

    /// 直接索引限定的文件大小上限(字节)
    #[inline]
    pub fn max_file_size(&self) -> usize {
        DIRECT_COUNT * self.block_size()
    }

    #[inline]
    fn inodes_per_block(&self) -> usize {
        self.block_size() / DiskInode::SIZE
    }

    /// 节点表占据的块数
    #[inline]
    fn inode_area_blocks(&self) -> u32 {
        self.super_block
            .inode_count
            .div_ceil(self.inodes_per_block() as u32)
    }

    /// 按编号取出索引节点记录
    pub fn get_inode(&self, no: InodeNo) -> FsResult<DiskInode> {
        let (block, offset) = self.inode_pos(no)?;
        let mut inode = DiskInode::default();
        self.device.read_block(block, offset, inode.as_bytes_mut())?;
        Ok(inode)
    }

    /// 按编号写回索引节点记录
    pub fn put_inode(&self, no: InodeNo, inode: &DiskInode) -> FsResult<()> {
        let (block, offset) = self.inode_pos(no)?;
        self.device.write_block(block, offset, inode.as_bytes())?;
        Ok(())
    }

    /// 节点记录在磁盘上的位置：**块号**以及**块内偏移**。
    /// 节点表之外的编号是越界
    fn inode_pos(&self, no: InodeNo) -> FsResult<(u32, usize)> {
        let raw = u32::from(no);
        if raw >= self.super_block.inode_count {
            log::error!("inode {raw} is outbound");
            return Err(FsError::OutOfRange);
        }

        let per_block = self.inodes_per_block();
        Ok((
            INODE_AREA_START + raw / per_block as u32,
            raw as usize % per_block * DiskInode::SIZE,
        ))
    }

    /// 把节点区的每个槽位都写成空记录
    fn wipe_inode_area(&self) -> FsResult<()> {
        let mut block = Vec::with_capacity(self.block_size());
        for _ in 0..self.inodes_per_block() {
            block.extend_from_slice(DiskInode::default().as_bytes());
        }
        block.resize(self.block_size(), 0);

        for index in 0..self.inode_area_blocks() {
            self.device.write_block(INODE_AREA_START + index, 0, &block)?;
        }
        Ok(())
    }

    pub(crate) fn flush_super_block(&self) -> FsResult<()> {
        self.device
            .write_block(SUPER_BLOCK_ID, 0, self.super_block.as_bytes())?;
        Ok(())
    }

    pub(crate) fn flush_bitmap(&self) -> FsResult<()> {
        self.device
            .write_block(BITMAP_BLOCK_ID, 0, self.bitmap.as_bytes())?;
        Ok(())
    }
}
