//! 测试用的内存块设备

use alloc::vec;
use alloc::vec::Vec;
use core::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use block_dev::{BlockDevice, DevError, DevResult};

/// 拿一段内存冒充的块设备
#[derive(Debug)]
pub struct MemDisk {
    blocks: Mutex<Vec<u8>>,
    block_count: u32,
    block_size: usize,
    fail_writes: AtomicBool,
}

impl MemDisk {
    pub fn new(block_count: u32, block_size: usize) -> Self {
        Self {
            blocks: Mutex::new(vec![0; block_count as usize * block_size]),
            block_count,
            block_size,
            fail_writes: AtomicBool::new(false),
        }
    }

    /// 让之后的写操作一律失败，模拟坏设备
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::Relaxed);
    }

    fn locate(&self, block_no: u32, offset: usize, len: usize) -> DevResult<usize> {
        if block_no >= self.block_count || offset + len > self.block_size {
            return Err(DevError::OutOfRange);
        }
        Ok(block_no as usize * self.block_size + offset)
    }
}

impl BlockDevice for MemDisk {
    fn read_block(&self, block_no: u32, offset: usize, buf: &mut [u8]) -> DevResult<()> {
        let start = self.locate(block_no, offset, buf.len())?;
        let blocks = self.blocks.lock().unwrap();
        buf.copy_from_slice(&blocks[start..start + buf.len()]);
        Ok(())
    }

    fn write_block(&self, block_no: u32, offset: usize, buf: &[u8]) -> DevResult<()> {
        if self.fail_writes.load(Ordering::Relaxed) {
            return Err(DevError::Io);
        }
        let start = self.locate(block_no, offset, buf.len())?;
        let mut blocks = self.blocks.lock().unwrap();
        blocks[start..start + buf.len()].copy_from_slice(buf);
        Ok(())
    }

    fn block_count(&self) -> u32 {
        self.block_count
    }

    fn block_size(&self) -> usize {
        self.block_size
    }
}
