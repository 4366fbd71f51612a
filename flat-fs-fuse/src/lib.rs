#[cfg(test)]
mod tests;

use std::fs::File;
use std::io::{Read, Seek, SeekFrom, Write};
use std::sync::Mutex;

use block_dev::{BlockDevice, DevError, DevResult};

/// 把宿主机上的镜像文件当块设备使
#[derive(Debug)]
pub struct BlockFile {
    file: Mutex<File>,
    block_count: u32,
    block_size: usize,
}

impl BlockFile {
    pub fn new(file: File, block_count: u32, block_size: usize) -> Self {
        Self {
            file: Mutex::new(file),
            block_count,
            block_size,
        }
    }

    fn locate(&self, block_no: u32, offset: usize, len: usize) -> DevResult<u64> {
        if block_no >= self.block_count || offset + len > self.block_size {
            return Err(DevError::OutOfRange);
        }
        Ok(block_no as u64 * self.block_size as u64 + offset as u64)
    }
}

impl BlockDevice for BlockFile {
    fn read_block(&self, block_no: u32, offset: usize, buf: &mut [u8]) -> DevResult<()> {
        let pos = self.locate(block_no, offset, buf.len())?;
        let mut file = self.file.lock().unwrap();
        file.seek(SeekFrom::Start(pos)).map_err(|_| DevError::Io)?;
        file.read_exact(buf).map_err(|_| DevError::Io)
    }

    fn write_block(&self, block_no: u32, offset: usize, buf: &[u8]) -> DevResult<()> {
        let pos = self.locate(block_no, offset, buf.len())?;
        let mut file = self.file.lock().unwrap();
        file.seek(SeekFrom::Start(pos)).map_err(|_| DevError::Io)?;
        file.write_all(buf).map_err(|_| DevError::Io)
    }

    fn block_count(&self) -> u32 {
        self.block_count
    }

    fn block_size(&self) -> usize {
        self.block_size
    }
}
