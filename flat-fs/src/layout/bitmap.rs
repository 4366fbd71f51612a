use alloc::vec;
use alloc::vec::Vec;

/// 空闲块位图，常驻内存，落盘时整体写进1号块。
/// 置位即已分配；位序高位在前，0号字节的最高位对应0号块
#[derive(Debug)]
pub struct Bitmap {
    bytes: Vec<u8>,
}

/// 块号对应的字节索引与位掩码
#[inline]
fn locate(block_no: u32) -> (usize, u8) {
    (block_no as usize / 8, 0x80 >> (block_no % 8))
}

impl Bitmap {
    pub fn new(block_count: u32) -> Self {
        Self {
            bytes: vec![0; (block_count as usize).div_ceil(8)],
        }
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// 位图字节数
    #[inline]
    pub fn byte_count(&self) -> usize {
        self.bytes.len()
    }

    #[inline]
    pub fn test(&self, block_no: u32) -> bool {
        let (index, mask) = locate(block_no);
        self.bytes[index] & mask != 0
    }

    #[inline]
    pub fn set(&mut self, block_no: u32) {
        let (index, mask) = locate(block_no);
        self.bytes[index] |= mask;
    }

    pub fn clear(&mut self, block_no: u32) {
        let (index, mask) = locate(block_no);

        // 编号一定得有对应的位
        assert_ne!(self.bytes[index] & mask, 0);

        self.bytes[index] &= !mask;
    }

    /// 线性扫描出第一个空闲块，编号最小者胜出。
    /// 全部占用则返回空
    pub fn find_first_free(&self, block_count: u32) -> Option<u32> {
        let (index, bits) = self
            .bytes
            .iter()
            .enumerate()
            .find_map(|(index, &bits)| (bits != u8::MAX).then_some((index, bits)))?;

        // 末字节可能带着越过卷尾的冗余位
        let block_no = (index * 8) as u32 + bits.leading_ones();
        (block_no < block_count).then_some(block_no)
    }
}
