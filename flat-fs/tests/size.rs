use std::mem;

use flat_fs::{DirEntry, Directory, DiskInode, SuperBlock, MIN_BLOCK_SIZE};

#[test]
fn volume() {
    assert_eq!(32, mem::size_of::<DirEntry>());
    assert_eq!(484, mem::size_of::<Directory>());
    assert_eq!(508, mem::size_of::<SuperBlock>());
    assert_eq!(64, mem::size_of::<DiskInode>());

    // 超级块连同内嵌目录必须装进最小块
    assert!(mem::size_of::<SuperBlock>() <= MIN_BLOCK_SIZE);
}
