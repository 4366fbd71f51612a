use std::fs::OpenOptions;
use std::sync::Arc;

use block_dev::{BlockDevice, DevError};
use flat_fs::{FlatFileSystem, FsError, MIN_BLOCK_SIZE, OpenFlag};

use crate::BlockFile;

fn image(name: &str, block_count: u32) -> Arc<BlockFile> {
    let path = std::env::temp_dir().join(name);
    let fd = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
        .unwrap();
    fd.set_len(block_count as u64 * MIN_BLOCK_SIZE as u64).unwrap();

    Arc::new(BlockFile::new(fd, block_count, MIN_BLOCK_SIZE))
}

#[test]
fn device_bounds_are_checked() {
    let disk = image("flat-fs-bounds.img", 16);

    let mut buf = [0u8; 32];
    assert_eq!(
        disk.read_block(16, 0, &mut buf).unwrap_err(),
        DevError::OutOfRange
    );
    assert_eq!(
        disk.read_block(0, 500, &mut buf).unwrap_err(),
        DevError::OutOfRange
    );

    disk.write_block(3, 100, b"hello").unwrap();
    let mut back = [0u8; 5];
    disk.read_block(3, 100, &mut back).unwrap();
    assert_eq!(&back, b"hello");
}

#[test]
fn image_survives_remount() {
    let disk = image("flat-fs-remount.img", 64);

    let mut volume = FlatFileSystem::mkfs(disk.clone(), 8).unwrap();
    let fd = volume.create("hello.txt", OpenFlag::CREATE.into()).unwrap();
    volume.write(fd, b"written through a real file").unwrap();
    volume.close(fd).unwrap();
    volume.freefs().unwrap();

    let mut volume = FlatFileSystem::mount(disk).unwrap();
    let fd = volume.open("hello.txt", OpenFlag::read_only()).unwrap();
    let mut buf = [0u8; 27];
    assert_eq!(volume.read(fd, &mut buf).unwrap(), 27);
    assert_eq!(&buf, b"written through a real file");
}

#[test]
fn truncated_write_on_small_image() {
    let disk = image("flat-fs-small.img", 8);

    // 8块的镜像：元数据占3块，数据块只有5个
    let mut volume = FlatFileSystem::mkfs(disk, 8).unwrap();
    let fd = volume.create("big", OpenFlag::CREATE.into()).unwrap();
    let data = vec![7u8; 4096];
    assert_eq!(volume.write(fd, &data).unwrap(), 5 * MIN_BLOCK_SIZE);
}

#[test]
fn rejects_foreign_image() {
    let disk = image("flat-fs-foreign.img", 64);
    assert_eq!(
        FlatFileSystem::mount(disk).unwrap_err(),
        FsError::UnsupportedDevice
    );
}
