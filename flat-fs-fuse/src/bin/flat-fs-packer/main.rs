mod cli;

use std::fs;
use std::fs::OpenOptions;
use std::io;
use std::sync::Arc;

use clap::Parser;
use cli::Cli;
use flat_fs::{FlatFileSystem, MIN_BLOCK_SIZE, OpenFlag};
use flat_fs_fuse::BlockFile;

fn main() -> io::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    println!("source={:?}\nout_dir={:?}", cli.source, cli.out_dir);

    let fd = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(true)
        .open(cli.out_dir.join("fs.img"))?;
    fd.set_len(cli.blocks as u64 * MIN_BLOCK_SIZE as u64)?;

    let device = Arc::new(BlockFile::new(fd, cli.blocks, MIN_BLOCK_SIZE));
    let mut volume = FlatFileSystem::mkfs(device, cli.inodes).expect("mkfs failed");

    for entry in fs::read_dir(&cli.source)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let name = entry
            .file_name()
            .into_string()
            .expect("source file name is not UTF-8");
        let data = fs::read(entry.path())?;

        println!("file: {name:?}");
        let fd = volume
            .create(&name, OpenFlag::CREATE.into())
            .expect("create failed");
        let written = volume.write(fd, &data).expect("write failed");
        if written < data.len() {
            log::warn!("{name}: truncated to {written} bytes");
        }
        volume.close(fd).expect("close failed");
    }

    volume.freefs().expect("flush failed");
    Ok(())
}
