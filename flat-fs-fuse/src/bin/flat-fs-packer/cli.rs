use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
pub struct Cli {
    /// Directory whose regular files get packed in
    #[arg(long, short)]
    pub source: PathBuf,

    /// Output directory for fs.img
    #[arg(long, short = 'O')]
    pub out_dir: PathBuf,

    /// Volume size in blocks
    #[arg(long, default_value_t = 4096)]
    pub blocks: u32,

    /// Inode slots; 0 picks the default
    #[arg(long, default_value_t = 0)]
    pub inodes: u32,
}
