use block_dev::DevError;

pub type FsResult<T> = Result<T, FsError>;

/// 文件系统各层的统一错误
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsError {
    /// 制卷参数与设备容量不符
    InvalidConfig,
    /// 设备上不是本文件系统，或几何参数对不上
    UnsupportedDevice,
    /// 索引节点号超出节点表
    OutOfRange,
    /// 文件名含有内嵌 `\0`
    InvalidName,
    NameEmpty,
    NameTooLong,
    /// 打开标志组合不合法
    InvalidFlags,
    AlreadyExists,
    AlreadyOpen,
    AlreadyClosed,
    NotFound,
    /// 目录项已满
    DirectoryFull,
    /// 打开文件表已满
    TableFull,
    /// 索引节点表已满
    NoFreeInodes,
    /// 描述符不在表内
    BadDescriptor,
    /// 描述符对应的槽位并未打开
    NotOpen,
    /// 访问模式不允许此操作
    PermissionDenied,
    /// 游标落点在文件之外
    OutOfBounds,
    /// 卸载时元数据未能全部落盘
    ReleaseFailed,
    /// 设备层错误
    Io(DevError),
}

impl From<DevError> for FsError {
    fn from(e: DevError) -> Self {
        Self::Io(e)
    }
}
