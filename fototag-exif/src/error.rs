pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Unknown byte order: {0:x?}")]
    UnknownByteOrder([u8; 2]),
    #[error("Wrong magic bytes: {0}")]
    MagicBytesWrong(u16),
    #[error("Unexpected end of data")]
    UnexpectedEof,
    #[error("Declared data size too large")]
    DataSizeTooLarge,
    #[error("Offset too large")]
    OffsetTooLarge,
    #[error("Unknown data type")]
    UnknownDataType,
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
