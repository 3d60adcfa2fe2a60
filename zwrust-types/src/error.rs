pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Unknown command class: 0x{0:02X}")]
    UnknownCommandClass(u8),
}
