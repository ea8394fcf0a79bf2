/// Errors that can occur while bridging wire records and domain types.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// The body bytes are not a valid encoding of the expected record.
    #[error("malformed record: {0}")]
    Decode(#[from] prost::DecodeError),

    /// The update type is not one of the known node mutations.
    #[error("unknown node update type {0}")]
    UnknownUpdateKind(i32),

    /// A wire value does not fit the domain field it maps to.
    #[error("{field} value {value} is out of range")]
    OutOfRange { field: &'static str, value: i64 },
}

pub type Result<T> = std::result::Result<T, SchemaError>;
