/// Custom error types
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("message length of {requested_bits} bits exceeds the limit of {limit_bits} bits")]
    LengthOverflow { limit_bits: u128, requested_bits: u128 },
}

pub type Result<T> = std::result::Result<T, Error>;

/// Reject a total message length that the variant's length field cannot carry.
///
/// `None` stands for a length that did not even fit in 128 bits.
pub(crate) fn check_length(limit_bits: u128, requested_bits: Option<u128>) -> Result<u128> {
    match requested_bits {
        Some(bits) if bits <= limit_bits => Ok(bits),
        other => Err(Error::LengthOverflow {
            limit_bits,
            requested_bits: other.unwrap_or(u128::MAX),
        }),
    }
}
