use thiserror::Error;

/// Invalid caller input, surfaced synchronously by the timing core.
///
/// I/O failures are not represented here: the exporter assembles text without
/// touching storage, and the file writers around it carry their errors as
/// `anyhow::Error` with context at the call site.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum InvalidInput {
    #[error("lap tag {0} is outside the digit range 0-9")]
    TagOutOfRange(u8),
    #[error("cannot format a negative duration ({0}s)")]
    NegativeDuration(f64),
}
