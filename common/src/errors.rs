use thiserror::Error;

#[derive(Debug, Error)]
#[error("unknown {what}: {value}")]
pub struct UnknownVariantError {
    what: &'static str,
    value: String,
}

impl UnknownVariantError {
    pub fn new(what: &'static str, value: &str) -> Self {
        Self {
            what,
            value: value.to_string(),
        }
    }
}
