use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("missing required fields: {}", fields.join(", "))]
    MissingFields { fields: Vec<String> },
}
