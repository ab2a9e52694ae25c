//! Service layer providing the message lifecycle on top of models.
//! - Separates business rules from data access behind `MessageRepository`.
//! - Reuses entity definitions in `models` crate for the SeaORM store.
//! - Reports absent or mismatched ids as `ServiceError::NotFound`.

pub mod errors;
pub mod pagination;
pub mod message;
#[cfg(test)]
pub mod test_support;
