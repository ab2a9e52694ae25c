//! Message module: domain, store contract, and the service enforcing lifecycle rules.

pub mod domain;
pub mod repository;
pub mod repo;
pub mod service;

pub use domain::{Message, RegisterInput, UpdateInput};
pub use repository::MessageRepository;
pub use service::MessageService;
