pub mod memory_repository;
pub mod payment_repository;

pub use memory_repository::InMemoryPaymentRepository;
pub use payment_repository::{MySqlPaymentRepository, PaymentRepository};
