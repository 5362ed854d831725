//! Background jobs that run against the durable task store.

pub mod scheduler;

pub use scheduler::AutocloseScheduler;
