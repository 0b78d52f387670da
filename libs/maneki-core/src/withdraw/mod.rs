pub mod engine;
pub mod fee;

pub use engine::WithdrawalRequestEngine;
