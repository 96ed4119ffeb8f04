pub mod ai;
pub mod booking_flow;
pub mod breed;
pub mod conversation;
pub mod intent;
pub mod ledger;
pub mod rate_limit;
pub mod safety;
pub mod sanitize;
pub mod scheduling;
pub mod symptoms;
