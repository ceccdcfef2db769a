pub mod agent;
pub mod prompt;
pub mod tools;

pub use agent::{Agent, AgentOutcome};
