//! One-shot chat against the assistant from the command line.

use crate::ai::Agent;
use crate::core::AppConfig;

pub async fn run(message: &str) {
    let config = AppConfig::default();
    let agent = Agent::new(&config);
    let reply = agent.run(message).await;
    println!("{}", reply);
}
