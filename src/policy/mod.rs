//! Policy trait and implementations.

pub mod epsilon_greedy;
pub mod greedy;
pub mod random;
pub mod trait_;

pub use epsilon_greedy::EpsilonGreedyPolicy;
pub use greedy::GreedyPolicy;
pub use random::RandomPolicy;
pub use trait_::Policy;
