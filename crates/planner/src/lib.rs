//! AI plan generation — one chat-completion round trip that turns a free-text
//! business description into an [`AdPlan`].

pub mod generator;

pub use generator::PlanGenerator;
