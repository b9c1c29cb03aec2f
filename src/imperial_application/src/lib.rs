pub mod use_cases;
pub mod workflow;

#[cfg(test)]
mod test_support;

pub use use_cases::SignInOutcome;
pub use workflow::AuthWorkflow;
