pub mod intervention;
pub mod intervention_message;
pub mod user;
