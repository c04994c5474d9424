pub mod analysis;
pub mod handlers;
pub mod outreach;
pub mod prompts;
