pub mod intake;
pub mod issue;
pub mod propose;
pub mod validate_pr;
