pub mod check;
pub mod link;
