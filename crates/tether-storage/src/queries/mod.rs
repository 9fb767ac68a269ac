pub mod case_ops;
pub mod link_ops;
pub mod rule_ops;
pub mod threshold_ops;
