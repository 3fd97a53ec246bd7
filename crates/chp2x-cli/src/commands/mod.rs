pub mod cashflow;
pub mod electrolyzer;
