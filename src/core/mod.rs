pub mod calendar;
pub mod erl;
pub mod evaluator;
pub mod fault_window;
pub mod intensity;
pub mod replay;
pub mod units;
