mod runner;

pub use runner::run_noecho;
