//! Runs the built-in health checks and exits with the report's exit code
//!
//! 0 = healthy, 1 = at least one failure, 2 = warnings only.

use gesture_canvas::{build_info, health};

fn main() {
    println!("{}\n", build_info::detailed_info());

    let report = health::run_all_checks();
    health::print_report(&report);
    std::process::exit(report.exit_code());
}
