//! Output formatting for solver results

use crate::executor::SolverResult;
use chrono::TimeDelta;

/// Output formatter for solver results
pub struct OutputFormatter {
    quiet: bool,
    start_time: std::time::Instant,
}

impl OutputFormatter {
    /// Create a new output formatter
    pub fn new(quiet: bool) -> Self {
        Self {
            quiet,
            start_time: std::time::Instant::now(),
        }
    }

    /// Format and print a single result
    pub fn print_result(&self, result: &SolverResult) {
        println!("{}", self.format_result(result));
    }

    /// One line per solved part; just the answer in quiet mode
    fn format_result(&self, result: &SolverResult) -> String {
        if self.quiet {
            return result.answer.clone();
        }

        let parse_timing = result
            .parse_duration
            .map(|d| format!("parse: {}, ", format_duration(d)))
            .unwrap_or_default();
        format!(
            "{}/{:02} Part {}: {} ({}solve: {})",
            result.year,
            result.day,
            result.part,
            result.answer,
            parse_timing,
            format_duration(result.solve_duration)
        )
    }

    /// Print a summary after all results
    /// Shows both total compute time and actual elapsed wall-clock time
    pub fn print_summary(&self, results: &[SolverResult]) {
        if self.quiet {
            return;
        }

        let total_parse_time: TimeDelta = results.iter().filter_map(|r| r.parse_duration).sum();
        let total_solve_time: TimeDelta = results.iter().map(|r| r.solve_duration).sum();

        println!();
        println!("--- Summary ---");
        println!("Parts solved: {}", results.len());
        println!("Total parse time: {}", format_duration(total_parse_time));
        println!("Total solve time: {}", format_duration(total_solve_time));
        println!(
            "Elapsed wall-clock time: {}",
            format_std_duration(self.start_time.elapsed())
        );
    }
}

/// Format a TimeDelta for display
fn format_duration(d: TimeDelta) -> String {
    let Some(micros) = d.num_microseconds() else {
        return "N/A".to_string();
    };

    if micros < 0 {
        return format!("-{}", format_duration(-d));
    }

    if micros < 1000 {
        format!("{}µs", micros)
    } else if micros < 1_000_000 {
        format!("{:.2}ms", micros as f64 / 1000.0)
    } else {
        format!("{:.2}s", micros as f64 / 1_000_000.0)
    }
}

/// Format a std::time::Duration for display (used for wall-clock time)
fn format_std_duration(d: std::time::Duration) -> String {
    let micros = d.as_micros();
    if micros < 1000 {
        format!("{}µs", micros)
    } else if micros < 1_000_000 {
        format!("{:.2}ms", micros as f64 / 1000.0)
    } else {
        format!("{:.2}s", d.as_secs_f64())
    }
}
