//! Console banners for the scan command.

use console::style;
use std::time::Duration;

use crate::scanner::RunAccumulator;

const START_RULE: usize = 104;
const SMALL_RULE: usize = 150;
const FULL_HEAD_RULE: usize = 103;
const FULL_TAIL_RULE: usize = 123;

fn rule(width: usize) -> String {
    "*".repeat(width)
}

/// `H hours, M minutes, S seconds`, whole seconds only
pub fn format_duration(duration: Duration) -> String {
    let total = duration.as_secs();
    let (hours, remainder) = (total / 3600, total % 3600);
    let (minutes, seconds) = (remainder / 60, remainder % 60);
    format!("{} hours, {} minutes, {} seconds", hours, minutes, seconds)
}

/// `H:MM:SS[.ffffff]`
pub fn clock_duration(duration: Duration) -> String {
    let total = duration.as_secs();
    let clock = format!(
        "{}:{:02}:{:02}",
        total / 3600,
        (total % 3600) / 60,
        total % 60
    );
    match duration.subsec_micros() {
        0 => clock,
        micros => format!("{}.{:06}", clock, micros),
    }
}

/// Digits grouped by thousands: `1234567` → `1,234,567`
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

pub fn start_banner(scan_type: &str) -> String {
    format!("{}\n{}\n{}", rule(START_RULE), scan_type, rule(START_RULE))
}

pub fn status_line(index: usize, path: &std::path::Path, scan_type: &str) -> String {
    format!("[{}] - scanning {} for {}", index, path.display(), scan_type)
}

/// Running totals printed after every file
pub fn small_banner(totals: &RunAccumulator) -> String {
    format!(
        "{}\n[ Scan Duration: {} ] [ Total Tokens: {}] [Total Cost (USD): {:.6} ] [ ERROR: {} ]\n{}",
        rule(SMALL_RULE),
        format_duration(totals.duration),
        group_thousands(totals.tokens),
        totals.cost,
        group_thousands(totals.errors as u64),
        rule(SMALL_RULE)
    )
}

/// Final summary printed once the scan is over
pub fn full_banner(totals: &RunAccumulator, scan_type: &str) -> String {
    format!(
        "[ Script Finished ] {}\n\
         [ {} files scanned for {} ] [ {} lines of code ] [ Total Duration: {} ]\n\
         [ Total Tokens: {} ] [ Total Cost in USD: #{:.2} ]\n\
         [ Statistics ] [ ERRORS: {} ] [ REPORTS: {} ] [ NO RESULT: {} ] [ FEEDBACK: {} ]\n\
         {}",
        rule(FULL_HEAD_RULE),
        totals.files_scanned,
        scan_type,
        group_thousands(totals.lines_of_code as u64),
        format_duration(totals.duration),
        group_thousands(totals.tokens),
        totals.cost,
        group_thousands(totals.errors as u64),
        group_thousands(totals.reports_written as u64),
        group_thousands(totals.unextracted as u64),
        group_thousands(totals.feedback_written as u64),
        rule(FULL_TAIL_RULE)
    )
}

/// One-line tally written to the log at the end of a scan
pub fn tally_line(totals: &RunAccumulator, scan_type: &str) -> String {
    format!(
        "Tally: {}, Duration: {}, LoC: {}, Tokens: {}, Cost: ${}, ERROR: {}, TARGET: {}",
        totals.files_scanned,
        clock_duration(totals.duration),
        totals.lines_of_code,
        totals.tokens,
        totals.cost,
        totals.errors,
        scan_type
    )
}

pub fn print_start(scan_type: &str) {
    println!("{}", style(start_banner(scan_type)).bold());
}

pub fn print_status(index: usize, path: &std::path::Path, scan_type: &str) {
    println!("\n{}", style(status_line(index, path, scan_type)).cyan());
}

pub fn print_small(totals: &RunAccumulator) {
    let banner = small_banner(totals);
    if totals.errors > 0 {
        println!("\n{}\n", style(banner).yellow());
    } else {
        println!("\n{}\n", banner);
    }
}

pub fn print_full(totals: &RunAccumulator, scan_type: &str) {
    println!("\n{}", style(full_banner(totals, scan_type)).bold().green());
}
