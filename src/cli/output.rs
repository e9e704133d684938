//! Output formatting and progress bars for CLI

use indicatif::{ProgressBar, ProgressStyle};

use crate::pipeline::{MatchTally, TrainingReport};

/// Create a progress bar for training
pub fn create_training_progress(total_games: u64) -> ProgressBar {
    let pb = ProgressBar::new(total_games);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} games ({msg})")
            .expect("Invalid progress bar template")
            .progress_chars("=>-"),
    );
    pb
}

/// Print a section header
pub fn print_section(title: &str) {
    println!("\n{}", "=".repeat(60));
    println!("{title}");
    println!("{}", "=".repeat(60));
}

/// Format a number with thousands separators
pub fn format_number(n: usize) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i.is_multiple_of(3) {
            result.insert(0, ',');
        }
        result.insert(0, c);
    }
    result
}

/// Print a key-value pair
pub fn print_kv(key: &str, value: &str) {
    println!("  {:20} {}", format!("{}:", key), value);
}

fn percent(rate: f64) -> String {
    format!("{:.1}%", rate * 100.0)
}

pub fn print_training_report(report: &TrainingReport) {
    print_kv("Games", &format_number(report.games_played));
    print_kv("Elapsed", &format!("{:.2}s", report.elapsed_secs));
    print_kv(
        "Wins",
        &format!("{} ({})", report.learner_wins, percent(report.win_rate())),
    );
    print_kv(
        "Draws",
        &format!("{} ({})", report.draws, percent(report.draw_rate())),
    );
    print_kv(
        "Losses",
        &format!("{} ({})", report.losses, percent(report.loss_rate())),
    );
    print_kv("Mean update", &format!("{:.6}", report.mean_update));
}

pub fn print_tally(tally: &MatchTally, player1: &str, player2: &str) {
    print_kv("Games", &format_number(tally.total()));
    print_kv(
        &format!("{player1} (X) wins"),
        &format!("{} ({})", tally.player1_wins, percent(tally.player1_win_rate())),
    );
    print_kv(
        &format!("{player2} (O) wins"),
        &format!("{} ({})", tally.player2_wins, percent(tally.player2_win_rate())),
    );
    print_kv(
        "Draws",
        &format!("{} ({})", tally.draws, percent(tally.draw_rate())),
    );
}
