use colored::Colorize;

use crate::evaluation::{ItemError, Report};
use crate::filtering::types::{FrequencyMap, Mode};

const UNKNOWN_ITEM: &str = "<unknown item>";

pub fn render_report(report: &Report) {
    println!("{}", format_header(report).bold());
    println!();

    println!("{}", "Most inaccurate items".red().bold());
    for (rank, item) in report.most_inaccurate.iter().enumerate() {
        println!("{}", format_item(rank + 1, item));
    }
    println!();

    println!("{}", "Most accurate items".green().bold());
    for (rank, item) in report.most_accurate.iter().enumerate() {
        println!("{}", format_item(rank + 1, item));
    }
    println!();

    println!("{} {:.4}", "RMS error:".bold(), report.rmse);
}

pub fn render_comparison(results: &[(Mode, f64)]) {
    println!("{}", "RMS error by mode".bold());
    for (mode, rmse) in results {
        println!("  {:<12} {:.4}", mode.as_str(), rmse);
    }
}

fn format_header(report: &Report) -> String {
    let p = &report.parameters;
    format!(
        "{} prediction, k={}, min overlap={}, min ratings per user={} ({} predictions)",
        p.mode.as_str(),
        p.k,
        p.min_overlap,
        p.min_ratings_per_user,
        report.predictions
    )
}

fn format_item(rank: usize, item: &ItemError) -> String {
    format!(
        "{:>2}. {} [{}] error {:.4}\n    ratings: {}",
        rank,
        item.name.as_deref().unwrap_or(UNKNOWN_ITEM),
        item.item_id,
        item.mean_absolute_error,
        format_frequencies(&item.frequencies)
    )
}

fn format_frequencies(frequencies: &FrequencyMap) -> String {
    if frequencies.is_empty() {
        return "none".to_string();
    }
    frequencies
        .iter()
        .map(|(rating, count)| format!("{}★ ×{}", rating, count))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_item_with_unknown_name() {
        let item = ItemError {
            item_id: 1682,
            name: None,
            mean_absolute_error: 2.5,
            frequencies: [(3, 1)].into_iter().collect(),
        };

        let line = format_item(1, &item);
        assert!(line.contains(UNKNOWN_ITEM));
        assert!(line.contains("[1682]"));
        assert!(line.contains("2.5000"));
    }

    #[test]
    fn test_format_frequencies() {
        let frequencies: FrequencyMap = [(1, 2), (5, 10)].into_iter().collect();
        assert_eq!(format_frequencies(&frequencies), "1★ ×2, 5★ ×10");
        assert_eq!(format_frequencies(&FrequencyMap::new()), "none");
    }
}
