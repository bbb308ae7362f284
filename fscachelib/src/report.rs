use crate::simulator::RunResult;

/// ANSI terminal colours for reports
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Colour {
    Default = 0,
    Red = 31,
    Green = 32,
    Yellow = 33,
    Blue = 34,
    Magenta = 35,
    Cyan = 36,
}

impl Colour {
    /// Conventional colour for each filesystem model, so ext3 and ext4 runs are easy to tell apart
    pub fn for_filesystem(name: &str) -> Self {
        match name {
            "ext3" => Colour::Red,
            "ext4" => Colour::Green,
            _ => Colour::Default,
        }
    }
}

/// Formats the counters of one run as a block of text, optionally wrapped in an ANSI colour
pub fn format_stats(result: &RunResult, colour: Option<Colour>) -> String {
    let stats = &result.stats;
    let body = [
        format!("Statistics for {} with {} cache ({} access):", result.filesystem, result.cache, result.pattern),
        "--------------------------------".to_string(),
        format!("Cache hits: {}", stats.cache_hits),
        format!("Cache misses: {}", stats.cache_misses),
        format!("Hit ratio: {:.2}%", stats.hit_ratio() * 100.0),
        format!("Disk reads: {}", stats.disk_reads),
        format!("Disk writes: {}", stats.disk_writes),
        format!("Journal operations: {}", stats.journal_ops),
        format!("Total latency: {:.8} ms", stats.total_latency),
        format!("Mean time per access: {:.8} ms", stats.avg_access_time),
    ].join("\n");
    match colour {
        Some(c) => format!("\x1b[{}m{body}\x1b[0m\n", c as u8),
        None => format!("{body}\n"),
    }
}

/// Formats every run as one row of a comparison table
///
/// # Examples
///
/// ```
/// use fscachelib::report::format_stats_table;
/// let table = format_stats_table(&[]);
/// assert_eq!(table.lines().count(), 2);
/// ```
pub fn format_stats_table(results: &[RunResult]) -> String {
    let header = format!(
        "{:<12} {:<10} {:<6} {:>10} {:>10} {:>8} {:>10} {:>10} {:>10} {:>12}",
        "pattern", "cache", "fs", "hits", "misses", "hit %", "reads", "writes", "journal", "latency ms"
    );
    let rule = "-".repeat(header.len());
    let rows = results.iter().map(|r| {
        let s = &r.stats;
        format!(
            "{:<12} {:<10} {:<6} {:>10} {:>10} {:>8.2} {:>10} {:>10} {:>10} {:>12.3}",
            r.pattern, r.cache, r.filesystem, s.cache_hits, s.cache_misses, s.hit_ratio() * 100.0,
            s.disk_reads, s.disk_writes, s.journal_ops, s.total_latency
        )
    });
    std::iter::once(header)
        .chain(std::iter::once(rule))
        .chain(rows)
        .collect::<Vec<_>>()
        .join("\n")
}
