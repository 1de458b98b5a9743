use anyhow::{Context as AnyhowContext, Result};
use litpack_batcher::RunSummary;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const SUMMARY_FILE: &str = "summary.txt";
pub const SUMMARY_JSON_FILE: &str = "summary.json";
pub const LOG_FILE: &str = "fetch_log.txt";

const RULE_WIDTH: usize = 60;

/// Run parameters echoed into the reports
#[derive(Debug, Clone, Serialize)]
pub struct RunContext {
    pub query: String,
    pub effective_query: String,
    pub review_only: bool,
    pub years: u32,
    pub date_from: String,
    pub date_to: String,
    pub fetched_at: String,
    pub output_dir: String,
    pub cost_model: String,
    /// Plural label for the packing unit (`tokens`, `chars`, `words`)
    pub cost_unit: String,
    pub capacity: usize,
}

#[derive(Serialize)]
struct SummaryDocument<'a> {
    context: &'a RunContext,
    summary: &'a RunSummary,
    output_files: Vec<String>,
}

fn heavy_rule() -> String {
    "=".repeat(RULE_WIDTH)
}

fn light_rule() -> String {
    "-".repeat(RULE_WIDTH)
}

fn section(out: &mut String, title: &str) {
    out.push_str(&light_rule());
    out.push('\n');
    out.push_str(title);
    out.push('\n');
    out.push_str(&light_rule());
    out.push('\n');
}

/// `1234567` -> `1,234,567`
pub fn group_thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn or_na(value: Option<usize>) -> String {
    value.map_or_else(|| "n/a".to_string(), group_thousands)
}

/// All files a completed run leaves in the output directory
pub fn output_files(summary: &RunSummary) -> Vec<String> {
    let mut files = summary.output_files();
    files.extend([SUMMARY_FILE, SUMMARY_JSON_FILE, LOG_FILE].map(str::to_string));
    files
}

pub fn render_summary(summary: &RunSummary, ctx: &RunContext) -> String {
    let metrics = &summary.metrics;
    let unit = &ctx.cost_unit;
    let mut out = String::new();

    out.push_str(&format!("{}\nPUBMED FETCH SUMMARY\n{}\n\n", heavy_rule(), heavy_rule()));
    out.push_str(&format!("Search Query: {}\n", ctx.query));
    out.push_str(&format!("Effective Query: {}\n", ctx.effective_query));
    out.push_str(&format!("Review Articles Only: {}\n", ctx.review_only));
    out.push_str(&format!(
        "Date Range: Last {} year(s) ({} - {})\n",
        ctx.years, ctx.date_from, ctx.date_to
    ));
    out.push_str(&format!("Fetch Date: {}\n", ctx.fetched_at));
    out.push_str(&format!(
        "Cost Model: {} (batch limit {} {unit})\n\n",
        ctx.cost_model,
        group_thousands(ctx.capacity)
    ));

    section(&mut out, "FETCH STATISTICS");
    out.push_str(&format!("Total articles fetched: {}\n", metrics.admitted));
    out.push_str(&format!("Articles skipped: {}\n", metrics.skipped));
    out.push_str(&format!("Total batches created: {}\n\n", summary.batch_count()));

    section(&mut out, "COST & WORD METRICS");
    out.push_str(&format!("Total words: {}\n", group_thousands(metrics.words)));
    out.push_str(&format!("Total {unit}: {}\n", group_thousands(metrics.tokens)));
    out.push_str(&format!(
        "Average words per article: {}\n",
        or_na(metrics.average_words())
    ));
    out.push_str(&format!(
        "Average {unit} per article: {}\n\n",
        or_na(metrics.average_tokens())
    ));

    section(&mut out, "BATCH DISTRIBUTION");
    for batch in &summary.batches {
        out.push_str(&format!(
            "Batch {}: {} articles, {} {unit}\n",
            batch.sequence_number,
            batch.record_count,
            group_thousands(batch.total_cost)
        ));
    }
    out.push('\n');

    section(&mut out, "OUTPUT FILES");
    out.push_str(&format!("Output directory: {}\n", ctx.output_dir));
    for file in output_files(summary) {
        out.push_str(&format!("  - {file}\n"));
    }

    out
}

pub fn render_console_summary(summary: &RunSummary, ctx: &RunContext) -> String {
    let metrics = &summary.metrics;
    let unit = &ctx.cost_unit;
    let mut out = String::new();
    out.push_str(&format!("\n{}\nFINAL SUMMARY\n{}\n", heavy_rule(), heavy_rule()));
    out.push_str(&format!("Query: {}\n", ctx.query));
    out.push_str(&format!("Review only: {}\n", ctx.review_only));
    out.push_str(&format!("Total articles: {}\n", metrics.admitted));
    out.push_str(&format!("Skipped: {}\n", metrics.skipped));
    out.push_str(&format!("Total batches: {}\n", summary.batch_count()));
    out.push_str(&format!("Total words: {}\n", group_thousands(metrics.words)));
    out.push_str(&format!("Total {unit}: {}\n", group_thousands(metrics.tokens)));
    out.push_str(&format!(
        "Avg {unit}/article: {}\n",
        or_na(metrics.average_tokens())
    ));
    out.push_str(&format!("\nOutput directory: {}\n", ctx.output_dir));
    out.push_str(&heavy_rule());
    out
}

/// Write `summary.txt` and `summary.json` into `dir`
pub fn write_summary(dir: &Path, summary: &RunSummary, ctx: &RunContext) -> Result<Vec<PathBuf>> {
    let text_path = dir.join(SUMMARY_FILE);
    fs::write(&text_path, render_summary(summary, ctx))
        .with_context(|| format!("Failed to write {}", text_path.display()))?;

    let json_path = dir.join(SUMMARY_JSON_FILE);
    let document = SummaryDocument {
        context: ctx,
        summary,
        output_files: output_files(summary),
    };
    fs::write(&json_path, serde_json::to_string_pretty(&document)?)
        .with_context(|| format!("Failed to write {}", json_path.display()))?;

    Ok(vec![text_path, json_path])
}

#[cfg(test)]
mod tests {
    use super::*;
    use litpack_batcher::{BatchStats, MetricsSnapshot};
    use pretty_assertions::assert_eq;

    fn ctx() -> RunContext {
        RunContext {
            query: "CRISPR".into(),
            effective_query: "CRISPR".into(),
            review_only: false,
            years: 5,
            date_from: "2019/06/30".into(),
            date_to: "2024/06/28".into(),
            fetched_at: "2024-06-28 10:00:00".into(),
            output_dir: "./out".into(),
            cost_model: "tiktoken".into(),
            cost_unit: "tokens".into(),
            capacity: 8000,
        }
    }

    fn summary() -> RunSummary {
        RunSummary {
            metrics: MetricsSnapshot {
                admitted: 3,
                skipped: 2,
                words: 1500,
                tokens: 12_345,
            },
            batches: vec![
                BatchStats {
                    sequence_number: 1,
                    record_count: 2,
                    total_cost: 7_900,
                },
                BatchStats {
                    sequence_number: 2,
                    record_count: 1,
                    total_cost: 4_445,
                },
            ],
        }
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1,000");
        assert_eq!(group_thousands(1_234_567), "1,234,567");
    }

    #[test]
    fn test_summary_sections() {
        let text = render_summary(&summary(), &ctx());
        assert!(text.contains("Total articles fetched: 3\n"));
        assert!(text.contains("Articles skipped: 2\n"));
        assert!(text.contains("Total batches created: 2\n"));
        assert!(text.contains("Total tokens: 12,345\n"));
        assert!(text.contains("Average tokens per article: 4,115\n"));
        assert!(text.contains("Batch 1: 2 articles, 7,900 tokens\n"));
        assert!(text.contains("Batch 2: 1 articles, 4,445 tokens\n"));
        assert!(text.contains("  - pubmed_batch_2.txt\n"));
        assert!(text.contains("  - fetch_log.txt\n"));
    }

    #[test]
    fn test_cost_lines_use_cost_unit() {
        let mut ctx = ctx();
        ctx.cost_model = "chars".into();
        ctx.cost_unit = "chars".into();
        let text = render_summary(&summary(), &ctx);
        assert!(text.contains("Total chars: 12,345\n"));
        assert!(text.contains("Average chars per article: 4,115\n"));
        assert!(text.contains("Batch 1: 2 articles, 7,900 chars\n"));
        assert!(!text.contains(" tokens"));

        let console = render_console_summary(&summary(), &ctx);
        assert!(console.contains("Avg chars/article: 4,115"));
    }

    #[test]
    fn test_empty_summary_reports_na() {
        let text = render_summary(&RunSummary::default(), &ctx());
        assert!(text.contains("Average words per article: n/a\n"));
        assert!(text.contains("Average tokens per article: n/a\n"));

        let console = render_console_summary(&RunSummary::default(), &ctx());
        assert!(console.contains("Avg tokens/article: n/a"));
    }

    #[test]
    fn test_write_summary_files() {
        let dir = tempfile::tempdir().unwrap();
        let paths = write_summary(dir.path(), &summary(), &ctx()).unwrap();
        assert_eq!(paths.len(), 2);

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&paths[1]).unwrap()).unwrap();
        assert_eq!(json["summary"]["metrics"]["tokens"], 12_345);
        assert_eq!(json["summary"]["batches"][1]["record_count"], 1);
        assert_eq!(json["context"]["query"], "CRISPR");
        assert_eq!(json["output_files"][0], "pubmed_batch_1.txt");
    }
}
