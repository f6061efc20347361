//! Output formatters for ranking reports

use crate::config::OutputFormat;
use crate::error::{CvRankerError, Result};
use crate::output::export::write_table;
use crate::output::report::RankingReport;
use colored::{Color, Colorize};

/// Trait for formatting ranking reports
pub trait OutputFormatter {
    fn format_report(&self, report: &RankingReport) -> Result<String>;
    fn supports_format(&self) -> OutputFormat;
}

/// Console table with colored scores
pub struct ConsoleFormatter {
    use_colors: bool,
}

/// JSON formatter for scripting and integration
pub struct JsonFormatter {
    pretty: bool,
}

pub struct MarkdownFormatter;

pub struct CsvFormatter;

impl ConsoleFormatter {
    pub fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }

    fn score_color(percentage: f64) -> Color {
        match percentage {
            p if p >= 60.0 => Color::Green,
            p if p >= 40.0 => Color::Yellow,
            _ => Color::Red,
        }
    }

    fn paint(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_report(&self, report: &RankingReport) -> Result<String> {
        let mut out = String::new();

        let title = format!("📊 Ranking for: {}", report.job_title);
        out.push_str(&if self.use_colors { title.bold().to_string() } else { title });
        out.push('\n');

        if !report.detected_skills.is_empty() {
            out.push_str(&format!("🧠 Skills: {}\n", report.detected_skills.join(", ")));
        }
        out.push_str(&format!(
            "📄 {} document(s), {} unreadable, showing top {}\n\n",
            report.total_documents, report.unreadable_documents, report.metadata.top_k
        ));

        if report.results.is_empty() {
            out.push_str("No résumé to rank.\n");
            return Ok(out);
        }

        let width = report
            .results
            .iter()
            .map(|r| r.filename.chars().count())
            .max()
            .unwrap_or(0)
            .max("fichier".len());

        out.push_str(&format!("{:>3}  {:<width$}  {:>12}  {}\n", "#", "fichier", "pertinence_%", "note"));
        for (i, result) in report.results.iter().enumerate() {
            let score = format!("{:>12.2}", result.percentage);
            let note = result.note_text();
            out.push_str(&format!(
                "{:>3}  {:<width$}  {}  {}\n",
                i + 1,
                result.filename,
                self.paint(&score, Self::score_color(result.percentage)),
                if note.is_empty() { note } else { self.paint(&format!("⚠️  {}", note), Color::Yellow) },
            ));
        }

        Ok(out)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Console
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, report: &RankingReport) -> Result<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(report)?
        } else {
            serde_json::to_string(report)?
        };
        Ok(json)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Json
    }
}

impl OutputFormatter for MarkdownFormatter {
    fn format_report(&self, report: &RankingReport) -> Result<String> {
        let mut out = format!("# Ranking: {}\n\n", report.job_title);

        if !report.detected_skills.is_empty() {
            out.push_str("## Detected skills\n\n");
            for skill in &report.detected_skills {
                out.push_str(&format!("- {}\n", skill));
            }
            out.push('\n');
        }

        out.push_str("## Results\n\n| # | fichier | pertinence_% | note |\n|---|---|---:|---|\n");
        for (i, result) in report.results.iter().enumerate() {
            out.push_str(&format!(
                "| {} | {} | {:.2} | {} |\n",
                i + 1,
                result.filename.replace('|', "\\|"),
                result.percentage,
                result.note_text().replace('|', "\\|")
            ));
        }

        out.push_str(&format!(
            "\n_Generated {} with {}_\n",
            report.metadata.generated_at.format("%Y-%m-%d %H:%M UTC"),
            report.metadata.embedding_model
        ));
        Ok(out)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Markdown
    }
}

impl OutputFormatter for CsvFormatter {
    fn format_report(&self, report: &RankingReport) -> Result<String> {
        let mut buffer = Vec::new();
        write_table(&mut buffer, &report.results)?;
        String::from_utf8(buffer).map_err(|e| CvRankerError::OutputFormatting(e.to_string()))
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Csv
    }
}

/// Picks the formatter for the requested format
pub struct ReportGenerator {
    console_formatter: ConsoleFormatter,
    json_formatter: JsonFormatter,
    markdown_formatter: MarkdownFormatter,
    csv_formatter: CsvFormatter,
}

impl ReportGenerator {
    pub fn new(use_colors: bool) -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(use_colors),
            json_formatter: JsonFormatter::new(true),
            markdown_formatter: MarkdownFormatter,
            csv_formatter: CsvFormatter,
        }
    }

    pub fn generate(&self, report: &RankingReport, format: OutputFormat) -> Result<String> {
        let formatter: &dyn OutputFormatter = match format {
            OutputFormat::Console => &self.console_formatter,
            OutputFormat::Json => &self.json_formatter,
            OutputFormat::Markdown => &self.markdown_formatter,
            OutputFormat::Csv => &self.csv_formatter,
        };
        formatter.format_report(report)
    }
}
