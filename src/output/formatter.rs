//! Console, JSON, Markdown and HTML formatters

use crate::config::OutputFormat;
use crate::error::{Result, ResumatchError};
use crate::interview::InterviewSession;
use crate::llm::types::AtsReport;
use crate::output::Report;
use crate::processing::pipeline::AnalysisRecord;
use crate::processing::taxonomy::SkillCategory;
use askama::Template;
use colored::{Color, Colorize};

pub trait OutputFormatter {
    fn format_report(&self, report: Report<'_>) -> Result<String>;
    fn supports_format(&self) -> OutputFormat;
}

/// Colored terminal output
pub struct ConsoleFormatter {
    use_colors: bool,
    detailed: bool,
}

pub struct JsonFormatter {
    pretty: bool,
}

pub struct MarkdownFormatter {
    detailed: bool,
}

/// Standalone HTML page
pub struct HtmlFormatter {
    include_styles: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScoreBand {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl ScoreBand {
    fn of(score: f64) -> Self {
        match score {
            s if s >= 85.0 => ScoreBand::Excellent,
            s if s >= 70.0 => ScoreBand::Good,
            s if s >= 50.0 => ScoreBand::Fair,
            _ => ScoreBand::Poor,
        }
    }

    fn label(self) -> &'static str {
        match self {
            ScoreBand::Excellent => "EXCELLENT",
            ScoreBand::Good => "GOOD",
            ScoreBand::Fair => "FAIR",
            ScoreBand::Poor => "POOR",
        }
    }

    fn color(self) -> Color {
        match self {
            ScoreBand::Excellent => Color::Green,
            ScoreBand::Good => Color::BrightGreen,
            ScoreBand::Fair => Color::Yellow,
            ScoreBand::Poor => Color::Red,
        }
    }

    fn css_class(self) -> &'static str {
        match self {
            ScoreBand::Excellent => "score-excellent",
            ScoreBand::Good => "score-good",
            ScoreBand::Fair => "score-fair",
            ScoreBand::Poor => "score-poor",
        }
    }
}

fn format_timestamp(millis: i64) -> String {
    chrono::DateTime::<chrono::Utc>::from_timestamp_millis(millis)
        .map(|dt| dt.format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_else(|| millis.to_string())
}

fn or_placeholder(title: &str) -> &str {
    if title.trim().is_empty() {
        "Untitled role"
    } else {
        title
    }
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool, detailed: bool) -> Self {
        Self { use_colors, detailed }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn format_header(&self, title: &str, level: u8) -> String {
        let (prefix, color) = match level {
            1 => ("█", Color::Blue),
            2 => ("▓", Color::Green),
            _ => ("▒", Color::Yellow),
        };

        if self.use_colors {
            format!("\n{} {}\n", prefix.color(color).bold(), title.color(color).bold())
        } else {
            format!("\n{} {}\n", prefix, title)
        }
    }

    fn format_score(&self, score: f64) -> String {
        let band = ScoreBand::of(score);
        let badge = format!("[{}]", band.label());
        let value = format!("{:.1}%", score);
        if self.use_colors {
            format!("{} {}", value.color(band.color()).bold(), badge.color(band.color()))
        } else {
            format!("{} {}", value, badge)
        }
    }

    fn push_list(&self, out: &mut String, title: &str, items: &[String], color: Color) {
        if items.is_empty() {
            return;
        }
        out.push_str(&self.format_header(title, 3));
        for item in items {
            out.push_str(&format!("  • {}\n", self.colorize(item, color)));
        }
    }

    fn format_analysis(&self, record: &AnalysisRecord) -> String {
        let mut out = String::new();

        out.push_str(&self.format_header("📊 RESUME MATCH ANALYSIS", 1));
        out.push_str(&format!(
            "Role: {} | {}\n",
            or_placeholder(&record.job_title),
            format_timestamp(record.timestamp)
        ));

        out.push_str(&self.format_header("Match Score", 2));
        out.push_str(&format!("{}\n", self.format_score(record.score)));
        if !record.summary.is_empty() {
            out.push_str(&format!("\n{}\n", self.colorize(&record.summary, Color::Cyan)));
        }

        out.push_str(&self.format_header("Skills", 2));
        if record.matched_skills.is_empty() {
            out.push_str("  No taxonomy skills shared between résumé and job description\n");
        }
        self.push_list(&mut out, "✅ Matched", &record.matched_skills, Color::Green);
        self.push_list(&mut out, "❌ Missing", &record.missing_skills, Color::Red);
        self.push_list(&mut out, "➕ Extra", &record.extra_skills, Color::Yellow);

        if self.detailed && !record.grouped_skills.is_empty() {
            out.push_str(&self.format_header("Skills by Category", 3));
            for group in &record.grouped_skills {
                out.push_str(&format!(
                    "  {}: {}\n",
                    self.colorize(&group.category, Color::White),
                    group.skills.join(", ")
                ));
            }
        }

        if !record.suggestions.is_empty() {
            out.push_str(&self.format_header("💡 Suggestions", 2));
            for (i, suggestion) in record.suggestions.iter().enumerate() {
                out.push_str(&format!("{}. {}\n", i + 1, suggestion));
            }
        }

        out.push_str(&format!(
            "\n{}\n",
            self.colorize(&format!("id: {}", record.id), Color::BrightBlack)
        ));
        out
    }

    fn format_interview(&self, session: &InterviewSession) -> String {
        let mut out = String::new();

        out.push_str(&self.format_header("🎤 INTERVIEW PRACTICE", 1));
        out.push_str(&format!(
            "Role: {} | {} | {} question(s)\n",
            or_placeholder(&session.job_title),
            format_timestamp(session.timestamp),
            session.turns.len()
        ));
        out.push_str(&format!(
            "Overall: {}\n",
            self.format_score(f64::from(session.overall_score))
        ));

        for (i, turn) in session.turns.iter().enumerate() {
            out.push_str(&self.format_header(&format!("Q{}: {}", i + 1, turn.question), 2));
            if self.detailed {
                out.push_str(&format!(
                    "{} {}\n",
                    self.colorize("Answer:", Color::BrightBlack),
                    turn.answer
                ));
            }
            out.push_str(&format!("Score: {}\n", self.format_score(turn.feedback.score)));
            out.push_str(&format!("{}\n", turn.feedback.feedback));
            for strength in &turn.feedback.strengths {
                out.push_str(&format!("  ✓ {}\n", self.colorize(strength, Color::Green)));
            }
        }

        out.push_str(&format!(
            "\n{}\n",
            self.colorize(&format!("id: {}", session.id), Color::BrightBlack)
        ));
        out
    }

    /// Locally extracted skills, one line per taxonomy category
    pub fn format_skills_found(&self, groups: &[SkillCategory]) -> String {
        let mut out = self.format_header("🔎 Skills Found", 2);
        if groups.is_empty() {
            out.push_str("  No taxonomy skills found\n");
        }
        for group in groups {
            out.push_str(&format!(
                "  {}: {}\n",
                self.colorize(&group.category, Color::Cyan),
                group.skills.join(", ")
            ));
        }
        out
    }

    fn format_ats(&self, report: &AtsReport) -> String {
        let mut out = String::new();

        out.push_str(&self.format_header("🤖 ATS AUDIT", 1));
        out.push_str(&format!("Total: {}\n", self.format_score(report.total)));
        out.push_str(&self.format_header("Breakdown", 2));
        out.push_str(&format!("  Formatting:  {:.0}\n", report.formatting));
        out.push_str(&format!("  Keywords:    {:.0}\n", report.keywords));
        out.push_str(&format!("  Readability: {:.0}\n", report.readability));

        self.push_list(&mut out, "🔍 Findings", &report.findings, Color::White);
        self.push_list(&mut out, "🎯 Improvements", &report.improvements, Color::Yellow);
        out
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_report(&self, report: Report<'_>) -> Result<String> {
        Ok(match report {
            Report::Analysis(record) => self.format_analysis(record),
            Report::Interview(session) => self.format_interview(session),
            Report::Ats(ats) => self.format_ats(ats),
        })
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Console
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    fn to_json<T: serde::Serialize>(&self, value: &T) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(value)?)
        } else {
            Ok(serde_json::to_string(value)?)
        }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, report: Report<'_>) -> Result<String> {
        match report {
            Report::Analysis(record) => self.to_json(record),
            Report::Interview(session) => self.to_json(session),
            Report::Ats(ats) => self.to_json(ats),
        }
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Json
    }
}

impl MarkdownFormatter {
    pub fn new(detailed: bool) -> Self {
        Self { detailed }
    }

    fn push_list(out: &mut String, title: &str, items: &[String]) {
        if items.is_empty() {
            return;
        }
        out.push_str(&format!("\n### {}\n\n", title));
        for item in items {
            out.push_str(&format!("- {}\n", item));
        }
    }
}

impl OutputFormatter for MarkdownFormatter {
    fn format_report(&self, report: Report<'_>) -> Result<String> {
        let mut out = String::new();

        match report {
            Report::Analysis(record) => {
                out.push_str("# Resume Match Analysis\n\n");
                out.push_str(&format!(
                    "**Role:** {}  \n**Date:** {}  \n**Score:** {:.1}% ({})\n",
                    or_placeholder(&record.job_title),
                    format_timestamp(record.timestamp),
                    record.score,
                    ScoreBand::of(record.score).label()
                ));
                if !record.summary.is_empty() {
                    out.push_str(&format!("\n> {}\n", record.summary));
                }

                out.push_str("\n## Skills\n");
                Self::push_list(&mut out, "Matched", &record.matched_skills);
                Self::push_list(&mut out, "Missing", &record.missing_skills);
                Self::push_list(&mut out, "Extra", &record.extra_skills);

                if self.detailed && !record.grouped_skills.is_empty() {
                    out.push_str("\n### By Category\n\n| Category | Skills |\n|---|---|\n");
                    for group in &record.grouped_skills {
                        out.push_str(&format!("| {} | {} |\n", group.category, group.skills.join(", ")));
                    }
                }

                if !record.suggestions.is_empty() {
                    out.push_str("\n## Suggestions\n\n");
                    for (i, suggestion) in record.suggestions.iter().enumerate() {
                        out.push_str(&format!("{}. {}\n", i + 1, suggestion));
                    }
                }
                out.push_str(&format!("\n---\n*Record `{}`*\n", record.id));
            }
            Report::Interview(session) => {
                out.push_str("# Interview Practice\n\n");
                out.push_str(&format!(
                    "**Role:** {}  \n**Date:** {}  \n**Overall score:** {}\n",
                    or_placeholder(&session.job_title),
                    format_timestamp(session.timestamp),
                    session.overall_score
                ));
                for (i, turn) in session.turns.iter().enumerate() {
                    out.push_str(&format!("\n## Q{}. {}\n\n", i + 1, turn.question));
                    if self.detailed {
                        out.push_str(&format!("**Answer:** {}\n\n", turn.answer));
                    }
                    out.push_str(&format!(
                        "**Score:** {:.0}\n\n{}\n",
                        turn.feedback.score, turn.feedback.feedback
                    ));
                    Self::push_list(&mut out, "Strengths", &turn.feedback.strengths);
                }
                out.push_str(&format!("\n---\n*Session `{}`*\n", session.id));
            }
            Report::Ats(ats) => {
                out.push_str("# ATS Audit\n\n");
                out.push_str(&format!(
                    "| Total | Formatting | Keywords | Readability |\n|---|---|---|---|\n| {:.0} | {:.0} | {:.0} | {:.0} |\n",
                    ats.total, ats.formatting, ats.keywords, ats.readability
                ));
                Self::push_list(&mut out, "Findings", &ats.findings);
                Self::push_list(&mut out, "Improvements", &ats.improvements);
            }
        }

        Ok(out)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Markdown
    }
}

struct HtmlSection {
    heading: String,
    paragraph: String,
    items: Vec<String>,
}

impl HtmlSection {
    fn list(heading: &str, items: &[String]) -> Self {
        Self {
            heading: heading.to_string(),
            paragraph: String::new(),
            items: items.to_vec(),
        }
    }

    fn text(heading: &str, paragraph: impl Into<String>) -> Self {
        Self {
            heading: heading.to_string(),
            paragraph: paragraph.into(),
            items: Vec::new(),
        }
    }
}

#[derive(Template)]
#[template(source = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{{ title }}</title>
    {% if include_styles %}
    <style>
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            line-height: 1.6;
            color: #333;
            max-width: 860px;
            margin: 0 auto;
            padding: 20px;
            background: #f4f6fb;
        }
        .container { background: white; padding: 30px; border-radius: 12px; }
        .header { border-bottom: 3px solid #4f46e5; padding-bottom: 16px; margin-bottom: 24px; }
        .score-badge { display: inline-block; padding: 6px 14px; border-radius: 16px; font-weight: bold; color: white; }
        .score-excellent { background: #16a34a; }
        .score-good { background: #0d9488; }
        .score-fair { background: #eab308; color: #000; }
        .score-poor { background: #dc2626; }
        .section h2 { color: #4f46e5; border-bottom: 1px solid #e5e7eb; padding-bottom: 6px; }
        .meta { color: #6b7280; font-size: 0.9em; }
    </style>
    {% endif %}
</head>
<body>
    <div class="container">
        <div class="header">
            <h1>{{ title }}</h1>
            <p class="meta">{{ subtitle }}</p>
            <p><strong>{{ score }}</strong> <span class="score-badge {{ score_class }}">{{ score_label }}</span></p>
        </div>
        {% for section in sections %}
        <div class="section">
            <h2>{{ section.heading }}</h2>
            {% if !section.paragraph.is_empty() %}<p>{{ section.paragraph }}</p>{% endif %}
            {% if !section.items.is_empty() %}
            <ul>
                {% for item in section.items %}<li>{{ item }}</li>
                {% endfor %}
            </ul>
            {% endif %}
        </div>
        {% endfor %}
        <p class="meta">Generated by resumatch v{{ version }}</p>
    </div>
</body>
</html>"#, ext = "html")]
struct HtmlTemplate {
    include_styles: bool,
    title: String,
    subtitle: String,
    score: String,
    score_class: String,
    score_label: String,
    sections: Vec<HtmlSection>,
    version: String,
}

impl HtmlFormatter {
    pub fn new(include_styles: bool) -> Self {
        Self { include_styles }
    }

    fn page(&self, title: &str, subtitle: String, score: f64, sections: Vec<HtmlSection>) -> HtmlTemplate {
        let band = ScoreBand::of(score);
        HtmlTemplate {
            include_styles: self.include_styles,
            title: title.to_string(),
            subtitle,
            score: format!("{:.1}%", score),
            score_class: band.css_class().to_string(),
            score_label: band.label().to_string(),
            sections: sections
                .into_iter()
                .filter(|s| !s.paragraph.is_empty() || !s.items.is_empty())
                .collect(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    fn create_template_data(&self, report: Report<'_>) -> HtmlTemplate {
        match report {
            Report::Analysis(record) => {
                let grouped: Vec<String> = record
                    .grouped_skills
                    .iter()
                    .map(|g| format!("{}: {}", g.category, g.skills.join(", ")))
                    .collect();
                self.page(
                    "Resume Match Analysis",
                    format!(
                        "{} | {}",
                        or_placeholder(&record.job_title),
                        format_timestamp(record.timestamp)
                    ),
                    record.score,
                    vec![
                        HtmlSection::text("Summary", record.summary.clone()),
                        HtmlSection::list("Matched Skills", &record.matched_skills),
                        HtmlSection::list("Missing Skills", &record.missing_skills),
                        HtmlSection::list("Extra Skills", &record.extra_skills),
                        HtmlSection::list("Skills by Category", &grouped),
                        HtmlSection::list("Suggestions", &record.suggestions),
                    ],
                )
            }
            Report::Interview(session) => {
                let sections = session
                    .turns
                    .iter()
                    .enumerate()
                    .map(|(i, turn)| HtmlSection {
                        heading: format!("Q{}. {}", i + 1, turn.question),
                        paragraph: format!("Score {:.0}: {}", turn.feedback.score, turn.feedback.feedback),
                        items: turn.feedback.strengths.clone(),
                    })
                    .collect();
                self.page(
                    "Interview Practice",
                    format!(
                        "{} | {}",
                        or_placeholder(&session.job_title),
                        format_timestamp(session.timestamp)
                    ),
                    f64::from(session.overall_score),
                    sections,
                )
            }
            Report::Ats(ats) => self.page(
                "ATS Audit",
                format!(
                    "Formatting {:.0} | Keywords {:.0} | Readability {:.0}",
                    ats.formatting, ats.keywords, ats.readability
                ),
                ats.total,
                vec![
                    HtmlSection::list("Findings", &ats.findings),
                    HtmlSection::list("Improvements", &ats.improvements),
                ],
            ),
        }
    }
}

impl OutputFormatter for HtmlFormatter {
    fn format_report(&self, report: Report<'_>) -> Result<String> {
        self.create_template_data(report)
            .render()
            .map_err(|e| ResumatchError::OutputFormatting(e.to_string()))
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Html
    }
}
