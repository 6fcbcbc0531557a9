use anyhow::Result;
use colored::*;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};

use crate::models::{Bucket, ComplianceResults, DetectionRecord};

/// Render a colored terminal report.
pub fn render(results: &ComplianceResults) -> Result<()> {
    println!(
        "\n {} v{}\n",
        "licence-compliance-checker".bold(),
        env!("CARGO_PKG_VERSION")
    );

    println!(" ┌────────────────────────────────────────────────────┐");
    println!(" │  {:<48} │", "SUMMARY".bold());
    println!(" │  {:<48} │", format!("Total projects  : {}", results.total()));
    println!(
        " │  {:<48} │",
        format!("{}  Compliant      : {:>4}", "✓".green(), results.compliant.len())
    );
    println!(
        " │  {:<48} │",
        format!("{}  Restricted     : {:>4}", "✗".red(), results.restricted.len())
    );
    println!(
        " │  {:<48} │",
        format!("{}  Unidentifiable : {:>4}", "?".yellow(), results.unidentifiable.len())
    );
    println!(
        " │  {:<48} │",
        format!("{}  Ignored        : {:>4}", "-".dimmed(), results.ignored.len())
    );
    println!(" └────────────────────────────────────────────────────┘\n");

    for (bucket, records) in results.buckets() {
        if records.is_empty() {
            continue;
        }
        let label = format!("[{}]", bucket.to_string().to_uppercase());
        let title = match bucket {
            Bucket::Restricted => label.red().bold(),
            Bucket::Unidentifiable => label.yellow().bold(),
            Bucket::Compliant => label.green().bold(),
            Bucket::Ignored => label.dimmed().bold(),
        };
        println!(" {} {} projects:\n", title, records.len());
        println!("{}", build_table(bucket, records));
        println!();
    }

    Ok(())
}

fn build_table(bucket: Bucket, records: &[DetectionRecord]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Project").add_attribute(Attribute::Bold),
            Cell::new("Licences").add_attribute(Attribute::Bold),
            Cell::new("Error").add_attribute(Attribute::Bold),
        ]);

    let colour = match bucket {
        Bucket::Compliant => Color::Green,
        Bucket::Restricted => Color::Red,
        Bucket::Unidentifiable => Color::Yellow,
        Bucket::Ignored => Color::DarkGrey,
    };

    for record in records {
        table.add_row(vec![
            Cell::new(&record.project),
            Cell::new(format_matches(record)).fg(colour),
            Cell::new(record.error.as_deref().unwrap_or("")),
        ]);
    }

    table
}

/// `MIT (0.98), BSD-3-Clause (0.60)`, most probable first.
fn format_matches(record: &DetectionRecord) -> String {
    record
        .matches
        .iter()
        .map(|m| format!("{} ({:.2})", m.licence, m.confidence))
        .collect::<Vec<_>>()
        .join(", ")
}
