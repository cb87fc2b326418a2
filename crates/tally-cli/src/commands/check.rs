use colored::Colorize;
use comfy_table::{ContentArrangement, Table};

use tally_mechanics::LogEntry;

use super::{Context, PoolOptions, faces, outcome_label, print_json};

pub fn run(ctx: &Context, opts: &PoolOptions) -> Result<(), String> {
    let request = opts.request()?;
    let mut session = ctx.session()?;
    session.check(&request);

    let Some(LogEntry::Check(record)) = session.log().last() else {
        return Err("check produced no record".into());
    };

    if ctx.json {
        return print_json(record);
    }

    println!(
        "  {} {}",
        "Check".bold(),
        format!("({}, seed={})", record.pool, ctx.seed).dimmed()
    );
    println!();

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Trial", "Faces", "Successes", "Botches"]);
    table.add_row(vec![
        "kept".to_string(),
        faces(&record.roll.kept),
        record.roll.kept.net_successes.to_string(),
        record.roll.kept.botches.to_string(),
    ]);
    if let Some(discarded) = &record.roll.discarded {
        table.add_row(vec![
            "discarded".to_string(),
            faces(discarded),
            discarded.net_successes.to_string(),
            discarded.botches.to_string(),
        ]);
    }
    println!("{table}");
    println!();

    let result = record.result;
    println!(
        "  {}  margin {:+}{}",
        outcome_label(result.outcome),
        result.margin,
        if result.is_fumble {
            format!("  {}", "FUMBLE".red().bold())
        } else {
            String::new()
        }
    );

    Ok(())
}
