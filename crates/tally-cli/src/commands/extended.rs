use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use serde::Serialize;

use tally_mechanics::{CheckRecord, ExtendedCheck, ExtendedStatus, LogEntry};

use super::{Context, PoolOptions, faces, outcome_label, print_json};

#[derive(Serialize)]
struct ExtendedReport<'a> {
    procedure: &'a ExtendedCheck,
    rounds: Vec<&'a CheckRecord>,
}

pub fn run(ctx: &Context, opts: &PoolOptions, target: u32, rounds: u32) -> Result<(), String> {
    let request = opts.request()?;
    let mut procedure = ExtendedCheck::new(target, rounds).map_err(|e| e.to_string())?;
    let mut session = ctx.session()?;

    while !procedure.is_terminal() {
        session
            .extended_round(&mut procedure, &request)
            .map_err(|e| e.to_string())?;
    }

    let records: Vec<&CheckRecord> = session
        .log()
        .iter()
        .filter_map(|entry| match entry {
            LogEntry::Check(record) => Some(record),
            _ => None,
        })
        .collect();

    if ctx.json {
        return print_json(&ExtendedReport {
            procedure: &procedure,
            rounds: records,
        });
    }

    println!(
        "  {} {}",
        "Extended Check".bold(),
        format!(
            "(target {target} in {rounds} rounds, DC {} per round, seed={})",
            request.base_dc, ctx.seed
        )
        .dimmed()
    );
    println!();

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Round", "Faces", "Successes", "Outcome", "Total"]);
    let mut total = 0;
    for (i, record) in records.iter().enumerate() {
        if !record.result.is_fumble {
            total += record.result.net_successes;
        }
        table.add_row(vec![
            (i + 1).to_string(),
            faces(&record.roll.kept),
            record.roll.kept.net_successes.to_string(),
            outcome_label(record.result.outcome).to_string(),
            format!("{total}/{target}"),
        ]);
    }
    println!("{table}");
    println!();

    let status = procedure.status().to_string();
    let status = match procedure.status() {
        ExtendedStatus::Succeeded => status.green().bold(),
        ExtendedStatus::CatastrophicFailure => status.red().bold(),
        _ => status.red(),
    };
    println!("  {status}  {procedure}");

    Ok(())
}
