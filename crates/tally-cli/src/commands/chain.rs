use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use serde::Serialize;

use tally_mechanics::{ChainStep, ChainedCheck, ChainedStatus, CheckRecord, LogEntry, RetryPolicy};

use super::{Context, PoolOptions, faces, outcome_label, print_json};

/// Stop rolling an unlimited-retry chain after this many attempts.
const MAX_ATTEMPTS: usize = 100;

#[derive(Serialize)]
struct ChainReport<'a> {
    chain: &'a ChainedCheck,
    attempts: Vec<&'a CheckRecord>,
}

pub fn run(ctx: &Context, opts: &PoolOptions, steps: &[String]) -> Result<(), String> {
    let request = opts.request()?;
    let steps = steps
        .iter()
        .map(|s| parse_step(s.as_str()))
        .collect::<Result<Vec<_>, _>>()?;
    let mut chain = ChainedCheck::new(steps).map_err(|e| e.to_string())?;
    let mut session = ctx.session()?;

    let mut labels = Vec::new();
    while !chain.status().is_terminal() && labels.len() < MAX_ATTEMPTS {
        let label = chain
            .current_step()
            .map(|step| step.label.clone())
            .unwrap_or_default();
        session
            .chained_step(&mut chain, &request)
            .map_err(|e| e.to_string())?;
        labels.push(label);
    }

    let attempts: Vec<&CheckRecord> = session
        .log()
        .iter()
        .filter_map(|entry| match entry {
            LogEntry::Check(record) => Some(record),
            _ => None,
        })
        .collect();

    if ctx.json {
        return print_json(&ChainReport {
            chain: &chain,
            attempts,
        });
    }

    println!(
        "  {} {}",
        "Chained Check".bold(),
        format!("({} steps, seed={})", chain.steps().len(), ctx.seed).dimmed()
    );
    println!();

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Step", "Faces", "Successes", "Outcome"]);
    for (label, record) in labels.iter().zip(&attempts) {
        table.add_row(vec![
            label.clone(),
            faces(&record.roll.kept),
            record.roll.kept.net_successes.to_string(),
            outcome_label(record.result.outcome).to_string(),
        ]);
    }
    println!("{table}");
    println!();

    let status = chain.status().to_string();
    let status = match chain.status() {
        ChainedStatus::Succeeded => status.green().bold(),
        ChainedStatus::Failed => status.red().bold(),
        _ => status.yellow(),
    };
    println!("  {status}");

    Ok(())
}

fn parse_step(s: &str) -> Result<ChainStep, String> {
    let (label, retry) = match s.rsplit_once(':') {
        None => (s, RetryPolicy::NoRetry),
        Some((label, "unlimited")) => (label, RetryPolicy::Unlimited),
        Some((label, n)) => {
            let n: u32 = n
                .parse()
                .map_err(|_| format!("invalid retry count '{n}' in step '{s}'"))?;
            let retry = if n == 0 {
                RetryPolicy::NoRetry
            } else {
                RetryPolicy::Limited(n)
            };
            (label, retry)
        }
    };
    if label.trim().is_empty() {
        return Err(format!("step '{s}' has no label"));
    }
    Ok(ChainStep::new(label.trim(), retry))
}
