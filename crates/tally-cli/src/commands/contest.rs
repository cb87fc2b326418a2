use colored::Colorize;
use comfy_table::{ContentArrangement, Table};

use tally_mechanics::{CheckRecord, CheckRequest, ContestedOutcome, LogEntry};

use super::{Context, PoolOptions, faces, outcome_label, print_json};

pub fn run(ctx: &Context, opts: &PoolOptions, vs_pool: u32, vs_dc: u32) -> Result<(), String> {
    let initiator = opts.request()?;
    let defender = CheckRequest::new(vs_pool, initiator.die, vs_dc);
    let mut session = ctx.session()?;
    session.contest(&initiator, &defender);

    let Some(entry @ LogEntry::Contest {
        initiator,
        defender,
        result,
    }) = session.log().last()
    else {
        return Err("contest produced no record".into());
    };

    if ctx.json {
        return print_json(entry);
    }

    println!(
        "  {} {}",
        "Contest".bold(),
        format!("(seed={})", ctx.seed).dimmed()
    );
    println!();

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Side", "Pool", "Faces", "Successes", "Outcome"]);
    table.add_row(side_row("initiator", initiator));
    table.add_row(side_row("defender", defender));
    println!("{table}");
    println!();

    let label = match result.outcome {
        ContestedOutcome::InitiatorWins | ContestedOutcome::DefenderFumble => {
            result.outcome.to_string().green()
        }
        ContestedOutcome::DefenderWins | ContestedOutcome::InitiatorFumble => {
            result.outcome.to_string().red()
        }
        ContestedOutcome::Tie => result.outcome.to_string().yellow(),
        ContestedOutcome::BothFumble => result.outcome.to_string().red().bold(),
    };
    println!("  {label}  margin {}", result.margin);

    Ok(())
}

fn side_row(side: &str, record: &CheckRecord) -> Vec<String> {
    vec![
        side.to_string(),
        record.pool.to_string(),
        faces(&record.roll.kept),
        record.roll.kept.net_successes.to_string(),
        outcome_label(record.result.outcome).to_string(),
    ]
}
