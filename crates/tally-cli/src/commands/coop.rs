use colored::Colorize;
use comfy_table::{ContentArrangement, Table};

use tally_mechanics::{CheckRequest, CooperationMode, LogEntry};

use super::{Context, faces, outcome_label, parse_die, print_json};

pub fn run(
    ctx: &Context,
    mode: &str,
    pools: &[u32],
    primary: usize,
    die: &str,
    dc: u32,
) -> Result<(), String> {
    let mode = parse_mode(mode, primary)?;
    let die = parse_die(die)?;
    let participants: Vec<CheckRequest> = pools
        .iter()
        .map(|&size| CheckRequest::new(size, die, dc))
        .collect();

    let mut session = ctx.session()?;
    session
        .cooperate(mode, &participants, dc)
        .map_err(|e| e.to_string())?;

    let Some(
        entry @ LogEntry::Cooperative {
            participants,
            roll,
            result,
            ..
        },
    ) = session.log().last()
    else {
        return Err("cooperative check produced no record".into());
    };

    if ctx.json {
        return print_json(entry);
    }

    println!(
        "  {} {}",
        "Cooperative Check".bold(),
        format!("({mode}, DC {dc}, seed={})", ctx.seed).dimmed()
    );
    println!();

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["#", "Pool"]);
    for (i, pool) in participants.iter().enumerate() {
        let marker = match mode {
            CooperationMode::Assisted { primary } if primary == i => format!("{i} (primary)"),
            _ => i.to_string(),
        };
        table.add_row(vec![marker, pool.dice().to_string()]);
    }
    println!("{table}");
    println!();

    println!("  Faces: {}", faces(roll));
    println!(
        "  {} successes, {} botches",
        roll.net_successes, roll.botches
    );
    println!(
        "  {}  margin {:+}",
        outcome_label(result.outcome),
        result.margin
    );

    Ok(())
}

fn parse_mode(mode: &str, primary: usize) -> Result<CooperationMode, String> {
    match mode.to_lowercase().as_str() {
        "weakest" | "weakest-link" => Ok(CooperationMode::WeakestLink),
        "best" | "best-attempt" => Ok(CooperationMode::BestAttempt),
        "combined" => Ok(CooperationMode::Combined),
        "assisted" => Ok(CooperationMode::Assisted { primary }),
        other => Err(format!(
            "unknown mode '{other}' (expected weakest, best, combined or assisted)"
        )),
    }
}
