use std::time::Duration;

use anyhow::{Context, Result};
use spatialorder::io::{open_for_write, PendingWrite};
use spatialorder::{order_layer, CancelToken, LogProgress, OrderParams, OrderingResult, Outcome};

pub fn run(_cli: &crate::cli::Cli, args: &crate::cli::OrderArgs) -> Result<()> {
    // Opened up front so an unwritable ranks path fails before ordering.
    let ranks = args.ranks.as_deref()
        .map(|ranks| open_for_write(ranks, args.force))
        .transpose()?;

    let params = OrderParams {
        input: args.input.clone(),
        output: args.output.clone(),
        field_name: args.field_name.clone(),
        start_id: args.start_id,
        id_field: args.id_field.clone(),
        force: args.force,
    };

    let cancel = CancelToken::new();
    if let Some(secs) = args.time_limit {
        let limit = Duration::try_from_secs_f64(secs)
            .with_context(|| format!("invalid --time-limit {secs}"))?;
        let timer = cancel.clone();
        std::thread::spawn(move || {
            std::thread::sleep(limit);
            timer.cancel();
        });
    }

    tracing::info!(
        input = %args.input.display(),
        output = %args.output.display(),
        start_id = args.start_id,
        field = %args.field_name,
        "ordering points"
    );

    let summary = match order_layer(&params, &mut LogProgress::with_cancel(cancel))? {
        Outcome::Complete(summary) => summary,
        Outcome::Cancelled => {
            eprintln!("Cancelled; no output written.");
            return Ok(())
        }
    };

    if let Some(pending) = ranks {
        write_ranks_file(pending, &summary.ordering)?;
    }

    println!(
        "Ordered {} points ({:?} field {:?}, tour length {:.3}) -> {}",
        summary.feature_count,
        summary.field_status,
        args.field_name,
        summary.ordering.tour_length(),
        summary.output.display(),
    );
    Ok(())
}

/// Write the id → rank JSON into `pending` and move it into place.
fn write_ranks_file(pending: PendingWrite, ordering: &OrderingResult) -> Result<()> {
    let bytes = serde_json::to_vec_pretty(ordering)?;
    let staged = pending.staged_target();
    std::fs::write(&staged, bytes)
        .with_context(|| format!("write {}", staged.display()))?;
    pending.finalize()
}
