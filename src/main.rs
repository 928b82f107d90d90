//! Coupon selection command line
//!
//! Loads a fixture set and selects, lists or explains coupons for a user's cart.

use std::{
    io::{self, Write},
    path::Path,
    process,
    time::Instant,
};

use anyhow::Result;
use humanize_duration::{Truncate, prelude::DurationExt};
use jiff::Timestamp;
use rusty_money::iso;
use tracing::info;

use coupons::{
    config::{Command, Config, EvaluationArgs, OutputFormat},
    fixtures::Fixture,
    observability::init_logging,
    receipt::{SelectionReceipt, write_coupons, write_verdicts},
    selection::{explain, find_best_coupon},
};

fn main() -> Result<()> {
    let config = Config::load().unwrap_or_else(|e| e.exit());

    if let Err(error) = init_logging(&config.logging) {
        #[expect(
            clippy::print_stderr,
            reason = "logging not initialized, must use eprintln for setup errors"
        )]
        {
            eprintln!("Logging error: {error}");
        }

        #[expect(clippy::exit, reason = "nothing to run without a subscriber")]
        process::exit(1);
    }

    let stdout = io::stdout();
    let mut handle = stdout.lock();

    match config.command {
        Command::Best { evaluation, format } => {
            let fixture = Fixture::from_set_in(&evaluation.set, &config.fixtures_dir)?;
            let request = fixture.request(&evaluation.user, &evaluation.cart)?;
            let now = evaluation.now.unwrap_or_else(Timestamp::now);

            let start = Instant::now();
            let selection = find_best_coupon(now, fixture.catalog(), fixture.ledger(), &request)?;
            let elapsed = start.elapsed();

            info!(
                user = %evaluation.user,
                cart = %evaluation.cart,
                selected = ?selection.as_ref().map(|result| &result.coupon.code),
                "best coupon evaluated"
            );

            let receipt = SelectionReceipt::new(
                request.cart.value(),
                selection.as_ref(),
                fixture.currency().unwrap_or(iso::GBP),
            );

            match format {
                OutputFormat::Json => receipt.write_json(&mut handle)?,
                OutputFormat::Table => {
                    receipt.write_to(&mut handle)?;

                    writeln!(
                        handle,
                        " {} ({}s)",
                        elapsed.human(Truncate::Nano),
                        elapsed.as_secs_f32()
                    )?;
                }
            }
        }
        Command::List { set } => {
            let fixture = Fixture::from_set_in(&set, &config.fixtures_dir)?;
            let coupons = fixture.catalog().newest_active().map(|(_, coupon)| coupon);

            write_coupons(
                &mut handle,
                coupons,
                fixture.currency().unwrap_or(iso::GBP),
            )?;
        }
        Command::Explain { evaluation } => {
            run_explain(&mut handle, &config.fixtures_dir, &evaluation)?;
        }
    }

    Ok(())
}

fn run_explain(
    out: &mut impl Write,
    fixtures_dir: &Path,
    evaluation: &EvaluationArgs,
) -> Result<()> {
    let fixture = Fixture::from_set_in(&evaluation.set, fixtures_dir)?;
    let request = fixture.request(&evaluation.user, &evaluation.cart)?;
    request.validate()?;

    let now = evaluation.now.unwrap_or_else(Timestamp::now);
    let usage = fixture.ledger().counts_for(&request.user.user_id);

    let verdicts = explain(
        now,
        fixture.catalog().active(),
        &usage,
        &request.user,
        &request.cart,
    );

    write_verdicts(out, &verdicts, fixture.currency().unwrap_or(iso::GBP))?;

    Ok(())
}
