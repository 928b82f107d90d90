//! Receipt
//!
//! Tables for selections, coupon listings and eligibility explanations.

use std::io;

use rust_decimal::Decimal;
use rusty_money::iso::Currency;
use tabled::{
    builder::Builder,
    settings::{Alignment, Color, Style, object::Columns, object::Rows},
};
use thiserror::Error;

use crate::{
    coupons::{Coupon, DiscountType},
    money::{MoneyFormatError, format_amount},
    selection::{Outcome, SelectionResult, Verdict},
};

/// Errors that can occur when writing a receipt.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// An amount could not be formatted.
    #[error(transparent)]
    Money(#[from] MoneyFormatError),

    /// JSON serialisation failed.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Writing to the output failed.
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Result of a best-coupon lookup, ready to print.
#[derive(Debug, Clone)]
pub struct SelectionReceipt<'a> {
    cart_value: Decimal,
    selection: Option<&'a SelectionResult>,
    currency: &'static Currency,
}

impl<'a> SelectionReceipt<'a> {
    /// Create a receipt for a cart value and an optional selection.
    pub fn new(
        cart_value: Decimal,
        selection: Option<&'a SelectionResult>,
        currency: &'static Currency,
    ) -> Self {
        Self {
            cart_value,
            selection,
            currency,
        }
    }

    /// Draw the selection as a table.
    ///
    /// # Errors
    ///
    /// Returns an error if an amount cannot be formatted or the output cannot be written.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), ReceiptError> {
        let Some(selection) = self.selection else {
            writeln!(
                out,
                "\nNo eligible coupon. Total: {}",
                format_amount(self.cart_value, self.currency)?
            )?;

            return Ok(());
        };

        let coupon = &selection.coupon;
        let mut builder = Builder::default();

        builder.push_record(["Coupon", coupon.code.as_str()]);
        builder.push_record(["Description", coupon.description.as_str()]);
        builder.push_record([
            "Offer".to_string(),
            describe_offer(
                coupon.discount_type,
                coupon.discount_value,
                coupon.max_discount_amount,
                self.currency,
            )?,
        ]);
        builder.push_record(["Expires".to_string(), coupon.end_date.to_string()]);
        builder.push_record([
            "Subtotal".to_string(),
            format_amount(self.cart_value, self.currency)?,
        ]);
        builder.push_record([
            "Discount".to_string(),
            format!("-{}", format_amount(selection.discount_amount, self.currency)?),
        ]);
        builder.push_record([
            "Total".to_string(),
            format_amount(selection.final_amount, self.currency)?,
        ]);

        let mut table = builder.build();
        table.with(Style::modern_rounded());
        table.modify(Columns::first(), Color::BOLD);

        writeln!(out, "\n{table}")?;

        Ok(())
    }

    /// Write the selection as JSON, `null` when nothing was selected.
    ///
    /// # Errors
    ///
    /// Returns an error if serialisation or writing fails.
    pub fn write_json(&self, mut out: impl io::Write) -> Result<(), ReceiptError> {
        serde_json::to_writer_pretty(&mut out, &self.selection)?;
        writeln!(out)?;

        Ok(())
    }
}

/// Draw a table of coupons.
///
/// # Errors
///
/// Returns an error if an amount cannot be formatted or the output cannot be written.
pub fn write_coupons<'c>(
    mut out: impl io::Write,
    coupons: impl IntoIterator<Item = &'c Coupon>,
    currency: &'static Currency,
) -> Result<(), ReceiptError> {
    let mut builder = Builder::default();

    builder.push_record(["Code", "Offer", "Starts", "Ends", "Limit"]);

    for coupon in coupons {
        builder.push_record([
            coupon.code.clone(),
            describe_offer(
                coupon.discount_type,
                coupon.discount_value,
                coupon.max_discount_amount,
                currency,
            )?,
            coupon.start_date.to_string(),
            coupon.end_date.to_string(),
            coupon
                .usage_limit_per_user
                .map_or_else(|| "-".to_string(), |limit| limit.to_string()),
        ]);
    }

    let mut table = builder.build();
    table.with(Style::modern_rounded());
    table.modify(Rows::first(), Color::BOLD);
    table.modify(Columns::new(4..5), Alignment::right());

    writeln!(out, "\n{table}")?;

    Ok(())
}

/// Draw a table of eligibility verdicts.
///
/// # Errors
///
/// Returns an error if an amount cannot be formatted or the output cannot be written.
pub fn write_verdicts(
    mut out: impl io::Write,
    verdicts: &[Verdict],
    currency: &'static Currency,
) -> Result<(), ReceiptError> {
    let mut builder = Builder::default();

    builder.push_record(["Code", "Eligible", "Discount / Failed Check"]);

    for verdict in verdicts {
        let (eligible, detail) = match verdict.outcome {
            Outcome::Eligible(discount) => ("yes", format_amount(discount, currency)?),
            Outcome::Ineligible(check) => ("no", check.to_string()),
        };

        builder.push_record([verdict.code.clone(), eligible.to_string(), detail]);
    }

    let mut table = builder.build();
    table.with(Style::modern_rounded());
    table.modify(Rows::first(), Color::BOLD);

    writeln!(out, "\n{table}")?;

    Ok(())
}

fn describe_offer(
    discount_type: DiscountType,
    value: Decimal,
    max: Option<Decimal>,
    currency: &'static Currency,
) -> Result<String, MoneyFormatError> {
    Ok(match (discount_type, max) {
        (DiscountType::Flat, _) => format!("{} off", format_amount(value, currency)?),
        (DiscountType::Percent, None) => format!("{}% off", value.normalize()),
        (DiscountType::Percent, Some(max)) => format!(
            "{}% off (max {})",
            value.normalize(),
            format_amount(max, currency)?
        ),
    })
}
