//! Import of a filled-in sheet exported as label/value rows.
//!
//! The first cell of a row is its label (`MILLER NAME`, `CHQ AM`, ...), the
//! value is the first non-empty cell to its right. This is the layout a
//! scanned or spreadsheet copy of the paper patti comes in.

use crate::input::{DiscountSelection, LedgerInput};
use crate::ledger::LedgerSession;
use crate::parser::ParserError;
use std::collections::HashMap;
use tracing::{debug, warn};

pub fn import_sheet<R: std::io::Read>(reader: R) -> Result<LedgerSession, ParserError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut labels: HashMap<String, String> = HashMap::new();
    for record in reader.records() {
        let record = record?;
        let mut cells = record.iter();
        let label = match cells.next().map(str::trim) {
            Some(label) if !label.is_empty() => label.to_uppercase(),
            _ => continue,
        };
        let value = cells.map(str::trim).find(|v| !v.is_empty());
        if let Some(value) = value {
            // first occurrence wins, later rows repeat labels in totals
            labels.entry(label).or_insert_with(|| value.to_string());
        }
    }

    if labels.is_empty() {
        return Err(ParserError::EmptySheet);
    }

    let get = |keys: &[&str]| -> String {
        keys.iter()
            .find_map(|k| labels.get(*k))
            .cloned()
            .unwrap_or_default()
    };

    let mut session = LedgerSession::new(LedgerInput {
        miller_name: get(&["MILLER NAME"]),
        party_name: get(&["PARTY NAME"]),
        bill_no: get(&["BILL NO"]),
        arrival_date: get(&["ARRIVAL DT"]),
        cheque_date: get(&["CHQ DT"]),
        quantity: get(&["QTY"]),
        rate: get(&["RATE"]),
        lorry_hire: get(&["LORRY HIRE", "LORRY"]),
        seller_commission: get(&["SELLER COM"]),
        quantity_difference: get(&["Q-DIFF"]),
        cheque_amount: get(&["CHQ AM"]),
        cheque_no: get(&["CHQ NO"]),
        bank: get(&["BANK"]),
        remarks: get(&["REMARKS"]),
        ..Default::default()
    });

    let discount = get(&["DISCOUNT %", "DISCOUNT"]);
    match DiscountSelection::parse(&discount) {
        Ok(selection) => session.set_discount(selection),
        // a discount row may hold the rupee amount instead of the tier
        Err(_) => warn!(%discount, "ignoring discount that is not a tier"),
    }

    debug!(labels = labels.len(), bill_no = %session.input().bill_no, "imported sheet");
    Ok(session)
}
