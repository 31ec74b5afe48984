use crate::{input::LedgerInput, ledger::LedgerOutput};
use csv::WriterBuilder;
use std::fmt::Write as _;
use std::io::{self, Write};

pub const OUTPUT_HEADERS: [&str; 12] = [
    "bill_no",
    "miller_name",
    "party_name",
    "amount",
    "days_diff",
    "discount_pct",
    "discount_amount",
    "expenses_total",
    "net_amount",
    "cheque_amount",
    "shortage",
    "remarks",
];

pub fn write_csv<'a, W: Write>(
    rows: impl IntoIterator<Item = (&'a LedgerInput, &'a LedgerOutput)>,
    writer: W,
) -> Result<(), io::Error> {
    let mut writer = WriterBuilder::new().from_writer(writer);
    writer.write_record(OUTPUT_HEADERS)?;

    let mut days_buf = itoa::Buffer::new();
    let mut money_bufs: [String; 6] = Default::default();

    for (input, output) in rows {
        let days: &[u8] = match output.days_diff {
            Some(days) => days_buf.format(days).as_bytes(),
            None => b"",
        };

        let [amount, discount, expenses, net, cheque, shortage] = &mut money_bufs;
        let amount = money_cell(amount, output.amount)?;
        let discount = money_cell(discount, output.discount_amount)?;
        let expenses = money_cell(expenses, output.expenses_total)?;
        let net = money_cell(net, output.net_amount)?;
        let cheque = money_cell(cheque, output.cheque_amount)?;
        let shortage = money_cell(shortage, output.shortage)?;

        writer.write_record(&[
            input.bill_no.as_bytes(),
            input.miller_name.as_bytes(),
            input.party_name.as_bytes(),
            amount,
            days,
            output.effective_discount.to_string().as_bytes(),
            discount,
            expenses,
            net,
            cheque,
            shortage,
            output.remarks.as_bytes(),
        ])?;
    }

    writer.flush()
}

// two decimals into a reused buffer; f64 has no fixed width, so it grows as needed
fn money_cell(buf: &mut String, value: f64) -> Result<&[u8], io::Error> {
    let value = if value == 0.0 { 0.0 } else { value };
    buf.clear();
    write!(buf, "{:.2}", value).map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
    Ok(buf.as_bytes())
}
