use chrono::{Duration, NaiveDate};
use csv::WriterBuilder;
use patti_lib::{DiscountPct, Header};
use rand::prelude::*;
use rand::{distributions::WeightedIndex, seq::SliceRandom};
use std::io::{Cursor, Write};
use strum::IntoEnumIterator;

const MILLERS: [&str; 5] = [
    "Sri Lakshmi Mills",
    "Annapurna Rice Mill",
    "Venkateswara Agro",
    "Balaji Modern Mill",
    "Godavari Mills",
];
const PARTIES: [&str; 4] = ["Ravi Traders", "Gopal & Co", "Sai Krishna Agencies", "Kaveri Foods"];
const BANKS: [&str; 4] = ["SBI", "HDFC", "Canara", "Andhra Bank"];

#[derive(Debug)]
struct Row {
    bill_no: u32,
    miller: &'static str,
    party: &'static str,
    arrival: NaiveDate,
    cheque: Option<NaiveDate>,
    quantity: u32,
    rate: f64,
    lorry_hire: u32,
    seller_commission: u32,
    quantity_difference: i32,
    discount: Option<DiscountPct>,
    cheque_amount: Option<f64>,
    cheque_no: u32,
    bank: &'static str,
}

impl Row {
    fn random<R: Rng>(bill_no: u32, rng: &mut R, pinned: &WeightedIndex<usize>) -> Self {
        let arrival = NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid date")
            + Duration::days(rng.gen_range(0..365));
        // a few pattis are still waiting for their cheque
        let cheque = rng
            .gen_bool(0.9)
            .then(|| arrival + Duration::days(rng.gen_range(0..75)));
        let quantity = rng.gen_range(10..2_000);
        let rate = f64::from(rng.gen_range(1_800..3_200)) / 100.0;
        let discount = match pinned.sample(rng) {
            0 => None,
            _ => DiscountPct::iter().collect::<Vec<_>>().choose(rng).copied(),
        };
        let gross = f64::from(quantity) * rate;

        Row {
            bill_no,
            miller: MILLERS.choose(rng).copied().unwrap_or_default(),
            party: PARTIES.choose(rng).copied().unwrap_or_default(),
            arrival,
            cheque,
            quantity,
            rate,
            lorry_hire: rng.gen_range(0..3_000),
            seller_commission: rng.gen_range(0..800),
            quantity_difference: rng.gen_range(-200..200),
            discount,
            cheque_amount: cheque.map(|_| (gross * rng.gen_range(0.9..1.0)).round()),
            cheque_no: rng.gen_range(100_000..999_999),
            bank: BANKS.choose(rng).copied().unwrap_or_default(),
        }
    }
}

fn write_csv<W: Write>(rows: impl Iterator<Item = Row>, writer: W) -> Result<(), std::io::Error> {
    let mut writer = WriterBuilder::new().from_writer(writer);
    writer.write_record(Header::iter().map(|h| h.to_string()))?;

    let mut bill_buf = itoa::Buffer::new();
    let mut quantity_buf = itoa::Buffer::new();
    let mut lorry_buf = itoa::Buffer::new();
    let mut seller_buf = itoa::Buffer::new();
    let mut qdiff_buf = itoa::Buffer::new();
    let mut cheque_no_buf = itoa::Buffer::new();
    let mut rate_buf = [0u8; 24];
    let mut cheque_amount_buf = [0u8; 24];

    for row in rows {
        let mut rate_cursor = Cursor::new(&mut rate_buf[..]);
        let mut cheque_amount_cursor = Cursor::new(&mut cheque_amount_buf[..]);
        write!(rate_cursor, "{:.2}", row.rate)?;
        if let Some(amount) = row.cheque_amount {
            write!(cheque_amount_cursor, "{:.0}", amount)?;
        }
        let arrival = row.arrival.format("%Y-%m-%d").to_string();
        let cheque = row
            .cheque
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default();
        let discount = row.discount.map(|d| d.to_string()).unwrap_or_default();

        // same order as `Header::iter()`
        writer.write_record(&[
            row.miller.as_bytes(),
            row.party.as_bytes(),
            bill_buf.format(row.bill_no).as_bytes(),
            arrival.as_bytes(),
            cheque.as_bytes(),
            quantity_buf.format(row.quantity).as_bytes(),
            &rate_cursor.get_ref()[..(rate_cursor.position() as usize)],
            lorry_buf.format(row.lorry_hire).as_bytes(),
            seller_buf.format(row.seller_commission).as_bytes(),
            qdiff_buf.format(row.quantity_difference).as_bytes(),
            discount.as_bytes(),
            &cheque_amount_cursor.get_ref()[..(cheque_amount_cursor.position() as usize)],
            cheque_no_buf.format(row.cheque_no).as_bytes(),
            row.bank.as_bytes(),
            &b""[..],
        ])?;
    }

    writer.flush()
}

fn main() -> Result<(), std::io::Error> {
    let rows: u32 = std::env::args()
        .nth(1)
        .and_then(|n| n.parse().ok())
        .unwrap_or(100_000);

    // most pattis follow the automatic tier, a few are pinned by hand
    const WEIGHTS: [usize; 2] = [95, 5];
    let pinned = match WeightedIndex::new(WEIGHTS) {
        Ok(dist) => dist,
        Err(e) => return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e)),
    };
    let mut rng = thread_rng();

    let generator = (1..=rows).map(move |i| Row::random(i, &mut rng, &pinned));

    write_csv(generator, std::io::stdout().lock())
}
