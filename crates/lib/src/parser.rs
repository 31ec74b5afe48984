use crate::input::{DiscountSelection, LedgerInput};
use crate::ledger::LedgerSession;
use csv::StringRecord;
use std::collections::HashMap;
use strum_macros::{Display, EnumIter, EnumString};
use thiserror::Error;

/// Columns of a batch file, one patti per row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum Header {
    MillerName,
    PartyName,
    BillNo,
    ArrivalDate,
    ChequeDate,
    Quantity,
    Rate,
    LorryHire,
    SellerCommission,
    QuantityDifference,
    Discount,
    ChequeAmount,
    ChequeNo,
    Bank,
    Remarks,
}

#[derive(Error, Debug)]
pub enum ParserError {
    #[error("Column `{0}` missing")]
    MissingHeader(Header),
    #[error("Invalid value in discount field: `{0}`")]
    InvalidDiscount(String),
    #[error("Sheet has no labelled rows")]
    EmptySheet,
    #[error(transparent)]
    CSVError(#[from] csv::Error),
}

const MISSING_QUANTITY_HEADER: ParserError = ParserError::MissingHeader(Header::Quantity);
const MISSING_RATE_HEADER: ParserError = ParserError::MissingHeader(Header::Rate);

pub fn parse_csv<R: std::io::Read>(
    reader: R,
) -> Result<impl Iterator<Item = Result<LedgerSession, ParserError>>, ParserError> {
    parse_from_reader(
        csv::ReaderBuilder::new()
            .trim(csv::Trim::Headers)
            .flexible(true)
            .from_reader(reader),
    )
}

pub fn parse_from_reader<R: std::io::Read>(
    mut reader: csv::Reader<R>,
) -> Result<impl Iterator<Item = Result<LedgerSession, ParserError>>, ParserError> {
    let header_to_index = reader
        .headers()?
        .iter()
        .enumerate()
        .filter_map(|(idx, name)| Some((name.parse::<Header>().ok()?, idx)))
        .collect::<HashMap<_, _>>();

    if !header_to_index.contains_key(&Header::Quantity) {
        return Err(MISSING_QUANTITY_HEADER);
    }
    if !header_to_index.contains_key(&Header::Rate) {
        return Err(MISSING_RATE_HEADER);
    }

    let field_map = FieldToIndexMap(header_to_index);

    Ok(reader
        .into_records()
        .map(move |res| res.map_err(ParserError::from).and_then(|rec| parse_row(&rec, &field_map))))
}

struct FieldToIndexMap(HashMap<Header, usize>);

impl FieldToIndexMap {
    /// Absent columns and short rows read as blank cells.
    fn get<'r>(&self, record: &'r StringRecord, header: Header) -> &'r str {
        self.0
            .get(&header)
            .and_then(|idx| record.get(*idx))
            .unwrap_or("")
    }
}

fn parse_row(record: &StringRecord, fields: &FieldToIndexMap) -> Result<LedgerSession, ParserError> {
    let field = |header| fields.get(record, header).to_string();

    let raw_discount = fields.get(record, Header::Discount);
    let discount_selection = DiscountSelection::parse(raw_discount)
        .map_err(|_| ParserError::InvalidDiscount(raw_discount.to_string()))?;

    let input = LedgerInput {
        miller_name: field(Header::MillerName),
        party_name: field(Header::PartyName),
        bill_no: field(Header::BillNo),
        arrival_date: field(Header::ArrivalDate),
        cheque_date: field(Header::ChequeDate),
        quantity: field(Header::Quantity),
        rate: field(Header::Rate),
        lorry_hire: field(Header::LorryHire),
        seller_commission: field(Header::SellerCommission),
        quantity_difference: field(Header::QuantityDifference),
        discount_selection,
        cheque_amount: field(Header::ChequeAmount),
        cheque_no: field(Header::ChequeNo),
        bank: field(Header::Bank),
        remarks: field(Header::Remarks),
    };

    // a tier written into the file was chosen by whoever filled it in
    let user_override = matches!(discount_selection, DiscountSelection::Pct(_));
    Ok(LedgerSession::with_override(input, user_override))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::input::DiscountPct;

    fn field_map() -> FieldToIndexMap {
        FieldToIndexMap(HashMap::from([
            (Header::BillNo, 0),
            (Header::Quantity, 1),
            (Header::Rate, 2),
            (Header::Discount, 3),
            (Header::ChequeNo, 4),
        ]))
    }

    #[test]
    fn can_parse_row() {
        let session = parse_row(
            &StringRecord::from(vec!["B-1", "100", "50", "", "00123"]),
            &field_map(),
        )
        .unwrap();
        assert_eq!(session.input().bill_no, "B-1");
        assert_eq!(session.input().quantity, "100");
        assert_eq!(session.input().cheque_no, "00123");
        assert_eq!(session.input().discount_selection, DiscountSelection::Auto);
        assert!(!session.user_override());
    }

    #[test]
    fn explicit_discount_sets_override() {
        let session = parse_row(
            &StringRecord::from(vec!["B-1", "100", "50", "0.02", ""]),
            &field_map(),
        )
        .unwrap();
        assert_eq!(
            session.input().discount_selection,
            DiscountSelection::Pct(DiscountPct::Two)
        );
        assert!(session.user_override());
    }

    #[test]
    fn invalid_discount_fails() {
        assert!(matches!(
            parse_row(
                &StringRecord::from(vec!["B-1", "100", "50", "7%", ""]),
                &field_map()
            ),
            Err(ParserError::InvalidDiscount(d)) if d == "7%"
        ));
    }

    #[test]
    fn short_rows_read_as_blank() {
        let session = parse_row(&StringRecord::from(vec!["B-1", "100"]), &field_map()).unwrap();
        assert_eq!(session.input().rate, "");
        assert_eq!(session.input().cheque_no, "");
    }

    #[test]
    fn missing_rate_column_fails() {
        let data = "bill_no,quantity\nB-1,100\n";
        assert!(matches!(
            parse_csv(data.as_bytes()),
            Err(ParserError::MissingHeader(Header::Rate))
        ));
    }

    #[test]
    fn unknown_columns_are_ignored() {
        let data = "quantity, rate ,colour\n10,2,red\n";
        let rows = parse_csv(data.as_bytes())
            .unwrap()
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].input().rate, "2");
    }
}
