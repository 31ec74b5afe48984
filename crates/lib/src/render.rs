use crate::{
    format::{format_date, format_number},
    input::LedgerInput,
    ledger::LedgerOutput,
};
use std::collections::BTreeMap;
use strum_macros::{Display, EnumIter};

/// Cells of the printed patti sheet, named by their spreadsheet position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumIter)]
pub enum Cell {
    B1,
    B2,
    B3,
    B4,
    B5,
    D5,
    E5,
    B6,
    E6,
    G6,
    I6,
    B7,
    E7,
    I7,
    B8,
    E8,
    I8,
    E9,
    I9,
    B10,
    D10,
    B11,
    E11,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum ShortageSign {
    Pos,
    Neg,
}

impl ShortageSign {
    pub fn of(shortage: f64) -> Option<Self> {
        if shortage > 0.0 {
            Some(ShortageSign::Pos)
        } else if shortage < 0.0 {
            Some(ShortageSign::Neg)
        } else {
            None
        }
    }
}

/// Display text for every cell of the sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preview {
    pub cells: BTreeMap<Cell, String>,
    pub days_label: String,
    pub shortage_sign: Option<ShortageSign>,
}

impl Preview {
    pub fn get(&self, cell: Cell) -> &str {
        self.cells.get(&cell).map(String::as_str).unwrap_or("")
    }
}

pub fn render(input: &LedgerInput, output: &LedgerOutput) -> Preview {
    let mut cells = BTreeMap::new();
    let mut set = |cell: Cell, text: String| {
        cells.insert(cell, text);
    };

    set(Cell::B1, input.miller_name.clone());
    set(Cell::B2, input.party_name.clone());
    set(Cell::B3, input.bill_no.clone());
    set(Cell::B4, format_date(&input.arrival_date));

    set(Cell::B5, format_number(output.quantity));
    set(Cell::D5, format_number(output.rate));
    set(Cell::E5, format_number(output.amount));

    set(Cell::B6, format_number(output.lorry_hire));
    set(Cell::B7, format_number(output.discount_amount));
    set(Cell::B8, format_number(output.seller_commission));
    set(Cell::B10, format_number(output.quantity_difference));

    let expenses = format_number(output.expenses_total);
    set(Cell::E6, expenses.clone());
    set(Cell::G6, expenses);

    let net = format_number(output.net_amount);
    set(Cell::E7, net.clone());
    set(Cell::B11, net.clone());
    set(Cell::E11, net);

    let cheque = format_number(output.cheque_amount);
    set(Cell::I6, cheque.clone());
    set(Cell::E8, cheque);
    set(Cell::E9, format_number(output.shortage));

    set(Cell::D10, output.remarks.clone());

    set(Cell::I7, input.cheque_no.clone());
    set(Cell::I8, format_date(&input.cheque_date));
    set(Cell::I9, input.bank.clone());

    let days_label = match output.days_diff {
        Some(days) => format!("Days: {days}"),
        None => "Days: -".to_string(),
    };

    Preview {
        cells,
        days_label,
        shortage_sign: ShortageSign::of(output.shortage),
    }
}
