use crate::{
    coerce::{days_between, normalize_remarks, parse_amount, parse_date, round2},
    input::{DiscountPct, DiscountSelection, LedgerInput},
    Amount,
};
use tracing::debug;

/// Every derived value of a patti, recomputed from scratch on each edit.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct LedgerOutput {
    pub quantity: Amount,
    pub rate: Amount,
    pub amount: Amount,
    pub days_diff: Option<i64>,
    pub auto_discount: DiscountPct,
    pub effective_discount: DiscountPct,
    pub discount_amount: Amount,
    pub lorry_hire: Amount,
    pub seller_commission: Amount,
    pub quantity_difference: Amount,
    pub expenses_total: Amount,
    pub net_amount: Amount,
    pub cheque_amount: Amount,
    pub shortage: Amount,
    pub remarks: String,
}

/// Computes the ledger for `input`.
///
/// `user_override` says the discount tier was picked by hand in this session;
/// without it the tier follows the days between arrival and cheque.
pub fn recompute(input: &LedgerInput, user_override: bool) -> LedgerOutput {
    let quantity = parse_amount(&input.quantity);
    let rate = parse_amount(&input.rate);
    let amount = quantity * rate;

    let days_diff = days_between(
        parse_date(&input.arrival_date),
        parse_date(&input.cheque_date),
    );
    let auto_discount = DiscountPct::for_days(days_diff);
    let effective_discount = match (input.discount_selection, user_override) {
        (DiscountSelection::Pct(pct), true) => pct,
        (DiscountSelection::Auto, _) => auto_discount,
        (DiscountSelection::Pct(_), false) if days_diff.is_some() => auto_discount,
        (DiscountSelection::Pct(pct), false) => pct,
    };

    let pct = effective_discount.fraction();
    let discount_amount = if pct != 0.0 && amount != 0.0 {
        round2(amount * pct)
    } else {
        0.0
    };

    let lorry_hire = parse_amount(&input.lorry_hire);
    let seller_commission = parse_amount(&input.seller_commission);
    let quantity_difference = parse_amount(&input.quantity_difference);
    let expenses_total = lorry_hire + discount_amount + seller_commission + quantity_difference;
    let net_amount = amount - expenses_total;

    let cheque_amount = parse_amount(&input.cheque_amount);
    // positive when the cheque exceeds the net amount
    let shortage = cheque_amount - net_amount;

    debug!(
        bill_no = %input.bill_no,
        amount,
        ?days_diff,
        discount = %effective_discount,
        net_amount,
        shortage,
        "recomputed patti"
    );

    LedgerOutput {
        quantity,
        rate,
        amount,
        days_diff,
        auto_discount,
        effective_discount,
        discount_amount,
        lorry_hire,
        seller_commission,
        quantity_difference,
        expenses_total,
        net_amount,
        cheque_amount,
        shortage,
        remarks: normalize_remarks(&input.remarks),
    }
}

/// One editing session: the form being filled in and whether its discount
/// was chosen by hand.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LedgerSession {
    input: LedgerInput,
    user_override: bool,
}

impl LedgerSession {
    pub fn new(input: LedgerInput) -> Self {
        Self {
            input,
            user_override: false,
        }
    }

    pub fn with_override(input: LedgerInput, user_override: bool) -> Self {
        Self {
            input,
            user_override,
        }
    }

    pub fn input(&self) -> &LedgerInput {
        &self.input
    }

    /// Field access for edits other than the discount tier.
    pub fn input_mut(&mut self) -> &mut LedgerInput {
        &mut self.input
    }

    pub fn into_input(self) -> LedgerInput {
        self.input
    }

    pub fn user_override(&self) -> bool {
        self.user_override
    }

    /// Picking a tier pins it; going back to `Auto` releases the pin.
    pub fn set_discount(&mut self, selection: DiscountSelection) {
        self.input.discount_selection = selection;
        self.user_override = matches!(selection, DiscountSelection::Pct(_));
    }

    pub fn output(&self) -> LedgerOutput {
        recompute(&self.input, self.user_override)
    }
}
