use strum_macros::{Display, EnumIter, EnumString};

/// Discount tiers offered on a patti.
///
/// The string form is the fraction the sheet shows (`"0.04"`), parsing also
/// accepts the percent form (`"4%"`).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumString, EnumIter)]
pub enum DiscountPct {
    #[default]
    #[strum(to_string = "0", serialize = "0%", serialize = "0.00")]
    Zero,
    #[strum(to_string = "0.01", serialize = "1%")]
    One,
    #[strum(to_string = "0.02", serialize = "2%")]
    Two,
    #[strum(to_string = "0.03", serialize = "3%")]
    Three,
    #[strum(to_string = "0.04", serialize = "4%")]
    Four,
}

impl DiscountPct {
    pub fn fraction(self) -> f64 {
        match self {
            DiscountPct::Zero => 0.0,
            DiscountPct::One => 0.01,
            DiscountPct::Two => 0.02,
            DiscountPct::Three => 0.03,
            DiscountPct::Four => 0.04,
        }
    }

    /// Tier earned by paying `days` after arrival. Boundaries belong to the
    /// lower (more generous) tier.
    pub fn for_days(days: Option<i64>) -> Self {
        match days {
            Some(d) if d <= 14 => DiscountPct::Four,
            Some(d) if d <= 28 => DiscountPct::Three,
            Some(d) if d <= 42 => DiscountPct::Two,
            Some(d) if d <= 56 => DiscountPct::One,
            _ => DiscountPct::Zero,
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum DiscountSelection {
    #[default]
    Auto,
    Pct(DiscountPct),
}

impl DiscountSelection {
    /// Parses a discount cell. Blank and `auto` select the automatic tier,
    /// anything else must name one of the tiers.
    pub fn parse(s: &str) -> Result<Self, strum::ParseError> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("auto") {
            return Ok(DiscountSelection::Auto);
        }
        s.parse().map(DiscountSelection::Pct)
    }
}

/// Raw form values of one patti being edited.
///
/// Numeric fields keep the text as typed, coercion happens on every
/// recompute so partially typed values never fail.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LedgerInput {
    pub miller_name: String,
    pub party_name: String,
    pub bill_no: String,
    pub arrival_date: String,
    pub cheque_date: String,
    pub quantity: String,
    pub rate: String,
    pub lorry_hire: String,
    pub seller_commission: String,
    pub quantity_difference: String,
    pub discount_selection: DiscountSelection,
    pub cheque_amount: String,
    pub cheque_no: String,
    pub bank: String,
    pub remarks: String,
}
