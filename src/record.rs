use std::fmt;
use std::iter::Sum;
use std::ops::Add;
use std::str::FromStr;

use chrono::NaiveDate;
use fixed::types::I64F64;

/// The category used when the user leaves the category blank
pub const DEFAULT_CATEGORY: &str = "Misc";

/// The date format used for input and for the persisted table
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Possible errors to occur while parsing user supplied record fields
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RecordError {
    #[error("`{0}` is not a date in the format YYYY-MM-DD")]
    InvalidDate(String),
    #[error("`{0}` is not a decimal amount")]
    InvalidAmount(String),
}

/// The unique identifier of a record
#[derive(Clone, Copy, Debug, serde::Serialize, serde::Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RecordId(u32);

impl RecordId {
    /// The id handed out for the first record of an empty ledger
    pub const FIRST: RecordId = RecordId(1);

    pub fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn get(self) -> u32 {
        self.0
    }

    /// The id following this one, `None` once the ids are used up
    pub fn next(self) -> Option<Self> {
        self.0.checked_add(1).map(Self)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// A signed amount of money with two fractional digits
///
/// Amounts are held as whole cents, so sums and comparisons are exact and an
/// amount read back from the ledger compares equal to the one that was
/// appended.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(i128);

impl Amount {
    pub const ZERO: Amount = Amount(0);

    /// Parses decimal text and rounds it to the nearest cent
    ///
    /// Accepts an optional sign followed by digits with an optional decimal
    /// point, like `12` or `-4.5`. Exponents (`1e3`) and the special
    /// values `inf` and `nan` are rejected. A single amount must fit into an
    /// `i64` of cents.
    pub fn parse(text: &str) -> Result<Self, RecordError> {
        let invalid = || RecordError::InvalidAmount(text.to_owned());

        let cents = I64F64::from_str(text.trim())
            .map_err(|_| invalid())?
            .checked_mul_int(100)
            .and_then(|cents| cents.checked_round())
            .and_then(|cents| cents.checked_to_num::<i64>())
            .ok_or_else(invalid)?;

        Ok(Self(i128::from(cents)))
    }

    /// The amount in whole cents
    pub fn cents(self) -> i128 {
        self.0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let cents = self.0.unsigned_abs();
        f.pad(&format!("{}{}.{:02}", sign, cents / 100, cents % 100))
    }
}

impl FromStr for Amount {
    type Err = RecordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Add for Amount {
    type Output = Amount;

    fn add(self, rhs: Self) -> Self::Output {
        Amount(self.0.saturating_add(rhs.0))
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Amount::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Amount> for Amount {
    fn sum<I: Iterator<Item = &'a Amount>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl serde::Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
        where S: serde::Serializer
    {
        serializer.collect_str(self)
    }
}

impl<'de> serde::Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
        where D: serde::Deserializer<'de>
    {
        let text = <String as serde::Deserialize>::deserialize(deserializer)?;
        Amount::parse(&text).map_err(serde::de::Error::custom)
    }
}

/// Parses a date in the `YYYY-MM-DD` format
pub fn parse_date(text: &str) -> Result<NaiveDate, RecordError> {
    NaiveDate::parse_from_str(text.trim(), DATE_FORMAT)
        .map_err(|_| RecordError::InvalidDate(text.to_owned()))
}

/// One expense entry of the ledger
///
/// Records are only ever created by appending to the ledger and are never
/// changed afterwards.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Record {
    id: RecordId,
    date: NaiveDate,
    category: String,
    amount: Amount,
    description: String,
}

impl Record {
    pub fn new(
        id: RecordId,
        date: NaiveDate,
        category: impl Into<String>,
        amount: Amount,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id,
            date,
            category: category.into(),
            amount,
            description: description.into(),
        }
    }

    /// The unique id of the record
    pub fn id(&self) -> RecordId {
        self.id
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

/// The raw, unvalidated fields of a record as entered by the user
#[derive(Clone, Debug, Default)]
pub struct RecordDraft {
    /// Blank means today
    pub date: String,
    /// Blank means [`DEFAULT_CATEGORY`]
    pub category: String,
    pub amount: String,
    pub description: String,
}

/// A draft whose fields all parsed, waiting for an id
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedDraft {
    pub date: NaiveDate,
    pub category: String,
    pub amount: Amount,
    pub description: String,
}

impl RecordDraft {
    /// Validates the draft and fills in the defaults
    ///
    /// Nothing is written anywhere, so a failed parse leaves no trace.
    pub fn parse(&self, today: NaiveDate) -> Result<ParsedDraft, RecordError> {
        let date = match self.date.trim() {
            "" => today,
            date => parse_date(date)?,
        };
        let category = match self.category.trim() {
            "" => DEFAULT_CATEGORY,
            category => category,
        };
        let amount = Amount::parse(&self.amount)?;

        Ok(ParsedDraft {
            date,
            category: category.to_owned(),
            amount,
            description: self.description.trim().to_owned(),
        })
    }
}

impl ParsedDraft {
    pub fn into_record(self, id: RecordId) -> Record {
        Record {
            id,
            date: self.date,
            category: self.category,
            amount: self.amount,
            description: self.description,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! amount_test {
        ($name:ident $input:literal => invalid) => {
            #[test]
            fn $name() {
                assert_eq!(
                    Amount::parse($input),
                    Err(RecordError::InvalidAmount($input.to_owned())),
                );
            }
        };
        ($name:ident $input:literal => $expected:literal) => {
            #[test]
            fn $name() {
                assert_eq!(Amount::parse($input).unwrap().to_string(), $expected);
            }
        };
    }

    amount_test!(amount_integer "12" => "12.00");
    amount_test!(amount_one_digit "12.5" => "12.50");
    amount_test!(amount_two_digits "7.25" => "7.25");
    amount_test!(amount_rounds_up "0.006" => "0.01");
    amount_test!(amount_rounds_down "3.14159" => "3.14");
    amount_test!(amount_negative "-4.5" => "-4.50");
    amount_test!(amount_small_negative "-0.05" => "-0.05");
    amount_test!(amount_surrounding_space "  8.1 " => "8.10");
    amount_test!(amount_empty "" => invalid);
    amount_test!(amount_text "ten" => invalid);
    amount_test!(amount_two_points "1.2.3" => invalid);
    amount_test!(amount_exponent "1e3" => invalid);
    amount_test!(amount_not_a_number "nan" => invalid);
    amount_test!(amount_largest "92233720368547758.07" => "92233720368547758.07");
    amount_test!(amount_too_large "92233720368547758.08" => invalid);
    amount_test!(amount_far_too_large "1000000000000000000000" => invalid);

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parsing_is_idempotent() {
        let amount = Amount::parse("19.999").unwrap();
        assert_eq!(Amount::parse(&amount.to_string()).unwrap(), amount);
    }

    #[test]
    fn amount_display_honors_width() {
        let amount = Amount::parse("7.5").unwrap();
        assert_eq!(format!("{:>8}|", amount), "    7.50|");
        assert_eq!(format!("{:<8}|", amount), "7.50    |");
    }

    #[test]
    fn amount_sum() {
        let amounts = ["12.5", "7.25", "-1.00"]
            .iter()
            .map(|a| Amount::parse(a).unwrap())
            .collect::<Vec<_>>();
        assert_eq!(amounts.iter().sum::<Amount>().to_string(), "18.75");
        assert_eq!(Vec::<Amount>::new().into_iter().sum::<Amount>(), Amount::ZERO);
    }

    #[test]
    fn amount_sum_is_exact_in_cents() {
        let parts = Amount::parse("0.10").unwrap() + Amount::parse("0.60").unwrap();
        assert_eq!(parts, Amount::parse("0.70").unwrap());
        assert_eq!(parts.cents(), 70);
    }

    #[test]
    fn large_sums_display() {
        let amount = Amount::parse("90000000000000000").unwrap();
        let total = [amount, amount, amount].iter().sum::<Amount>();
        assert_eq!(total.to_string(), "270000000000000000.00");
    }

    #[test]
    fn draft_with_all_fields() {
        let draft = RecordDraft {
            date: "2024-01-05".into(),
            category: "Food".into(),
            amount: "12.5".into(),
            description: "lunch".into(),
        };
        let parsed = draft.parse(date(2030, 1, 1)).unwrap();
        assert_eq!(parsed.date, date(2024, 1, 5));
        assert_eq!(parsed.category, "Food");
        assert_eq!(parsed.amount.to_string(), "12.50");
        assert_eq!(parsed.description, "lunch");
    }

    #[test]
    fn draft_defaults() {
        let draft = RecordDraft {
            amount: "3".into(),
            category: "   ".into(),
            ..RecordDraft::default()
        };
        let parsed = draft.parse(date(2024, 2, 29)).unwrap();
        assert_eq!(parsed.date, date(2024, 2, 29));
        assert_eq!(parsed.category, DEFAULT_CATEGORY);
        assert_eq!(parsed.description, "");
    }

    #[test]
    fn draft_invalid_date() {
        let draft = RecordDraft {
            date: "05/01/2024".into(),
            amount: "3".into(),
            ..RecordDraft::default()
        };
        assert_eq!(
            draft.parse(date(2024, 1, 1)),
            Err(RecordError::InvalidDate("05/01/2024".into())),
        );
    }

    #[test]
    fn draft_impossible_date() {
        let draft = RecordDraft {
            date: "2023-02-29".into(),
            amount: "3".into(),
            ..RecordDraft::default()
        };
        assert!(matches!(draft.parse(date(2024, 1, 1)), Err(RecordError::InvalidDate(_))));
    }

    #[test]
    fn draft_missing_amount() {
        let draft = RecordDraft {
            category: "Food".into(),
            ..RecordDraft::default()
        };
        assert!(matches!(draft.parse(date(2024, 1, 1)), Err(RecordError::InvalidAmount(_))));
    }

    #[test]
    fn record_ids_increase() {
        assert_eq!(RecordId::FIRST.get(), 1);
        assert_eq!(RecordId::new(41).next(), Some(RecordId::new(42)));
        assert_eq!(RecordId::new(u32::MAX).next(), None);
        assert!(RecordId::new(2) > RecordId::FIRST);
    }
}
