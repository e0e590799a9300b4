use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use sqlx::error::BoxDynError;
use sqlx::mysql::{MySql, MySqlTypeInfo, MySqlValueRef};
use std::fmt;

/// ISO 4217 currency of a host payment
///
/// The codes the bundled providers settle in are named; any other
/// three-letter code the host stores is carried as `Other` with a two-digit
/// minor unit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Currency {
    /// Ukrainian Hryvnia
    UAH,
    /// US Dollar
    USD,
    /// Euro
    EUR,
    /// Pound Sterling
    GBP,
    /// Polish Zloty
    PLN,
    /// Czech Koruna
    CZK,
    /// Swiss Franc
    CHF,
    /// Canadian Dollar
    CAD,
    /// Australian Dollar
    AUD,
    /// Japanese Yen (no decimal places)
    JPY,
    /// Upper-case code not listed above
    Other(String),
}

impl Currency {
    /// ISO 4217 code
    pub fn code(&self) -> &str {
        match self {
            Currency::UAH => "UAH",
            Currency::USD => "USD",
            Currency::EUR => "EUR",
            Currency::GBP => "GBP",
            Currency::PLN => "PLN",
            Currency::CZK => "CZK",
            Currency::CHF => "CHF",
            Currency::CAD => "CAD",
            Currency::AUD => "AUD",
            Currency::JPY => "JPY",
            Currency::Other(code) => code.as_str(),
        }
    }

    /// Returns the decimal scale for this currency
    pub fn scale(&self) -> u32 {
        match self {
            Currency::JPY => 0,
            _ => 2,
        }
    }

    /// Multiplier from major to minor units (100 for cent-based currencies)
    pub fn minor_unit_factor(&self) -> Decimal {
        Decimal::from(10u64.pow(self.scale()))
    }

    /// Converts a major-unit amount into minor units
    pub fn to_minor_units(&self, amount: Decimal) -> Decimal {
        amount * self.minor_unit_factor()
    }

    /// Two decimals, half away from zero, as the providers expect
    pub fn format_provider_amount(amount: Decimal) -> String {
        let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        format!("{:.2}", rounded)
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl std::str::FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_ascii_uppercase();
        match code.as_str() {
            "UAH" => Ok(Currency::UAH),
            "USD" => Ok(Currency::USD),
            "EUR" => Ok(Currency::EUR),
            "GBP" => Ok(Currency::GBP),
            "PLN" => Ok(Currency::PLN),
            "CZK" => Ok(Currency::CZK),
            "CHF" => Ok(Currency::CHF),
            "CAD" => Ok(Currency::CAD),
            "AUD" => Ok(Currency::AUD),
            "JPY" => Ok(Currency::JPY),
            _ if code.len() == 3 && code.bytes().all(|b| b.is_ascii_alphabetic()) => {
                Ok(Currency::Other(code))
            }
            _ => Err(format!("Invalid currency: {}", s)),
        }
    }
}

impl TryFrom<String> for Currency {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Currency> for String {
    fn from(currency: Currency) -> Self {
        currency.code().to_string()
    }
}

// Stored as VARCHAR(3)
impl sqlx::Type<MySql> for Currency {
    fn type_info() -> MySqlTypeInfo {
        <String as sqlx::Type<MySql>>::type_info()
    }

    fn compatible(ty: &MySqlTypeInfo) -> bool {
        <String as sqlx::Type<MySql>>::compatible(ty)
    }
}

impl<'r> sqlx::Decode<'r, MySql> for Currency {
    fn decode(value: MySqlValueRef<'r>) -> Result<Self, BoxDynError> {
        let code = <String as sqlx::Decode<'r, MySql>>::decode(value)?;
        Ok(code.parse::<Currency>()?)
    }
}
