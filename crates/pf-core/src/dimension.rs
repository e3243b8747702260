//! Dimensional analysis for unit strings.
//!
//! A unit string such as `"kmol/hr"`, `"J/(kg*K)"` or `"m3/hr"` is parsed into
//! a [`UnitExpr`]: a multiplicative factor to SI base units plus a
//! [`Dimension`] exponent vector. Two unit strings are convertible when their
//! dimensions are equal; the conversion factor is the ratio of their SI factors.
//!
//! Grammar (whitespace around operators is ignored):
//!
//! ```text
//! expr   := factor (('*' | '·' | '/') factor)*
//! factor := (atom | number | '(' expr ')') [exp]
//! exp    := '^' int | '**' int | int            (e.g. m^3, m**3, m3)
//! ```
//!
//! Atom scale factors come from `uom` wherever `uom` carries the unit.

use std::fmt;
use thiserror::Error;
use uom::si::f64::{AmountOfSubstance, Energy, Length, Mass, Pressure, Time, Volume};

/// Exponents over the base dimensions used by process streams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Dimension {
    pub mass: i8,
    pub length: i8,
    pub time: i8,
    pub amount: i8,
    pub temperature: i8,
    pub currency: i8,
}

impl Dimension {
    pub const NONE: Dimension = Dimension::new(0, 0, 0, 0, 0, 0);
    pub const MASS: Dimension = Dimension::new(1, 0, 0, 0, 0, 0);
    pub const LENGTH: Dimension = Dimension::new(0, 1, 0, 0, 0, 0);
    pub const TIME: Dimension = Dimension::new(0, 0, 1, 0, 0, 0);
    pub const AMOUNT: Dimension = Dimension::new(0, 0, 0, 1, 0, 0);
    pub const TEMPERATURE: Dimension = Dimension::new(0, 0, 0, 0, 1, 0);
    pub const CURRENCY: Dimension = Dimension::new(0, 0, 0, 0, 0, 1);

    /// amount / time
    pub const MOLAR_FLOW: Dimension = Dimension::new(0, 0, -1, 1, 0, 0);
    /// mass / time
    pub const MASS_FLOW: Dimension = Dimension::new(1, 0, -1, 0, 0, 0);
    /// length³ / time
    pub const VOLUMETRIC_FLOW: Dimension = Dimension::new(0, 3, -1, 0, 0, 0);

    pub const fn new(
        mass: i8,
        length: i8,
        time: i8,
        amount: i8,
        temperature: i8,
        currency: i8,
    ) -> Self {
        Self {
            mass,
            length,
            time,
            amount,
            temperature,
            currency,
        }
    }

    /// Exponent-wise sum, or `None` when an exponent leaves the `i8` range.
    pub fn checked_mul(self, other: Dimension) -> Option<Dimension> {
        Some(Dimension::new(
            self.mass.checked_add(other.mass)?,
            self.length.checked_add(other.length)?,
            self.time.checked_add(other.time)?,
            self.amount.checked_add(other.amount)?,
            self.temperature.checked_add(other.temperature)?,
            self.currency.checked_add(other.currency)?,
        ))
    }

    /// Every exponent scaled by `n`, or `None` on overflow.
    pub fn checked_powi(self, n: i8) -> Option<Dimension> {
        Some(Dimension::new(
            self.mass.checked_mul(n)?,
            self.length.checked_mul(n)?,
            self.time.checked_mul(n)?,
            self.amount.checked_mul(n)?,
            self.temperature.checked_mul(n)?,
            self.currency.checked_mul(n)?,
        ))
    }

    pub fn is_dimensionless(&self) -> bool {
        *self == Dimension::NONE
    }

    fn entries(&self) -> [(&'static str, i8); 6] {
        [
            ("[mass]", self.mass),
            ("[length]", self.length),
            ("[time]", self.time),
            ("[substance]", self.amount),
            ("[temperature]", self.temperature),
            ("[currency]", self.currency),
        ]
    }
}

impl fmt::Display for Dimension {
    /// Renders like `[mass] / [time]` or `[length] ** 3 / [time]`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn term(name: &str, exp: i8) -> String {
            if exp == 1 {
                name.to_string()
            } else {
                format!("{name} ** {exp}")
            }
        }

        let num: Vec<String> = self
            .entries()
            .iter()
            .filter(|(_, e)| *e > 0)
            .map(|(n, e)| term(n, *e))
            .collect();
        let den: Vec<String> = self
            .entries()
            .iter()
            .filter(|(_, e)| *e < 0)
            .map(|(n, e)| term(n, -*e))
            .collect();

        match (num.is_empty(), den.is_empty()) {
            (true, true) => write!(f, "dimensionless"),
            (false, true) => write!(f, "{}", num.join(" * ")),
            (true, false) => write!(f, "1 / {}", den.join(" / ")),
            (false, false) => write!(f, "{} / {}", num.join(" * "), den.join(" / ")),
        }
    }
}

/// Error in unit parsing or conversion.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum UnitError {
    /// Input text did not follow the unit grammar.
    #[error("Could not parse units '{input}': {reason}")]
    Parse { input: String, reason: String },

    /// A unit atom is not in the unit table.
    #[error("Unknown unit '{unit}'")]
    UnknownUnit { unit: String },

    /// Units with different dimensionality cannot be converted.
    #[error("Cannot convert '{from}' ({from_dim}) to '{to}' ({to_dim})")]
    DimensionMismatch {
        from: String,
        to: String,
        from_dim: Dimension,
        to_dim: Dimension,
    },
}

/// Parsed unit string: `value_si = value * factor`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitExpr {
    pub factor: f64,
    pub dim: Dimension,
}

impl UnitExpr {
    const ONE: UnitExpr = UnitExpr {
        factor: 1.0,
        dim: Dimension::NONE,
    };

    fn times(self, other: UnitExpr) -> Option<UnitExpr> {
        Some(UnitExpr {
            factor: self.factor * other.factor,
            dim: self.dim.checked_mul(other.dim)?,
        })
    }

    fn powi(self, n: i8) -> Option<UnitExpr> {
        Some(UnitExpr {
            factor: self.factor.powi(i32::from(n)),
            dim: self.dim.checked_powi(n)?,
        })
    }
}

/// Parse a unit string into its SI factor and dimension.
pub fn parse_units(units: &str) -> Result<UnitExpr, UnitError> {
    let mut parser = Parser::new(units);
    parser.skip_ws();
    if parser.at_end() {
        return Ok(UnitExpr::ONE);
    }
    let expr = parser.expr()?;
    parser.skip_ws();
    if !parser.at_end() {
        return Err(parser.error("unexpected trailing input"));
    }
    Ok(expr)
}

/// Dimension of a unit string.
pub fn dimensionality(units: &str) -> Result<Dimension, UnitError> {
    parse_units(units).map(|u| u.dim)
}

/// Factor `f` such that `value_in_to = value_in_from * f`.
pub fn conversion_factor(from: &str, to: &str) -> Result<f64, UnitError> {
    let a = parse_units(from)?;
    let b = parse_units(to)?;
    if a.dim != b.dim {
        return Err(UnitError::DimensionMismatch {
            from: from.to_string(),
            to: to.to_string(),
            from_dim: a.dim,
            to_dim: b.dim,
        });
    }
    Ok(a.factor / b.factor)
}

/// Convert an absolute temperature between K, degC, degF and degR.
pub fn convert_temperature(value: f64, from: &str, to: &str) -> Result<f64, UnitError> {
    let kelvin = match from.trim() {
        "K" | "kelvin" => value,
        "degC" | "°C" | "C" | "celsius" => value + 273.15,
        "degF" | "°F" | "F" | "fahrenheit" => (value + 459.67) * 5.0 / 9.0,
        "degR" | "°R" | "R" | "rankine" => value * 5.0 / 9.0,
        other => {
            return Err(UnitError::UnknownUnit {
                unit: other.to_string(),
            });
        }
    };
    let out = match to.trim() {
        "K" | "kelvin" => kelvin,
        "degC" | "°C" | "C" | "celsius" => kelvin - 273.15,
        "degF" | "°F" | "F" | "fahrenheit" => kelvin * 9.0 / 5.0 - 459.67,
        "degR" | "°R" | "R" | "rankine" => kelvin * 9.0 / 5.0,
        other => {
            return Err(UnitError::UnknownUnit {
                unit: other.to_string(),
            });
        }
    };
    Ok(out)
}

/// Look up a unit atom: (factor to SI, dimension).
fn atom(name: &str) -> Option<(f64, Dimension)> {
    use uom::si::{amount_of_substance as n, energy as e, length as l, mass as m};
    use uom::si::{pressure as p, time as t, volume as v};

    let mass = |x: Mass| (x.get::<m::kilogram>(), Dimension::MASS);
    let length = |x: Length| (x.get::<l::meter>(), Dimension::LENGTH);
    let time = |x: Time| (x.get::<t::second>(), Dimension::TIME);
    let amount = |x: AmountOfSubstance| (x.get::<n::mole>(), Dimension::AMOUNT);
    let volume = |x: Volume| (x.get::<v::cubic_meter>(), Dimension::new(0, 3, 0, 0, 0, 0));
    let energy_dim = Dimension::new(1, 2, -2, 0, 0, 0);
    let power_dim = Dimension::new(1, 2, -3, 0, 0, 0);
    let energy = |x: Energy| (x.get::<e::joule>(), energy_dim);
    let pressure = |x: Pressure| (x.get::<p::pascal>(), Dimension::new(1, -1, -2, 0, 0, 0));

    let found = match name {
        // mass
        "kg" => mass(Mass::new::<m::kilogram>(1.0)),
        "g" => mass(Mass::new::<m::gram>(1.0)),
        "mg" => mass(Mass::new::<m::milligram>(1.0)),
        "lb" | "lbm" | "lbs" => mass(Mass::new::<m::pound>(1.0)),
        "oz" => mass(Mass::new::<m::ounce>(1.0)),
        "tonne" | "t" => (1.0e3, Dimension::MASS),
        // length
        "m" => length(Length::new::<l::meter>(1.0)),
        "cm" => length(Length::new::<l::centimeter>(1.0)),
        "mm" => length(Length::new::<l::millimeter>(1.0)),
        "km" => length(Length::new::<l::kilometer>(1.0)),
        "ft" => length(Length::new::<l::foot>(1.0)),
        "in" => length(Length::new::<l::inch>(1.0)),
        // time
        "s" | "sec" => time(Time::new::<t::second>(1.0)),
        "min" => time(Time::new::<t::minute>(1.0)),
        "hr" | "h" | "hour" => time(Time::new::<t::hour>(1.0)),
        "day" | "d" => time(Time::new::<t::day>(1.0)),
        "yr" | "year" => time(Time::new::<t::day>(365.0)),
        // amount of substance
        "mol" => amount(AmountOfSubstance::new::<n::mole>(1.0)),
        "kmol" => amount(AmountOfSubstance::new::<n::kilomole>(1.0)),
        "mmol" => amount(AmountOfSubstance::new::<n::millimole>(1.0)),
        "lbmol" => (Mass::new::<m::pound>(1.0).get::<m::gram>(), Dimension::AMOUNT),
        // volume
        "L" | "l" | "liter" => volume(Volume::new::<v::liter>(1.0)),
        "mL" | "ml" => volume(Volume::new::<v::milliliter>(1.0)),
        "gal" => volume(Volume::new::<v::gallon>(1.0)),
        "cf" => volume(Volume::new::<v::cubic_foot>(1.0)),
        // energy and power
        "J" => energy(Energy::new::<e::joule>(1.0)),
        "kJ" => energy(Energy::new::<e::kilojoule>(1.0)),
        "MJ" => energy(Energy::new::<e::megajoule>(1.0)),
        "cal" => (4.184, energy_dim),
        "kcal" => (4184.0, energy_dim),
        "BTU" | "Btu" => (1055.055_852_62, energy_dim),
        "W" => (1.0, power_dim),
        "kW" => (1.0e3, power_dim),
        "MW" => (1.0e6, power_dim),
        // force and pressure
        "N" => (1.0, Dimension::new(1, 1, -2, 0, 0, 0)),
        "Pa" => pressure(Pressure::new::<p::pascal>(1.0)),
        "kPa" => pressure(Pressure::new::<p::kilopascal>(1.0)),
        "MPa" => pressure(Pressure::new::<p::megapascal>(1.0)),
        "bar" => pressure(Pressure::new::<p::bar>(1.0)),
        "atm" => pressure(Pressure::new::<p::atmosphere>(1.0)),
        "psi" => pressure(Pressure::new::<p::pound_force_per_square_inch>(1.0)),
        "cP" => (1.0e-3, Dimension::new(1, -1, -1, 0, 0, 0)),
        // temperature intervals inside compound units
        "K" => (1.0, Dimension::TEMPERATURE),
        "degC" | "°C" => (1.0, Dimension::TEMPERATURE),
        "degF" | "°F" | "degR" | "°R" => (5.0 / 9.0, Dimension::TEMPERATURE),
        // currency and dimensionless
        "USD" | "$" => (1.0, Dimension::CURRENCY),
        "%" => (0.01, Dimension::NONE),
        _ => return None,
    };
    Some(found)
}

struct Parser<'a> {
    input: &'a str,
    chars: Vec<char>,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.chars().collect(),
            pos: 0,
        }
    }

    fn error(&self, reason: &str) -> UnitError {
        UnitError::Parse {
            input: self.input.to_string(),
            reason: format!("{reason} at position {}", self.pos),
        }
    }

    fn overflow(&self) -> UnitError {
        self.error("exponent out of range")
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
    }

    fn expr(&mut self) -> Result<UnitExpr, UnitError> {
        let mut acc = self.factor()?;
        loop {
            self.skip_ws();
            match self.peek() {
                Some('*') | Some('·') => {
                    self.pos += 1;
                    let rhs = self.factor()?;
                    acc = acc.times(rhs).ok_or_else(|| self.overflow())?;
                }
                Some('/') => {
                    self.pos += 1;
                    let rhs = self.factor()?.powi(-1).ok_or_else(|| self.overflow())?;
                    acc = acc.times(rhs).ok_or_else(|| self.overflow())?;
                }
                _ => return Ok(acc),
            }
        }
    }

    fn factor(&mut self) -> Result<UnitExpr, UnitError> {
        self.skip_ws();
        let base = match self.peek() {
            Some('(') => {
                self.pos += 1;
                let inner = self.expr()?;
                self.skip_ws();
                if self.peek() != Some(')') {
                    return Err(self.error("expected ')'"));
                }
                self.pos += 1;
                inner
            }
            Some(c) if c.is_ascii_digit() || c == '.' => {
                let value = self.number()?;
                UnitExpr {
                    factor: value,
                    dim: Dimension::NONE,
                }
            }
            Some(_) => self.atom()?,
            None => return Err(self.error("expected a unit")),
        };
        let exp = self.exponent()?;
        base.powi(exp).ok_or_else(|| self.overflow())
    }

    fn atom(&mut self) -> Result<UnitExpr, UnitError> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_alphabetic() || c == '°' || c == '$' || c == '%' || c == '_' {
                self.pos += 1;
            } else {
                break;
            }
        }
        if self.pos == start {
            return Err(self.error("expected a unit"));
        }
        let name: String = self.chars[start..self.pos].iter().collect();
        match atom(&name) {
            Some((factor, dim)) => Ok(UnitExpr { factor, dim }),
            None => Err(UnitError::UnknownUnit { unit: name }),
        }
    }

    fn number(&mut self) -> Result<f64, UnitError> {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_digit() || c == '.') {
            self.pos += 1;
        }
        let text: String = self.chars[start..self.pos].iter().collect();
        text.parse::<f64>()
            .map_err(|_| self.error("invalid numeric factor"))
    }

    fn exponent(&mut self) -> Result<i8, UnitError> {
        match (self.peek(), self.peek_at(1)) {
            (Some('^'), _) => {
                self.pos += 1;
                self.integer()
            }
            (Some('*'), Some('*')) => {
                self.pos += 2;
                self.integer()
            }
            (Some(c), _) if c.is_ascii_digit() => self.integer(),
            _ => Ok(1),
        }
    }

    fn integer(&mut self) -> Result<i8, UnitError> {
        let start = self.pos;
        if self.peek() == Some('-') {
            self.pos += 1;
        }
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.pos += 1;
        }
        let text: String = self.chars[start..self.pos].iter().collect();
        text.parse::<i8>().map_err(|_| self.error("invalid exponent"))
    }
}
