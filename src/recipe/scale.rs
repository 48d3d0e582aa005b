use serde::Serialize;
use std::fmt;

/// Unit suffix attached to a quantity token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Unit {
    Grams,
    Millilitres,
    /// Bare count ("2 eggs")
    Other,
}

impl Unit {
    pub fn suffix(self) -> &'static str {
        match self {
            Unit::Grams => "g",
            Unit::Millilitres => "ml",
            Unit::Other => "",
        }
    }
}

/// An ingredient whose leading quantity was parsed and rescaled
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScaledIngredient {
    pub quantity: u64,
    pub unit: Unit,
    pub descriptor: String,
}

impl fmt::Display for ScaledIngredient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{} {}", self.quantity, self.unit.suffix(), self.descriptor)
    }
}

/// One line of a scaled ingredient list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ingredient {
    Scaled(ScaledIngredient),
    /// Quantity could not be parsed; the line is passed through untouched
    Verbatim(String),
}

impl fmt::Display for Ingredient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ingredient::Scaled(scaled) => write!(f, "{}", scaled),
            Ingredient::Verbatim(raw) => f.write_str(raw),
        }
    }
}

/// Rescale an ingredient list from `base_servings` to `desired_servings`
///
/// Each line is split at its first space into a quantity token and a
/// descriptor. The scaled quantity is truncated toward zero. Output order and
/// length always match the input.
pub fn scale_ingredients(
    ingredients: &[String],
    base_servings: u32,
    desired_servings: u32,
) -> Vec<Ingredient> {
    let base = f64::from(base_servings.max(1));
    let desired = f64::from(desired_servings);

    ingredients
        .iter()
        .map(|raw| {
            let Some((token, descriptor)) = raw.split_once(' ') else {
                return Ingredient::Verbatim(raw.clone());
            };

            match parse_quantity(token) {
                Some((value, unit)) => Ingredient::Scaled(ScaledIngredient {
                    // Multiply before dividing so whole multiples stay exact
                    quantity: (value * desired / base).trunc() as u64,
                    unit,
                    descriptor: descriptor.to_string(),
                }),
                None => Ingredient::Verbatim(raw.clone()),
            }
        })
        .collect()
}

/// Parse "200g", "1.5ml" or "3" into a value and unit
fn parse_quantity(token: &str) -> Option<(f64, Unit)> {
    let (number, unit) = if let Some(n) = token.strip_suffix("ml") {
        (n, Unit::Millilitres)
    } else if let Some(n) = token.strip_suffix('g') {
        (n, Unit::Grams)
    } else {
        (token, Unit::Other)
    };

    let is_literal = number.chars().any(|c| c.is_ascii_digit())
        && number.chars().all(|c| c.is_ascii_digit() || c == '.')
        && number.matches('.').count() <= 1;

    if !is_literal {
        return None;
    }

    number.parse::<f64>().ok().map(|value| (value, unit))
}
