use std::fmt;
use std::str::FromStr;

/// Price range a coin falls into. Ranges are half-open `[low, high)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PriceBucket {
    Under005,
    From005To05,
    From05To5,
    From5To50,
    Over50,
}

impl PriceBucket {
    pub const ALL: [PriceBucket; 5] = [
        PriceBucket::Under005,
        PriceBucket::From005To05,
        PriceBucket::From05To5,
        PriceBucket::From5To50,
        PriceBucket::Over50,
    ];

    /// Checked in ascending order, first match wins.
    pub fn classify(price: f64) -> Self {
        if price < 0.05 {
            PriceBucket::Under005
        } else if price < 0.5 {
            PriceBucket::From005To05
        } else if price < 5.0 {
            PriceBucket::From05To5
        } else if price < 50.0 {
            PriceBucket::From5To50
        } else {
            PriceBucket::Over50
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PriceBucket::Under005 => "0-0.05",
            PriceBucket::From005To05 => "0.05-0.5",
            PriceBucket::From05To5 => "0.5-5",
            PriceBucket::From5To50 => "5-50",
            PriceBucket::Over50 => ">50",
        }
    }
}

impl fmt::Display for PriceBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for PriceBucket {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        PriceBucket::ALL
            .into_iter()
            .find(|bucket| bucket.label() == s)
            .ok_or_else(|| {
                format!("unknown price bucket '{s}', expected one of: 0-0.05, 0.05-0.5, 0.5-5, 5-50, >50")
            })
    }
}

/// Two-way split of the current price at 10.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PriceCategory {
    Under10,
    TenOrMore,
}

impl PriceCategory {
    pub fn classify(price: f64) -> Self {
        if price >= 10.0 {
            PriceCategory::TenOrMore
        } else {
            PriceCategory::Under10
        }
    }
}

impl fmt::Display for PriceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PriceCategory::Under10 => write!(f, "<10"),
            PriceCategory::TenOrMore => write!(f, ">=10"),
        }
    }
}

impl FromStr for PriceCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "<10" => Ok(PriceCategory::Under10),
            ">=10" | "≥10" => Ok(PriceCategory::TenOrMore),
            other => Err(format!("unknown price category '{other}', expected '<10' or '>=10'")),
        }
    }
}
