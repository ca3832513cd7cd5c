use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Read;
use std::path::Path;

/// Cities shown when the search box is empty, and the cap on prefix matches.
pub const SUGGESTION_LIMIT: usize = 8;

/// Annual hospitalisation cost estimate (lakh) for one person of `age`.
pub fn annual_hospitalisation_cost(age: u8) -> f64 {
    match age {
        0..=4 => 1.2,
        5..=17 => 1.4,
        18..=30 => 1.5,
        31..=40 => 2.5,
        41..=50 => 4.0,
        51..=60 => 6.5,
        61..=69 => 11.0,
        _ => 15.0,
    }
}

const STANDARD_CITIES: [(&str, f64); 25] = [
    ("Mumbai", 1.35),
    ("Delhi", 1.30),
    ("Bengaluru", 1.25),
    ("Hyderabad", 1.15),
    ("Chennai", 1.15),
    ("Pune", 1.15),
    ("Kolkata", 1.10),
    ("Ahmedabad", 1.05),
    ("Jaipur", 0.95),
    ("Surat", 0.95),
    ("Lucknow", 0.90),
    ("Kanpur", 0.85),
    ("Nagpur", 0.85),
    ("Indore", 0.90),
    ("Bhopal", 0.85),
    ("Patna", 0.85),
    ("Vadodara", 0.95),
    ("Coimbatore", 0.90),
    ("Visakhapatnam", 0.90),
    ("Gurgaon", 1.30),
    ("Noida", 1.20),
    ("Chandigarh", 1.05),
    ("Kochi", 1.00),
    ("Mysuru", 0.90),
    ("Bhubaneswar", 0.85),
];

#[derive(Debug)]
pub enum CityTableError {
    Io(std::io::Error),
    Csv(csv::Error),
    InvalidMultiplier { city: String, multiplier: f64 },
    Empty,
}

impl fmt::Display for CityTableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CityTableError::Io(err) => write!(f, "failed to read city table: {err}"),
            CityTableError::Csv(err) => write!(f, "invalid city table CSV data: {err}"),
            CityTableError::InvalidMultiplier { city, multiplier } => write!(
                f,
                "city '{city}' has a non-positive cost multiplier ({multiplier})"
            ),
            CityTableError::Empty => write!(f, "city table contains no rows"),
        }
    }
}

impl std::error::Error for CityTableError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CityTableError::Io(err) => Some(err),
            CityTableError::Csv(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for CityTableError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for CityTableError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityCost {
    pub city: String,
    pub multiplier: f64,
}

/// Medical cost-of-living multipliers, in suggestion order.
#[derive(Debug, Clone, PartialEq)]
pub struct CityCostTable {
    entries: Vec<CityCost>,
}

impl CityCostTable {
    pub fn standard() -> Self {
        Self {
            entries: STANDARD_CITIES
                .iter()
                .map(|(city, multiplier)| CityCost {
                    city: city.to_string(),
                    multiplier: *multiplier,
                })
                .collect(),
        }
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, CityTableError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    /// Reads a `city,multiplier` CSV. Later rows replace earlier ones with the same name.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, CityTableError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut entries: Vec<CityCost> = Vec::new();

        for row in csv_reader.deserialize::<CityCost>() {
            let row = row?;
            if !(row.multiplier.is_finite() && row.multiplier > 0.0) {
                return Err(CityTableError::InvalidMultiplier {
                    city: row.city,
                    multiplier: row.multiplier,
                });
            }

            match entries
                .iter_mut()
                .find(|entry| entry.city.eq_ignore_ascii_case(&row.city))
            {
                Some(existing) => existing.multiplier = row.multiplier,
                None => entries.push(row),
            }
        }

        if entries.is_empty() {
            return Err(CityTableError::Empty);
        }

        Ok(Self { entries })
    }

    pub fn cities(&self) -> &[CityCost] {
        &self.entries
    }

    /// Case-insensitive lookup; unknown cities cost the national baseline of 1.0.
    pub fn multiplier(&self, city: &str) -> f64 {
        let city = city.trim();
        self.entries
            .iter()
            .find(|entry| entry.city.eq_ignore_ascii_case(city))
            .map(|entry| entry.multiplier)
            .unwrap_or(1.0)
    }

    pub fn is_known(&self, city: &str) -> bool {
        let city = city.trim();
        self.entries
            .iter()
            .any(|entry| entry.city.eq_ignore_ascii_case(city))
    }

    /// Up to eight city names starting with `prefix`; the first eight when blank.
    pub fn suggest(&self, prefix: &str) -> Vec<&str> {
        let prefix = prefix.trim().to_lowercase();
        self.entries
            .iter()
            .filter(|entry| entry.city.to_lowercase().starts_with(&prefix))
            .take(SUGGESTION_LIMIT)
            .map(|entry| entry.city.as_str())
            .collect()
    }
}

impl Default for CityCostTable {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn age_brackets_cover_every_age() {
        let costs: Vec<f64> = [0, 4, 5, 17, 18, 30, 31, 40, 41, 50, 51, 60, 61, 69, 70, 99]
            .into_iter()
            .map(annual_hospitalisation_cost)
            .collect();

        assert_eq!(
            costs,
            vec![1.2, 1.2, 1.4, 1.4, 1.5, 1.5, 2.5, 2.5, 4.0, 4.0, 6.5, 6.5, 11.0, 11.0, 15.0, 15.0]
        );
    }

    #[test]
    fn multiplier_lookup_ignores_case_and_padding() {
        let table = CityCostTable::standard();

        assert_eq!(table.multiplier("  mumbai "), 1.35);
        assert_eq!(table.multiplier("GURGAON"), 1.30);
        assert_eq!(table.multiplier("Shillong"), 1.0);
        assert!(!table.is_known("Shillong"));
    }

    #[test]
    fn blank_prefix_suggests_first_eight() {
        let table = CityCostTable::standard();

        assert_eq!(
            table.suggest(""),
            vec![
                "Mumbai",
                "Delhi",
                "Bengaluru",
                "Hyderabad",
                "Chennai",
                "Pune",
                "Kolkata",
                "Ahmedabad"
            ]
        );
    }

    #[test]
    fn prefix_suggestions_keep_table_order() {
        let table = CityCostTable::standard();

        assert_eq!(table.suggest("b"), vec!["Bengaluru", "Bhopal", "Bhubaneswar"]);
        assert!(table.suggest("zz").is_empty());
    }

    #[test]
    fn csv_rows_replace_the_table() {
        let data = "city,multiplier\nShillong,0.8\nMumbai,1.5\nmumbai,1.6\n";

        let table = CityCostTable::from_reader(data.as_bytes()).expect("valid table");

        assert_eq!(table.cities().len(), 2);
        assert_eq!(table.multiplier("Mumbai"), 1.6);
        assert_eq!(table.multiplier("shillong"), 0.8);
        assert_eq!(table.multiplier("Delhi"), 1.0);
    }

    #[test]
    fn csv_rejects_non_positive_multipliers() {
        let data = "city,multiplier\nMumbai,0\n";

        let err = CityCostTable::from_reader(data.as_bytes())
            .expect_err("zero multiplier")
            .to_string();

        assert!(err.contains("Mumbai"));
    }

    #[test]
    fn csv_without_rows_is_rejected() {
        let err = CityCostTable::from_reader("city,multiplier\n".as_bytes())
            .expect_err("empty table");

        assert!(matches!(err, CityTableError::Empty));
    }
}
