//! Unit data import from CSV
//!
//! Columns are found by header name, in English or German. Both `,` and `;`
//! separated files are accepted, and decimals may use either `.` or `,`.

use std::io::Read;

use csv::{ReaderBuilder, StringRecord};

use crate::error::{CostshareError, CostshareResult};
use crate::models::{Measure, Money, TenantId, UnitDistributionData, UnitId};

use super::{ImportedRow, UnitImport};

/// Header positions of the recognized columns
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnMapping {
    pub unit_number: Option<usize>,
    pub tenant_name: Option<usize>,
    pub area: Option<usize>,
    pub persons: Option<usize>,
    pub heating_share: Option<usize>,
    pub prepayments: Option<usize>,
    pub vacant: Option<usize>,
    pub unit_id: Option<usize>,
    pub tenant_id: Option<usize>,
}

impl ColumnMapping {
    pub fn from_headers(headers: &StringRecord) -> Self {
        let mut mapping = Self::default();

        for (idx, header) in headers.iter().enumerate() {
            let h = header.trim().to_lowercase().replace([' ', '-'], "_");
            let slot = match h.as_str() {
                "unit_number" | "unit" | "number" | "wohnung" | "einheit" | "we" => {
                    &mut mapping.unit_number
                }
                "tenant_name" | "tenant" | "mieter" | "name" => &mut mapping.tenant_name,
                "area" | "area_m2" | "flaeche" | "fläche" | "wohnflaeche" | "wohnfläche" => {
                    &mut mapping.area
                }
                "persons" | "personen" | "occupants" => &mut mapping.persons,
                "heating_share" | "heating" | "consumption" | "heizanteil" | "verbrauch" => {
                    &mut mapping.heating_share
                }
                "prepayments" | "prepaid" | "vorauszahlung" | "vorauszahlungen" => {
                    &mut mapping.prepayments
                }
                "vacant" | "is_vacant" | "leerstand" => &mut mapping.vacant,
                "unit_id" => &mut mapping.unit_id,
                "tenant_id" => &mut mapping.tenant_id,
                _ => continue,
            };
            slot.get_or_insert(idx);
        }

        mapping
    }
}

/// Guess the delimiter from the header line
fn detect_delimiter(first_line: &str) -> u8 {
    if first_line.matches(';').count() > first_line.matches(',').count() {
        b';'
    } else {
        b','
    }
}

/// Parse a CSV document into unit rows
///
/// Every row is attempted; failures are reported per row.
pub fn parse_units<R: Read>(mut reader: R) -> CostshareResult<UnitImport> {
    let mut content = String::new();
    reader
        .read_to_string(&mut content)
        .map_err(|e| CostshareError::Import(format!("Failed to read CSV: {}", e)))?;
    let content = content.trim_start_matches('\u{feff}');

    let first_line = content.lines().next().unwrap_or("");
    let mut csv_reader = ReaderBuilder::new()
        .delimiter(detect_delimiter(first_line))
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mapping = ColumnMapping::from_headers(csv_reader.headers()?);
    if mapping.unit_number.is_none() {
        return Err(CostshareError::Import(
            "CSV has no unit_number column".to_string(),
        ));
    }

    let mut import = UnitImport::default();
    for (idx, record) in csv_reader.records().enumerate() {
        // Header is line 1
        let line = idx + 2;
        let parsed = record
            .map_err(|e| format!("Error reading CSV record: {}", e))
            .and_then(|record| parse_record(&record, &mapping));
        match parsed {
            Ok(row) => import.rows.push(row),
            Err(message) => import.errors.push((line, message)),
        }
    }

    Ok(import)
}

fn parse_record(record: &StringRecord, mapping: &ColumnMapping) -> Result<ImportedRow, String> {
    let field = |col: Option<usize>| col.and_then(|c| record.get(c)).filter(|s| !s.is_empty());

    let unit_number = field(mapping.unit_number)
        .ok_or_else(|| "Missing unit number".to_string())?
        .to_string();

    let mut unit = UnitDistributionData::new(
        unit_number,
        field(mapping.tenant_name).unwrap_or_default(),
    );

    if let Some(s) = field(mapping.area) {
        unit.area = Measure::parse(s).map_err(|e| format!("area: {}", e))?;
    }
    if let Some(s) = field(mapping.persons) {
        unit.persons = s
            .parse()
            .map_err(|_| format!("persons: '{}' is not a whole number", s))?;
    }
    if let Some(s) = field(mapping.heating_share) {
        let s = s.trim_end_matches('%').trim_end();
        unit.heating_share = Measure::parse(s).map_err(|e| format!("heating_share: {}", e))?;
    }
    if let Some(s) = field(mapping.prepayments) {
        unit.prepayments = Money::parse(s).map_err(|e| format!("prepayments: {}", e))?;
    }
    if let Some(s) = field(mapping.vacant) {
        unit.is_vacant = parse_flag(s).ok_or_else(|| format!("vacant: '{}' is not yes/no", s))?;
    }
    if let Some(s) = field(mapping.tenant_id) {
        unit.tenant_id = Some(
            s.parse::<TenantId>()
                .map_err(|e| format!("tenant_id: {}", e))?,
        );
    }

    let explicit_id = match field(mapping.unit_id) {
        Some(s) => Some(s.parse::<UnitId>().map_err(|e| format!("unit_id: {}", e))?),
        None => None,
    };

    unit.validate().map_err(|e| e.to_string())?;
    Ok(ImportedRow { unit, explicit_id })
}

fn parse_flag(s: &str) -> Option<bool> {
    match s.trim().to_lowercase().as_str() {
        "true" | "yes" | "y" | "1" | "x" | "ja" => Some(true),
        "false" | "no" | "n" | "0" | "nein" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_english_headers() {
        let data = "unit_number,tenant_name,area,persons,heating_share,prepayments,vacant\n\
                    A,Anna,50,2,40,600.00,no\n\
                    B,Ben,72.5,3,60,400,\n\
                    C,,30,0,0,200,yes\n";

        let import = parse_units(data.as_bytes()).unwrap();
        assert!(import.errors.is_empty());
        assert_eq!(import.rows.len(), 3);

        let b = &import.rows[1].unit;
        assert_eq!(b.area.hundredths(), 7250);
        assert_eq!(b.persons, 3);
        assert_eq!(b.prepayments.cents(), 40000);
        assert!(!b.is_vacant);
        assert!(import.rows[2].unit.is_vacant);
    }

    #[test]
    fn test_parse_german_semicolon_file() {
        let data = "Wohnung;Mieter;Fläche;Personen;Heizanteil;Vorauszahlung;Leerstand\n\
                    EG links;Müller;64,30;2;35,5 %;1.234,56;nein\n";

        let import = parse_units(data.as_bytes()).unwrap();
        // "1.234,56" has two separators, which Money::parse refuses
        assert_eq!(import.errors.len(), 1);
        assert_eq!(import.errors[0].0, 2);

        let data = "Wohnung;Mieter;Fläche;Personen;Heizanteil;Vorauszahlung;Leerstand\n\
                    EG links;Müller;64,30;2;35,5 %;1234,56;nein\n";
        let import = parse_units(data.as_bytes()).unwrap();
        let unit = &import.rows[0].unit;
        assert_eq!(unit.unit_number, "EG links");
        assert_eq!(unit.area.hundredths(), 6430);
        assert_eq!(unit.heating_share.hundredths(), 3550);
        assert_eq!(unit.prepayments.cents(), 123456);
    }

    #[test]
    fn test_row_errors_are_collected() {
        let data = "unit_number,persons,heating_share\n\
                    A,two,10\n\
                    ,1,10\n\
                    C,1,150\n\
                    D,1,10\n";

        let import = parse_units(data.as_bytes()).unwrap();
        assert_eq!(import.rows.len(), 1);
        let lines: Vec<usize> = import.errors.iter().map(|(line, _)| *line).collect();
        assert_eq!(lines, vec![2, 3, 4]);
    }

    #[test]
    fn test_explicit_unit_id() {
        let id = UnitId::new();
        let data = format!("unit_id,unit_number\n{},A\n", id.as_uuid());

        let import = parse_units(data.as_bytes()).unwrap();
        assert_eq!(import.rows[0].explicit_id, Some(id));
    }

    #[test]
    fn test_missing_unit_number_column() {
        let data = "tenant,area\nAnna,50\n";
        assert!(parse_units(data.as_bytes()).is_err());
    }
}
