use chrono::{DateTime, SecondsFormat, Utc};
use invport_common::types::InventoryItemRecord;

use crate::error::{ReportError, Result};

/// Fixed CSV column order for the inventory export.
const HEADERS: [&str; 13] = [
    "Computer Name/ID",
    "Model",
    "Status",
    "Building",
    "Floor",
    "Room",
    "Category",
    "Serial Number",
    "Purchase Date",
    "Warranty Expiry",
    "Cost",
    "Created At",
    "Updated At",
];

fn date_field(date: Option<DateTime<Utc>>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

fn timestamp_field(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Render all items as CSV: one row per item, every field double-quoted,
/// missing values as empty strings. Input order is preserved (callers pass
/// newest-first).
pub fn export_csv(items: &[InventoryItemRecord]) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .from_writer(Vec::new());

    writer.write_record(HEADERS)?;
    for item in items {
        writer.write_record([
            item.name.clone().unwrap_or_default(),
            item.model.clone().unwrap_or_default(),
            item.status.to_string(),
            item.building.clone(),
            item.floor.clone(),
            item.room.clone(),
            item.category.clone().unwrap_or_default(),
            item.serial_number.clone().unwrap_or_default(),
            date_field(item.purchase_date),
            date_field(item.warranty_expiry),
            item.cost.clone().unwrap_or_default(),
            timestamp_field(item.created_at),
            timestamp_field(item.updated_at),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ReportError::CsvOutput(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| ReportError::CsvOutput(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use invport_common::types::ItemStatus;

    fn sample_item() -> InventoryItemRecord {
        let created = Utc.with_ymd_and_hms(2024, 1, 10, 8, 30, 0).unwrap();
        InventoryItemRecord {
            id: "1".to_string(),
            building: "Main".to_string(),
            floor: "2".to_string(),
            room: "Lab \"A\"".to_string(),
            name: Some("PC-001".to_string()),
            model: Some("Dell OptiPlex".to_string()),
            serial_number: Some("SN-1".to_string()),
            category: None,
            operating_system: None,
            processor: None,
            memory: None,
            storage: None,
            monitor: None,
            keyboard: None,
            mouse: None,
            other_peripherals: None,
            room_type: None,
            computer_type: None,
            brand: None,
            remarks: None,
            notes: None,
            cost: Some("1200.50".to_string()),
            status: ItemStatus::InUse,
            purchase_date: Some(Utc.with_ymd_and_hms(2023, 3, 5, 0, 0, 0).unwrap()),
            warranty_expiry: None,
            submitted_by: Some("admin".to_string()),
            created_at: created,
            updated_at: created,
        }
    }

    #[test]
    fn every_field_is_double_quoted_and_missing_values_are_empty() {
        let csv = export_csv(&[sample_item()]).unwrap();
        let mut lines = csv.lines();
        let header = lines.next().unwrap();
        assert!(header.starts_with("\"Computer Name/ID\",\"Model\""));
        let row = lines.next().unwrap();
        assert!(row.contains("\"PC-001\""));
        assert!(row.contains("\"In Use\""));
        assert!(row.contains("\"2023-03-05\""));
        // Missing warranty date and category render as quoted empty fields.
        assert!(row.contains("\"\""));
        assert!(!row.contains("null"));
        assert!(!row.contains("None"));
    }

    #[test]
    fn export_round_trips_through_a_csv_parser() {
        let item = sample_item();
        let csv_text = export_csv(&[item.clone()]).unwrap();

        let mut reader = csv::ReaderBuilder::new().from_reader(csv_text.as_bytes());
        let records: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(records.len(), 1);
        let row = &records[0];
        assert_eq!(&row[0], "PC-001");
        assert_eq!(&row[1], "Dell OptiPlex");
        assert_eq!(&row[2], "In Use");
        // Embedded double quotes survive the round trip.
        assert_eq!(&row[5], "Lab \"A\"");
        assert_eq!(&row[6], "");
        assert_eq!(&row[8], "2023-03-05");
        assert_eq!(&row[10], "1200.50");
    }

    #[test]
    fn rows_follow_input_order() {
        let mut a = sample_item();
        a.name = Some("first".to_string());
        let mut b = sample_item();
        b.name = Some("second".to_string());
        b.serial_number = None;
        let csv_text = export_csv(&[a, b]).unwrap();
        let first_pos = csv_text.find("first").unwrap();
        let second_pos = csv_text.find("second").unwrap();
        assert!(first_pos < second_pos);
    }
}
