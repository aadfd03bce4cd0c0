use chrono::{DateTime, Utc};
use invport_common::types::InventoryItemRecord;
use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfLayerReference};

use crate::error::Result;

/// Aggregate data rendered into the PDF export.
#[derive(Debug, Clone)]
pub struct PdfReport {
    pub total_items: u64,
    pub generated_at: DateTime<Utc>,
    /// (status, count), reporting order.
    pub status_breakdown: Vec<(String, i64)>,
    /// (building, count), descending by count.
    pub building_breakdown: Vec<(String, i64)>,
    /// Most recently created items; only the first 10 are rendered.
    pub recent_items: Vec<InventoryItemRecord>,
}

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 18.0;
const INDENT_MM: f32 = 25.0;

struct Cursor<'a> {
    layer: PdfLayerReference,
    regular: &'a IndirectFontRef,
    bold: &'a IndirectFontRef,
    y: f32,
}

impl Cursor<'_> {
    fn heading(&mut self, text: &str, size: f32) {
        self.y -= size * 0.6;
        self.layer
            .use_text(text, size, Mm(MARGIN_MM), Mm(self.y), self.bold);
        self.y -= 4.0;
    }

    fn line(&mut self, text: &str, size: f32, indent: f32) {
        self.y -= size * 0.5;
        self.layer
            .use_text(text, size, Mm(indent), Mm(self.y), self.regular);
        self.y -= 2.0;
    }
}

/// Render the report as a flowing top-to-bottom text document: title,
/// generation timestamp, summary, status breakdown, building breakdown and
/// the ten most recent items. Layout is sequential; page overflow is left to
/// the writer's defaults, not explicitly controlled.
pub fn export_pdf(report: &PdfReport) -> Result<Vec<u8>> {
    let (doc, page, layer) = PdfDocument::new(
        "Inventory Report",
        Mm(PAGE_WIDTH_MM),
        Mm(PAGE_HEIGHT_MM),
        "Layer 1",
    );
    let regular = doc.add_builtin_font(BuiltinFont::Helvetica)?;
    let bold = doc.add_builtin_font(BuiltinFont::HelveticaBold)?;

    let mut cursor = Cursor {
        layer: doc.get_page(page).get_layer(layer),
        regular: &regular,
        bold: &bold,
        y: PAGE_HEIGHT_MM - MARGIN_MM,
    };

    cursor.heading("Inventory Report", 20.0);
    cursor.line(
        &format!(
            "Generated on: {}",
            report.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        ),
        12.0,
        MARGIN_MM,
    );

    cursor.heading("Summary", 16.0);
    cursor.line(
        &format!("Total Items: {}", report.total_items),
        12.0,
        MARGIN_MM,
    );

    cursor.heading("Items by Status:", 14.0);
    for (status, count) in &report.status_breakdown {
        cursor.line(&format!("{status}: {count}"), 12.0, INDENT_MM);
    }

    cursor.heading("Items by Building:", 14.0);
    for (building, count) in &report.building_breakdown {
        cursor.line(&format!("{building}: {count}"), 12.0, INDENT_MM);
    }

    cursor.heading("Recent Items:", 14.0);
    for item in report.recent_items.iter().take(10) {
        cursor.line(
            &format!(
                "{} - {} ({})",
                item.name.as_deref().unwrap_or("Unnamed"),
                item.model.as_deref().unwrap_or("Unknown Model"),
                item.status
            ),
            10.0,
            INDENT_MM,
        );
    }

    Ok(doc.save_to_bytes()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use invport_common::types::ItemStatus;

    #[test]
    fn renders_a_pdf_document() {
        let created = Utc.with_ymd_and_hms(2024, 2, 1, 9, 0, 0).unwrap();
        let report = PdfReport {
            total_items: 2,
            generated_at: created,
            status_breakdown: vec![("Available".to_string(), 1), ("In Use".to_string(), 1)],
            building_breakdown: vec![("Main".to_string(), 2)],
            recent_items: vec![InventoryItemRecord {
                id: "1".to_string(),
                building: "Main".to_string(),
                floor: "1".to_string(),
                room: "101".to_string(),
                name: Some("PC-001".to_string()),
                model: Some("OptiPlex".to_string()),
                serial_number: None,
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
                cost: None,
                status: ItemStatus::Available,
                purchase_date: None,
                warranty_expiry: None,
                submitted_by: None,
                created_at: created,
                updated_at: created,
            }],
        };

        let bytes = export_pdf(&report).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        assert!(bytes.len() > 500);
    }

    #[test]
    fn renders_with_empty_breakdowns() {
        let report = PdfReport {
            total_items: 0,
            generated_at: Utc.with_ymd_and_hms(2024, 2, 1, 9, 0, 0).unwrap(),
            status_breakdown: vec![],
            building_breakdown: vec![],
            recent_items: vec![],
        };
        let bytes = export_pdf(&report).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}
