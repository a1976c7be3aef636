//! Spreadsheet export of list views.
//!
//! DESIGN
//! ======
//! Export is two steps. `project` turns the currently displayed records into
//! a `Sheet` (header row plus typed cells) using the entity's `Exportable`
//! impl; `write_xlsx` renders a sheet into a one-sheet workbook with a bold
//! header row. Keeping the projection separate means the tabular content is
//! testable without opening a workbook.
//!
//! The exam results export is the exception: it projects the detailed
//! results document (one column per exam section), not the list view.

#[cfg(test)]
#[path = "export_test.rs"]
mod export_test;

use std::path::Path;

use rust_xlsxwriter::{Format, Workbook, XlsxError};
use serde_json::Value;
use tracing::info;

use crate::entities::{
    ContactResponse, Coupon, Entity, ExamResult, ExamSectionType, JoinResponse, Order, ResultsDetail, Student,
    format_dmy,
};
use crate::locale::Locale;

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("sheet has too many {0} for a worksheet")]
    TooLarge(&'static str),

    #[error("workbook write failed: {0}")]
    Xlsx(#[from] XlsxError),
}

// =============================================================================
// SHEET
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
    Empty,
}

impl Cell {
    #[must_use]
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Text cell, or `Empty` for a missing value.
    #[must_use]
    pub fn opt_text(value: Option<&str>) -> Self {
        value.map_or(Self::Empty, Self::text)
    }

    /// Loosely typed JSON scalar (ids the backend sends as number or string).
    #[must_use]
    pub fn from_json(value: Option<&Value>) -> Self {
        match value {
            Some(Value::Number(n)) => n.as_f64().map_or(Self::Empty, Self::Number),
            Some(Value::String(s)) => Self::Text(s.clone()),
            Some(Value::Bool(b)) => Self::Text(b.to_string()),
            _ => Self::Empty,
        }
    }
}

impl From<f64> for Cell {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i64> for Cell {
    #[allow(clippy::cast_precision_loss)]
    fn from(n: i64) -> Self {
        Self::Number(n as f64)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

/// A record type the export button can turn into a spreadsheet.
pub trait Exportable: Entity {
    /// Worksheet name.
    const SHEET: &'static str;
    /// Default download file name.
    const FILE_NAME: &'static str;

    fn headers(locale: Locale) -> Vec<&'static str>;

    /// One cell per header.
    fn row(&self) -> Vec<Cell>;
}

/// Project records into a sheet with headers in `locale`.
#[must_use]
pub fn project<E: Exportable>(records: &[E], locale: Locale) -> Sheet {
    Sheet {
        name: E::SHEET.to_owned(),
        headers: E::headers(locale).into_iter().map(str::to_owned).collect(),
        rows: records.iter().map(Exportable::row).collect(),
    }
}

// =============================================================================
// EXAM RESULTS
// =============================================================================

const RESULT_HEADERS_AR: [&str; 3] = ["الاسم", "الرقم الوطني", "الدرجة"];

#[must_use]
pub fn results_file_name(exam_id: &str) -> String {
    format!("exam-results-{exam_id}.xlsx")
}

/// Sheet of the detailed results document: name, national id, score, then
/// one column per section with Arabic labels for known section types.
#[must_use]
pub fn results_sheet(detail: &ResultsDetail) -> Sheet {
    let mut headers: Vec<String> = RESULT_HEADERS_AR.iter().map(|h| (*h).to_owned()).collect();
    headers.extend(detail.section_types.iter().map(|raw| {
        raw.parse::<ExamSectionType>().map_or_else(|_| raw.clone(), |kind| kind.label_ar().to_owned())
    }));
    let rows = detail
        .attempts
        .iter()
        .map(|attempt| {
            let mut row = vec![
                Cell::text(attempt.student.name.as_str()),
                Cell::from_json(attempt.student.national_id.as_ref()),
                Cell::Number(attempt.score),
            ];
            row.extend(attempt.section_contributions.iter().copied().map(Cell::Number));
            row
        })
        .collect();
    Sheet { name: "Results".to_owned(), headers, rows }
}

// =============================================================================
// XLSX
// =============================================================================

/// Render a sheet into xlsx bytes.
///
/// # Errors
///
/// Returns `TooLarge` when the sheet exceeds worksheet limits, or the
/// writer's error.
pub fn to_xlsx_bytes(sheet: &Sheet) -> Result<Vec<u8>, ExportError> {
    let mut workbook = build_workbook(sheet)?;
    Ok(workbook.save_to_buffer()?)
}

/// Write a sheet to an `.xlsx` file.
///
/// # Errors
///
/// Same as [`to_xlsx_bytes`], plus file write failures.
pub fn write_xlsx(sheet: &Sheet, path: &Path) -> Result<(), ExportError> {
    let mut workbook = build_workbook(sheet)?;
    workbook.save(path)?;
    info!(path = %path.display(), rows = sheet.rows.len(), "spreadsheet written");
    Ok(())
}

fn build_workbook(sheet: &Sheet) -> Result<Workbook, ExportError> {
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(&sheet.name)?;

    for (col, header) in sheet.headers.iter().enumerate() {
        worksheet.write_string_with_format(0, column(col)?, header, &bold)?;
    }
    for (index, cells) in sheet.rows.iter().enumerate() {
        let row = u32::try_from(index + 1).map_err(|_| ExportError::TooLarge("rows"))?;
        for (col, cell) in cells.iter().enumerate() {
            let col = column(col)?;
            match cell {
                Cell::Text(text) => {
                    worksheet.write_string(row, col, text)?;
                }
                Cell::Number(n) => {
                    worksheet.write_number(row, col, *n)?;
                }
                Cell::Empty => {}
            }
        }
    }
    Ok(workbook)
}

fn column(index: usize) -> Result<u16, ExportError> {
    u16::try_from(index).map_err(|_| ExportError::TooLarge("columns"))
}

// =============================================================================
// EXPORTABLE ENTITIES
// =============================================================================

impl Exportable for Student {
    const SHEET: &'static str = "Students";
    const FILE_NAME: &'static str = "students.xlsx";

    fn headers(locale: Locale) -> Vec<&'static str> {
        match locale {
            Locale::En => vec!["Name", "National ID", "Nominal ID"],
            Locale::Ar => vec!["الاسم", "الرقم الوطني", "الرقم الاسمي"],
        }
    }

    fn row(&self) -> Vec<Cell> {
        vec![Cell::text(self.name.as_str()), self.national_id.into(), self.nominal_id.into()]
    }
}

impl Exportable for ExamResult {
    const SHEET: &'static str = "Results";
    const FILE_NAME: &'static str = "exam-results.xlsx";

    fn headers(locale: Locale) -> Vec<&'static str> {
        match locale {
            Locale::En => vec!["Name", "Score"],
            Locale::Ar => vec!["الاسم", "الدرجة"],
        }
    }

    fn row(&self) -> Vec<Cell> {
        vec![Cell::text(self.student_name.as_str()), Cell::Number(self.score)]
    }
}

impl Exportable for Order {
    const SHEET: &'static str = "Orders";
    const FILE_NAME: &'static str = "orders.xlsx";

    fn headers(locale: Locale) -> Vec<&'static str> {
        match locale {
            Locale::En => vec!["ID", "Name", "Phone", "City", "Address", "Total", "Payment", "Status", "Date"],
            Locale::Ar => {
                vec!["الرقم", "الاسم", "الهاتف", "المدينة", "العنوان", "المجموع", "طريقة الدفع", "الحالة", "التاريخ"]
            }
        }
    }

    fn row(&self) -> Vec<Cell> {
        vec![
            self.id.into(),
            Cell::text(self.name.as_str()),
            Cell::text(self.phone.as_str()),
            Cell::text(self.city.as_str()),
            Cell::text(self.address.as_str()),
            Cell::Number(self.total),
            Cell::text(self.payment_method.as_str()),
            Cell::text(self.status.as_str()),
            Cell::text(format_dmy(&self.created_at)),
        ]
    }
}

impl Exportable for Coupon {
    const SHEET: &'static str = "Coupons";
    const FILE_NAME: &'static str = "coupons.xlsx";

    fn headers(locale: Locale) -> Vec<&'static str> {
        match locale {
            Locale::En => vec!["Code", "Amount", "Percentage", "Max Discount", "Min Purchase", "Status", "Date"],
            Locale::Ar => vec!["الرمز", "القيمة", "نسبة مئوية", "أقصى خصم", "أدنى شراء", "الحالة", "التاريخ"],
        }
    }

    fn row(&self) -> Vec<Cell> {
        vec![
            Cell::text(self.code.as_str()),
            Cell::Number(self.amount),
            Cell::text(if self.is_percentage { "yes" } else { "no" }),
            Cell::Number(self.max_discount),
            Cell::Number(self.min_purchase),
            Cell::text(self.status_or_default()),
            self.created_at.as_deref().map_or(Cell::Empty, |raw| Cell::Text(format_dmy(raw))),
        ]
    }
}

impl Exportable for ContactResponse {
    const SHEET: &'static str = "Contact";
    const FILE_NAME: &'static str = "contact-responses.xlsx";

    fn headers(locale: Locale) -> Vec<&'static str> {
        match locale {
            Locale::En => vec!["Name", "Email", "Phone", "Message", "Date"],
            Locale::Ar => vec!["الاسم", "البريد الإلكتروني", "الهاتف", "الرسالة", "التاريخ"],
        }
    }

    fn row(&self) -> Vec<Cell> {
        vec![
            Cell::text(self.name.as_str()),
            Cell::text(self.email.as_str()),
            Cell::text(self.phone.as_str()),
            Cell::text(self.message.as_str()),
            Cell::text(format_dmy(&self.created_at)),
        ]
    }
}

impl Exportable for JoinResponse {
    const SHEET: &'static str = "Applications";
    const FILE_NAME: &'static str = "join-us-applications.xlsx";

    fn headers(locale: Locale) -> Vec<&'static str> {
        match locale {
            Locale::En => vec![
                "Name",
                "Age",
                "University",
                "Major",
                "Email",
                "Phone",
                "Date",
                "Skills",
                "About",
                "Why Join Us",
                "Notes",
            ],
            Locale::Ar => vec![
                "الاسم",
                "العمر",
                "الجامعة",
                "التخصص",
                "البريد الإلكتروني",
                "الهاتف",
                "التاريخ",
                "المهارات",
                "نبذة",
                "لماذا تنضم إلينا",
                "ملاحظات",
            ],
        }
    }

    fn row(&self) -> Vec<Cell> {
        vec![
            Cell::text(self.name.as_str()),
            self.age.map_or(Cell::Empty, |age| Cell::Number(f64::from(age))),
            Cell::text(self.university.as_str()),
            Cell::text(self.major.as_str()),
            Cell::text(self.email.as_str()),
            Cell::text(self.phone.as_str()),
            Cell::text(format_dmy(&self.created_at)),
            Cell::text(self.skills.as_str()),
            Cell::text(self.about.as_str()),
            Cell::text(self.why.as_str()),
            Cell::opt_text(self.note.as_deref()),
        ]
    }
}
