//! Exams, their sections, and per-exam results.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{Entity, RecordId};
use crate::net::{Batch, Resource};
use crate::view::FilterParams;

// =============================================================================
// EXAM
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exam {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub sections_count: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewExam {
    pub title: String,
    pub description: String,
}

impl Entity for Exam {
    const SINGULAR: &'static str = "exam";
    const PLURAL: &'static str = "exams";

    fn resource() -> Resource {
        Resource::rest("exams")
    }

    fn id(&self) -> RecordId {
        RecordId::Text(self.id.clone())
    }

    fn search_fields(&self) -> Vec<Cow<'_, str>> {
        vec![
            Cow::Borrowed(self.title.as_str()),
            Cow::Borrowed(self.description.as_deref().unwrap_or_default()),
        ]
    }
}

// =============================================================================
// SECTIONS
// =============================================================================

/// The cognitive test types an exam can be assembled from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExamSectionType {
    MultitaskingCoordinationTest,
    MultipleMetersNeedles,
    CubeRotationTest,
    DiceFoldingTest,
    RunningMemorySpanTest,
    DiceArithmeticTest,
    MultitaskingPointingTest,
    SpacialAwareness,
    AttentionAndAlertness,
    FocusedAttention,
}

impl ExamSectionType {
    pub const ALL: [ExamSectionType; 10] = [
        Self::MultitaskingCoordinationTest,
        Self::MultipleMetersNeedles,
        Self::CubeRotationTest,
        Self::DiceFoldingTest,
        Self::RunningMemorySpanTest,
        Self::DiceArithmeticTest,
        Self::MultitaskingPointingTest,
        Self::SpacialAwareness,
        Self::AttentionAndAlertness,
        Self::FocusedAttention,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MultitaskingCoordinationTest => "multitasking_coordination_test",
            Self::MultipleMetersNeedles => "multiple_meters_needles",
            Self::CubeRotationTest => "cube_rotation_test",
            Self::DiceFoldingTest => "dice_folding_test",
            Self::RunningMemorySpanTest => "running_memory_span_test",
            Self::DiceArithmeticTest => "dice_arithmetic_test",
            Self::MultitaskingPointingTest => "multitasking_pointing_test",
            Self::SpacialAwareness => "spacial_awareness",
            Self::AttentionAndAlertness => "attention_and_alertness",
            Self::FocusedAttention => "focused_attention",
        }
    }

    #[must_use]
    pub fn label_en(self) -> &'static str {
        match self {
            Self::MultitaskingCoordinationTest => "Multitasking Coordination Test",
            Self::MultipleMetersNeedles => "Multiple Meters Needles Test",
            Self::CubeRotationTest => "Cube Rotation Test",
            Self::DiceFoldingTest => "Dice Folding Test",
            Self::RunningMemorySpanTest => "Running Memory Span Test",
            Self::DiceArithmeticTest => "Dice Arithmetic Test",
            Self::MultitaskingPointingTest => "Multitasking Pointing Test",
            Self::SpacialAwareness => "Spatial Awareness Test",
            Self::AttentionAndAlertness => "Attention and Alertness Test",
            Self::FocusedAttention => "Focused Attention Test",
        }
    }

    #[must_use]
    pub fn label_ar(self) -> &'static str {
        match self {
            Self::MultitaskingCoordinationTest => "اختبار التنسيق المتعدد المهام",
            Self::MultipleMetersNeedles => "اختبار مؤشرات العدادات المتعددة",
            Self::CubeRotationTest => "اختبار تدوير المكعب",
            Self::DiceFoldingTest => "اختبار طي النرد",
            Self::RunningMemorySpanTest => "اختبار مدى الذاكرة الجارية",
            Self::DiceArithmeticTest => "اختبار حساب النرد",
            Self::MultitaskingPointingTest => "اختبار التوجيه المتعدد المهام",
            Self::SpacialAwareness => "اختبار الوعي المكاني",
            Self::AttentionAndAlertness => "اختبار الانتباه والتيقظ",
            Self::FocusedAttention => "اختبار الانتباه المركز",
        }
    }
}

impl fmt::Display for ExamSectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExamSectionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("unknown section type '{s}'"))
    }
}

/// A section row of one exam. `kind` stays a string so sections created
/// with newer types still list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExamSection {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewSection {
    #[serde(rename = "type")]
    pub kind: ExamSectionType,
}

impl Entity for ExamSection {
    const SINGULAR: &'static str = "section";
    const PLURAL: &'static str = "sections";

    fn resource() -> Resource {
        Resource::rest("exams/{scope}/sections").with_batch(Batch::Array)
    }

    fn id(&self) -> RecordId {
        RecordId::Text(self.id.clone())
    }

    fn search_fields(&self) -> Vec<Cow<'_, str>> {
        vec![Cow::Borrowed(self.kind.as_str())]
    }
}

// =============================================================================
// RESULTS
// =============================================================================

/// One student's result on an exam, flattened from the nested wire shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "WireResult")]
pub struct ExamResult {
    pub id: String,
    pub student_name: String,
    pub score: f64,
}

#[derive(Deserialize)]
struct WireResult {
    #[serde(deserialize_with = "id_as_string")]
    id: String,
    #[serde(default)]
    student: Option<WireStudent>,
    #[serde(default, alias = "studentName")]
    student_name: Option<String>,
    #[serde(default)]
    score: f64,
}

#[derive(Deserialize)]
struct WireStudent {
    #[serde(default)]
    name: Option<String>,
}

impl From<WireResult> for ExamResult {
    fn from(wire: WireResult) -> Self {
        let student_name = wire
            .student
            .and_then(|s| s.name)
            .or(wire.student_name)
            .unwrap_or_default();
        Self { id: wire.id, student_name, score: wire.score }
    }
}

fn id_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let id = RecordId::deserialize(deserializer)?;
    Ok(id.to_string())
}

impl ExamResult {
    #[must_use]
    pub fn passed(&self, pass_mark: f64) -> bool {
        self.score >= pass_mark
    }
}

impl Entity for ExamResult {
    const SINGULAR: &'static str = "result";
    const PLURAL: &'static str = "results";

    fn resource() -> Resource {
        Resource::rest("exam-results/{scope}")
    }

    fn id(&self) -> RecordId {
        RecordId::Text(self.id.clone())
    }

    fn search_fields(&self) -> Vec<Cow<'_, str>> {
        vec![Cow::Borrowed(self.student_name.as_str())]
    }

    fn category_under(&self, filter: &FilterParams) -> Option<Cow<'_, str>> {
        Some(Cow::Borrowed(if self.passed(filter.pass_mark) { "pass" } else { "fail" }))
    }
}

/// Detailed results document used for the spreadsheet export.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultsDetail {
    #[serde(default)]
    pub section_types: Vec<String>,
    #[serde(default)]
    pub attempts: Vec<ResultAttempt>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultAttempt {
    pub student: AttemptStudent,
    #[serde(default)]
    pub score: f64,
    #[serde(default)]
    pub section_contributions: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptStudent {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub national_id: Option<serde_json::Value>,
}

impl ResultsDetail {
    /// Resource of the detailed document for one exam.
    #[must_use]
    pub fn resource(exam_id: &str) -> Resource {
        Resource::rest("exam-results/{scope}/with-sections-json").scoped(exam_id)
    }
}

#[cfg(test)]
#[path = "exam_test.rs"]
mod exam_test;
