//! The fixed set of grades that are extracted and the names they get in the Dart output.

use std::{borrow::Cow, fmt};

/// Sum of the expected counts of all grades: the 2,140 jōyō kanji.
pub const EXPECTED_TOTAL: usize = 2140;

/// The `KanjiGrade` enum of the Dart models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KanjiGrade {
    Grade1,
    Grade2,
    Grade3,
    Grade4,
    Grade5,
    Grade6,
    JuniorHigh,
}

impl KanjiGrade {
    /// The name of the enum value on the Dart side.
    pub fn tag(self) -> &'static str {
        match self {
            Self::Grade1 => "grade1",
            Self::Grade2 => "grade2",
            Self::Grade3 => "grade3",
            Self::Grade4 => "grade4",
            Self::Grade5 => "grade5",
            Self::Grade6 => "grade6",
            Self::JuniorHigh => "juniorHigh",
        }
    }

    /// The name of the generated list constant.
    pub fn list_identifier(self) -> Cow<'static, str> {
        let tag = self.tag();
        IRREGULAR_IDENTIFIERS
            .iter()
            .find(|(irregular, _)| *irregular == tag)
            .map(|(_, identifier)| Cow::Borrowed(*identifier))
            .unwrap_or_else(|| Cow::Owned(format!("{tag}Kanji")))
    }
}

impl fmt::Display for KanjiGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Tags whose list constant is not simply `<tag>Kanji`.
const IRREGULAR_IDENTIFIERS: &[(&str, &str)] = &[("juniorHigh", "juniorHighKanji")];

/// A grade as it appears in the source module and in the output directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GradeGroup {
    /// The source array is declared as `const <name>Kanji = [...]`.
    pub name: &'static str,
    pub grade: KanjiGrade,
    pub expected: usize,
    pub file_stem: &'static str,
}

impl GradeGroup {
    pub fn file_name(&self) -> String {
        format!("{}.dart", self.file_stem)
    }
}

pub const GRADES: [GradeGroup; 7] = [
    GradeGroup {
        name: "grade1",
        grade: KanjiGrade::Grade1,
        expected: 80,
        file_stem: "grade1_kanji",
    },
    GradeGroup {
        name: "grade2",
        grade: KanjiGrade::Grade2,
        expected: 160,
        file_stem: "grade2_kanji",
    },
    GradeGroup {
        name: "grade3",
        grade: KanjiGrade::Grade3,
        expected: 200,
        file_stem: "grade3_kanji",
    },
    GradeGroup {
        name: "grade4",
        grade: KanjiGrade::Grade4,
        expected: 200,
        file_stem: "grade4_kanji",
    },
    GradeGroup {
        name: "grade5",
        grade: KanjiGrade::Grade5,
        expected: 185,
        file_stem: "grade5_kanji",
    },
    GradeGroup {
        name: "grade6",
        grade: KanjiGrade::Grade6,
        expected: 181,
        file_stem: "grade6_kanji",
    },
    GradeGroup {
        name: "juniorHigh",
        grade: KanjiGrade::JuniorHigh,
        expected: 1134,
        file_stem: "junior_high_kanji",
    },
];
