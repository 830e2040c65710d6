//! Renders kanji records as a Dart `const List<KanjiCharacter>`.

use crate::{grade::KanjiGrade, input::kanji::KanjiRecord};
use std::fmt::{self, Write};

const IMPORTS: &str = "import '../../models/kanji_character.dart';
import '../../models/kanji_example.dart';
import '../../models/kanji_enums.dart';
";

/// Returns the contents of the Dart file for one grade.
pub fn render(records: &[KanjiRecord], grade: KanjiGrade) -> String {
    let mut dart = String::new();
    // writing into a String never fails
    let _ = write_list(&mut dart, records, grade);
    dart
}

fn write_list(dart: &mut String, records: &[KanjiRecord], grade: KanjiGrade) -> fmt::Result {
    writeln!(dart, "{IMPORTS}")?;
    writeln!(
        dart,
        "const List<KanjiCharacter> {} = [",
        grade.list_identifier()
    )?;
    for (idx, record) in records.iter().enumerate() {
        write_record(dart, record, grade)?;
        if idx + 1 < records.len() {
            dart.push(',');
        }
        dart.push('\n');
    }
    writeln!(dart, "];")
}

fn write_record(dart: &mut String, record: &KanjiRecord, grade: KanjiGrade) -> fmt::Result {
    writeln!(dart, "  KanjiCharacter(")?;
    writeln!(dart, "    character: '{}',", escape(&record.character))?;
    writeln!(dart, "    meanings: [{}],", string_list(&record.meanings))?;
    writeln!(dart, "    onyomi: [{}],", string_list(&record.onyomi))?;
    writeln!(dart, "    kunyomi: [{}],", string_list(&record.kunyomi))?;
    writeln!(dart, "    examples: [")?;
    for example in &record.examples {
        writeln!(
            dart,
            "      KanjiExample(word: '{}', reading: '{}', meaning: '{}'),",
            escape(&example.word),
            escape(&example.reading),
            escape(&example.meaning),
        )?;
    }
    writeln!(dart, "    ],")?;
    writeln!(dart, "    grade: KanjiGrade.{grade},")?;
    writeln!(dart, "    strokeCount: {},", record.stroke_count)?;
    if let Some(level) = record.jlpt_level.as_deref().filter(|l| !l.is_empty()) {
        writeln!(dart, "    jlptLevel: {},", jlpt_level(level).unwrap_or("null"))?;
    }
    // a zero rank counts as no rank
    if let Some(frequency) = record.frequency.filter(|f| *f != 0) {
        writeln!(dart, "    frequency: {frequency},")?;
    }
    write!(dart, "  )")
}

/// Maps a JLPT level of the source data to the `JlptLevel` enum of the Dart models.
pub fn jlpt_level(level: &str) -> Option<&'static str> {
    let level = match level {
        "N5" => "JlptLevel.n5",
        "N4" => "JlptLevel.n4",
        "N3" => "JlptLevel.n3",
        "N2" => "JlptLevel.n2",
        "N1" => "JlptLevel.n1",
        _ => return None,
    };
    Some(level)
}

/// Escapes a string for a single-quoted Dart literal.
pub fn escape(s: &str) -> String {
    // the backslash has to go first, the later replacements introduce new ones
    s.replace('\\', "\\\\")
        .replace('\'', "\\'")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
}

fn string_list(strings: &[String]) -> String {
    strings
        .iter()
        .map(|s| format!("'{}'", escape(s)))
        .collect::<Vec<_>>()
        .join(", ")
}
