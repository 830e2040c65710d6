//! The kanji entries of the TypeScript module.

use super::literal;
use crate::error::{DecodeError, GroupError};
use serde::{de, Deserialize, Deserializer};
use serde_json::{Number, Value};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KanjiRecord {
    pub character: String,
    pub meanings: Vec<String>,
    pub onyomi: Vec<String>,
    pub kunyomi: Vec<String>,
    pub examples: Vec<ExampleRecord>,
    #[serde(deserialize_with = "whole_number")]
    pub stroke_count: u32,
    /// Any level that is set, including ones that are not `N1`..`N5`.
    #[serde(default, deserialize_with = "jlpt_level")]
    pub jlpt_level: Option<String>,
    #[serde(default, deserialize_with = "frequency")]
    pub frequency: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ExampleRecord {
    pub word: String,
    pub reading: String,
    pub meaning: String,
}

// the data is loosely typed, so a level is only missing when it is falsy
fn jlpt_level<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let level = match Value::deserialize(deserializer)? {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    };
    Ok(level)
}

fn frequency<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u32>, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Null | Value::Bool(false) => Ok(None),
        Value::Number(n) => to_u32(&n).map(Some).ok_or_else(|| not_whole(&n)),
        other => Err(de::Error::custom(format!(
            "invalid frequency `{other}`, expected a whole number"
        ))),
    }
}

fn whole_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let n = Number::deserialize(deserializer)?;
    to_u32(&n).ok_or_else(|| not_whole(&n))
}

// numbers such as `1.0` or `2e3` come out of the literal parser as floats
fn to_u32(n: &Number) -> Option<u32> {
    if let Some(n) = n.as_u64() {
        return u32::try_from(n).ok();
    }
    let f = n.as_f64()?;
    (f.fract() == 0.0 && (0.0..=f64::from(u32::MAX)).contains(&f)).then_some(f as u32)
}

fn not_whole<E: de::Error>(n: &Number) -> E {
    E::custom(format!("invalid number `{n}`, expected a whole number"))
}

/// Decodes the span returned by [`super::source::extract`] for the grade `name`.
pub fn decode(name: &str, span: &str) -> Result<Vec<KanjiRecord>, GroupError> {
    decode_records(name, span).map_err(|source| GroupError::Decode {
        group: name.to_string(),
        source,
    })
}

fn decode_records(name: &str, span: &str) -> Result<Vec<KanjiRecord>, DecodeError> {
    let declaration = literal::parse_declaration(span)?;
    let expected = format!("{name}Kanji");
    if declaration.identifier != expected {
        return Err(DecodeError::UnexpectedDeclaration {
            expected,
            found: declaration.identifier,
        });
    }

    let records: Vec<KanjiRecord> = serde_json::from_value(declaration.value)?;
    if let Some(index) = records.iter().position(|r| r.character.is_empty()) {
        return Err(DecodeError::EmptyCharacter { index });
    }
    Ok(records)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn decodes_records_in_order() {
        let span = r#"const grade1Kanji = [
  {
    character: '一',
    meanings: ['one'],
    onyomi: ['ICHI', 'ITSU'],
    kunyomi: ['hito', 'hito.tsu'],
    examples: [{ word: '一つ', reading: 'ひとつ', meaning: 'one thing' }],
    strokeCount: 1,
    jlptLevel: 'N5',
    frequency: 2,
    radical: '一',
  },
  {
    character: '二',
    meanings: ['two'],
    onyomi: ['NI'],
    kunyomi: [],
    examples: [],
    strokeCount: 2,
  },
]"#;
        let records = decode("grade1", span).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(
            records[0],
            KanjiRecord {
                character: "一".to_string(),
                meanings: vec!["one".to_string()],
                onyomi: vec!["ICHI".to_string(), "ITSU".to_string()],
                kunyomi: vec!["hito".to_string(), "hito.tsu".to_string()],
                examples: vec![ExampleRecord {
                    word: "一つ".to_string(),
                    reading: "ひとつ".to_string(),
                    meaning: "one thing".to_string(),
                }],
                stroke_count: 1,
                jlpt_level: Some("N5".to_string()),
                frequency: Some(2),
            }
        );
        assert_eq!(records[1].character, "二");
        assert_eq!(records[1].jlpt_level, None);
        assert_eq!(records[1].frequency, None);
    }

    #[test]
    fn null_optionals_are_absent() {
        let span = "const grade1Kanji = [{ character: '一', meanings: [], onyomi: [], kunyomi: [], examples: [], strokeCount: 1, jlptLevel: null, frequency: undefined }]";
        let records = decode("grade1", span).unwrap();
        assert_eq!(records[0].jlpt_level, None);
        assert_eq!(records[0].frequency, None);
    }

    #[test]
    fn missing_stroke_count() {
        let span = "const grade1Kanji = [{ character: '一', meanings: [], onyomi: [], kunyomi: [], examples: [] }]";
        let err = decode("grade1", span).unwrap_err();
        match err {
            GroupError::Decode { group, source } => {
                assert_eq!(group, "grade1");
                assert!(matches!(source, DecodeError::Record(_)));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn empty_character() {
        let span = "const grade1Kanji = [{ character: '', meanings: [], onyomi: [], kunyomi: [], examples: [], strokeCount: 1 }]";
        let err = decode("grade1", span).unwrap_err();
        assert!(matches!(
            err,
            GroupError::Decode {
                source: DecodeError::EmptyCharacter { index: 0 },
                ..
            }
        ));
    }

    fn single_record(fields: &str) -> Result<Vec<KanjiRecord>, GroupError> {
        let span = format!(
            "const grade1Kanji = [{{ character: '一', meanings: [], onyomi: [], kunyomi: [], examples: [], {fields} }}]"
        );
        decode("grade1", &span)
    }

    #[test]
    fn odd_jlpt_levels_are_kept() {
        let level = |fields: &str| single_record(fields).unwrap().remove(0).jlpt_level;
        assert_eq!(level("strokeCount: 1, jlptLevel: 'N2'"), Some("N2".to_string()));
        assert_eq!(level("strokeCount: 1, jlptLevel: 'N6'"), Some("N6".to_string()));
        assert_eq!(level("strokeCount: 1, jlptLevel: 5"), Some("5".to_string()));
        assert_eq!(level("strokeCount: 1, jlptLevel: true"), Some("true".to_string()));
    }

    #[test]
    fn falsy_jlpt_levels_are_absent() {
        let level = |fields: &str| single_record(fields).unwrap().remove(0).jlpt_level;
        assert_eq!(level("strokeCount: 1, jlptLevel: false"), None);
        assert_eq!(level("strokeCount: 1, jlptLevel: ''"), None);
        assert_eq!(level("strokeCount: 1, jlptLevel: 0"), None);
    }

    #[test]
    fn whole_floats_are_accepted() {
        let record = single_record("strokeCount: 1.0, frequency: 2e3")
            .unwrap()
            .remove(0);
        assert_eq!(record.stroke_count, 1);
        assert_eq!(record.frequency, Some(2000));

        let record = single_record("strokeCount: 3, frequency: false")
            .unwrap()
            .remove(0);
        assert_eq!(record.frequency, None);
    }

    #[test]
    fn fractional_counts_are_rejected() {
        let err = single_record("strokeCount: 1.5").unwrap_err();
        assert!(err.to_string().contains("invalid number `1.5`"));
        let err = single_record("strokeCount: -1").unwrap_err();
        assert!(matches!(
            err,
            GroupError::Decode {
                source: DecodeError::Record(_),
                ..
            }
        ));
    }

    #[test]
    fn wrong_declaration() {
        let err = decode("grade2", "const grade1Kanji = []").unwrap_err();
        assert!(matches!(
            err,
            GroupError::Decode {
                source: DecodeError::UnexpectedDeclaration { .. },
                ..
            }
        ));
    }

    #[test]
    fn unresolved_reference() {
        let err = decode("grade1", "const grade1Kanji = [otherKanji]").unwrap_err();
        let message = err.to_string();
        assert!(message.starts_with("failed to decode `grade1Kanji`"));
        assert!(message.contains("unresolved identifier `otherKanji`"));
    }
}
