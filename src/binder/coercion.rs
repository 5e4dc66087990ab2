//! Conversion of raw request values into typed field values.

use crate::annotation::VarType;
use crate::datetime::parse_date;
use crate::error::{AppError, AppResult};
use crate::request::RequestValue;
use crate::value::Value;

use super::types::{FieldType, TypeRegistry};

/// Coerce the raw value of `field` according to its declared type.
///
/// Dates are lenient: a string that does not parse is kept as is, so the
/// `Date` validator can report it later. Enum mismatches and custom parser
/// failures abort binding.
pub fn coerce_field(
    field: &str,
    raw: &RequestValue,
    var_type: Option<&VarType>,
    types: &TypeRegistry,
) -> AppResult<Value> {
    let is_list = var_type.is_some_and(|t| t.is_list);

    match types.resolve(var_type) {
        FieldType::Raw => Ok(raw.to_value()),
        FieldType::Date => coerce_each(raw, is_list, |s| Ok(lenient_date(s))),
        FieldType::Enum(def) => coerce_each(raw, is_list, |s| def.parse(s).map(Value::Enum)),
        FieldType::Parsed(type_name, parser) => coerce_each(raw, is_list, |s| {
            parser(s).map_err(|reason| {
                AppError::bad_request(field, format!("is not a valid {}: {}", type_name, reason))
            })
        }),
        FieldType::Unresolved(type_name) => {
            tracing::warn!(field, type_name, "no parser registered, keeping raw value");
            Ok(raw.to_value())
        }
    }
}

/// Apply `convert` to a scalar, or to every element of a list.
///
/// A `list_of` field wraps a scalar into a one-element list first. A list
/// received by a scalar field is converted element by element.
pub fn coerce_each<F>(raw: &RequestValue, list_of: bool, convert: F) -> AppResult<Value>
where
    F: Fn(&str) -> AppResult<Value>,
{
    match raw {
        RequestValue::Single(s) if !list_of => convert(s),
        _ => raw
            .as_list()
            .into_iter()
            .map(convert)
            .collect::<AppResult<Vec<_>>>()
            .map(Value::List),
    }
}

fn lenient_date(raw: &str) -> Value {
    match parse_date(raw) {
        Some(date) => Value::Date(date),
        None => Value::String(raw.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::EnumDef;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    static LANG: EnumDef = EnumDef::new("Lang", &[("Hebrew", "he"), ("English", "en")]);

    fn types() -> TypeRegistry {
        TypeRegistry::new().with_enum(&LANG)
    }

    #[test]
    fn test_untyped_field_keeps_raw_value() {
        let value = coerce_field("note", &"hello".into(), None, &types()).unwrap();
        assert_eq!(value, Value::from("hello"));

        let raw = RequestValue::from(vec!["a", "b"]);
        let value = coerce_field("tags", &raw, Some(&VarType::parse("array")), &types()).unwrap();
        assert_eq!(value, Value::from(vec!["a", "b"]));
    }

    #[test]
    fn test_date_is_lenient() {
        let date_type = VarType::parse("DateTime");
        let parsed = coerce_field("birthday", &"1990-05-17".into(), Some(&date_type), &types());
        let expected = NaiveDate::from_ymd_opt(1990, 5, 17)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(parsed.unwrap(), Value::Date(expected));

        let kept = coerce_field("birthday", &"not-a-date".into(), Some(&date_type), &types());
        assert_eq!(kept.unwrap(), Value::from("not-a-date"));
    }

    #[test]
    fn test_enum_list_wraps_scalar() {
        let lang_list = VarType::parse("Lang[]");
        let value = coerce_field("languages", &"EN".into(), Some(&lang_list), &types()).unwrap();
        assert_eq!(value, Value::List(vec![Value::Enum(LANG.parse("en").unwrap())]));
    }

    #[test]
    fn test_scalar_enum_passes_lists_through() {
        let lang = VarType::parse("Lang");
        let raw = RequestValue::from(vec!["he", "en"]);
        let value = coerce_field("language", &raw, Some(&lang), &types()).unwrap();
        assert!(matches!(value, Value::List(ref items) if items.len() == 2));
    }

    #[test]
    fn test_enum_mismatch_is_fatal() {
        let lang = VarType::parse("Lang");
        let err = coerce_field("language", &"fr".into(), Some(&lang), &types()).unwrap_err();
        assert!(matches!(err, AppError::EnumParse { ref option, .. } if option == "fr"));
    }

    #[test]
    fn test_parser_failure_is_bad_request() {
        let int_list = VarType::parse("int[]");
        let value = coerce_field("ids", &vec!["1", "2"].into(), Some(&int_list), &types()).unwrap();
        assert_eq!(value, Value::List(vec![Value::Int(1), Value::Int(2)]));

        let err = coerce_field("age", &"old".into(), Some(&VarType::parse("int")), &types())
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest { ref parameter, .. } if parameter == "age"));
    }

    #[test]
    fn test_unregistered_type_keeps_raw_value() {
        let value =
            coerce_field("price", &"9.99".into(), Some(&VarType::parse("Money")), &types()).unwrap();
        assert_eq!(value, Value::from("9.99"));
    }
}
