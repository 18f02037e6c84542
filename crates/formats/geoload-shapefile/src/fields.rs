//! DBF attribute conversion.

use indexmap::IndexMap;
use shapefile::dbase::FieldValue;

use geoload_core_common::Value;

/// Converts one DBF record into the scalar attribute vocabulary.
///
/// Numeric fields without a fractional part become integers (DBF encodes
/// integer columns as zero-decimal numerics), logicals become 0/1, and
/// date-like or memo fields are kept as text.
pub fn record_to_properties(record: shapefile::dbase::Record) -> IndexMap<String, Value> {
    record
        .into_iter()
        .map(|(name, value)| (name, convert_field(value)))
        .collect()
}

fn convert_field(value: FieldValue) -> Value {
    match value {
        FieldValue::Character(Some(s)) => Value::Text(s),
        FieldValue::Character(None) => Value::Null,
        FieldValue::Numeric(Some(n)) => numeric_value(n),
        FieldValue::Numeric(None) => Value::Null,
        FieldValue::Logical(Some(b)) => Value::Integer(i64::from(b)),
        FieldValue::Logical(None) => Value::Null,
        FieldValue::Integer(i) => Value::Integer(i64::from(i)),
        FieldValue::Float(Some(f)) => Value::Real(f64::from(f)),
        FieldValue::Float(None) => Value::Null,
        FieldValue::Double(d) => Value::Real(d),
        FieldValue::Currency(c) => Value::Real(c),
        FieldValue::Date(Some(d)) => {
            Value::Text(format!("{:04}-{:02}-{:02}", d.year(), d.month(), d.day()))
        },
        FieldValue::Date(None) => Value::Null,
        FieldValue::Memo(s) => Value::Text(s),
        // DateTime and any future field kinds: keep a readable rendition.
        other => Value::Text(format!("{other:?}")),
    }
}

fn numeric_value(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
        Value::Integer(n as i64)
    } else {
        Value::Real(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn character_fields() {
        assert_eq!(
            convert_field(FieldValue::Character(Some("road".to_string()))),
            Value::Text("road".to_string())
        );
        assert_eq!(convert_field(FieldValue::Character(None)), Value::Null);
    }

    #[test]
    fn whole_numerics_are_integers() {
        assert_eq!(convert_field(FieldValue::Numeric(Some(3.0))), Value::Integer(3));
        assert_eq!(
            convert_field(FieldValue::Numeric(Some(3.25))),
            Value::Real(3.25)
        );
        assert_eq!(convert_field(FieldValue::Numeric(None)), Value::Null);
    }

    #[test]
    fn logicals_become_integers() {
        assert_eq!(convert_field(FieldValue::Logical(Some(true))), Value::Integer(1));
        assert_eq!(
            convert_field(FieldValue::Logical(Some(false))),
            Value::Integer(0)
        );
        assert_eq!(convert_field(FieldValue::Logical(None)), Value::Null);
    }

    #[test]
    fn float_fields_are_reals() {
        assert_eq!(
            convert_field(FieldValue::Float(Some(1.5))),
            Value::Real(f64::from(1.5_f32))
        );
        assert_eq!(convert_field(FieldValue::Double(2.5)), Value::Real(2.5));
    }
}
