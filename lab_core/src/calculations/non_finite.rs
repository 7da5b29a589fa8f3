//! Serde adapter for result fields that may be non-finite.
//!
//! JSON has no literal for NaN or infinity and serde_json writes them as
//! `null`. Degenerate results must survive serialization, so finite values
//! stay numbers and the rest are written as the strings `"inf"`, `"-inf"`
//! and `"NaN"` (the same spelling as the CSV export).
//!
//! Use with `#[serde(with = "non_finite")]` on an `f64` field.

use std::fmt;

use serde::de::{self, Visitor};
use serde::{Deserializer, Serializer};

pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if value.is_finite() {
        serializer.serialize_f64(*value)
    } else if value.is_nan() {
        serializer.serialize_str("NaN")
    } else if *value > 0.0 {
        serializer.serialize_str("inf")
    } else {
        serializer.serialize_str("-inf")
    }
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    deserializer.deserialize_any(F64OrSpelling)
}

struct F64OrSpelling;

impl<'de> Visitor<'de> for F64OrSpelling {
    type Value = f64;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a number or one of \"inf\", \"-inf\", \"NaN\"")
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<f64, E> {
        Ok(v)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<f64, E> {
        Ok(v as f64)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<f64, E> {
        Ok(v as f64)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<f64, E> {
        match v {
            "inf" | "+inf" => Ok(f64::INFINITY),
            "-inf" => Ok(f64::NEG_INFINITY),
            "NaN" => Ok(f64::NAN),
            other => Err(E::invalid_value(de::Unexpected::Str(other), &self)),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Serialize, Deserialize)]
    struct Reading {
        #[serde(with = "super")]
        v: f64,
    }

    fn roundtrip(v: f64) -> (String, f64) {
        let json = serde_json::to_string(&Reading { v }).unwrap();
        let back: Reading = serde_json::from_str(&json).unwrap();
        (json, back.v)
    }

    #[test]
    fn test_finite_stays_numeric() {
        assert_eq!(roundtrip(2.5), ("{\"v\":2.5}".to_string(), 2.5));
        let back: Reading = serde_json::from_str("{\"v\":3}").unwrap();
        assert_eq!(back.v, 3.0);
    }

    #[test]
    fn test_finite_reads_back_bit_exact() {
        // Water density at 20 °C; the last bit is lost without exact float parsing
        for v in [0.9975609599999999, 1.9951219199999999] {
            let (_, back) = roundtrip(v);
            assert_eq!(back.to_bits(), v.to_bits());
        }
    }

    #[test]
    fn test_non_finite_spelled_out() {
        assert_eq!(roundtrip(f64::INFINITY), ("{\"v\":\"inf\"}".to_string(), f64::INFINITY));
        assert_eq!(roundtrip(f64::NEG_INFINITY).0, "{\"v\":\"-inf\"}");
        let (json, back) = roundtrip(f64::NAN);
        assert_eq!(json, "{\"v\":\"NaN\"}");
        assert!(back.is_nan());
    }

    #[test]
    fn test_rejects_other_strings_and_null() {
        assert!(serde_json::from_str::<Reading>("{\"v\":\"big\"}").is_err());
        assert!(serde_json::from_str::<Reading>("{\"v\":null}").is_err());
    }
}
