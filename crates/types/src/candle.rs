use serde::de::{self, SeqAccess, Visitor};
use serde::ser::SerializeSeq;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use thiserror::Error;

/// A candle as it travels over the wire / through the cache: a flat row of
/// floats of whatever length the producer sent. Arity/numeric validation
/// happens downstream, at the timeframe synchronizer (C7), which is the
/// component the spec assigns that responsibility to (§4.7, §7).
pub type RawCandleRow = Vec<f64>;

/// One OHLCV bucket. Wire format (both the exchange gateway and the cache
/// layer) is a flat `[t, open, high, low, close, volume]` array — see
/// spec §3 "OHLCV payload (cached blob)".
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candle {
    /// Epoch milliseconds, UTC.
    pub time_ms: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CorruptCandle {
    #[error("candle row has {0} fields, expected 6")]
    WrongArity(usize),
    #[error("candle row contains a non-numeric field")]
    NonNumeric,
}

impl Candle {
    pub fn from_row(row: &[f64]) -> Result<Self, CorruptCandle> {
        if row.len() != 6 {
            return Err(CorruptCandle::WrongArity(row.len()));
        }
        if row.iter().any(|v| !v.is_finite()) {
            return Err(CorruptCandle::NonNumeric);
        }
        Ok(Candle {
            time_ms: row[0] as i64,
            open: row[1],
            high: row[2],
            low: row[3],
            close: row[4],
            volume: row[5],
        })
    }

    pub fn as_row(&self) -> [f64; 6] {
        [
            self.time_ms as f64,
            self.open,
            self.high,
            self.low,
            self.close,
            self.volume,
        ]
    }
}

impl Serialize for Candle {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(6))?;
        for value in self.as_row() {
            seq.serialize_element(&value)?;
        }
        seq.end()
    }
}

impl<'de> Deserialize<'de> for Candle {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct CandleVisitor;

        impl<'de> Visitor<'de> for CandleVisitor {
            type Value = Candle;

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str("a 6-element [time, open, high, low, close, volume] array")
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Candle, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let mut row = Vec::with_capacity(6);
                while let Some(value) = seq.next_element::<f64>()? {
                    row.push(value);
                }
                Candle::from_row(&row).map_err(de::Error::custom)
            }
        }

        deserializer.deserialize_seq(CandleVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(3; "too few fields")]
    #[test_case(7; "too many fields")]
    fn wrong_arity_is_rejected(len: usize) {
        let row = vec![0.0; len];
        assert_eq!(Candle::from_row(&row), Err(CorruptCandle::WrongArity(len)));
    }

    #[test]
    fn round_trips_through_json() {
        let candle = Candle {
            time_ms: 1000,
            open: 1.0,
            high: 2.0,
            low: 0.5,
            close: 1.5,
            volume: 42.0,
        };
        let encoded = serde_json::to_string(&candle).unwrap();
        assert_eq!(encoded, "[1000.0,1.0,2.0,0.5,1.5,42.0]");
        let decoded: Candle = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, candle);
    }

    #[test]
    fn non_numeric_is_corrupt() {
        assert_eq!(
            Candle::from_row(&[1.0, 2.0, 3.0, 4.0, 5.0, f64::NAN]),
            Err(CorruptCandle::NonNumeric)
        );
    }
}
