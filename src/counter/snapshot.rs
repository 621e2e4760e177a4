use std::time::SystemTime;

use serde::{Deserialize, Serialize};

use super::{CounterError, CounterKey, CounterRecord};

/// Point-in-time copy of every counter in a store.
///
/// Entries are bitcode-encoded; the payload serializes as base64 so a snapshot
/// can be written out as JSON.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct CounterSnapshot {
    #[serde(with = "payload_serde")]
    data: Vec<u8>,
    pub counters: usize,
    pub taken_at: SystemTime,
}

mod payload_serde {
    use base64::{engine::general_purpose::STANDARD, Engine};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S>(payload: &Vec<u8>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        STANDARD.encode(payload).serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s: String = String::deserialize(deserializer)?;
        STANDARD.decode(&s).map_err(serde::de::Error::custom)
    }
}

impl CounterSnapshot {
    pub(crate) fn encode<'a>(
        records: impl IntoIterator<Item = &'a CounterRecord>,
    ) -> Result<Self, CounterError> {
        let entries: Vec<(CounterKey, i64)> = records
            .into_iter()
            .map(|record| (record.key(), record.count))
            .collect();
        let data =
            bitcode::serialize(&entries).map_err(|e| CounterError::Snapshot(e.to_string()))?;

        Ok(Self {
            data,
            counters: entries.len(),
            taken_at: SystemTime::now(),
        })
    }

    /// Decode the records held by this snapshot.
    pub fn records(&self) -> Result<Vec<CounterRecord>, CounterError> {
        let entries: Vec<(CounterKey, i64)> = bitcode::deserialize(&self.data)
            .map_err(|e| CounterError::Snapshot(e.to_string()))?;

        if entries.len() != self.counters {
            return Err(CounterError::Snapshot(format!(
                "snapshot declares {} counters but holds {}",
                self.counters,
                entries.len()
            )));
        }

        Ok(entries
            .iter()
            .map(|(key, count)| CounterRecord::new(key, *count))
            .collect())
    }
}
