//! Wire format of job table responses
//!
//! Every response is an envelope carrying an optional `data` field and an
//! optional `status_code`. `data` is a list for queries and a single object
//! for creations, although some servers wrap created records in a list too.

use serde::Deserialize;

/// Response envelope
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub data: Option<OneOrMany<T>>,
    pub status_code: Option<u16>,
}

/// A `data` field holding either one record or a list
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    /// Flattens into a list
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Self::Many(items) => items,
            Self::One(item) => vec![item],
        }
    }
}

impl<T> Envelope<T> {
    /// The records in `data`; an absent or null field is an empty list
    pub fn into_records(self) -> Vec<T> {
        self.data.map(OneOrMany::into_vec).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jobs::{JobRecord, WorkerRecord};
    use serde_json::Value;

    #[test]
    fn test_list_data() {
        let envelope: Envelope<Value> =
            serde_json::from_str(r#"{"data": [{"id": 1}, {"id": 2}]}"#).unwrap();
        let records = envelope.into_records();
        assert_eq!(records.len(), 2);
        assert_eq!(JobRecord::from_value(&records[0]).id, Some(1));
    }

    #[test]
    fn test_single_object_data() {
        let envelope: Envelope<Value> =
            serde_json::from_str(r#"{"data": {"id": 7, "purpose": "Crawling"}, "status_code": 200}"#)
                .unwrap();
        assert_eq!(envelope.status_code, Some(200));
        let records = envelope.into_records();
        assert_eq!(records.len(), 1);
        assert_eq!(WorkerRecord::from_value(&records[0]).id, Some(7));
    }

    #[test]
    fn test_missing_and_null_data() {
        let missing: Envelope<Value> = serde_json::from_str(r#"{}"#).unwrap();
        assert!(missing.into_records().is_empty());

        let null: Envelope<Value> = serde_json::from_str(r#"{"data": null}"#).unwrap();
        assert!(null.into_records().is_empty());

        let empty: Envelope<Value> = serde_json::from_str(r#"{"data": []}"#).unwrap();
        assert!(empty.into_records().is_empty());
    }

    #[test]
    fn test_records_of_any_shape_are_kept() {
        let envelope: Envelope<Value> =
            serde_json::from_str(r#"{"data": [{"id": "1", "message": 5}, 3, "x"]}"#).unwrap();
        assert_eq!(envelope.into_records().len(), 3);
    }

    #[test]
    fn test_status_code_only() {
        let envelope: Envelope<Value> = serde_json::from_str(r#"{"status_code": 500}"#).unwrap();
        assert_eq!(envelope.status_code, Some(500));
    }
}
