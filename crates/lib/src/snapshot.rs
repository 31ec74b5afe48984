use crate::input::LedgerInput;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicI64, Ordering};

pub const ID_PREFIX: &str = "patti_";

/// A saved patti: the rendered image plus enough metadata to find it again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub id: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub bill_no: String,
    #[serde(default)]
    pub miller_name: String,
    #[serde(default)]
    pub party_name: String,
    #[serde(rename = "imageDataRef")]
    pub image_ref: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_url: Option<String>,
}

static LAST_ID_MILLIS: AtomicI64 = AtomicI64::new(i64::MIN);

/// Millisecond stamp for a new id, moved forward if another capture in this
/// process already used it.
fn unique_millis(millis: i64) -> i64 {
    let mut last = LAST_ID_MILLIS.load(Ordering::Relaxed);
    loop {
        let next = millis.max(last.saturating_add(1));
        match LAST_ID_MILLIS.compare_exchange_weak(last, next, Ordering::Relaxed, Ordering::Relaxed)
        {
            Ok(_) => return next,
            Err(actual) => last = actual,
        }
    }
}

/// Captures `input` as a new gallery item.
///
/// The id carries a millisecond stamp that may be ahead of `created_at` when
/// several captures share a millisecond. Read the time from `created_at`,
/// never from the id.
pub fn capture_snapshot(
    input: &LedgerInput,
    image_ref: impl Into<String>,
    created_at: DateTime<Utc>,
) -> Snapshot {
    let millis = unique_millis(created_at.timestamp_millis());
    Snapshot {
        id: format!("{ID_PREFIX}{millis}"),
        created_at,
        bill_no: input.bill_no.clone(),
        miller_name: input.miller_name.clone(),
        party_name: input.party_name.clone(),
        image_ref: image_ref.into(),
        remote_url: None,
    }
}
