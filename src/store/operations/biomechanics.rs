use chrono::{DateTime, Utc};
use pose_kinematics_wasm::{BiomechanicsMetrics, BiomechanicsPayload};
use serde::{Deserialize, Serialize};

use crate::store::keys;
use crate::store::{Store, StoreError};

/// 每个 assessment 只保留最后一次推送的指标
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedBiomechanicsRecord {
    pub assessment_id: i64,
    #[serde(flatten)]
    pub metrics: BiomechanicsMetrics,
    pub saved_at: DateTime<Utc>,
}

impl Store {
    /// 覆盖写入；返回写入后的记录
    pub fn upsert_biomechanics(
        &self,
        payload: &BiomechanicsPayload,
        saved_at: DateTime<Utc>,
    ) -> Result<SavedBiomechanicsRecord, StoreError> {
        let key = keys::biomechanics_key(payload.assessment_id)?;
        let record = SavedBiomechanicsRecord {
            assessment_id: payload.assessment_id,
            metrics: payload.metrics,
            saved_at,
        };
        self.biomechanics_records
            .insert(key.as_bytes(), Self::serialize(&record)?)?;
        tracing::debug!(assessment_id = record.assessment_id, "Biomechanics record saved");
        Ok(record)
    }

    pub fn get_biomechanics(
        &self,
        assessment_id: i64,
    ) -> Result<Option<SavedBiomechanicsRecord>, StoreError> {
        let key = keys::biomechanics_key(assessment_id)?;
        match self.biomechanics_records.get(key.as_bytes())? {
            Some(raw) => Ok(Some(Self::deserialize(&raw)?)),
            None => Ok(None),
        }
    }

    pub fn count_biomechanics(&self) -> usize {
        self.biomechanics_records.len()
    }
}
