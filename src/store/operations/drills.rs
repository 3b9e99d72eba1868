use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::store::keys;
use crate::store::{Store, StoreError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrillKnowledgeEntry {
    pub id: String,
    pub name: String,
    /// 训练所属技能类别，如 "Pitching"
    pub category: String,
    /// "Beginner" / "Intermediate" / "Advanced"
    pub difficulty: String,
    pub description: String,
    #[serde(default)]
    pub mechanic_tags: Vec<String>,
    #[serde(default)]
    pub issue_addressed: Option<String>,
    pub expert_source: String,
    #[serde(default)]
    pub skill_type: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Store {
    /// 写入训练条目并维护类别索引
    pub fn upsert_drill(&self, drill: &DrillKnowledgeEntry) -> Result<(), StoreError> {
        let key = keys::drill_key(&drill.id)?;
        let idx_key = keys::drill_category_index_key(&drill.category, &drill.id)?;

        if let Some(previous) = self.get_drill(&drill.id)? {
            if !previous.category.eq_ignore_ascii_case(&drill.category) {
                let old_idx = keys::drill_category_index_key(&previous.category, &previous.id)?;
                self.drills_by_category.remove(old_idx.as_bytes())?;
            }
        }

        self.drills.insert(key.as_bytes(), Self::serialize(drill)?)?;
        self.drills_by_category
            .insert(idx_key.as_bytes(), drill.id.as_bytes())?;
        Ok(())
    }

    pub fn get_drill(&self, drill_id: &str) -> Result<Option<DrillKnowledgeEntry>, StoreError> {
        let key = keys::drill_key(drill_id)?;
        match self.drills.get(key.as_bytes())? {
            Some(raw) => Ok(Some(Self::deserialize(&raw)?)),
            None => Ok(None),
        }
    }

    /// 按名称升序返回全部训练
    pub fn list_drills(&self) -> Result<Vec<DrillKnowledgeEntry>, StoreError> {
        let mut drills = Vec::with_capacity(self.drills.len());
        for item in self.drills.iter() {
            let (_, value) = item?;
            drills.push(Self::deserialize::<DrillKnowledgeEntry>(&value)?);
        }
        drills.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(drills)
    }

    /// 通过类别索引读取，类别比较不区分大小写
    pub fn list_drills_by_category(
        &self,
        category: &str,
    ) -> Result<Vec<DrillKnowledgeEntry>, StoreError> {
        let prefix = keys::drill_category_prefix(category)?;
        let mut drills = Vec::new();
        for item in self.drills_by_category.scan_prefix(prefix.as_bytes()) {
            let (_, value) = item?;
            let drill_id = String::from_utf8_lossy(&value).into_owned();
            match self.get_drill(&drill_id)? {
                Some(drill) => drills.push(drill),
                None => {
                    tracing::warn!(drill_id = %drill_id, "Dangling drill category index entry");
                }
            }
        }
        drills.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(drills)
    }

    pub fn count_drills(&self) -> usize {
        self.drills.len()
    }
}
