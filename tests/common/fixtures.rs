use chrono::Utc;

use pose_kinematics_wasm::landmark::POSE_LANDMARK_COUNT;
use pose_kinematics_wasm::Landmark;

use pitchlab_backend::store::operations::drills::DrillKnowledgeEntry;
use pitchlab_backend::store::Store;

pub fn drill(
    id: &str,
    name: &str,
    category: &str,
    difficulty: &str,
    tags: &[&str],
    issue_addressed: Option<&str>,
) -> DrillKnowledgeEntry {
    DrillKnowledgeEntry {
        id: id.to_string(),
        name: name.to_string(),
        category: category.to_string(),
        difficulty: difficulty.to_string(),
        description: format!("{name} description"),
        mechanic_tags: tags.iter().map(|t| t.to_string()).collect(),
        issue_addressed: issue_addressed.map(str::to_string),
        expert_source: "fixture".to_string(),
        skill_type: Some(category.to_string()),
        created_at: Utc::now(),
    }
}

pub fn seed_drill(store: &Store, entry: &DrillKnowledgeEntry) {
    store.upsert_drill(entry).expect("seed drill");
}

/// 33 个关键点，均可见；右臂肘与肩齐平，髋在肩正下方（臂位角 90°）
pub fn pitching_landmarks() -> Vec<Landmark> {
    let mut points = vec![Landmark::new(0.5, 0.5, 0.0, 0.9); POSE_LANDMARK_COUNT];
    points[11] = Landmark::new(0.4, 0.4, 0.0, 0.9);
    points[12] = Landmark::new(0.5, 0.4, 0.0, 0.9);
    points[14] = Landmark::new(0.7, 0.4, 0.0, 0.9);
    points[23] = Landmark::new(0.45, 0.6, 0.0, 0.9);
    points[24] = Landmark::new(0.5, 0.6, 0.0, 0.9);
    points[26] = Landmark::new(0.5, 0.75, 0.0, 0.9);
    points[28] = Landmark::new(0.5, 0.9, 0.0, 0.9);
    points
}
