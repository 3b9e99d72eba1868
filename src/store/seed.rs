//! 初始训练知识库
//!
//! 由 v2 迁移写入。条目 id 固定，重复写入会覆盖为同一内容。

use chrono::{DateTime, TimeZone, Utc};

use crate::store::operations::drills::DrillKnowledgeEntry;

struct SeedDrill {
    id: &'static str,
    name: &'static str,
    category: &'static str,
    difficulty: &'static str,
    description: &'static str,
    mechanic_tags: &'static [&'static str],
    issue_addressed: Option<&'static str>,
    expert_source: &'static str,
    skill_type: Option<&'static str>,
}

const SEED_DRILLS: &[SeedDrill] = &[
    SeedDrill {
        id: "pitch-power-line-drive",
        name: "Power Line Drive",
        category: "Pitching",
        difficulty: "Beginner",
        description: "Push off the rubber along a chalk power line and finish with the stride foot on the line.",
        mechanic_tags: &["leg drive", "push off", "stride length"],
        issue_addressed: Some("weak leg drive"),
        expert_source: "NFCA pitching clinic",
        skill_type: Some("Pitching"),
    },
    SeedDrill {
        id: "pitch-k-drill",
        name: "K Drill",
        category: "Pitching",
        difficulty: "Beginner",
        description: "Start in the K position with the arm at the top of the circle and finish the release only.",
        mechanic_tags: &["arm circle", "release point", "arm slot"],
        issue_addressed: Some("low arm slot"),
        expert_source: "Amanda Scarborough pitching series",
        skill_type: Some("Pitching"),
    },
    SeedDrill {
        id: "pitch-wall-drill",
        name: "Wall Drill",
        category: "Pitching",
        difficulty: "Intermediate",
        description: "Pitch standing sideways to a wall so the arm circle stays on a vertical plane.",
        mechanic_tags: &["arm circle", "arm path", "stay closed"],
        issue_addressed: Some("arm circle too wide"),
        expert_source: "NFCA pitching clinic",
        skill_type: Some("Pitching"),
    },
    SeedDrill {
        id: "pitch-hip-snap",
        name: "Hip Snap Series",
        category: "Pitching",
        difficulty: "Intermediate",
        description: "Open to the catcher, then snap the hips closed through release with a band around the waist.",
        mechanic_tags: &["hip rotation", "hip shoulder separation", "torque"],
        issue_addressed: Some("poor hip shoulder separation"),
        expert_source: "Cat Osterman camp notes",
        skill_type: Some("Pitching"),
    },
    SeedDrill {
        id: "pitch-stride-brace",
        name: "Stride Brace Holds",
        category: "Pitching",
        difficulty: "Advanced",
        description: "Land on the stride leg with a firm, slightly flexed knee and hold the finish for three seconds.",
        mechanic_tags: &["front leg", "knee flexion", "stride landing", "balance"],
        issue_addressed: Some("stiff front leg"),
        expert_source: "USA Softball coaching education",
        skill_type: Some("Pitching"),
    },
    SeedDrill {
        id: "hit-tee-load",
        name: "Tee Load and Separate",
        category: "Hitting",
        difficulty: "Beginner",
        description: "Load the back hip on a tee, stride, and hold separation before swinging.",
        mechanic_tags: &["load", "hip shoulder separation", "balance"],
        issue_addressed: Some("no load"),
        expert_source: "USA Softball coaching education",
        skill_type: Some("Hitting"),
    },
    SeedDrill {
        id: "hit-short-bat",
        name: "Short Bat Inside Path",
        category: "Hitting",
        difficulty: "Intermediate",
        description: "One-handed short bat swings off a tee to keep the hands inside the ball.",
        mechanic_tags: &["bat path", "hands inside", "casting"],
        issue_addressed: Some("casting hands"),
        expert_source: "NFCA hitting clinic",
        skill_type: Some("Hitting"),
    },
    SeedDrill {
        id: "field-short-hop",
        name: "Short Hop Partner Drill",
        category: "Fielding",
        difficulty: "Beginner",
        description: "Partners throw short hops from five metres while the fielder stays low with glove out front.",
        mechanic_tags: &["glove work", "stay low", "ready position"],
        issue_addressed: Some("standing up on grounders"),
        expert_source: "USA Softball coaching education",
        skill_type: Some("Fielding"),
    },
    SeedDrill {
        id: "field-crow-hop",
        name: "Crow Hop Throws",
        category: "Fielding",
        difficulty: "Intermediate",
        description: "Field, crow hop, and throw to a target to connect footwork with the throw.",
        mechanic_tags: &["footwork", "throwing mechanics", "momentum"],
        issue_addressed: Some("flat footed throws"),
        expert_source: "NFCA fielding clinic",
        skill_type: Some("Fielding"),
    },
    SeedDrill {
        id: "catch-block-series",
        name: "Blocking Series",
        category: "Catching",
        difficulty: "Intermediate",
        description: "Drop to both knees and smother balls in the dirt with the chest angled toward home.",
        mechanic_tags: &["blocking", "knee flexion", "stay low"],
        issue_addressed: Some("balls getting past"),
        expert_source: "USA Softball coaching education",
        skill_type: Some("Catching"),
    },
    SeedDrill {
        id: "catch-quick-transfer",
        name: "Quick Transfer",
        category: "Catching",
        difficulty: "Advanced",
        description: "Receive and transfer to the throwing hand in one motion for pickoffs and steals.",
        mechanic_tags: &["transfer", "footwork", "throwing mechanics"],
        issue_addressed: Some("slow release"),
        expert_source: "NFCA catching clinic",
        skill_type: Some("Catching"),
    },
    SeedDrill {
        id: "run-first-step",
        name: "First Step Explosion",
        category: "Baserunning",
        difficulty: "Beginner",
        description: "Leave on the pitcher's release with a rocker start and drive the first three steps low.",
        mechanic_tags: &["first step", "leg drive", "acceleration"],
        issue_addressed: Some("slow start"),
        expert_source: "USA Softball coaching education",
        skill_type: Some("Baserunning"),
    },
];

fn seeded_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
        .single()
        .unwrap_or_else(Utc::now)
}

pub fn starter_drills() -> Vec<DrillKnowledgeEntry> {
    let created_at = seeded_at();
    SEED_DRILLS
        .iter()
        .map(|seed| DrillKnowledgeEntry {
            id: seed.id.to_string(),
            name: seed.name.to_string(),
            category: seed.category.to_string(),
            difficulty: seed.difficulty.to_string(),
            description: seed.description.to_string(),
            mechanic_tags: seed.mechanic_tags.iter().map(|t| t.to_string()).collect(),
            issue_addressed: seed.issue_addressed.map(str::to_string),
            expert_source: seed.expert_source.to_string(),
            skill_type: seed.skill_type.map(str::to_string),
            created_at,
        })
        .collect()
}
